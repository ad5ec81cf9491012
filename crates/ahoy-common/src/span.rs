use serde::Serialize;

/// A 1-based source position.
///
/// Unlike a byte-offset `Span`, `line`/`column` are computed eagerly by the
/// lexer as it scans: Ahoy's lexer is line-oriented (it has to measure
/// indentation per line anyway), so there is no separate `LineIndex` pass
/// to convert offsets after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_new() {
        let p = Position::new(3, 7);
        assert_eq!(p.line, 3);
        assert_eq!(p.column, 7);
    }
}
