use serde::Serialize;

/// A node in the Ahoy AST. Every node carries the same shape (§3):
/// `kind` selects the variant, `value` is a kind-specific short payload,
/// `children` are ordered sub-nodes whose positions are dictated by
/// `kind` (see the per-kind child conventions in §3), `data_type` is an
/// optional explicit type annotation captured at parse time, and `line`
/// is the source line of the defining token.
///
/// `default_value` is populated only for parameter `identifier` nodes
/// that carried a default-value expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub value: String,
    pub children: Vec<Node>,
    pub data_type: Option<String>,
    pub line: u32,
    pub default_value: Option<Box<Node>>,
}

impl Node {
    pub fn new(kind: NodeKind, line: u32) -> Self {
        Self {
            kind,
            value: String::new(),
            children: Vec::new(),
            data_type: None,
            line,
            default_value: None,
        }
    }

    pub fn with_value(kind: NodeKind, value: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            value: value.into(),
            children: Vec::new(),
            data_type: None,
            line,
            default_value: None,
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    pub fn with_default(mut self, default: Node) -> Self {
        self.default_value = Some(Box::new(default));
        self
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    /// A placeholder node synthesized during lint-mode recovery (§3
    /// invariant 4, §4.7). Always an `identifier` with value `"error"`.
    pub fn error_placeholder(line: u32) -> Self {
        Node::with_value(NodeKind::Identifier, "error", line)
    }

    pub fn is_error_placeholder(&self) -> bool {
        self.kind == NodeKind::Identifier && self.value == "error"
    }
}

/// The closed set of AST node kinds (§3). ~45 variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    Program,
    ProgramDecl,
    Function,
    ConstantDeclaration,
    Assignment,
    TupleAssignment,
    If,
    Switch,
    Case,
    CaseList,
    CaseRange,
    WhileLoop,
    ForRangeLoop,
    ForCountLoop,
    ForInArrayLoop,
    ForInDictLoop,
    Return,
    Import,
    When,
    ExpressionStatement,
    BinaryOp,
    UnaryOp,
    Call,
    MethodCall,
    MemberAccess,
    Identifier,
    Number,
    StringLit,
    FString,
    CharLit,
    Boolean,
    DictLiteral,
    ArrayLiteral,
    ArrayAccess,
    DictAccess,
    Block,
    TypeNode,
    EnumDecl,
    StructDecl,
    Halt,
    Next,
    Lambda,
    Ternary,
    Assert,
    Defer,
}
