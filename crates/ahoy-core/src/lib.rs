//! Library facade for the Ahoy front end (§6).
//!
//! This is the only crate a downstream code generator or linter talks
//! to. It wires the lexer and parser together behind two entry points --
//! [`compile`] (strict, aborts on the first structural error) and
//! [`lint`] (never fails, accumulates diagnostics) -- and derives the
//! flat tables (imports/functions/structs/enums) a code generator needs
//! from one walk over the root `program` node's direct children. It
//! contains no codegen, formatting, or LSP logic of its own.

use ahoy_parser::{Diagnostic, Node, NodeKind};
use serde::Serialize;

/// One parsed compilation unit: the AST plus whatever a downstream
/// consumer would otherwise have to re-derive by walking it themselves
/// (§6 "Output to code generator" / "Output to linter/LSP").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompileUnit {
    pub ast: Node,
    pub diagnostics: Vec<DiagnosticRecord>,
    pub imports: Vec<ImportSummary>,
    pub functions: Vec<FunctionSummary>,
    pub structs: Vec<StructSummary>,
    pub enums: Vec<EnumSummary>,
}

/// A serializable mirror of [`ahoy_parser::Diagnostic`] (`Diagnostic`
/// itself only derives the standard error traits, not `Serialize`, since
/// it is also used as the `Err` case of [`compile`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticRecord {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

impl From<&Diagnostic> for DiagnosticRecord {
    fn from(d: &Diagnostic) -> Self {
        Self {
            message: d.message.clone(),
            line: d.line,
            column: d.column,
        }
    }
}

/// One `import` declaration (§3): `path` is the literal lexeme
/// (quotes included, per §6's "preserve verbatim" contract), `namespace`
/// is the optional leading identifier, empty when the import is
/// unnamed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSummary {
    pub path: String,
    pub namespace: String,
    pub line: u32,
}

/// One parameter of a [`FunctionSummary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSummary {
    pub name: String,
    pub data_type: String,
    pub has_default: bool,
}

/// One top-level function declaration, in either the primary `::` or
/// legacy `func` form -- the AST makes no distinction between the two
/// once parsed (§4.4).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionSummary {
    pub name: String,
    pub return_type: String,
    pub params: Vec<ParamSummary>,
    pub line: u32,
}

/// One struct field or nested `type` member, flattened to `name:type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSummary {
    pub name: String,
    pub data_type: String,
}

/// One top-level `struct` declaration. Nested `type` sub-blocks are
/// reported as a field whose `data_type` is empty and whose nested
/// fields are listed separately in `nested`, mirroring the AST's own
/// `type_node` children (§3).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructSummary {
    pub name: String,
    pub fields: Vec<FieldSummary>,
    pub nested: Vec<(String, Vec<FieldSummary>)>,
    pub line: u32,
}

/// One top-level `enum` declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumSummary {
    pub name: String,
    pub members: Vec<String>,
    pub line: u32,
}

/// Compile `source` in strict mode (§7): the first structural error
/// aborts with a single fatal [`Diagnostic`].
pub fn compile(source: &str) -> Result<CompileUnit, Diagnostic> {
    let ast = ahoy_parser::parse_strict(source)?;
    Ok(build_unit(ast, Vec::new()))
}

/// Compile `source` in lint mode (§7): never fails, accumulating
/// diagnostics and recovering with placeholder nodes instead.
pub fn lint(source: &str) -> CompileUnit {
    let parse = ahoy_parser::parse_lint(source);
    build_unit(parse.ast, parse.errors)
}

fn build_unit(ast: Node, errors: Vec<Diagnostic>) -> CompileUnit {
    let diagnostics = errors.iter().map(DiagnosticRecord::from).collect();
    let mut imports = Vec::new();
    let mut functions = Vec::new();
    let mut structs = Vec::new();
    let mut enums = Vec::new();

    for child in &ast.children {
        match child.kind {
            NodeKind::Import => imports.push(ImportSummary {
                path: child.value.clone(),
                namespace: child.data_type.clone().unwrap_or_default(),
                line: child.line,
            }),
            NodeKind::Function => functions.push(summarize_function(child)),
            NodeKind::StructDecl => structs.push(summarize_struct(child)),
            NodeKind::EnumDecl => enums.push(EnumSummary {
                name: child.value.clone(),
                members: child.children.iter().map(|m| m.value.clone()).collect(),
                line: child.line,
            }),
            _ => {}
        }
    }

    CompileUnit {
        ast,
        diagnostics,
        imports,
        functions,
        structs,
        enums,
    }
}

/// A `function` node's children are `[params-block, body-block]` (§3);
/// the params block's children are parameter `identifier` nodes.
fn summarize_function(node: &Node) -> FunctionSummary {
    let params = node
        .children
        .first()
        .map(|params_block| {
            params_block
                .children
                .iter()
                .map(|param| ParamSummary {
                    name: param.value.clone(),
                    data_type: param.data_type.clone().unwrap_or_default(),
                    has_default: param.default_value.is_some(),
                })
                .collect()
        })
        .unwrap_or_default();
    FunctionSummary {
        name: node.value.clone(),
        return_type: node.data_type.clone().unwrap_or_default(),
        params,
        line: node.line,
    }
}

/// A `struct_declaration` node's children are field `identifier` nodes
/// (with `data_type` set) interleaved with nested `type` nodes (§3).
fn summarize_struct(node: &Node) -> StructSummary {
    let mut fields = Vec::new();
    let mut nested = Vec::new();
    for child in &node.children {
        match child.kind {
            NodeKind::TypeNode => nested.push((
                child.value.clone(),
                child
                    .children
                    .iter()
                    .map(|f| FieldSummary {
                        name: f.value.clone(),
                        data_type: f.data_type.clone().unwrap_or_default(),
                    })
                    .collect(),
            )),
            _ => fields.push(FieldSummary {
                name: child.value.clone(),
                data_type: child.data_type.clone().unwrap_or_default(),
            }),
        }
    }
    StructSummary {
        name: node.value.clone(),
        fields,
        nested,
        line: node.line,
    }
}
