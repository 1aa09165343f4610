use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneParseError {
    #[error("line {line}: expected {expected}, got {found}")]
    Unexpected {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("line {line}: invalid number `{text}`")]
    InvalidNumber { line: usize, text: String },

    #[error("line {line}: unknown variable @{name}")]
    UnknownVariable { line: usize, name: String },

    #[error("line {line}: vector literal must have 2, 3 or 4 components, got {count}")]
    InvalidVector { line: usize, count: usize },

    #[error("line {line}: block `[{open}]` closed by `[/{close}]`")]
    MismatchedClose {
        line: usize,
        open: String,
        close: String,
    },

    #[error("line {line}: field `{field}` must be {expected}")]
    InvalidField {
        line: usize,
        field: &'static str,
        expected: &'static str,
    },

    #[error("duplicate node key `{0}`")]
    DuplicateKey(String),

    #[error("nodes `{first}` and `{second}` both resolve to path `{path}`")]
    DuplicatePath {
        path: String,
        first: String,
        second: String,
    },

    #[error("line {line}: unterminated string literal")]
    UnterminatedString { line: usize },

    #[error("scene root `{0}` not found in node list")]
    MissingRoot(String),

    #[error("scene has no root node")]
    NoRoot,

    #[error("node `{node}` references unknown parent `{parent}`")]
    UnknownParent { node: String, parent: String },

    #[error("node `{0}` has no parent and is not the scene root")]
    OrphanNode(String),

    #[error("node `{0}` is part of a parent cycle")]
    ParentCycle(String),
}
