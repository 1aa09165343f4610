use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Member type has no wire mapping; registered as `Nil`.
    UnrecognizedType,
    /// `Subtype` argument does not name a wire subtype; ignored.
    InvalidSubtype,
    /// `WithPeer` on a function without parameters.
    MissingPeerParameter,
    /// A requested root is not a network scene and registers nothing.
    NotNetworkScene,
}

/// Non-fatal finding of a compiler run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub scene: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, scene: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            scene: scene.to_string(),
            node_path: None,
            member: None,
            message: message.into(),
        }
    }

    pub fn at(mut self, node_path: &str, member: &str) -> Self {
        self.node_path = Some(node_path.to_string());
        self.member = Some(member.to_string());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.scene)?;
        if let Some(node_path) = &self.node_path {
            write!(f, " [{node_path}]")?;
        }
        if let Some(member) = &self.member {
            write!(f, " {member}")?;
        }
        write!(f, ": {}", self.message)
    }
}
