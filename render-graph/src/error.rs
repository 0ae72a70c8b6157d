//! Error types for graph editing and compilation.

use thiserror::Error;

use crate::backend::BackendError;
use crate::compiler::PhysicalResourceId;
use crate::graph::{EdgeId, NodeId, PassKind};
use crate::resource::{ResourceRole, ResourceType};

/// Fatal compile errors. Any of these aborts the compile and no render path
/// is produced.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("missing root: graph must contain a SceneProvider node")]
    MissingRoot,

    #[error("graph contains {count} SceneProvider nodes, expected exactly one")]
    MultipleRoots { count: usize },

    #[error("given graph is not acyclic: nodes {nodes:?} form a cycle")]
    Cycle { nodes: Vec<NodeId> },

    #[error("resource '{resource}' of bucket {bucket} has unsupported type {resource_type}")]
    UnsupportedResourceType {
        bucket: PhysicalResourceId,
        resource: String,
        resource_type: ResourceType,
    },

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Edit-time validation errors raised by [`GraphEditor`](crate::graph::GraphEditor).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("node {node} has no port named '{port}'")]
    UnknownPort { node: NodeId, port: String },

    #[error("edge {0} does not exist")]
    UnknownEdge(EdgeId),

    #[error("cannot link node {0} to itself")]
    SelfLink(NodeId),

    #[error("cannot link {start} port to {end} port")]
    RoleMismatch { start: ResourceRole, end: ResourceRole },

    #[error("cannot link {start} to {end}: resource types differ")]
    TypeMismatch { start: ResourceType, end: ResourceType },

    #[error("input '{port}' on node {node} is already connected")]
    InputAlreadyConnected { node: NodeId, port: String },

    #[error("an identical edge already exists ({0})")]
    DuplicateEdge(EdgeId),

    #[error("graph already has a {0} node")]
    SingletonExists(PassKind),

    #[error("invalid graph description: {0}")]
    InvalidDescription(String),
}

/// Errors raised while loading a [`CompilerConfig`](crate::config::CompilerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CompileError::MissingRoot;
        assert!(err.to_string().contains("missing root"));

        let err = CompileError::Cycle {
            nodes: vec![NodeId(1), NodeId(2)],
        };
        assert!(err.to_string().contains("not acyclic"));

        let err = EditorError::SingletonExists(PassKind::Present);
        assert_eq!(err.to_string(), "graph already has a Present node");
    }
}
