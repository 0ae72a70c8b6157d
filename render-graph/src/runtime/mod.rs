//! Runtime side of a compiled graph.
//!
//! A [`RenderPath`] is the compiled artifact the frame loop consumes: an
//! ordered list of [`RenderNode`]s and the table of physical resources they
//! were wired to. The frame loop holds the active path in a
//! [`RenderPathSlot`] and swaps it wholesale after a successful recompile.
//!
//! Nodes execute strictly in list order within one [`CommandStream`] per
//! frame. Resource aliasing relies on that order: a physical image is only
//! safe to share because its users never overlap in execution order.

mod factory;
mod pass;
mod path;
mod slot;

pub use factory::{DefaultNodeFactory, NodeFactory};
pub use pass::PassNode;
pub use path::{GraphResource, RenderPath, ResourceTable};
pub use slot::RenderPathSlot;

use thiserror::Error;

use crate::compiler::PhysicalResourceId;
use crate::graph::PassKind;
use crate::types::Extent2d;

/// Errors raised while preparing a render path for execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PassError {
    #[error("node '{node}' port '{port}' is bound to missing resource {resource}")]
    MissingResource {
        node: String,
        port: String,
        resource: PhysicalResourceId,
    },

    #[error("node '{node}' failed to initialize: {reason}")]
    InitializationFailed { node: String, reason: String },
}

/// Errors raised when handing a compile result to a [`RenderPathSlot`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdoptError {
    #[error("compile failed: {0}")]
    CompileFailed(String),

    #[error(transparent)]
    Initialization(#[from] PassError),
}

/// Per-frame state passed to every node.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub frame_index: u64,
    pub render_resolution: Extent2d,
    pub resources: &'a ResourceTable,
}

/// A runtime pass instantiated from a graph node.
pub trait RenderNode: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> PassKind;

    /// Called once after compilation, before the first `execute`.
    fn initialize(&mut self, resources: &ResourceTable) -> Result<(), PassError>;

    /// Records this node's work for one frame.
    fn execute(&self, commands: &mut CommandStream, frame: &FrameContext<'_>);

    /// Binds a physical resource to a port. Returns false if the node has no
    /// port with that name.
    fn set_resource(&mut self, port: &str, resource: PhysicalResourceId) -> bool;
}

// ============================================================================
// Command recording
// ============================================================================

/// A command recorded by a render node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCommand {
    BeginPass { name: String, frame_index: u64 },
    Read { port: String, resource: PhysicalResourceId },
    Write { port: String, resource: PhysicalResourceId },
    EndPass,
}

/// Command stream for one frame.
#[derive(Debug, Default, Clone)]
pub struct CommandStream {
    commands: Vec<RecordedCommand>,
}

impl CommandStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: RecordedCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Names of the passes recorded, in order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                RecordedCommand::BeginPass { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}
