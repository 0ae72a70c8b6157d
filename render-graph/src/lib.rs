//! # RedLilium Render Graph
//!
//! Compiler from an editable graph of render passes to an executable,
//! resource-optimized frame plan.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`GraphEditor`] - Validating owner of the editable node/edge graph
//! - [`RenderGraphCompiler`] - Reachability, ordering, aliasing and wiring
//! - [`ResourceOptimizer`] - Greedy lifetime packing of compatible images
//! - [`RenderPath`] - Compiled artifact executed once per frame
//! - [`RenderPathSlot`] - Atomically swappable active render path
//! - [`DummyBackend`] - Resource factory for tests and tooling
//!
//! ## Example
//!
//! ```ignore
//! use redlilium_render_graph::*;
//!
//! let mut editor = GraphEditor::from_description(&GraphDescription::deferred_lighting())?;
//! let backend = DummyBackend::new();
//! let ctx = CompileContext::new(&backend, &DefaultNodeFactory, SceneHandles::default());
//!
//! let (nodes, edges) = editor.snapshot();
//! let result = RenderGraphCompiler::new(CompilerConfig::default()).compile(&nodes, &edges, false, &ctx);
//!
//! let slot = RenderPathSlot::new();
//! slot.adopt(result)?;
//! if let Some(path) = slot.current() {
//!     let mut commands = CommandStream::new();
//!     path.execute(&mut commands, 0);
//! }
//! ```

pub mod backend;
pub mod compiler;
pub mod config;
pub mod error;
pub mod graph;
pub mod resource;
pub mod runtime;
pub mod types;

// Re-export main types for convenience
#[cfg(feature = "dummy")]
pub use backend::DummyBackend;
pub use backend::{BackendError, GpuImage, ImageHandle, ResourceFactory, SceneHandles};
pub use compiler::{
    CompileContext, CompileResult, OptimizerResource, PhysicalResourceId, Range,
    RenderGraphCompiler, ResourceOptimizationResult, ResourceOptimizer,
};
pub use config::{CompileStrategy, CompilerConfig};
pub use error::{CompileError, ConfigError, EditorError};
pub use graph::{Edge, EdgeId, GraphDescription, GraphEditor, Node, NodeId, PassKind};
pub use resource::{
    ResourceDescription, ResourceId, ResourceRole, ResourceSpecification, ResourceType,
};
pub use runtime::{
    AdoptError, CommandStream, DefaultNodeFactory, FrameContext, NodeFactory, PassError,
    RecordedCommand, RenderNode, RenderPath, RenderPathSlot,
};
pub use types::{Extent2d, TextureDescriptor, TextureFormat, TextureSize, TextureUsage};

/// Render graph library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
