//! Render graph compilation.
//!
//! Turns a snapshot of the editable graph into a [`RenderPath`]:
//!
//! 1. **Reachability** - drop nodes not reachable from the SceneProvider
//! 2. **Topological sort** - deterministic execution order, fails on cycles
//! 3. **Lifetime optimization** - pack compatible images with disjoint
//!    lifetimes into shared physical resources
//! 4. **Instantiation** - allocate images, wrap scene handles
//! 5. **Node construction and wiring** - build runtime nodes and bind every
//!    port to its physical resource
//!
//! Any failure in steps 1, 2 or 4 aborts the compile: the result carries the
//! error and the logs gathered so far, and no render path.
//!
//! # Example
//!
//! ```ignore
//! use redlilium_render_graph::{
//!     CompileContext, CompilerConfig, DefaultNodeFactory, DummyBackend, GraphEditor,
//!     RenderGraphCompiler, RenderPathSlot, SceneHandles,
//! };
//!
//! let editor = GraphEditor::new();
//! let backend = DummyBackend::new();
//! let ctx = CompileContext::new(&backend, &DefaultNodeFactory, SceneHandles::default());
//!
//! let (nodes, edges) = editor.snapshot();
//! let result = RenderGraphCompiler::new(CompilerConfig::default()).compile(&nodes, &edges, false, &ctx);
//!
//! let slot = RenderPathSlot::new();
//! slot.adopt(result)?;
//! ```
//!
//! [`RenderPath`]: crate::runtime::RenderPath

mod compile;
mod optimizer;
mod range;
pub mod reachability;
pub mod report;
pub mod topological_sort;

pub use compile::{CompileContext, CompileResult, RenderGraphCompiler};
pub use optimizer::{
    OptimizerResource, PhysicalResourceId, ResourceInfo, ResourceOptimizationResult,
    ResourceOptimizer, ResourceUserInfo, UsagePoint,
};
pub use range::Range;
