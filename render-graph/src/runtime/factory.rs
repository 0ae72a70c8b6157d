//! Runtime node construction keyed by pass kind.

use super::{PassNode, RenderNode};
use crate::graph::{Node, PassKind};

/// Builds the runtime node for a graph node.
///
/// Returning `None` means the node has no runtime counterpart; it keeps its
/// place in the execution order but nothing is executed or wired for it.
pub trait NodeFactory {
    fn create(&self, node: &Node) -> Option<Box<dyn RenderNode>>;
}

impl<F> NodeFactory for F
where
    F: Fn(&Node) -> Option<Box<dyn RenderNode>>,
{
    fn create(&self, node: &Node) -> Option<Box<dyn RenderNode>> {
        self(node)
    }
}

/// Factory for the built-in pass catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNodeFactory;

impl NodeFactory for DefaultNodeFactory {
    fn create(&self, node: &Node) -> Option<Box<dyn RenderNode>> {
        match node.kind {
            // The provider only publishes scene handles.
            PassKind::SceneProvider | PassKind::Unknown => None,
            PassKind::GBuffer
            | PassKind::Lighting
            | PassKind::AmbientOcclusion
            | PassKind::AntiAliasing
            | PassKind::GaussianBlur
            | PassKind::Present => Some(Box::new(PassNode::from_node(node))),
        }
    }
}
