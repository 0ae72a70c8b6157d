//! Graph model: pass nodes with typed resource ports and the edges that
//! connect an output port to an input port.
//!
//! The compiler never mutates these types. It takes a by-value snapshot of
//! the current nodes and edges (see [`GraphEditor::snapshot`]) and derives
//! everything else from it.
//!
//! # Architecture
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Node`] | One pass instance and its ports |
//! | [`Edge`] | Output port to input port connection |
//! | [`PassKind`] | Closed set of pass types and their port catalogue |
//! | [`GraphEditor`] | Validating owner of a live graph |
//! | [`GraphDescription`] | Serializable form of a graph |
//!
//! # Example
//!
//! ```ignore
//! use redlilium_render_graph::{GraphEditor, PassKind};
//!
//! let mut editor = GraphEditor::new();
//! let lighting = editor.add_node(PassKind::Lighting)?;
//! let gbuffer = editor.find_node(PassKind::GBuffer).unwrap();
//! editor.connect(gbuffer, "Position", lighting, "Position")?;
//! let (nodes, edges) = editor.snapshot();
//! ```

mod description;
mod editor;
mod pass_kind;

pub use description::{GraphDescription, LinkDescription, NodeDescription, PortRef};
pub use editor::GraphEditor;
pub use pass_kind::PassKind;

use serde::{Deserialize, Serialize};

use crate::resource::{ResourceDescription, ResourceId, ResourceRole, ResourceType};

/// Stable identifier of a node within one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier of an edge within one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Node
// ============================================================================

/// A vertex of the graph: one pass instance with an ordered list of ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub kind: PassKind,
    pub resources: Vec<ResourceDescription>,
}

impl Node {
    pub fn new(
        id: NodeId,
        name: impl Into<String>,
        kind: PassKind,
        resources: Vec<ResourceDescription>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            resources,
        }
    }

    /// Looks up a port by id.
    pub fn resource(&self, id: ResourceId) -> Option<&ResourceDescription> {
        self.resources.iter().find(|r| r.id == id)
    }

    /// Looks up a port by name.
    pub fn resource_by_name(&self, name: &str) -> Option<&ResourceDescription> {
        self.resources.iter().find(|r| r.name() == name)
    }

    /// Output ports in declaration order.
    pub fn outputs(&self) -> impl Iterator<Item = &ResourceDescription> {
        self.resources
            .iter()
            .filter(|r| r.role() == ResourceRole::Output)
    }

    /// Input ports in declaration order.
    pub fn inputs(&self) -> impl Iterator<Item = &ResourceDescription> {
        self.resources
            .iter()
            .filter(|r| r.role() == ResourceRole::Input)
    }

    pub(crate) fn resource_mut(&mut self, id: ResourceId) -> Option<&mut ResourceDescription> {
        self.resources.iter_mut().find(|r| r.id == id)
    }
}

// ============================================================================
// Edge
// ============================================================================

/// One end of an edge: a port on a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeEndpoint {
    pub node_id: NodeId,
    pub resource_id: ResourceId,
    pub resource_name: String,
}

impl EdgeEndpoint {
    pub fn new(node_id: NodeId, resource_id: ResourceId, resource_name: impl Into<String>) -> Self {
        Self {
            node_id,
            resource_id,
            resource_name: resource_name.into(),
        }
    }

    /// Whether this endpoint refers to the given port.
    pub fn is(&self, node_id: NodeId, resource_id: ResourceId) -> bool {
        self.node_id == node_id && self.resource_id == resource_id
    }
}

/// Directed connection from an output port to an input port.
///
/// Both ends carry the same [`ResourceType`], and an edge never connects a
/// node to itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub start: EdgeEndpoint,
    pub end: EdgeEndpoint,
    pub resource_type: ResourceType,
}

impl Edge {
    pub fn new(
        id: EdgeId,
        start: EdgeEndpoint,
        end: EdgeEndpoint,
        resource_type: ResourceType,
    ) -> Self {
        Self {
            id,
            start,
            end,
            resource_type,
        }
    }

    /// Whether this edge connects the same two ports as `other`.
    pub fn same_ports(&self, other: &Edge) -> bool {
        self.start.is(other.start.node_id, other.start.resource_id)
            && self.end.is(other.end.node_id, other.end.resource_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceSpecification;

    fn blur_node() -> Node {
        Node::new(
            NodeId(1),
            "Blur",
            PassKind::GaussianBlur,
            vec![
                ResourceDescription::new(
                    ResourceId(2),
                    ResourceSpecification::input("Image", ResourceType::Image),
                ),
                ResourceDescription::new(
                    ResourceId(3),
                    ResourceSpecification::output("Blurred Image", ResourceType::Image),
                ),
            ],
        )
    }

    #[test]
    fn test_node_port_lookup() {
        let node = blur_node();
        assert_eq!(node.resource(ResourceId(3)).map(|r| r.name()), Some("Blurred Image"));
        assert_eq!(node.resource_by_name("Image").map(|r| r.id), Some(ResourceId(2)));
        assert!(node.resource(ResourceId(9)).is_none());
    }

    #[test]
    fn test_node_inputs_and_outputs() {
        let node = blur_node();
        assert_eq!(node.inputs().count(), 1);
        assert_eq!(node.outputs().count(), 1);
    }

    #[test]
    fn test_edge_same_ports_ignores_id() {
        let a = Edge::new(
            EdgeId(1),
            EdgeEndpoint::new(NodeId(0), ResourceId(1), "Out"),
            EdgeEndpoint::new(NodeId(2), ResourceId(3), "In"),
            ResourceType::Image,
        );
        let mut b = a.clone();
        b.id = EdgeId(5);
        assert!(a.same_ports(&b));
    }
}
