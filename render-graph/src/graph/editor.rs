//! Headless graph editor.
//!
//! Owns a live node/edge collection and enforces the edit-time invariants
//! the compiler relies on: inputs accept at most one edge, both ends of an
//! edge carry the same resource type, edges never loop back to their own
//! node, no duplicate edges exist, and there is at most one SceneProvider
//! and one Present node.

use super::{Edge, EdgeEndpoint, EdgeId, Node, NodeId, PassKind};
use crate::error::EditorError;
use crate::resource::{ResourceDescription, ResourceId, ResourceRole, ResourceSpecification};

/// Validating owner of an editable render graph.
#[derive(Debug, Clone, Default)]
pub struct GraphEditor {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    /// Shared sequence for node, port and edge ids.
    next_id: u32,
}

impl GraphEditor {
    /// Creates an editor seeded with a SceneProvider, a GBuffer and a Present node.
    pub fn new() -> Self {
        let mut editor = Self::empty();
        for kind in [PassKind::SceneProvider, PassKind::GBuffer, PassKind::Present] {
            editor.insert_node(kind.display_name().to_string(), kind, kind.resource_specs());
        }
        editor
    }

    /// Creates an editor with no nodes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a node of the given kind with its catalogue ports.
    pub fn add_node(&mut self, kind: PassKind) -> Result<NodeId, EditorError> {
        self.add_named_node(kind, kind.display_name())
    }

    /// Adds a node of the given kind under a custom display name.
    pub fn add_named_node(
        &mut self,
        kind: PassKind,
        name: impl Into<String>,
    ) -> Result<NodeId, EditorError> {
        self.add_custom_node(name, kind, kind.resource_specs())
    }

    /// Adds a node with an explicit port list.
    pub fn add_custom_node(
        &mut self,
        name: impl Into<String>,
        kind: PassKind,
        specs: Vec<ResourceSpecification>,
    ) -> Result<NodeId, EditorError> {
        if kind.is_singleton() && self.find_node(kind).is_some() {
            return Err(EditorError::SingletonExists(kind));
        }
        Ok(self.insert_node(name.into(), kind, specs))
    }

    fn insert_node(&mut self, name: String, kind: PassKind, specs: Vec<ResourceSpecification>) -> NodeId {
        let id = NodeId(self.allocate_id());
        let resources = specs
            .into_iter()
            .map(|spec| ResourceDescription::new(ResourceId(self.allocate_id()), spec))
            .collect();
        log::debug!("Editor: added node {} '{}' ({:?})", id, name, kind);
        self.nodes.push(Node::new(id, name, kind, resources));
        id
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Removes a node and every edge touching it.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node, EditorError> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or(EditorError::UnknownNode(id))?;
        let node = self.nodes.remove(index);

        let (removed, kept): (Vec<Edge>, Vec<Edge>) = std::mem::take(&mut self.edges)
            .into_iter()
            .partition(|e| e.start.node_id == id || e.end.node_id == id);
        self.edges = kept;
        for edge in &removed {
            self.set_input_connected(&edge.end, false);
        }

        log::debug!(
            "Editor: removed node {} '{}' and {} edge(s)",
            id,
            node.name,
            removed.len()
        );
        Ok(node)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// First node of the given kind, in insertion order.
    pub fn find_node(&self, kind: PassKind) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.kind == kind).map(|n| n.id)
    }

    /// Looks up a port by node and port name.
    pub fn port(&self, node: NodeId, name: &str) -> Result<&ResourceDescription, EditorError> {
        self.node(node)
            .ok_or(EditorError::UnknownNode(node))?
            .resource_by_name(name)
            .ok_or_else(|| EditorError::UnknownPort {
                node,
                port: name.to_string(),
            })
    }

    /// Connects two ports.
    ///
    /// The endpoints may be given in either order; the edge always runs from
    /// the output port to the input port.
    pub fn connect(
        &mut self,
        a_node: NodeId,
        a_port: &str,
        b_node: NodeId,
        b_port: &str,
    ) -> Result<EdgeId, EditorError> {
        let a = self.port(a_node, a_port)?.clone();
        let b = self.port(b_node, b_port)?.clone();

        let ((start_node, start), (end_node, end)) =
            if a.role() == ResourceRole::Input && b.role() == ResourceRole::Output {
                ((b_node, b), (a_node, a))
            } else {
                ((a_node, a), (b_node, b))
            };

        if start_node == end_node {
            return Err(EditorError::SelfLink(start_node));
        }
        if start.role() != ResourceRole::Output || end.role() != ResourceRole::Input {
            return Err(EditorError::RoleMismatch {
                start: start.role(),
                end: end.role(),
            });
        }
        if start.resource_type() != end.resource_type() {
            return Err(EditorError::TypeMismatch {
                start: start.resource_type(),
                end: end.resource_type(),
            });
        }

        let candidate = Edge::new(
            EdgeId(0),
            EdgeEndpoint::new(start_node, start.id, start.name()),
            EdgeEndpoint::new(end_node, end.id, end.name()),
            start.resource_type(),
        );
        if let Some(existing) = self.edges.iter().find(|e| e.same_ports(&candidate)) {
            return Err(EditorError::DuplicateEdge(existing.id));
        }
        if end.input_is_connected {
            return Err(EditorError::InputAlreadyConnected {
                node: end_node,
                port: end.name().to_string(),
            });
        }

        let edge = Edge {
            id: EdgeId(self.allocate_id()),
            ..candidate
        };
        self.set_input_connected(&edge.end, true);
        log::debug!(
            "Editor: linked {}:'{}' -> {}:'{}' as edge {}",
            edge.start.node_id,
            edge.start.resource_name,
            edge.end.node_id,
            edge.end.resource_name,
            edge.id
        );
        let id = edge.id;
        self.edges.push(edge);
        Ok(id)
    }

    /// Removes an edge and frees its input port.
    pub fn disconnect(&mut self, id: EdgeId) -> Result<Edge, EditorError> {
        let index = self
            .edges
            .iter()
            .position(|e| e.id == id)
            .ok_or(EditorError::UnknownEdge(id))?;
        let edge = self.edges.remove(index);
        self.set_input_connected(&edge.end, false);
        Ok(edge)
    }

    fn set_input_connected(&mut self, endpoint: &EdgeEndpoint, connected: bool) {
        if let Some(port) = self
            .nodes
            .iter_mut()
            .find(|n| n.id == endpoint.node_id)
            .and_then(|n| n.resource_mut(endpoint.resource_id))
        {
            port.input_is_connected = connected;
        }
    }

    /// By-value copy of the current graph for compilation.
    pub fn snapshot(&self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes.clone(), self.edges.clone())
    }
}
