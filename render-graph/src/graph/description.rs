//! Serializable graph description.
//!
//! Nodes are named by a file-local key and instantiated from the pass
//! catalogue; links name ports by node key and port name. Stored as RON.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{GraphEditor, NodeId, PassKind};
use crate::error::EditorError;

/// A node entry: catalogue kind plus an optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescription {
    pub key: String,
    pub kind: PassKind,
    #[serde(default)]
    pub name: Option<String>,
}

/// A port addressed by node key and port name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRef {
    pub node: String,
    pub port: String,
}

impl PortRef {
    pub fn new(node: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            port: port.into(),
        }
    }
}

/// A link from an output port to an input port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDescription {
    pub from: PortRef,
    pub to: PortRef,
}

/// Serializable form of a render graph.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphDescription {
    pub nodes: Vec<NodeDescription>,
    #[serde(default)]
    pub links: Vec<LinkDescription>,
}

impl GraphDescription {
    pub fn from_ron(source: &str) -> Result<Self, EditorError> {
        ron::from_str(source).map_err(|e| EditorError::InvalidDescription(e.to_string()))
    }

    pub fn to_ron(&self) -> Result<String, EditorError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| EditorError::InvalidDescription(e.to_string()))
    }

    fn node(&mut self, key: &str, kind: PassKind) -> &mut Self {
        self.nodes.push(NodeDescription {
            key: key.to_string(),
            kind,
            name: None,
        });
        self
    }

    fn link(&mut self, from: (&str, &str), to: (&str, &str)) -> &mut Self {
        self.links.push(LinkDescription {
            from: PortRef::new(from.0, from.1),
            to: PortRef::new(to.0, to.1),
        });
        self
    }

    /// Deferred lighting pipeline: G-buffer, ambient occlusion, lighting,
    /// anti-aliasing and present.
    pub fn deferred_lighting() -> Self {
        let mut desc = Self::default();
        desc.node("scene", PassKind::SceneProvider)
            .node("gbuffer", PassKind::GBuffer)
            .node("ao", PassKind::AmbientOcclusion)
            .node("lighting", PassKind::Lighting)
            .node("aa", PassKind::AntiAliasing)
            .node("present", PassKind::Present);
        desc.link(("scene", "Scene"), ("gbuffer", "Scene"))
            .link(("gbuffer", "Position"), ("ao", "Position"))
            .link(("gbuffer", "Normal"), ("ao", "Normal"))
            .link(("scene", "Camera"), ("ao", "Camera"))
            .link(("scene", "TLAS"), ("ao", "TLAS"))
            .link(("scene", "Camera"), ("lighting", "Camera"))
            .link(("scene", "TLAS"), ("lighting", "TLAS"))
            .link(("gbuffer", "Position"), ("lighting", "Position"))
            .link(("gbuffer", "Normal"), ("lighting", "Normal"))
            .link(("gbuffer", "Albedo"), ("lighting", "Albedo"))
            .link(("gbuffer", "Depth"), ("lighting", "Depth"))
            .link(("ao", "AO Image"), ("lighting", "AO Image"))
            .link(("lighting", "Lighting Result"), ("aa", "Image"))
            .link(("aa", "Anti-Aliased Image"), ("present", "Final Image"));
        desc
    }
}

impl GraphEditor {
    /// Builds an editor from a description, validating every link.
    pub fn from_description(desc: &GraphDescription) -> Result<Self, EditorError> {
        let mut editor = GraphEditor::empty();
        let mut keys: HashMap<&str, NodeId> = HashMap::new();

        for node in &desc.nodes {
            let name = node
                .name
                .clone()
                .unwrap_or_else(|| node.kind.display_name().to_string());
            let id = editor.add_named_node(node.kind, name)?;
            if keys.insert(node.key.as_str(), id).is_some() {
                return Err(EditorError::InvalidDescription(format!(
                    "duplicate node key '{}'",
                    node.key
                )));
            }
        }

        let lookup = |key: &str| {
            keys.get(key).copied().ok_or_else(|| {
                EditorError::InvalidDescription(format!("link references unknown node '{key}'"))
            })
        };
        for link in &desc.links {
            let from = lookup(&link.from.node)?;
            let to = lookup(&link.to.node)?;
            editor.connect(from, &link.from.port, to, &link.to.port)?;
        }
        Ok(editor)
    }

    /// Describes the current graph. Node keys are derived from node ids.
    ///
    /// Nodes are re-created from the catalogue on load, so custom port sets
    /// do not survive a round trip.
    pub fn to_description(&self) -> GraphDescription {
        let key = |id: NodeId| format!("node{}", id.0);
        GraphDescription {
            nodes: self
                .nodes()
                .iter()
                .map(|n| NodeDescription {
                    key: key(n.id),
                    kind: n.kind,
                    name: (n.name != n.kind.display_name()).then(|| n.name.clone()),
                })
                .collect(),
            links: self
                .edges()
                .iter()
                .map(|e| LinkDescription {
                    from: PortRef::new(key(e.start.node_id), e.start.resource_name.clone()),
                    to: PortRef::new(key(e.end.node_id), e.end.resource_name.clone()),
                })
                .collect(),
        }
    }
}
