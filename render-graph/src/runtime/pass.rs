//! Generic runtime pass built from a graph node.

use std::collections::BTreeMap;

use super::{CommandStream, FrameContext, PassError, RecordedCommand, RenderNode, ResourceTable};
use crate::compiler::PhysicalResourceId;
use crate::graph::{Node, PassKind};
use crate::resource::ResourceRole;

/// Runtime pass that records reads and writes of its bound ports.
///
/// Shading work lives behind the graphics backend; this node only carries
/// the resource contract its kind declares.
#[derive(Debug, Clone)]
pub struct PassNode {
    name: String,
    kind: PassKind,
    /// Port names and roles in declaration order.
    ports: Vec<(String, ResourceRole)>,
    bindings: BTreeMap<String, PhysicalResourceId>,
}

impl PassNode {
    pub fn from_node(node: &Node) -> Self {
        Self {
            name: node.name.clone(),
            kind: node.kind,
            ports: node
                .resources
                .iter()
                .map(|r| (r.name().to_string(), r.role()))
                .collect(),
            bindings: BTreeMap::new(),
        }
    }

    /// Resource bound to a port, if any.
    pub fn binding(&self, port: &str) -> Option<PhysicalResourceId> {
        self.bindings.get(port).copied()
    }

    pub fn bindings(&self) -> &BTreeMap<String, PhysicalResourceId> {
        &self.bindings
    }
}

impl RenderNode for PassNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PassKind {
        self.kind
    }

    fn initialize(&mut self, resources: &ResourceTable) -> Result<(), PassError> {
        for (port, &resource) in &self.bindings {
            if !resources.contains(resource) {
                return Err(PassError::MissingResource {
                    node: self.name.clone(),
                    port: port.clone(),
                    resource,
                });
            }
        }
        for (port, _) in self.ports.iter().filter(|(p, _)| !self.bindings.contains_key(p)) {
            log::debug!("Pass '{}': port '{}' left unbound", self.name, port);
        }
        Ok(())
    }

    fn execute(&self, commands: &mut CommandStream, frame: &FrameContext<'_>) {
        commands.push(RecordedCommand::BeginPass {
            name: self.name.clone(),
            frame_index: frame.frame_index,
        });
        for (port, role) in &self.ports {
            let Some(&resource) = self.bindings.get(port) else {
                continue;
            };
            let port = port.clone();
            commands.push(match role {
                ResourceRole::Output => RecordedCommand::Write { port, resource },
                ResourceRole::Input | ResourceRole::Unknown => {
                    RecordedCommand::Read { port, resource }
                }
            });
        }
        commands.push(RecordedCommand::EndPass);
    }

    fn set_resource(&mut self, port: &str, resource: PhysicalResourceId) -> bool {
        if !self.ports.iter().any(|(p, _)| p == port) {
            return false;
        }
        self.bindings.insert(port.to_string(), resource);
        true
    }
}
