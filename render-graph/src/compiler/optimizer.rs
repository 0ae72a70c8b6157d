//! Resource lifetime analysis and aliasing.
//!
//! Every output port of every node in execution order is a *logical*
//! resource. Its lifetime is the set of execution-order indices that touch
//! it: the producer's index plus one index per consumer. Logical images
//! whose lifetimes do not overlap, and whose format, size and usage match
//! exactly, are packed into one *physical* bucket ([`OptimizerResource`]).
//!
//! Packing is greedy first-fit in processing order, so the bucket count is
//! not guaranteed to be minimal. Scene-handle resources (camera, draw list,
//! acceleration structure, scene) are never aliased and always get a bucket
//! of their own.
//!
//! The overlap test compares lifetime *envelopes* (`[min, max]` of the
//! usage indices), which is conservative: two lifetimes whose envelopes
//! overlap are never merged even if their exact index sets are disjoint.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::graph::{Edge, Node, NodeId};
use crate::resource::{ResourceId, ResourceRole, ResourceSpecification, ResourceType};

use super::Range;

/// Identifier of a physical resource bucket, assigned from 0 per compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhysicalResourceId(pub u32);

impl std::fmt::Display for PhysicalResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Logical resources
// ============================================================================

/// A node port that consumes a logical resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceUserInfo {
    pub node_id: NodeId,
    /// Position of the consuming node in execution order.
    pub node_index: usize,
    pub node_name: String,
    pub resource_id: ResourceId,
    pub resource_name: String,
    pub role: ResourceRole,
}

/// One output port, seen as a logical resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceInfo {
    pub origin_node_id: NodeId,
    /// Position of the producing node in execution order.
    pub origin_node_index: usize,
    pub origin_node_name: String,
    pub origin_resource_id: ResourceId,
    pub origin_resource_name: String,
    pub spec: ResourceSpecification,
    /// Only images and depth images may be aliased.
    pub optimizable: bool,
    pub users: Vec<ResourceUserInfo>,
}

impl ResourceInfo {
    pub fn resource_type(&self) -> ResourceType {
        self.spec.resource_type
    }

    /// Usage points of this resource: its producer followed by its consumers.
    pub fn usage_points(&self) -> Vec<UsagePoint> {
        let origin = UsagePoint {
            index: self.origin_node_index,
            resource_id: self.origin_resource_id,
            port_name: self.origin_resource_name.clone(),
            node_id: self.origin_node_id,
            node_name: self.origin_node_name.clone(),
            role: ResourceRole::Output,
        };
        std::iter::once(origin)
            .chain(self.users.iter().map(|user| UsagePoint {
                index: user.node_index,
                resource_id: self.origin_resource_id,
                port_name: user.resource_name.clone(),
                node_id: user.node_id,
                node_name: user.node_name.clone(),
                role: user.role,
            }))
            .collect()
    }

    /// Lifetime envelope over execution-order indices.
    pub fn range(&self) -> Range {
        self.users.iter().fold(Range::point(self.origin_node_index), |range, user| {
            range.extended(user.node_index)
        })
    }
}

// ============================================================================
// Physical buckets
// ============================================================================

/// One execution-order index at which a bucket is read or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsagePoint {
    pub index: usize,
    /// Logical resource (origin output port) this usage belongs to.
    pub resource_id: ResourceId,
    /// Port name on the using node; this is what gets wired.
    pub port_name: String,
    pub node_id: NodeId,
    pub node_name: String,
    pub role: ResourceRole,
}

/// A physical resource shared by one or more logical resources.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerResource {
    pub id: PhysicalResourceId,
    /// Signature the bucket was created with.
    pub spec: ResourceSpecification,
    /// First logical resource placed in the bucket.
    pub origin: ResourceInfo,
    /// Origin port ids of every logical resource in the bucket.
    pub logical_resources: Vec<ResourceId>,
    /// Sorted by index. Several entries may share an index when one node
    /// uses the resource through more than one port.
    pub usage_points: Vec<UsagePoint>,
    range: Range,
}

impl OptimizerResource {
    fn new(id: PhysicalResourceId, info: &ResourceInfo) -> Self {
        let mut usage_points = info.usage_points();
        usage_points.sort_by_key(|p| p.index);
        Self {
            id,
            spec: info.spec.clone(),
            origin: info.clone(),
            logical_resources: vec![info.origin_resource_id],
            usage_points,
            range: info.range(),
        }
    }

    pub fn resource_type(&self) -> ResourceType {
        self.spec.resource_type
    }

    /// Envelope of all usage points.
    pub fn range(&self) -> Range {
        self.range
    }

    pub fn is_used_at(&self, index: usize) -> bool {
        self.usage_points.iter().any(|p| p.index == index)
    }

    /// Whether `info` may be merged into this bucket.
    fn accepts(&self, info: &ResourceInfo) -> bool {
        self.origin.optimizable
            && !self.range.overlaps(&info.range())
            && self.spec.is_alias_compatible(&info.spec)
    }

    /// Adds a logical resource's usage points. Returns the indices that were
    /// already in use by the bucket.
    pub(crate) fn merge(&mut self, info: &ResourceInfo) -> Vec<usize> {
        let incoming = info.usage_points();
        let mut conflicts: Vec<usize> = incoming
            .iter()
            .map(|p| p.index)
            .filter(|&index| self.is_used_at(index))
            .collect();
        conflicts.dedup();

        self.usage_points.extend(incoming);
        self.usage_points.sort_by_key(|p| p.index);
        self.range = self.range.union(&info.range());
        self.logical_resources.push(info.origin_resource_id);
        conflicts
    }
}

/// Summary of one optimizer run.
#[derive(Debug, Clone)]
pub struct ResourceOptimizationResult {
    pub messages: Vec<String>,
    pub non_optimizable_count: usize,
    pub optimized_resource_count: usize,
    pub original_resource_count: usize,
    pub resources: Vec<OptimizerResource>,
    pub original_resources: Vec<ResourceInfo>,
    /// Execution-order range `[0, n - 1]`, or `None` for an empty node list.
    pub timeline: Option<Range>,
    pub elapsed: Duration,
}

impl ResourceOptimizationResult {
    /// Number of logical resources that were eligible for aliasing.
    pub fn optimizable_resource_count(&self) -> usize {
        self.original_resource_count - self.non_optimizable_count
    }

    /// Number of logical resources saved by aliasing.
    pub fn aliased_resource_count(&self) -> usize {
        self.original_resource_count - self.optimized_resource_count
    }

    pub fn resource(&self, id: PhysicalResourceId) -> Option<&OptimizerResource> {
        self.resources.iter().find(|r| r.id == id)
    }
}

// ============================================================================
// Optimizer
// ============================================================================

/// Greedy first-fit lifetime packer. One instance per compile.
#[derive(Debug)]
pub struct ResourceOptimizer {
    next_id: u32,
    aliasing: bool,
    messages: Vec<String>,
}

impl Default for ResourceOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceOptimizer {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            aliasing: true,
            messages: Vec::new(),
        }
    }

    /// An optimizer that gives every logical resource its own bucket.
    pub fn without_aliasing() -> Self {
        Self {
            aliasing: false,
            ..Self::new()
        }
    }

    fn message(&mut self, text: String) {
        log::debug!("{text}");
        self.messages.push(text);
    }

    fn next_id(&mut self) -> PhysicalResourceId {
        let id = PhysicalResourceId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Packs the output resources of `nodes`, which must be in execution order.
    pub fn run(mut self, nodes: &[Node], edges: &[Edge]) -> ResourceOptimizationResult {
        let started = Instant::now();
        let original_resources = self.collect_resources(nodes, edges);

        let mut buckets: Vec<OptimizerResource> = Vec::new();
        let mut non_optimizable_count = 0;
        for info in &original_resources {
            if !info.optimizable {
                non_optimizable_count += 1;
                let bucket = OptimizerResource::new(self.next_id(), info);
                self.message(format!(
                    "[Optimizer] New, non-optimizable resource with id {} added of type {}",
                    bucket.id,
                    info.resource_type()
                ));
                buckets.push(bucket);
                continue;
            }

            let target = if self.aliasing {
                buckets.iter_mut().find(|b| b.accepts(info))
            } else {
                None
            };
            match target {
                Some(bucket) => {
                    let conflicts = bucket.merge(info);
                    let id = bucket.id;
                    if !conflicts.is_empty() {
                        log::warn!(
                            "Resource '{}' of node '{}' shares usage points {:?} with resource {}",
                            info.origin_resource_name,
                            info.origin_node_name,
                            conflicts,
                            id
                        );
                        self.message(format!(
                            "[Optimizer] Warning: usage points {:?} already present in resource {}",
                            conflicts, id
                        ));
                    }
                    self.message(format!(
                        "[Optimizer] Resource '{}' of node '{}' merged into resource with id {}",
                        info.origin_resource_name, info.origin_node_name, id
                    ));
                }
                None => {
                    let bucket = OptimizerResource::new(self.next_id(), info);
                    self.message(format!(
                        "[Optimizer] New, optimizable resource with id {} added of type {}",
                        bucket.id,
                        info.resource_type()
                    ));
                    buckets.push(bucket);
                }
            }
        }

        let elapsed = started.elapsed();
        log::debug!(
            "Optimizer: {} logical resources packed into {} ({} non-optimizable) in {:?}",
            original_resources.len(),
            buckets.len(),
            non_optimizable_count,
            elapsed
        );
        ResourceOptimizationResult {
            messages: self.messages,
            non_optimizable_count,
            optimized_resource_count: buckets.len(),
            original_resource_count: original_resources.len(),
            resources: buckets,
            original_resources,
            timeline: nodes.len().checked_sub(1).map(|last| Range::span(0, last)),
            elapsed,
        }
    }

    /// Builds one [`ResourceInfo`] per output port, with its consumers.
    fn collect_resources(&mut self, nodes: &[Node], edges: &[Edge]) -> Vec<ResourceInfo> {
        let position: HashMap<NodeId, usize> =
            nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();

        let mut infos = Vec::new();
        for (index, node) in nodes.iter().enumerate() {
            for output in node.outputs() {
                let mut users = Vec::new();
                for edge in edges
                    .iter()
                    .filter(|e| e.start.is(node.id, output.id) && e.end.node_id != node.id)
                {
                    let Some(&user_index) = position.get(&edge.end.node_id) else {
                        self.message(format!(
                            "[Optimizer] Ignoring edge {} to node {} outside the compiled graph",
                            edge.id, edge.end.node_id
                        ));
                        continue;
                    };
                    let user = &nodes[user_index];
                    let role = user
                        .resource(edge.end.resource_id)
                        .map_or(ResourceRole::Input, |r| r.role());
                    users.push(ResourceUserInfo {
                        node_id: user.id,
                        node_index: user_index,
                        node_name: user.name.clone(),
                        resource_id: edge.end.resource_id,
                        resource_name: edge.end.resource_name.clone(),
                        role,
                    });
                }

                infos.push(ResourceInfo {
                    origin_node_id: node.id,
                    origin_node_index: index,
                    origin_node_name: node.name.clone(),
                    origin_resource_id: output.id,
                    origin_resource_name: output.name().to_string(),
                    spec: output.spec.clone(),
                    optimizable: output.resource_type().is_optimizable(),
                    users,
                });
            }
        }
        infos
    }
}
