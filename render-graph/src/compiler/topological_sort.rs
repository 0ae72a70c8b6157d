//! Deterministic topological ordering of a node subset.
//!
//! Kahn's algorithm with a min-heap on node id as the ready set, so nodes
//! that do not depend on each other always come out in ascending id order
//! and an unchanged graph compiles to the same order every time.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::error::CompileError;
use crate::graph::{Edge, Node, NodeId};

/// Orders `nodes` so that for every edge `u -> v` between them, `u` comes first.
///
/// Edges with an endpoint outside `nodes` are ignored. Fails with
/// [`CompileError::Cycle`] listing the nodes that could not be ordered.
pub fn sort(nodes: &[Node], edges: &[Edge]) -> Result<Vec<Node>, CompileError> {
    let index: HashMap<NodeId, usize> = nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();

    let mut in_degree = vec![0u32; nodes.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for edge in edges {
        let (Some(&from), Some(&to)) = (index.get(&edge.start.node_id), index.get(&edge.end.node_id))
        else {
            continue;
        };
        dependents[from].push(to);
        in_degree[to] += 1;
    }

    let mut ready: BinaryHeap<Reverse<(NodeId, usize)>> = nodes
        .iter()
        .enumerate()
        .filter(|&(i, _)| in_degree[i] == 0)
        .map(|(i, n)| Reverse((n.id, i)))
        .collect();

    let mut order = Vec::with_capacity(nodes.len());
    while let Some(Reverse((_, i))) = ready.pop() {
        order.push(i);
        for &dependent in &dependents[i] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.push(Reverse((nodes[dependent].id, dependent)));
            }
        }
    }

    if order.len() != nodes.len() {
        return Err(CompileError::Cycle {
            nodes: cycle_members(nodes, &in_degree, &dependents),
        });
    }

    Ok(order.into_iter().map(|i| nodes[i].clone()).collect())
}

/// Narrows the nodes Kahn's algorithm could not order down to those on a
/// cycle. A stuck node with no stuck dependent only sits downstream of a
/// cycle, so it is peeled off until none are left.
fn cycle_members(nodes: &[Node], in_degree: &[u32], dependents: &[Vec<usize>]) -> Vec<NodeId> {
    let mut stuck: Vec<bool> = in_degree.iter().map(|&d| d > 0).collect();
    loop {
        let peeled: Vec<usize> = (0..nodes.len())
            .filter(|&i| stuck[i] && !dependents[i].iter().any(|&d| stuck[d]))
            .collect();
        if peeled.is_empty() {
            break;
        }
        for i in peeled {
            stuck[i] = false;
        }
    }

    let mut members: Vec<NodeId> = nodes
        .iter()
        .enumerate()
        .filter(|&(i, _)| stuck[i])
        .map(|(_, n)| n.id)
        .collect();
    members.sort_unstable();
    members
}
