//! Reachability pruning from the SceneProvider root.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::CompileError;
use crate::graph::{Edge, Node, NodeId, PassKind};

/// Finds the single SceneProvider node of a snapshot.
pub fn find_root(nodes: &[Node]) -> Result<NodeId, CompileError> {
    let mut roots = nodes.iter().filter(|n| n.kind == PassKind::SceneProvider);
    let root = roots.next().ok_or(CompileError::MissingRoot)?;
    let extra = roots.count();
    if extra > 0 {
        return Err(CompileError::MultipleRoots { count: extra + 1 });
    }
    Ok(root.id)
}

/// Drops every node that cannot be reached from the root along outgoing edges.
///
/// The returned nodes keep their relative order from `nodes`. Orphans are
/// dropped silently.
pub fn filter_unreachable(nodes: &[Node], edges: &[Edge]) -> Result<Vec<Node>, CompileError> {
    let root = find_root(nodes)?;

    let mut adjacency: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    for edge in edges {
        adjacency
            .entry(edge.start.node_id)
            .or_default()
            .push(edge.end.node_id);
    }

    let mut visited = HashSet::from([root]);
    let mut queue = VecDeque::from([root]);
    while let Some(id) = queue.pop_front() {
        for &next in adjacency.get(&id).into_iter().flatten() {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    Ok(nodes
        .iter()
        .filter(|n| visited.contains(&n.id))
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphEditor;

    fn ids(nodes: &[Node]) -> Vec<NodeId> {
        nodes.iter().map(|n| n.id).collect()
    }

    #[test]
    fn test_missing_root() {
        let mut editor = GraphEditor::empty();
        editor.add_node(PassKind::GBuffer).unwrap();
        let (nodes, edges) = editor.snapshot();
        assert!(matches!(
            filter_unreachable(&nodes, &edges),
            Err(CompileError::MissingRoot)
        ));
    }

    #[test]
    fn test_multiple_roots_rejected() {
        let editor = GraphEditor::new();
        let (mut nodes, edges) = editor.snapshot();
        let mut second = nodes[0].clone();
        second.id = NodeId(1000);
        nodes.push(second);
        assert!(matches!(
            filter_unreachable(&nodes, &edges),
            Err(CompileError::MultipleRoots { count: 2 })
        ));
    }

    #[test]
    fn test_root_alone() {
        let editor = GraphEditor::new();
        let (nodes, edges) = editor.snapshot();
        let reachable = filter_unreachable(&nodes, &edges).unwrap();
        assert_eq!(reachable.len(), 1);
        assert_eq!(reachable[0].kind, PassKind::SceneProvider);
    }

    #[test]
    fn test_orphans_dropped_and_order_kept() {
        let mut editor = GraphEditor::new();
        let scene = editor.find_node(PassKind::SceneProvider).unwrap();
        let gbuffer = editor.find_node(PassKind::GBuffer).unwrap();
        let ao = editor.add_node(PassKind::AmbientOcclusion).unwrap();
        let lighting = editor.add_node(PassKind::Lighting).unwrap();
        editor.connect(scene, "Scene", gbuffer, "Scene").unwrap();
        editor.connect(gbuffer, "Position", lighting, "Position").unwrap();

        let (nodes, edges) = editor.snapshot();
        let reachable = filter_unreachable(&nodes, &edges).unwrap();
        assert_eq!(ids(&reachable), vec![scene, gbuffer, lighting]);
        assert!(!ids(&reachable).contains(&ao));
    }

    #[test]
    fn test_edges_into_root_do_not_pull_in_producers() {
        let mut editor = GraphEditor::new();
        let scene = editor.find_node(PassKind::SceneProvider).unwrap();
        let blur = editor.add_node(PassKind::GaussianBlur).unwrap();
        let aa = editor.add_node(PassKind::AntiAliasing).unwrap();
        editor.connect(aa, "Anti-Aliased Image", blur, "Image").unwrap();

        let (nodes, edges) = editor.snapshot();
        let reachable = filter_unreachable(&nodes, &edges).unwrap();
        assert_eq!(ids(&reachable), vec![scene]);
    }
}
