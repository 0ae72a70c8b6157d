//! Human-readable compile reports.

use std::fmt::Write;

use super::{OptimizerResource, ResourceOptimizationResult};
use crate::graph::Node;

const LABEL_WIDTH: usize = 14;

/// Counts summary plus a per-bucket usage timeline.
///
/// ```text
/// Legend: (- = not used, x = used)
///                 0  1  2  3
/// Resource 0    | x  x  -  - | Image: Position
/// ```
pub fn optimization_timeline(result: &ResourceOptimizationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Resource optimization summary");
    let _ = writeln!(
        out,
        "  Original resources:        {}",
        result.original_resource_count
    );
    let _ = writeln!(
        out,
        "  Optimized resources:       {}",
        result.optimized_resource_count
    );
    let _ = writeln!(
        out,
        "  Non-optimizable resources: {}",
        result.non_optimizable_count
    );
    let _ = writeln!(out, "  Optimization time:         {:?}", result.elapsed);

    let Some(timeline) = result.timeline else {
        let _ = writeln!(out, "  Timeline: empty");
        return out;
    };
    let _ = writeln!(out, "  Timeline: {timeline}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Legend: (- = not used, x = used)");

    let _ = write!(out, "{:width$}  ", "", width = LABEL_WIDTH);
    for index in timeline.start()..=timeline.end() {
        let _ = write!(out, "{index:^3}");
    }
    let _ = writeln!(out);

    for bucket in &result.resources {
        let _ = write!(
            out,
            "{:width$}|",
            format!("Resource {}", bucket.id),
            width = LABEL_WIDTH
        );
        for index in timeline.start()..=timeline.end() {
            out.push_str(if bucket.is_used_at(index) { " x " } else { " - " });
        }
        let _ = writeln!(out, "| {}: {}", bucket.resource_type(), logical_names(result, bucket));
    }
    out
}

fn logical_names(result: &ResourceOptimizationResult, bucket: &OptimizerResource) -> String {
    bucket
        .logical_resources
        .iter()
        .filter_map(|id| {
            result
                .original_resources
                .iter()
                .find(|r| r.origin_resource_id == *id)
        })
        .map(|r| format!("{}.{}", r.origin_node_name, r.origin_resource_name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolved graph state: execution order and every bucket with its users.
pub fn graph_state(execution_order: &[Node], result: &ResourceOptimizationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Execution order:");
    for (index, node) in execution_order.iter().enumerate() {
        let _ = writeln!(out, "  [{index}] {} (id {}, {})", node.name, node.id, node.kind);
    }

    let _ = writeln!(out, "Resources:");
    for bucket in &result.resources {
        let spec = &bucket.spec;
        if spec.resource_type.is_optimizable() {
            let _ = writeln!(
                out,
                "  Resource {} {} {} {} {:?} range {}",
                bucket.id,
                spec.resource_type,
                spec.format,
                spec.size,
                spec.usage,
                bucket.range()
            );
        } else {
            let _ = writeln!(
                out,
                "  Resource {} {} range {}",
                bucket.id,
                spec.resource_type,
                bucket.range()
            );
        }
        let _ = writeln!(
            out,
            "    origin: '{}'.'{}' @ {}",
            bucket.origin.origin_node_name,
            bucket.origin.origin_resource_name,
            bucket.origin.origin_node_index
        );
        for point in &bucket.usage_points {
            let _ = writeln!(
                out,
                "    {} '{}'.'{}' @ {} (logical {})",
                point.role, point.node_name, point.port_name, point.index, point.resource_id
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ResourceOptimizer;
    use crate::graph::{GraphEditor, PassKind};

    fn blur_chain_result() -> (Vec<Node>, ResourceOptimizationResult) {
        let mut editor = GraphEditor::empty();
        let ids: Vec<_> = (0..3)
            .map(|i| {
                editor
                    .add_named_node(PassKind::GaussianBlur, format!("Blur {i}"))
                    .unwrap()
            })
            .collect();
        for pair in ids.windows(2) {
            editor
                .connect(pair[0], "Blurred Image", pair[1], "Image")
                .unwrap();
        }
        let (nodes, edges) = editor.snapshot();
        let result = ResourceOptimizer::new().run(&nodes, &edges);
        (nodes, result)
    }

    #[test]
    fn test_timeline_rows() {
        let (_, result) = blur_chain_result();
        let report = optimization_timeline(&result);
        assert!(report.contains("(- = not used, x = used)"));
        assert!(report.contains("Original resources:        3"));
        assert!(report.contains("Optimized resources:       2"));

        let row = report
            .lines()
            .find(|l| l.starts_with("Resource 0"))
            .unwrap();
        // Blur 0 out used at 0 and 1, Blur 2 out merged in at 2
        assert_eq!(row.matches(" x ").count(), 3);
        assert!(row.contains("Blur 0.Blurred Image, Blur 2.Blurred Image"));
    }

    #[test]
    fn test_timeline_empty() {
        let result = ResourceOptimizer::new().run(&[], &[]);
        assert!(optimization_timeline(&result).contains("Timeline: empty"));
    }

    #[test]
    fn test_graph_state_lists_users() {
        let (nodes, result) = blur_chain_result();
        let report = graph_state(&nodes, &result);
        assert!(report.contains("[0] Blur 0"));
        assert!(report.contains("Input 'Blur 1'.'Image' @ 1"));
        assert!(report.contains("Output 'Blur 0'.'Blurred Image' @ 0"));
    }
}
