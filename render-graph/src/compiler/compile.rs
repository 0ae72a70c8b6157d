//! Compile orchestration.

use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};

use super::{
    reachability, report, topological_sort, OptimizerResource, ResourceOptimizationResult,
    ResourceOptimizer,
};
use crate::backend::{ResourceFactory, SceneHandles};
use crate::config::{CompileStrategy, CompilerConfig};
use crate::error::CompileError;
use crate::graph::{Edge, Node, NodeId, PassKind};
use crate::resource::ResourceType;
use crate::runtime::{GraphResource, NodeFactory, RenderNode, RenderPath, ResourceTable};
use crate::types::{TextureDescriptor, TextureUsage};

/// External collaborators a compile instantiates through.
#[derive(Clone, Copy)]
pub struct CompileContext<'a> {
    pub resources: &'a dyn ResourceFactory,
    pub nodes: &'a dyn NodeFactory,
    pub scene: SceneHandles,
}

impl<'a> CompileContext<'a> {
    pub fn new(
        resources: &'a dyn ResourceFactory,
        nodes: &'a dyn NodeFactory,
        scene: SceneHandles,
    ) -> Self {
        Self {
            resources,
            nodes,
            scene,
        }
    }
}

/// Outcome of one compile.
///
/// On failure `render_path` is `None` and `failure_message` describes the
/// error; the caller keeps running its previous path.
#[derive(Debug)]
pub struct CompileResult {
    pub success: bool,
    pub render_path: Option<RenderPath>,
    pub logs: Vec<String>,
    pub compile_time: Duration,
    pub failure_message: Option<String>,
    pub error: Option<CompileError>,
    pub optimization: Option<ResourceOptimizationResult>,
    /// Reachable nodes in execution order, including nodes without a runtime pass.
    pub execution_order: Vec<NodeId>,
}

/// Accumulates log lines for the result while forwarding them to `log`.
#[derive(Debug, Default)]
struct CompileLog {
    lines: Vec<String>,
}

impl CompileLog {
    fn info(&mut self, line: String) {
        log::info!("{line}");
        self.lines.push(line);
    }

    fn debug(&mut self, line: String) {
        log::debug!("{line}");
        self.lines.push(line);
    }

    fn warn(&mut self, line: String) {
        log::warn!("{line}");
        self.lines.push(line);
    }

    fn error(&mut self, line: String) {
        log::error!("{line}");
        self.lines.push(line);
    }
}

/// Progress of a compile, kept on failure too.
#[derive(Default)]
struct Stages {
    execution_order: Vec<NodeId>,
    optimization: Option<ResourceOptimizationResult>,
}

/// Compiles graph snapshots into render paths.
#[derive(Debug, Clone, Default)]
pub struct RenderGraphCompiler {
    config: CompilerConfig,
}

impl RenderGraphCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compiles a snapshot of nodes and edges.
    ///
    /// `verbose` adds input, culling, ordering and resource reports to the
    /// logs on top of whatever the config requests.
    pub fn compile(
        &self,
        nodes: &[Node],
        edges: &[Edge],
        verbose: bool,
        ctx: &CompileContext<'_>,
    ) -> CompileResult {
        let started = Instant::now();
        let mut log = CompileLog::default();
        let mut stages = Stages::default();
        let verbose = verbose || self.config.verbose;

        let outcome = self.run(nodes, edges, verbose, ctx, &mut log, &mut stages);
        let compile_time = started.elapsed();

        match outcome {
            Ok(render_path) => {
                log.info(format!(
                    "[Compiler] Compilation finished in {:.3} ms",
                    compile_time.as_secs_f64() * 1000.0
                ));
                CompileResult {
                    success: true,
                    render_path: Some(render_path),
                    logs: log.lines,
                    compile_time,
                    failure_message: None,
                    error: None,
                    optimization: stages.optimization,
                    execution_order: stages.execution_order,
                }
            }
            Err(error) => {
                let message = error.to_string();
                log.error(format!("[Error] {message}"));
                CompileResult {
                    success: false,
                    render_path: None,
                    logs: log.lines,
                    compile_time,
                    failure_message: Some(message),
                    error: Some(error),
                    optimization: stages.optimization,
                    execution_order: stages.execution_order,
                }
            }
        }
    }

    fn run(
        &self,
        nodes: &[Node],
        edges: &[Edge],
        verbose: bool,
        ctx: &CompileContext<'_>,
        log: &mut CompileLog,
        stages: &mut Stages,
    ) -> Result<RenderPath, CompileError> {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
        log.info(format!(
            "[Compiler] Compiling started at {timestamp} ({:?} strategy)",
            self.config.strategy
        ));
        if verbose {
            log.debug(format!("[Compiler] Input nodes: {}", node_list(nodes, ", ")));
        }

        let reachable = reachability::filter_unreachable(nodes, edges)?;
        if verbose {
            log.debug(format!(
                "[Compiler] Culled {} unreachable node(s)",
                nodes.len() - reachable.len()
            ));
        }

        let sorted = topological_sort::sort(&reachable, edges)?;
        stages.execution_order = sorted.iter().map(|n| n.id).collect();
        if verbose {
            log.debug(format!(
                "[Compiler] Execution order: {}",
                node_list(&sorted, " -> ")
            ));
        }

        let optimizer = match self.config.strategy {
            CompileStrategy::Optimized => ResourceOptimizer::new(),
            CompileStrategy::Naive => ResourceOptimizer::without_aliasing(),
        };
        let optimization = optimizer.run(&sorted, edges);
        for message in &optimization.messages {
            log.lines.push(message.clone());
        }
        log.info(format!(
            "[Compiler] {} logical resources mapped to {} physical ({} non-optimizable)",
            optimization.original_resource_count,
            optimization.optimized_resource_count,
            optimization.non_optimizable_count
        ));
        let optimization = stages.optimization.insert(optimization);

        let resources = self.instantiate_resources(&optimization.resources, &timestamp, ctx, log)?;
        let mut render_nodes = instantiate_nodes(&sorted, ctx, log);
        wire(&optimization.resources, &resources, &mut render_nodes, log);

        if verbose {
            let timeline = report::optimization_timeline(optimization);
            let state = report::graph_state(&sorted, optimization);
            if let Some(dir) = &self.config.dump_dir {
                match write_reports(dir, &timeline, &state) {
                    Ok(()) => log.debug(format!("[Compiler] Reports written to {}", dir.display())),
                    Err(e) => log.warn(format!(
                        "[Compiler] Could not write reports to {}: {e}",
                        dir.display()
                    )),
                }
            }
            log.lines.extend(timeline.lines().map(str::to_string));
            log.lines.extend(state.lines().map(str::to_string));
        }

        log.debug(format!(
            "[Compiler] Render path holds {} node(s) and {} resource(s)",
            render_nodes.len(),
            resources.len()
        ));
        Ok(RenderPath::new(
            render_nodes.into_iter().map(|(_, node)| node).collect(),
            resources,
            self.config.render_resolution,
        ))
    }

    /// Creates the backing object of every bucket.
    fn instantiate_resources(
        &self,
        buckets: &[OptimizerResource],
        timestamp: &str,
        ctx: &CompileContext<'_>,
        log: &mut CompileLog,
    ) -> Result<ResourceTable, CompileError> {
        let mut table = ResourceTable::default();
        for bucket in buckets {
            let resource = match bucket.resource_type() {
                ResourceType::Camera => GraphResource::Camera(ctx.scene.camera),
                ResourceType::Objects => GraphResource::Objects(ctx.scene.objects),
                ResourceType::AccelerationStructure => {
                    GraphResource::AccelerationStructure(ctx.scene.acceleration_structure)
                }
                ResourceType::Scene => GraphResource::Scene(ctx.scene.scene),
                ResourceType::Image => {
                    let descriptor = self.image_descriptor(bucket, timestamp);
                    GraphResource::Image(ctx.resources.create_image(&descriptor)?)
                }
                ResourceType::DepthImage => {
                    let descriptor = self.image_descriptor(bucket, timestamp);
                    GraphResource::DepthImage(ctx.resources.create_depth_image(&descriptor)?)
                }
                ResourceType::Unknown => {
                    if self.config.strict_resource_types {
                        return Err(CompileError::UnsupportedResourceType {
                            bucket: bucket.id,
                            resource: bucket.origin.origin_resource_name.clone(),
                            resource_type: ResourceType::Unknown,
                        });
                    }
                    log.warn(format!(
                        "[Compiler] Skipping resource {} ('{}' of '{}'): unsupported type {}",
                        bucket.id,
                        bucket.origin.origin_resource_name,
                        bucket.origin.origin_node_name,
                        ResourceType::Unknown
                    ));
                    continue;
                }
            };
            table.insert(bucket.id, resource);
        }
        Ok(table)
    }

    fn image_descriptor(&self, bucket: &OptimizerResource, timestamp: &str) -> TextureDescriptor {
        let spec = &bucket.spec;
        TextureDescriptor::new_2d(
            spec.size.resolve(self.config.render_resolution),
            spec.format,
            spec.usage | TextureUsage::RENDER_ATTACHMENT,
        )
        .with_label(format!("({timestamp}) OptGenResource-{}", bucket.id))
    }
}

/// Builds runtime nodes in execution order, keyed by their graph node.
fn instantiate_nodes(
    sorted: &[Node],
    ctx: &CompileContext<'_>,
    log: &mut CompileLog,
) -> Vec<(NodeId, Box<dyn RenderNode>)> {
    let mut render_nodes = Vec::with_capacity(sorted.len());
    for node in sorted {
        match ctx.nodes.create(node) {
            Some(render_node) => render_nodes.push((node.id, render_node)),
            None if node.kind == PassKind::SceneProvider => {}
            None => log.warn(format!(
                "[Compiler] No runtime pass for node '{}' ({}), skipping",
                node.name, node.kind
            )),
        }
    }
    render_nodes
}

/// Binds every usage point of every bucket to its runtime node port.
fn wire(
    buckets: &[OptimizerResource],
    resources: &ResourceTable,
    render_nodes: &mut [(NodeId, Box<dyn RenderNode>)],
    log: &mut CompileLog,
) {
    let position: HashMap<NodeId, usize> = render_nodes
        .iter()
        .enumerate()
        .map(|(i, (id, _))| (*id, i))
        .collect();

    for bucket in buckets.iter().filter(|b| resources.contains(b.id)) {
        for point in &bucket.usage_points {
            let Some(&index) = position.get(&point.node_id) else {
                continue;
            };
            let node = &mut render_nodes[index].1;
            if !node.set_resource(&point.port_name, bucket.id) {
                log.warn(format!(
                    "[Compiler] Node '{}' rejected resource {} on port '{}'",
                    point.node_name, bucket.id, point.port_name
                ));
            }
        }
    }
}

fn write_reports(dir: &Path, timeline: &str, state: &str) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    std::fs::write(dir.join("optimization_timeline.txt"), timeline)?;
    std::fs::write(dir.join("graph_state.txt"), state)
}

fn node_list(nodes: &[Node], separator: &str) -> String {
    nodes
        .iter()
        .map(|n| format!("{} ({})", n.name, n.id))
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DummyBackend;
    use crate::graph::GraphEditor;
    use crate::resource::ResourceSpecification;
    use crate::runtime::DefaultNodeFactory;

    fn compile_with(
        editor: &GraphEditor,
        config: CompilerConfig,
        backend: &DummyBackend,
        verbose: bool,
    ) -> CompileResult {
        let ctx = CompileContext::new(backend, &DefaultNodeFactory, SceneHandles::default());
        let (nodes, edges) = editor.snapshot();
        RenderGraphCompiler::new(config).compile(&nodes, &edges, verbose, &ctx)
    }

    /// SceneProvider -> G-Buffer -> Present (via an unknown-typed output).
    fn editor_with_unknown_output() -> GraphEditor {
        let mut editor = GraphEditor::new();
        let scene = editor.find_node(PassKind::SceneProvider).unwrap();
        let gbuffer = editor.find_node(PassKind::GBuffer).unwrap();
        editor.connect(scene, "Scene", gbuffer, "Scene").unwrap();
        let odd = editor
            .add_custom_node(
                "Odd",
                PassKind::Unknown,
                vec![
                    ResourceSpecification::input("Scene", ResourceType::Scene),
                    ResourceSpecification::output("Mystery", ResourceType::Unknown),
                ],
            )
            .unwrap();
        editor.connect(scene, "Scene", odd, "Scene").unwrap();
        editor
    }

    #[test]
    fn test_unknown_resource_skipped_by_default() {
        let editor = editor_with_unknown_output();
        let backend = DummyBackend::new();
        let result = compile_with(&editor, CompilerConfig::default(), &backend, false);
        assert!(result.success);
        let optimization = result.optimization.as_ref().unwrap();
        let path = result.render_path.as_ref().unwrap();
        assert_eq!(path.resources().len(), optimization.optimized_resource_count - 1);
        assert!(result.logs.iter().any(|l| l.contains("unsupported type Unknown")));
    }

    #[test]
    fn test_unknown_resource_fails_in_strict_mode() {
        let editor = editor_with_unknown_output();
        let backend = DummyBackend::new();
        let config = CompilerConfig::default().with_strict_resource_types(true);
        let result = compile_with(&editor, config, &backend, false);
        assert!(!result.success);
        assert!(result.render_path.is_none());
        assert!(matches!(
            result.error,
            Some(CompileError::UnsupportedResourceType { .. })
        ));
    }

    #[test]
    fn test_backend_failure_aborts_compile() {
        let mut editor = GraphEditor::new();
        let scene = editor.find_node(PassKind::SceneProvider).unwrap();
        let gbuffer = editor.find_node(PassKind::GBuffer).unwrap();
        editor.connect(scene, "Scene", gbuffer, "Scene").unwrap();

        let backend = DummyBackend::failing_after(2);
        let result = compile_with(&editor, CompilerConfig::default(), &backend, false);
        assert!(!result.success);
        assert!(matches!(result.error, Some(CompileError::Backend(_))));
        assert!(result.failure_message.unwrap().contains("OptGenResource-"));
        // Earlier stages are still reported
        assert_eq!(result.execution_order.len(), 2);
        assert!(result.optimization.is_some());
    }

    #[test]
    fn test_image_labels_and_usage() {
        let mut editor = GraphEditor::new();
        let scene = editor.find_node(PassKind::SceneProvider).unwrap();
        let gbuffer = editor.find_node(PassKind::GBuffer).unwrap();
        editor.connect(scene, "Scene", gbuffer, "Scene").unwrap();

        let backend = DummyBackend::new();
        let config = CompilerConfig::default().with_render_resolution(crate::types::Extent2d::new(640, 480));
        let result = compile_with(&editor, config, &backend, false);
        let path = result.render_path.unwrap();
        assert_eq!(path.resources().image_count(), 4);
        for (id, resource) in path.resources().iter() {
            if let Some(image) = resource.image() {
                let label = image.descriptor.label.as_deref().unwrap();
                assert!(label.ends_with(&format!("OptGenResource-{id}")));
                assert!(image.descriptor.usage.contains(TextureUsage::RENDER_ATTACHMENT));
                assert_eq!(image.descriptor.size, crate::types::Extent2d::new(640, 480));
            }
        }
    }

    #[test]
    fn test_verbose_logs_and_dumps() {
        let mut editor = GraphEditor::new();
        let scene = editor.find_node(PassKind::SceneProvider).unwrap();
        let gbuffer = editor.find_node(PassKind::GBuffer).unwrap();
        editor.connect(scene, "Scene", gbuffer, "Scene").unwrap();

        let dir = std::env::temp_dir().join(format!("redlilium-compile-dump-{}", std::process::id()));
        let backend = DummyBackend::new();
        let config = CompilerConfig::default().with_dump_dir(&dir);
        let result = compile_with(&editor, config, &backend, true);
        assert!(result.success);
        assert!(result.logs.iter().any(|l| l.starts_with("[Compiler] Compiling started at")));
        assert!(result.logs.iter().any(|l| l.contains("Culled 1 unreachable node(s)")));
        assert!(result.logs.iter().any(|l| l.contains("Execution order:")));
        assert!(result.logs.iter().any(|l| l.contains("(- = not used, x = used)")));

        let timeline = std::fs::read_to_string(dir.join("optimization_timeline.txt")).unwrap();
        assert!(timeline.contains("Resource optimization summary"));
        assert!(dir.join("graph_state.txt").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_unwritable_dump_dir_does_not_fail_compile() {
        let mut editor = GraphEditor::new();
        let scene = editor.find_node(PassKind::SceneProvider).unwrap();
        let gbuffer = editor.find_node(PassKind::GBuffer).unwrap();
        editor.connect(scene, "Scene", gbuffer, "Scene").unwrap();

        // A regular file where the dump directory should be
        let blocker =
            std::env::temp_dir().join(format!("redlilium-dump-blocker-{}", std::process::id()));
        std::fs::write(&blocker, "not a directory").unwrap();

        let backend = DummyBackend::new();
        let config = CompilerConfig::default().with_dump_dir(&blocker);
        let result = compile_with(&editor, config, &backend, true);
        let _ = std::fs::remove_file(&blocker);

        assert!(result.success, "{:?}", result.failure_message);
        assert!(result.render_path.is_some());
        assert!(result.logs.iter().any(|l| l.contains("Could not write reports")));
    }

    #[test]
    fn test_quiet_compile_has_no_reports() {
        let editor = GraphEditor::new();
        let backend = DummyBackend::new();
        let result = compile_with(&editor, CompilerConfig::default(), &backend, false);
        assert!(result.success);
        assert!(!result.logs.iter().any(|l| l.contains("x = used")));
    }

    #[test]
    fn test_rejected_binding_is_logged() {
        let mut editor = GraphEditor::new();
        let scene = editor.find_node(PassKind::SceneProvider).unwrap();
        let gbuffer = editor.find_node(PassKind::GBuffer).unwrap();
        editor.connect(scene, "Scene", gbuffer, "Scene").unwrap();

        // Runtime node with no ports: every binding is rejected.
        let factory = |node: &Node| -> Option<Box<dyn RenderNode>> {
            let mut bare = node.clone();
            bare.resources.clear();
            DefaultNodeFactory.create(&bare)
        };
        let backend = DummyBackend::new();
        let ctx = CompileContext::new(&backend, &factory, SceneHandles::default());
        let (nodes, edges) = editor.snapshot();
        let result = RenderGraphCompiler::default().compile(&nodes, &edges, false, &ctx);
        assert!(result.success);
        assert!(result.logs.iter().any(|l| l.contains("rejected resource")));
    }
}
