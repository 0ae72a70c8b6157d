//! Shared graph builders for compiler integration tests.

#![allow(dead_code)]

use redlilium_render_graph::{
    CompileContext, CompileResult, CompilerConfig, DefaultNodeFactory, DummyBackend,
    GraphEditor, NodeId, PassKind, RenderGraphCompiler, ResourceSpecification, ResourceType,
    SceneHandles, TextureFormat,
};

pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .is_test(true)
        .try_init();
}

/// Compiles the editor's current graph against a fresh dummy backend.
pub fn compile(editor: &GraphEditor, config: CompilerConfig) -> CompileResult {
    let backend = DummyBackend::new();
    let ctx = CompileContext::new(&backend, &DefaultNodeFactory, SceneHandles::default());
    let (nodes, edges) = editor.snapshot();
    RenderGraphCompiler::new(config).compile(&nodes, &edges, false, &ctx)
}

pub struct Deferred {
    pub editor: GraphEditor,
    pub scene: NodeId,
    pub gbuffer: NodeId,
    pub lighting: NodeId,
    pub present: NodeId,
}

/// SceneProvider -> G-Buffer -> Lighting (reads all four G-buffer outputs) -> Present.
pub fn deferred() -> Deferred {
    let mut editor = GraphEditor::new();
    let scene = editor.find_node(PassKind::SceneProvider).unwrap();
    let gbuffer = editor.find_node(PassKind::GBuffer).unwrap();
    let present = editor.find_node(PassKind::Present).unwrap();
    let lighting = editor.add_node(PassKind::Lighting).unwrap();

    editor.connect(scene, "Scene", gbuffer, "Scene").unwrap();
    for port in ["Position", "Normal", "Albedo", "Depth"] {
        editor.connect(gbuffer, port, lighting, port).unwrap();
    }
    editor
        .connect(lighting, "Lighting Result", present, "Final Image")
        .unwrap();

    Deferred {
        editor,
        scene,
        gbuffer,
        lighting,
        present,
    }
}

/// Custom pass with a scene input, an image input and an image output.
pub fn image_pass(editor: &mut GraphEditor, name: &str) -> NodeId {
    editor
        .add_custom_node(
            name,
            PassKind::GaussianBlur,
            vec![
                ResourceSpecification::input("Scene", ResourceType::Scene),
                ResourceSpecification::image_input("Image", TextureFormat::Rgba16Float),
                ResourceSpecification::image_output("Out", TextureFormat::Rgba16Float),
            ],
        )
        .unwrap()
}

/// SceneProvider feeding a chain of `len` image passes named "Pass i".
pub fn image_chain(len: usize) -> (GraphEditor, Vec<NodeId>) {
    let mut editor = GraphEditor::empty();
    let scene = editor.add_node(PassKind::SceneProvider).unwrap();
    let ids: Vec<NodeId> = (0..len)
        .map(|i| image_pass(&mut editor, &format!("Pass {i}")))
        .collect();
    if let Some(&first) = ids.first() {
        editor.connect(scene, "Scene", first, "Scene").unwrap();
    }
    for pair in ids.windows(2) {
        editor.connect(pair[0], "Out", pair[1], "Image").unwrap();
    }
    (editor, ids)
}
