//! Holder for the render path the frame loop is currently running.

use std::sync::Arc;

use parking_lot::RwLock;

use super::{AdoptError, RenderPath};
use crate::compiler::CompileResult;

#[derive(Debug, Default)]
struct ActivePath {
    path: Option<Arc<RenderPath>>,
    generation: u64,
}

/// Atomically swappable active render path.
///
/// A frame takes its path with [`current`](Self::current) and keeps that
/// `Arc` for the whole frame, so it sees either the old or the new path,
/// never a mix. Failed compiles never touch the slot.
#[derive(Debug, Default)]
pub struct RenderPathSlot {
    active: RwLock<ActivePath>,
}

impl RenderPathSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active path, if one was installed.
    pub fn current(&self) -> Option<Arc<RenderPath>> {
        self.active.read().path.clone()
    }

    /// Number of paths installed so far.
    pub fn generation(&self) -> u64 {
        self.active.read().generation
    }

    /// Initializes `path` and makes it the active one.
    ///
    /// If initialization fails the previous path stays active.
    pub fn install(&self, mut path: RenderPath) -> Result<u64, AdoptError> {
        path.initialize()?;
        let path = Arc::new(path);
        let mut active = self.active.write();
        active.path = Some(path);
        active.generation += 1;
        log::info!("RenderPathSlot: installed render path generation {}", active.generation);
        Ok(active.generation)
    }

    /// Installs the path of a successful compile.
    pub fn adopt(&self, result: CompileResult) -> Result<u64, AdoptError> {
        match result.render_path {
            Some(path) if result.success => self.install(path),
            _ => {
                let message = result
                    .failure_message
                    .unwrap_or_else(|| "compile produced no render path".to_string());
                log::warn!("RenderPathSlot: keeping previous render path ({message})");
                Err(AdoptError::CompileFailed(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DummyBackend, SceneHandles};
    use crate::compiler::{CompileContext, RenderGraphCompiler};
    use crate::graph::{GraphEditor, PassKind};
    use crate::runtime::{CommandStream, DefaultNodeFactory};

    fn compile(editor: &GraphEditor) -> CompileResult {
        let backend = DummyBackend::new();
        let ctx = CompileContext::new(&backend, &DefaultNodeFactory, SceneHandles::default());
        let (nodes, edges) = editor.snapshot();
        RenderGraphCompiler::default().compile(&nodes, &edges, false, &ctx)
    }

    fn linked_editor() -> GraphEditor {
        let mut editor = GraphEditor::new();
        let scene = editor.find_node(PassKind::SceneProvider).unwrap();
        let gbuffer = editor.find_node(PassKind::GBuffer).unwrap();
        editor.connect(scene, "Scene", gbuffer, "Scene").unwrap();
        editor
    }

    #[test]
    fn test_empty_slot() {
        let slot = RenderPathSlot::new();
        assert!(slot.current().is_none());
        assert_eq!(slot.generation(), 0);
    }

    #[test]
    fn test_adopt_success_installs_initialized_path() {
        let slot = RenderPathSlot::new();
        assert_eq!(slot.adopt(compile(&linked_editor())), Ok(1));
        let path = slot.current().unwrap();
        assert!(path.is_initialized());
        assert_eq!(path.node_names(), vec!["G-Buffer"]);
    }

    #[test]
    fn test_failed_compile_keeps_previous_path() {
        let slot = RenderPathSlot::new();
        slot.adopt(compile(&linked_editor())).unwrap();
        let before = slot.current().unwrap();

        let mut broken = linked_editor();
        let scene = broken.find_node(PassKind::SceneProvider).unwrap();
        broken.remove_node(scene).unwrap();
        let result = compile(&broken);
        assert!(matches!(slot.adopt(result), Err(AdoptError::CompileFailed(_))));

        assert_eq!(slot.generation(), 1);
        assert!(Arc::ptr_eq(&before, &slot.current().unwrap()));
    }

    #[test]
    fn test_frame_keeps_its_path_across_swap() {
        let slot = Arc::new(RenderPathSlot::new());
        slot.adopt(compile(&linked_editor())).unwrap();

        let frame_path = slot.current().unwrap();
        let swapper = {
            let slot = Arc::clone(&slot);
            std::thread::spawn(move || {
                let mut editor = linked_editor();
                let gbuffer = editor.find_node(PassKind::GBuffer).unwrap();
                let lighting = editor.add_node(PassKind::Lighting).unwrap();
                editor.connect(gbuffer, "Position", lighting, "Position").unwrap();
                slot.adopt(compile(&editor)).unwrap()
            })
        };
        assert_eq!(swapper.join().unwrap(), 2);

        let mut commands = CommandStream::new();
        frame_path.execute(&mut commands, 0);
        assert_eq!(commands.pass_names(), vec!["G-Buffer"]);

        let mut commands = CommandStream::new();
        slot.current().unwrap().execute(&mut commands, 1);
        assert_eq!(commands.pass_names(), vec!["G-Buffer", "Lighting"]);
    }
}
