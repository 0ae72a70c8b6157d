//! Resource factory abstraction.
//!
//! The compiler never talks to a graphics API directly. Physical images are
//! requested through [`ResourceFactory`], and scene-owned data (camera,
//! draw list, acceleration structure, aggregate scene) is wrapped from the
//! handles in [`SceneHandles`] without any allocation.
//!
//! # Available Backends
//!
//! - `dummy` (default): allocates sequential handles, for tests and tooling

#[cfg(feature = "dummy")]
pub mod dummy;

#[cfg(feature = "dummy")]
pub use dummy::DummyBackend;

use thiserror::Error;

use crate::types::TextureDescriptor;

/// Errors raised by a resource factory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("failed to create {kind} '{label}': {reason}")]
    ResourceCreationFailed {
        kind: &'static str,
        label: String,
        reason: String,
    },
}

/// Opaque handle to a backend image allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageHandle(pub u64);

/// A GPU image created by a [`ResourceFactory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuImage {
    pub handle: ImageHandle,
    pub descriptor: TextureDescriptor,
}

/// Allocates compiler-owned images.
pub trait ResourceFactory {
    /// Backend name, for logs.
    fn name(&self) -> &str;

    /// Create a colour image.
    fn create_image(&self, descriptor: &TextureDescriptor) -> Result<GpuImage, BackendError>;

    /// Create a depth image.
    fn create_depth_image(&self, descriptor: &TextureDescriptor) -> Result<GpuImage, BackendError>;
}

// ============================================================================
// Scene handles
// ============================================================================

macro_rules! scene_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub u64);
    };
}

scene_handle!(
    /// Handle to the scene-owned camera.
    CameraHandle
);
scene_handle!(
    /// Handle to the scene-owned draw list.
    ObjectsHandle
);
scene_handle!(
    /// Handle to the scene-owned top-level acceleration structure.
    AccelerationStructureHandle
);
scene_handle!(
    /// Handle to the aggregate scene.
    SceneHandle
);

/// Handles to the externally owned scene data a render path reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneHandles {
    pub scene: SceneHandle,
    pub camera: CameraHandle,
    pub objects: ObjectsHandle,
    pub acceleration_structure: AccelerationStructureHandle,
}

impl Default for SceneHandles {
    fn default() -> Self {
        Self {
            scene: SceneHandle(0),
            camera: CameraHandle(0),
            objects: ObjectsHandle(0),
            acceleration_structure: AccelerationStructureHandle(0),
        }
    }
}
