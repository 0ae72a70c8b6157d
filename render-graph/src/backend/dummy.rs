//! Dummy resource factory for testing and development.
//!
//! This backend doesn't perform actual GPU operations. It hands out
//! sequential image handles so compiled render paths can be inspected
//! without requiring GPU hardware.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::types::TextureDescriptor;

use super::{BackendError, GpuImage, ImageHandle, ResourceFactory};

/// Dummy resource factory.
#[derive(Debug, Default)]
pub struct DummyBackend {
    next_handle: AtomicU64,
    created: AtomicUsize,
    /// Number of successful creations before every further request fails.
    fail_after: Option<usize>,
}

impl DummyBackend {
    /// Create a new dummy backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that fails once `count` images have been created.
    pub fn failing_after(count: usize) -> Self {
        Self {
            fail_after: Some(count),
            ..Self::default()
        }
    }

    /// Number of images created so far.
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    fn allocate(
        &self,
        kind: &'static str,
        descriptor: &TextureDescriptor,
    ) -> Result<GpuImage, BackendError> {
        log::trace!(
            "DummyBackend: creating {} {:?} ({}, {:?}, {:?})",
            kind,
            descriptor.label,
            descriptor.size,
            descriptor.format,
            descriptor.usage
        );

        if let Some(limit) = self.fail_after {
            if self.created.load(Ordering::Relaxed) >= limit {
                return Err(BackendError::ResourceCreationFailed {
                    kind,
                    label: descriptor.label.clone().unwrap_or_default(),
                    reason: "dummy allocation limit reached".to_string(),
                });
            }
        }

        self.created.fetch_add(1, Ordering::Relaxed);
        Ok(GpuImage {
            handle: ImageHandle(self.next_handle.fetch_add(1, Ordering::Relaxed)),
            descriptor: descriptor.clone(),
        })
    }
}

impl ResourceFactory for DummyBackend {
    fn name(&self) -> &str {
        "Dummy Backend"
    }

    fn create_image(&self, descriptor: &TextureDescriptor) -> Result<GpuImage, BackendError> {
        self.allocate("image", descriptor)
    }

    fn create_depth_image(&self, descriptor: &TextureDescriptor) -> Result<GpuImage, BackendError> {
        self.allocate("depth image", descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Extent2d, TextureFormat, TextureUsage};

    fn descriptor() -> TextureDescriptor {
        TextureDescriptor::new_2d(
            Extent2d::new(64, 64),
            TextureFormat::Rgba8Unorm,
            TextureUsage::default(),
        )
        .with_label("test")
    }

    #[test]
    fn test_handles_are_sequential() {
        let backend = DummyBackend::new();
        let a = backend.create_image(&descriptor()).unwrap();
        let b = backend.create_depth_image(&descriptor()).unwrap();
        assert_eq!(a.handle, ImageHandle(0));
        assert_eq!(b.handle, ImageHandle(1));
        assert_eq!(backend.created_count(), 2);
    }

    #[test]
    fn test_failing_backend() {
        let backend = DummyBackend::failing_after(1);
        assert!(backend.create_image(&descriptor()).is_ok());
        let err = backend.create_image(&descriptor()).unwrap_err();
        assert!(err.to_string().contains("'test'"));
    }
}
