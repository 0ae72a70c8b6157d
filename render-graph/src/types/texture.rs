//! Texture formats, usage flags and the descriptor handed to resource factories.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::Extent2d;

/// Texture format enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextureFormat {
    // 8-bit formats
    /// 8-bit red channel, unsigned normalized.
    R8Unorm,

    // 32-bit formats
    /// 32-bit red channel, float.
    R32Float,
    /// 16-bit RG channels, float.
    Rg16Float,
    /// 8-bit RGBA channels, unsigned normalized.
    Rgba8Unorm,
    /// 8-bit RGBA channels, sRGB.
    Rgba8UnormSrgb,

    // 64-bit formats
    /// 16-bit RGBA channels, float.
    Rgba16Float,

    // 128-bit formats
    /// 32-bit RGBA channels, float.
    #[default]
    Rgba32Float,

    // Depth/stencil formats
    /// 24-bit depth with 8-bit stencil.
    Depth24PlusStencil8,
    /// 32-bit depth, float.
    Depth32Float,
}

impl TextureFormat {
    /// Returns true if this is a depth or stencil format.
    pub fn is_depth_stencil(&self) -> bool {
        matches!(self, Self::Depth24PlusStencil8 | Self::Depth32Float)
    }

    /// Returns the size in bytes per pixel/block.
    pub fn block_size(&self) -> u32 {
        match self {
            Self::R8Unorm => 1,
            Self::R32Float
            | Self::Rg16Float
            | Self::Rgba8Unorm
            | Self::Rgba8UnormSrgb
            | Self::Depth24PlusStencil8
            | Self::Depth32Float => 4,
            Self::Rgba16Float => 8,
            Self::Rgba32Float => 16,
        }
    }
}

impl std::fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

bitflags! {
    /// Usage flags for textures.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TextureUsage: u32 {
        /// Texture can be copied from.
        const COPY_SRC = 1 << 0;
        /// Texture can be copied to.
        const COPY_DST = 1 << 1;
        /// Texture can be sampled in a shader.
        const TEXTURE_BINDING = 1 << 2;
        /// Texture can be used as a storage texture.
        const STORAGE_BINDING = 1 << 3;
        /// Texture can be used as a render attachment.
        const RENDER_ATTACHMENT = 1 << 4;
    }
}

impl TextureUsage {
    /// Usage every image port gets unless its declaration says otherwise.
    pub const IMAGE_DEFAULT: Self = Self::COPY_SRC
        .union(Self::TEXTURE_BINDING)
        .union(Self::STORAGE_BINDING);

    /// Usage for depth attachments.
    pub const DEPTH_DEFAULT: Self = Self::TEXTURE_BINDING.union(Self::RENDER_ATTACHMENT);
}

impl Default for TextureUsage {
    fn default() -> Self {
        Self::IMAGE_DEFAULT
    }
}

/// Descriptor for creating a texture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureDescriptor {
    /// Debug label for the texture.
    pub label: Option<String>,
    /// Size of the texture.
    pub size: Extent2d,
    /// Texture format.
    pub format: TextureFormat,
    /// Usage flags.
    pub usage: TextureUsage,
}

impl TextureDescriptor {
    /// Create a new 2D texture descriptor.
    pub fn new_2d(size: Extent2d, format: TextureFormat, usage: TextureUsage) -> Self {
        Self {
            label: None,
            size,
            format,
            usage,
        }
    }

    /// Set the debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Size of the texture in bytes.
    pub fn byte_size(&self) -> u64 {
        self.size.area() * u64::from(self.format.block_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_formats() {
        assert!(TextureFormat::Depth32Float.is_depth_stencil());
        assert!(TextureFormat::Depth24PlusStencil8.is_depth_stencil());
        assert!(!TextureFormat::Rgba16Float.is_depth_stencil());
    }

    #[test]
    fn test_default_image_usage() {
        let usage = TextureUsage::default();
        assert!(usage.contains(TextureUsage::COPY_SRC));
        assert!(usage.contains(TextureUsage::TEXTURE_BINDING));
        assert!(usage.contains(TextureUsage::STORAGE_BINDING));
        assert!(!usage.contains(TextureUsage::RENDER_ATTACHMENT));
    }

    #[test]
    fn test_descriptor_byte_size() {
        let desc = TextureDescriptor::new_2d(
            Extent2d::new(4, 2),
            TextureFormat::Rgba16Float,
            TextureUsage::default(),
        )
        .with_label("hdr");
        assert_eq!(desc.byte_size(), 64);
        assert_eq!(desc.label.as_deref(), Some("hdr"));
    }
}
