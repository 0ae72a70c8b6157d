//! Extents and resolution-relative sizes.

use serde::{Deserialize, Serialize};

// ============================================================================
// Extent2d
// ============================================================================

/// Width and height of a 2D image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent2d {
    pub width: u32,
    pub height: u32,
}

impl Extent2d {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered by this extent.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl Default for Extent2d {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

impl std::fmt::Display for Extent2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ============================================================================
// TextureSize
// ============================================================================

/// Size of an image port, either fixed or relative to the render resolution.
///
/// Two image resources can only share a physical allocation when their
/// sizes compare equal, so the relative form keeps its scale factor rather
/// than being resolved up front.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TextureSize {
    /// Fixed size in pixels.
    Absolute { width: u32, height: u32 },
    /// Scale factor applied to the active render resolution.
    Relative { scale: f32 },
}

impl TextureSize {
    /// Full render resolution.
    pub const FULL: Self = Self::Relative { scale: 1.0 };

    /// Resolves the size against the active render resolution.
    ///
    /// Relative sizes never resolve below one pixel per axis.
    pub fn resolve(&self, render_resolution: Extent2d) -> Extent2d {
        match *self {
            Self::Absolute { width, height } => Extent2d::new(width, height),
            Self::Relative { scale } => {
                let width = (render_resolution.width as f32 * scale).round() as u32;
                let height = (render_resolution.height as f32 * scale).round() as u32;
                Extent2d::new(width.max(1), height.max(1))
            }
        }
    }
}

impl Default for TextureSize {
    fn default() -> Self {
        Self::FULL
    }
}

impl std::fmt::Display for TextureSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absolute { width, height } => write!(f, "{width}x{height}"),
            Self::Relative { scale } => write!(f, "{scale}x render resolution"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_size_resolves_against_resolution() {
        let res = Extent2d::new(1920, 1080);
        assert_eq!(TextureSize::FULL.resolve(res), res);
        assert_eq!(
            TextureSize::Relative { scale: 0.5 }.resolve(res),
            Extent2d::new(960, 540)
        );
    }

    #[test]
    fn test_relative_size_never_zero() {
        let size = TextureSize::Relative { scale: 0.0001 };
        assert_eq!(size.resolve(Extent2d::new(64, 64)), Extent2d::new(1, 1));
    }

    #[test]
    fn test_absolute_size_ignores_resolution() {
        let size = TextureSize::Absolute {
            width: 256,
            height: 128,
        };
        assert_eq!(size.resolve(Extent2d::new(1920, 1080)), Extent2d::new(256, 128));
    }
}
