//! Texture formats, usage flags and extents shared by the resource model,
//! the compiler and the backends.

mod extent;
mod texture;

pub use extent::{Extent2d, TextureSize};
pub use texture::{TextureDescriptor, TextureFormat, TextureUsage};
