//! Pass kinds and the port catalogue each kind declares.

use serde::{Deserialize, Serialize};

use crate::resource::{ResourceSpecification, ResourceType};
use crate::types::TextureFormat;

/// Closed set of pass types a graph node can instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassKind {
    /// Graph root. Publishes scene-owned data and is not executed.
    SceneProvider,
    GBuffer,
    Lighting,
    AmbientOcclusion,
    AntiAliasing,
    GaussianBlur,
    /// Graph sink that hands the final image to the swapchain.
    Present,
    Unknown,
}

impl PassKind {
    /// All kinds, in catalogue order.
    pub const ALL: [PassKind; 8] = [
        Self::SceneProvider,
        Self::GBuffer,
        Self::Lighting,
        Self::AmbientOcclusion,
        Self::AntiAliasing,
        Self::GaussianBlur,
        Self::Present,
        Self::Unknown,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::SceneProvider => "Scene Provider",
            Self::GBuffer => "G-Buffer",
            Self::Lighting => "Lighting",
            Self::AmbientOcclusion => "Ambient Occlusion",
            Self::AntiAliasing => "Anti-Aliasing",
            Self::GaussianBlur => "Gaussian Blur",
            Self::Present => "Present",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether a graph may contain at most one node of this kind.
    pub fn is_singleton(self) -> bool {
        matches!(self, Self::SceneProvider | Self::Present)
    }

    /// Port declarations for this kind, in port order.
    pub fn resource_specs(self) -> Vec<ResourceSpecification> {
        use ResourceSpecification as Spec;
        match self {
            Self::SceneProvider => vec![
                Spec::output("Scene", ResourceType::Scene),
                Spec::output("Objects", ResourceType::Objects),
                Spec::output("Camera", ResourceType::Camera),
                Spec::output("TLAS", ResourceType::AccelerationStructure),
            ],
            Self::GBuffer => vec![
                Spec::input("Scene", ResourceType::Scene),
                Spec::image_output("Position", TextureFormat::Rgba32Float),
                Spec::image_output("Normal", TextureFormat::Rg16Float),
                Spec::image_output("Albedo", TextureFormat::Rgba8Unorm),
                Spec::depth_output("Depth", TextureFormat::Depth32Float),
            ],
            Self::Lighting => vec![
                Spec::input("Camera", ResourceType::Camera),
                Spec::input("TLAS", ResourceType::AccelerationStructure),
                Spec::image_input("Position", TextureFormat::Rgba32Float),
                Spec::image_input("Normal", TextureFormat::Rg16Float),
                Spec::image_input("Albedo", TextureFormat::Rgba8Unorm),
                Spec::input("Depth", ResourceType::DepthImage).with_format(TextureFormat::Depth32Float),
                Spec::image_input("AO Image", TextureFormat::R32Float),
                Spec::image_output("Lighting Result", TextureFormat::Rgba16Float),
            ],
            Self::AmbientOcclusion => vec![
                Spec::image_input("Position", TextureFormat::Rgba32Float),
                Spec::image_input("Normal", TextureFormat::Rg16Float),
                Spec::input("Camera", ResourceType::Camera),
                Spec::input("TLAS", ResourceType::AccelerationStructure),
                Spec::image_output("AO Image", TextureFormat::R32Float),
            ],
            Self::AntiAliasing => vec![
                Spec::image_input("Image", TextureFormat::Rgba16Float),
                Spec::image_output("Anti-Aliased Image", TextureFormat::Rgba16Float),
            ],
            Self::GaussianBlur => vec![
                Spec::image_input("Image", TextureFormat::Rgba16Float),
                Spec::image_output("Blurred Image", TextureFormat::Rgba16Float),
            ],
            Self::Present => vec![Spec::image_input("Final Image", TextureFormat::Rgba16Float)],
            Self::Unknown => Vec::new(),
        }
    }
}

impl std::fmt::Display for PassKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
