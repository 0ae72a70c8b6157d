//! Resource model: the vocabulary of graph ports.
//!
//! A [`ResourceSpecification`] is the static declaration a pass kind makes
//! about one of its ports. A [`ResourceDescription`] is that declaration
//! attached to a concrete node in an editable graph, with a graph-unique id
//! and the connection state of the port.

use serde::{Deserialize, Serialize};

use crate::types::{TextureFormat, TextureSize, TextureUsage};

/// Graph-unique identifier of a resource port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(pub u32);

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of data a port carries.
///
/// Only [`ResourceType::Image`] and [`ResourceType::DepthImage`] are backed by
/// compiler-owned allocations and may be aliased. The remaining kinds are
/// handles to scene-owned state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Image,
    DepthImage,
    Camera,
    /// Draw list of scene objects.
    Objects,
    AccelerationStructure,
    /// Aggregate scene handle.
    Scene,
    Unknown,
}

impl ResourceType {
    /// Whether resources of this type may share a physical allocation.
    pub fn is_optimizable(self) -> bool {
        matches!(self, Self::Image | Self::DepthImage)
    }

    /// Whether this type wraps externally owned scene data.
    pub fn is_scene_handle(self) -> bool {
        matches!(
            self,
            Self::Camera | Self::Objects | Self::AccelerationStructure | Self::Scene
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::DepthImage => "DepthImage",
            Self::Camera => "Camera",
            Self::Objects => "Objects",
            Self::AccelerationStructure => "AccelerationStructure",
            Self::Scene => "Scene",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Direction of a port relative to its owning node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceRole {
    Input,
    Output,
    Unknown,
}

impl std::fmt::Display for ResourceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => f.write_str("Input"),
            Self::Output => f.write_str("Output"),
            Self::Unknown => f.write_str("Unknown"),
        }
    }
}

// ============================================================================
// ResourceSpecification
// ============================================================================

/// Static declaration of a port, defined once per pass kind.
///
/// The format, size and usage fields only matter for image-like types; they
/// form the signature two images must share to be aliased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSpecification {
    pub name: String,
    pub role: ResourceRole,
    pub resource_type: ResourceType,
    pub format: TextureFormat,
    pub size: TextureSize,
    pub usage: TextureUsage,
}

impl ResourceSpecification {
    /// Creates a specification with the default image signature.
    pub fn new(name: impl Into<String>, role: ResourceRole, resource_type: ResourceType) -> Self {
        Self {
            name: name.into(),
            role,
            resource_type,
            format: TextureFormat::default(),
            size: TextureSize::default(),
            usage: TextureUsage::default(),
        }
    }

    pub fn input(name: impl Into<String>, resource_type: ResourceType) -> Self {
        Self::new(name, ResourceRole::Input, resource_type)
    }

    pub fn output(name: impl Into<String>, resource_type: ResourceType) -> Self {
        Self::new(name, ResourceRole::Output, resource_type)
    }

    /// Image input with the given format.
    pub fn image_input(name: impl Into<String>, format: TextureFormat) -> Self {
        Self::input(name, ResourceType::Image).with_format(format)
    }

    /// Image output with the given format.
    pub fn image_output(name: impl Into<String>, format: TextureFormat) -> Self {
        Self::output(name, ResourceType::Image).with_format(format)
    }

    /// Depth image output with depth attachment usage.
    pub fn depth_output(name: impl Into<String>, format: TextureFormat) -> Self {
        Self::output(name, ResourceType::DepthImage)
            .with_format(format)
            .with_usage(TextureUsage::DEPTH_DEFAULT)
    }

    pub fn with_format(mut self, format: TextureFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_size(mut self, size: TextureSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_usage(mut self, usage: TextureUsage) -> Self {
        self.usage = usage;
        self
    }

    /// Whether two image specifications can back the same allocation.
    pub fn is_alias_compatible(&self, other: &Self) -> bool {
        self.resource_type == other.resource_type
            && self.format == other.format
            && self.size == other.size
            && self.usage == other.usage
    }
}

// ============================================================================
// ResourceDescription
// ============================================================================

/// A specification attached to a concrete node instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescription {
    pub id: ResourceId,
    pub spec: ResourceSpecification,
    /// Set while an edge ends at this port. Inputs accept at most one edge.
    pub input_is_connected: bool,
}

impl ResourceDescription {
    pub fn new(id: ResourceId, spec: ResourceSpecification) -> Self {
        Self {
            id,
            spec,
            input_is_connected: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn role(&self) -> ResourceRole {
        self.spec.role
    }

    pub fn resource_type(&self) -> ResourceType {
        self.spec.resource_type
    }
}
