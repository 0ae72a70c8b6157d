//! The compiled render path and its resource table.

use std::collections::BTreeMap;

use super::{CommandStream, FrameContext, PassError, RenderNode};
use crate::backend::{
    AccelerationStructureHandle, CameraHandle, GpuImage, ObjectsHandle, SceneHandle,
};
use crate::compiler::PhysicalResourceId;
use crate::resource::ResourceType;
use crate::types::Extent2d;

/// Backing object of a physical resource bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphResource {
    Image(GpuImage),
    DepthImage(GpuImage),
    Camera(CameraHandle),
    Objects(ObjectsHandle),
    AccelerationStructure(AccelerationStructureHandle),
    Scene(SceneHandle),
}

impl GraphResource {
    pub fn resource_type(&self) -> ResourceType {
        match self {
            Self::Image(_) => ResourceType::Image,
            Self::DepthImage(_) => ResourceType::DepthImage,
            Self::Camera(_) => ResourceType::Camera,
            Self::Objects(_) => ResourceType::Objects,
            Self::AccelerationStructure(_) => ResourceType::AccelerationStructure,
            Self::Scene(_) => ResourceType::Scene,
        }
    }

    /// The allocated image, for image-like resources.
    pub fn image(&self) -> Option<&GpuImage> {
        match self {
            Self::Image(image) | Self::DepthImage(image) => Some(image),
            _ => None,
        }
    }
}

/// Arena of physical resources, keyed by bucket id.
#[derive(Debug, Default, Clone)]
pub struct ResourceTable {
    resources: BTreeMap<PhysicalResourceId, GraphResource>,
}

impl ResourceTable {
    pub(crate) fn insert(&mut self, id: PhysicalResourceId, resource: GraphResource) {
        self.resources.insert(id, resource);
    }

    pub fn get(&self, id: PhysicalResourceId) -> Option<&GraphResource> {
        self.resources.get(&id)
    }

    pub fn contains(&self, id: PhysicalResourceId) -> bool {
        self.resources.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PhysicalResourceId, &GraphResource)> {
        self.resources.iter().map(|(&id, r)| (id, r))
    }

    /// Number of allocated images and depth images.
    pub fn image_count(&self) -> usize {
        self.resources.values().filter(|r| r.image().is_some()).count()
    }
}

/// Ordered runtime nodes plus the resources they are wired to.
///
/// Never mutated after it is installed; a recompile produces a new one.
pub struct RenderPath {
    nodes: Vec<Box<dyn RenderNode>>,
    resources: ResourceTable,
    render_resolution: Extent2d,
    initialized: bool,
}

impl RenderPath {
    pub(crate) fn new(
        nodes: Vec<Box<dyn RenderNode>>,
        resources: ResourceTable,
        render_resolution: Extent2d,
    ) -> Self {
        Self {
            nodes,
            resources,
            render_resolution,
            initialized: false,
        }
    }

    /// Initializes every node in order. Subsequent calls are no-ops.
    pub fn initialize(&mut self) -> Result<(), PassError> {
        if self.initialized {
            return Ok(());
        }
        for node in &mut self.nodes {
            node.initialize(&self.resources)?;
        }
        self.initialized = true;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Records one frame: every node, in order.
    pub fn execute(&self, commands: &mut CommandStream, frame_index: u64) {
        if !self.initialized {
            log::warn!("RenderPath: executing frame {frame_index} before initialize()");
        }
        let frame = FrameContext {
            frame_index,
            render_resolution: self.render_resolution,
            resources: &self.resources,
        };
        for node in &self.nodes {
            node.execute(commands, &frame);
        }
    }

    pub fn nodes(&self) -> &[Box<dyn RenderNode>] {
        &self.nodes
    }

    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name()).collect()
    }

    pub fn resources(&self) -> &ResourceTable {
        &self.resources
    }

    pub fn render_resolution(&self) -> Extent2d {
        self.render_resolution
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl std::fmt::Debug for RenderPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderPath")
            .field("nodes", &self.node_names())
            .field("resources", &self.resources.len())
            .field("render_resolution", &self.render_resolution)
            .field("initialized", &self.initialized)
            .finish()
    }
}
