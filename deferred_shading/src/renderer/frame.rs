/// Per-frame input and output of the renderer
///
/// The renderer keeps no scene state between frames. Everything a frame
/// draws is handed over in a `FrameContext`, and what it did comes back as
/// `FrameStats`.

use std::sync::Arc;
use crate::camera::Camera;
use crate::light::{DirectionalLight, PointLight};
use crate::model::Model;

/// Runtime switches for the light passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderToggles {
    /// Run the stencil and point-light passes
    pub point_lights: bool,
    /// Run the directional-light pass
    pub directional_light: bool,
}

impl Default for RenderToggles {
    fn default() -> Self {
        Self {
            point_lights: true,
            directional_light: true,
        }
    }
}

/// Everything one frame renders
#[derive(Clone, Copy)]
pub struct FrameContext<'a> {
    pub camera: &'a Camera,
    pub models: &'a [Arc<dyn Model>],
    pub point_lights: &'a [PointLight],
    pub directional_light: Option<&'a DirectionalLight>,
    pub toggles: RenderToggles,
}

impl<'a> FrameContext<'a> {
    /// Empty scene seen from `camera`
    pub fn new(camera: &'a Camera) -> Self {
        Self {
            camera,
            models: &[],
            point_lights: &[],
            directional_light: None,
            toggles: RenderToggles::default(),
        }
    }

    pub fn with_models(mut self, models: &'a [Arc<dyn Model>]) -> Self {
        self.models = models;
        self
    }

    pub fn with_point_lights(mut self, lights: &'a [PointLight]) -> Self {
        self.point_lights = lights;
        self
    }

    pub fn with_directional_light(mut self, light: &'a DirectionalLight) -> Self {
        self.directional_light = Some(light);
        self
    }

    pub fn with_toggles(mut self, toggles: RenderToggles) -> Self {
        self.toggles = toggles;
        self
    }
}

/// Counters of one rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Models drawn in the geometry pass
    pub geometry_draws: u32,
    pub stencil_passes: u32,
    pub point_light_passes: u32,
    pub directional_passes: u32,
    /// Point lights skipped for having no usable bounding sphere
    pub skipped_lights: u32,
    pub final_blits: u32,
}
