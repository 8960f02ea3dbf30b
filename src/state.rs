use serde::{Deserialize, Serialize};

use crate::point::{sanitize_radius, Rgb};

pub const DEFAULT_CANVAS_WIDTH: u32 = 800;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 800;
pub const DEFAULT_DRAW_RADIUS: f32 = 2.0;
pub const DEFAULT_SMART_MAX_RADIUS: f32 = 12.0;

/// How an imported image is sampled into points
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportSampling {
    /// One point per pixel
    Dense,
    /// One point every `draw_radius` pixels on both axes
    #[default]
    Sparse,
}

/// How points are rendered into an exported image
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportRender {
    /// Filled disk of the point's radius
    #[default]
    Disk,
    /// A single pixel at the point's position
    Pixel,
}

/// Session settings. Persisted with the app, never with the point list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    width: u32,
    height: u32,
    draw_radius: f32,
    pub draw_color: Rgb,
    pub snap_to_grid: bool,
    pub line_mode: bool,
    pub eraser_mode: bool,
    smart_max_radius: f32,
    pub import_fit: bool,
    pub import_sampling: ImportSampling,
    pub export_render: ExportRender,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            draw_radius: DEFAULT_DRAW_RADIUS,
            draw_color: Rgb::WHITE,
            snap_to_grid: false,
            line_mode: false,
            eraser_mode: false,
            smart_max_radius: DEFAULT_SMART_MAX_RADIUS,
            import_fit: false,
            import_sampling: ImportSampling::default(),
            export_render: ExportRender::default(),
        }
    }
}

impl CanvasConfig {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    pub fn draw_radius(&self) -> f32 {
        self.draw_radius
    }

    pub fn set_draw_radius(&mut self, radius: f32) {
        self.draw_radius = sanitize_radius(radius);
    }

    pub fn smart_max_radius(&self) -> f32 {
        self.smart_max_radius
    }

    pub fn set_smart_max_radius(&mut self, radius: f32) {
        self.smart_max_radius = sanitize_radius(radius);
    }

    /// Pixel stride used when sampling an imported image
    pub fn import_step(&self) -> usize {
        match self.import_sampling {
            ImportSampling::Dense => 1,
            ImportSampling::Sparse => (self.draw_radius as usize).max(1),
        }
    }

    /// Re-applies the setter clamps, e.g. after deserializing stored settings
    pub fn sanitized(mut self) -> Self {
        self.set_size(self.width, self.height);
        self.set_draw_radius(self.draw_radius);
        self.set_smart_max_radius(self.smart_max_radius);
        self
    }
}
