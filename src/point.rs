use egui::Pos2;
use serde::{Deserialize, Serialize};

/// Smallest radius a point may carry
pub const MIN_RADIUS: f32 = 0.5;

/// RGB colour with normalized channels in `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self::new(
            f32::from(rgb[0]) / 255.0,
            f32::from(rgb[1]) / 255.0,
            f32::from(rgb[2]) / 255.0,
        )
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        [
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
        ]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<Rgb> for egui::Color32 {
    fn from(rgb: Rgb) -> Self {
        let [r, g, b] = rgb.to_rgb8();
        egui::Color32::from_rgb(r, g, b)
    }
}

fn channel_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// A single painted mark on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    position: Pos2,
    color: Rgb,
    radius: f32,
}

impl Point {
    /// Radii that are not strictly positive (or NaN) are raised to [`MIN_RADIUS`].
    pub fn new(position: Pos2, color: Rgb, radius: f32) -> Self {
        Self {
            position,
            color,
            radius: sanitize_radius(radius),
        }
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Same point with a different radius
    pub(crate) fn with_radius(self, radius: f32) -> Self {
        Self::new(self.position, self.color, radius)
    }
}

pub(crate) fn sanitize_radius(radius: f32) -> f32 {
    // f32::max returns the other operand for NaN
    radius.max(MIN_RADIUS)
}
