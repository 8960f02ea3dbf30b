use std::cmp::Ordering;

use egui::Pos2;

use crate::point::{Point, Rgb};

/// Ordered store of painted points. Insertion order is paint order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    points: Vec<Point>,
}

impl Document {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn add_point(&mut self, position: Pos2, color: Rgb, radius: f32) {
        self.points.push(Point::new(position, color, radius));
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Removes every point within `radius` of `position` (inclusive).
    /// Returns the number of points removed.
    ///
    /// A NaN or negative radius removes nothing.
    pub fn erase_near(&mut self, position: Pos2, radius: f32) -> usize {
        let before = self.points.len();
        self.points.retain(|point| {
            // unordered (NaN) comparisons keep the point
            !matches!(
                distance(point.position(), position).partial_cmp(&radius),
                Some(Ordering::Less | Ordering::Equal)
            )
        });
        before - self.points.len()
    }

    /// Removes the most recently added point, if any
    pub fn remove_last_point(&mut self) -> Option<Point> {
        self.points.pop()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Replaces the whole store, dropping the previous contents
    pub fn replace_all(&mut self, points: Vec<Point>) {
        self.points = points;
    }
}

/// Plain Euclidean distance, `sqrt(dx² + dy²)`
fn distance(a: Pos2, b: Pos2) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}
