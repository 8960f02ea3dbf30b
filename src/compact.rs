//! Smart repaint: run-length compaction of same-colour points.
//!
//! A single left-to-right pass groups consecutive points of identical colour.
//! The first point of a run is kept (position and colour) and every following
//! point of that run grows its radius, up to a cap. Positions inside a run are
//! lost, so this is a visual approximation rather than a lossless merge.

use crate::point::{sanitize_radius, Point, Rgb};

/// Compacts `points` into runs, never producing a radius above `max_radius`.
///
/// The first point always opens a new group, whatever its colour.
pub fn compact(points: &[Point], max_radius: f32) -> Vec<Point> {
    let cap = sanitize_radius(max_radius);
    let mut merged: Vec<Point> = Vec::with_capacity(points.len());
    let mut current: Option<Rgb> = None;

    for point in points {
        match merged.last_mut() {
            Some(last) if current == Some(point.color()) => {
                *last = last.with_radius((last.radius() + point.radius()).min(cap));
            }
            _ => {
                current = Some(point.color());
                merged.push(point.with_radius(point.radius().min(cap)));
            }
        }
    }

    log::debug!("Compacted {} points into {}", points.len(), merged.len());
    merged
}
