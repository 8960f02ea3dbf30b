use egui::Pos2;

/// Moves `pos` to the nearest multiple of `grid` on each axis.
///
/// Ties round away from zero (`f32::round`). A grid that is not strictly
/// positive leaves the position untouched.
pub fn snap_to_grid(pos: Pos2, grid: f32) -> Pos2 {
    if grid.is_nan() || grid <= 0.0 {
        return pos;
    }
    egui::pos2(snap_axis(pos.x, grid), snap_axis(pos.y, grid))
}

fn snap_axis(value: f32, grid: f32) -> f32 {
    (value / grid).round() * grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_snaps_to_nearest_multiple() {
        assert_eq!(snap_to_grid(pos2(7.0, 11.9), 5.0), pos2(5.0, 10.0));
        assert_eq!(snap_to_grid(pos2(8.0, 13.0), 5.0), pos2(10.0, 15.0));
    }

    #[test]
    fn test_half_rounds_away_from_zero() {
        assert_eq!(snap_to_grid(pos2(2.5, 7.5), 5.0), pos2(5.0, 10.0));
        assert_eq!(snap_to_grid(pos2(1.0, 3.0), 2.0), pos2(2.0, 4.0));
    }

    #[test]
    fn test_snap_is_idempotent() {
        for &grid in &[1.0, 2.0, 3.0, 4.5, 12.0] {
            for i in 0..50 {
                let raw = pos2(i as f32 * 3.7, i as f32 * 1.3 + 0.25);
                let once = snap_to_grid(raw, grid);
                assert_eq!(snap_to_grid(once, grid), once, "grid {grid}, raw {raw:?}");
            }
        }
    }

    #[test]
    fn test_invalid_grid_is_identity() {
        let raw = pos2(3.3, 4.4);
        assert_eq!(snap_to_grid(raw, 0.0), raw);
        assert_eq!(snap_to_grid(raw, -1.0), raw);
        assert_eq!(snap_to_grid(raw, f32::NAN), raw);
    }
}
