use egui::Pos2;

/// Integer Bresenham line between two canvas positions.
///
/// Endpoints are truncated toward zero (saturating at the `i32` range). The
/// iterator yields every cell from the start to the end inclusive and is
/// exhausted after the end cell. Error terms are kept in `i64` so any pair of
/// `i32` cells can be walked without overflow.
#[derive(Debug, Clone)]
pub struct BresenhamLine {
    x: i64,
    y: i64,
    end_x: i64,
    end_y: i64,
    dx: i64,
    dy: i64,
    sx: i64,
    sy: i64,
    err: i64,
    done: bool,
}

impl BresenhamLine {
    pub fn new(start: Pos2, end: Pos2) -> Self {
        Self::from_cells((start.x as i32, start.y as i32), (end.x as i32, end.y as i32))
    }

    pub fn from_cells((x1, y1): (i32, i32), (x2, y2): (i32, i32)) -> Self {
        let (x1, y1, x2, y2) = (i64::from(x1), i64::from(y1), i64::from(x2), i64::from(y2));
        let dx = (x2 - x1).abs();
        let dy = (y2 - y1).abs();
        Self {
            x: x1,
            y: y1,
            end_x: x2,
            end_y: y2,
            dx,
            dy,
            sx: if x1 < x2 { 1 } else { -1 },
            sy: if y1 < y2 { 1 } else { -1 },
            err: dx - dy,
            done: false,
        }
    }
}

impl Iterator for BresenhamLine {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        // x and y stay between the i32 endpoints
        let current = (self.x as i32, self.y as i32);
        if self.x == self.end_x && self.y == self.end_y {
            self.done = true;
            return Some(current);
        }

        // Both branches may fire in one step, which produces a diagonal move
        let e2 = 2 * self.err;
        if e2 > -self.dy {
            self.err -= self.dy;
            self.x += self.sx;
        }
        if e2 < self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        // Chebyshev distance to the end, plus the current cell
        let remaining = (self.end_x - self.x)
            .unsigned_abs()
            .max((self.end_y - self.y).unsigned_abs()) as usize
            + 1;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BresenhamLine {}

impl std::iter::FusedIterator for BresenhamLine {}
