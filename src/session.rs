use std::path::Path;

use egui::Pos2;

use crate::compact::compact;
use crate::document::Document;
use crate::error::CanvasResult;
use crate::file_handler;
use crate::geometry::{snap_to_grid, BresenhamLine};
use crate::point::{Point, Rgb};
use crate::state::{CanvasConfig, ExportRender, ImportSampling};

/// One editing session: the point store, its settings and the pending line gesture.
///
/// All operations run synchronously on the caller's thread. File operations
/// leave the document untouched when they fail.
#[derive(Debug, Default)]
pub struct Session {
    document: Document,
    config: CanvasConfig,
    line_start: Option<Pos2>,
}

impl Session {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            document: Document::new(),
            config: config.sanitized(),
            line_start: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn points(&self) -> &[Point] {
        self.document.points()
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Pending line start, if the first click of a line has been recorded
    pub fn line_start(&self) -> Option<Pos2> {
        self.line_start
    }

    // --- editing ---

    pub fn add_point(&mut self, position: Pos2, color: Rgb, radius: f32) {
        self.document.add_point(position, color, radius);
    }

    /// Adds a point with the session colour and radius, snapped if enabled
    pub fn paint(&mut self, position: Pos2) {
        let position = self.snap(position);
        self.document
            .add_point(position, self.config.draw_color, self.config.draw_radius());
    }

    pub fn erase_near(&mut self, position: Pos2, radius: f32) -> usize {
        self.document.erase_near(position, radius)
    }

    pub fn undo_last(&mut self) -> Option<Point> {
        self.document.remove_last_point()
    }

    pub fn clear(&mut self) {
        self.document.clear();
    }

    /// Applies a single press on the canvas according to the active mode.
    ///
    /// Eraser mode takes precedence over line mode; erasing is never snapped.
    pub fn paint_at(&mut self, position: Pos2) {
        if self.config.eraser_mode {
            let removed = self.erase_near(position, self.config.draw_radius());
            if removed > 0 {
                log::debug!("Erased {} points near {:?}", removed, position);
            }
        } else if self.config.line_mode {
            self.finish_line(position);
        } else {
            self.paint(position);
        }
    }

    // --- line gesture ---

    pub fn start_line(&mut self, position: Pos2) {
        self.line_start = Some(position);
    }

    /// Completes the pending line at `end` and returns the number of points added.
    ///
    /// Without a pending start this records `end` as the start instead.
    /// Endpoints outside the canvas are clamped onto its edge first.
    pub fn finish_line(&mut self, end: Pos2) -> usize {
        let Some(start) = self.line_start.take() else {
            self.start_line(end);
            return 0;
        };

        let color = self.config.draw_color;
        let radius = self.config.draw_radius();
        let before = self.document.len();
        let start = self.clamp_to_canvas(self.snap(start));
        let end = self.clamp_to_canvas(self.snap(end));
        for (x, y) in BresenhamLine::new(start, end) {
            self.document
                .add_point(egui::pos2(x as f32, y as f32), color, radius);
        }
        self.document.len() - before
    }

    fn clamp_to_canvas(&self, position: Pos2) -> Pos2 {
        let last_cell = egui::pos2(
            self.config.width() as f32 - 1.0,
            self.config.height() as f32 - 1.0,
        );
        egui::Rect::from_min_max(Pos2::ZERO, last_cell).clamp(position)
    }

    fn snap(&self, position: Pos2) -> Pos2 {
        if self.config.snap_to_grid {
            snap_to_grid(position, self.config.draw_radius())
        } else {
            position
        }
    }

    // --- settings ---

    pub fn set_snap(&mut self, enabled: bool) {
        self.config.snap_to_grid = enabled;
    }

    pub fn set_eraser_mode(&mut self, enabled: bool) {
        self.config.eraser_mode = enabled;
    }

    pub fn set_line_mode(&mut self, enabled: bool) {
        self.config.line_mode = enabled;
        if !enabled {
            self.line_start = None;
        }
    }

    pub fn set_draw_color(&mut self, color: Rgb) {
        self.config.draw_color = color;
    }

    pub fn set_draw_radius(&mut self, radius: f32) {
        self.config.set_draw_radius(radius);
    }

    pub fn set_smart_max_radius(&mut self, radius: f32) {
        self.config.set_smart_max_radius(radius);
    }

    pub fn set_import_fit(&mut self, enabled: bool) {
        self.config.import_fit = enabled;
    }

    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        self.config.set_size(width, height);
    }

    pub fn set_import_sampling(&mut self, sampling: ImportSampling) {
        self.config.import_sampling = sampling;
    }

    pub fn set_export_render(&mut self, render: ExportRender) {
        self.config.export_render = render;
    }

    // --- compaction ---

    /// Merges runs of same-coloured points; returns the new point count
    pub fn compact(&mut self, max_radius: f32) -> usize {
        let merged = compact(self.document.points(), max_radius);
        self.document.replace_all(merged);
        self.document.len()
    }

    // --- files ---

    pub fn save(&self, path: &Path) -> CanvasResult<()> {
        file_handler::save_points(path, self.document.points())
    }

    pub fn load(&mut self, path: &Path) -> CanvasResult<()> {
        let points = file_handler::load_points(path)?;
        self.document.replace_all(points);
        Ok(())
    }

    /// Replaces the document with points sampled from the image at `path`
    pub fn import(&mut self, path: &Path) -> CanvasResult<()> {
        let fit = self
            .config
            .import_fit
            .then(|| (self.config.width(), self.config.height()));
        let image = file_handler::decode_image(path, fit)?;
        let points = file_handler::points_from_image(
            &image,
            self.config.import_step(),
            self.config.draw_radius(),
        );
        log::info!(
            "Imported {} points from {} ({}x{})",
            points.len(),
            path.display(),
            image.width(),
            image.height()
        );
        self.document.replace_all(points);
        Ok(())
    }

    pub fn export(&self, path: &Path) -> CanvasResult<()> {
        let image = file_handler::rasterize(
            self.document.points(),
            self.config.width(),
            self.config.height(),
            self.config.export_render,
        );
        file_handler::encode_image(&image, path)
    }
}
