use egui::{Color32, Pos2, Rect, Sense, Vec2};

use crate::command::Command;
use crate::point::Rgb;
use crate::session::Session;
use crate::state::{CanvasConfig, ExportRender, ImportSampling};

const CANVAS_BORDER: f32 = 1.5;
const MAX_DRAW_RADIUS: f32 = 42.0;
const MAX_CANVAS_SIDE: u32 = 8192;

/// eframe front end: turns input into [`Command`]s and paints the session's points
pub struct PaintApp {
    session: Session,
    file_name: String,
    image_path: String,
    open_after_export: bool,
    status: Option<String>,
}

impl Default for PaintApp {
    fn default() -> Self {
        Self::with_config(CanvasConfig::default())
    }
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = cc
            .storage
            .and_then(|storage| eframe::get_value::<CanvasConfig>(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Self::with_config(config)
    }

    pub fn with_config(config: CanvasConfig) -> Self {
        Self {
            session: Session::new(config),
            file_name: "new.bin".to_owned(),
            image_path: String::new(),
            open_after_export: false,
            status: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn run(&mut self, command: Command) {
        match command.execute(&mut self.session) {
            Ok(()) => {
                if let Command::Save(path)
                | Command::Load(path)
                | Command::Import(path)
                | Command::Export(path) = &command
                {
                    self.status = Some(format!("{}: {}", command.name(), path.display()));
                }
            }
            Err(err) => {
                log::error!("{} failed: {}", command.name(), err);
                self.status = Some(format!("{} failed: {}", command.name(), err));
            }
        }
    }

    fn shortcuts(&self, ctx: &egui::Context) -> Vec<Command> {
        let mut commands = Vec::new();
        let typing = ctx.wants_keyboard_input();
        ctx.input(|i| {
            if i.modifiers.command && i.key_pressed(egui::Key::S) {
                commands.push(Command::Save(self.file_name.clone().into()));
            }
            if i.modifiers.command && i.key_pressed(egui::Key::O) {
                commands.push(Command::Load(self.file_name.clone().into()));
            }
            if !typing && i.key_pressed(egui::Key::Backspace) {
                commands.push(Command::UndoLast);
            }
        });
        commands
    }

    fn file_bar(&mut self, ui: &mut egui::Ui, commands: &mut Vec<Command>) {
        let config = self.session.config().clone();

        ui.horizontal(|ui| {
            ui.label("File");
            ui.add(egui::TextEdit::singleline(&mut self.file_name).desired_width(160.0));
            if ui.button("Load").clicked() {
                commands.push(Command::Load(self.file_name.clone().into()));
            }
            if ui.button("Save").clicked() {
                commands.push(Command::Save(self.file_name.clone().into()));
            }
            if ui.button("Clear").clicked() {
                commands.push(Command::Clear);
            }
            if ui.button("Undo").clicked() {
                commands.push(Command::UndoLast);
            }
            if ui.button("Smart Repaint").clicked() {
                commands.push(Command::Compact(config.smart_max_radius()));
            }
            let mut max_radius = config.smart_max_radius();
            if ui
                .add(egui::DragValue::new(&mut max_radius).range(1.0..=200.0).prefix("max "))
                .changed()
            {
                commands.push(Command::SetSmartMaxRadius(max_radius));
            }
        });

        ui.horizontal(|ui| {
            ui.label("Image");
            ui.add(egui::TextEdit::singleline(&mut self.image_path).desired_width(160.0));
            if ui.button("Import").clicked() {
                commands.push(Command::Import(self.image_path.clone().into()));
            }

            let mut fit = config.import_fit;
            if ui.checkbox(&mut fit, "Resize").changed() {
                commands.push(Command::SetImportFit(fit));
            }
            let mut sampling = config.import_sampling;
            ui.selectable_value(&mut sampling, ImportSampling::Sparse, "Sparse");
            ui.selectable_value(&mut sampling, ImportSampling::Dense, "Dense");
            if sampling != config.import_sampling {
                commands.push(Command::SetImportSampling(sampling));
            }

            let (mut width, mut height) = (config.width(), config.height());
            let width_changed = ui
                .add(egui::DragValue::new(&mut width).range(1..=MAX_CANVAS_SIDE).prefix("W "))
                .changed();
            let height_changed = ui
                .add(egui::DragValue::new(&mut height).range(1..=MAX_CANVAS_SIDE).prefix("H "))
                .changed();
            if width_changed || height_changed {
                commands.push(Command::SetCanvasSize { width, height });
            }

            if ui.button("Export").clicked() {
                let path = std::path::PathBuf::from(&self.image_path);
                commands.push(Command::Export(path.clone()));
                if self.open_after_export {
                    commands.push(Command::OpenInShell(path));
                }
            }
            let mut render = config.export_render;
            ui.selectable_value(&mut render, ExportRender::Disk, "Disks");
            ui.selectable_value(&mut render, ExportRender::Pixel, "Pixels");
            if render != config.export_render {
                commands.push(Command::SetExportRender(render));
            }
            ui.checkbox(&mut self.open_after_export, "Open");
        });
    }

    fn brush_bar(&mut self, ui: &mut egui::Ui, commands: &mut Vec<Command>) {
        let config = self.session.config().clone();

        ui.horizontal(|ui| {
            let mut snap = config.snap_to_grid;
            if ui.checkbox(&mut snap, "Snap to Grid").changed() {
                commands.push(Command::SetSnap(snap));
            }
            let mut line_mode = config.line_mode;
            if ui.checkbox(&mut line_mode, "Lines Mode").changed() {
                commands.push(Command::SetLineMode(line_mode));
            }
            let mut eraser = config.eraser_mode;
            if ui.checkbox(&mut eraser, "Eraser Mode").changed() {
                commands.push(Command::SetEraserMode(eraser));
            }

            ui.separator();
            ui.label("Color");
            let mut rgb = config.draw_color.to_rgb8();
            if egui::color_picker::color_edit_button_srgb(ui, &mut rgb).changed() {
                commands.push(Command::SetDrawColor(Rgb::from_rgb8(rgb)));
            }

            let mut radius = config.draw_radius();
            if ui
                .add(egui::Slider::new(&mut radius, 1.0..=MAX_DRAW_RADIUS).text("Draw Size"))
                .changed()
            {
                commands.push(Command::SetDrawRadius(radius));
            }
        });
    }

    fn canvas(&mut self, ui: &mut egui::Ui, commands: &mut Vec<Command>) {
        let config = self.session.config();
        let canvas_size = Vec2::new(config.width() as f32, config.height() as f32);
        let (response, painter) = ui.allocate_painter(
            canvas_size + Vec2::splat(2.0 * CANVAS_BORDER),
            Sense::click_and_drag(),
        );

        let origin = response.rect.min + Vec2::splat(CANVAS_BORDER);
        let canvas_rect = Rect::from_min_size(origin, canvas_size);
        let painter = painter.with_clip_rect(canvas_rect);

        let local = response
            .interact_pointer_pos()
            .filter(|pos| canvas_rect.contains(*pos))
            .map(|pos| (pos - origin).to_pos2());

        if let Some(pos) = local {
            if config.line_mode && !config.eraser_mode {
                if response.clicked() {
                    commands.push(Command::PaintAt(pos));
                }
            } else if response.is_pointer_button_down_on() {
                commands.push(Command::PaintAt(pos));
            }
        }

        for point in self.session.points() {
            painter.circle_filled(
                to_screen(origin, point.position()),
                point.radius(),
                Color32::from(point.color()),
            );
        }

        if let Some(start) = self.session.line_start() {
            painter.circle_stroke(
                to_screen(origin, start),
                config.draw_radius() + 2.0,
                egui::Stroke::new(1.0, Color32::GRAY),
            );
        }

        ui.painter().rect_stroke(
            response.rect.shrink(CANVAS_BORDER / 2.0),
            0.0,
            egui::Stroke::new(CANVAS_BORDER, Color32::WHITE),
        );
    }
}

fn to_screen(origin: Pos2, local: Pos2) -> Pos2 {
    origin + local.to_vec2()
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self.session.config());
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut commands = self.shortcuts(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.file_bar(ui, &mut commands);
            self.brush_bar(ui, &mut commands);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("{} points", self.session.points().len()));
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                self.canvas(ui, &mut commands);
            });
        });

        for command in commands {
            self.run(command);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_command_sets_status() {
        let mut app = PaintApp::default();
        app.run(Command::Export("canvas.tiff".into()));
        let status = app.status.clone().unwrap();
        assert!(status.starts_with("export failed"));
        assert!(app.session().points().is_empty());
    }

    #[test]
    fn test_run_applies_editing_commands() {
        let mut app = PaintApp::default();
        app.run(Command::PaintAt(egui::pos2(4.0, 4.0)));
        app.run(Command::PaintAt(egui::pos2(5.0, 4.0)));
        app.run(Command::UndoLast);
        assert_eq!(app.session().points().len(), 1);
        assert!(app.status.is_none());
    }
}
