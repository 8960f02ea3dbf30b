use std::path::PathBuf;

use egui::Pos2;

use crate::error::CanvasResult;
use crate::file_handler;
use crate::point::Rgb;
use crate::session::Session;
use crate::state::{ExportRender, ImportSampling};

/// Result type for command execution
pub type CommandResult = CanvasResult<()>;

/// Operations the UI can request from an editing session
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddPoint {
        position: Pos2,
        color: Rgb,
        radius: f32,
    },
    /// Paint at a canvas position using the active mode (brush, line or eraser)
    PaintAt(Pos2),
    EraseNear {
        position: Pos2,
        radius: f32,
    },
    UndoLast,
    Clear,
    StartLine(Pos2),
    FinishLine(Pos2),
    SetSnap(bool),
    SetEraserMode(bool),
    SetLineMode(bool),
    SetDrawColor(Rgb),
    SetDrawRadius(f32),
    SetSmartMaxRadius(f32),
    SetImportFit(bool),
    SetImportSampling(ImportSampling),
    SetExportRender(ExportRender),
    SetCanvasSize {
        width: u32,
        height: u32,
    },
    /// Smart repaint with the given radius cap
    Compact(f32),
    Save(PathBuf),
    Load(PathBuf),
    Import(PathBuf),
    Export(PathBuf),
    OpenInShell(PathBuf),
}

impl Command {
    pub fn execute(&self, session: &mut Session) -> CommandResult {
        match self {
            Command::AddPoint {
                position,
                color,
                radius,
            } => session.add_point(*position, *color, *radius),
            Command::PaintAt(position) => session.paint_at(*position),
            Command::EraseNear { position, radius } => {
                session.erase_near(*position, *radius);
            }
            Command::UndoLast => {
                session.undo_last();
            }
            Command::Clear => session.clear(),
            Command::StartLine(position) => session.start_line(*position),
            Command::FinishLine(position) => {
                session.finish_line(*position);
            }
            Command::SetSnap(enabled) => session.set_snap(*enabled),
            Command::SetEraserMode(enabled) => session.set_eraser_mode(*enabled),
            Command::SetLineMode(enabled) => session.set_line_mode(*enabled),
            Command::SetDrawColor(color) => session.set_draw_color(*color),
            Command::SetDrawRadius(radius) => session.set_draw_radius(*radius),
            Command::SetSmartMaxRadius(radius) => session.set_smart_max_radius(*radius),
            Command::SetImportFit(enabled) => session.set_import_fit(*enabled),
            Command::SetImportSampling(sampling) => session.set_import_sampling(*sampling),
            Command::SetExportRender(render) => session.set_export_render(*render),
            Command::SetCanvasSize { width, height } => session.set_canvas_size(*width, *height),
            Command::Compact(max_radius) => {
                let before = session.points().len();
                let after = session.compact(*max_radius);
                log::info!("Smart repaint merged {} points into {}", before, after);
            }
            Command::Save(path) => session.save(path)?,
            Command::Load(path) => session.load(path)?,
            Command::Import(path) => session.import(path)?,
            Command::Export(path) => session.export(path)?,
            Command::OpenInShell(path) => file_handler::open_in_shell(path),
        }
        Ok(())
    }

    /// Short label for logs and the status line
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddPoint { .. } => "add point",
            Command::PaintAt(_) => "paint",
            Command::EraseNear { .. } => "erase",
            Command::UndoLast => "undo",
            Command::Clear => "clear",
            Command::StartLine(_) => "start line",
            Command::FinishLine(_) => "finish line",
            Command::SetSnap(_) => "snap to grid",
            Command::SetEraserMode(_) => "eraser mode",
            Command::SetLineMode(_) => "line mode",
            Command::SetDrawColor(_) => "draw color",
            Command::SetDrawRadius(_) => "draw size",
            Command::SetSmartMaxRadius(_) => "smart repaint size",
            Command::SetImportFit(_) => "import fit",
            Command::SetImportSampling(_) => "import sampling",
            Command::SetExportRender(_) => "export rendering",
            Command::SetCanvasSize { .. } => "canvas size",
            Command::Compact(_) => "smart repaint",
            Command::Save(_) => "save",
            Command::Load(_) => "load",
            Command::Import(_) => "import",
            Command::Export(_) => "export",
            Command::OpenInShell(_) => "open",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_commands_drive_session() {
        let mut session = Session::default();
        let commands = [
            Command::SetDrawColor(Rgb::new(1.0, 0.0, 0.0)),
            Command::SetDrawRadius(3.0),
            Command::PaintAt(pos2(1.0, 1.0)),
            Command::AddPoint {
                position: pos2(50.0, 50.0),
                color: Rgb::BLACK,
                radius: 1.0,
            },
            Command::StartLine(pos2(0.0, 0.0)),
            Command::FinishLine(pos2(3.0, 3.0)),
        ];
        for command in &commands {
            command.execute(&mut session).unwrap();
        }
        assert_eq!(session.points().len(), 6);

        Command::EraseNear {
            position: pos2(50.0, 50.0),
            radius: 0.0,
        }
        .execute(&mut session)
        .unwrap();
        assert_eq!(session.points().len(), 5);

        Command::UndoLast.execute(&mut session).unwrap();
        assert_eq!(session.points().len(), 4);

        Command::Compact(100.0).execute(&mut session).unwrap();
        assert_eq!(session.points().len(), 1);
        assert_eq!(session.points()[0].radius(), 12.0);

        Command::Clear.execute(&mut session).unwrap();
        assert!(session.points().is_empty());
    }

    #[test]
    fn test_settings_commands_update_config() {
        let mut session = Session::default();
        let commands = [
            Command::SetSmartMaxRadius(30.0),
            Command::SetImportSampling(ImportSampling::Dense),
            Command::SetExportRender(ExportRender::Pixel),
            Command::SetImportFit(true),
        ];
        for command in &commands {
            command.execute(&mut session).unwrap();
        }

        let config = session.config();
        assert_eq!(config.smart_max_radius(), 30.0);
        assert_eq!(config.import_sampling, ImportSampling::Dense);
        assert_eq!(config.export_render, ExportRender::Pixel);
        assert!(config.import_fit);

        Command::SetSmartMaxRadius(-1.0).execute(&mut session).unwrap();
        assert!(session.config().smart_max_radius() > 0.0);
    }

    #[test]
    fn test_io_failure_is_reported() {
        let mut session = Session::default();
        session.paint(pos2(1.0, 1.0));

        let missing = PathBuf::from("/nonexistent/dir/points.bin");
        let result = Command::Load(missing).execute(&mut session);

        assert!(result.is_err());
        assert_eq!(session.points().len(), 1);
    }
}
