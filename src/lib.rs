#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod compact;
pub mod document;
pub mod error;
pub mod file_handler;
pub mod geometry;
pub mod point;
pub mod session;
pub mod state;

pub use app::PaintApp;
pub use command::{Command, CommandResult};
pub use document::Document;
pub use error::{CanvasError, CanvasResult};
pub use point::{Point, Rgb};
pub use session::Session;
pub use state::{CanvasConfig, ExportRender, ImportSampling};
