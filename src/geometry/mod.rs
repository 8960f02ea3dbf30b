mod line;
mod snap;

pub use line::BresenhamLine;
pub use snap::snap_to_grid;
