#[allow(clippy::module_inception)]
pub mod canvas;
pub mod palette;
pub mod scores;

pub use canvas::Canvas;
pub use palette::{assign_color, Color, PALETTE};
pub use scores::ScoreTable;
