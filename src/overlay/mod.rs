//! Name-plate rasterization and alpha compositing onto BGR frames.

pub mod composite;
pub mod plate;
pub mod text;

pub use composite::{blit, composite};
pub use plate::{PlateBox, PlateRenderer, PlateStyle};
pub use text::{TextLayoutEngine, find_font};
