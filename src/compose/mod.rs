//! Layout, per-frame composition and single-frame preview.

pub mod frame;
pub mod layout;
pub mod preview;

pub use frame::{FrameCompositor, compose_frame, render_plates};
pub use layout::{Layout, layout, plate_origin};
pub use preview::{PreviewImage, create_preview};
