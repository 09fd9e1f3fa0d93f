pub mod render;

pub use render::{SkiaSurface, decode_image, render_text_pixmap};
