pub mod animation;
pub mod camera;
pub mod color;
pub mod controls;
pub mod layout;
pub mod math;
pub mod rect;
pub mod region;
pub mod render_loop;
pub mod scene;
pub mod texture;

pub use color::Color;
pub use rect::Rect;
pub use region::{Region, ScissorBox};
