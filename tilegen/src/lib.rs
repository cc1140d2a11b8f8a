// The changes suggested by this lint usually make the code more cluttered and less clear:
#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]

pub mod dispatch;
pub mod dynamic;
pub mod grid;
mod objects;
pub mod painter;
pub mod preview;
pub mod range;
pub mod render;
pub mod screen;
pub mod shapes;

pub use objects::{decoration_pool, random_pool, Pool};
pub use render::{render_sublevel, ObjectRender, RenderOutput, RenderSettings};
