pub mod render;
pub mod debug;
