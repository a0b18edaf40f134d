pub mod render;
pub mod reporter;
