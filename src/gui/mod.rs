pub mod app;
pub mod controller;
pub mod controls;
pub mod frame_list_renderer;
pub mod status;
pub mod textures;


pub use app::*;
