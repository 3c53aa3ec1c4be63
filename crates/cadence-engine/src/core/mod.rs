//! Contracts between the control loop and its collaborators.

mod app;
mod backend;
mod screen;

pub use app::App;
pub use backend::RenderBackend;
pub use screen::Screen;
