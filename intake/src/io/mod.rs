//! I/O collaborators of the intake controller.

pub mod clock;
pub mod config;
pub mod render;
pub mod sink;
