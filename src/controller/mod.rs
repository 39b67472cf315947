// CONTROLLER: input handling and per-frame camera update
pub mod camera_controller;
pub mod input;

pub use camera_controller::CameraController;
pub use input::{InputProcessor, InputState, KeyBindings};
