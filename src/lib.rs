pub mod logging;
pub mod utils;

// MVC architecture
pub mod controller;
pub mod model;
pub mod view;

pub use controller::{CameraController, InputState, KeyBindings};
pub use model::{FlyCamera, MovementDirection};
