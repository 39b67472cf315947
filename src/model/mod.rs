// MODEL: camera state and motion
pub mod camera;

pub use camera::{FlyCamera, MovementDirection};
