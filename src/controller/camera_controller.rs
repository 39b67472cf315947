use crate::controller::input::{InputProcessor, InputState, KeyBindings};
use crate::model::FlyCamera;

/// Drives one camera frame from an input snapshot: discrete movement, then
/// mouse look, then scroll zoom, then the physics step and floor clamp.
pub struct CameraController {
    processor: InputProcessor,
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            processor: InputProcessor::default(),
        }
    }

    pub fn with_bindings(bindings: KeyBindings) -> Self {
        Self {
            processor: InputProcessor::new(bindings),
        }
    }

    /// Advance the camera by one frame.
    ///
    /// Mouse deltas are sanitized here, at the boundary; the camera itself
    /// assumes well-formed numeric input. winit reports y growing downward,
    /// so the sign flips before the camera sees it (positive dy pitches up).
    pub fn update(&self, camera: &mut FlyCamera, input: &mut InputState, dt: f32) {
        for direction in self.processor.active_directions(input) {
            camera.process_movement(direction, dt);
        }

        let (dx, dy) = input.consume_look();
        if dx.is_finite() && dy.is_finite() && (dx != 0.0 || dy != 0.0) {
            camera.process_look(dx, -dy, true);
        }

        let scroll = input.consume_scroll();
        if scroll.is_finite() && scroll != 0.0 {
            camera.process_scroll(scroll);
        }

        camera.integrate(dt);
        camera.ground_clamp();
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}
