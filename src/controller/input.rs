//! Explicit input state owned by the application and handed to the camera
//! update each frame. Replaces the usual pile of globals (key array, last
//! mouse position) with a struct the event loop feeds and the controller
//! drains.

use std::collections::HashSet;

use winit::keyboard::KeyCode;

use crate::model::MovementDirection;

/// Snapshot of everything the camera update needs from the window system:
/// held keys, accumulated mouse-look delta, accumulated scroll delta, and
/// whether the cursor is currently captured.
pub struct InputState {
    pub pressed_keys: HashSet<KeyCode>,
    look_delta: (f32, f32),
    scroll_delta: f32,
    pub cursor_locked: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            look_delta: (0.0, 0.0),
            scroll_delta: 0.0,
            cursor_locked: false,
        }
    }

    pub fn key_down(&mut self, key: KeyCode) {
        self.pressed_keys.insert(key);
    }

    pub fn key_up(&mut self, key: KeyCode) {
        self.pressed_keys.remove(&key);
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Drop all held keys, used on focus loss so nothing stays stuck down.
    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
    }

    /// Accumulate raw mouse motion. Ignored while the cursor is free so the
    /// camera doesn't spin when the user is interacting with the UI.
    pub fn push_look(&mut self, dx: f32, dy: f32) {
        if self.cursor_locked {
            self.look_delta.0 += dx;
            self.look_delta.1 += dy;
        }
    }

    pub fn push_scroll(&mut self, delta: f32) {
        self.scroll_delta += delta;
    }

    /// Take this frame's accumulated look delta, resetting it.
    pub fn consume_look(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.look_delta)
    }

    /// Take this frame's accumulated scroll delta, resetting it.
    pub fn consume_scroll(&mut self) -> f32 {
        std::mem::take(&mut self.scroll_delta)
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// Key mapping configuration.
#[derive(Clone)]
pub struct KeyBindings {
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub ascend: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            backward: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            ascend: KeyCode::Space,
        }
    }
}

/// Maps an input snapshot to the movement directions active this frame.
/// Arrow keys double as movement alternates regardless of bindings.
#[derive(Clone, Default)]
pub struct InputProcessor {
    bindings: KeyBindings,
}

impl InputProcessor {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn is_moving_forward(&self, input: &InputState) -> bool {
        input.is_key_pressed(self.bindings.forward) || input.is_key_pressed(KeyCode::ArrowUp)
    }

    pub fn is_moving_backward(&self, input: &InputState) -> bool {
        input.is_key_pressed(self.bindings.backward) || input.is_key_pressed(KeyCode::ArrowDown)
    }

    pub fn is_moving_left(&self, input: &InputState) -> bool {
        input.is_key_pressed(self.bindings.left) || input.is_key_pressed(KeyCode::ArrowLeft)
    }

    pub fn is_moving_right(&self, input: &InputState) -> bool {
        input.is_key_pressed(self.bindings.right) || input.is_key_pressed(KeyCode::ArrowRight)
    }

    pub fn is_ascending(&self, input: &InputState) -> bool {
        input.is_key_pressed(self.bindings.ascend)
    }

    /// All directions held this frame, in a fixed order.
    pub fn active_directions(&self, input: &InputState) -> Vec<MovementDirection> {
        let mut directions = Vec::new();
        if self.is_moving_forward(input) {
            directions.push(MovementDirection::Forward);
        }
        if self.is_moving_backward(input) {
            directions.push(MovementDirection::Backward);
        }
        if self.is_moving_left(input) {
            directions.push(MovementDirection::Left);
        }
        if self.is_moving_right(input) {
            directions.push(MovementDirection::Right);
        }
        if self.is_ascending(input) {
            directions.push(MovementDirection::Ascend);
        }
        directions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_state_tracks_press_and_release() {
        let mut input = InputState::new();
        input.key_down(KeyCode::KeyW);
        assert!(input.is_key_pressed(KeyCode::KeyW));
        input.key_up(KeyCode::KeyW);
        assert!(!input.is_key_pressed(KeyCode::KeyW));
    }

    #[test]
    fn clear_keys_releases_everything() {
        let mut input = InputState::new();
        input.key_down(KeyCode::KeyW);
        input.key_down(KeyCode::Space);
        input.clear_keys();
        assert!(input.pressed_keys.is_empty());
    }

    #[test]
    fn look_delta_only_accumulates_while_locked() {
        let mut input = InputState::new();
        input.push_look(3.0, 4.0);
        assert_eq!(input.consume_look(), (0.0, 0.0));

        input.cursor_locked = true;
        input.push_look(3.0, 4.0);
        input.push_look(1.0, -1.0);
        assert_eq!(input.consume_look(), (4.0, 3.0));
        // Consuming resets the accumulator.
        assert_eq!(input.consume_look(), (0.0, 0.0));
    }

    #[test]
    fn scroll_accumulates_and_resets() {
        let mut input = InputState::new();
        input.push_scroll(1.0);
        input.push_scroll(-3.0);
        assert_eq!(input.consume_scroll(), -2.0);
        assert_eq!(input.consume_scroll(), 0.0);
    }

    #[test]
    fn default_bindings_map_wasd_and_space() {
        let processor = InputProcessor::default();
        let mut input = InputState::new();
        input.key_down(KeyCode::KeyW);
        input.key_down(KeyCode::KeyA);
        input.key_down(KeyCode::Space);

        let directions = processor.active_directions(&input);
        assert_eq!(
            directions,
            vec![
                MovementDirection::Forward,
                MovementDirection::Left,
                MovementDirection::Ascend,
            ]
        );
    }

    #[test]
    fn arrow_keys_are_movement_alternates() {
        let processor = InputProcessor::default();
        let mut input = InputState::new();
        input.key_down(KeyCode::ArrowUp);
        input.key_down(KeyCode::ArrowRight);

        assert!(processor.is_moving_forward(&input));
        assert!(processor.is_moving_right(&input));
    }
}
