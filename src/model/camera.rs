use glam::{Mat4, Vec3};

pub const DEFAULT_YAW: f32 = -90.0;
pub const DEFAULT_PITCH: f32 = 0.0;
pub const MOVEMENT_SPEED: f32 = 6.0;
pub const MOUSE_SENSITIVITY: f32 = 0.15;
pub const DEFAULT_ZOOM: f32 = 45.0;
pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 45.0;

/// Pitch is kept just short of ±90° so `front` never becomes parallel to
/// `world_up` and the cross product in `derive_basis` stays well-defined.
const PITCH_LIMIT: f32 = 89.0;

/// Per-frame gravity pull folded into acceleration (scaled by dt).
const GRAVITY: f32 = 0.1;
/// Upward thrust added to acceleration by a single ASCEND input.
const ASCEND_THRUST: f32 = 0.003;

/// One discrete movement input for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementDirection {
    Forward,
    Backward,
    Left,
    Right,
    Ascend,
}

/// First-person fly camera.
///
/// Orientation lives in `yaw`/`pitch` (degrees); the orthonormal
/// `front`/`right`/`up` basis is derived from them and never mutated
/// directly. Position accumulates discrete movement inputs plus a simple
/// velocity/acceleration integrator with gravity and a floor at y = 0.
pub struct FlyCamera {
    pub position: Vec3,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    velocity: Vec3,
    acceleration: Vec3,
    movement_speed: f32,
    mouse_sensitivity: f32,
    zoom: f32,
}

impl FlyCamera {
    pub fn new(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: world_up,
            world_up,
            yaw,
            pitch,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            movement_speed: MOVEMENT_SPEED,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            zoom: DEFAULT_ZOOM,
        };
        camera.derive_basis();
        camera
    }

    pub fn at(position: Vec3) -> Self {
        Self::new(position, Vec3::Y, DEFAULT_YAW, DEFAULT_PITCH)
    }

    /// Rebuild `front`/`right`/`up` from the current yaw/pitch.
    fn derive_basis(&mut self) {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        let front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        );
        self.front = front.normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    /// Apply one frame's worth of a held movement input. Call once per
    /// active direction; multiple directions may land in the same frame.
    pub fn process_movement(&mut self, direction: MovementDirection, dt: f32) {
        let distance = self.movement_speed * dt;
        match direction {
            MovementDirection::Forward => self.position += self.front * distance,
            MovementDirection::Backward => self.position -= self.front * distance,
            MovementDirection::Left => self.position -= self.right * distance,
            MovementDirection::Right => self.position += self.right * distance,
            // Ascend is thrust, not translation; the integrator picks it up.
            MovementDirection::Ascend => self.acceleration.y += ASCEND_THRUST,
        }
    }

    /// Apply an accumulated mouse delta. Positive `dy` pitches up.
    pub fn process_look(&mut self, dx: f32, dy: f32, constrain_pitch: bool) {
        self.yaw += dx * self.mouse_sensitivity;
        self.pitch += dy * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.derive_basis();
    }

    /// Advance the velocity/acceleration state by one frame.
    ///
    /// Position is updated with the *previous* velocity before acceleration
    /// folds in, giving a one-frame lag. The ordering is load-bearing: from
    /// rest, gravity shows up in velocity one frame before it shows up in
    /// position.
    pub fn integrate(&mut self, dt: f32) {
        self.acceleration.y -= GRAVITY * dt;
        self.position += self.velocity;
        self.velocity += self.acceleration;
        self.acceleration = Vec3::ZERO;
    }

    /// Floor collision: snap to y = 0 when at or below it. Velocity is left
    /// alone, so a resting camera keeps accumulating downward velocity and
    /// sticks to the floor until an ASCEND thrust overcomes it.
    pub fn ground_clamp(&mut self) {
        if self.position.y <= 0.0 {
            self.position.y = 0.0;
        }
    }

    /// Bounded scroll-to-zoom: scrolling toward the scene narrows the FOV.
    pub fn process_scroll(&mut self, delta: f32) {
        self.set_zoom(self.zoom - delta);
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Vertical field of view in degrees, for the caller's projection matrix.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn basis_is_orthonormal_across_orientations() {
        for yaw_step in 0..12 {
            for pitch_step in -8..=8 {
                let yaw = yaw_step as f32 * 30.0;
                let pitch = pitch_step as f32 * 11.0; // stays inside (-89, 89)
                let cam = FlyCamera::new(Vec3::ZERO, Vec3::Y, yaw, pitch);

                assert!(
                    (cam.front().length() - 1.0).abs() < EPS,
                    "front not unit at yaw={yaw} pitch={pitch}"
                );
                assert!(
                    (cam.right().length() - 1.0).abs() < EPS,
                    "right not unit at yaw={yaw} pitch={pitch}"
                );
                assert!(
                    (cam.up().length() - 1.0).abs() < EPS,
                    "up not unit at yaw={yaw} pitch={pitch}"
                );

                assert!(cam.front().dot(cam.right()).abs() < EPS);
                assert!(cam.front().dot(cam.up()).abs() < EPS);
                assert!(cam.right().dot(cam.up()).abs() < EPS);
            }
        }
    }

    #[test]
    fn default_orientation_faces_negative_z() {
        let cam = FlyCamera::default();
        assert!((cam.front() - Vec3::NEG_Z).length() < EPS);
        assert!((cam.right() - Vec3::X).length() < EPS);
        assert!((cam.up() - Vec3::Y).length() < EPS);
    }

    #[test]
    fn pitch_clamps_to_exactly_89_degrees() {
        let mut cam = FlyCamera::default();
        for _ in 0..10 {
            cam.process_look(0.0, 1e6, true);
        }
        assert_eq!(cam.pitch(), 89.0);

        for _ in 0..10 {
            cam.process_look(0.0, -1e6, true);
        }
        assert_eq!(cam.pitch(), -89.0);
    }

    #[test]
    fn unconstrained_pitch_is_not_clamped() {
        let mut cam = FlyCamera::default();
        cam.process_look(0.0, 1000.0, false);
        assert!(cam.pitch() > 89.0);
    }

    #[test]
    fn look_scales_by_sensitivity() {
        let mut cam = FlyCamera::default();
        cam.process_look(10.0, 4.0, true);
        assert!((cam.yaw() - (DEFAULT_YAW + 10.0 * MOUSE_SENSITIVITY)).abs() < EPS);
        assert!((cam.pitch() - 4.0 * MOUSE_SENSITIVITY).abs() < EPS);
    }

    #[test]
    fn forward_then_backward_returns_to_start() {
        let start = Vec3::new(3.0, 5.0, -2.0);
        let mut cam = FlyCamera::new(start, Vec3::Y, 37.0, 21.0);
        cam.process_movement(MovementDirection::Forward, 0.016);
        cam.process_movement(MovementDirection::Backward, 0.016);
        assert!((cam.position - start).length() < EPS);
    }

    #[test]
    fn left_then_right_returns_to_start() {
        let start = Vec3::new(-1.0, 2.0, 4.0);
        let mut cam = FlyCamera::new(start, Vec3::Y, -120.0, -30.0);
        cam.process_movement(MovementDirection::Left, 0.016);
        cam.process_movement(MovementDirection::Right, 0.016);
        assert!((cam.position - start).length() < EPS);
    }

    #[test]
    fn strafe_moves_along_right_axis() {
        let mut cam = FlyCamera::at(Vec3::ZERO);
        cam.process_movement(MovementDirection::Right, 1.0);
        let expected = cam.right() * MOVEMENT_SPEED;
        assert!((cam.position - expected).length() < EPS);
    }

    #[test]
    fn gravity_lags_one_frame_behind_velocity() {
        let mut cam = FlyCamera::at(Vec3::new(0.0, 0.0, 3.0));

        // First step: old velocity (zero) moves position, so y is untouched
        // while velocity picks up the full gravity pull.
        cam.integrate(1.0);
        assert_eq!(cam.position.y, 0.0);
        assert!((cam.velocity().y + 0.1).abs() < EPS);

        // Second step: last frame's velocity now moves the position.
        cam.integrate(1.0);
        assert!((cam.position.y + 0.1).abs() < EPS);
    }

    #[test]
    fn ground_clamp_snaps_to_zero_and_keeps_velocity() {
        let mut cam = FlyCamera::at(Vec3::ZERO);
        for _ in 0..20 {
            cam.integrate(1.0);
        }
        assert!(cam.position.y < 0.0);
        let sinking = cam.velocity();

        cam.ground_clamp();
        assert_eq!(cam.position.y, 0.0);
        assert_eq!(cam.velocity(), sinking);
    }

    #[test]
    fn ground_clamp_leaves_airborne_camera_alone() {
        let mut cam = FlyCamera::at(Vec3::new(0.0, 2.5, 0.0));
        cam.ground_clamp();
        assert_eq!(cam.position.y, 2.5);
    }

    #[test]
    fn ascend_thrust_feeds_the_integrator() {
        let mut cam = FlyCamera::at(Vec3::ZERO);
        // Enough thrust to outweigh one frame of gravity.
        for _ in 0..100 {
            cam.process_movement(MovementDirection::Ascend, 0.016);
        }
        cam.integrate(0.016);
        assert!(cam.velocity().y > 0.0);
        // Position still lags a frame behind.
        assert_eq!(cam.position.y, 0.0);
        cam.integrate(0.016);
        assert!(cam.position.y > 0.0);
    }

    #[test]
    fn view_matrix_matches_reference_look_at() {
        // eye (0,0,3) facing -Z with +Y up: the canonical case.
        let cam = FlyCamera::at(Vec3::new(0.0, 0.0, 3.0));

        // Reference right-handed look-at built by hand (column-major).
        let eye = Vec3::new(0.0, 0.0, 3.0);
        let f = Vec3::NEG_Z;
        let s = f.cross(Vec3::Y).normalize();
        let u = s.cross(f);
        let reference = Mat4::from_cols_array(&[
            s.x, u.x, -f.x, 0.0,
            s.y, u.y, -f.y, 0.0,
            s.z, u.z, -f.z, 0.0,
            -s.dot(eye), -u.dot(eye), f.dot(eye), 1.0,
        ]);

        let view = cam.view_matrix();
        let diff = (view - reference).to_cols_array();
        assert!(
            diff.iter().all(|v| v.abs() < EPS),
            "view={view:?} reference={reference:?}"
        );
    }

    #[test]
    fn scroll_zoom_stays_within_bounds() {
        let mut cam = FlyCamera::default();
        assert_eq!(cam.zoom(), DEFAULT_ZOOM);

        cam.process_scroll(10.0);
        assert!((cam.zoom() - 35.0).abs() < EPS);

        for _ in 0..100 {
            cam.process_scroll(10.0);
        }
        assert_eq!(cam.zoom(), MIN_ZOOM);

        for _ in 0..100 {
            cam.process_scroll(-10.0);
        }
        assert_eq!(cam.zoom(), MAX_ZOOM);
    }
}
