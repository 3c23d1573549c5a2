use cgmath::{vec3, InnerSpace, Matrix4, Point3, Vector3};

/// Clip-space correction: cgmath produces OpenGL-style clip coordinates
/// (z in [-1, 1]) while wgpu expects z in [0, 1].
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Degrees of pitch at which the front vector would collapse onto the world
/// up axis; movement past this is clamped to avoid a gimbal flip.
const PITCH_LIMIT: f32 = 89.0;

/// Movement directions the keyboard maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Free-flying first person camera.
///
/// Holds a position plus a front/right/up frame derived from yaw and pitch.
/// Keyboard input translates along the frame axes scaled by
/// `movement_speed * dt`; mouse offsets turn into yaw/pitch deltas scaled by
/// a fixed sensitivity.
#[derive(Debug, Clone, Copy)]
pub struct FlyCamera {
    pub position: Vector3<f32>,
    pub front: Vector3<f32>,
    pub up: Vector3<f32>,
    pub right: Vector3<f32>,
    pub world_up: Vector3<f32>,
    /// Heading in degrees; -90 faces down -Z.
    pub yaw: f32,
    /// Elevation in degrees, clamped to +/- `PITCH_LIMIT`.
    pub pitch: f32,
    /// Vertical field of view in degrees for the perspective projection.
    pub zoom: f32,
    /// World units per second; adjusted by the scroll wheel, clamped to [1, 50].
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
}

impl Default for FlyCamera {
    /// The tableau's default viewpoint: slightly above the scene, looking
    /// down toward it.
    fn default() -> Self {
        Self {
            position: vec3(0.5, 5.5, 10.0),
            front: vec3(0.0, -0.5, -2.0).normalize(),
            up: vec3(0.0, 1.0, 0.0),
            right: vec3(1.0, 0.0, 0.0),
            world_up: vec3(0.0, 1.0, 0.0),
            yaw: -90.0,
            pitch: 0.0,
            zoom: 80.0,
            movement_speed: 10.0,
            mouse_sensitivity: 0.1,
        }
    }
}

impl FlyCamera {
    /// Translates the camera along one of its frame axes, scaled by
    /// `movement_speed * dt` for frame-rate independence.
    pub fn process_keyboard(&mut self, movement: CameraMovement, dt: f32) {
        let velocity = self.movement_speed * dt;
        match movement {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
            CameraMovement::Up => self.position += self.up * velocity,
            CameraMovement::Down => self.position -= self.up * velocity,
        }
    }

    /// Applies a mouse offset (in pixels, y already inverted by the caller)
    /// to yaw and pitch and rebuilds the camera frame.
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Snaps to the canonical front-facing pose used by the orthographic
    /// projection: on the +Z axis, level with the horizon, looking at -Z.
    pub fn snap_to_front(&mut self) {
        self.position = vec3(0.0, 0.0, 10.0);
        self.front = vec3(0.0, 0.0, -1.0);
        self.up = vec3(0.0, 1.0, 0.0);
        self.yaw = -90.0;
        self.pitch = 0.0;
        self.update_vectors();
    }

    /// Standard look-at view matrix from the current pose.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::new(self.position.x, self.position.y, self.position.z);
        let target = eye + self.front;
        Matrix4::look_at_rh(eye, target, self.up)
    }

    /// Recomputes front/right/up from yaw and pitch via spherical-to-Cartesian
    /// conversion.
    fn update_vectors(&mut self) {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        self.front = vec3(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec3_near(actual: Vector3<f32>, expected: Vector3<f32>) {
        assert!(
            (actual - expected).magnitude() < 1e-5,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_forward_movement_scales_with_dt() {
        let mut camera = FlyCamera::default();
        camera.front = vec3(0.0, 0.0, -1.0);
        camera.position = vec3(0.0, 0.0, 0.0);
        camera.movement_speed = 10.0;
        camera.process_keyboard(CameraMovement::Forward, 0.5);
        assert_vec3_near(camera.position, vec3(0.0, 0.0, -5.0));
    }

    #[test]
    fn test_pitch_clamped_at_limit() {
        let mut camera = FlyCamera::default();
        camera.process_mouse_movement(0.0, 10_000.0);
        assert_eq!(camera.pitch, 89.0);
        camera.process_mouse_movement(0.0, -100_000.0);
        assert_eq!(camera.pitch, -89.0);
    }

    #[test]
    fn test_front_vector_from_yaw_pitch() {
        let mut camera = FlyCamera::default();
        camera.yaw = -90.0;
        camera.pitch = 0.0;
        camera.process_mouse_movement(0.0, 0.0);
        assert_vec3_near(camera.front, vec3(0.0, 0.0, -1.0));
        assert_vec3_near(camera.right, vec3(1.0, 0.0, 0.0));
        assert_vec3_near(camera.up, vec3(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_snap_to_front_is_canonical() {
        let mut camera = FlyCamera::default();
        camera.position = vec3(3.0, -7.0, 1.0);
        camera.process_mouse_movement(812.0, -245.0);
        camera.snap_to_front();
        assert_vec3_near(camera.position, vec3(0.0, 0.0, 10.0));
        assert_vec3_near(camera.front, vec3(0.0, 0.0, -1.0));
        assert_eq!(camera.yaw, -90.0);
        assert_eq!(camera.pitch, 0.0);
    }
}
