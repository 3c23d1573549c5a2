use std::collections::HashSet;
use std::time::Instant;

use cgmath::{ortho, perspective, Deg, Matrix4};
use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::fly_camera::{CameraMovement, FlyCamera, OPENGL_TO_WGPU_MATRIX};
use crate::gfx::uniforms::{UniformKey, UniformStage};

const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 100.0;
const ORTHO_HALF_HEIGHT: f32 = 10.0;

const MIN_MOVEMENT_SPEED: f32 = 1.0;
const MAX_MOVEMENT_SPEED: f32 = 50.0;

/// Process-wide projection mode, toggled by the P and O keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Perspective,
    Orthographic,
}

/// Owns the camera and turns per-frame input into view/projection updates.
///
/// Keyboard state is kept as a held-key set fed from winit key events and
/// queried once per frame, which reproduces the synchronous key polling of
/// the display surface. All state here is touched only from the event-loop
/// thread.
pub struct ViewController {
    pub camera: FlyCamera,
    pub projection: ProjectionMode,
    held_keys: HashSet<KeyCode>,
    quit_requested: bool,
    // Mouse latch: the first move after activation only records a reference
    // position, so the camera does not jump to the initial cursor location.
    first_mouse: bool,
    last_x: f32,
    last_y: f32,
    last_frame: Option<Instant>,
}

impl ViewController {
    pub fn new() -> Self {
        Self {
            camera: FlyCamera::default(),
            projection: ProjectionMode::Perspective,
            held_keys: HashSet::new(),
            quit_requested: false,
            first_mouse: true,
            last_x: 0.0,
            last_y: 0.0,
            last_frame: None,
        }
    }

    /// Wall-clock seconds since the previous call. The first call yields
    /// zero so the opening frame does not apply a startup jump.
    pub fn advance_time(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = match self.last_frame {
            Some(previous) => now.duration_since(previous).as_secs_f32(),
            None => 0.0,
        };
        self.last_frame = Some(now);
        elapsed
    }

    /// Feeds a winit key event into the held-key set and handles the
    /// mode-switch keys on press.
    pub fn process_key_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(code) = event.physical_key {
            self.handle_key(code, event.state);
        }
    }

    fn handle_key(&mut self, code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.held_keys.insert(code);
                match code {
                    KeyCode::Escape => self.quit_requested = true,
                    KeyCode::KeyP => self.set_projection_mode(ProjectionMode::Perspective),
                    KeyCode::KeyO => self.set_projection_mode(ProjectionMode::Orthographic),
                    _ => {}
                }
            }
            ElementState::Released => {
                self.held_keys.remove(&code);
            }
        }
    }

    /// Switches the projection mode. Entering orthographic deliberately
    /// snaps the camera to a canonical front-facing pose so the scene is
    /// viewed head-on; returning to perspective leaves the pose untouched.
    pub fn set_projection_mode(&mut self, mode: ProjectionMode) {
        if mode == ProjectionMode::Orthographic {
            self.camera.snap_to_front();
        }
        self.projection = mode;
    }

    /// Applies the held movement keys, each scaled by `movement_speed * dt`.
    pub fn process_keyboard(&mut self, dt: f32) {
        const MOVEMENT_KEYS: [(KeyCode, CameraMovement); 6] = [
            (KeyCode::KeyW, CameraMovement::Forward),
            (KeyCode::KeyS, CameraMovement::Backward),
            (KeyCode::KeyA, CameraMovement::Left),
            (KeyCode::KeyD, CameraMovement::Right),
            (KeyCode::KeyQ, CameraMovement::Up),
            (KeyCode::KeyE, CameraMovement::Down),
        ];
        for (code, movement) in MOVEMENT_KEYS {
            if self.held_keys.contains(&code) {
                self.camera.process_keyboard(movement, dt);
            }
        }
    }

    /// Handles an absolute cursor position report. The y offset is inverted
    /// because screen coordinates grow downward.
    pub fn process_mouse_move(&mut self, x: f32, y: f32) {
        if self.first_mouse {
            self.last_x = x;
            self.last_y = y;
            self.first_mouse = false;
            return;
        }
        let x_offset = x - self.last_x;
        let y_offset = self.last_y - y;
        self.last_x = x;
        self.last_y = y;
        self.camera.process_mouse_movement(x_offset, y_offset);
    }

    /// Adjusts movement speed by the scroll amount, clamped to a sane range.
    pub fn process_scroll(&mut self, y_offset: f32) {
        self.camera.movement_speed =
            (self.camera.movement_speed + y_offset).clamp(MIN_MOVEMENT_SPEED, MAX_MOVEMENT_SPEED);
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.camera.view_matrix()
    }

    /// Builds the projection for the current mode. Perspective uses the
    /// camera zoom as the vertical field of view; orthographic uses a fixed
    /// half-height of 10 world units. Mode switches are instantaneous.
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Matrix4<f32> {
        let projection = match self.projection {
            ProjectionMode::Perspective => {
                perspective(Deg(self.camera.zoom), aspect_ratio, NEAR_PLANE, FAR_PLANE)
            }
            ProjectionMode::Orthographic => {
                let half_width = ORTHO_HALF_HEIGHT * aspect_ratio;
                ortho(
                    -half_width,
                    half_width,
                    -ORTHO_HALF_HEIGHT,
                    ORTHO_HALF_HEIGHT,
                    NEAR_PLANE,
                    FAR_PLANE,
                )
            }
        };
        OPENGL_TO_WGPU_MATRIX * projection
    }

    /// Stages the per-frame camera uniforms: view, projection, and the eye
    /// position used by the lighting calculations.
    pub fn stage_frame_uniforms(&self, stage: &mut UniformStage, aspect_ratio: f32) {
        stage.set_mat4(UniformKey::View, self.view_matrix());
        stage.set_mat4(UniformKey::Projection, self.projection_matrix(aspect_ratio));
        stage.set_vec3(UniformKey::ViewPosition, self.camera.position.into());
    }
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec3;

    #[test]
    fn test_first_advance_time_is_zero() {
        let mut controller = ViewController::new();
        assert_eq!(controller.advance_time(), 0.0);
        // Subsequent calls measure real elapsed time.
        assert!(controller.advance_time() >= 0.0);
    }

    #[test]
    fn test_first_mouse_move_latches_without_rotating() {
        let mut controller = ViewController::new();
        let (yaw, pitch) = (controller.camera.yaw, controller.camera.pitch);
        controller.process_mouse_move(640.0, 400.0);
        assert_eq!(controller.camera.yaw, yaw);
        assert_eq!(controller.camera.pitch, pitch);
    }

    #[test]
    fn test_second_mouse_move_applies_scaled_offsets() {
        let mut controller = ViewController::new();
        controller.process_mouse_move(100.0, 100.0);
        let (yaw, pitch) = (controller.camera.yaw, controller.camera.pitch);
        let sensitivity = controller.camera.mouse_sensitivity;
        // +20 px right, +10 px down; the downward move lowers pitch.
        controller.process_mouse_move(120.0, 110.0);
        assert!((controller.camera.yaw - (yaw + 20.0 * sensitivity)).abs() < 1e-5);
        assert!((controller.camera.pitch - (pitch - 10.0 * sensitivity)).abs() < 1e-5);
    }

    #[test]
    fn test_scroll_clamps_speed() {
        let mut controller = ViewController::new();
        controller.camera.movement_speed = 10.0;
        controller.process_scroll(100.0);
        assert_eq!(controller.camera.movement_speed, 50.0);
        controller.process_scroll(-100.0);
        assert_eq!(controller.camera.movement_speed, 1.0);
    }

    #[test]
    fn test_orthographic_switch_resets_pose() {
        let mut controller = ViewController::new();
        controller.camera.position = vec3(4.0, 2.0, -3.0);
        controller.process_mouse_move(0.0, 0.0);
        controller.process_mouse_move(300.0, -120.0);

        controller.set_projection_mode(ProjectionMode::Orthographic);
        assert_eq!(controller.projection, ProjectionMode::Orthographic);
        assert_eq!(controller.camera.position, vec3(0.0, 0.0, 10.0));
        assert_eq!(controller.camera.yaw, -90.0);
        assert_eq!(controller.camera.pitch, 0.0);
    }

    #[test]
    fn test_perspective_switch_keeps_pose() {
        let mut controller = ViewController::new();
        controller.camera.position = vec3(4.0, 2.0, -3.0);
        controller.camera.yaw = -45.0;
        controller.set_projection_mode(ProjectionMode::Perspective);
        assert_eq!(controller.camera.position, vec3(4.0, 2.0, -3.0));
        assert_eq!(controller.camera.yaw, -45.0);
    }

    #[test]
    fn test_held_movement_keys_translate_camera() {
        let mut controller = ViewController::new();
        controller.camera.position = vec3(0.0, 0.0, 0.0);
        controller.camera.front = vec3(0.0, 0.0, -1.0);
        controller.camera.movement_speed = 10.0;
        controller.handle_key(KeyCode::KeyW, ElementState::Pressed);
        controller.process_keyboard(0.1);
        assert!((controller.camera.position.z - (-1.0)).abs() < 1e-5);

        controller.handle_key(KeyCode::KeyW, ElementState::Released);
        controller.process_keyboard(0.1);
        assert!((controller.camera.position.z - (-1.0)).abs() < 1e-5);
    }

    #[test]
    fn test_quit_request_from_escape() {
        let mut controller = ViewController::new();
        assert!(!controller.quit_requested());
        controller.handle_key(KeyCode::Escape, ElementState::Pressed);
        assert!(controller.quit_requested());
    }

    #[test]
    fn test_projection_keys_switch_modes() {
        let mut controller = ViewController::new();
        controller.handle_key(KeyCode::KeyO, ElementState::Pressed);
        assert_eq!(controller.projection, ProjectionMode::Orthographic);
        controller.handle_key(KeyCode::KeyP, ElementState::Pressed);
        assert_eq!(controller.projection, ProjectionMode::Perspective);
    }
}
