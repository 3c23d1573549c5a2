pub mod fly_camera;
pub mod view_controller;

// Re-export main types
pub use fly_camera::{CameraMovement, FlyCamera, OPENGL_TO_WGPU_MATRIX};
pub use view_controller::{ProjectionMode, ViewController};
