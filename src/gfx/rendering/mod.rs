// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! One pipeline, one pass: the scene's draw list is replayed over the staged
//! uniforms with alpha blending and depth testing.

pub mod mesh_library;
pub mod render_engine;
pub mod vertex;

// Re-export main types
pub use mesh_library::MeshLibrary;
pub use render_engine::{DrawCommand, RenderEngine};
pub use vertex::Vertex3D;
