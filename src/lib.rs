// src/lib.rs
//! Nursery Tableau
//!
//! A small scene-composition renderer built on wgpu and winit: a static
//! nursery scene assembled from textured primitives, explored with a
//! fly-through camera.

pub mod app;
pub mod gfx;
pub mod scene;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::TableauApp;

/// Creates a default tableau application instance
pub fn default() -> TableauApp {
    TableauApp::new()
}
