//! # Graphics Module
//!
//! This module contains all graphics-related functionality for the Tableau engine,
//! including the fly-through camera, the forward rendering pipeline, procedural
//! geometry, and texture/material resources.
//!
//! ## Architecture Overview
//!
//! The graphics system is organized into several key components:
//!
//! - **Camera System** ([`camera`]) - Fly-through camera with perspective and
//!   orthographic projections
//! - **Rendering Pipeline** ([`rendering`]) - Forward Phong pipeline over the
//!   staged uniform state
//! - **Procedural Geometry** ([`geometry`]) - The unit primitives every scene
//!   object is built from
//! - **Resource Management** ([`resources`]) - Texture registry and material
//!   catalog
//! - **Uniform Staging** ([`uniforms`]) - CPU-side uniform store shared by the
//!   camera, scene, and renderer
//!
//! ## Usage
//!
//! The graphics system is primarily used through the [`RenderEngine`] and
//! [`UniformStage`] types:
//!
//! ```no_run
//! use tableau::gfx::uniforms::{UniformKey, UniformStage};
//!
//! // The render engine is typically created automatically by TableauApp.
//! // Scene code stages uniforms and the renderer snapshots them per draw.
//! let mut stage = UniformStage::new();
//! stage.set_bool(UniformKey::UseLighting, true);
//! ```
//!
//! [`RenderEngine`]: rendering::render_engine::RenderEngine
//! [`UniformStage`]: uniforms::UniformStage

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod transform;
pub mod uniforms;

// Re-export commonly used types
pub use camera::view_controller::ViewController;
pub use rendering::render_engine::RenderEngine;
pub use uniforms::{UniformKey, UniformStage};
