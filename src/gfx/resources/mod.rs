//! Scene resource management
//!
//! Handles the material catalog and the texture registry backing the scene's
//! texture units.

pub mod material;
pub mod texture_registry;

// Re-export main types
pub use material::{MaterialCatalog, ObjectMaterial};
pub use texture_registry::{TextureError, TextureRegistry, MAX_SCENE_TEXTURES};
