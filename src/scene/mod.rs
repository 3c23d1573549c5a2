//! Scene assembly
//!
//! The static nursery tableau and the composer that turns it into per-frame
//! draw commands.

pub mod composer;
pub mod tableau;

// Re-export main types
pub use composer::SceneComposer;
pub use tableau::ObjectInstance;
