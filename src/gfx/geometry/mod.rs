//! # Procedural Geometry Generation
//!
//! This module provides the unit primitive meshes every scene object is built
//! from. Each generator produces positions, normals, texture coordinates, and
//! triangle indices ready for GPU upload; objects get their world-space size
//! from the model matrix, never from the mesh itself.
//!
//! ## Supported Primitives
//!
//! - **Plane**: flat quad in XZ spanning -1 to 1, normal up
//! - **Box**: unit box centered at the origin
//! - **Sphere**: unit-radius UV sphere centered at the origin
//! - **Cylinder / Cone**: unit radius, base on the XZ plane, extending to y = 1
//! - **Pyramid4**: four-sided pyramid centered at the origin
//! - **Torus**: ring of radius 1 in the XY plane with a configurable tube
//!
//! ## Usage
//!
//! ```rust
//! use tableau::gfx::geometry::{MeshKind, generate_sphere};
//!
//! // Generate through the mesh catalog with the stock resolution
//! let sphere = MeshKind::Sphere.generate();
//!
//! // Or directly, with explicit resolution
//! let coarse = generate_sphere(8, 4);
//! ```

pub mod primitives;

pub use primitives::*;

/// Every primitive shape the scene composer can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Plane,
    Box,
    Sphere,
    Cylinder,
    Cone,
    Pyramid4,
    Torus,
}

impl MeshKind {
    /// All primitive kinds, in the order the mesh library uploads them.
    pub const ALL: [MeshKind; 7] = [
        MeshKind::Plane,
        MeshKind::Box,
        MeshKind::Sphere,
        MeshKind::Cylinder,
        MeshKind::Cone,
        MeshKind::Pyramid4,
        MeshKind::Torus,
    ];

    /// Generates the mesh at the stock resolution used by the renderer.
    pub fn generate(self) -> MeshData {
        match self {
            MeshKind::Plane => generate_plane(),
            MeshKind::Box => generate_box(),
            MeshKind::Sphere => generate_sphere(32, 16),
            MeshKind::Cylinder => generate_cylinder(32),
            MeshKind::Cone => generate_cone(32),
            MeshKind::Pyramid4 => generate_pyramid4(),
            MeshKind::Torus => generate_torus(32, 16, 0.2),
        }
    }
}

/// Generated geometry ready for GPU upload.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions (x, y, z)
    pub positions: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one vertex across the parallel attribute arrays.
    pub(crate) fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) {
        self.positions.push(position);
        self.normals.push(normal);
        self.tex_coords.push(uv);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
