//! GPU mesh library
//!
//! Uploads each primitive mesh once; every scene instance of a shape draws
//! from the same vertex and index buffers.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::gfx::geometry::{MeshData, MeshKind};

use super::vertex::Vertex3D;

/// One uploaded primitive.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// All primitive meshes, uploaded once at startup.
#[derive(Default)]
pub struct MeshLibrary {
    meshes: HashMap<MeshKind, GpuMesh>,
}

impl MeshLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates and uploads every primitive kind.
    pub fn load_all(&mut self, device: &wgpu::Device) {
        for kind in MeshKind::ALL {
            let data = kind.generate();
            self.upload(device, kind, &data);
        }
        log::info!("uploaded {} primitive meshes", self.meshes.len());
    }

    fn upload(&mut self, device: &wgpu::Device, kind: MeshKind, data: &MeshData) {
        let vertices: Vec<Vertex3D> = (0..data.vertex_count())
            .map(|i| Vertex3D {
                position: data.positions[i],
                normal: data.normals[i],
                tex_coords: data.tex_coords[i],
            })
            .collect();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", kind)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", kind)),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        self.meshes.insert(
            kind,
            GpuMesh {
                vertex_buffer,
                index_buffer,
                index_count: data.indices.len() as u32,
            },
        );
    }

    /// Issues the draw for one primitive. A kind that was never uploaded is
    /// skipped with a warning rather than panicking mid-pass.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, kind: MeshKind) {
        let Some(mesh) = self.meshes.get(&kind) else {
            log::warn!("mesh {:?} was never uploaded, skipping draw", kind);
            return;
        };
        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
    }

    /// Drops every uploaded buffer.
    pub fn release(&mut self) {
        for (_, mesh) in self.meshes.drain() {
            mesh.vertex_buffer.destroy();
            mesh.index_buffer.destroy();
        }
    }
}
