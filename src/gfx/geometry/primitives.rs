//! # Primitive Shape Generation
//!
//! Generators for the unit primitives. All shapes carry outward normals and
//! texture coordinates; resolutions are clamped to the minimum that still
//! produces a closed surface.

use super::MeshData;
use std::f32::consts::PI;

/// Generate a flat quad in the XZ plane spanning -1 to 1 on both axes,
/// with the normal pointing up.
pub fn generate_plane() -> MeshData {
    let mut data = MeshData::new();

    let up = [0.0, 1.0, 0.0];
    data.push_vertex([-1.0, 0.0, 1.0], up, [0.0, 0.0]);
    data.push_vertex([1.0, 0.0, 1.0], up, [1.0, 0.0]);
    data.push_vertex([1.0, 0.0, -1.0], up, [1.0, 1.0]);
    data.push_vertex([-1.0, 0.0, -1.0], up, [0.0, 1.0]);

    data.indices = vec![0, 1, 2, 2, 3, 0];
    data
}

/// Generate a unit box centered at the origin, vertices from -0.5 to 0.5 on
/// all axes. Each face has its own four vertices so normals stay flat.
pub fn generate_box() -> MeshData {
    let mut data = MeshData::new();

    // (normal, u tangent, v tangent) per face; vertices are built as
    // center + (+/- u) + (+/- v) so every face shares the same layout.
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];

    for (normal, u_axis, v_axis) in faces {
        let base = data.vertex_count() as u32;
        for (du, dv, uv) in [
            (-0.5, -0.5, [0.0, 0.0]),
            (0.5, -0.5, [1.0, 0.0]),
            (0.5, 0.5, [1.0, 1.0]),
            (-0.5, 0.5, [0.0, 1.0]),
        ] {
            let position = [
                normal[0] * 0.5 + u_axis[0] * du + v_axis[0] * dv,
                normal[1] * 0.5 + u_axis[1] * du + v_axis[1] * dv,
                normal[2] * 0.5 + u_axis[2] * du + v_axis[2] * dv,
            ];
            data.push_vertex(position, normal, uv);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate a UV sphere of radius 1 centered at the origin.
///
/// # Arguments
/// * `longitude_segments` - segments around the Y axis
/// * `latitude_segments` - rings from pole to pole
pub fn generate_sphere(longitude_segments: u32, latitude_segments: u32) -> MeshData {
    let mut data = MeshData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32;
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;

            // On a unit sphere the normal equals the position.
            let x = sin_theta * phi.cos();
            let y = cos_theta;
            let z = sin_theta * phi.sin();

            let u = long as f32 / long_segs as f32;
            let v = lat as f32 / lat_segs as f32;
            data.push_vertex([x, y, z], [x, y, z], [u, v]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.push(first);
            data.indices.push(second);
            data.indices.push(first + 1);

            data.indices.push(second);
            data.indices.push(second + 1);
            data.indices.push(first + 1);
        }
    }

    data
}

/// Generate a cylinder of radius 1 with its base on the XZ plane, extending
/// up to y = 1, capped at both ends.
pub fn generate_cylinder(segments: u32) -> MeshData {
    let mut data = MeshData::new();
    let segs = segments.max(3);

    // Side wall: two rings sharing radial normals.
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        let u = i as f32 / segs as f32;

        data.push_vertex([cos_a, 0.0, sin_a], [cos_a, 0.0, sin_a], [u, 0.0]);
        data.push_vertex([cos_a, 1.0, sin_a], [cos_a, 0.0, sin_a], [u, 1.0]);
    }

    for i in 0..segs {
        let bottom = i * 2;
        let top = bottom + 1;
        let next_bottom = bottom + 2;
        let next_top = bottom + 3;

        data.indices
            .extend_from_slice(&[bottom, top, next_bottom, top, next_top, next_bottom]);
    }

    append_disc_cap(&mut data, 0.0, false, segs);
    append_disc_cap(&mut data, 1.0, true, segs);

    data
}

/// Generate a cone of base radius 1 on the XZ plane with its apex at
/// (0, 1, 0), capped at the base.
pub fn generate_cone(segments: u32) -> MeshData {
    let mut data = MeshData::new();
    let segs = segments.max(3);

    // For a unit cone the slant normal tilts 45 degrees off the base plane.
    let slant = 1.0 / 2.0_f32.sqrt();

    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        let u = i as f32 / segs as f32;
        let normal = [cos_a * slant, slant, sin_a * slant];

        data.push_vertex([cos_a, 0.0, sin_a], normal, [u, 0.0]);
        // One apex vertex per segment keeps the shading seam-free.
        data.push_vertex([0.0, 1.0, 0.0], normal, [u, 1.0]);
    }

    for i in 0..segs {
        let base = i * 2;
        let apex = base + 1;
        let next_base = base + 2;

        data.indices.extend_from_slice(&[base, apex, next_base]);
    }

    append_disc_cap(&mut data, 0.0, false, segs);

    data
}

/// Generate a four-sided pyramid centered at the origin: square base at
/// y = -0.5 with half-extent 0.5, apex at (0, 0.5, 0).
pub fn generate_pyramid4() -> MeshData {
    let mut data = MeshData::new();

    let apex = [0.0, 0.5, 0.0];
    let corners = [
        [-0.5, -0.5, 0.5],
        [0.5, -0.5, 0.5],
        [0.5, -0.5, -0.5],
        [-0.5, -0.5, -0.5],
    ];

    // Four triangular sides with flat face normals.
    for i in 0..4 {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        let normal = face_normal(a, b, apex);
        let base = data.vertex_count() as u32;
        data.push_vertex(a, normal, [0.0, 0.0]);
        data.push_vertex(b, normal, [1.0, 0.0]);
        data.push_vertex(apex, normal, [0.5, 1.0]);
        data.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    // Square base facing down.
    let down = [0.0, -1.0, 0.0];
    let base = data.vertex_count() as u32;
    data.push_vertex(corners[0], down, [0.0, 0.0]);
    data.push_vertex(corners[1], down, [1.0, 0.0]);
    data.push_vertex(corners[2], down, [1.0, 1.0]);
    data.push_vertex(corners[3], down, [0.0, 1.0]);
    data.indices
        .extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);

    data
}

/// Generate a torus whose ring of radius 1 lies in the XY plane around the
/// Z axis.
///
/// # Arguments
/// * `ring_segments` - segments around the main ring
/// * `tube_segments` - segments around the tube cross-section
/// * `thickness` - tube radius
pub fn generate_torus(ring_segments: u32, tube_segments: u32, thickness: f32) -> MeshData {
    let mut data = MeshData::new();

    let ring_segs = ring_segments.max(3);
    let tube_segs = tube_segments.max(3);

    for ring in 0..=ring_segs {
        let theta = ring as f32 * 2.0 * PI / ring_segs as f32;
        let (sin_t, cos_t) = theta.sin_cos();

        for tube in 0..=tube_segs {
            let phi = tube as f32 * 2.0 * PI / tube_segs as f32;
            let (sin_p, cos_p) = phi.sin_cos();

            let radial = 1.0 + thickness * cos_p;
            let position = [radial * cos_t, radial * sin_t, thickness * sin_p];
            let normal = [cos_p * cos_t, cos_p * sin_t, sin_p];
            let uv = [
                ring as f32 / ring_segs as f32,
                tube as f32 / tube_segs as f32,
            ];
            data.push_vertex(position, normal, uv);
        }
    }

    for ring in 0..ring_segs {
        for tube in 0..tube_segs {
            let first = ring * (tube_segs + 1) + tube;
            let second = first + tube_segs + 1;

            data.indices.push(first);
            data.indices.push(second);
            data.indices.push(first + 1);

            data.indices.push(second);
            data.indices.push(second + 1);
            data.indices.push(first + 1);
        }
    }

    data
}

/// Appends a unit-radius disc at the given height, fanned from a center
/// vertex. `facing_up` selects the normal and winding direction.
fn append_disc_cap(data: &mut MeshData, y: f32, facing_up: bool, segments: u32) {
    let normal = if facing_up {
        [0.0, 1.0, 0.0]
    } else {
        [0.0, -1.0, 0.0]
    };

    let center = data.vertex_count() as u32;
    data.push_vertex([0.0, y, 0.0], normal, [0.5, 0.5]);

    for i in 0..=segments {
        let angle = i as f32 * 2.0 * PI / segments as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        data.push_vertex(
            [cos_a, y, sin_a],
            normal,
            [0.5 + 0.5 * cos_a, 0.5 + 0.5 * sin_a],
        );
    }

    for i in 0..segments {
        let current = center + 1 + i;
        let next = current + 1;
        if facing_up {
            data.indices.extend_from_slice(&[center, next, current]);
        } else {
            data.indices.extend_from_slice(&[center, current, next]);
        }
    }
}

/// Flat normal of the triangle (a, b, c) with counter-clockwise winding.
fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let e2 = [c[0] - b[0], c[1] - b[1], c[2] - b[2]];
    let n = [
        e1[1] * e2[2] - e1[2] * e2[1],
        e1[2] * e2[0] - e1[0] * e2[2],
        e1[0] * e2[1] - e1[1] * e2[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    [n[0] / len, n[1] / len, n[2] / len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::MeshKind;

    fn assert_attributes_parallel(data: &MeshData) {
        assert_eq!(data.positions.len(), data.normals.len());
        assert_eq!(data.positions.len(), data.tex_coords.len());
        assert_eq!(data.indices.len() % 3, 0);
        let max = *data.indices.iter().max().unwrap() as usize;
        assert!(max < data.positions.len());
    }

    #[test]
    fn test_plane_is_flat_and_up_facing() {
        let plane = generate_plane();
        assert_eq!(plane.vertex_count(), 4);
        assert_eq!(plane.triangle_count(), 2);
        for (position, normal) in plane.positions.iter().zip(&plane.normals) {
            assert_eq!(position[1], 0.0);
            assert_eq!(*normal, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn test_box_generation() {
        let cube = generate_box();
        assert_eq!(cube.vertex_count(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.triangle_count(), 12);
        assert_attributes_parallel(&cube);
        for position in &cube.positions {
            for coord in position {
                assert!(coord.abs() <= 0.5 + 1e-6);
            }
        }
    }

    #[test]
    fn test_sphere_normals_match_positions() {
        let sphere = generate_sphere(8, 6);
        assert_attributes_parallel(&sphere);
        for (position, normal) in sphere.positions.iter().zip(&sphere.normals) {
            assert_eq!(position, normal);
            let len =
                (position[0].powi(2) + position[1].powi(2) + position[2].powi(2)).sqrt();
            assert!((len - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_cylinder_spans_base_to_unit_height() {
        let cylinder = generate_cylinder(16);
        assert_attributes_parallel(&cylinder);
        let min_y = cylinder.positions.iter().map(|p| p[1]).fold(f32::MAX, f32::min);
        let max_y = cylinder.positions.iter().map(|p| p[1]).fold(f32::MIN, f32::max);
        assert_eq!(min_y, 0.0);
        assert_eq!(max_y, 1.0);
    }

    #[test]
    fn test_cone_has_base_cap_and_apex() {
        let cone = generate_cone(16);
        assert_attributes_parallel(&cone);
        assert!(cone.positions.iter().any(|p| *p == [0.0, 1.0, 0.0]));
        let down_facing = cone.normals.iter().filter(|n| **n == [0.0, -1.0, 0.0]).count();
        assert!(down_facing > 0);
    }

    #[test]
    fn test_pyramid4_generation() {
        let pyramid = generate_pyramid4();
        assert_eq!(pyramid.vertex_count(), 16); // 4 sides * 3 + base * 4
        assert_eq!(pyramid.triangle_count(), 6);
        assert_attributes_parallel(&pyramid);
        for normal in &pyramid.normals {
            let len = (normal[0].powi(2) + normal[1].powi(2) + normal[2].powi(2)).sqrt();
            assert!((len - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_torus_stays_within_ring_bounds() {
        let thickness = 0.2;
        let torus = generate_torus(12, 8, thickness);
        assert_attributes_parallel(&torus);
        for position in &torus.positions {
            let radial = (position[0].powi(2) + position[1].powi(2)).sqrt();
            assert!(radial <= 1.0 + thickness + 1e-5);
            assert!(radial >= 1.0 - thickness - 1e-5);
            assert!(position[2].abs() <= thickness + 1e-5);
        }
    }

    #[test]
    fn test_all_kinds_generate_nonempty_meshes() {
        for kind in MeshKind::ALL {
            let mesh = kind.generate();
            assert!(mesh.vertex_count() > 0, "{:?} produced no vertices", kind);
            assert!(mesh.triangle_count() > 0, "{:?} produced no triangles", kind);
        }
    }
}
