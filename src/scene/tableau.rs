//! The nursery tableau
//!
//! A static table of object instances: a textured floor and backdrop, a
//! hanging mobile with toys, a bassinet built from sphere-bead rails and
//! tilted side panels, and a couch along the back wall. Order matters only
//! for blending; the table is otherwise pure data.

use cgmath::{vec3, Vector3};
use std::f32::consts::{FRAC_PI_2, PI};

use crate::gfx::geometry::MeshKind;

/// One entry of the scene table. `color` paints the mesh flat when no
/// texture is given; when both are present the texture wins.
#[derive(Debug, Clone)]
pub struct ObjectInstance {
    pub mesh: MeshKind,
    pub scale: Vector3<f32>,
    pub rotation_degrees: Vector3<f32>,
    pub position: Vector3<f32>,
    pub material: &'static str,
    pub texture: Option<&'static str>,
    pub color: Option<[f32; 4]>,
    pub uv_scale: [f32; 2],
}

impl ObjectInstance {
    fn new(mesh: MeshKind, scale: Vector3<f32>, position: Vector3<f32>) -> Self {
        Self {
            mesh,
            scale,
            rotation_degrees: vec3(0.0, 0.0, 0.0),
            position,
            material: "plastic",
            texture: None,
            color: None,
            uv_scale: [1.0, 1.0],
        }
    }

    fn rotated(mut self, degrees: Vector3<f32>) -> Self {
        self.rotation_degrees = degrees;
        self
    }

    fn material(mut self, tag: &'static str) -> Self {
        self.material = tag;
        self
    }

    fn texture(mut self, tag: &'static str) -> Self {
        self.texture = Some(tag);
        self
    }

    fn color(mut self, rgba: [f32; 4]) -> Self {
        self.color = Some(rgba);
        self
    }

    fn uv(mut self, u: f32, v: f32) -> Self {
        self.uv_scale = [u, v];
        self
    }
}

const LIGHT_GRAY: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

/// Builds the full instance table in draw order.
pub fn build_tableau() -> Vec<ObjectInstance> {
    let mut instances = Vec::new();

    // Sandy floor and the sky-blue brick backdrop.
    instances.push(
        ObjectInstance::new(MeshKind::Plane, vec3(20.0, 1.0, 10.0), vec3(0.0, 0.0, 0.0))
            .material("stone")
            .color([1.0, 1.0, 1.0, 1.0])
            .texture("sand_texture"),
    );
    instances.push(
        ObjectInstance::new(MeshKind::Plane, vec3(20.0, 1.0, 10.0), vec3(0.0, 9.0, -10.0))
            .rotated(vec3(90.0, 0.0, 0.0))
            .material("stone")
            .color([0.54, 0.81, 0.94, 1.0])
            .texture("brick_texture"),
    );

    push_mobile(&mut instances);
    push_bassinet(&mut instances);
    push_couch(&mut instances);

    instances
}

/// The hanging mobile: a ceiling ring, three arm segments joined by small
/// spheres, and four strings holding the toys.
fn push_mobile(instances: &mut Vec<ObjectInstance>) {
    instances.push(
        ObjectInstance::new(MeshKind::Torus, vec3(0.5, 0.5, 0.25), vec3(0.0, 6.0, 0.0))
            .rotated(vec3(90.0, 0.0, 0.0))
            .texture("plasticd_texture"),
    );

    // Arm segments; the negative Y scales point the cylinders downward.
    instances.push(
        ObjectInstance::new(
            MeshKind::Cylinder,
            vec3(0.10, -2.05, 0.10),
            vec3(0.0, 6.25, 0.0),
        )
        .rotated(vec3(0.0, 0.0, 90.0))
        .color(LIGHT_GRAY)
        .texture("plasticd_texture"),
    );
    instances.push(
        ObjectInstance::new(
            MeshKind::Cylinder,
            vec3(0.10, -0.35, 0.10),
            vec3(0.0, 6.25, 0.0),
        )
        .color(LIGHT_GRAY)
        .texture("plasticd_texture"),
    );
    instances.push(
        ObjectInstance::new(
            MeshKind::Cylinder,
            vec3(0.10, -3.35, 0.10),
            vec3(2.05, 6.25, 0.0),
        )
        .color(LIGHT_GRAY)
        .texture("plasticd_texture"),
    );

    // Joints where the arms meet.
    for x in [0.0, 2.05] {
        instances.push(
            ObjectInstance::new(MeshKind::Sphere, vec3(0.10, 0.10, 0.10), vec3(x, 6.25, 0.0))
                .texture("plasticd_texture"),
        );
    }

    // Strings down to the toys, drawn untextured.
    for position in [
        vec3(0.525, 5.30, 0.0),
        vec3(-0.525, 5.30, 0.0),
        vec3(0.0, 5.30, 0.50),
        vec3(0.0, 5.30, -0.50),
    ] {
        instances.push(
            ObjectInstance::new(MeshKind::Cylinder, vec3(0.02, 0.65, 0.02), position)
                .color(LIGHT_GRAY),
        );
    }

    // The toys: pyramid, ball, block, and a five-pointed star built from
    // overlapping pyramids.
    instances.push(
        ObjectInstance::new(
            MeshKind::Pyramid4,
            vec3(0.31, 0.31, 0.31),
            vec3(0.525, 5.25, 0.0),
        )
        .texture("plasticb_texture")
        .uv(0.10, 0.10),
    );
    instances.push(
        ObjectInstance::new(
            MeshKind::Sphere,
            vec3(0.23, 0.23, 0.23),
            vec3(0.0, 5.25, -0.50),
        )
        .texture("plasticc_texture")
        .uv(0.20, 0.20),
    );
    instances.push(
        ObjectInstance::new(MeshKind::Box, vec3(0.28, 0.28, 0.28), vec3(0.0, 5.35, 0.50))
            .texture("plastic_texture")
            .uv(0.10, 0.10),
    );

    let star_points = [
        (0.0, 5.35, 0.0),
        (65.0, 5.26, 0.10),
        (-65.0, 5.26, -0.10),
        (145.0, 5.15, 0.05),
        (-145.0, 5.15, -0.05),
    ];
    for (x_rotation, y, z) in star_points {
        instances.push(
            ObjectInstance::new(
                MeshKind::Pyramid4,
                vec3(0.18, 0.25, 0.08),
                vec3(-0.525, y, z),
            )
            .rotated(vec3(x_rotation, 0.0, 0.0))
            .texture("plasticb_texture")
            .uv(0.10, 0.10),
        );
    }
}

/// The bassinet: three visible legs, two rails of arc-swept beads joined by
/// straight bars, tilted cloth panels, and the mattress cloth.
fn push_bassinet(instances: &mut Vec<ObjectInstance>) {
    for position in [
        vec3(-1.5, 0.55, 1.1),
        vec3(1.5, 0.55, 1.1),
        vec3(-1.5, 0.55, -1.1),
    ] {
        instances.push(
            ObjectInstance::new(MeshKind::Cylinder, vec3(0.1, 1.72, 0.1), position)
                .texture("plasticd_texture"),
        );
    }

    // Upper rail ring.
    push_bead_rail(instances, 10, 1.0, 2.95, 2.0, 1.0);
    // Lower rail ring, smaller and closer to the floor of the basket.
    push_bead_rail(instances, 6, 0.5, 2.15, 1.65, 0.9);

    push_panels(instances);

    // Mattress cloth covering the basket floor.
    instances.push(
        ObjectInstance::new(MeshKind::Plane, vec3(1.3, 1.2, 1.0), vec3(0.0, 2.05, 0.0))
            .material("stone")
            .texture("cloth_texture"),
    );

    // Crossbar under the basket, placed twice at the same transform.
    for _ in 0..2 {
        instances.push(
            ObjectInstance::new(MeshKind::Cylinder, vec3(0.1, 1.7, 0.1), vec3(1.40, 0.65, -1.0))
                .rotated(vec3(0.0, 90.0, 0.0))
                .texture("plasticd_texture"),
        );
    }
}

/// One rail ring: four quarter-circle arcs of beads around the corners of a
/// `box_x` by `box_z` rectangle, connected by four straight bars.
fn push_bead_rail(
    instances: &mut Vec<ObjectInstance>,
    steps: u32,
    arc_radius: f32,
    height: f32,
    box_x: f32,
    box_z: f32,
) {
    let bead_scale = vec3(0.15, 0.15, 0.15);
    let half_x = box_x / 2.0;
    let half_z = box_z / 2.0;

    // Quarter arcs starting at each corner's opening angle.
    let corners = [
        (PI, -half_x, -half_z),
        (PI * 1.5, half_x, -half_z),
        (0.0, half_x, half_z),
        (FRAC_PI_2, -half_x, half_z),
    ];
    for (start, corner_x, corner_z) in corners {
        for i in 0..=steps {
            let theta = start + i as f32 * FRAC_PI_2 / steps as f32;
            let position = vec3(
                corner_x + arc_radius * theta.cos(),
                height,
                corner_z + arc_radius * theta.sin(),
            );
            instances.push(
                ObjectInstance::new(MeshKind::Sphere, bead_scale, position)
                    .texture("plasticd_texture")
                    .uv(0.3, 0.2),
            );
        }
    }

    // Straight bars between the arcs.
    let bar_x = vec3(box_x, 0.1, 0.1);
    let bar_z = vec3(0.1, 0.1, box_z);
    for z in [-half_z - arc_radius, half_z + arc_radius] {
        instances.push(
            ObjectInstance::new(MeshKind::Box, bar_x, vec3(0.0, height, z))
                .texture("plasticd_texture")
                .uv(0.3, 0.2),
        );
    }
    for x in [-half_x - arc_radius, half_x + arc_radius] {
        instances.push(
            ObjectInstance::new(MeshKind::Box, bar_z, vec3(x, height, 0.0))
                .texture("plasticd_texture")
                .uv(0.3, 0.2),
        );
    }
}

/// The four cloth side panels, tilted so each rises from the lower rail line
/// to the upper rail.
fn push_panels(instances: &mut Vec<ObjectInstance>) {
    let rail_height = 2.95;
    let rail_floor = 1.95;
    let thickness = 0.18;
    let rise: f32 = rail_height - rail_floor;
    let span_x = 2.0 + 2.0 * 1.0 - 1.0;
    let span_z = 1.0 + 2.0 * 1.0 - 1.0;
    let mid_y = (rail_height + rail_floor) * 0.5;

    let angle_x = (rise / span_x).atan().to_degrees();
    let angle_z = (rise / span_z).atan().to_degrees();

    let scale_x = vec3(span_x, rise, thickness);
    let scale_z = vec3(thickness, rise, span_z);
    // Rail rectangle is 2.0 by 1.0 with arc radius 1.0 on each side.
    let offset_x = 2.0 / 2.0 + 1.0 - thickness * 0.5;
    let offset_z = 1.0 / 2.0 + 1.0 - thickness * 0.5;

    let panels = [
        (scale_x, vec3(-angle_x, 0.0, 0.0), vec3(0.0, mid_y, -offset_z)),
        (scale_x, vec3(angle_x, 0.0, 0.0), vec3(0.0, mid_y, offset_z)),
        (scale_z, vec3(0.0, 0.0, angle_z), vec3(-offset_x, mid_y, 0.0)),
        (scale_z, vec3(0.0, 0.0, -angle_z), vec3(offset_x, mid_y, 0.0)),
    ];
    for (scale, rotation, position) in panels {
        instances.push(
            ObjectInstance::new(MeshKind::Box, scale, position)
                .rotated(rotation)
                .texture("cloth_texture")
                .uv(0.3, 0.2),
        );
    }
}

/// The couch along the back wall: seat, backrest, cylindrical armrests, and
/// a squashed-sphere pillow.
fn push_couch(instances: &mut Vec<ObjectInstance>) {
    instances.push(
        ObjectInstance::new(MeshKind::Box, vec3(16.0, 2.3, 6.2), vec3(5.0, 0.3, -8.0))
            .material("wood")
            .texture("plastic_texture"),
    );
    instances.push(
        ObjectInstance::new(MeshKind::Box, vec3(13.0, 7.8, 1.6), vec3(5.0, 0.8, -9.4))
            .material("wood")
            .texture("plastic_texture"),
    );
    for x in [-1.4, 12.8] {
        instances.push(
            ObjectInstance::new(MeshKind::Cylinder, vec3(3.2, 1.5, 3.2), vec3(x, 0.65, -8.0))
                .rotated(vec3(0.0, 0.0, 90.0))
                .material("wood")
                .texture("plastic_texture"),
        );
    }
    instances.push(
        ObjectInstance::new(MeshKind::Sphere, vec3(2.5, 0.3, 1.2), vec3(1.3, 2.65, -8.0))
            .rotated(vec3(72.0, 0.0, 0.0))
            .material("wood")
            .texture("plasticb_texture"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tableau_is_nonempty_and_stable() {
        let a = build_tableau();
        let b = build_tableau();
        assert!(!a.is_empty());
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn test_bead_rails_have_expected_counts() {
        // Upper rail: 4 arcs of 11 beads, lower rail: 4 arcs of 7 beads,
        // plus 4 bars each.
        let instances = build_tableau();
        let beads = instances
            .iter()
            .filter(|i| i.mesh == MeshKind::Sphere && i.scale == vec3(0.15, 0.15, 0.15))
            .count();
        assert_eq!(beads, 4 * 11 + 4 * 7);
    }

    #[test]
    fn test_beads_sit_at_rail_heights() {
        let instances = build_tableau();
        for instance in instances
            .iter()
            .filter(|i| i.mesh == MeshKind::Sphere && i.scale == vec3(0.15, 0.15, 0.15))
        {
            let y = instance.position.y;
            assert!(y == 2.95 || y == 2.15, "bead at unexpected height {}", y);
        }
    }

    #[test]
    fn test_untextured_instances_carry_a_color() {
        // Every instance must resolve to either a texture or a flat color,
        // otherwise it would render with whatever was staged previously.
        for instance in build_tableau() {
            assert!(
                instance.texture.is_some() || instance.color.is_some(),
                "instance {:?} at {:?} has neither texture nor color",
                instance.mesh,
                instance.position
            );
        }
    }

    #[test]
    fn test_panel_tilt_matches_rail_geometry() {
        let instances = build_tableau();
        let panels: Vec<_> = instances
            .iter()
            .filter(|i| i.texture == Some("cloth_texture") && i.mesh == MeshKind::Box)
            .collect();
        assert_eq!(panels.len(), 4);
        let expected_x = (1.0f32 / 3.0).atan().to_degrees();
        assert!((panels[0].rotation_degrees.x + expected_x).abs() < 1e-4);
        assert!((panels[1].rotation_degrees.x - expected_x).abs() < 1e-4);
    }

    #[test]
    fn test_materials_reference_known_tags() {
        let known = ["plastic", "wood", "metal", "glass", "tile", "stone"];
        for instance in build_tableau() {
            assert!(
                known.contains(&instance.material),
                "unknown material tag {}",
                instance.material
            );
        }
    }
}
