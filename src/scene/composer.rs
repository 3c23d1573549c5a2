//! Scene composition
//!
//! The composer owns the uniform stage, the material catalog, the texture
//! registry, and the instance table. Each frame it replays the table through
//! the shader parameter setters and snapshots one uniform slot per instance
//! into a draw list for the render engine.

use cgmath::Vector3;

use crate::gfx::rendering::DrawCommand;
use crate::gfx::resources::{MaterialCatalog, TextureRegistry};
use crate::gfx::transform::stage_model_matrix;
use crate::gfx::uniforms::{LightField, UniformKey, UniformStage};

use super::tableau::{self, ObjectInstance};

/// Image files loaded at scene preparation, each registered under the tag
/// the instance table references.
const TEXTURE_MANIFEST: [(&str, &str); 7] = [
    ("textures/greyplastic.jpg", "plasticd_texture"),
    ("textures/greenplastic.jpg", "plasticc_texture"),
    ("textures/blueplastic.jpg", "plasticb_texture"),
    ("textures/Redplastic.jpg", "plastic_texture"),
    ("textures/sand.png", "sand_texture"),
    ("textures/brick.jpg", "brick_texture"),
    ("textures/whitecloth.jpg", "cloth_texture"),
];

/// Owns everything needed to turn the instance table into draw commands.
pub struct SceneComposer {
    pub stage: UniformStage,
    pub textures: TextureRegistry,
    materials: MaterialCatalog,
    instances: Vec<ObjectInstance>,
}

impl SceneComposer {
    pub fn new() -> Self {
        Self {
            stage: UniformStage::new(),
            textures: TextureRegistry::new(),
            materials: MaterialCatalog::with_scene_materials(),
            instances: tableau::build_tableau(),
        }
    }

    /// Loads the scene textures and stages the lights. Called once before
    /// the first frame. A texture that fails to load is skipped; draws that
    /// reference it fall back to the renderer's white texture.
    pub fn prepare(&mut self) {
        for (path, tag) in TEXTURE_MANIFEST {
            if let Err(error) = self.textures.load(path, tag) {
                log::warn!("skipping texture '{}': {}", tag, error);
            }
        }
        self.stage_lights();
    }

    /// One warm directional light plus two overhead point lights.
    fn stage_lights(&mut self) {
        let stage = &mut self.stage;
        stage.set_bool(UniformKey::UseLighting, true);

        let dir = |field| UniformKey::DirectionalLight(field);
        stage.set_vec3(dir(LightField::Direction), [0.2, 5.2, 0.5]);
        stage.set_vec3(dir(LightField::Ambient), [0.15, 0.15, 0.15]);
        stage.set_vec3(dir(LightField::Diffuse), [0.8, 0.8, 0.8]);
        stage.set_vec3(dir(LightField::Specular), [1.0, 0.9, 0.40]);
        stage.set_bool(dir(LightField::Active), true);

        let key = |field| UniformKey::PointLight(0, field);
        stage.set_vec3(key(LightField::Position), [0.0, 12.0, 0.0]);
        stage.set_vec3(key(LightField::Ambient), [0.35, 0.35, 0.35]);
        stage.set_vec3(key(LightField::Diffuse), [0.8, 0.8, 0.8]);
        stage.set_vec3(key(LightField::Specular), [0.25, 0.25, 0.25]);
        stage.set_bool(key(LightField::Active), true);

        let key = |field| UniformKey::PointLight(1, field);
        stage.set_vec3(key(LightField::Position), [0.0, 8.0, 0.0]);
        stage.set_vec3(key(LightField::Ambient), [0.0, 0.0, 0.0]);
        stage.set_vec3(key(LightField::Diffuse), [0.6, 0.6, 0.65]);
        stage.set_vec3(key(LightField::Specular), [0.2, 0.2, 0.2]);
        stage.set_float(key(LightField::Linear), 0.10);
        stage.set_float(key(LightField::Quadratic), 0.05);
        stage.set_bool(key(LightField::Active), true);
    }

    /// Stages a flat color and turns texture sampling off.
    pub fn set_shader_color(&mut self, rgba: [f32; 4]) {
        self.stage.set_vec4(UniformKey::ObjectColor, rgba);
        self.stage.set_bool(UniformKey::UseTexture, false);
    }

    /// Stages the texture unit for `tag` and turns sampling on. An
    /// unresolved tag falls back to unit 0 rather than skipping the draw.
    pub fn set_shader_texture(&mut self, tag: &str) {
        let unit = self.textures.find_unit(tag).unwrap_or_else(|| {
            log::warn!("texture tag '{}' is not registered, using unit 0", tag);
            0
        });
        self.stage.set_sampler(UniformKey::ObjectTexture, unit);
        self.stage.set_bool(UniformKey::UseTexture, true);
    }

    pub fn set_texture_uv_scale(&mut self, u: f32, v: f32) {
        self.stage.set_vec2(UniformKey::UvScale, [u, v]);
    }

    /// Stages the catalog material for `tag`; a miss keeps the previous
    /// material (the catalog logs the warning).
    pub fn set_shader_material(&mut self, tag: &str) {
        self.materials.stage_material(&mut self.stage, tag);
    }

    pub fn set_transformations(
        &mut self,
        scale: Vector3<f32>,
        rotation_degrees: Vector3<f32>,
        position: Vector3<f32>,
    ) {
        stage_model_matrix(&mut self.stage, scale, rotation_degrees, position);
    }

    /// Replays the whole instance table through the setters, snapshotting a
    /// uniform slot after each instance. Setter order per instance is
    /// material, uv scale, color, texture; since the color setter clears the
    /// sampling flag and the texture setter sets it, an instance carrying
    /// both samples its texture.
    pub fn encode_frame(&mut self) -> Vec<DrawCommand> {
        let instances = std::mem::take(&mut self.instances);
        let draws = instances
            .iter()
            .map(|instance| {
                self.set_shader_material(instance.material);
                self.set_texture_uv_scale(instance.uv_scale[0], instance.uv_scale[1]);
                if let Some(color) = instance.color {
                    self.set_shader_color(color);
                }
                if let Some(texture) = instance.texture {
                    self.set_shader_texture(texture);
                }
                self.set_transformations(
                    instance.scale,
                    instance.rotation_degrees,
                    instance.position,
                );
                DrawCommand {
                    mesh: instance.mesh,
                    object: crate::gfx::uniforms::ObjectUniform::from_stage(&self.stage),
                }
            })
            .collect();
        self.instances = instances;
        draws
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Releases every GPU texture the scene registered.
    pub fn teardown(&mut self) {
        self.textures.release_all();
    }
}

impl Default for SceneComposer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::uniforms::ObjectUniform;

    #[test]
    fn test_color_setter_disables_sampling() {
        let mut composer = SceneComposer::new();
        composer.set_shader_texture("anything");
        composer.set_shader_color([0.8, 0.8, 0.8, 1.0]);
        let object = ObjectUniform::from_stage(&composer.stage);
        assert_eq!(object.use_texture, 0);
        assert_eq!(object.object_color, [0.8, 0.8, 0.8, 1.0]);
    }

    #[test]
    fn test_texture_after_color_wins() {
        let mut composer = SceneComposer::new();
        composer.set_shader_color([1.0, 0.0, 0.0, 1.0]);
        composer.set_shader_texture("anything");
        let object = ObjectUniform::from_stage(&composer.stage);
        assert_eq!(object.use_texture, 1);
    }

    #[test]
    fn test_unresolved_texture_falls_back_to_unit_zero() {
        let mut composer = SceneComposer::new();
        composer.set_shader_texture("not_registered");
        let object = ObjectUniform::from_stage(&composer.stage);
        assert_eq!(object.texture_unit, 0);
        assert_eq!(object.use_texture, 1);
    }

    #[test]
    fn test_encode_frame_yields_one_draw_per_instance() {
        let mut composer = SceneComposer::new();
        composer.stage_lights();
        let draws = composer.encode_frame();
        assert_eq!(draws.len(), composer.instance_count());
        // Encoding is repeatable.
        assert_eq!(composer.encode_frame().len(), draws.len());
    }

    #[test]
    fn test_tableau_texture_tags_resolve_against_manifest() {
        // A tag the manifest never registers would silently sample unit 0.
        for instance in tableau::build_tableau() {
            if let Some(tag) = instance.texture {
                assert!(
                    TEXTURE_MANIFEST.iter().any(|(_, manifest_tag)| *manifest_tag == tag),
                    "texture tag '{}' is not in the manifest",
                    tag
                );
            }
        }
    }

    #[test]
    fn test_material_miss_keeps_previous_values() {
        let mut composer = SceneComposer::new();
        composer.set_shader_material("wood");
        composer.set_shader_material("velvet");
        let object = ObjectUniform::from_stage(&composer.stage);
        assert_eq!(object.material_diffuse[3], 1.0); // wood shininess
        assert_eq!(
            [
                object.material_diffuse[0],
                object.material_diffuse[1],
                object.material_diffuse[2]
            ],
            [0.6, 0.5, 0.2]
        );
    }

    #[test]
    fn test_lights_staged_with_scene_values() {
        let mut composer = SceneComposer::new();
        composer.stage_lights();
        let frame = crate::gfx::uniforms::FrameUniform::from_stage(&composer.stage);
        assert_eq!(frame.lighting_enabled, 1);
        assert_eq!(frame.directional.direction[3], 1.0);
        assert_eq!(frame.point_lights[0].position, [0.0, 12.0, 0.0, 1.0]);
        assert_eq!(frame.point_lights[1].ambient[3], 0.10);
        assert_eq!(frame.point_lights[1].diffuse[3], 0.05);
        assert_eq!(frame.point_lights[2].position[3], 0.0);
    }
}
