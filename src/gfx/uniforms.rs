//! Shader uniform staging
//!
//! The scene composer and view controller never talk to the GPU directly;
//! they stage values into a [`UniformStage`] keyed by a closed [`UniformKey`]
//! enumeration. The render engine snapshots the stage into the POD uniform
//! structs uploaded each frame. Keeping the keys as an enum (rather than the
//! raw strings the shader declares) turns typos into compile errors while
//! [`UniformKey`]'s `Display` impl still yields the shader-facing names.

use std::collections::HashMap;
use std::fmt;

use cgmath::Matrix4;

/// Number of point-light slots the shader declares. The nursery scene
/// populates two.
pub const MAX_POINT_LIGHTS: usize = 5;

/// Per-light uniform fields addressable through [`UniformKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightField {
    Direction,
    Position,
    Ambient,
    Diffuse,
    Specular,
    Linear,
    Quadratic,
    Active,
}

impl LightField {
    fn name(&self) -> &'static str {
        match self {
            LightField::Direction => "direction",
            LightField::Position => "position",
            LightField::Ambient => "ambient",
            LightField::Diffuse => "diffuse",
            LightField::Specular => "specular",
            LightField::Linear => "linear",
            LightField::Quadratic => "quadratic",
            LightField::Active => "bActive",
        }
    }
}

/// Every uniform the scene shader declares, in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformKey {
    Model,
    View,
    Projection,
    ViewPosition,
    ObjectColor,
    ObjectTexture,
    UseTexture,
    UseLighting,
    UvScale,
    MaterialDiffuseColor,
    MaterialSpecularColor,
    MaterialShininess,
    DirectionalLight(LightField),
    PointLight(usize, LightField),
}

impl fmt::Display for UniformKey {
    /// Shader-facing name of the uniform, e.g. `pointLights[1].quadratic`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniformKey::Model => write!(f, "model"),
            UniformKey::View => write!(f, "view"),
            UniformKey::Projection => write!(f, "projection"),
            UniformKey::ViewPosition => write!(f, "viewPosition"),
            UniformKey::ObjectColor => write!(f, "objectColor"),
            UniformKey::ObjectTexture => write!(f, "objectTexture"),
            UniformKey::UseTexture => write!(f, "bUseTexture"),
            UniformKey::UseLighting => write!(f, "bUseLighting"),
            UniformKey::UvScale => write!(f, "UVscale"),
            UniformKey::MaterialDiffuseColor => write!(f, "material.diffuseColor"),
            UniformKey::MaterialSpecularColor => write!(f, "material.specularColor"),
            UniformKey::MaterialShininess => write!(f, "material.shininess"),
            UniformKey::DirectionalLight(field) => {
                write!(f, "directionalLight.{}", field.name())
            }
            UniformKey::PointLight(slot, field) => {
                write!(f, "pointLights[{}].{}", slot, field.name())
            }
        }
    }
}

/// A staged uniform value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Mat4([[f32; 4]; 4]),
    Vec4([f32; 4]),
    Vec3([f32; 3]),
    Vec2([f32; 2]),
    Float(f32),
    Int(i32),
    Bool(bool),
    Sampler(u32),
}

/// CPU-side store of shader parameters for the next draw call.
///
/// This is the "shader uniform sink" shared by the scene composer and the
/// view controller. Setters are idempotent; values persist until overwritten,
/// which is what makes the material fallback ("previous material persists on
/// a lookup miss") work.
#[derive(Debug, Default)]
pub struct UniformStage {
    values: HashMap<UniformKey, UniformValue>,
}

impl UniformStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mat4(&mut self, key: UniformKey, value: Matrix4<f32>) {
        self.values.insert(key, UniformValue::Mat4(value.into()));
    }

    pub fn set_vec4(&mut self, key: UniformKey, value: [f32; 4]) {
        self.values.insert(key, UniformValue::Vec4(value));
    }

    pub fn set_vec3(&mut self, key: UniformKey, value: [f32; 3]) {
        self.values.insert(key, UniformValue::Vec3(value));
    }

    pub fn set_vec2(&mut self, key: UniformKey, value: [f32; 2]) {
        self.values.insert(key, UniformValue::Vec2(value));
    }

    pub fn set_float(&mut self, key: UniformKey, value: f32) {
        self.values.insert(key, UniformValue::Float(value));
    }

    pub fn set_int(&mut self, key: UniformKey, value: i32) {
        self.values.insert(key, UniformValue::Int(value));
    }

    pub fn set_bool(&mut self, key: UniformKey, value: bool) {
        self.values.insert(key, UniformValue::Bool(value));
    }

    pub fn set_sampler(&mut self, key: UniformKey, unit: u32) {
        self.values.insert(key, UniformValue::Sampler(unit));
    }

    pub fn mat4(&self, key: UniformKey) -> [[f32; 4]; 4] {
        match self.values.get(&key) {
            Some(UniformValue::Mat4(m)) => *m,
            _ => cgmath::Matrix4::from_scale(1.0f32).into(),
        }
    }

    pub fn vec4(&self, key: UniformKey, default: [f32; 4]) -> [f32; 4] {
        match self.values.get(&key) {
            Some(UniformValue::Vec4(v)) => *v,
            _ => default,
        }
    }

    pub fn vec3(&self, key: UniformKey, default: [f32; 3]) -> [f32; 3] {
        match self.values.get(&key) {
            Some(UniformValue::Vec3(v)) => *v,
            _ => default,
        }
    }

    pub fn vec2(&self, key: UniformKey, default: [f32; 2]) -> [f32; 2] {
        match self.values.get(&key) {
            Some(UniformValue::Vec2(v)) => *v,
            _ => default,
        }
    }

    pub fn float(&self, key: UniformKey, default: f32) -> f32 {
        match self.values.get(&key) {
            Some(UniformValue::Float(v)) => *v,
            _ => default,
        }
    }

    pub fn bool(&self, key: UniformKey) -> bool {
        match self.values.get(&key) {
            Some(UniformValue::Bool(v)) => *v,
            Some(UniformValue::Int(v)) => *v != 0,
            _ => false,
        }
    }

    pub fn sampler(&self, key: UniformKey) -> u32 {
        match self.values.get(&key) {
            Some(UniformValue::Sampler(v)) => *v,
            _ => 0,
        }
    }
}

/// Per-frame uniform data, uploaded once per frame at bind group 0.
///
/// MUST match the `Frame` struct in `scene_shader.wgsl` exactly. Light
/// parameters are packed into the `w` lanes to satisfy the 16 byte
/// alignment WGSL imposes on vec3 members.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_position: [f32; 4],
    pub directional: DirectionalLightUniform,
    pub point_lights: [PointLightUniform; MAX_POINT_LIGHTS],
    pub lighting_enabled: u32,
    pub _padding: [u32; 3],
}

/// Directional light block. `direction.w` carries the active flag.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightUniform {
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

/// Point light block. Packing: `position.w` = active flag,
/// `ambient.w` = linear attenuation, `diffuse.w` = quadratic attenuation.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

impl FrameUniform {
    /// Snapshots the frame-level keys out of the stage.
    pub fn from_stage(stage: &UniformStage) -> Self {
        let mut point_lights = [PointLightUniform::default(); MAX_POINT_LIGHTS];
        for (slot, light) in point_lights.iter_mut().enumerate() {
            let key = |field| UniformKey::PointLight(slot, field);
            let position = stage.vec3(key(LightField::Position), [0.0; 3]);
            let ambient = stage.vec3(key(LightField::Ambient), [0.0; 3]);
            let diffuse = stage.vec3(key(LightField::Diffuse), [0.0; 3]);
            let specular = stage.vec3(key(LightField::Specular), [0.0; 3]);
            let active = if stage.bool(key(LightField::Active)) {
                1.0
            } else {
                0.0
            };
            light.position = [position[0], position[1], position[2], active];
            light.ambient = [
                ambient[0],
                ambient[1],
                ambient[2],
                stage.float(key(LightField::Linear), 0.0),
            ];
            light.diffuse = [
                diffuse[0],
                diffuse[1],
                diffuse[2],
                stage.float(key(LightField::Quadratic), 0.0),
            ];
            light.specular = [specular[0], specular[1], specular[2], 0.0];
        }

        let dir_key = |field| UniformKey::DirectionalLight(field);
        let direction = stage.vec3(dir_key(LightField::Direction), [0.0, -1.0, 0.0]);
        let dir_active = if stage.bool(dir_key(LightField::Active)) {
            1.0
        } else {
            0.0
        };
        let ambient = stage.vec3(dir_key(LightField::Ambient), [0.0; 3]);
        let diffuse = stage.vec3(dir_key(LightField::Diffuse), [0.0; 3]);
        let specular = stage.vec3(dir_key(LightField::Specular), [0.0; 3]);

        let view_position = stage.vec3(UniformKey::ViewPosition, [0.0; 3]);

        Self {
            view: stage.mat4(UniformKey::View),
            projection: stage.mat4(UniformKey::Projection),
            view_position: [view_position[0], view_position[1], view_position[2], 1.0],
            directional: DirectionalLightUniform {
                direction: [direction[0], direction[1], direction[2], dir_active],
                ambient: [ambient[0], ambient[1], ambient[2], 0.0],
                diffuse: [diffuse[0], diffuse[1], diffuse[2], 0.0],
                specular: [specular[0], specular[1], specular[2], 0.0],
            },
            point_lights,
            lighting_enabled: stage.bool(UniformKey::UseLighting) as u32,
            _padding: [0; 3],
        }
    }
}

/// Per-object uniform data, uploaded as one slot of a dynamic-offset array.
///
/// MUST match the `Object` struct in `scene_shader.wgsl` exactly.
/// `material_diffuse.w` carries the shininess exponent. The normal matrix is
/// the inverse transpose of the model matrix, computed here because the
/// tableau leans heavily on non-uniform scaling.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub object_color: [f32; 4],
    pub material_diffuse: [f32; 4],
    pub material_specular: [f32; 4],
    pub uv_scale: [f32; 2],
    pub use_texture: u32,
    pub texture_unit: u32,
}

impl ObjectUniform {
    /// Snapshots the object-level keys out of the stage. Taken after all of
    /// an instance's setters have run, so whichever of the color/texture
    /// setters was staged last decides the sampling flag.
    pub fn from_stage(stage: &UniformStage) -> Self {
        use cgmath::{Matrix, SquareMatrix};

        let diffuse = stage.vec3(UniformKey::MaterialDiffuseColor, [1.0; 3]);
        let specular = stage.vec3(UniformKey::MaterialSpecularColor, [0.0; 3]);
        let model = stage.mat4(UniformKey::Model);
        let normal_matrix = Matrix4::from(model)
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity);
        Self {
            model,
            normal_matrix: normal_matrix.into(),
            object_color: stage.vec4(UniformKey::ObjectColor, [1.0; 4]),
            material_diffuse: [
                diffuse[0],
                diffuse[1],
                diffuse[2],
                stage.float(UniformKey::MaterialShininess, 1.0),
            ],
            material_specular: [specular[0], specular[1], specular[2], 0.0],
            uv_scale: stage.vec2(UniformKey::UvScale, [1.0, 1.0]),
            use_texture: stage.bool(UniformKey::UseTexture) as u32,
            texture_unit: stage.sampler(UniformKey::ObjectTexture),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_match_shader_interface() {
        assert_eq!(UniformKey::Model.to_string(), "model");
        assert_eq!(UniformKey::View.to_string(), "view");
        assert_eq!(UniformKey::Projection.to_string(), "projection");
        assert_eq!(UniformKey::ObjectColor.to_string(), "objectColor");
        assert_eq!(UniformKey::ObjectTexture.to_string(), "objectTexture");
        assert_eq!(UniformKey::UseTexture.to_string(), "bUseTexture");
        assert_eq!(UniformKey::UseLighting.to_string(), "bUseLighting");
        assert_eq!(UniformKey::UvScale.to_string(), "UVscale");
        assert_eq!(
            UniformKey::MaterialDiffuseColor.to_string(),
            "material.diffuseColor"
        );
        assert_eq!(
            UniformKey::MaterialShininess.to_string(),
            "material.shininess"
        );
        assert_eq!(UniformKey::ViewPosition.to_string(), "viewPosition");
        assert_eq!(
            UniformKey::PointLight(1, LightField::Quadratic).to_string(),
            "pointLights[1].quadratic"
        );
        assert_eq!(
            UniformKey::DirectionalLight(LightField::Active).to_string(),
            "directionalLight.bActive"
        );
    }

    #[test]
    fn test_stage_defaults() {
        let stage = UniformStage::new();
        assert_eq!(stage.mat4(UniformKey::Model), {
            let identity: [[f32; 4]; 4] = cgmath::Matrix4::from_scale(1.0f32).into();
            identity
        });
        assert!(!stage.bool(UniformKey::UseTexture));
        assert_eq!(stage.sampler(UniformKey::ObjectTexture), 0);
    }

    #[test]
    fn test_last_setter_wins_for_sampling_flag() {
        let mut stage = UniformStage::new();
        stage.set_bool(UniformKey::UseTexture, false);
        stage.set_bool(UniformKey::UseTexture, true);
        let object = ObjectUniform::from_stage(&stage);
        assert_eq!(object.use_texture, 1);
    }

    #[test]
    fn test_point_light_packing() {
        let mut stage = UniformStage::new();
        stage.set_vec3(UniformKey::PointLight(1, LightField::Position), [0.0, 8.0, 0.0]);
        stage.set_float(UniformKey::PointLight(1, LightField::Linear), 0.10);
        stage.set_float(UniformKey::PointLight(1, LightField::Quadratic), 0.05);
        stage.set_bool(UniformKey::PointLight(1, LightField::Active), true);

        let frame = FrameUniform::from_stage(&stage);
        assert_eq!(frame.point_lights[1].position, [0.0, 8.0, 0.0, 1.0]);
        assert_eq!(frame.point_lights[1].ambient[3], 0.10);
        assert_eq!(frame.point_lights[1].diffuse[3], 0.05);
        // Untouched slots stay inactive.
        assert_eq!(frame.point_lights[4].position[3], 0.0);
    }
}
