//! Material catalog for Phong shading
//!
//! Materials are plain CPU-side property sets looked up by tag at draw time;
//! the scene composer copies the matched values into the uniform stage. There
//! is no per-material GPU state.

use crate::gfx::uniforms::{UniformKey, UniformStage};

/// Phong surface properties referenced by tag from the scene table.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMaterial {
    pub tag: &'static str,
    pub diffuse_color: [f32; 3],
    pub specular_color: [f32; 3],
    pub shininess: f32,
}

/// Ordered list of the scene's materials.
///
/// Lookup returns the first entry with a matching tag, so an accidental
/// duplicate tag shadows later entries rather than erroring.
#[derive(Debug, Default)]
pub struct MaterialCatalog {
    materials: Vec<ObjectMaterial>,
}

impl MaterialCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the catalog used by the tableau: a handful of matte and
    /// reflective surfaces tuned for the nursery scene.
    pub fn with_scene_materials() -> Self {
        let mut catalog = Self::new();
        catalog.add(ObjectMaterial {
            tag: "plastic",
            diffuse_color: [1.0, 1.0, 1.0],
            specular_color: [0.2, 0.2, 0.2],
            shininess: 21.0,
        });
        catalog.add(ObjectMaterial {
            tag: "wood",
            diffuse_color: [0.6, 0.5, 0.2],
            specular_color: [0.1, 0.2, 0.2],
            shininess: 1.0,
        });
        catalog.add(ObjectMaterial {
            tag: "metal",
            diffuse_color: [0.3, 0.3, 0.2],
            specular_color: [0.7, 0.7, 0.8],
            shininess: 8.0,
        });
        catalog.add(ObjectMaterial {
            tag: "glass",
            diffuse_color: [0.3, 0.3, 0.2],
            specular_color: [0.9, 0.9, 0.8],
            shininess: 10.0,
        });
        catalog.add(ObjectMaterial {
            tag: "tile",
            diffuse_color: [0.5, 0.5, 0.5],
            specular_color: [0.7, 0.7, 0.7],
            shininess: 6.0,
        });
        catalog.add(ObjectMaterial {
            tag: "stone",
            diffuse_color: [0.5, 0.5, 0.5],
            specular_color: [0.73, 0.3, 0.3],
            shininess: 6.0,
        });
        catalog
    }

    pub fn add(&mut self, material: ObjectMaterial) {
        self.materials.push(material);
    }

    /// First material whose tag matches, or `None`.
    pub fn find(&self, tag: &str) -> Option<&ObjectMaterial> {
        self.materials.iter().find(|material| material.tag == tag)
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Stages the material uniforms for the given tag. An unknown tag leaves
    /// the previously staged material in place and logs a warning, so one bad
    /// reference does not take down the frame.
    pub fn stage_material(&self, stage: &mut UniformStage, tag: &str) {
        match self.find(tag) {
            Some(material) => {
                stage.set_vec3(UniformKey::MaterialDiffuseColor, material.diffuse_color);
                stage.set_vec3(UniformKey::MaterialSpecularColor, material.specular_color);
                stage.set_float(UniformKey::MaterialShininess, material.shininess);
            }
            None => {
                log::warn!("no material tagged '{}' in the catalog", tag);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_catalog_has_all_tags() {
        let catalog = MaterialCatalog::with_scene_materials();
        for tag in ["plastic", "wood", "metal", "glass", "tile", "stone"] {
            assert!(catalog.find(tag).is_some(), "missing material '{}'", tag);
        }
        assert_eq!(catalog.len(), 6);
    }

    #[test]
    fn test_empty_catalog_lookup_misses() {
        let catalog = MaterialCatalog::new();
        assert!(catalog.is_empty());
        assert!(catalog.find("plastic").is_none());
    }

    #[test]
    fn test_duplicate_tag_resolves_to_first() {
        let mut catalog = MaterialCatalog::new();
        catalog.add(ObjectMaterial {
            tag: "wood",
            diffuse_color: [1.0, 0.0, 0.0],
            specular_color: [0.0, 0.0, 0.0],
            shininess: 1.0,
        });
        catalog.add(ObjectMaterial {
            tag: "wood",
            diffuse_color: [0.0, 1.0, 0.0],
            specular_color: [0.0, 0.0, 0.0],
            shininess: 2.0,
        });
        assert_eq!(catalog.find("wood").unwrap().diffuse_color, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_stage_material_writes_uniforms() {
        let catalog = MaterialCatalog::with_scene_materials();
        let mut stage = UniformStage::new();
        catalog.stage_material(&mut stage, "metal");
        assert_eq!(
            stage.vec3(UniformKey::MaterialDiffuseColor, [0.0; 3]),
            [0.3, 0.3, 0.2]
        );
        assert_eq!(stage.float(UniformKey::MaterialShininess, 0.0), 8.0);
    }

    #[test]
    fn test_unknown_tag_leaves_previous_material() {
        let catalog = MaterialCatalog::with_scene_materials();
        let mut stage = UniformStage::new();
        catalog.stage_material(&mut stage, "glass");
        catalog.stage_material(&mut stage, "granite");
        assert_eq!(stage.float(UniformKey::MaterialShininess, 0.0), 10.0);
    }
}
