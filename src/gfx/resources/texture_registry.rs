//! Scene texture registry
//!
//! Textures are decoded on the CPU at scene preparation time and uploaded to
//! the GPU in one pass once the device exists. The decode and upload stages
//! are deliberately separate so registration logic is testable without a GPU.
//!
//! Each registered image occupies one texture unit, in registration order.
//! Units are capped at [`MAX_SCENE_TEXTURES`]; registration past the cap is
//! an error rather than a silent skip. Tags are not required to be unique,
//! lookups resolve to the first match. Paths are never deduplicated, loading
//! the same file twice costs two units.

use image::RgbaImage;
use thiserror::Error;

use crate::wgpu_utils::binding_types;

/// Number of texture units available to the scene.
pub const MAX_SCENE_TEXTURES: usize = 16;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("all {limit} texture units are occupied, cannot register '{path}'")]
    UnitsExhausted { path: String, limit: usize },

    #[error("failed to decode texture '{path}'")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("texture '{path}' has {channels} channels, expected 3 or 4")]
    UnsupportedChannels { path: String, channels: u8 },
}

/// A decoded image waiting for (or already finished with) GPU upload.
struct LoadedTexture {
    tag: String,
    path: String,
    /// Dropped after upload so the registry does not hold pixels twice.
    image: Option<RgbaImage>,
}

/// One texture unit's GPU state.
struct BoundTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Registry of the scene's textures, ordered by texture unit.
#[derive(Default)]
pub struct TextureRegistry {
    entries: Vec<LoadedTexture>,
    bound: Vec<BoundTexture>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes an image file and registers it under `tag`.
    ///
    /// The image is flipped vertically during decode so texture coordinates
    /// with a bottom-left origin sample correctly.
    pub fn load(&mut self, path: &str, tag: &str) -> Result<(), TextureError> {
        let dynamic = image::open(path).map_err(|source| {
            log::error!("could not load image file {}", path);
            TextureError::Decode {
                path: path.to_string(),
                source,
            }
        })?;

        let channels = dynamic.color().channel_count();
        if channels != 3 && channels != 4 {
            log::error!("image {} has an unsupported channel count", path);
            return Err(TextureError::UnsupportedChannels {
                path: path.to_string(),
                channels,
            });
        }

        let image = dynamic.flipv().to_rgba8();
        self.register(image, path, tag)
    }

    /// Registers an already-decoded image. Fails once every unit is taken.
    fn register(&mut self, image: RgbaImage, path: &str, tag: &str) -> Result<(), TextureError> {
        if self.entries.len() >= MAX_SCENE_TEXTURES {
            log::error!(
                "texture unit limit reached while registering {} ('{}')",
                path,
                tag
            );
            return Err(TextureError::UnitsExhausted {
                path: path.to_string(),
                limit: MAX_SCENE_TEXTURES,
            });
        }

        log::info!(
            "registered texture '{}' from {} in unit {}",
            tag,
            path,
            self.entries.len()
        );
        self.entries.push(LoadedTexture {
            tag: tag.to_string(),
            path: path.to_string(),
            image: Some(image),
        });
        Ok(())
    }

    /// Texture unit of the first registration tagged `tag`.
    pub fn find_unit(&self, tag: &str) -> Option<u32> {
        self.entries
            .iter()
            .position(|entry| entry.tag == tag)
            .map(|unit| unit as u32)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bind group layout for the per-texture group (texture + sampler).
    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: binding_types::texture_2d(),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    /// Uploads every registered image to the GPU with a full mip chain and
    /// builds one bind group per texture unit. Decoded pixels are released
    /// after upload.
    pub fn bind_all(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
    ) {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Scene Texture Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        for entry in &mut self.entries {
            let Some(image) = entry.image.take() else {
                continue;
            };
            let texture = upload_with_mipmaps(device, queue, &image, &entry.path);
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("Texture Bind Group '{}'", entry.tag)),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                ],
            });
            self.bound.push(BoundTexture {
                texture,
                bind_group,
            });
        }
    }

    /// Bind group for a texture unit, if that unit has been uploaded.
    pub fn bind_group(&self, unit: u32) -> Option<&wgpu::BindGroup> {
        self.bound.get(unit as usize).map(|bound| &bound.bind_group)
    }

    /// Destroys every GPU texture and forgets all registrations. Safe to
    /// call repeatedly; each texture is destroyed exactly once.
    pub fn release_all(&mut self) {
        for bound in self.bound.drain(..) {
            bound.texture.destroy();
        }
        self.entries.clear();
    }
}

/// Creates an sRGB texture with a full mip chain, generating each level on
/// the CPU by successive downsampling.
fn upload_with_mipmaps(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &RgbaImage,
    label: &str,
) -> wgpu::Texture {
    let (width, height) = image.dimensions();
    let mip_level_count = mip_level_count(width, height);

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    let mut level_image = image.clone();
    for level in 0..mip_level_count {
        if level > 0 {
            let mip_width = (width >> level).max(1);
            let mip_height = (height >> level).max(1);
            level_image = image::imageops::resize(
                &level_image,
                mip_width,
                mip_height,
                image::imageops::FilterType::Triangle,
            );
        }
        let (mip_width, mip_height) = level_image.dimensions();
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: level,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            level_image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * mip_width),
                rows_per_image: Some(mip_height),
            },
            wgpu::Extent3d {
                width: mip_width,
                height: mip_height,
                depth_or_array_layers: 1,
            },
        );
    }

    texture
}

/// Number of mip levels down to 1x1 for the given dimensions.
fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image() -> RgbaImage {
        RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 255, 255]))
    }

    #[test]
    fn test_empty_registry_lookup_misses() {
        let registry = TextureRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.find_unit("sand_texture"), None);
    }

    #[test]
    fn test_units_assigned_in_registration_order() {
        let mut registry = TextureRegistry::new();
        registry.register(test_image(), "a.jpg", "first").unwrap();
        registry.register(test_image(), "b.jpg", "second").unwrap();
        assert_eq!(registry.find_unit("first"), Some(0));
        assert_eq!(registry.find_unit("second"), Some(1));
        assert_eq!(registry.find_unit("missing"), None);
    }

    #[test]
    fn test_duplicate_tags_resolve_to_first_unit() {
        let mut registry = TextureRegistry::new();
        registry.register(test_image(), "a.jpg", "cloth").unwrap();
        registry.register(test_image(), "b.jpg", "cloth").unwrap();
        assert_eq!(registry.find_unit("cloth"), Some(0));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_same_path_occupies_two_units() {
        let mut registry = TextureRegistry::new();
        registry.register(test_image(), "a.jpg", "one").unwrap();
        registry.register(test_image(), "a.jpg", "two").unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_registration_fails_past_unit_limit() {
        let mut registry = TextureRegistry::new();
        for i in 0..MAX_SCENE_TEXTURES {
            registry
                .register(test_image(), &format!("{}.jpg", i), "tag")
                .unwrap();
        }
        let result = registry.register(test_image(), "overflow.jpg", "tag");
        assert!(matches!(
            result,
            Err(TextureError::UnitsExhausted { limit: 16, .. })
        ));
        assert_eq!(registry.len(), MAX_SCENE_TEXTURES);
    }

    #[test]
    fn test_grayscale_image_is_rejected() {
        let path = std::env::temp_dir().join("tableau_registry_gray.png");
        image::save_buffer(&path, &[128u8; 16], 4, 4, image::ExtendedColorType::L8).unwrap();

        let mut registry = TextureRegistry::new();
        let result = registry.load(path.to_str().unwrap(), "gray");
        assert!(matches!(
            result,
            Err(TextureError::UnsupportedChannels { channels: 1, .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_luminance_alpha_image_is_rejected() {
        let path = std::env::temp_dir().join("tableau_registry_la.png");
        image::save_buffer(&path, &[128u8; 32], 4, 4, image::ExtendedColorType::La8).unwrap();

        let mut registry = TextureRegistry::new();
        let result = registry.load(path.to_str().unwrap(), "la");
        assert!(matches!(
            result,
            Err(TextureError::UnsupportedChannels { channels: 2, .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_assigns_sequential_units() {
        let path = std::env::temp_dir().join("tableau_registry_rgba.png");
        image::save_buffer(
            &path,
            &[255u8; 4 * 4 * 4],
            4,
            4,
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();

        let mut registry = TextureRegistry::new();
        registry.load(path.to_str().unwrap(), "t").unwrap();
        registry.load(path.to_str().unwrap(), "u").unwrap();
        assert_eq!(registry.find_unit("t"), Some(0));
        assert_eq!(registry.find_unit("u"), Some(1));
    }

    #[test]
    fn test_load_missing_file_is_a_decode_error() {
        let mut registry = TextureRegistry::new();
        let result = registry.load("no/such/file.png", "ghost");
        assert!(matches!(result, Err(TextureError::Decode { .. })));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_release_all_is_idempotent() {
        let mut registry = TextureRegistry::new();
        registry.register(test_image(), "a.jpg", "one").unwrap();
        registry.release_all();
        assert!(registry.is_empty());
        registry.release_all();
        assert_eq!(registry.find_unit("one"), None);
    }

    #[test]
    fn test_mip_chain_reaches_one_by_one() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(256, 256), 9);
        assert_eq!(mip_level_count(640, 480), 10);
        assert_eq!(mip_level_count(1, 512), 10);
    }
}
