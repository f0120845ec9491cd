use std::path::Path;

use anyhow::{Context, Result};

/// Skybox cubemap: six square faces in `+x -x +y -y +z -z` order.
pub struct Cubemap {
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl Cubemap {
    /// Loads six face images. Every face must decode to the same square size.
    pub fn from_faces(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        faces: &[&Path; 6],
    ) -> Result<Self> {
        let mut pixels: Vec<u8> = Vec::new();
        let mut face_size: Option<u32> = None;

        for path in faces {
            let image = image::open(path)
                .with_context(|| format!("failed to load skybox face {}", path.display()))?
                .to_rgba8();
            let (w, h) = image.dimensions();
            anyhow::ensure!(w == h, "skybox face {} is not square ({w}x{h})", path.display());
            match face_size {
                None => face_size = Some(w),
                Some(s) => {
                    anyhow::ensure!(
                        s == w,
                        "skybox face {} is {w}px, expected {s}px",
                        path.display()
                    );
                }
            }
            pixels.extend_from_slice(image.as_raw());
        }

        let size = face_size.context("no skybox faces")?;
        Ok(Self::from_rgba8(device, queue, "skybox", size, &pixels))
    }

    /// Flat-color fallback when face files are missing.
    pub fn solid(device: &wgpu::Device, queue: &wgpu::Queue, rgba: [u8; 4]) -> Self {
        let pixels: Vec<u8> = std::iter::repeat_n(rgba, 6).flatten().collect();
        Self::from_rgba8(device, queue, "skybox solid", 1, &pixels)
    }

    fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        face_size: u32,
        pixels: &[u8],
    ) -> Self {
        debug_assert_eq!(pixels.len(), (face_size * face_size * 4 * 6) as usize);

        let size = wgpu::Extent3d {
            width: face_size,
            height: face_size,
            depth_or_array_layers: 6,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * face_size),
                rows_per_image: Some(face_size),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(label),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self { view, sampler }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}
