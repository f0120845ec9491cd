use std::path::Path;

use anyhow::{Context, Result};

/// A 2D RGBA texture plus its sampler.
pub struct Texture2d {
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl Texture2d {
    /// Decodes an image file and uploads it as `Rgba8UnormSrgb`.
    pub fn from_path(device: &wgpu::Device, queue: &wgpu::Queue, path: &Path) -> Result<Self> {
        let image = image::open(path)
            .with_context(|| format!("failed to load texture {}", path.display()))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        Ok(Self::from_rgba8(
            device,
            queue,
            &path.display().to_string(),
            width,
            height,
            image.as_raw(),
        ))
    }

    /// Procedural two-tone checkerboard, the stand-in for missing texture
    /// files. `cells` is the number of squares per edge.
    pub fn checkerboard(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        cells: u32,
        light: [u8; 3],
        dark: [u8; 3],
    ) -> Self {
        const SIZE: u32 = 128;
        let cell = (SIZE / cells.max(1)).max(1);

        let mut pixels = Vec::with_capacity((SIZE * SIZE * 4) as usize);
        for y in 0..SIZE {
            for x in 0..SIZE {
                let color = if ((x / cell) + (y / cell)) % 2 == 0 { light } else { dark };
                pixels.extend_from_slice(&[color[0], color[1], color[2], 255]);
            }
        }

        Self::from_rgba8(device, queue, "checkerboard", SIZE, SIZE, &pixels)
    }

    /// Single-pixel texture; used as the neutral specular map fallback.
    pub fn solid(device: &wgpu::Device, queue: &wgpu::Queue, rgba: [u8; 4]) -> Self {
        Self::from_rgba8(device, queue, "solid", 1, 1, &rgba)
    }

    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
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
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            sampler,
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}
