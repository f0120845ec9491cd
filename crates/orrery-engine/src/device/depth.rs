use winit::dpi::PhysicalSize;

/// Combined depth + stencil format used by every 3D pass.
///
/// The stencil component carries the outline masks, so a depth-only format
/// is not an option here.
pub const DEPTH_STENCIL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

/// Depth-stencil attachment sized to match the surface.
///
/// Recreated on resize; the texture itself is only reachable through the
/// view, which is all the render passes need.
pub struct DepthStencilTarget {
    view: wgpu::TextureView,
    size: PhysicalSize<u32>,
}

impl DepthStencilTarget {
    pub fn new(device: &wgpu::Device, size: PhysicalSize<u32>) -> Self {
        let width = size.width.max(1);
        let height = size.height.max(1);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("orrery depth-stencil"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_STENCIL_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            size,
        }
    }

    /// Recreates the attachment if `size` differs from the current one.
    pub fn ensure(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        if self.size != size {
            *self = Self::new(device, size);
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}
