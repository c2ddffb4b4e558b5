//! Textured-disc render pipeline
//!
//! The renderer exclusively owns one GPU texture per sprite frame. They are
//! created together with the pipeline and released when the renderer drops.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use thiserror::Error;
use wgpu::util::DeviceExt;

use super::shapes::disc_mesh;
use super::vertex::Vertex;
use crate::consts::DISC_SEGMENTS;
use crate::sim::SpriteView;

/// Render adapter errors, all raised while building the renderer
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no frame images supplied")]
    NoFrames,
    #[error("frame {index} has zero size")]
    EmptyFrame { index: usize },
    #[error("frame {index} pixel buffer is {actual} bytes, expected {expected} for RGBA8")]
    PixelSizeMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("renderer has {renderer} frames but the ball has {ball}")]
    FrameCountMismatch { renderer: usize, ball: usize },
}

/// Decoded RGBA8 pixels for one sprite frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl FrameImage {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba,
        }
    }

    /// Single-color frame (placeholder art, tests)
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let rgba = color
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self::new(width, height, rgba)
    }

    /// Check dimensions against the pixel buffer. `index` is only used for the error.
    pub fn validate(&self, index: usize) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::EmptyFrame { index });
        }
        let expected = self.width as usize * self.height as usize * 4;
        if self.rgba.len() != expected {
            return Err(RenderError::PixelSizeMismatch {
                index,
                expected,
                actual: self.rgba.len(),
            });
        }
        Ok(())
    }
}

/// Check a frame set before upload: every image is well formed and there is
/// exactly one per sprite frame the ball can show.
pub fn validate_frames(images: &[FrameImage], ball_frames: usize) -> Result<(), RenderError> {
    if images.is_empty() {
        return Err(RenderError::NoFrames);
    }
    for (index, image) in images.iter().enumerate() {
        image.validate(index)?;
    }
    if images.len() != ball_frames {
        return Err(RenderError::FrameCountMismatch {
            renderer: images.len(),
            ball: ball_frames,
        });
    }
    Ok(())
}

/// Orthographic projection keeping the normalized [-1, 1] square fully visible
pub fn projection(aspect: f32) -> Mat4 {
    if aspect >= 1.0 {
        Mat4::orthographic_rh(-aspect, aspect, -1.0, 1.0, -1.0, 1.0)
    } else {
        let inv = 1.0 / aspect.max(f32::EPSILON);
        Mat4::orthographic_rh(-1.0, 1.0, -inv, inv, -1.0, 1.0)
    }
}

// Must match `BallUniform` in ball.wgsl
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct BallUniform {
    projection: [[f32; 4]; 4], // offset 0
    ball_pos: [f32; 2],        // offset 64
    radius: f32,               // offset 72
    _pad: f32,                 // pad to 80 bytes
}

/// GPU resources for one sprite frame
struct FrameTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Draws a [`SpriteView`] as a textured disc
pub struct BallRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    frames: Vec<FrameTexture>,
}

impl BallRenderer {
    /// `ball_frames` is the ball's frame count; `images` must match it one to one.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        images: &[FrameImage],
        ball_frames: usize,
    ) -> Result<Self, RenderError> {
        validate_frames(images, ball_frames)?;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ball_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("ball.wgsl").into()),
        });

        let (vertices, indices) = disc_mesh(DISC_SEGMENTS);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ball_vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ball_indices"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ball_uniform"),
            contents: bytemuck::bytes_of(&BallUniform {
                projection: projection(1.0).to_cols_array_2d(),
                ball_pos: [0.0; 2],
                radius: 0.0,
                _pad: 0.0,
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ball_uniform_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ball_uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ball_texture_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("ball_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let frames = images
            .iter()
            .enumerate()
            .map(|(index, image)| {
                Self::upload_frame(device, queue, &texture_layout, &sampler, index, image)
            })
            .collect::<Vec<_>>();
        log::info!("Uploaded {} ball frame textures", frames.len());

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ball_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("ball_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            uniform_buffer,
            uniform_bind_group,
            frames,
        })
    }

    fn upload_frame(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        index: usize,
        image: &FrameImage,
    ) -> FrameTexture {
        let label = format!("ball_frame_{index}");
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label.as_str()),
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
            &image.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label.as_str()),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        FrameTexture {
            texture,
            bind_group,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Upload projection, position and radius for the next draw
    pub fn prepare(&self, queue: &wgpu::Queue, sprite: &impl SpriteView, aspect: f32) {
        let pos = sprite.position();
        let uniform = BallUniform {
            projection: projection(aspect).to_cols_array_2d(),
            ball_pos: [pos.x, pos.y],
            radius: sprite.radius(),
            _pad: 0.0,
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Record the disc draw using the sprite's current frame texture
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, sprite: &impl SpriteView) {
        let Some(frame) = self.frames.get(sprite.current_frame()) else {
            log::warn!(
                "No texture for frame {} ({} loaded), skipping draw",
                sprite.current_frame(),
                self.frames.len()
            );
            return;
        };

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_bind_group(1, &frame.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    /// Draw the ball over whatever `target` already holds
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        sprite: &impl SpriteView,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("ball_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        self.draw(&mut pass, sprite);
    }
}

impl Drop for BallRenderer {
    fn drop(&mut self) {
        for frame in &self.frames {
            frame.texture.destroy();
        }
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        self.uniform_buffer.destroy();
        log::debug!("Released {} ball frame textures", self.frames.len());
    }
}
