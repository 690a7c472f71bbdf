//! Voxel renderer.
//!
//! Renders every chunk of the draw list with a single multi-draw-indexed-indirect call
//! into an offscreen colour target.
//!
//! # Architecture
//!
//! The renderer is responsible for:
//! 1. Creating and managing its own render pipeline
//! 2. Owning one set of per-frame buffers per frame-ring slot (indirect commands,
//!    chunk data, camera uniform)
//! 3. Recording the clear pass and the voxel draw into the recording slot's encoder
//! 4. Reading the colour target back to the host
//!
//! Every frame clears the target. When the draw list is empty nothing else is
//! recorded: no buffer writes, no bind group, no draw.
//!
//! The draw itself goes through [`record_draw_list`], which only needs a
//! [`GpuBackend`] and a [`VoxelPass`], so the single-draw contract is checked in
//! tests without a device.
//!
//! A second pipeline with line polygon mode is built when the device supports it;
//! [`VoxelRenderer::set_wireframe`] switches between the two.

use std::path::Path;
use std::sync::mpsc;

use log::{debug, info, warn};
use wgpu::{BufferUsages, RenderPipeline};

use crate::{
    core::StSystem,
    engine_state::{
        buffer_state::{BufferState, TrackedBuffer},
        camera_state::camera::CameraUniform,
        error::{RenderError, RenderResult},
        rendering::{
            frame::{deletion_queue::DeferredResource, FrameResourceRing, SlotState},
            gpu_backend::GpuBackend,
            texture::Texture,
            vertex::PackedVertex,
        },
    },
};

use super::{draw_list::DrawListBuilder, mesh_arena::MeshArena};

/// The render-pass commands the voxel draw issues after its pipeline is bound.
pub trait VoxelPass<B: GpuBackend> {
    /// Binds the shared vertex and index buffers.
    fn bind_geometry(&mut self, vertices: &B::Buffer, indices: &B::Buffer);

    /// Issues `count` indexed draws read from `commands`.
    fn draw_indirect(&mut self, commands: &B::Buffer, count: u32);
}

impl VoxelPass<BufferState> for wgpu::RenderPass<'_> {
    fn bind_geometry(&mut self, vertices: &TrackedBuffer, indices: &TrackedBuffer) {
        self.set_vertex_buffer(0, vertices.buffer.slice(..));
        self.set_index_buffer(indices.buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    fn draw_indirect(&mut self, commands: &TrackedBuffer, count: u32) {
        self.multi_draw_indexed_indirect(&commands.buffer, 0, count);
    }
}

/// Uploads a draw list and records it as one multi-draw.
///
/// The arena's buffers are bound once and every chunk is drawn by a single indirect
/// call whose count is the list length.
///
/// # Returns
/// `false` when the list is empty; nothing is written or recorded then.
///
/// # Errors
/// `RenderError::InstanceCapacityExceeded` if the list is longer than its buffers,
/// or the backend's write error.
pub fn record_draw_list<B: GpuBackend, P: VoxelPass<B>>(
    pass: &mut P,
    backend: &B,
    arena: &MeshArena<B>,
    draw_list: &DrawListBuilder,
    commands: &B::Buffer,
    chunk_data: &B::Buffer,
) -> RenderResult<bool> {
    if draw_list.len() > draw_list.max_instances() {
        return Err(RenderError::InstanceCapacityExceeded {
            requested: draw_list.len(),
            capacity: draw_list.max_instances(),
        });
    }
    if !draw_list.upload(backend, commands, chunk_data)? {
        return Ok(false);
    }

    pass.bind_geometry(arena.vertex_buffer(), arena.index_buffer());
    pass.draw_indirect(commands, draw_list.len() as u32);
    Ok(true)
}

/// Label of the per-slot indirect command buffers.
pub const INDIRECT_BUFFER_LABEL: &str = "draw_commands";
/// Label of the per-slot chunk-data storage buffers.
pub const CHUNK_DATA_BUFFER_LABEL: &str = "chunk_data";
/// Label of the per-slot camera uniform buffers.
pub const CAMERA_BUFFER_LABEL: &str = "camera_uniform";

const READBACK_BUFFER_LABEL: &str = "capture_readback";

/// Buffers written while one frame slot records.
struct FrameBuffers {
    indirect: TrackedBuffer,
    chunk_data: TrackedBuffer,
    camera: TrackedBuffer,
}

impl FrameBuffers {
    fn new(backend: &mut BufferState, draw_list: &DrawListBuilder) -> RenderResult<Self> {
        let indirect = backend.create_buffer(
            INDIRECT_BUFFER_LABEL,
            draw_list.command_buffer_size(),
            BufferUsages::INDIRECT | BufferUsages::COPY_DST,
        )?;
        let chunk_data = backend.create_buffer(
            CHUNK_DATA_BUFFER_LABEL,
            draw_list.chunk_data_buffer_size(),
            BufferUsages::STORAGE | BufferUsages::COPY_DST,
        )?;
        let camera = backend.create_buffer(
            CAMERA_BUFFER_LABEL,
            std::mem::size_of::<CameraUniform>() as u64,
            BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        )?;
        Ok(Self {
            indirect,
            chunk_data,
            camera,
        })
    }

    fn destroy(self, backend: &mut BufferState) {
        backend.destroy_buffer(self.indirect);
        backend.destroy_buffer(self.chunk_data);
        backend.destroy_buffer(self.camera);
    }
}

/// Draws the mesh arena through the frame ring.
pub struct VoxelRenderer {
    /// The WebGPU render pipeline for voxel rendering
    render_pipeline: RenderPipeline,
    /// Line polygon mode variant, present when the device supports it
    wireframe_pipeline: Option<RenderPipeline>,
    wireframe: bool,
    /// Layout of the camera and chunk-data bind group
    bind_group_layout: wgpu::BindGroupLayout,
    /// Shared device access
    buffer_state: StSystem<BufferState>,
    /// One entry per frame-ring slot
    frames: Vec<FrameBuffers>,
    color_target: Texture,
    depth_texture: Texture,
    clear_color: wgpu::Color,
}

impl VoxelRenderer {
    /// Creates the pipeline, the per-slot buffers and the render targets.
    ///
    /// # Arguments
    /// * `buffer_state` - Shared device access
    /// * `frames_in_flight` - Number of frame-ring slots
    /// * `draw_list` - Sizes the per-slot buffers to its instance capacity
    /// * `width`, `height` - Render target size in pixels
    /// * `clear_color` - RGBA clear colour
    pub fn new(
        buffer_state: StSystem<BufferState>,
        frames_in_flight: usize,
        draw_list: &DrawListBuilder,
        width: u32,
        height: u32,
        clear_color: [f64; 4],
    ) -> RenderResult<Self> {
        let mut frames = Vec::with_capacity(frames_in_flight);
        for _ in 0..frames_in_flight {
            let created = FrameBuffers::new(&mut buffer_state.get_mut(), draw_list);
            match created {
                Ok(buffers) => frames.push(buffers),
                Err(error) => {
                    let mut backend = buffer_state.get_mut();
                    for buffers in frames {
                        buffers.destroy(&mut backend);
                    }
                    return Err(error);
                }
            }
        }

        let backend = buffer_state.get();
        let device = backend.device.get();

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
            label: Some("voxel_bind_group_layout"),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Voxel Render Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Voxel Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/voxel.wgsl").into()),
        });

        let render_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            wgpu::PolygonMode::Fill,
            "Voxel Render Pipeline",
        );
        let wireframe_pipeline = device
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE)
            .then(|| {
                create_pipeline(
                    &device,
                    &pipeline_layout,
                    &shader,
                    wgpu::PolygonMode::Line,
                    "Voxel Wireframe Pipeline",
                )
            });

        let color_target = Texture::create_color_target(&device, width, height, "color_target");
        let depth_texture = Texture::create_depth_texture(&device, width, height, "depth_texture");

        drop(device);
        drop(backend);

        info!(
            "Voxel renderer ready: {}x{} target, {} frame slots",
            width, height, frames_in_flight
        );

        Ok(Self {
            render_pipeline,
            wireframe_pipeline,
            wireframe: false,
            bind_group_layout,
            buffer_state,
            frames,
            color_target,
            depth_texture,
            clear_color: wgpu::Color {
                r: clear_color[0],
                g: clear_color[1],
                b: clear_color[2],
                a: clear_color[3],
            },
        })
    }

    /// Records this frame's draw into the recording slot.
    ///
    /// # Arguments
    /// * `ring` - Must be recording
    /// * `arena` - Supplies the shared vertex and index buffers
    /// * `draw_list` - The frame's commands, already built
    /// * `camera` - View-projection uniform for this frame
    ///
    /// # Returns
    /// Whether a draw was issued. The target is cleared either way.
    pub fn draw(
        &self,
        ring: &mut FrameResourceRing<BufferState>,
        arena: &MeshArena<BufferState>,
        draw_list: &DrawListBuilder,
        camera: CameraUniform,
    ) -> RenderResult<bool> {
        let slot = ring.current_slot_index();
        if ring.slot_state(slot) != SlotState::Recording {
            return Err(RenderError::NotRecording);
        }

        let frame = &self.frames[slot];
        let backend = self.buffer_state.get();
        let bind_group = if draw_list.is_empty() {
            None
        } else {
            backend.write_buffer(&frame.camera, 0, bytemuck::cast_slice(&[camera]))?;
            let bind_group = backend
                .device
                .get()
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &self.bind_group_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: frame.camera.buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: frame.chunk_data.buffer.as_entire_binding(),
                        },
                    ],
                    label: Some("voxel_bind_group"),
                });
            Some(bind_group)
        };

        let (encoder, descriptors) = ring.recording_parts()?;
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Voxel Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.color_target.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Some(bind_group) = bind_group {
            let bind_group = descriptors.allocate(bind_group);
            render_pass.set_pipeline(self.active_pipeline());
            render_pass.set_bind_group(0, bind_group, &[]);
        }

        let drew = record_draw_list(
            &mut render_pass,
            &**backend,
            arena,
            draw_list,
            &frame.indirect,
            &frame.chunk_data,
        )?;
        if drew {
            debug!("Recorded {} indirect draws into slot {}", draw_list.len(), slot);
        }
        Ok(drew)
    }

    /// Switches between the filled and the line pipeline.
    ///
    /// # Returns
    /// Whether wireframe rendering is now active. Requesting it on a device without
    /// line polygon mode leaves the filled pipeline in use.
    pub fn set_wireframe(&mut self, enabled: bool) -> bool {
        if enabled && self.wireframe_pipeline.is_none() {
            warn!("Wireframe requested but the device has no line polygon mode");
        }
        self.wireframe = enabled && self.wireframe_pipeline.is_some();
        self.wireframe
    }

    /// Whether the line pipeline is in use.
    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    fn active_pipeline(&self) -> &RenderPipeline {
        match (&self.wireframe_pipeline, self.wireframe) {
            (Some(wireframe_pipeline), true) => wireframe_pipeline,
            _ => &self.render_pipeline,
        }
    }

    /// Recreates the render targets at a new size.
    ///
    /// The old targets are handed to the frame ring, since a submitted frame may
    /// still be drawing into them.
    pub fn resize(&mut self, ring: &mut FrameResourceRing<BufferState>, width: u32, height: u32) {
        let (color_target, depth_texture) = {
            let backend = self.buffer_state.get();
            let device = backend.device.get();
            (
                Texture::create_color_target(&device, width, height, "color_target"),
                Texture::create_depth_texture(&device, width, height, "depth_texture"),
            )
        };

        let old_color = std::mem::replace(&mut self.color_target, color_target);
        let old_depth = std::mem::replace(&mut self.depth_texture, depth_texture);
        ring.defer_destruction(DeferredResource::Texture(old_color.texture));
        ring.defer_destruction(DeferredResource::Texture(old_depth.texture));
        info!("Render target resized to {}x{}", width, height);
    }

    /// Size of the colour target in pixels.
    pub fn target_size(&self) -> (u32, u32) {
        (self.color_target.size.width, self.color_target.size.height)
    }

    /// Copies the colour target to the host as tightly packed RGBA8 rows.
    ///
    /// Blocks until every submitted frame has finished.
    pub fn read_pixels(&self) -> RenderResult<Vec<u8>> {
        let (width, height) = self.target_size();
        let padded_bytes_per_row = Texture::padded_bytes_per_row(width);

        let readback = self.buffer_state.get_mut().create_buffer(
            READBACK_BUFFER_LABEL,
            padded_bytes_per_row as u64 * height as u64,
            BufferUsages::COPY_DST | BufferUsages::MAP_READ,
        )?;

        let pixels = self.copy_and_map(&readback, width, height, padded_bytes_per_row);
        self.buffer_state.get_mut().destroy_buffer(readback);
        pixels
    }

    fn copy_and_map(
        &self,
        readback: &TrackedBuffer,
        width: u32,
        height: u32,
        padded_bytes_per_row: u32,
    ) -> RenderResult<Vec<u8>> {
        let backend = self.buffer_state.get();
        backend.immediate_submit("capture", &mut |encoder: &mut wgpu::CommandEncoder| {
            encoder.copy_texture_to_buffer(
                wgpu::TexelCopyTextureInfo {
                    texture: &self.color_target.texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                wgpu::TexelCopyBufferInfo {
                    buffer: &readback.buffer,
                    layout: wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(padded_bytes_per_row),
                        rows_per_image: Some(height),
                    },
                },
                self.color_target.size,
            );
        })?;

        let (sender, receiver) = mpsc::channel();
        backend.map_async(readback, wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        backend.wait_idle()?;
        receiver
            .recv()
            .map_err(|_| RenderError::ResourceCreation {
                label: READBACK_BUFFER_LABEL.to_string(),
                message: "map callback was dropped".to_string(),
            })??;

        let pixels = {
            let mapped = readback.buffer.slice(..).get_mapped_range();
            strip_row_padding(&mapped, width, height, padded_bytes_per_row)
        };
        readback.buffer.unmap();
        Ok(pixels)
    }

    /// Writes the colour target to `path` as a PNG.
    pub fn capture(&self, path: &Path) -> RenderResult<()> {
        let (width, height) = self.target_size();
        let pixels = self.read_pixels()?;
        image::save_buffer(path, &pixels, width, height, image::ColorType::Rgba8)?;
        info!("Captured {}x{} frame to {}", width, height, path.display());
        Ok(())
    }

    /// Releases the per-slot buffers and the render targets.
    ///
    /// The frame ring must have been drained.
    pub fn destroy(self) {
        let mut backend = self.buffer_state.get_mut();
        for buffers in self.frames {
            buffers.destroy(&mut backend);
        }
        backend.destroy_texture(self.color_target.texture);
        backend.destroy_texture(self.depth_texture.texture);
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    polygon_mode: wgpu::PolygonMode,
    label: &str,
) -> RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[PackedVertex::desc()],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: Texture::COLOR_FORMAT,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: Texture::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

/// Removes the per-row alignment padding of a texture readback.
pub fn strip_row_padding(data: &[u8], width: u32, height: u32, padded_bytes_per_row: u32) -> Vec<u8> {
    let row_bytes = (width * Texture::COLOR_BYTES_PER_PIXEL) as usize;
    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in data
        .chunks(padded_bytes_per_row as usize)
        .take(height as usize)
    {
        pixels.extend_from_slice(&row[..row_bytes]);
    }
    pixels
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::engine_state::{
        rendering::{
            meshing::{draw_list::ChunkInstance, MeshManager},
            mock_backend::{MockBackend, MockBuffer, MockOp},
        },
        voxels::{
            block::block_registry::BlockRegistry, chunk::chunk_creation::ChunkGenerator,
            world::World,
        },
    };

    /// Pass that remembers what was recorded into it.
    #[derive(Default)]
    struct RecordedPass {
        geometry: Vec<(u64, u64)>,
        draws: Vec<(u64, u32)>,
    }

    impl VoxelPass<MockBackend> for RecordedPass {
        fn bind_geometry(&mut self, vertices: &MockBuffer, indices: &MockBuffer) {
            self.geometry.push((vertices.id, indices.id));
        }

        fn draw_indirect(&mut self, commands: &MockBuffer, count: u32) {
            self.draws.push((commands.id, count));
        }
    }

    struct Fixture {
        backend: StSystem<MockBackend>,
        arena: MeshArena<MockBackend>,
        draw_list: DrawListBuilder,
        commands: MockBuffer,
        chunk_data: MockBuffer,
    }

    fn fixture(max_instances: usize) -> Fixture {
        let backend = StSystem::new(Box::new(MockBackend::new()));
        let arena = MeshArena::new(backend.clone(), 1 << 20, 3 << 19).unwrap();
        let draw_list = DrawListBuilder::new(max_instances);
        let commands = backend
            .get_mut()
            .create_buffer(
                INDIRECT_BUFFER_LABEL,
                draw_list.command_buffer_size(),
                BufferUsages::INDIRECT | BufferUsages::COPY_DST,
            )
            .unwrap();
        let chunk_data = backend
            .get_mut()
            .create_buffer(
                CHUNK_DATA_BUFFER_LABEL,
                draw_list.chunk_data_buffer_size(),
                BufferUsages::STORAGE | BufferUsages::COPY_DST,
            )
            .unwrap();
        Fixture {
            backend,
            arena,
            draw_list,
            commands,
            chunk_data,
        }
    }

    fn staircase_instances(arena: &mut MeshArena<MockBackend>) -> Vec<ChunkInstance> {
        let mut world = World::new();
        world.generate_grid(&ChunkGenerator::Staircase, 1);
        let mut manager = MeshManager::new(Arc::new(BlockRegistry::builtin()), 0, true);
        manager.rebuild(&world, arena).unwrap().to_vec()
    }

    #[test]
    fn test_whole_list_is_one_indirect_draw() {
        let mut fixture = fixture(16);
        let instances = staircase_instances(&mut fixture.arena);
        assert_eq!(instances.len(), 4);
        fixture.draw_list.build(&instances).unwrap();

        let mut pass = RecordedPass::default();
        let drew = record_draw_list(
            &mut pass,
            &**fixture.backend.get(),
            &fixture.arena,
            &fixture.draw_list,
            &fixture.commands,
            &fixture.chunk_data,
        )
        .unwrap();

        assert!(drew);
        assert_eq!(
            pass.geometry,
            vec![(fixture.arena.vertex_buffer().id, fixture.arena.index_buffer().id)]
        );
        assert_eq!(pass.draws, vec![(fixture.commands.id, 4)]);

        let command_bytes = fixture.draw_list.commands().len() * 20;
        assert_eq!(
            fixture.backend.get().read(&fixture.commands, 0, command_bytes),
            bytemuck::cast_slice::<_, u8>(fixture.draw_list.commands())
        );
    }

    #[test]
    fn test_empty_list_records_nothing() {
        let mut fixture = fixture(16);
        fixture.draw_list.build(&[]).unwrap();
        fixture.backend.get().clear_ops();

        let mut pass = RecordedPass::default();
        let drew = record_draw_list(
            &mut pass,
            &**fixture.backend.get(),
            &fixture.arena,
            &fixture.draw_list,
            &fixture.commands,
            &fixture.chunk_data,
        )
        .unwrap();

        assert!(!drew);
        assert!(pass.geometry.is_empty());
        assert!(pass.draws.is_empty());
        assert_eq!(
            fixture.backend.get().count_ops(|op| matches!(op, MockOp::Write { .. })),
            0
        );
    }

    #[test]
    fn test_each_frame_draws_the_current_list_once() {
        let mut fixture = fixture(16);
        let instances = staircase_instances(&mut fixture.arena);

        let mut pass = RecordedPass::default();
        for visible in [4, 1, 3] {
            fixture.draw_list.build(&instances[..visible]).unwrap();
            record_draw_list(
                &mut pass,
                &**fixture.backend.get(),
                &fixture.arena,
                &fixture.draw_list,
                &fixture.commands,
                &fixture.chunk_data,
            )
            .unwrap();
        }

        let counts: Vec<_> = pass.draws.iter().map(|(_, count)| *count).collect();
        assert_eq!(counts, vec![4, 1, 3]);
        assert_eq!(pass.geometry.len(), 3);
    }

    #[test]
    fn test_strip_row_padding_keeps_only_pixels() {
        let width = 3;
        let height = 2;
        let padded = Texture::padded_bytes_per_row(width);
        let mut data = vec![0xAAu8; (padded * height) as usize];
        for row in 0..height as usize {
            for byte in 0..12 {
                data[row * padded as usize + byte] = (row * 12 + byte) as u8;
            }
        }

        let pixels = strip_row_padding(&data, width, height, padded);
        assert_eq!(pixels.len(), 24);
        assert_eq!(pixels, (0..24).collect::<Vec<u8>>());
    }

    #[test]
    fn test_frame_buffer_labels_are_distinct() {
        let labels = [INDIRECT_BUFFER_LABEL, CHUNK_DATA_BUFFER_LABEL, CAMERA_BUFFER_LABEL];
        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
