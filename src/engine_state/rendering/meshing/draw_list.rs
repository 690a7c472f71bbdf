//! # Draw List
//!
//! Per-frame assembly of the arrays consumed by the batched draw: one indirect command
//! and one chunk-data record per visible chunk instance, in the same order.
//!
//! Array index `i` is the draw index. Each command's `first_instance` is set to `i`,
//! so the vertex shader reads `chunk_data[instance_index]` to find the chunk's offset.
//! This keeps the two arrays bound together without relying on a draw-ID builtin.

use bytemuck::{Pod, Zeroable};
use cgmath::Point3;

use crate::engine_state::{
    error::{RenderError, RenderResult},
    rendering::gpu_backend::GpuBackend,
    voxels::chunk::CHUNK_DIMENSION,
};

use super::mesh_arena::MeshAllocation;

/// One indexed indirect draw, laid out as the GPU reads it.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct IndirectDrawCommand {
    /// Number of indices to draw
    pub index_count: u32,
    /// Always 1; every chunk instance is its own draw
    pub instance_count: u32,
    /// First index within the arena's index buffer
    pub first_index: u32,
    /// Added to each index before fetching a vertex
    pub base_vertex: i32,
    /// The draw index, read back in the shader as `instance_index`
    pub first_instance: u32,
}

/// Per-draw data read by the vertex shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuChunkData {
    /// World-space position of the chunk's minimum corner
    pub position: [f32; 3],
    /// Pads the record to 16 bytes for storage-buffer layout
    pub padding: f32,
}

/// A chunk to draw this frame and the geometry it uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkInstance {
    /// Chunk coordinate of the instance
    pub chunk_position: Point3<i32>,
    /// Arena allocation holding its mesh, possibly shared with other instances
    pub mesh: MeshAllocation,
}

impl ChunkInstance {
    /// World-space origin of the instance.
    pub fn world_position(&self) -> [f32; 3] {
        let dimension = CHUNK_DIMENSION as f32;
        [
            self.chunk_position.x as f32 * dimension,
            self.chunk_position.y as f32 * dimension,
            self.chunk_position.z as f32 * dimension,
        ]
    }
}

/// Builds the indirect command and chunk data arrays for one frame.
pub struct DrawListBuilder {
    commands: Vec<IndirectDrawCommand>,
    chunk_data: Vec<GpuChunkData>,
    max_instances: usize,
}

impl DrawListBuilder {
    /// Creates a builder whose arrays never exceed `max_instances` entries.
    pub fn new(max_instances: usize) -> Self {
        Self {
            commands: Vec::with_capacity(max_instances),
            chunk_data: Vec::with_capacity(max_instances),
            max_instances,
        }
    }

    /// Replaces both arrays with one entry per instance.
    ///
    /// # Errors
    /// `RenderError::InstanceCapacityExceeded` if there are more instances than the
    /// per-frame buffers hold. Both arrays are left empty in that case.
    pub fn build(&mut self, instances: &[ChunkInstance]) -> RenderResult<()> {
        self.commands.clear();
        self.chunk_data.clear();

        if instances.len() > self.max_instances {
            return Err(RenderError::InstanceCapacityExceeded {
                requested: instances.len(),
                capacity: self.max_instances,
            });
        }

        for (draw_index, instance) in instances.iter().enumerate() {
            self.commands.push(IndirectDrawCommand {
                index_count: instance.mesh.index_count,
                instance_count: 1,
                first_index: instance.mesh.first_index,
                base_vertex: instance.mesh.vertex_offset,
                first_instance: draw_index as u32,
            });
            self.chunk_data.push(GpuChunkData {
                position: instance.world_position(),
                padding: 0.0,
            });
        }

        Ok(())
    }

    /// Builds a list where every chunk uses the same mesh.
    pub fn build_stamped(
        &mut self,
        chunk_positions: &[Point3<i32>],
        mesh: MeshAllocation,
    ) -> RenderResult<()> {
        let instances: Vec<_> = chunk_positions
            .iter()
            .map(|chunk_position| ChunkInstance {
                chunk_position: *chunk_position,
                mesh,
            })
            .collect();
        self.build(&instances)
    }

    /// Writes both arrays to their device buffers.
    ///
    /// # Returns
    /// `false` without touching the device when the list is empty.
    pub fn upload<B: GpuBackend>(
        &self,
        backend: &B,
        command_buffer: &B::Buffer,
        chunk_data_buffer: &B::Buffer,
    ) -> RenderResult<bool> {
        if self.is_empty() {
            return Ok(false);
        }
        backend.write_buffer(command_buffer, 0, bytemuck::cast_slice(&self.commands))?;
        backend.write_buffer(chunk_data_buffer, 0, bytemuck::cast_slice(&self.chunk_data))?;
        Ok(true)
    }

    /// The indirect commands, in draw order.
    pub fn commands(&self) -> &[IndirectDrawCommand] {
        &self.commands
    }

    /// The per-draw chunk data, in draw order.
    pub fn chunk_data(&self) -> &[GpuChunkData] {
        &self.chunk_data
    }

    /// Number of draws in the list.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Instance capacity of the per-frame buffers.
    pub fn max_instances(&self) -> usize {
        self.max_instances
    }

    /// Bytes needed for the command buffer at full capacity.
    pub fn command_buffer_size(&self) -> u64 {
        (self.max_instances * std::mem::size_of::<IndirectDrawCommand>()) as u64
    }

    /// Bytes needed for the chunk-data buffer at full capacity.
    pub fn chunk_data_buffer_size(&self) -> u64 {
        (self.max_instances * std::mem::size_of::<GpuChunkData>()) as u64
    }
}
