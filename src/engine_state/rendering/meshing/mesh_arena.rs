//! # Mesh Arena
//!
//! Two device buffers, one for packed vertices and one for indices, shared by every
//! chunk mesh in the world. Meshes are appended behind a pair of cursors and described
//! by a [`MeshAllocation`] that a draw command can use directly.
//!
//! ## Architecture
//!
//! The arena is a bump allocator with a hard ceiling. Both buffers are reserved at
//! construction and never grow. Individual allocations cannot be freed; `reset`
//! rewinds both cursors and invalidates every outstanding allocation, which suits a
//! "rebuild the whole world" meshing strategy.
//!
//! Uploads go through short-lived staging buffers. Both copies are recorded into a
//! single submission, so one mesh costs one device round-trip.
//!
//! ## Stale Allocations
//!
//! Every allocation is stamped with the arena generation at the time it was handed
//! out. `reset` bumps the generation, and [`MeshArena::validate`] reports allocations
//! from an earlier generation.

use log::{debug, error, info};
use wgpu::BufferUsages;

use crate::{
    core::StSystem,
    engine_state::{
        error::{ArenaBuffer, ArenaError, RenderResult},
        rendering::{gpu_backend::GpuBackend, vertex::PackedVertex},
    },
};

use super::mesh::ChunkMesh;

/// Size of one vertex in bytes.
pub const VERTEX_STRIDE: u64 = std::mem::size_of::<PackedVertex>() as u64;
/// Size of one index in bytes.
pub const INDEX_STRIDE: u64 = std::mem::size_of::<u32>() as u64;

/// Debug label of the shared vertex buffer.
pub const VERTEX_BUFFER_LABEL: &str = "mesh_arena_vertices";
/// Debug label of the shared index buffer.
pub const INDEX_BUFFER_LABEL: &str = "mesh_arena_indices";

/// Where one mesh lives inside the arena.
///
/// Allocations are plain values. Many chunk instances may reference the same
/// allocation; nothing but the arena ever writes the range it describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MeshAllocation {
    /// Number of indices to draw
    pub index_count: u32,
    /// First index within the shared index buffer
    pub first_index: u32,
    /// Added to every index to find the vertex
    pub vertex_offset: i32,
    /// Number of vertices the mesh occupies
    pub vertex_count: u32,
    /// Arena generation the allocation belongs to
    pub generation: u32,
}

impl MeshAllocation {
    /// Whether the allocation covers no geometry.
    pub fn is_empty(&self) -> bool {
        self.index_count == 0
    }

    /// Index range covered, in index units.
    pub fn index_range(&self) -> std::ops::Range<u32> {
        self.first_index..self.first_index + self.index_count
    }

    /// Vertex range covered, in vertex units.
    pub fn vertex_range(&self) -> std::ops::Range<u32> {
        let start = self.vertex_offset as u32;
        start..start + self.vertex_count
    }
}

/// Append-only storage for chunk meshes on the GPU.
pub struct MeshArena<B: GpuBackend> {
    backend: StSystem<B>,
    vertex_buffer: B::Buffer,
    index_buffer: B::Buffer,
    max_vertices: u32,
    max_indices: u32,
    vertex_cursor: u32,
    index_cursor: u32,
    generation: u32,
}

impl<B: GpuBackend> MeshArena<B> {
    /// Reserves both arena buffers.
    ///
    /// # Arguments
    /// * `backend` - Device used for buffers and uploads
    /// * `max_vertices` - Vertex capacity, at most `i32::MAX`
    /// * `max_indices` - Index capacity
    ///
    /// # Returns
    /// The arena, or the device error if either buffer could not be created.
    pub fn new(backend: StSystem<B>, max_vertices: u32, max_indices: u32) -> RenderResult<Self> {
        if max_vertices > i32::MAX as u32 {
            return Err(ArenaError::VertexOffsetOverflow(max_vertices as u64).into());
        }

        let vertex_bytes = max_vertices as u64 * VERTEX_STRIDE;
        let index_bytes = max_indices as u64 * INDEX_STRIDE;

        let (vertex_buffer, index_buffer) = {
            let mut device = backend.get_mut();
            let vertex_buffer = device.create_buffer(
                VERTEX_BUFFER_LABEL,
                vertex_bytes,
                BufferUsages::VERTEX | BufferUsages::COPY_DST,
            )?;
            let index_buffer = match device.create_buffer(
                INDEX_BUFFER_LABEL,
                index_bytes,
                BufferUsages::INDEX | BufferUsages::COPY_DST,
            ) {
                Ok(buffer) => buffer,
                Err(error) => {
                    device.destroy_buffer(vertex_buffer);
                    return Err(error);
                }
            };
            (vertex_buffer, index_buffer)
        };

        info!(
            "Mesh arena reserved {} vertex bytes and {} index bytes",
            vertex_bytes, index_bytes
        );

        Ok(Self {
            backend,
            vertex_buffer,
            index_buffer,
            max_vertices,
            max_indices,
            vertex_cursor: 0,
            index_cursor: 0,
            generation: 0,
        })
    }

    /// Appends one mesh to the arena.
    ///
    /// # Arguments
    /// * `indices` - Triangle indices relative to the mesh's first vertex
    /// * `vertices` - Packed vertices
    /// * `submit` - Records the given commands, submits them and blocks until they
    ///   complete. Called exactly once for a non-empty mesh.
    ///
    /// # Returns
    /// The allocation, positioned at the cursors as they were before the call.
    ///
    /// # Errors
    /// `ArenaError::CapacityExceeded` if either buffer lacks room, in which case
    /// nothing is uploaded. Staging and submission errors are passed through. On any
    /// error the cursors are left unchanged.
    pub fn upload_mesh<S>(
        &mut self,
        indices: &[u32],
        vertices: &[PackedVertex],
        submit: S,
    ) -> RenderResult<MeshAllocation>
    where
        S: FnOnce(&mut dyn FnMut(&mut B::Encoder)) -> RenderResult<()>,
    {
        let vertex_bytes: &[u8] = bytemuck::cast_slice(vertices);
        let index_bytes: &[u8] = bytemuck::cast_slice(indices);

        Self::check_capacity(
            ArenaBuffer::Vertex,
            vertex_bytes.len() as u64,
            self.remaining_vertices() as u64 * VERTEX_STRIDE,
        )?;
        Self::check_capacity(
            ArenaBuffer::Index,
            index_bytes.len() as u64,
            self.remaining_indices() as u64 * INDEX_STRIDE,
        )?;

        let allocation = MeshAllocation {
            index_count: indices.len() as u32,
            first_index: self.index_cursor,
            vertex_offset: self.vertex_cursor as i32,
            vertex_count: vertices.len() as u32,
            generation: self.generation,
        };

        if vertices.is_empty() && indices.is_empty() {
            return Ok(allocation);
        }

        let (vertex_staging, index_staging) = {
            let mut backend = self.backend.get_mut();
            let vertex_staging = stage(&mut **backend, "mesh_upload_vertices", vertex_bytes)?;
            let index_staging = match stage(&mut **backend, "mesh_upload_indices", index_bytes) {
                Ok(staging) => staging,
                Err(error) => {
                    if let Some(staging) = vertex_staging {
                        backend.destroy_buffer(staging);
                    }
                    return Err(error);
                }
            };
            (vertex_staging, index_staging)
        };

        let vertex_destination = self.vertex_cursor as u64 * VERTEX_STRIDE;
        let index_destination = self.index_cursor as u64 * INDEX_STRIDE;
        let submitted = {
            let backend = self.backend.get();
            let vertex_buffer = &self.vertex_buffer;
            let index_buffer = &self.index_buffer;
            let mut record = |encoder: &mut B::Encoder| {
                if let Some(staging) = &vertex_staging {
                    backend.copy_buffer_to_buffer(
                        encoder,
                        staging,
                        vertex_buffer,
                        vertex_destination,
                        vertex_bytes.len() as u64,
                    );
                }
                if let Some(staging) = &index_staging {
                    backend.copy_buffer_to_buffer(
                        encoder,
                        staging,
                        index_buffer,
                        index_destination,
                        index_bytes.len() as u64,
                    );
                }
            };
            submit(&mut record)
        };

        {
            let mut backend = self.backend.get_mut();
            for staging in [vertex_staging, index_staging].into_iter().flatten() {
                backend.destroy_buffer(staging);
            }
        }

        if let Err(error) = submitted {
            error!("Mesh upload failed: {}", error);
            return Err(error);
        }

        self.vertex_cursor += allocation.vertex_count;
        self.index_cursor += allocation.index_count;
        debug!(
            "Uploaded mesh: {} vertices at {}, {} indices at {}",
            allocation.vertex_count,
            allocation.vertex_offset,
            allocation.index_count,
            allocation.first_index
        );

        Ok(allocation)
    }

    /// Appends a chunk mesh using the backend's own blocking submission.
    pub fn upload_chunk_mesh(&mut self, mesh: &ChunkMesh) -> RenderResult<MeshAllocation> {
        let backend = self.backend.clone();
        self.upload_mesh(&mesh.indices, &mesh.vertices, |record| {
            backend.get().immediate_submit("mesh_arena_upload", record)
        })
    }

    /// Rewinds both cursors to zero.
    ///
    /// Every allocation handed out so far becomes stale. The buffer contents are left
    /// in place and overwritten by later uploads.
    pub fn reset(&mut self) {
        self.vertex_cursor = 0;
        self.index_cursor = 0;
        self.generation = self.generation.wrapping_add(1);
        info!("Mesh arena reset, generation {}", self.generation);
    }

    /// Checks that `allocation` was handed out since the last reset.
    pub fn validate(&self, allocation: &MeshAllocation) -> Result<(), ArenaError> {
        if allocation.generation != self.generation {
            return Err(ArenaError::StaleAllocation {
                allocation_generation: allocation.generation,
                arena_generation: self.generation,
            });
        }
        Ok(())
    }

    /// Releases both buffers. The caller must have drained all GPU work first.
    pub fn destroy(self) {
        let mut backend = self.backend.get_mut();
        backend.destroy_buffer(self.vertex_buffer);
        backend.destroy_buffer(self.index_buffer);
        info!("Mesh arena destroyed");
    }

    fn check_capacity(buffer: ArenaBuffer, requested_bytes: u64, remaining_bytes: u64) -> Result<(), ArenaError> {
        if requested_bytes > remaining_bytes {
            let error = ArenaError::CapacityExceeded {
                buffer,
                requested_bytes,
                remaining_bytes,
            };
            error!("{}", error);
            return Err(error);
        }
        Ok(())
    }

    /// The shared vertex buffer.
    pub fn vertex_buffer(&self) -> &B::Buffer {
        &self.vertex_buffer
    }

    /// The shared index buffer.
    pub fn index_buffer(&self) -> &B::Buffer {
        &self.index_buffer
    }

    /// Vertices written since the last reset.
    pub fn vertex_cursor(&self) -> u32 {
        self.vertex_cursor
    }

    /// Indices written since the last reset.
    pub fn index_cursor(&self) -> u32 {
        self.index_cursor
    }

    /// Vertex capacity.
    pub fn max_vertices(&self) -> u32 {
        self.max_vertices
    }

    /// Index capacity.
    pub fn max_indices(&self) -> u32 {
        self.max_indices
    }

    /// Vertices that still fit.
    pub fn remaining_vertices(&self) -> u32 {
        self.max_vertices - self.vertex_cursor
    }

    /// Indices that still fit.
    pub fn remaining_indices(&self) -> u32 {
        self.max_indices - self.index_cursor
    }

    /// Current generation, bumped by every reset.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Creates a staging buffer for non-empty data.
fn stage<B: GpuBackend>(
    backend: &mut B,
    label: &'static str,
    bytes: &[u8],
) -> RenderResult<Option<B::Buffer>> {
    if bytes.is_empty() {
        return Ok(None);
    }
    backend.create_staging_buffer(label, bytes).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::{
        error::RenderError,
        rendering::mock_backend::{MockBackend, MockOp},
    };

    fn arena(max_vertices: u32, max_indices: u32) -> (StSystem<MockBackend>, MeshArena<MockBackend>) {
        let backend = StSystem::new(Box::new(MockBackend::new()));
        let arena = MeshArena::new(backend.clone(), max_vertices, max_indices).unwrap();
        (backend, arena)
    }

    fn quads(count: u32, tag: u32) -> (Vec<u32>, Vec<PackedVertex>) {
        let vertices = (0..count * 4).map(|i| PackedVertex(tag << 16 | i)).collect();
        let indices = (0..count)
            .flat_map(|quad| {
                let base = quad * 4;
                [base, base + 1, base + 2, base, base + 2, base + 3]
            })
            .collect();
        (indices, vertices)
    }

    fn upload(
        backend: &StSystem<MockBackend>,
        arena: &mut MeshArena<MockBackend>,
        indices: &[u32],
        vertices: &[PackedVertex],
    ) -> RenderResult<MeshAllocation> {
        arena.upload_mesh(indices, vertices, |record| {
            backend.get().immediate_submit("test_upload", record)
        })
    }

    #[test]
    fn test_construction_reserves_both_buffers() {
        let (backend, arena) = arena(1024, 1536);
        let ops = backend.get().ops();
        assert!(matches!(
            ops[0],
            MockOp::CreateBuffer { label: VERTEX_BUFFER_LABEL, size: 4096, .. }
        ));
        assert!(matches!(
            ops[1],
            MockOp::CreateBuffer { label: INDEX_BUFFER_LABEL, size: 6144, .. }
        ));
        assert_eq!(arena.vertex_cursor(), 0);
        assert_eq!(arena.index_cursor(), 0);
        assert_eq!(arena.remaining_vertices(), 1024);
    }

    #[test]
    fn test_construction_failure_is_reported() {
        let mut backend = MockBackend::new();
        backend.max_buffer_size = 1000;
        let backend = StSystem::new(Box::new(backend));
        let result = MeshArena::new(backend.clone(), 64, 1024);
        assert!(matches!(result, Err(RenderError::BufferTooLarge { .. })));
        // The vertex buffer created before the failure is released again.
        assert_eq!(backend.get().live_buffers(), 0);
    }

    #[test]
    fn test_allocations_are_monotonic_and_disjoint() {
        let (backend, mut arena) = arena(4096, 8192);
        let mut allocations: Vec<MeshAllocation> = Vec::new();
        let mut previous_cursors = (0, 0);

        for (tag, count) in [3u32, 1, 7, 2, 5].into_iter().enumerate() {
            let (indices, vertices) = quads(count, tag as u32);
            let allocation = upload(&backend, &mut arena, &indices, &vertices).unwrap();

            assert_eq!(allocation.first_index, previous_cursors.1);
            assert_eq!(allocation.vertex_offset as u32, previous_cursors.0);
            assert_eq!(allocation.index_count, count * 6);
            assert_eq!(allocation.vertex_count, count * 4);

            let cursors = (arena.vertex_cursor(), arena.index_cursor());
            assert!(cursors.0 >= previous_cursors.0 && cursors.1 >= previous_cursors.1);
            previous_cursors = cursors;

            for earlier in &allocations {
                let (a, b) = (earlier.index_range(), allocation.index_range());
                assert!(a.end <= b.start || b.end <= a.start);
                let (a, b) = (earlier.vertex_range(), allocation.vertex_range());
                assert!(a.end <= b.start || b.end <= a.start);
            }
            allocations.push(allocation);
        }
        assert_eq!(previous_cursors, (18 * 4, 18 * 6));
    }

    #[test]
    fn test_data_lands_at_the_allocation() {
        let (backend, mut arena) = arena(256, 256);
        let (first_indices, first_vertices) = quads(2, 1);
        let (second_indices, second_vertices) = quads(1, 2);
        upload(&backend, &mut arena, &first_indices, &first_vertices).unwrap();
        let allocation = upload(&backend, &mut arena, &second_indices, &second_vertices).unwrap();

        let mock = backend.get();
        let stored_vertices = mock.read(
            arena.vertex_buffer(),
            allocation.vertex_offset as usize * 4,
            second_vertices.len() * 4,
        );
        assert_eq!(stored_vertices, bytemuck::cast_slice::<_, u8>(&second_vertices[..]));
        let stored_indices = mock.read(
            arena.index_buffer(),
            allocation.first_index as usize * 4,
            second_indices.len() * 4,
        );
        assert_eq!(stored_indices, bytemuck::cast_slice::<_, u8>(&second_indices[..]));
    }

    #[test]
    fn test_upload_is_one_submission_and_frees_staging() {
        let (backend, mut arena) = arena(256, 256);
        backend.get().clear_ops();
        let (indices, vertices) = quads(3, 0);
        upload(&backend, &mut arena, &indices, &vertices).unwrap();

        let mock = backend.get();
        assert_eq!(mock.count_ops(|op| matches!(op, MockOp::Submit { .. })), 1);
        assert_eq!(mock.count_ops(|op| matches!(op, MockOp::Submit { copies: 2, .. })), 1);
        assert_eq!(mock.count_ops(|op| matches!(op, MockOp::CreateStaging { .. })), 2);
        assert_eq!(mock.count_ops(|op| matches!(op, MockOp::DestroyBuffer(_))), 2);
        assert_eq!(mock.live_buffers(), 2);
    }

    #[test]
    fn test_vertex_capacity_exceeded_leaves_cursors() {
        let (backend, mut arena) = arena(16, 1024);
        let (indices, vertices) = quads(3, 0);
        upload(&backend, &mut arena, &indices, &vertices).unwrap();
        backend.get().clear_ops();

        let (indices, vertices) = quads(2, 1);
        let error = upload(&backend, &mut arena, &indices, &vertices).unwrap_err();
        assert!(matches!(
            error,
            RenderError::Arena(ArenaError::CapacityExceeded {
                buffer: ArenaBuffer::Vertex,
                requested_bytes: 32,
                remaining_bytes: 16,
            })
        ));
        assert_eq!((arena.vertex_cursor(), arena.index_cursor()), (12, 18));
        assert!(backend.get().ops().is_empty());
    }

    #[test]
    fn test_index_capacity_exceeded_leaves_cursors() {
        let (backend, mut arena) = arena(1024, 10);
        let (indices, vertices) = quads(2, 0);
        let error = upload(&backend, &mut arena, &indices, &vertices).unwrap_err();
        assert!(matches!(
            error,
            RenderError::Arena(ArenaError::CapacityExceeded {
                buffer: ArenaBuffer::Index,
                ..
            })
        ));
        assert_eq!((arena.vertex_cursor(), arena.index_cursor()), (0, 0));
    }

    #[test]
    fn test_exact_fit_then_full() {
        let (backend, mut arena) = arena(8, 12);
        let (indices, vertices) = quads(2, 0);
        upload(&backend, &mut arena, &indices, &vertices).unwrap();
        assert_eq!(arena.remaining_vertices(), 0);
        assert_eq!(arena.remaining_indices(), 0);

        let (indices, vertices) = quads(1, 0);
        assert!(upload(&backend, &mut arena, &indices, &vertices).is_err());
    }

    #[test]
    fn test_reset_rewinds_and_invalidates() {
        let (backend, mut arena) = arena(256, 256);
        let (indices, vertices) = quads(4, 0);
        upload(&backend, &mut arena, &indices, &vertices).unwrap();
        let old = upload(&backend, &mut arena, &indices, &vertices).unwrap();
        assert!(arena.validate(&old).is_ok());

        arena.reset();
        assert_eq!((arena.vertex_cursor(), arena.index_cursor()), (0, 0));
        assert_eq!(
            arena.validate(&old),
            Err(ArenaError::StaleAllocation {
                allocation_generation: 0,
                arena_generation: 1,
            })
        );

        let fresh = upload(&backend, &mut arena, &indices, &vertices).unwrap();
        assert_eq!(fresh.first_index, 0);
        assert_eq!(fresh.vertex_offset, 0);
        assert_eq!(fresh.generation, 1);
        assert!(arena.validate(&fresh).is_ok());
    }

    #[test]
    fn test_empty_mesh_skips_submission() {
        let (backend, mut arena) = arena(256, 256);
        backend.get().clear_ops();
        let allocation = upload(&backend, &mut arena, &[], &[]).unwrap();
        assert!(allocation.is_empty());
        assert!(backend.get().ops().is_empty());
    }

    #[test]
    fn test_failed_submission_frees_staging_and_keeps_cursors() {
        let (backend, mut arena) = arena(256, 256);
        let (indices, vertices) = quads(1, 0);
        let result = arena.upload_mesh(&indices, &vertices, |_record| Err(RenderError::NotRecording));

        assert!(matches!(result, Err(RenderError::NotRecording)));
        assert_eq!((arena.vertex_cursor(), arena.index_cursor()), (0, 0));
        assert_eq!(backend.get().live_buffers(), 2);
    }

    #[test]
    fn test_chunk_mesh_upload_uses_backend_submission() {
        let (backend, mut arena) = arena(256, 256);
        let (indices, vertices) = quads(2, 0);
        let mesh = ChunkMesh { vertices, indices };
        let allocation = arena.upload_chunk_mesh(&mesh).unwrap();
        assert_eq!(allocation.index_count, 12);
        assert_eq!(backend.get().count_ops(|op| matches!(op, MockOp::Wait(_))), 1);
    }

    #[test]
    fn test_destroy_releases_buffers() {
        let (backend, arena) = arena(64, 64);
        arena.destroy();
        assert_eq!(backend.get().live_buffers(), 0);
    }
}
