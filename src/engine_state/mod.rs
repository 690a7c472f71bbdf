//! # Engine State Module
//!
//! The core engine module that wires the rendering core together.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `buffer_state` - GPU buffer creation, analytics and submission
//! * `camera_state` - Look-at camera and projection
//! * `config` - JSON engine configuration
//! * `graphics_context` - Headless adapter and device setup
//! * `rendering` - Meshing, the mesh arena, draw lists, the frame ring and the renderer
//! * `task_management` - Worker threads for chunk generation and meshing
//! * `voxels` - Blocks, chunks and the world
//!
//! ## Frame Flow
//!
//! 1. The frame ring selects the next slot and waits for its previous GPU work
//! 2. The draw list is rebuilt from the current chunk instances
//! 3. The renderer uploads it into the slot's buffers and records one indirect draw
//! 4. The slot is submitted and its fence kept for the next time it comes around

use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use web_time::Instant;

use crate::core::StSystem;

pub mod buffer_state;
pub mod camera_state;
pub mod config;
pub mod error;
pub mod graphics_context;
pub mod rendering;
pub mod task_management;
pub mod voxels;

use buffer_state::BufferState;
use camera_state::CameraState;
use config::EngineConfig;
use error::RenderResult;
use graphics_context::GraphicsContext;
use rendering::{
    frame::FrameResourceRing,
    meshing::{
        draw_list::DrawListBuilder, mesh_arena::MeshArena, renderer::VoxelRenderer, MeshManager,
    },
};
use task_management::TaskManager;
use voxels::{block::block_registry::BlockRegistry, world::World};

/// The main state container for the voxel engine.
///
/// # Examples
///
/// ```no_run
/// use voxel_render_core::engine_state::{config::EngineConfig, EngineState};
///
/// let mut engine_state = EngineState::new(EngineConfig::default()).unwrap();
/// engine_state.rebuild_meshes().unwrap();
/// for _ in 0..3 {
///     engine_state.render_frame().unwrap();
/// }
/// engine_state.shutdown().unwrap();
/// ```
pub struct EngineState {
    /// Settings the engine was created with
    pub config: EngineConfig,
    /// Adapter and device handles
    pub graphics: GraphicsContext,
    /// Buffer state for managing GPU buffers
    pub buffer_state: StSystem<BufferState>,
    /// Block definitions used for meshing
    pub registry: Arc<BlockRegistry>,
    /// The voxel world containing all chunk data
    pub world: World,
    /// Camera used for every frame
    pub camera_state: CameraState,
    mesh_manager: MeshManager,
    arena: MeshArena<BufferState>,
    draw_list: DrawListBuilder,
    ring: FrameResourceRing<BufferState>,
    renderer: VoxelRenderer,
}

impl EngineState {
    /// Creates the device, all GPU resources and the initial world.
    ///
    /// Meshes are not built yet; call [`EngineState::rebuild_meshes`].
    pub fn new(config: EngineConfig) -> RenderResult<Self> {
        config.validate()?;

        let registry = match &config.block_registry {
            Some(path) => BlockRegistry::load(path)?,
            None => BlockRegistry::builtin(),
        };
        info!("Block registry holds {} block types", registry.len());

        // No GPU resources exist yet.
        let world = Self::build_world(&config)?;

        let graphics = GraphicsContext::new_headless()?;
        let buffer_state = StSystem::new(Box::new(BufferState::new(
            graphics.device.clone(),
            graphics.queue.clone(),
        )));

        let ring = FrameResourceRing::new(buffer_state.clone(), config.frames_in_flight)?;
        let arena = MeshArena::new(buffer_state.clone(), config.max_vertices, config.max_indices)?;
        let draw_list = DrawListBuilder::new(config.max_instances as usize);
        let mut renderer = match VoxelRenderer::new(
            buffer_state.clone(),
            config.frames_in_flight,
            &draw_list,
            config.target_width,
            config.target_height,
            config.clear_color,
        ) {
            Ok(renderer) => renderer,
            Err(error) => {
                arena.destroy();
                return Err(error);
            }
        };
        renderer.set_wireframe(config.wireframe);

        let registry = Arc::new(registry);
        let mesh_manager = MeshManager::new(
            registry.clone(),
            config.mesh_workers,
            config.deduplicate_meshes,
        );
        let camera_state = CameraState::new(
            config.camera_eye,
            config.camera_target,
            config.target_width,
            config.target_height,
        );

        Ok(Self {
            config,
            graphics,
            buffer_state,
            registry,
            world,
            camera_state,
            mesh_manager,
            arena,
            draw_list,
            ring,
            renderer,
        })
    }

    /// Generates the starting chunk grid, on worker threads when the configuration
    /// asks for mesh workers.
    fn build_world(config: &EngineConfig) -> RenderResult<World> {
        let mut world = World::new();
        if config.mesh_workers > 0 {
            let mut task_manager = TaskManager::new(config.mesh_workers);
            world.generate_grid_with(
                &mut task_manager,
                &config.world_generator,
                config.render_distance,
            )?;
        } else {
            world.generate_grid(&config.world_generator, config.render_distance);
        }
        Ok(world)
    }

    /// Re-meshes the whole world into a freshly reset arena.
    ///
    /// Waits for every frame in flight first, since those frames read the arena.
    ///
    /// # Returns
    /// The number of chunk instances to draw.
    pub fn rebuild_meshes(&mut self) -> RenderResult<usize> {
        self.ring.drain()?;
        let instances = self.mesh_manager.rebuild(&self.world, &mut self.arena)?;
        Ok(instances.len())
    }

    /// Records and submits one frame.
    ///
    /// # Returns
    /// Whether any chunk was drawn. A frame with nothing to draw is still cleared
    /// and submitted.
    pub fn render_frame(&mut self) -> RenderResult<bool> {
        let started = Instant::now();
        let slot = self.ring.begin_frame("voxel_frame")?;

        // The slot is submitted even when recording fails so it never stays open.
        let recorded = self.record_frame();
        self.ring.submit_frame()?;
        let drew = recorded?;

        debug!(
            "Frame {} (slot {}) recorded {} draws in {:?}",
            self.ring.frame_number(),
            slot,
            self.draw_list.len(),
            started.elapsed()
        );
        Ok(drew)
    }

    fn record_frame(&mut self) -> RenderResult<bool> {
        let instances = self.mesh_manager.instances();
        if cfg!(debug_assertions) {
            for instance in instances {
                self.arena.validate(&instance.mesh)?;
            }
        }
        self.draw_list.build(instances)?;
        self.renderer.draw(
            &mut self.ring,
            &self.arena,
            &self.draw_list,
            self.camera_state.uniform(),
        )
    }

    /// Renders `count` frames.
    pub fn render_frames(&mut self, count: u32) -> RenderResult<()> {
        for _ in 0..count {
            self.render_frame()?;
        }
        Ok(())
    }

    /// Changes the render target size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(&mut self.ring, width, height);
        self.camera_state.resize(width, height);
    }

    /// Writes the last rendered frame to `path` as a PNG.
    pub fn capture(&self, path: &Path) -> RenderResult<()> {
        self.renderer.capture(path)
    }

    /// Mesh statistics and instances.
    pub fn mesh_manager(&self) -> &MeshManager {
        &self.mesh_manager
    }

    /// The shared mesh storage.
    pub fn arena(&self) -> &MeshArena<BufferState> {
        &self.arena
    }

    /// The draw list of the last frame.
    pub fn draw_list(&self) -> &DrawListBuilder {
        &self.draw_list
    }

    /// The frame resource ring.
    pub fn ring(&self) -> &FrameResourceRing<BufferState> {
        &self.ring
    }

    /// Waits for the GPU and releases every GPU resource the engine created.
    pub fn shutdown(mut self) -> RenderResult<()> {
        self.ring.drain()?;
        self.renderer.destroy();
        self.arena.destroy();
        let buffer_state = self.buffer_state.get();
        buffer_state.log_totals();
        info!("Engine shut down after {} frames", self.ring.frame_number());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::chunk_creation::ChunkGenerator;

    #[test]
    fn test_world_is_built_from_config_alone() {
        let config = EngineConfig {
            render_distance: 1,
            world_generator: ChunkGenerator::Slab { height: 5 },
            mesh_workers: 2,
            ..EngineConfig::default()
        };
        let world = EngineState::build_world(&config).unwrap();
        assert_eq!(world.len(), 4);

        let sequential = EngineState::build_world(&EngineConfig {
            mesh_workers: 0,
            ..config
        })
        .unwrap();
        assert_eq!(sequential.positions(), world.positions());
    }
}
