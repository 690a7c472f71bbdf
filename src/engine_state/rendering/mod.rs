//! Rendering system for the voxel engine.
//!
//! This module contains the core rendering functionality: chunk meshing, the GPU mesh
//! arena, the per-frame draw list, the frame resource ring and the offscreen
//! renderer.
//!
//! Everything that touches the device goes through [`gpu_backend::GpuBackend`], so
//! the arena and the frame ring are exercised in tests without a GPU.

pub mod frame;
pub mod gpu_backend;
pub mod meshing;
#[cfg(test)]
mod mock_backend;
pub mod tasks;
pub mod texture;
pub mod vertex;

// Re-export commonly used types
pub use meshing::MeshManager;
pub use vertex::PackedVertex;
