//! # Voxels
//!
//! Block definitions, chunk storage and the world that the mesher reads.
//!
//! * **Block**: Block ids, faces and the registry that decides what is displayable
//! * **Chunk**: A fixed 32x32x32 array of block ids and the generators that fill it
//! * **World**: Chunks keyed by chunk position, with neighbour lookup for meshing
//! * **Tasks**: Chunk generation on worker threads
//!
//! Chunks are shared as `MtResource<Chunk>` so mesh workers can read a chunk and its
//! six neighbours while the world keeps ownership.

pub mod block;
pub mod chunk;
pub mod tasks;
pub mod world;
