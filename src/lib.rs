#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Render Core
//!
//! The rendering core of a voxel engine, built with Rust and WGPU: a culled chunk
//! mesher, an append-only GPU mesh arena, and a per-frame draw-list builder that
//! renders every chunk with one multi-draw-indexed-indirect call, recorded through a
//! double-buffered frame resource ring.
//!
//! ## Key Modules
//!
//! * `core` - Shared-ownership wrappers used throughout the engine
//! * `engine_state` - The engine components: voxels, meshing, GPU resources and
//!   task management
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     if let Err(error) = voxel_render_core::run() {
//!         eprintln!("{error}");
//!     }
//! }
//! ```
//!
//! The headless runner reads an optional JSON configuration from the first command
//! line argument or the `VOXEL_CONFIG` environment variable.

use std::path::PathBuf;

use log::info;

pub mod core;
pub mod engine_state;

use engine_state::{config::EngineConfig, error::RenderError, EngineState};

/// Environment variable naming a configuration file.
pub const CONFIG_ENV_VAR: &str = "VOXEL_CONFIG";

/// Initialises `env_logger` from `RUST_LOG`, writing to stdout.
///
/// Calling it again is harmless.
pub fn init_logger() {
    let mut log_builder = env_logger::Builder::new();
    let _ = log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .try_init();
}

fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
}

/// Runs the headless renderer: builds the world, renders the configured number of
/// frames, optionally captures the last one, and shuts down.
pub fn run() -> Result<(), RenderError> {
    init_logger();
    info!("Logger initialized");

    let config = match config_path() {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            EngineConfig::load(&path)?
        }
        None => EngineConfig::default(),
    };

    let mut engine_state = EngineState::new(config)?;
    let instances = engine_state.rebuild_meshes()?;
    info!("Drawing {} chunk instances", instances);

    engine_state.render_frames(engine_state.config.frames_to_render)?;
    if let Some(path) = engine_state.config.capture_path.clone() {
        engine_state.capture(&path)?;
    }
    engine_state.shutdown()
}
