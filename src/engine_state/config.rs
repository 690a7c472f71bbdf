//! # Engine Configuration
//!
//! Every capacity the rendering core reserves up front lives here rather than in a
//! constant, together with the world and capture settings the headless runner uses.
//! Configurations are JSON; any missing field takes its default, so `{}` is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::voxels::chunk::chunk_creation::ChunkGenerator;

/// Errors raised while loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path:?}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The configuration is not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Settings for the rendering core and the headless runner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Vertex capacity of the mesh arena
    pub max_vertices: u32,
    /// Index capacity of the mesh arena
    pub max_indices: u32,
    /// Instance capacity of each frame's draw-list buffers
    pub max_instances: u32,
    /// Number of frame slots in the resource ring
    pub frames_in_flight: usize,
    /// Chunks generated on each side of the origin along X and Z
    pub render_distance: i32,
    /// How new chunks are filled
    pub world_generator: ChunkGenerator,
    /// Share one arena allocation between chunks with identical meshes
    pub deduplicate_meshes: bool,
    /// Mesh worker threads; 0 meshes on the calling thread
    pub mesh_workers: usize,
    /// Offscreen target width in pixels
    pub target_width: u32,
    /// Offscreen target height in pixels
    pub target_height: u32,
    /// Frames the headless runner renders before shutting down
    pub frames_to_render: u32,
    /// RGBA clear colour
    pub clear_color: [f64; 4],
    /// Where to write a PNG of the last frame, if anywhere
    pub capture_path: Option<PathBuf>,
    /// Block definitions file; the built-in registry is used when absent
    pub block_registry: Option<PathBuf>,
    /// Camera position in world space
    pub camera_eye: [f32; 3],
    /// Point the camera looks at
    pub camera_target: [f32; 3],
    /// Draw triangle edges only; ignored when the device lacks line polygon mode
    pub wireframe: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_vertices: 16 * 1024 * 1024,
            max_indices: 24 * 1024 * 1024,
            max_instances: 10_000,
            frames_in_flight: 2,
            render_distance: 2,
            world_generator: ChunkGenerator::default(),
            deduplicate_meshes: true,
            mesh_workers: 4,
            target_width: 800,
            target_height: 600,
            frames_to_render: 3,
            clear_color: [0.1, 0.2, 0.3, 1.0],
            capture_path: None,
            block_registry: None,
            camera_eye: [96.0, 80.0, 96.0],
            camera_target: [0.0, 0.0, 0.0],
            wireframe: false,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Arguments
    /// * `path` - Path to a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Rejects values the rendering core cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            })
        }

        if self.max_vertices == 0 {
            return invalid("max_vertices", "must be greater than zero");
        }
        if self.max_vertices > i32::MAX as u32 {
            return invalid("max_vertices", "must fit in a signed base vertex");
        }
        if self.max_indices == 0 {
            return invalid("max_indices", "must be greater than zero");
        }
        if self.max_instances == 0 {
            return invalid("max_instances", "must be greater than zero");
        }
        if self.frames_in_flight == 0 {
            return invalid("frames_in_flight", "at least one frame slot is required");
        }
        if self.render_distance < 0 {
            return invalid("render_distance", "must not be negative");
        }
        if self.target_width == 0 || self.target_height == 0 {
            return invalid("target_width", "render target must have a non-zero size");
        }
        if let ChunkGenerator::Random { density, .. } = self.world_generator {
            if !(0.0..=1.0).contains(&density) {
                return invalid("world_generator", "random density must be within 0..=1");
            }
        }
        Ok(())
    }

    /// Byte size of the arena's vertex buffer.
    pub fn vertex_buffer_bytes(&self) -> u64 {
        self.max_vertices as u64 * std::mem::size_of::<u32>() as u64
    }

    /// Byte size of the arena's index buffer.
    pub fn index_buffer_bytes(&self) -> u64 {
        self.max_indices as u64 * std::mem::size_of::<u32>() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.frames_in_flight, 2);
        assert_eq!(config.max_instances, 10_000);
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_json_str(
            r#"{ "max_vertices": 4096, "world_generator": { "kind": "slab", "height": 5 } }"#,
        )
        .unwrap();
        assert_eq!(config.max_vertices, 4096);
        assert_eq!(config.vertex_buffer_bytes(), 16384);
        assert_eq!(config.world_generator, ChunkGenerator::Slab { height: 5 });
        assert_eq!(config.max_indices, EngineConfig::default().max_indices);
    }

    #[test]
    fn test_wireframe_switch() {
        assert!(!EngineConfig::default().wireframe);
        let config = EngineConfig::from_json_str(r#"{ "wireframe": true }"#).unwrap();
        assert!(config.wireframe);
    }

    #[test]
    fn test_zero_frames_in_flight_is_rejected() {
        let error = EngineConfig::from_json_str(r#"{ "frames_in_flight": 0 }"#).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::Invalid {
                field: "frames_in_flight",
                ..
            }
        ));
    }

    #[test]
    fn test_default_buffers_fit_common_device_limits() {
        let config = EngineConfig::default();
        let limit = wgpu::Limits::default().max_buffer_size;
        assert!(config.vertex_buffer_bytes() <= limit);
        assert!(config.index_buffer_bytes() <= limit);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let error = EngineConfig::load("/nonexistent/voxel.json").unwrap_err();
        assert!(matches!(error, ConfigError::Io { .. }));
        assert!(error.to_string().contains("voxel.json"));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let error = EngineConfig::from_json_str("{ max_vertices: }").unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }
}
