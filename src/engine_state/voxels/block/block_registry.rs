//! # Block Registry Module
//!
//! Maps block identifiers to the attributes the renderer needs. The registry is
//! a flat table indexed by identifier, so lookups in the meshing loop are a
//! single bounds-checked index.
//!
//! ## File Format
//!
//! Registries can be loaded from a JSON array of block definitions:
//!
//! ```json
//! [
//!     { "id": 1, "name": "stone", "tags": { "displayable": true, "solid": true } },
//!     { "id": 4, "name": "water", "tags": { "solid": false, "transparent": true, "fluid": true } }
//! ]
//! ```
//!
//! A missing `displayable` or `solid` tag means `true`; the remaining tags default
//! to `false`. Identifier 0 is always air; a file may list it, but cannot mark it
//! displayable or solid.

use std::path::Path;

use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use super::{block_type::BlockType, BlockTypeSize, AIR};

/// Number of distinct identifiers a chunk cell can hold.
pub const MAX_BLOCK_TYPES: usize = BlockTypeSize::MAX as usize + 1;

/// Name reported for identifiers that have no registry entry.
pub const UNKNOWN_BLOCK_NAME: &str = "unknown";

/// Errors raised while building a block registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry file could not be read.
    #[error("failed to read block registry '{path}': {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// The registry contents are not valid JSON for the block format.
    #[error("invalid block registry JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two definitions share the same identifier.
    #[error("block id {0} is defined more than once")]
    DuplicateId(BlockTypeSize),

    /// A definition tried to make air displayable or solid.
    #[error("block id 0 is reserved for air and cannot be displayable or solid")]
    AirRedefined,
}

/// Render-relevant attributes of one block type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockAttributes {
    /// Human readable name, used downstream for material lookup
    pub name: String,
    /// Whether the mesher emits faces for this block
    pub displayable: bool,
    /// Gameplay solidity. Face culling does not consult this
    pub solid: bool,
    /// Whether light passes through the block
    pub transparent: bool,
    /// Whether the block is a liquid
    pub fluid: bool,
    /// Whether the block can burn
    pub flammable: bool,
    /// Emitted light level
    pub light_emission: u8,
}

impl BlockAttributes {
    fn air() -> Self {
        Self {
            name: "air".to_string(),
            displayable: false,
            solid: false,
            transparent: true,
            fluid: false,
            flammable: false,
            light_emission: 0,
        }
    }
}

#[derive(Deserialize)]
struct BlockDefinition {
    id: BlockTypeSize,
    name: String,
    #[serde(default)]
    tags: BlockTags,
    #[serde(default)]
    light_emission: u8,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct BlockTags {
    displayable: Option<bool>,
    solid: Option<bool>,
    transparent: bool,
    fluid: bool,
    flammable: bool,
}

/// Lookup table from block identifier to [`BlockAttributes`].
///
/// # Examples
///
/// ```
/// use voxel_render_core::engine_state::voxels::block::block_registry::BlockRegistry;
///
/// let registry = BlockRegistry::builtin();
/// assert!(registry.is_displayable(1));
/// assert!(!registry.is_displayable(0));
/// assert_eq!(registry.name(2), "grass_block");
/// ```
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    entries: Vec<Option<BlockAttributes>>,
}

impl BlockRegistry {
    /// Creates a registry that only knows about air.
    pub fn new() -> Self {
        let mut entries = vec![None; MAX_BLOCK_TYPES];
        entries[AIR as usize] = Some(BlockAttributes::air());
        Self { entries }
    }

    /// Creates the registry for the built-in [`BlockType`]s.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let opaque = |name: &str, flammable: bool| BlockAttributes {
            name: name.to_string(),
            displayable: true,
            solid: true,
            transparent: false,
            fluid: false,
            flammable,
            light_emission: 0,
        };

        registry.entries[BlockType::Stone.id() as usize] = Some(opaque("stone", false));
        registry.entries[BlockType::GrassBlock.id() as usize] = Some(opaque("grass_block", false));
        registry.entries[BlockType::OakWood.id() as usize] = Some(opaque("oak_wood", true));
        registry.entries[BlockType::Water.id() as usize] = Some(BlockAttributes {
            name: "water".to_string(),
            displayable: true,
            solid: false,
            transparent: true,
            fluid: true,
            flammable: false,
            light_emission: 0,
        });

        registry
    }

    /// Parses a registry from the JSON block format.
    ///
    /// # Errors
    /// Returns [`RegistryError::Parse`] for malformed input,
    /// [`RegistryError::DuplicateId`] when an identifier repeats and
    /// [`RegistryError::AirRedefined`] when air is given render attributes.
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let definitions: Vec<BlockDefinition> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        let mut defined = [false; MAX_BLOCK_TYPES];

        for definition in definitions {
            let id = definition.id;
            if defined[id as usize] {
                return Err(RegistryError::DuplicateId(id));
            }
            defined[id as usize] = true;

            if id == AIR {
                if definition.tags.displayable == Some(true) || definition.tags.solid == Some(true) {
                    return Err(RegistryError::AirRedefined);
                }
                continue;
            }

            debug!("Registered block {} as '{}'", id, definition.name);
            registry.entries[id as usize] = Some(BlockAttributes {
                name: definition.name,
                displayable: definition.tags.displayable.unwrap_or(true),
                solid: definition.tags.solid.unwrap_or(true),
                transparent: definition.tags.transparent,
                fluid: definition.tags.fluid,
                flammable: definition.tags.flammable,
                light_emission: definition.light_emission,
            });
        }

        Ok(registry)
    }

    /// Reads and parses a registry file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let registry = Self::from_json_str(&json)?;
        info!(
            "Loaded {} block types from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Returns the attributes registered for `id`, if any.
    pub fn attributes(&self, id: BlockTypeSize) -> Option<&BlockAttributes> {
        self.entries[id as usize].as_ref()
    }

    /// Whether the mesher should emit faces for this block.
    pub fn is_displayable(&self, id: BlockTypeSize) -> bool {
        self.attributes(id).is_some_and(|attributes| attributes.displayable)
    }

    /// Render solidity: every non-air block occludes the faces of its neighbours.
    pub fn is_solid(&self, id: BlockTypeSize) -> bool {
        id != AIR
    }

    /// Name of the block, or [`UNKNOWN_BLOCK_NAME`] for unregistered identifiers.
    pub fn name(&self, id: BlockTypeSize) -> &str {
        self.attributes(id)
            .map(|attributes| attributes.name.as_str())
            .unwrap_or(UNKNOWN_BLOCK_NAME)
    }

    /// Number of registered block types, air included.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }

    /// Always false: air is registered from construction.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCKS_JSON: &str = include_str!("../../../../assets/blocks.json");

    #[test]
    fn test_builtin_registry_attributes() {
        let registry = BlockRegistry::builtin();
        assert_eq!(registry.len(), 5);
        assert!(!registry.is_displayable(AIR));
        assert!(!registry.is_solid(AIR));
        assert!(registry.is_displayable(BlockType::Water.id()));
        assert!(registry.is_solid(BlockType::Water.id()));
        assert!(!registry.attributes(BlockType::Water.id()).unwrap().solid);
        assert_eq!(registry.name(BlockType::OakWood.id()), "oak_wood");
    }

    #[test]
    fn test_unknown_ids_are_not_displayable() {
        let registry = BlockRegistry::builtin();
        assert!(!registry.is_displayable(77));
        assert_eq!(registry.name(77), UNKNOWN_BLOCK_NAME);
        assert!(registry.attributes(77).is_none());
    }

    #[test]
    fn test_shipped_json_matches_builtin() {
        let parsed = BlockRegistry::from_json_str(BLOCKS_JSON).unwrap();
        let builtin = BlockRegistry::builtin();
        for id in 0..=BlockTypeSize::MAX {
            assert_eq!(parsed.attributes(id), builtin.attributes(id), "block {id}");
        }
    }

    #[test]
    fn test_untagged_blocks_are_displayable_and_solid() {
        let registry =
            BlockRegistry::from_json_str(r#"[{ "id": 9, "name": "glow", "light_emission": 12 }]"#)
                .unwrap();
        let glow = registry.attributes(9).unwrap();
        assert!(glow.displayable);
        assert!(glow.solid);
        assert!(!glow.transparent);
        assert!(!glow.fluid);
        assert!(!glow.flammable);
        assert_eq!(glow.light_emission, 12);
    }

    #[test]
    fn test_explicit_false_tags_are_kept() {
        let registry = BlockRegistry::from_json_str(
            r#"[{ "id": 9, "name": "barrier", "tags": { "displayable": false, "solid": false } }]"#,
        )
        .unwrap();
        assert!(!registry.is_displayable(9));
        assert!(!registry.attributes(9).unwrap().solid);
    }

    #[test]
    fn test_untagged_air_stays_air() {
        let registry = BlockRegistry::from_json_str(r#"[{ "id": 0, "name": "air" }]"#).unwrap();
        assert!(!registry.is_displayable(AIR));
        assert_eq!(registry.attributes(AIR), Some(&BlockAttributes::air()));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let result = BlockRegistry::from_json_str(
            r#"[{ "id": 1, "name": "a" }, { "id": 1, "name": "b" }]"#,
        );
        assert!(matches!(result, Err(RegistryError::DuplicateId(1))));
    }

    #[test]
    fn test_air_cannot_become_displayable() {
        let result = BlockRegistry::from_json_str(
            r#"[{ "id": 0, "name": "air", "tags": { "displayable": true } }]"#,
        );
        assert!(matches!(result, Err(RegistryError::AirRedefined)));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let result = BlockRegistry::from_json_str(r#"[{ "id": 300, "name": "too_big" }]"#);
        assert!(matches!(result, Err(RegistryError::Parse(_))));
    }
}
