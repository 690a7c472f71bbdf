//! # Block Side Module
//!
//! This module defines the six faces of a voxel block together with the fixed
//! per-face tables the mesher relies on: the neighbour offset, the normal ID
//! written into packed vertices, and the quad corners in front-facing order.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The discriminant of each variant is the normal ID packed into vertices,
/// so the shader side can recover the face normal from three bits.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The face pointing towards positive X
    East = 0,

    /// The face pointing towards negative X
    West = 1,

    /// The face pointing towards positive Y
    Top = 2,

    /// The face pointing towards negative Y
    Bottom = 3,

    /// The face pointing towards positive Z
    North = 4,

    /// The face pointing towards negative Z
    South = 5,
}

/// Corner offsets of each face's quad relative to the block's minimum corner.
///
/// Indexed by normal ID. The corners are listed counter-clockwise when the face
/// is viewed from outside the block, and the position within the list is the
/// UV-corner ID: 0 = (0,0), 1 = (1,0), 2 = (1,1), 3 = (0,1).
const FACE_CORNERS: [[[u8; 3]; 4]; 6] = [
    // East
    [[1, 0, 0], [1, 1, 0], [1, 1, 1], [1, 0, 1]],
    // West
    [[0, 0, 1], [0, 1, 1], [0, 1, 0], [0, 0, 0]],
    // Top
    [[0, 1, 0], [0, 1, 1], [1, 1, 1], [1, 1, 0]],
    // Bottom
    [[0, 0, 1], [0, 0, 0], [1, 0, 0], [1, 0, 1]],
    // North
    [[1, 0, 1], [1, 1, 1], [0, 1, 1], [0, 0, 1]],
    // South
    [[0, 0, 0], [0, 1, 0], [1, 1, 0], [1, 0, 0]],
];

impl BlockSide {
    /// Returns all six block faces in the order the mesher tests them.
    ///
    /// # Returns
    /// An array containing all `BlockSide` variants.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::North,
            BlockSide::South,
            BlockSide::East,
            BlockSide::West,
            BlockSide::Top,
            BlockSide::Bottom,
        ]
    }

    /// The normal ID stored in bits [18, 21) of a packed vertex.
    pub fn normal_id(self) -> u32 {
        self as u32
    }

    /// Looks a side up by its normal ID.
    pub fn from_normal_id(normal_id: u32) -> Option<BlockSide> {
        match normal_id {
            0 => Some(BlockSide::East),
            1 => Some(BlockSide::West),
            2 => Some(BlockSide::Top),
            3 => Some(BlockSide::Bottom),
            4 => Some(BlockSide::North),
            5 => Some(BlockSide::South),
            _ => None,
        }
    }

    /// Returns the offset from a block to the neighbour this face touches.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            BlockSide::East => Vector3::new(1, 0, 0),
            BlockSide::West => Vector3::new(-1, 0, 0),
            BlockSide::Top => Vector3::new(0, 1, 0),
            BlockSide::Bottom => Vector3::new(0, -1, 0),
            BlockSide::North => Vector3::new(0, 0, 1),
            BlockSide::South => Vector3::new(0, 0, -1),
        }
    }

    /// Returns the face on the other side of the block.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::East => BlockSide::West,
            BlockSide::West => BlockSide::East,
            BlockSide::Top => BlockSide::Bottom,
            BlockSide::Bottom => BlockSide::Top,
            BlockSide::North => BlockSide::South,
            BlockSide::South => BlockSide::North,
        }
    }

    /// Returns the four corner offsets of this face's quad.
    ///
    /// The corner at position `i` carries UV-corner ID `i`.
    pub fn corners(self) -> &'static [[u8; 3]; 4] {
        &FACE_CORNERS[self as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(side: BlockSide, index: usize) -> Vector3<i32> {
        let [x, y, z] = side.corners()[index];
        Vector3::new(x as i32, y as i32, z as i32)
    }

    #[test]
    fn test_normal_ids_are_distinct_and_reversible() {
        let mut seen = [false; 6];
        for side in BlockSide::all() {
            let id = side.normal_id() as usize;
            assert!(!seen[id]);
            seen[id] = true;
            assert_eq!(BlockSide::from_normal_id(side.normal_id()), Some(side));
        }
        assert_eq!(BlockSide::from_normal_id(6), None);
    }

    #[test]
    fn test_corners_wind_counter_clockwise_seen_from_outside() {
        for side in BlockSide::all() {
            let v0 = corner(side, 0);
            let first = (corner(side, 1) - v0).cross(corner(side, 2) - v0);
            let second = (corner(side, 2) - v0).cross(corner(side, 3) - v0);
            assert_eq!(first, side.offset(), "{side:?}");
            assert_eq!(second, side.offset(), "{side:?}");
        }
    }

    #[test]
    fn test_corners_lie_on_the_face_plane() {
        for side in BlockSide::all() {
            let normal = side.offset();
            let plane = if normal.x + normal.y + normal.z > 0 { 1 } else { 0 };
            for index in 0..4 {
                let c = corner(side, index);
                let distance = c.x * normal.x + c.y * normal.y + c.z * normal.z;
                assert_eq!(distance.abs(), plane, "{side:?}");
            }
        }
    }

    #[test]
    fn test_opposite_sides_cancel_offsets() {
        for side in BlockSide::all() {
            assert_eq!(side.offset() + side.opposite().offset(), Vector3::new(0, 0, 0));
            assert_eq!(side.opposite().opposite(), side);
        }
    }
}
