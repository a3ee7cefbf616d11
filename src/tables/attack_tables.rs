//! Precomputed per-geometry lookup tables for move generation and attack
//! detection.
//!
//! Everything here depends only on the board's width and height, so one set
//! of tables is built per geometry and shared read-only through `Arc`.
//! Targets that would wrap around a board edge are excluded at build time by
//! working in file/rank coordinates, so generators never do boundary
//! arithmetic on the hot path.

use crate::position::chess_types::*;
use crate::position::setup::Geometry;

pub const DIRECTION_COUNT: usize = 8;

pub const NORTH: usize = 0;
pub const NORTH_EAST: usize = 1;
pub const EAST: usize = 2;
pub const SOUTH_EAST: usize = 3;
pub const SOUTH: usize = 4;
pub const SOUTH_WEST: usize = 5;
pub const WEST: usize = 6;
pub const NORTH_WEST: usize = 7;

pub const ORTHOGONAL_DIRECTIONS: [usize; 4] = [NORTH, EAST, SOUTH, WEST];
pub const DIAGONAL_DIRECTIONS: [usize; 4] = [NORTH_EAST, SOUTH_EAST, SOUTH_WEST, NORTH_WEST];
pub const ALL_DIRECTIONS: [usize; DIRECTION_COUNT] = [
    NORTH, NORTH_EAST, EAST, SOUTH_EAST, SOUTH, SOUTH_WEST, WEST, NORTH_WEST,
];

/// `(file, rank)` delta per direction index.
const DIRECTION_DELTAS: [(i32, i32); DIRECTION_COUNT] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const KNIGHT_DELTAS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

#[inline]
pub const fn is_diagonal(direction: usize) -> bool {
    direction % 2 == 1
}

/// Slice bounds into one of the flat target arrays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetRange {
    pub start: u32,
    pub count: u8,
}

/// Flat target array plus one `(start, count)` range per square.
#[derive(Debug, Clone, Default)]
struct TargetTable {
    targets: Vec<Square>,
    ranges: Vec<TargetRange>,
}

impl TargetTable {
    fn build(geometry: Geometry, deltas: &[(i32, i32)]) -> Self {
        let mut table = TargetTable {
            targets: Vec::new(),
            ranges: Vec::with_capacity(geometry.square_count()),
        };
        for square in 0..geometry.square_count() as Square {
            let file = geometry.file_of(square) as i32;
            let rank = geometry.rank_of(square) as i32;
            let start = table.targets.len() as u32;
            for (df, dr) in deltas {
                if let Some(target) = geometry.checked_square(file + df, rank + dr) {
                    table.targets.push(target);
                }
            }
            let count = (table.targets.len() as u32 - start) as u8;
            table.ranges.push(TargetRange { start, count });
        }
        table
    }

    #[inline]
    fn get(&self, square: Square) -> &[Square] {
        match self.ranges.get(square as usize) {
            Some(range) => {
                let start = range.start as usize;
                &self.targets[start..start + range.count as usize]
            }
            None => &[],
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttackTables {
    geometry: Geometry,
    direction_offsets: [i32; DIRECTION_COUNT],
    /// `[square * 8 + direction]`
    edge_distance: Vec<u8>,
    knight: TargetTable,
    king: TargetTable,
    /// Diagonal-forward capture targets, indexed by pawn color.
    pawn_captures: [TargetTable; 2],
}

impl AttackTables {
    pub fn new(geometry: Geometry) -> Self {
        let width = geometry.width() as i32;
        let mut direction_offsets = [0i32; DIRECTION_COUNT];
        for (dir, (df, dr)) in DIRECTION_DELTAS.iter().enumerate() {
            direction_offsets[dir] = dr * width + df;
        }

        let mut edge_distance = vec![0u8; geometry.square_count() * DIRECTION_COUNT];
        for square in 0..geometry.square_count() as Square {
            let file = geometry.file_of(square) as i32;
            let rank = geometry.rank_of(square) as i32;
            let to_east = geometry.width() as i32 - 1 - file;
            let to_north = geometry.height() as i32 - 1 - rank;
            for (dir, (df, dr)) in DIRECTION_DELTAS.iter().enumerate() {
                let file_room = match df {
                    1 => to_east,
                    -1 => file,
                    _ => i32::MAX,
                };
                let rank_room = match dr {
                    1 => to_north,
                    -1 => rank,
                    _ => i32::MAX,
                };
                edge_distance[square as usize * DIRECTION_COUNT + dir] =
                    file_room.min(rank_room) as u8;
            }
        }

        let king_deltas = DIRECTION_DELTAS;
        let pawn_captures = [
            TargetTable::build(geometry, &[(-1, 1), (1, 1)]),
            TargetTable::build(geometry, &[(-1, -1), (1, -1)]),
        ];

        Self {
            geometry,
            direction_offsets,
            edge_distance,
            knight: TargetTable::build(geometry, &KNIGHT_DELTAS),
            king: TargetTable::build(geometry, &king_deltas),
            pawn_captures,
        }
    }

    #[inline]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[inline]
    pub fn direction_offset(&self, direction: usize) -> i32 {
        self.direction_offsets[direction]
    }

    /// Steps available from `square` in `direction` before leaving the board.
    #[inline]
    pub fn edge_distance(&self, square: Square, direction: usize) -> u8 {
        self.edge_distance[square as usize * DIRECTION_COUNT + direction]
    }

    /// Squares along a ray, nearest first, up to the board edge. Callers stop
    /// at the first occupied or inactive square.
    #[inline]
    pub fn ray(&self, square: Square, direction: usize) -> impl Iterator<Item = Square> {
        let offset = self.direction_offset(direction);
        let steps = self.edge_distance(square, direction) as i32;
        let origin = square as i32;
        (1..=steps).map(move |n| (origin + offset * n) as Square)
    }

    #[inline]
    pub fn knight_targets(&self, square: Square) -> &[Square] {
        self.knight.get(square)
    }

    #[inline]
    pub fn king_targets(&self, square: Square) -> &[Square] {
        self.king.get(square)
    }

    /// Squares a pawn of `color` standing on `square` captures onto.
    #[inline]
    pub fn pawn_captures(&self, color: Color, square: Square) -> &[Square] {
        self.pawn_captures[color.index()].get(square)
    }

    /// `(start, count)` of the knight range for `square`.
    #[inline]
    pub fn knight_range(&self, square: Square) -> TargetRange {
        self.knight.ranges[square as usize]
    }

    #[inline]
    pub fn king_range(&self, square: Square) -> TargetRange {
        self.king.ranges[square as usize]
    }
}
