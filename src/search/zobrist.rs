//! Zobrist hashing support for fast position identity.
//!
//! Keys are drawn from a seeded `StdRng`, so the same geometry and seed always
//! produce the same keys. That keeps hashes reproducible across runs, which
//! is useful for testing and debugging.

use std::collections::HashMap;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::moves::chess_move::square_name;
use crate::position::chess_types::*;
use crate::position::setup::Geometry;

pub const DEFAULT_ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

const PIECE_SLOTS: usize = 12;

/// One named contributor to a Zobrist key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyComponent {
    Piece { square: Square, piece: Piece },
    SideToMove,
    Castling(CastlingRights),
    EnPassantFile(u16),
}

impl fmt::Display for KeyComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyComponent::Piece { square, piece } => {
                write!(f, "piece '{}' on square {square}", piece.symbol())
            }
            KeyComponent::SideToMove => write!(f, "side to move"),
            KeyComponent::Castling(rights) => write!(f, "castling rights {rights:#06b}"),
            KeyComponent::EnPassantFile(file) => write!(f, "en-passant file {file}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ZobristKeys {
    geometry: Geometry,
    seed: u64,
    /// `[square * 12 + piece slot]`
    piece_square: Vec<u64>,
    side_to_move: u64,
    castling: [u64; 16],
    en_passant_file: Vec<u64>,
}

impl ZobristKeys {
    pub fn new(geometry: Geometry, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let piece_square = (0..geometry.square_count() * PIECE_SLOTS)
            .map(|_| rng.random::<u64>())
            .collect();
        let side_to_move = rng.random::<u64>();
        let mut castling = [0u64; 16];
        for key in &mut castling {
            *key = rng.random::<u64>();
        }
        let en_passant_file = (0..geometry.width()).map(|_| rng.random::<u64>()).collect();

        Self {
            geometry,
            seed,
            piece_square,
            side_to_move,
            castling,
            en_passant_file,
        }
    }

    pub fn with_default_seed(geometry: Geometry) -> Self {
        Self::new(geometry, DEFAULT_ZOBRIST_SEED)
    }

    #[inline]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Key for `piece` on `square`; zero for empty or inactive squares.
    #[inline]
    pub fn piece_key(&self, square: Square, piece: Piece) -> u64 {
        match piece.slot() {
            Some(slot) => self.piece_square[square as usize * PIECE_SLOTS + slot],
            None => 0,
        }
    }

    /// Side-to-move toggle key (xor in when black to move).
    #[inline]
    pub fn side_to_move_key(&self) -> u64 {
        self.side_to_move
    }

    #[inline]
    pub fn castling_key(&self, rights: CastlingRights) -> u64 {
        self.castling[(rights & CASTLE_ALL) as usize]
    }

    /// File key for an en-passant target; zero when there is none.
    #[inline]
    pub fn en_passant_key(&self, square: Option<Square>) -> u64 {
        match square {
            Some(sq) => self.en_passant_file[self.geometry.file_of(sq) as usize],
            None => 0,
        }
    }

    /// Full key from scratch.
    pub fn compute(
        &self,
        squares: &[Piece],
        side_to_move: Color,
        castling_rights: CastlingRights,
        en_passant: Option<Square>,
    ) -> u64 {
        let mut key = squares
            .iter()
            .enumerate()
            .fold(0u64, |acc, (sq, piece)| acc ^ self.piece_key(sq as Square, *piece));

        if side_to_move == Color::Black {
            key ^= self.side_to_move_key();
        }
        key ^= self.castling_key(castling_rights);
        key ^= self.en_passant_key(en_passant);
        key
    }

    fn components(&self) -> Vec<(u64, KeyComponent)> {
        let mut out = Vec::with_capacity(self.piece_square.len() + 17 + self.en_passant_file.len());
        for square in 0..self.geometry.square_count() as Square {
            for color in Color::ALL {
                for kind in PieceKind::ALL {
                    let piece = Piece::new(kind, color);
                    out.push((self.piece_key(square, piece), KeyComponent::Piece { square, piece }));
                }
            }
        }
        out.push((self.side_to_move, KeyComponent::SideToMove));
        for (rights, key) in self.castling.iter().enumerate() {
            out.push((*key, KeyComponent::Castling(rights as CastlingRights)));
        }
        for (file, key) in self.en_passant_file.iter().enumerate() {
            out.push((*key, KeyComponent::EnPassantFile(file as u16)));
        }
        out
    }

    /// Name the one or two key components whose xor equals `diff`.
    ///
    /// Returns an empty list when `diff` is zero or needs more than two
    /// components to explain.
    pub fn describe_difference(&self, diff: u64) -> Vec<KeyComponent> {
        if diff == 0 {
            return Vec::new();
        }
        let components = self.components();
        let by_key: HashMap<u64, KeyComponent> =
            components.iter().map(|(key, c)| (*key, *c)).collect();

        if let Some(single) = by_key.get(&diff) {
            return vec![*single];
        }
        for (key, component) in &components {
            if let Some(other) = by_key.get(&(diff ^ key)) {
                if other != component {
                    return vec![*component, *other];
                }
            }
        }
        Vec::new()
    }

    /// Human-readable report of a key difference.
    pub fn describe_difference_text(&self, diff: u64) -> String {
        let components = self.describe_difference(diff);
        if components.is_empty() {
            return format!("unexplained difference {diff:#018x}");
        }
        components
            .iter()
            .map(|c| match c {
                KeyComponent::Piece { square, piece } => format!(
                    "piece '{}' on {}",
                    piece.symbol(),
                    square_name(*square, self.geometry.width())
                ),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
