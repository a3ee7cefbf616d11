//! Core incremental board state representation.
//!
//! `Position` owns the square array and all derived state that make/unmake
//! keeps in sync: side and castling flags, clocks, cached king and
//! castling-rook squares and the incremental Zobrist key. Geometry-dependent
//! tables are shared through `Arc` so many positions of the same board
//! size reuse one copy.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::errors::PositionError;
use crate::position::chess_rules::MIN_CASTLING_ROOK_DISTANCE;
use crate::position::chess_types::*;
use crate::position::setup::{BoardSetup, Geometry};
use crate::search::zobrist::{ZobristKeys, DEFAULT_ZOBRIST_SEED};
use crate::tables::attack_tables::{is_diagonal, AttackTables, DIRECTION_COUNT};

#[derive(Debug, Clone)]
pub struct Position {
    // --- Board ---
    pub(crate) geometry: Geometry,
    pub(crate) squares: Vec<Piece>,

    // --- Side and state flags ---
    pub(crate) side_to_move: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant_square: Option<Square>,

    // --- Clocks / move counters ---
    pub(crate) halfmove_clock: u16,
    pub(crate) fullmove_number: u16,

    // --- Caches ---
    // [color]
    pub(crate) king_squares: [Square; 2],
    // [color][castle side], fixed at construction
    pub(crate) castling_rooks: [[Option<Square>; 2]; 2],

    // --- Incremental hashing ---
    pub(crate) zobrist_key: u64,
    pub(crate) verify_hash: bool,

    // --- Shared geometry tables ---
    pub(crate) tables: Arc<AttackTables>,
    pub(crate) keys: Arc<ZobristKeys>,
}

/// Comparable copy of every mutable field, used by round-trip checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionSnapshot {
    pub squares: Vec<Piece>,
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
    pub king_squares: [Square; 2],
    pub zobrist_key: u64,
}

impl Position {
    /// Build a position with freshly built tables and default-seeded keys.
    pub fn from_setup(setup: &BoardSetup) -> Result<Self, PositionError> {
        let geometry = Geometry::new(setup.width, setup.height)?;
        let tables = Arc::new(AttackTables::new(geometry));
        let keys = Arc::new(ZobristKeys::new(geometry, DEFAULT_ZOBRIST_SEED));
        Self::with_tables(setup, tables, keys)
    }

    /// Build a position reusing tables shared with other positions.
    pub fn with_tables(
        setup: &BoardSetup,
        tables: Arc<AttackTables>,
        keys: Arc<ZobristKeys>,
    ) -> Result<Self, PositionError> {
        let geometry = Geometry::new(setup.width, setup.height)?;
        for shared in [tables.geometry(), keys.geometry()] {
            if shared != geometry {
                return Err(PositionError::GeometryMismatch {
                    width: geometry.width(),
                    height: geometry.height(),
                    table_width: shared.width(),
                    table_height: shared.height(),
                });
            }
        }

        if setup.squares.len() != geometry.square_count() {
            return Err(PositionError::SquareCountMismatch {
                width: geometry.width(),
                height: geometry.height(),
                expected: geometry.square_count(),
                actual: setup.squares.len(),
            });
        }

        let mut king_squares = [0 as Square; 2];
        for color in Color::ALL {
            let king = Piece::new(PieceKind::King, color);
            let found: Vec<Square> = setup
                .squares
                .iter()
                .enumerate()
                .filter(|(_, p)| **p == king)
                .map(|(sq, _)| sq as Square)
                .collect();
            match found.as_slice() {
                [] => return Err(PositionError::MissingKing(color)),
                [sq] => king_squares[color.index()] = *sq,
                many => {
                    return Err(PositionError::DuplicateKing {
                        color,
                        count: many.len(),
                    })
                }
            }
        }

        if let Some(ep) = setup.en_passant {
            let valid = setup.squares.get(ep as usize).is_some_and(|p| p.is_empty());
            if !valid {
                return Err(PositionError::InvalidEnPassantSquare(ep));
            }
        }

        let mut castling_rights = setup.castling_rights();
        let mut castling_rooks = [[None; 2]; 2];
        for color in Color::ALL {
            for side in CastleSide::ALL {
                let flag = castling_flag(color, side);
                if castling_rights & flag == 0 {
                    continue;
                }
                let rook = discover_castling_rook(
                    geometry,
                    &setup.squares,
                    king_squares[color.index()],
                    color,
                    side,
                );
                match rook {
                    Some(sq) => castling_rooks[color.index()][side.index()] = Some(sq),
                    None => {
                        debug!(?color, ?side, "castling right revoked: no rook found outward from king");
                        castling_rights &= !flag;
                    }
                }
            }
        }

        let zobrist_key = keys.compute(
            &setup.squares,
            setup.side_to_move,
            castling_rights,
            setup.en_passant,
        );

        let position = Self {
            geometry,
            squares: setup.squares.clone(),
            side_to_move: setup.side_to_move,
            castling_rights,
            en_passant_square: setup.en_passant,
            halfmove_clock: setup.halfmove_clock,
            fullmove_number: setup.fullmove_number,
            king_squares,
            castling_rooks,
            zobrist_key,
            verify_hash: false,
            tables,
            keys,
        };

        // The side that just moved may not be left in check.
        let waiting = setup.side_to_move.opposite();
        if position.is_square_attacked(position.king_squares[waiting.index()], setup.side_to_move) {
            return Err(PositionError::OpponentInCheck(waiting));
        }

        debug!(
            width = geometry.width(),
            height = geometry.height(),
            castling_rights,
            zobrist_key,
            "position constructed"
        );
        Ok(position)
    }

    /// Standard 8x8 initial position.
    pub fn standard() -> Result<Self, PositionError> {
        Self::from_setup(&BoardSetup::standard())
    }

    // --- Accessors ---

    #[inline]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.geometry.width()
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.geometry.height()
    }

    #[inline]
    pub fn squares(&self) -> &[Piece] {
        &self.squares
    }

    /// Content of `square`; off-board squares read as inactive.
    #[inline]
    pub fn piece_at(&self, square: Square) -> Piece {
        self.squares
            .get(square as usize)
            .copied()
            .unwrap_or(Piece::INACTIVE)
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    pub fn can_castle(&self, color: Color, side: CastleSide) -> bool {
        self.castling_rights & castling_flag(color, side) != 0
    }

    /// Recorded castling rook for a side whose right is still held.
    #[inline]
    pub fn castling_rook(&self, color: Color, side: CastleSide) -> Option<Square> {
        if self.can_castle(color, side) {
            self.castling_rooks[color.index()][side.index()]
        } else {
            None
        }
    }

    #[inline]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color.index()]
    }

    #[inline]
    pub fn zobrist_key(&self) -> u64 {
        self.zobrist_key
    }

    #[inline]
    pub fn tables(&self) -> &AttackTables {
        &self.tables
    }

    #[inline]
    pub fn shared_tables(&self) -> Arc<AttackTables> {
        Arc::clone(&self.tables)
    }

    #[inline]
    pub fn zobrist_keys(&self) -> Arc<ZobristKeys> {
        Arc::clone(&self.keys)
    }

    /// Squares holding pieces of `color`.
    pub fn squares_of(&self, color: Color) -> impl Iterator<Item = Square> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.is_color(color))
            .map(|(sq, _)| sq as Square)
    }

    // --- Queries ---

    pub fn compute_zobrist_key(&self) -> u64 {
        self.keys.compute(
            &self.squares,
            self.side_to_move,
            self.castling_rights,
            self.en_passant_square,
        )
    }

    pub fn snapshot(&self) -> PositionSnapshot {
        PositionSnapshot {
            squares: self.squares.clone(),
            side_to_move: self.side_to_move,
            castling_rights: self.castling_rights,
            en_passant_square: self.en_passant_square,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            king_squares: self.king_squares,
            zobrist_key: self.zobrist_key,
        }
    }

    #[inline]
    pub fn is_king_in_check(&self, color: Color) -> bool {
        self.is_square_attacked(self.king_squares[color.index()], color.opposite())
    }

    /// Whether any piece of `attacker` attacks `square`. Inactive squares are
    /// never attacked.
    pub fn is_square_attacked(&self, square: Square, attacker: Color) -> bool {
        if !self.piece_at(square).is_active() {
            return false;
        }
        let tables = &*self.tables;

        // A pawn of `attacker` hits `square` from where an opposite-colored
        // pawn on `square` would capture.
        let pawn = Piece::new(PieceKind::Pawn, attacker);
        if tables
            .pawn_captures(attacker.opposite(), square)
            .iter()
            .any(|sq| self.squares[*sq as usize] == pawn)
        {
            return true;
        }

        let knight = Piece::new(PieceKind::Knight, attacker);
        if tables
            .knight_targets(square)
            .iter()
            .any(|sq| self.squares[*sq as usize] == knight)
        {
            return true;
        }

        let king = Piece::new(PieceKind::King, attacker);
        if tables
            .king_targets(square)
            .iter()
            .any(|sq| self.squares[*sq as usize] == king)
        {
            return true;
        }

        for direction in 0..DIRECTION_COUNT {
            let slider = if is_diagonal(direction) {
                PieceKind::Bishop
            } else {
                PieceKind::Rook
            };
            for sq in tables.ray(square, direction) {
                let piece = self.squares[sq as usize];
                if piece.is_empty() {
                    continue;
                }
                if piece.is_color(attacker)
                    && (piece.is_kind(slider) || piece.is_kind(PieceKind::Queen))
                {
                    return true;
                }
                break;
            }
        }

        false
    }

    /// Inclusive straight-line squares from `a` to `b` along a rank, file or
    /// diagonal; `None` when the two squares are not aligned.
    pub fn squares_between(&self, a: Square, b: Square) -> Option<Vec<Square>> {
        let g = self.geometry;
        if a as usize >= g.square_count() || b as usize >= g.square_count() {
            return None;
        }
        let df = g.file_of(b) as i32 - g.file_of(a) as i32;
        let dr = g.rank_of(b) as i32 - g.rank_of(a) as i32;
        if df != 0 && dr != 0 && df.abs() != dr.abs() {
            return None;
        }
        let steps = df.abs().max(dr.abs());
        let (sf, sr) = (df.signum(), dr.signum());
        let (fa, ra) = (g.file_of(a) as i32, g.rank_of(a) as i32);
        Some(
            (0..=steps)
                .filter_map(|n| g.checked_square(fa + sf * n, ra + sr * n))
                .collect(),
        )
    }

    // --- Hash self-check ---

    /// Enable or disable the from-scratch hash comparison in `try_make_move`.
    pub fn set_hash_verification(&mut self, enabled: bool) {
        self.verify_hash = enabled;
    }

    #[inline]
    pub fn hash_verification(&self) -> bool {
        self.verify_hash
    }
}

/// Scan from the king toward `side`'s edge for the nearest own rook. An
/// inactive square before it, or a rook too close for the king's two-file
/// step, means no castling rook.
fn discover_castling_rook(
    geometry: Geometry,
    squares: &[Piece],
    king: Square,
    color: Color,
    side: CastleSide,
) -> Option<Square> {
    let rank = geometry.rank_of(king) as i32;
    let king_file = geometry.file_of(king) as i32;
    let step = side.file_step();
    let rook = Piece::new(PieceKind::Rook, color);

    let mut file = king_file + step;
    while let Some(sq) = geometry.checked_square(file, rank) {
        let piece = squares[sq as usize];
        if !piece.is_active() {
            return None;
        }
        if piece == rook {
            let far_enough = (file - king_file).abs() >= MIN_CASTLING_ROOK_DISTANCE;
            return far_enough.then_some(sq);
        }
        file += step;
    }
    None
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = self.geometry;
        for rank in (0..g.height()).rev() {
            write!(f, "{:>2} ", rank + 1)?;
            for file in 0..g.width() {
                write!(f, "{}", self.squares[g.square_at(file, rank) as usize].symbol())?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for file in 0..g.width() {
            let letter = if file < 26 {
                char::from(b'a' + file as u8)
            } else {
                char::from(b'A' + (file - 26) as u8)
            };
            write!(f, "{letter}")?;
        }
        writeln!(f)?;
        write!(
            f,
            "side={:?} castling={:#06b} ep={:?} halfmove={} fullmove={} key={:#018x}",
            self.side_to_move,
            self.castling_rights,
            self.en_passant_square,
            self.halfmove_clock,
            self.fullmove_number,
            self.zobrist_key
        )
    }
}
