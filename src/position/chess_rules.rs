//! Rule constants and geometry-dependent pawn rules.

use crate::position::chess_types::*;
use crate::position::setup::Geometry;

pub const STANDARD_WIDTH: u16 = 8;
pub const STANDARD_HEIGHT: u16 = 8;

/// Back-rank order of the standard initial array, file a to h.
pub const STANDARD_BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Minimum file distance between king and castling rook.
pub const MIN_CASTLING_ROOK_DISTANCE: i32 = 3;

/// Rank delta of a pawn step for `color`.
#[inline]
pub const fn pawn_rank_step(color: Color) -> i32 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

/// Rank from which pawns of `color` may double-push.
#[inline]
pub const fn double_push_rank(color: Color, geometry: Geometry) -> u16 {
    match color {
        Color::White => 1,
        Color::Black => geometry.height().saturating_sub(2),
    }
}

/// Square one pawn step forward of `square`, if it exists.
#[inline]
pub fn pawn_forward(geometry: Geometry, square: Square, color: Color) -> Option<Square> {
    geometry.checked_square(
        geometry.file_of(square) as i32,
        geometry.rank_of(square) as i32 + pawn_rank_step(color),
    )
}

/// A pawn arriving on `square` promotes when it can never step further:
/// the next square forward is off the board or inactive.
#[inline]
pub fn is_promotion_square(
    geometry: Geometry,
    squares: &[Piece],
    square: Square,
    color: Color,
) -> bool {
    match pawn_forward(geometry, square, color) {
        None => true,
        Some(next) => !squares[next as usize].is_active(),
    }
}
