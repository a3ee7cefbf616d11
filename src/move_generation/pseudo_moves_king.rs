//! King steps plus generalized castling.
//!
//! Castling needs the right to be held, the recorded rook to still stand on
//! its square and every square strictly between king and rook to be empty.
//! Attacked transit squares are rejected later by `Position::make_move`.

use crate::move_generation::move_generator::step_move;
use crate::moves::chess_move::{Move, FLAG_CASTLING};
use crate::position::chess_types::*;
use crate::position::position::Position;

pub fn generate_king_moves(position: &Position, from: Square, out: &mut Vec<Move>) {
    let moved = position.piece_at(from);
    for &to in position.tables().king_targets(from) {
        if let Some(mv) = step_move(position, from, to, moved) {
            out.push(mv);
        }
    }
    generate_castling_moves(position, from, moved, out);
}

fn generate_castling_moves(position: &Position, king: Square, moved: Piece, out: &mut Vec<Move>) {
    let color = position.side_to_move();
    let rook = Piece::new(PieceKind::Rook, color);

    for side in CastleSide::ALL {
        let Some(rook_square) = position.castling_rook(color, side) else {
            continue;
        };
        if position.piece_at(rook_square) != rook {
            continue;
        }
        let Some(path) = position.squares_between(king, rook_square) else {
            continue;
        };
        let inner = &path[1..path.len() - 1];
        if !inner.iter().all(|sq| position.piece_at(*sq).is_empty()) {
            continue;
        }
        let to = match side {
            CastleSide::King => king + 2,
            CastleSide::Queen => king - 2,
        };
        out.push(Move::new(king, to, moved, Piece::EMPTY).with_flags(FLAG_CASTLING));
    }
}
