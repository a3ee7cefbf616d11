//! Pawn pushes, captures, en passant and promotion expansion.

use crate::moves::chess_move::{Move, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT};
use crate::position::chess_rules::{double_push_rank, is_promotion_square, pawn_forward};
use crate::position::chess_types::*;
use crate::position::position::Position;

pub fn generate_pawn_moves(position: &Position, from: Square, out: &mut Vec<Move>) {
    let color = position.side_to_move();
    let geometry = position.geometry();
    let pawn = position.piece_at(from);

    if let Some(one) = pawn_forward(geometry, from, color) {
        if position.piece_at(one).is_empty() {
            push_pawn_move(position, Move::new(from, one, pawn, Piece::EMPTY), out);

            if geometry.rank_of(from) == double_push_rank(color, geometry) {
                if let Some(two) = pawn_forward(geometry, one, color) {
                    if position.piece_at(two).is_empty() {
                        push_pawn_move(
                            position,
                            Move::new(from, two, pawn, Piece::EMPTY)
                                .with_flags(FLAG_DOUBLE_PAWN_PUSH),
                            out,
                        );
                    }
                }
            }
        }
    }

    let en_passant = position.en_passant_square();
    let enemy_pawn = Piece::new(PieceKind::Pawn, color.opposite());
    for &to in position.tables().pawn_captures(color, from) {
        let target = position.piece_at(to);
        if target.is_occupied() {
            if !target.is_color(color) {
                push_pawn_move(position, Move::new(from, to, pawn, target), out);
            }
            continue;
        }
        if en_passant == Some(to) && target.is_empty() {
            let victim = match color {
                Color::White => to - geometry.width(),
                Color::Black => to + geometry.width(),
            };
            if position.piece_at(victim) == enemy_pawn {
                out.push(Move::new(from, to, pawn, enemy_pawn).with_flags(FLAG_EN_PASSANT));
            }
        }
    }
}

/// Push `mv`, expanding it into four promotions when it reaches a square the
/// pawn cannot advance beyond.
fn push_pawn_move(position: &Position, mv: Move, out: &mut Vec<Move>) {
    let color = position.side_to_move();
    if is_promotion_square(position.geometry(), position.squares(), mv.to, color) {
        for kind in PieceKind::PROMOTIONS {
            out.push(mv.with_promotion(kind));
        }
    } else {
        out.push(mv);
    }
}
