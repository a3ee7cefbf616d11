//! Ray-walking generation for bishops, rooks and queens.

use crate::moves::chess_move::Move;
use crate::position::chess_types::*;
use crate::position::position::Position;

/// Walk each direction until the edge, an inactive square or a piece; an
/// enemy piece ends the ray with a capture.
pub fn generate_sliding_moves(
    position: &Position,
    from: Square,
    directions: &[usize],
    out: &mut Vec<Move>,
) {
    let side = position.side_to_move();
    let moved = position.piece_at(from);
    let tables = position.tables();

    for &direction in directions {
        for to in tables.ray(from, direction) {
            let target = position.piece_at(to);
            if target.is_empty() {
                out.push(Move::new(from, to, moved, Piece::EMPTY));
                continue;
            }
            if target.is_occupied() && !target.is_color(side) {
                out.push(Move::new(from, to, moved, target));
            }
            break;
        }
    }
}
