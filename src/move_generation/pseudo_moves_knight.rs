use crate::move_generation::move_generator::step_move;
use crate::moves::chess_move::Move;
use crate::position::chess_types::*;
use crate::position::position::Position;

pub fn generate_knight_moves(position: &Position, from: Square, out: &mut Vec<Move>) {
    let moved = position.piece_at(from);
    for &to in position.tables().knight_targets(from) {
        if let Some(mv) = step_move(position, from, to, moved) {
            out.push(mv);
        }
    }
}
