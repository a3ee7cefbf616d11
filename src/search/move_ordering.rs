//! Lazy move ordering for alpha-beta.
//!
//! Every move gets a score up front; `next_move` then does a single selection
//! sort step, so nodes that cut off early never pay for a full sort.

use crate::moves::chess_move::Move;
use crate::position::chess_types::*;
use crate::search::move_buffers::PlyBuffer;

pub const TT_MOVE_SCORE: i32 = 2_000_000;
pub const CAPTURE_BASE_SCORE: i32 = 1_000_000;
pub const QUIET_MOVE_SCORE: i32 = 1_000_000;

/// Coarse piece values used only for MVV-LVA.
#[inline]
pub const fn ordering_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 1,
        PieceKind::Knight | PieceKind::Bishop => 3,
        PieceKind::Rook => 5,
        PieceKind::Queen => 9,
        PieceKind::King => 10,
    }
}

pub fn score_move(mv: &Move, tt_move: Option<Move>) -> i32 {
    if tt_move == Some(*mv) {
        return TT_MOVE_SCORE;
    }
    match (mv.captured.kind(), mv.moved.kind()) {
        (Some(victim), Some(attacker)) => {
            CAPTURE_BASE_SCORE + ordering_value(victim) * 100 - ordering_value(attacker)
        }
        _ => QUIET_MOVE_SCORE,
    }
}

pub struct MoveOrderer<'a> {
    moves: &'a mut [Move],
    scores: &'a mut [i32],
    next: usize,
}

impl<'a> MoveOrderer<'a> {
    /// Score the moves already sitting in `buffer`.
    pub fn new(buffer: &'a mut PlyBuffer, tt_move: Option<Move>) -> Self {
        let PlyBuffer { moves, scores } = buffer;
        scores.clear();
        scores.extend(moves.iter().map(|mv| score_move(mv, tt_move)));
        Self {
            moves: moves.as_mut_slice(),
            scores: scores.as_mut_slice(),
            next: 0,
        }
    }

    pub fn next_move(&mut self) -> Option<Move> {
        let start = self.next;
        if start >= self.moves.len() {
            return None;
        }
        let mut best = start;
        for i in start + 1..self.moves.len() {
            if self.scores[i] > self.scores[best] {
                best = i;
            }
        }
        self.moves.swap(start, best);
        self.scores.swap(start, best);
        self.next += 1;
        Some(self.moves[start])
    }

    pub fn remaining(&self) -> usize {
        self.moves.len() - self.next
    }
}

impl Iterator for MoveOrderer<'_> {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        self.next_move()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}
