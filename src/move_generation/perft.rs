//! Perft node counting for move generator verification.
//!
//! Every variant walks the tree in place with make/unmake. `perft_strict`
//! additionally snapshots the position around each move and turns on the
//! Zobrist self-check, so a generator or make/unmake bug surfaces as a typed
//! error at the ply where it happens instead of as a wrong total.

use std::fmt;

use tracing::debug;

use crate::errors::PerftError;
use crate::move_generation::move_generator::{generate_pseudo_moves, has_legal_move};
use crate::moves::chess_move::Move;
use crate::position::position::{Position, PositionSnapshot};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

/// Leaf count of the legal move tree to `depth`.
pub fn perft(position: &mut Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut moves = Vec::with_capacity(64);
    generate_pseudo_moves(position, &mut moves);

    let mut nodes = 0;
    for mv in &moves {
        let Some(undo) = position.make_move(mv) else {
            continue;
        };
        nodes += if depth == 1 { 1 } else { perft(position, depth - 1) };
        position.unmake_move(mv, undo);
    }
    nodes
}

/// Leaf count plus per-leaf move classification.
pub fn perft_counts(position: &mut Position, depth: u8) -> PerftCounts {
    if depth == 0 {
        return PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };
    }
    let mut total = PerftCounts::default();
    let mut scratch = Vec::with_capacity(64);
    counts_recurse(position, depth, &mut total, &mut scratch);
    total
}

fn counts_recurse(
    position: &mut Position,
    depth: u8,
    counts: &mut PerftCounts,
    scratch: &mut Vec<Move>,
) {
    let mut moves = Vec::with_capacity(64);
    generate_pseudo_moves(position, &mut moves);

    for mv in &moves {
        let Some(undo) = position.make_move(mv) else {
            continue;
        };
        if depth == 1 {
            counts.nodes += 1;
            if mv.is_capture() {
                counts.captures += 1;
            }
            if mv.is_en_passant() {
                counts.en_passant += 1;
            }
            if mv.is_castling() {
                counts.castles += 1;
            }
            if mv.is_promotion() {
                counts.promotions += 1;
            }
            let defender = position.side_to_move();
            if position.is_king_in_check(defender) {
                counts.checks += 1;
                if !has_legal_move(position, scratch) {
                    counts.checkmates += 1;
                }
            }
        } else {
            let mut child = PerftCounts::default();
            counts_recurse(position, depth - 1, &mut child, scratch);
            counts.merge(child);
        }
        position.unmake_move(mv, undo);
    }
}

/// Per-root-move leaf counts, sorted by origin then target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerftReport {
    pub entries: Vec<(Move, u64)>,
    pub total: u64,
    width: u16,
}

impl fmt::Display for PerftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (mv, nodes) in &self.entries {
            writeln!(f, "{}: {}", mv.display(self.width), nodes)?;
        }
        writeln!(f)?;
        write!(f, "Nodes searched: {}", self.total)
    }
}

pub fn perft_divide(position: &mut Position, depth: u8) -> PerftReport {
    let mut moves = Vec::with_capacity(64);
    generate_pseudo_moves(position, &mut moves);

    let mut entries = Vec::with_capacity(moves.len());
    for mv in moves {
        let Some(undo) = position.make_move(&mv) else {
            continue;
        };
        let nodes = perft(position, depth.saturating_sub(1));
        position.unmake_move(&mv, undo);
        entries.push((mv, nodes));
    }
    entries.sort_by_key(|(mv, _)| (mv.from, mv.to));

    let total = if depth == 0 {
        1
    } else {
        entries.iter().map(|(_, n)| n).sum()
    };
    debug!(depth, moves = entries.len(), total, "perft divide");
    PerftReport {
        entries,
        total,
        width: position.width(),
    }
}

/// `perft` with full-state comparison around every move and the incremental
/// hash checked against a recomputation after every make.
pub fn perft_strict(position: &mut Position, depth: u8) -> Result<u64, PerftError> {
    let previous = position.hash_verification();
    position.set_hash_verification(true);
    let outcome = strict_recurse(position, depth, 0);
    position.set_hash_verification(previous);
    outcome
}

fn strict_recurse(position: &mut Position, depth: u8, ply: u8) -> Result<u64, PerftError> {
    if depth == 0 {
        return Ok(1);
    }
    let mut moves = Vec::with_capacity(64);
    generate_pseudo_moves(position, &mut moves);

    let mut nodes = 0;
    for mv in &moves {
        let before = position.snapshot();
        let Some(undo) = position.try_make_move(mv)? else {
            if position.snapshot() != before {
                return Err(unmake_mismatch(mv, ply, &before, position));
            }
            continue;
        };
        let below = strict_recurse(position, depth - 1, ply + 1);
        position.unmake_move(mv, undo);
        nodes += below?;
        if position.snapshot() != before {
            return Err(unmake_mismatch(mv, ply, &before, position));
        }
    }
    Ok(nodes)
}

fn unmake_mismatch(
    mv: &Move,
    ply: u8,
    before: &PositionSnapshot,
    position: &Position,
) -> PerftError {
    PerftError::UnmakeMismatch {
        mv: *mv,
        ply,
        before: format!("{before:?}"),
        after: format!("{:?}", position.snapshot()),
    }
}
