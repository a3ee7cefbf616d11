//! Crate root module declarations for the Poly Chess engine core.
//!
//! This file exposes the board model (variable geometry with inactive
//! squares), the precomputed attack tables, move generation and perft,
//! and the search stack so binaries, benches and integration tests can
//! import stable module paths.

pub mod position {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod make_move;
    pub mod position;
    pub mod setup;
    pub mod undo_state;
}

pub mod tables {
    pub mod attack_tables;
}

pub mod moves {
    pub mod chess_move;
}

pub mod move_generation {
    pub mod move_generator;
    pub mod move_request;
    pub mod perft;
    pub mod pseudo_moves_king;
    pub mod pseudo_moves_knight;
    pub mod pseudo_moves_pawn;
    pub mod pseudo_moves_sliders;
}

pub mod search {
    pub mod board_scoring;
    pub mod iterative_deepening;
    pub mod move_buffers;
    pub mod move_ordering;
    pub mod transposition_table;
    pub mod zobrist;
}

pub mod config;
pub mod engine;
pub mod errors;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
