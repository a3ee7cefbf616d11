//! Error types for construction, move requests, search and perft.

use thiserror::Error;

use crate::moves::chess_move::Move;
use crate::position::chess_types::{Color, Square};
use crate::search::zobrist::KeyComponent;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("invalid board geometry {width}x{height}: each dimension must be within 1..={max}")]
    InvalidGeometry { width: u16, height: u16, max: u16 },
    #[error("setup holds {actual} squares but a {width}x{height} board needs {expected}")]
    SquareCountMismatch {
        width: u16,
        height: u16,
        expected: usize,
        actual: usize,
    },
    #[error("no {0:?} king on the board")]
    MissingKing(Color),
    #[error("{color:?} has {count} kings on the board")]
    DuplicateKing { color: Color, count: usize },
    #[error("{0:?} is in check but it is not their move")]
    OpponentInCheck(Color),
        #[error("en-passant target {0} is not an active empty square")]
    InvalidEnPassantSquare(Square),
    #[error("shared tables were built for {table_width}x{table_height}, board is {width}x{height}")]
    GeometryMismatch {
        width: u16,
        height: u16,
        table_width: u16,
        table_height: u16,
    },
}

/// Reasons a `(origin, target, promotion)` request does not become a move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveRejection {
    #[error("square {0} is off the board")]
    OffBoard(Square),
    #[error("square {0} is inactive")]
    InactiveSquare(Square),
    #[error("no piece on origin square {0}")]
    EmptyOrigin(Square),
    #[error("piece on {square} belongs to {owner:?}, not the side to move")]
    WrongSide { square: Square, owner: Color },
    #[error("no pseudo-legal move from {from} to {to}")]
    NoSuchMove { from: Square, to: Square },
    #[error("move from {from} to {to} requires a promotion piece")]
    PromotionRequired { from: Square, to: Square },
    #[error("move from {from} to {to} cannot promote")]
    UnexpectedPromotion { from: Square, to: Square },
    #[error("move from {from} to {to} leaves the king in check")]
    LeavesKingInCheck { from: Square, to: Square },
}

/// Incremental Zobrist key diverged from a from-scratch recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "zobrist mismatch after {mv:?}: incremental {incremental_key:#018x}, recomputed {recomputed_key:#018x}\n{}before:\n{board_before}\nafter:\n{board_after}",
    component_lines(.components)
)]
pub struct HashMismatch {
    pub mv: Move,
    pub board_before: String,
    pub board_after: String,
    pub incremental_key: u64,
    pub recomputed_key: u64,
    pub components: Vec<KeyComponent>,
}

fn component_lines(components: &[KeyComponent]) -> String {
    if components.is_empty() {
        return "difference does not match one or two key components\n".to_string();
    }
    components
        .iter()
        .map(|component| format!("mismatched component: {component}\n"))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("search depth must be at least 1, got {0}")]
    InvalidDepth(u8),
    #[error(transparent)]
    HashMismatch(#[from] Box<HashMismatch>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PerftError {
    #[error("state differs after unmaking {mv:?} at ply {ply}\nbefore:\n{before}\nafter:\n{after}")]
    UnmakeMismatch {
        mv: Move,
        ply: u8,
        before: String,
        after: String,
    },
    #[error(transparent)]
    HashMismatch(#[from] Box<HashMismatch>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("environment variable {key} has unparsable value {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Position(#[from] PositionError),
    #[error(transparent)]
    Rejected(#[from] MoveRejection),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::chess_types::{Piece, PieceKind};

    fn mismatch(components: Vec<KeyComponent>) -> HashMismatch {
        let pawn = Piece::new(PieceKind::Pawn, Color::White);
        HashMismatch {
            mv: Move::new(12, 28, pawn, Piece::EMPTY),
            board_before: "before-board".to_string(),
            board_after: "after-board".to_string(),
            incremental_key: 0x10,
            recomputed_key: 0x20,
            components,
        }
    }

    #[test]
    fn hash_mismatch_report_lists_components_and_boards() {
        let text = mismatch(vec![KeyComponent::SideToMove]).to_string();
        assert!(text.starts_with("zobrist mismatch after "));
        assert!(text.contains("incremental 0x0000000000000010, recomputed 0x0000000000000020"));
        assert!(text.contains(&format!("mismatched component: {}\n", KeyComponent::SideToMove)));
        assert!(text.ends_with("before:\nbefore-board\nafter:\nafter-board"));

        let unexplained = mismatch(Vec::new()).to_string();
        assert!(unexplained.contains("difference does not match one or two key components\n"));
    }

    #[test]
    fn boxed_mismatch_is_transparent_in_search_errors() {
        let inner = mismatch(Vec::new());
        let err = SearchError::from(Box::new(inner.clone()));
        assert_eq!(err.to_string(), inner.to_string());
    }
}
