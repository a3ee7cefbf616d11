//! Caller-facing move requests.
//!
//! Callers name only origin, target and an optional promotion kind. Castling,
//! en passant and double-push flags come from the matching generated move,
//! never from the caller.

use crate::errors::MoveRejection;
use crate::move_generation::move_generator::generate_pseudo_moves;
use crate::moves::chess_move::Move;
use crate::position::chess_types::*;
use crate::position::position::Position;
use crate::position::undo_state::UndoState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub origin: Square,
    pub target: Square,
    pub promotion: Option<PieceKind>,
}

impl MoveRequest {
    pub const fn new(origin: Square, target: Square) -> Self {
        Self {
            origin,
            target,
            promotion: None,
        }
    }

    pub const fn promoting(origin: Square, target: Square, kind: PieceKind) -> Self {
        Self {
            origin,
            target,
            promotion: Some(kind),
        }
    }
}

impl Position {
    /// Match a request against the pseudo-legal moves of the side to move.
    pub fn resolve_move_request(&self, request: MoveRequest) -> Result<Move, MoveRejection> {
        let MoveRequest {
            origin,
            target,
            promotion,
        } = request;

        for square in [origin, target] {
            if square as usize >= self.squares().len() {
                return Err(MoveRejection::OffBoard(square));
            }
            if !self.piece_at(square).is_active() {
                return Err(MoveRejection::InactiveSquare(square));
            }
        }

        let piece = self.piece_at(origin);
        let Some(owner) = piece.color() else {
            return Err(MoveRejection::EmptyOrigin(origin));
        };
        if owner != self.side_to_move() {
            return Err(MoveRejection::WrongSide {
                square: origin,
                owner,
            });
        }

        let mut pseudo = Vec::new();
        generate_pseudo_moves(self, &mut pseudo);
        let candidates: Vec<Move> = pseudo
            .into_iter()
            .filter(|m| m.from == origin && m.to == target)
            .collect();

        let Some(first) = candidates.first() else {
            return Err(MoveRejection::NoSuchMove {
                from: origin,
                to: target,
            });
        };

        match (first.is_promotion(), promotion) {
            (true, None) => Err(MoveRejection::PromotionRequired {
                from: origin,
                to: target,
            }),
            (false, Some(_)) => Err(MoveRejection::UnexpectedPromotion {
                from: origin,
                to: target,
            }),
            (false, None) => Ok(*first),
            (true, Some(kind)) => candidates
                .iter()
                .find(|m| m.promotion == Some(kind))
                .copied()
                .ok_or(MoveRejection::UnexpectedPromotion {
                    from: origin,
                    to: target,
                }),
        }
    }

    /// Resolve and play a request, returning the applied move and its undo
    /// record. A rejected request leaves the position unchanged.
    pub fn apply_move_request(
        &mut self,
        request: MoveRequest,
    ) -> Result<(Move, UndoState), MoveRejection> {
        let mv = self.resolve_move_request(request)?;
        match self.make_move(&mv) {
            Some(undo) => Ok((mv, undo)),
            None => Err(MoveRejection::LeavesKingInCheck {
                from: mv.from,
                to: mv.to,
            }),
        }
    }
}
