//! In-place make/unmake with incremental Zobrist maintenance.
//!
//! `make_move` applies a pseudo-legal move and then rejects it if it leaves
//! the mover's king attacked (or, for castling, if any square the king
//! crosses is attacked). A rejected move is unmade before returning, so the
//! position is bit-for-bit what it was before the call.

use tracing::error;

use crate::errors::HashMismatch;
use crate::moves::chess_move::Move;
use crate::position::chess_types::*;
use crate::position::position::Position;
use crate::position::undo_state::UndoState;

impl Position {
    /// Apply `mv`. Returns the undo record, or `None` if the move was illegal
    /// (the position is left unchanged).
    pub fn make_move(&mut self, mv: &Move) -> Option<UndoState> {
        let undo = UndoState {
            prev_castling_rights: self.castling_rights,
            prev_en_passant_square: self.en_passant_square,
            prev_halfmove_clock: self.halfmove_clock,
            prev_fullmove_number: self.fullmove_number,
            prev_zobrist_key: self.zobrist_key,
        };
        let mover = self.side_to_move;

        self.apply_move(mv, mover);

        if self.move_was_legal(mv, mover) {
            Some(undo)
        } else {
            self.unmake_move(mv, undo);
            None
        }
    }

    /// Exact inverse of a successful `make_move`.
    pub fn unmake_move(&mut self, mv: &Move, undo: UndoState) {
        let mover = self.side_to_move.opposite();
        self.side_to_move = mover;

        if mv.is_castling() {
            if let Some((rook_from, rook_to)) = self.castling_rook_path(mv, mover) {
                self.squares[rook_to as usize] = Piece::EMPTY;
                self.squares[rook_from as usize] = Piece::new(PieceKind::Rook, mover);
            }
        }

        if mv.is_en_passant() {
            self.squares[mv.to as usize] = Piece::EMPTY;
            let victim = self.en_passant_victim(mv.to, mover);
            self.squares[victim as usize] = mv.captured;
        } else {
            self.squares[mv.to as usize] = mv.captured;
        }
        self.squares[mv.from as usize] = mv.moved;

        if mv.moved.is_kind(PieceKind::King) {
            self.king_squares[mover.index()] = mv.from;
        }

        self.castling_rights = undo.prev_castling_rights;
        self.en_passant_square = undo.prev_en_passant_square;
        self.halfmove_clock = undo.prev_halfmove_clock;
        self.fullmove_number = undo.prev_fullmove_number;
        self.zobrist_key = undo.prev_zobrist_key;
    }

    /// `make_move` plus, when hash verification is enabled, a from-scratch
    /// recomputation of the key after the move.
    pub fn try_make_move(&mut self, mv: &Move) -> Result<Option<UndoState>, Box<HashMismatch>> {
        if !self.verify_hash {
            return Ok(self.make_move(mv));
        }

        let board_before = self.to_string();
        let Some(undo) = self.make_move(mv) else {
            return Ok(None);
        };

        let recomputed_key = self.compute_zobrist_key();
        if recomputed_key == self.zobrist_key {
            return Ok(Some(undo));
        }

        let mismatch = HashMismatch {
            mv: *mv,
            board_before,
            board_after: self.to_string(),
            incremental_key: self.zobrist_key,
            recomputed_key,
            components: self
                .keys
                .describe_difference(recomputed_key ^ self.zobrist_key),
        };
        error!(
            incremental = mismatch.incremental_key,
            recomputed = mismatch.recomputed_key,
            components = %self.keys.describe_difference_text(recomputed_key ^ self.zobrist_key),
            "incremental zobrist key diverged"
        );
        self.unmake_move(mv, undo);
        Err(Box::new(mismatch))
    }

    fn apply_move(&mut self, mv: &Move, mover: Color) {
        if mv.is_en_passant() {
            let victim = self.en_passant_victim(mv.to, mover);
            self.set_square(victim, Piece::EMPTY);
        }

        let placed = match mv.promotion {
            Some(kind) => Piece::new(kind, mover),
            None => mv.moved,
        };
        self.set_square(mv.from, Piece::EMPTY);
        self.set_square(mv.to, placed);

        if mv.is_castling() {
            if let Some((rook_from, rook_to)) = self.castling_rook_path(mv, mover) {
                self.set_square(rook_from, Piece::EMPTY);
                self.set_square(rook_to, Piece::new(PieceKind::Rook, mover));
            }
        }

        // Castling rights: one xor bracket around the whole update.
        let old_rights = self.castling_rights;
        let mut rights = old_rights;
        if mv.moved.is_kind(PieceKind::King) {
            rights &= !(castling_flag(mover, CastleSide::King) | castling_flag(mover, CastleSide::Queen));
        }
        for color in Color::ALL {
            for side in CastleSide::ALL {
                if let Some(rook) = self.castling_rooks[color.index()][side.index()] {
                    if rook == mv.from || rook == mv.to {
                        rights &= !castling_flag(color, side);
                    }
                }
            }
        }
        if rights != old_rights {
            self.zobrist_key ^= self.keys.castling_key(old_rights) ^ self.keys.castling_key(rights);
            self.castling_rights = rights;
        }

        self.zobrist_key ^= self.keys.en_passant_key(self.en_passant_square);
        self.en_passant_square = if mv.is_double_pawn_push() {
            Some((mv.from + mv.to) / 2)
        } else {
            None
        };
        self.zobrist_key ^= self.keys.en_passant_key(self.en_passant_square);

        if mv.moved.is_kind(PieceKind::Pawn) || mv.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if mover == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        if mv.moved.is_kind(PieceKind::King) {
            self.king_squares[mover.index()] = mv.to;
        }

        self.side_to_move = mover.opposite();
        self.zobrist_key ^= self.keys.side_to_move_key();
    }

    fn move_was_legal(&self, mv: &Move, mover: Color) -> bool {
        let enemy = mover.opposite();
        if self.is_square_attacked(self.king_squares[mover.index()], enemy) {
            return false;
        }
        if mv.is_castling() {
            let Some(path) = self.squares_between(mv.from, mv.to) else {
                return false;
            };
            if path.iter().any(|sq| self.is_square_attacked(*sq, enemy)) {
                return false;
            }
        }
        true
    }

    /// Replace the content of `square`, keeping the key in sync.
    #[inline]
    fn set_square(&mut self, square: Square, piece: Piece) {
        let old = self.squares[square as usize];
        self.zobrist_key ^= self.keys.piece_key(square, old) ^ self.keys.piece_key(square, piece);
        self.squares[square as usize] = piece;
    }

    /// Rook origin and destination for a castling move by `mover`. The rook
    /// lands on the square the king crossed.
    fn castling_rook_path(&self, mv: &Move, mover: Color) -> Option<(Square, Square)> {
        let side = if mv.to > mv.from {
            CastleSide::King
        } else {
            CastleSide::Queen
        };
        let rook_from = self.castling_rooks[mover.index()][side.index()]?;
        let rook_to = match side {
            CastleSide::King => mv.from + 1,
            CastleSide::Queen => mv.from - 1,
        };
        Some((rook_from, rook_to))
    }

    /// Square of the pawn removed by an en-passant capture landing on `target`.
    #[inline]
    fn en_passant_victim(&self, target: Square, mover: Color) -> Square {
        let width = self.geometry.width();
        match mover {
            Color::White => target - width,
            Color::Black => target + width,
        }
    }
}
