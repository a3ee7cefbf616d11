use crate::position::chess_types::*;

/// Single undo record for `make_move` / `unmake_move`.
///
/// The board itself is reverted from the `Move`; only the state a move can
/// overwrite without trace is kept here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoState {
    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_square: Option<Square>,
    pub prev_halfmove_clock: u16,
    pub prev_fullmove_number: u16,
    pub prev_zobrist_key: u64,
}
