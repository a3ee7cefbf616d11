//! Move value type shared by generation, make/unmake, ordering and search.

use std::fmt;

use crate::position::chess_types::*;

pub type MoveFlags = u8;

pub const FLAG_CASTLING: MoveFlags = 1 << 0;
pub const FLAG_EN_PASSANT: MoveFlags = 1 << 1;
pub const FLAG_DOUBLE_PAWN_PUSH: MoveFlags = 1 << 2;

/// A single move. `captured` is `Piece::EMPTY` for non-captures; for en
/// passant it holds the pawn removed from behind the target square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub moved: Piece,
    pub captured: Piece,
    pub promotion: Option<PieceKind>,
    pub flags: MoveFlags,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square, moved: Piece, captured: Piece) -> Self {
        Self {
            from,
            to,
            moved,
            captured,
            promotion: None,
            flags: 0,
        }
    }

    #[inline]
    pub const fn with_flags(mut self, flags: MoveFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[inline]
    pub const fn with_promotion(mut self, kind: PieceKind) -> Self {
        self.promotion = Some(kind);
        self
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_occupied()
    }

    #[inline]
    pub const fn is_castling(&self) -> bool {
        self.flags & FLAG_CASTLING != 0
    }

    #[inline]
    pub const fn is_en_passant(&self) -> bool {
        self.flags & FLAG_EN_PASSANT != 0
    }

    #[inline]
    pub const fn is_double_pawn_push(&self) -> bool {
        self.flags & FLAG_DOUBLE_PAWN_PUSH != 0
    }

    #[inline]
    pub const fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    /// Coordinate form (`e2e4`, `e7e8q`) for a board of the given width.
    pub fn display(&self, width: u16) -> MoveDisplay {
        MoveDisplay { mv: *self, width }
    }
}

pub struct MoveDisplay {
    mv: Move,
    width: u16,
}

impl fmt::Display for MoveDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            square_name(self.mv.from, self.width),
            square_name(self.mv.to, self.width)
        )?;
        if let Some(kind) = self.mv.promotion {
            write!(f, "{}", kind.symbol())?;
        }
        Ok(())
    }
}

/// File letter plus 1-based rank. Files past `z` continue with `A`.
pub fn square_name(square: Square, width: u16) -> String {
    let width = width.max(1);
    let file = square % width;
    let rank = square / width;
    let letter = if file < 26 {
        char::from(b'a' + file as u8)
    } else {
        char::from(b'A' + (file - 26) as u8)
    };
    format!("{letter}{}", rank + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_independent() {
        let pawn = Piece::new(PieceKind::Pawn, Color::White);
        let mv = Move::new(12, 28, pawn, Piece::EMPTY).with_flags(FLAG_DOUBLE_PAWN_PUSH);
        assert!(mv.is_double_pawn_push());
        assert!(!mv.is_castling());
        assert!(!mv.is_en_passant());
        assert!(!mv.is_capture());
    }

    #[test]
    fn coordinate_display_includes_promotion() {
        let pawn = Piece::new(PieceKind::Pawn, Color::White);
        let rook = Piece::new(PieceKind::Rook, Color::Black);
        let mv = Move::new(52, 63, pawn, rook).with_promotion(PieceKind::Knight);
        assert_eq!(mv.display(8).to_string(), "e7h8n");
        assert!(mv.is_capture());
    }

    #[test]
    fn wide_boards_name_files_past_z() {
        assert_eq!(square_name(26, 32), "A1");
        assert_eq!(square_name(32 + 3, 32), "d2");
    }
}
