//! Decoded position setup and board geometry.
//!
//! `BoardSetup` is the already-decoded input a `Position` is built from. It
//! carries no validation of its own; `Position::from_setup` rejects malformed
//! setups.

use crate::errors::PositionError;
use crate::position::chess_rules::{STANDARD_BACK_RANK, STANDARD_HEIGHT, STANDARD_WIDTH};
use crate::position::chess_types::*;

/// Board dimensions. Construction guarantees `1..=32` in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Geometry {
    width: u16,
    height: u16,
}

impl Geometry {
    pub fn new(width: u16, height: u16) -> Result<Self, PositionError> {
        let valid = |d: u16| (1..=MAX_BOARD_DIMENSION).contains(&d);
        if !valid(width) || !valid(height) {
            return Err(PositionError::InvalidGeometry {
                width,
                height,
                max: MAX_BOARD_DIMENSION,
            });
        }
        Ok(Self { width, height })
    }

    pub const fn standard() -> Self {
        Self {
            width: STANDARD_WIDTH,
            height: STANDARD_HEIGHT,
        }
    }

    #[inline]
    pub const fn width(self) -> u16 {
        self.width
    }

    #[inline]
    pub const fn height(self) -> u16 {
        self.height
    }

    #[inline]
    pub const fn square_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub const fn file_of(self, square: Square) -> u16 {
        square % self.width
    }

    #[inline]
    pub const fn rank_of(self, square: Square) -> u16 {
        square / self.width
    }

    #[inline]
    pub const fn square_at(self, file: u16, rank: u16) -> Square {
        rank * self.width + file
    }

    /// Square for signed coordinates, `None` when off the board.
    #[inline]
    pub fn checked_square(self, file: i32, rank: i32) -> Option<Square> {
        if file < 0 || rank < 0 || file >= self.width as i32 || rank >= self.height as i32 {
            return None;
        }
        Some(self.square_at(file as u16, rank as u16))
    }
}

/// Externally decoded position description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSetup {
    pub width: u16,
    pub height: u16,
    /// Row-major contents; `Piece::INACTIVE` marks a hole.
    pub squares: Vec<Piece>,
    pub side_to_move: Color,
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

impl BoardSetup {
    /// Empty board, white to move, no castling rights.
    pub fn empty(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            squares: vec![Piece::EMPTY; width as usize * height as usize],
            side_to_move: Color::White,
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Standard 8x8 initial array with all castling rights.
    pub fn standard() -> Self {
        let mut setup = Self::empty(STANDARD_WIDTH, STANDARD_HEIGHT);
        for (file, kind) in STANDARD_BACK_RANK.iter().enumerate() {
            let file = file as u16;
            setup = setup
                .with_piece(file, 0, Piece::new(*kind, Color::White))
                .with_piece(file, 1, Piece::new(PieceKind::Pawn, Color::White))
                .with_piece(file, 6, Piece::new(PieceKind::Pawn, Color::Black))
                .with_piece(file, 7, Piece::new(*kind, Color::Black));
        }
        for color in Color::ALL {
            for side in CastleSide::ALL {
                setup = setup.with_castling(color, side, true);
            }
        }
        setup
    }

    /// Place a piece; coordinates outside the board are ignored.
    pub fn with_piece(mut self, file: u16, rank: u16, piece: Piece) -> Self {
        if file < self.width && rank < self.height {
            let index = rank as usize * self.width as usize + file as usize;
            if let Some(slot) = self.squares.get_mut(index) {
                *slot = piece;
            }
        }
        self
    }

    pub fn with_inactive(self, file: u16, rank: u16) -> Self {
        self.with_piece(file, rank, Piece::INACTIVE)
    }

    pub fn with_side_to_move(mut self, color: Color) -> Self {
        self.side_to_move = color;
        self
    }

    pub fn with_castling(mut self, color: Color, side: CastleSide, allowed: bool) -> Self {
        let flag = match (color, side) {
            (Color::White, CastleSide::King) => &mut self.white_kingside,
            (Color::White, CastleSide::Queen) => &mut self.white_queenside,
            (Color::Black, CastleSide::King) => &mut self.black_kingside,
            (Color::Black, CastleSide::Queen) => &mut self.black_queenside,
        };
        *flag = allowed;
        self
    }

    pub fn with_en_passant(mut self, square: Option<Square>) -> Self {
        self.en_passant = square;
        self
    }

    pub fn with_clocks(mut self, halfmove_clock: u16, fullmove_number: u16) -> Self {
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number;
        self
    }

    /// Castling booleans packed into a rights mask.
    pub fn castling_rights(&self) -> CastlingRights {
        let mut rights = 0;
        if self.white_kingside {
            rights |= CASTLE_WHITE_KINGSIDE;
        }
        if self.white_queenside {
            rights |= CASTLE_WHITE_QUEENSIDE;
        }
        if self.black_kingside {
            rights |= CASTLE_BLACK_KINGSIDE;
        }
        if self.black_queenside {
            rights |= CASTLE_BLACK_QUEENSIDE;
        }
        rights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_rejects_out_of_range_dimensions() {
        assert!(Geometry::new(0, 8).is_err());
        assert!(Geometry::new(8, 33).is_err());
        assert!(Geometry::new(32, 32).is_ok());
        assert!(Geometry::new(1, 1).is_ok());
    }

    #[test]
    fn geometry_square_arithmetic_is_row_major() {
        let g = Geometry::new(10, 6).expect("geometry");
        let sq = g.square_at(3, 4);
        assert_eq!(sq, 43);
        assert_eq!(g.file_of(sq), 3);
        assert_eq!(g.rank_of(sq), 4);
        assert_eq!(g.checked_square(-1, 0), None);
        assert_eq!(g.checked_square(9, 5), Some(59));
        assert_eq!(g.checked_square(10, 5), None);
    }

    #[test]
    fn standard_setup_has_thirty_two_pieces() {
        let setup = BoardSetup::standard();
        assert_eq!(setup.squares.len(), 64);
        assert_eq!(setup.squares.iter().filter(|p| p.is_occupied()).count(), 32);
        assert_eq!(setup.squares[4], Piece::new(PieceKind::King, Color::White));
        assert_eq!(setup.squares[59], Piece::new(PieceKind::Queen, Color::Black));
        assert_eq!(setup.castling_rights(), CASTLE_ALL);
    }

    #[test]
    fn builder_ignores_off_board_coordinates() {
        let setup = BoardSetup::empty(4, 4).with_piece(9, 0, Piece::new(PieceKind::Rook, Color::White));
        assert!(setup.squares.iter().all(|p| p.is_empty()));
    }
}
