//! Core board vocabulary: colors, piece kinds, the packed piece codec and
//! castling-right masks.
//!
//! A `Piece` packs its kind into bits 0..=2, its color into bits 3..=4 and the
//! inactive ("hole") marker into bit 7, so a whole board is one byte per
//! square.

use std::fmt;

/// Board square index, row-major with `0 == a1`.
pub type Square = u16;

/// Compact castling rights bitmask (`0..=15`).
pub type CastlingRights = u8;

pub const CASTLE_WHITE_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_WHITE_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_BLACK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_BLACK_QUEENSIDE: CastlingRights = 1 << 3;
pub const CASTLE_ALL: CastlingRights = 0x0F;

/// Largest supported width or height.
pub const MAX_BOARD_DIMENSION: u16 = 32;

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Promotion targets in generation order.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Three-bit type code used inside a packed `Piece`.
    #[inline]
    pub const fn code(self) -> u8 {
        self.index() as u8 + 1
    }

    #[inline]
    pub const fn from_code(code: u8) -> Option<PieceKind> {
        match code {
            1 => Some(PieceKind::Pawn),
            2 => Some(PieceKind::Knight),
            3 => Some(PieceKind::Bishop),
            4 => Some(PieceKind::Rook),
            5 => Some(PieceKind::Queen),
            6 => Some(PieceKind::King),
            _ => None,
        }
    }

    #[inline]
    pub const fn symbol(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<PieceKind> {
        match symbol.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// Castling direction; kingside is toward the higher file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::King, CastleSide::Queen];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            CastleSide::King => 0,
            CastleSide::Queen => 1,
        }
    }

    /// File step from the king toward this side's rook.
    #[inline]
    pub const fn file_step(self) -> i32 {
        match self {
            CastleSide::King => 1,
            CastleSide::Queen => -1,
        }
    }
}

/// Castling-rights bit for one color and side.
#[inline]
pub const fn castling_flag(color: Color, side: CastleSide) -> CastlingRights {
    match (color, side) {
        (Color::White, CastleSide::King) => CASTLE_WHITE_KINGSIDE,
        (Color::White, CastleSide::Queen) => CASTLE_WHITE_QUEENSIDE,
        (Color::Black, CastleSide::King) => CASTLE_BLACK_KINGSIDE,
        (Color::Black, CastleSide::Queen) => CASTLE_BLACK_QUEENSIDE,
    }
}

/// Packed square content: kind, color and the inactive marker in one byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Piece(u8);

impl Piece {
    const TYPE_MASK: u8 = 0b0000_0111;
    const WHITE_BIT: u8 = 0b0000_1000;
    const BLACK_BIT: u8 = 0b0001_0000;
    const COLOR_MASK: u8 = Self::WHITE_BIT | Self::BLACK_BIT;
    const INACTIVE_BIT: u8 = 0b1000_0000;

    pub const EMPTY: Piece = Piece(0);
    pub const INACTIVE: Piece = Piece(Self::INACTIVE_BIT);

    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Piece {
        let color_bit = match color {
            Color::White => Self::WHITE_BIT,
            Color::Black => Self::BLACK_BIT,
        };
        Piece(kind.code() | color_bit)
    }

    /// Decode a raw byte, rejecting anything that is not empty, inactive or
    /// exactly one kind with exactly one color.
    pub const fn from_code(code: u8) -> Option<Piece> {
        if code == 0 || code == Self::INACTIVE_BIT {
            return Some(Piece(code));
        }
        let kind = code & Self::TYPE_MASK;
        let color = code & Self::COLOR_MASK;
        let rest = code & !(Self::TYPE_MASK | Self::COLOR_MASK);
        if rest != 0 || kind == 0 || kind > 6 {
            return None;
        }
        if color != Self::WHITE_BIT && color != Self::BLACK_BIT {
            return None;
        }
        Some(Piece(code))
    }

    #[inline]
    pub const fn code(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn kind(self) -> Option<PieceKind> {
        PieceKind::from_code(self.0 & Self::TYPE_MASK)
    }

    #[inline]
    pub const fn color(self) -> Option<Color> {
        match self.0 & Self::COLOR_MASK {
            Self::WHITE_BIT => Some(Color::White),
            Self::BLACK_BIT => Some(Color::Black),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_active(self) -> bool {
        self.0 & Self::INACTIVE_BIT == 0
    }

    #[inline]
    pub const fn is_occupied(self) -> bool {
        self.0 & Self::TYPE_MASK != 0
    }

    #[inline]
    pub fn is_color(self, color: Color) -> bool {
        self.color() == Some(color)
    }

    #[inline]
    pub fn is_kind(self, kind: PieceKind) -> bool {
        self.kind() == Some(kind)
    }

    /// Slot in `0..12` for per-piece tables (`color * 6 + kind`).
    #[inline]
    pub fn slot(self) -> Option<usize> {
        match (self.color(), self.kind()) {
            (Some(color), Some(kind)) => Some(color.index() * 6 + kind.index()),
            _ => None,
        }
    }

    /// Diagram character: uppercase white, lowercase black, `.` empty, `#` hole.
    pub fn symbol(self) -> char {
        if !self.is_active() {
            return '#';
        }
        match (self.kind(), self.color()) {
            (Some(kind), Some(Color::White)) => kind.symbol().to_ascii_uppercase(),
            (Some(kind), Some(Color::Black)) => kind.symbol(),
            _ => '.',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Piece> {
        match symbol {
            '.' => Some(Piece::EMPTY),
            '#' => Some(Piece::INACTIVE),
            _ => {
                let kind = PieceKind::from_symbol(symbol)?;
                let color = if symbol.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                Some(Piece::new(kind, color))
            }
        }
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Piece({:#04x} '{}')", self.0, self.symbol())
    }
}
