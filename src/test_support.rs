//! Diagram-based setups for unit tests, integration tests and benches.
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature. Rows are
//! listed from the top rank down using `Piece::symbol` characters, with `#`
//! for an inactive square. The state string holds side to move, castling
//! letters (`KQkq` or `-`) and an en-passant square in coordinate form (or
//! `-`). Malformed diagrams panic.

use crate::position::chess_types::*;
use crate::position::position::Position;
use crate::position::setup::BoardSetup;

pub const KIWIPETE: [&str; 8] = [
    "r...k..r", "p.ppqpb.", "bn..pnp.", "...PN...", ".p..P...", "..N..Q.p", "PPPBBPPP",
    "R...K..R",
];

pub const POSITION_3: [&str; 8] = [
    "........", "..p.....", "...p....", "KP.....r", ".R...p.k", "........", "....P.P.",
    "........",
];

/// Colour-mirrored so that black is to move.
pub const POSITION_4: [&str; 8] = [
    "r..q.rk.", "pP.p..pp", "Q....n..", "bbp.p...", "Np......", ".B...NBn", "pPPP.PPP",
    "R...K..R",
];

pub const POSITION_5: [&str; 8] = [
    "rnbq.k.r", "pp.Pbppp", "..p.....", "........", "..B.....", "........", "PPP.NnPP",
    "RNBQK..R",
];

pub fn position(rows: &[&str], state: &str) -> Position {
    Position::from_setup(&setup_from_diagram(rows, state)).expect("diagram position")
}

pub fn setup_from_diagram(rows: &[&str], state: &str) -> BoardSetup {
    let height = rows.len() as u16;
    let width = rows.first().map_or(0, |r| r.chars().count()) as u16;
    let mut setup = BoardSetup::empty(width, height);

    for (row_index, row) in rows.iter().enumerate() {
        assert_eq!(row.chars().count() as u16, width, "ragged diagram row {row_index}");
        let rank = height - 1 - row_index as u16;
        for (file, symbol) in row.chars().enumerate() {
            let piece = Piece::from_symbol(symbol)
                .unwrap_or_else(|| panic!("unknown diagram symbol {symbol:?}"));
            setup = setup.with_piece(file as u16, rank, piece);
        }
    }

    let mut fields = state.split_whitespace();
    let side = match fields.next() {
        Some("b") => Color::Black,
        _ => Color::White,
    };
    setup = setup.with_side_to_move(side);

    if let Some(castling) = fields.next() {
        for letter in castling.chars() {
            let (color, side) = match letter {
                'K' => (Color::White, CastleSide::King),
                'Q' => (Color::White, CastleSide::Queen),
                'k' => (Color::Black, CastleSide::King),
                'q' => (Color::Black, CastleSide::Queen),
                _ => continue,
            };
            setup = setup.with_castling(color, side, true);
        }
    }

    if let Some(ep) = fields.next() {
        if ep != "-" {
            setup = setup.with_en_passant(Some(parse_square(ep, width)));
        }
    }

    setup
}

/// Parse `e3`-style coordinates on a board of `width` files.
pub fn parse_square(name: &str, width: u16) -> Square {
    let mut chars = name.chars();
    let letter = chars.next().expect("file letter");
    let file = if letter.is_ascii_lowercase() {
        letter as u16 - 'a' as u16
    } else {
        letter as u16 - 'A' as u16 + 26
    };
    let rank: u16 = chars.as_str().parse().expect("rank number");
    (rank - 1) * width + file
}
