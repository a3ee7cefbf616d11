//! Pseudo-legal generation dispatch and the legal-move filter.
//!
//! Generation is stateless: it reads a `Position` and its shared attack
//! tables and appends to a caller-owned buffer. King safety is left to
//! `Position::make_move`.

use crate::move_generation::pseudo_moves_king::generate_king_moves;
use crate::move_generation::pseudo_moves_knight::generate_knight_moves;
use crate::move_generation::pseudo_moves_pawn::generate_pawn_moves;
use crate::move_generation::pseudo_moves_sliders::generate_sliding_moves;
use crate::moves::chess_move::Move;
use crate::position::chess_types::*;
use crate::position::position::Position;
use crate::tables::attack_tables::{ALL_DIRECTIONS, DIAGONAL_DIRECTIONS, ORTHOGONAL_DIRECTIONS};

/// Append every pseudo-legal move for the side to move to `out`.
pub fn generate_pseudo_moves(position: &Position, out: &mut Vec<Move>) {
    let side = position.side_to_move();
    for from in position.squares_of(side) {
        match position.piece_at(from).kind() {
            Some(PieceKind::Pawn) => generate_pawn_moves(position, from, out),
            Some(PieceKind::Knight) => generate_knight_moves(position, from, out),
            Some(PieceKind::Bishop) => {
                generate_sliding_moves(position, from, &DIAGONAL_DIRECTIONS, out)
            }
            Some(PieceKind::Rook) => {
                generate_sliding_moves(position, from, &ORTHOGONAL_DIRECTIONS, out)
            }
            Some(PieceKind::Queen) => generate_sliding_moves(position, from, &ALL_DIRECTIONS, out),
            Some(PieceKind::King) => generate_king_moves(position, from, out),
            None => {}
        }
    }
}

/// Pseudo-legal moves filtered through `make_move`.
pub fn generate_legal_moves(position: &mut Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    generate_pseudo_moves(position, &mut moves);
    moves.retain(|mv| match position.make_move(mv) {
        Some(undo) => {
            position.unmake_move(mv, undo);
            true
        }
        None => false,
    });
    moves
}

/// Whether the side to move has at least one legal move.
pub fn has_legal_move(position: &mut Position, scratch: &mut Vec<Move>) -> bool {
    scratch.clear();
    generate_pseudo_moves(position, scratch);
    for mv in scratch.iter() {
        if let Some(undo) = position.make_move(mv) {
            position.unmake_move(mv, undo);
            return true;
        }
    }
    false
}

/// Quiet move or capture onto `to`; `None` for own pieces and holes.
#[inline]
pub(crate) fn step_move(position: &Position, from: Square, to: Square, moved: Piece) -> Option<Move> {
    let target = position.piece_at(to);
    if !target.is_active() || target.is_color(position.side_to_move()) {
        return None;
    }
    Some(Move::new(from, to, moved, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::setup::BoardSetup;
    use crate::test_support::{parse_square, position};

    fn moves_from(moves: &[Move], square: Square) -> Vec<Move> {
        moves.iter().copied().filter(|m| m.from == square).collect()
    }

    #[test]
    fn start_position_has_twenty_moves() {
        let mut pos = Position::standard().expect("standard");
        let mut pseudo = Vec::new();
        generate_pseudo_moves(&pos, &mut pseudo);
        assert_eq!(pseudo.len(), 20);
        assert_eq!(generate_legal_moves(&mut pos).len(), 20);
    }

    #[test]
    fn promotion_expands_to_four_moves_keeping_capture() {
        let pos = position(
            &["r...k...", ".P......", "........", "........", "........", "........", "........", "....K..."],
            "w - -",
        );
        let mut moves = Vec::new();
        generate_pseudo_moves(&pos, &mut moves);
        let pawn_moves = moves_from(&moves, parse_square("b7", 8));
        let pushes: Vec<_> = pawn_moves.iter().filter(|m| m.to == parse_square("b8", 8)).collect();
        let captures: Vec<_> = pawn_moves.iter().filter(|m| m.to == parse_square("a8", 8)).collect();
        assert_eq!(pushes.len(), 4);
        assert_eq!(captures.len(), 4);
        for kind in PieceKind::PROMOTIONS {
            assert!(captures.iter().any(|m| m.promotion == Some(kind)));
        }
        assert!(captures
            .iter()
            .all(|m| m.captured == Piece::new(PieceKind::Rook, Color::Black)));
        assert!(pushes.iter().all(|m| !m.is_capture()));
    }

    #[test]
    fn black_promotes_on_first_rank() {
        let pos = position(
            &["....k...", "........", "........", "........", "........", "........", "......p.", "K......."],
            "b - -",
        );
        let mut moves = Vec::new();
        generate_pseudo_moves(&pos, &mut moves);
        let promotions = moves_from(&moves, parse_square("g2", 8));
        assert_eq!(promotions.len(), 4);
        assert!(promotions.iter().all(|m| m.is_promotion()));
    }

    #[test]
    fn pawn_facing_hole_promotes() {
        let pos = position(
            &["....k...", "........", "........", "..#.....", "..P.....", "........", "........", "....K..."],
            "w - -",
        );
        let mut moves = Vec::new();
        generate_pseudo_moves(&pos, &mut moves);
        let pawn_moves = moves_from(&moves, parse_square("c4", 8));
        assert!(pawn_moves.is_empty());

        let pos = position(
            &["....k...", "........", "........", "..#.....", "........", "..P.....", "........", "....K..."],
            "w - -",
        );
        moves.clear();
        generate_pseudo_moves(&pos, &mut moves);
        let pawn_moves = moves_from(&moves, parse_square("c3", 8));
        assert_eq!(pawn_moves.len(), 4);
        assert!(pawn_moves.iter().all(|m| m.to == parse_square("c4", 8) && m.is_promotion()));
    }

    #[test]
    fn double_push_needs_both_squares_empty() {
        let pos = position(
            &["....k...", "........", "........", "........", "...n....", "....n...", "...PP...", "....K..."],
            "w - -",
        );
        let mut moves = Vec::new();
        generate_pseudo_moves(&pos, &mut moves);
        let d_pawn = moves_from(&moves, parse_square("d2", 8));
        assert!(d_pawn.iter().any(|m| m.to == parse_square("d3", 8)));
        assert!(!d_pawn.iter().any(|m| m.is_double_pawn_push()));
        let e_pawn = moves_from(&moves, parse_square("e2", 8));
        assert!(e_pawn.iter().all(|m| m.to != parse_square("e3", 8)));
        assert!(!e_pawn.iter().any(|m| m.is_double_pawn_push()));
    }

    #[test]
    fn double_push_onto_last_rank_promotes() {
        let mut pos = position(&["k...", "....", ".P..", "...K"], "w - -");
        let mut moves = Vec::new();
        generate_pseudo_moves(&pos, &mut moves);
        let b4 = parse_square("b4", 4);
        let promotions: Vec<Move> = moves_from(&moves, parse_square("b2", 4))
            .into_iter()
            .filter(|m| m.to == b4)
            .collect();
        assert_eq!(promotions.len(), 4);
        assert!(promotions
            .iter()
            .all(|m| m.is_double_pawn_push() && m.is_promotion()));

        let before = pos.snapshot();
        for mv in &promotions {
            let undo = pos.make_move(mv).expect("legal");
            assert_eq!(pos.en_passant_square(), Some(parse_square("b3", 4)));
            assert_eq!(pos.piece_at(b4), Piece::new(mv.promotion.expect("promotion"), Color::White));
            assert_eq!(pos.zobrist_key(), pos.compute_zobrist_key());
            pos.unmake_move(mv, undo);
            assert_eq!(pos.snapshot(), before);
        }
    }

    #[test]
    fn double_push_in_front_of_a_hole_promotes() {
        let setup = BoardSetup::standard().with_inactive(4, 4);
        let pos = Position::from_setup(&setup).expect("position");
        let mut moves = Vec::new();
        generate_pseudo_moves(&pos, &mut moves);
        let e_pawn = moves_from(&moves, parse_square("e2", 8));
        assert_eq!(e_pawn.len(), 5);
        assert_eq!(
            e_pawn
                .iter()
                .filter(|m| m.to == parse_square("e4", 8) && m.is_promotion())
                .count(),
            4
        );
    }

    #[test]
    fn black_double_push_uses_board_height() {
        let pos = position(
            &[
                "....k...",
                "...p....",
                "........",
                "........",
                "........",
                "........",
                "........",
                "........",
                "........",
                "....K...",
            ],
            "b - -",
        );
        let mut moves = Vec::new();
        generate_pseudo_moves(&pos, &mut moves);
        let pushes = moves_from(&moves, parse_square("d9", 8));
        assert_eq!(pushes.len(), 2);
        assert!(pushes
            .iter()
            .any(|m| m.is_double_pawn_push() && m.to == parse_square("d7", 8)));
    }

    #[test]
    fn en_passant_requires_enemy_pawn_behind_target() {
        let pos = position(
            &["....k...", "........", "........", "...pP...", "........", "........", "........", "....K..."],
            "w - d6",
        );
        let mut moves = Vec::new();
        generate_pseudo_moves(&pos, &mut moves);
        assert!(moves.iter().any(|m| m.is_en_passant() && m.to == parse_square("d6", 8)));

        let pos = position(
            &["....k...", "........", "........", "....P...", "........", "........", "........", "....K..."],
            "w - d6",
        );
        moves.clear();
        generate_pseudo_moves(&pos, &mut moves);
        assert!(!moves.iter().any(|m| m.is_en_passant()));
    }

    #[test]
    fn en_passant_on_a_and_h_files_does_not_wrap() {
        let pos = position(
            &["....k...", "........", "........", "Pp.....p", "........", "........", "........", "....K..."],
            "w - b6",
        );
        let mut moves = Vec::new();
        generate_pseudo_moves(&pos, &mut moves);
        let ep: Vec<_> = moves.iter().filter(|m| m.is_en_passant()).collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].from, parse_square("a5", 8));
    }

    #[test]
    fn sliders_stop_at_holes_and_pieces() {
        let pos = position(
            &["....k...", "........", "........", "...#....", "........", ".p......", "........", "R..QK..."],
            "w - -",
        );
        let mut moves = Vec::new();
        generate_pseudo_moves(&pos, &mut moves);
        let queen = moves_from(&moves, parse_square("d1", 8));
        // north: d2..d4 then the hole on d5
        assert!(queen.iter().any(|m| m.to == parse_square("d4", 8)));
        assert!(!queen.iter().any(|m| m.to == parse_square("d5", 8)));
        assert!(!queen.iter().any(|m| m.to == parse_square("d6", 8)));
        // north-west: c2 then captures b3
        let capture = queen
            .iter()
            .find(|m| m.to == parse_square("b3", 8))
            .expect("capture on b3");
        assert_eq!(capture.captured, Piece::new(PieceKind::Pawn, Color::Black));
        assert!(!queen.iter().any(|m| m.to == parse_square("a4", 8)));
        // west: c1, b1 then own rook
        assert!(queen.iter().any(|m| m.to == parse_square("b1", 8)));
        assert!(!queen.iter().any(|m| m.to == 0));
    }

    #[test]
    fn knights_skip_holes() {
        let pos = position(
            &["....k...", "........", "........", "........", "........", "..#.....", "........", ".N..K..."],
            "w - -",
        );
        let mut moves = Vec::new();
        generate_pseudo_moves(&pos, &mut moves);
        let knight = moves_from(&moves, parse_square("b1", 8));
        assert_eq!(knight.len(), 2);
        assert!(!knight.iter().any(|m| m.to == parse_square("c3", 8)));
    }

    #[test]
    fn castling_generated_only_with_clear_path() {
        let mut pos = position(
            &["r...k..r", "........", "........", "........", "........", "........", "........", "R...K..R"],
            "w KQkq -",
        );
        let castles: Vec<_> = generate_legal_moves(&mut pos)
            .into_iter()
            .filter(|m| m.is_castling())
            .collect();
        assert_eq!(castles.len(), 2);

        let mut blocked = position(
            &["r...k..r", "........", "........", "........", "........", "........", "........", "RB..K..R"],
            "w KQkq -",
        );
        let castles: Vec<_> = generate_legal_moves(&mut blocked)
            .into_iter()
            .filter(|m| m.is_castling())
            .collect();
        assert_eq!(castles.len(), 1);
        assert_eq!(castles[0].to, parse_square("g1", 8));
    }

    #[test]
    fn no_castling_when_non_rook_is_nearest_outward() {
        let mut pos = position(
            &["....k...", "........", "........", "........", "........", "........", "........", "....K.BR"],
            "w K -",
        );
        assert!(!generate_legal_moves(&mut pos).iter().any(|m| m.is_castling()));
    }

    #[test]
    fn castling_on_wide_board_moves_king_two_files() {
        let mut pos = position(
            &[
                "....k.....",
                "..........",
                "..........",
                "..........",
                "..........",
                "..........",
                "..........",
                "R...K....R",
            ],
            "w KQ -",
        );
        let castles: Vec<_> = generate_legal_moves(&mut pos)
            .into_iter()
            .filter(|m| m.is_castling())
            .collect();
        assert_eq!(castles.len(), 2);
        let kingside = castles.iter().find(|m| m.to == 6).expect("kingside");
        let undo = pos.make_move(kingside).expect("legal");
        assert_eq!(pos.piece_at(5), Piece::new(PieceKind::Rook, Color::White));
        assert!(pos.piece_at(9).is_empty());
        pos.unmake_move(kingside, undo);
    }

    #[test]
    fn checkmated_side_has_no_legal_move() {
        let mut pos = position(
            &["......k.", ".....Q..", "......K.", "........", "........", "........", "........", "........"],
            "b - -",
        );
        let mut scratch = Vec::new();
        assert!(has_legal_move(&mut pos, &mut scratch));
        let mut mated = position(
            &[".......k", "......Q.", "......K.", "........", "........", "........", "........", "........"],
            "b - -",
        );
        assert!(!has_legal_move(&mut mated, &mut scratch));
        assert!(mated.is_king_in_check(Color::Black));
    }
}
