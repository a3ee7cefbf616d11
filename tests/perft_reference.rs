use poly_chess::move_generation::perft::{perft, perft_counts, perft_divide, perft_strict};
use poly_chess::position::position::Position;
use poly_chess::position::setup::BoardSetup;
use poly_chess::test_support::{position, KIWIPETE, POSITION_3, POSITION_4, POSITION_5};

fn assert_node_counts(pos: &mut Position, expected: &[u64]) {
    for (i, nodes) in expected.iter().enumerate() {
        let depth = (i + 1) as u8;
        assert_eq!(perft(pos, depth), *nodes, "depth {depth}");
    }
}

#[test]
fn start_position() {
    let mut pos = Position::standard().expect("standard");
    assert_node_counts(&mut pos, &[20, 400, 8902, 197_281]);
}

#[test]
fn start_position_depth_four_breakdown() {
    let mut pos = Position::standard().expect("standard");
    let counts = perft_counts(&mut pos, 4);
    assert_eq!(counts.nodes, 197_281);
    assert_eq!(counts.captures, 1576);
    assert_eq!(counts.checks, 469);
    assert_eq!(counts.checkmates, 8);
}

#[test]
fn kiwipete() {
    let mut pos = position(&KIWIPETE, "w KQkq -");
    assert_node_counts(&mut pos, &[48, 2039, 97_862]);
}

#[test]
fn position_three() {
    let mut pos = position(&POSITION_3, "w - -");
    assert_node_counts(&mut pos, &[14, 191, 2812, 43_238]);
}

#[test]
fn position_four_mirrored() {
    let mut pos = position(&POSITION_4, "b KQ -");
    assert_node_counts(&mut pos, &[6, 264, 9467]);
}

#[test]
fn position_five() {
    let mut pos = position(&POSITION_5, "w KQ -");
    assert_node_counts(&mut pos, &[44, 1486, 62_379]);
}

#[test]
fn divide_matches_perft_on_kiwipete() {
    let mut pos = position(&KIWIPETE, "w KQkq -");
    let report = perft_divide(&mut pos, 2);
    assert_eq!(report.entries.len(), 48);
    assert_eq!(report.total, 2039);
    let castles = report.entries.iter().filter(|(mv, _)| mv.is_castling()).count();
    assert_eq!(castles, 2);
}

#[test]
fn strict_perft_on_reference_positions() {
    let mut start = Position::standard().expect("standard");
    assert_eq!(perft_strict(&mut start, 3), Ok(8902));
    let mut kiwipete = position(&KIWIPETE, "w KQkq -");
    assert_eq!(perft_strict(&mut kiwipete, 2), Ok(2039));
    let mut third = position(&POSITION_3, "w - -");
    assert_eq!(perft_strict(&mut third, 3), Ok(2812));
}

#[test]
fn strict_perft_on_irregular_boards() {
    let holed = BoardSetup::standard()
        .with_inactive(3, 3)
        .with_inactive(4, 4)
        .with_inactive(0, 5);
    let mut pos = Position::from_setup(&holed).expect("holed board");
    assert_eq!(perft_strict(&mut pos, 3), Ok(perft(&mut pos, 3)));

    let mut wide = position(
        &[
            "r....k...r",
            "pppp..pppp",
            "....pp....",
            "..........",
            "..........",
            "....PP....",
            "PPPP..PPPP",
            "R....K...R",
        ],
        "w KQkq -",
    );
    assert_eq!(perft_strict(&mut wide, 3), Ok(perft(&mut wide, 3)));

    let mut short = position(&["rk..", "pp..", "..PP", "..KR"], "w - -");
    assert_eq!(perft_strict(&mut short, 4), Ok(perft(&mut short, 4)));
}
