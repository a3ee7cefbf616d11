//! Command-line runner for perft and search over a small suite of boards.
//!
//! Usage:
//! `cargo run --release`
//! `cargo run --release -- --depth 5`
//! `cargo run --release -- --perft 4`
//!
//! Defaults come from `EngineConfig::from_env` (`POLY_CHESS_*` variables).

use poly_chess::config::EngineConfig;
use poly_chess::engine::Engine;
use poly_chess::errors::EngineError;
use poly_chess::move_generation::perft::perft_divide;
use poly_chess::position::chess_types::*;
use poly_chess::position::position::Position;
use poly_chess::position::setup::BoardSetup;

fn parse_arg_u8(flag: &str) -> Option<u8> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            if let Ok(v) = args[i + 1].parse::<u8>() {
                return Some(v.max(1));
            }
        }
    }
    None
}

/// Ten files, eight ranks: standard armies centred, empty outer files.
fn wide_setup() -> BoardSetup {
    let back = [
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
    ];
    let mut setup = BoardSetup::empty(10, 8);
    for (i, kind) in back.iter().enumerate() {
        let file = i as u16 + 1;
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

/// Standard start with the four central squares removed.
fn holed_setup() -> BoardSetup {
    BoardSetup::standard()
        .with_inactive(3, 3)
        .with_inactive(4, 3)
        .with_inactive(3, 4)
        .with_inactive(4, 4)
}

fn main() -> Result<(), EngineError> {
    tracing_subscriber::fmt::init();

    let config = EngineConfig::from_env()?;
    let suite = [
        ("standard", BoardSetup::standard()),
        ("wide_10x8", wide_setup()),
        ("central_holes", holed_setup()),
    ];

    if let Some(depth) = parse_arg_u8("--perft") {
        for (name, setup) in &suite {
            let mut position = Position::from_setup(setup)?;
            println!("{name}: perft depth={depth}");
            println!("{}", perft_divide(&mut position, depth));
        }
        return Ok(());
    }

    let depth = parse_arg_u8("--depth").unwrap_or(config.max_depth);
    println!("search run: depth={depth} tt_mb={}", config.tt_size_mb);
    for (name, setup) in &suite {
        let mut engine = Engine::new(setup, config)?;
        let result = engine.find_best_move(depth)?;
        let best = result
            .best_move
            .map(|mv| mv.display(engine.position().width()).to_string())
            .unwrap_or_else(|| "none".to_string());
        println!(
            "{name}: depth={} nodes={} elapsed_ms={} nps={} best_score={} best_move={best} tt_hits={}",
            result.reached_depth,
            result.nodes,
            result.elapsed_ms,
            result.nps,
            result.best_score,
            result.tt_stats.hits
        );
    }
    Ok(())
}
