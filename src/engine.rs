//! Engine facade: one game position, its move history, and a transposition
//! table that persists across searches.

use std::sync::Arc;

use tracing::debug;

use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::move_generation::move_generator::generate_legal_moves;
use crate::move_generation::move_request::MoveRequest;
use crate::moves::chess_move::Move;
use crate::position::position::Position;
use crate::position::setup::{BoardSetup, Geometry};
use crate::position::undo_state::UndoState;
use crate::search::board_scoring::{CompositeEvaluator, Evaluator};
use crate::search::iterative_deepening::{iterative_deepening_search, SearchConfig, SearchResult};
use crate::search::transposition_table::TranspositionTable;
use crate::search::zobrist::ZobristKeys;
use crate::tables::attack_tables::AttackTables;

pub struct Engine {
    config: EngineConfig,
    setup: BoardSetup,
    position: Position,
    history: Vec<(Move, UndoState)>,
    tt: TranspositionTable,
    evaluator: Box<dyn Evaluator>,
}

impl Engine {
    pub fn new(setup: &BoardSetup, config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_evaluator(setup, config, Box::new(CompositeEvaluator::default()))
    }

    pub fn with_evaluator(
        setup: &BoardSetup,
        config: EngineConfig,
        evaluator: Box<dyn Evaluator>,
    ) -> Result<Self, EngineError> {
        let position = build_position(setup, &config, None)?;
        Ok(Self {
            config,
            setup: setup.clone(),
            position,
            history: Vec::new(),
            tt: TranspositionTable::new_with_mb(config.tt_size_mb),
            evaluator,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn history(&self) -> impl Iterator<Item = &Move> {
        self.history.iter().map(|(mv, _)| mv)
    }

    /// Replace the game. Tables are reused when the geometry is unchanged;
    /// the transposition table is kept.
    pub fn set_position(&mut self, setup: &BoardSetup) -> Result<(), EngineError> {
        self.position = build_position(setup, &self.config, Some(&self.position))?;
        self.setup = setup.clone();
        self.history.clear();
        Ok(())
    }

    /// Back to the last installed setup with an empty transposition table.
    pub fn new_game(&mut self) -> Result<(), EngineError> {
        self.position = build_position(&self.setup, &self.config, Some(&self.position))?;
        self.history.clear();
        self.tt.clear();
        debug!("new game");
        Ok(())
    }

    pub fn legal_moves(&mut self) -> Vec<Move> {
        generate_legal_moves(&mut self.position)
    }

    pub fn apply_move_request(&mut self, request: MoveRequest) -> Result<Move, EngineError> {
        let (mv, undo) = self.position.apply_move_request(request)?;
        self.history.push((mv, undo));
        Ok(mv)
    }

    /// Undo the most recent move, if any.
    pub fn take_back(&mut self) -> Option<Move> {
        let (mv, undo) = self.history.pop()?;
        self.position.unmake_move(&mv, undo);
        Some(mv)
    }

    pub fn find_best_move(&mut self, depth: u8) -> Result<SearchResult, EngineError> {
        let config = SearchConfig {
            max_depth: depth,
            verify_hash: self.config.verify_hash,
        };
        let result = iterative_deepening_search(
            &mut self.position,
            self.evaluator.as_ref(),
            &mut self.tt,
            config,
        )?;
        Ok(result)
    }

    /// Search with the configured depth and play the chosen move.
    pub fn play_best_move(&mut self) -> Result<Option<Move>, EngineError> {
        let result = self.find_best_move(self.config.max_depth)?;
        let Some(mv) = result.best_move else {
            return Ok(None);
        };
        if let Some(undo) = self.position.make_move(&mv) {
            self.history.push((mv, undo));
            return Ok(Some(mv));
        }
        Ok(None)
    }
}

fn build_position(
    setup: &BoardSetup,
    config: &EngineConfig,
    previous: Option<&Position>,
) -> Result<Position, EngineError> {
    let geometry = Geometry::new(setup.width, setup.height)?;
    let reusable = previous.filter(|p| {
        p.geometry() == geometry && p.zobrist_keys().seed() == config.zobrist_seed
    });
    let (tables, keys) = match reusable {
        Some(p) => (p.shared_tables(), p.zobrist_keys()),
        None => (
            Arc::new(AttackTables::new(geometry)),
            Arc::new(ZobristKeys::new(geometry, config.zobrist_seed)),
        ),
    };
    Ok(Position::with_tables(setup, tables, keys)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{MoveRejection, PositionError};
    use crate::position::chess_types::*;
    use crate::test_support::parse_square;

    fn small_config() -> EngineConfig {
        EngineConfig {
            tt_size_mb: 1,
            max_depth: 2,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn engine_plays_and_takes_back_moves() {
        let mut engine = Engine::new(&BoardSetup::standard(), small_config()).expect("engine");
        let start = engine.position().snapshot();
        let mv = engine
            .apply_move_request(MoveRequest::new(parse_square("e2", 8), parse_square("e4", 8)))
            .expect("legal");
        assert_eq!(engine.history().count(), 1);
        assert_eq!(engine.take_back(), Some(mv));
        assert_eq!(engine.take_back(), None);
        assert_eq!(engine.position().snapshot(), start);
    }

    #[test]
    fn rejected_request_surfaces_as_engine_error() {
        let mut engine = Engine::new(&BoardSetup::standard(), small_config()).expect("engine");
        let err = engine
            .apply_move_request(MoveRequest::new(parse_square("e2", 8), parse_square("e5", 8)))
            .expect_err("no such move");
        assert!(matches!(
            err,
            EngineError::Rejected(MoveRejection::NoSuchMove { .. })
        ));
    }

    #[test]
    fn find_best_move_keeps_tt_between_calls_until_new_game() {
        let mut engine = Engine::new(&BoardSetup::standard(), small_config()).expect("engine");
        let first = engine.find_best_move(2).expect("search");
        assert!(first.best_move.is_some());
        assert!(first.tt_stats.stores > 0);

        let second = engine.find_best_move(2).expect("search");
        assert!(second.tt_stats.stores > first.tt_stats.stores);

        engine.new_game().expect("reset");
        let fresh = engine.find_best_move(1).expect("search");
        assert_eq!(fresh.tt_stats.stores, 1);
    }

    #[test]
    fn play_best_move_advances_the_game() {
        let mut engine = Engine::new(&BoardSetup::standard(), small_config()).expect("engine");
        let played = engine.play_best_move().expect("search").expect("a move");
        assert_eq!(engine.history().copied().collect::<Vec<_>>(), vec![played]);
        assert_eq!(engine.position().side_to_move(), Color::Black);
    }

    #[test]
    fn set_position_handles_new_geometry_and_bad_setups() {
        let mut engine = Engine::new(&BoardSetup::standard(), small_config()).expect("engine");
        let wide = BoardSetup::empty(10, 6)
            .with_piece(0, 0, Piece::new(PieceKind::King, Color::White))
            .with_piece(9, 5, Piece::new(PieceKind::King, Color::Black));
        engine.set_position(&wide).expect("valid setup");
        assert_eq!(engine.position().width(), 10);

        let err = engine
            .set_position(&BoardSetup::empty(8, 8))
            .expect_err("no kings");
        assert!(matches!(err, EngineError::Position(PositionError::MissingKing(_))));
        assert_eq!(engine.position().width(), 10);
    }
}
