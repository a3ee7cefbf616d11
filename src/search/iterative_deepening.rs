//! Iterative deepening search with minimax alpha-beta pruning.
//!
//! White maximizes and Black minimizes over white-positive evaluator scores.
//! Each depth runs a full root pass; the transposition table carries bounds
//! and best moves from one iteration into the next so move ordering improves
//! as the search deepens. Moves are played in place with make/unmake.

use std::time::Instant;

use tracing::info;

use crate::errors::SearchError;
use crate::move_generation::move_generator::{generate_legal_moves, generate_pseudo_moves};
use crate::moves::chess_move::Move;
use crate::position::chess_types::*;
use crate::position::position::Position;
use crate::search::board_scoring::Evaluator;
use crate::search::move_buffers::MoveBufferPool;
use crate::search::move_ordering::MoveOrderer;
use crate::search::transposition_table::{Bound, TTEntry, TTStats, TranspositionTable};

pub const MATE_SCORE: i32 = 1_000_000_000;
const INFINITY: i32 = i32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub max_depth: u8,
    /// Recompute the Zobrist key from scratch after every move made.
    pub verify_hash: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            verify_hash: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationSummary {
    pub depth: u8,
    pub best_move: Option<Move>,
    pub score: i32,
    pub nodes: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub best_score: i32,
    pub reached_depth: u8,
    pub nodes: u64,
    pub elapsed_ms: u64,
    pub nps: u64,
    pub tt_stats: TTStats,
    pub iterations: Vec<IterationSummary>,
}

pub struct Searcher<'a, E: Evaluator + ?Sized> {
    evaluator: &'a E,
    tt: &'a mut TranspositionTable,
    config: SearchConfig,
    buffers: MoveBufferPool,
    nodes: u64,
}

impl<'a, E: Evaluator + ?Sized> Searcher<'a, E> {
    pub fn new(evaluator: &'a E, tt: &'a mut TranspositionTable, config: SearchConfig) -> Self {
        Self {
            evaluator,
            tt,
            config,
            buffers: MoveBufferPool::new(),
            nodes: 0,
        }
    }

    /// Search `position` to the configured depth. The position is restored
    /// before returning, including on error.
    pub fn search(&mut self, position: &mut Position) -> Result<SearchResult, SearchError> {
        if self.config.max_depth == 0 {
            return Err(SearchError::InvalidDepth(0));
        }

        let previous = position.hash_verification();
        if self.config.verify_hash {
            position.set_hash_verification(true);
        }
        let outcome = self.run(position);
        position.set_hash_verification(previous);
        outcome
    }

    fn run(&mut self, position: &mut Position) -> Result<SearchResult, SearchError> {
        let started = Instant::now();
        self.nodes = 0;
        let mut result = SearchResult::default();

        for depth in 1..=self.config.max_depth {
            let nodes_before = self.nodes;
            let (best_move, score) = self.search_root(position, depth)?;
            let nodes = self.nodes - nodes_before;

            result.best_move = best_move;
            result.best_score = score;
            result.reached_depth = depth;
            result.iterations.push(IterationSummary {
                depth,
                best_move,
                score,
                nodes,
            });

            let best = best_move.map_or_else(
                || "none".to_string(),
                |mv| mv.display(position.width()).to_string(),
            );
            info!(depth, score, nodes, best = %best, "search iteration complete");
        }

        result.nodes = self.nodes;
        result.elapsed_ms = started.elapsed().as_millis() as u64;
        result.nps = self.nodes.saturating_mul(1000) / result.elapsed_ms.max(1);
        result.tt_stats = self.tt.stats();
        Ok(result)
    }

    fn search_root(
        &mut self,
        position: &mut Position,
        depth: u8,
    ) -> Result<(Option<Move>, i32), SearchError> {
        self.nodes += 1;
        let key = position.zobrist_key();
        let maximizing = position.side_to_move() == Color::White;
        let tt_move = self.tt.best_move(key);

        let mut buffer = self.buffers.acquire(0);
        generate_pseudo_moves(position, &mut buffer.moves);
        let mut orderer = MoveOrderer::new(&mut buffer, tt_move);

        let (mut alpha, mut beta) = (-INFINITY, INFINITY);
        let mut best_move = None;
        let mut best_score = if maximizing { -INFINITY } else { INFINITY };
        let mut failure = None;

        while let Some(mv) = orderer.next_move() {
            let undo = match position.try_make_move(&mv) {
                Ok(Some(undo)) => undo,
                Ok(None) => continue,
                Err(mismatch) => {
                    failure = Some(SearchError::from(mismatch));
                    break;
                }
            };
            let child = self.alpha_beta(position, depth - 1, alpha, beta, !maximizing, 1);
            position.unmake_move(&mv, undo);
            let score = match child {
                Ok(score) => score,
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            };

            if best_move.is_none()
                || (maximizing && score > best_score)
                || (!maximizing && score < best_score)
            {
                best_score = score;
                best_move = Some(mv);
            }
            if maximizing {
                alpha = alpha.max(score);
            } else {
                beta = beta.min(score);
            }
        }
        self.buffers.release(0, buffer);
        if let Some(err) = failure {
            return Err(err);
        }

        if best_move.is_none() {
            best_score = terminal_score(position, depth);
        }
        self.tt.store(TTEntry {
            key,
            depth,
            score: best_score,
            bound: Bound::Exact,
            best_move,
        });
        Ok((best_move, best_score))
    }

    fn alpha_beta(
        &mut self,
        position: &mut Position,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        ply: usize,
    ) -> Result<i32, SearchError> {
        self.nodes += 1;
        let key = position.zobrist_key();

        let mut tt_move = None;
        if let Some(entry) = self.tt.probe(key) {
            tt_move = entry.best_move;
            if entry.depth >= depth {
                match entry.bound {
                    Bound::Exact => return Ok(entry.score),
                    Bound::Lower => {
                        if entry.score >= beta {
                            return Ok(entry.score);
                        }
                        alpha = alpha.max(entry.score);
                    }
                    Bound::Upper => {
                        if entry.score <= alpha {
                            return Ok(entry.score);
                        }
                        beta = beta.min(entry.score);
                    }
                }
                if alpha >= beta {
                    return Ok(entry.score);
                }
            }
        }

        if depth == 0 {
            return Ok(self.evaluator.evaluate(position));
        }

        // Window the children are searched with, used to classify the result.
        let (window_alpha, window_beta) = (alpha, beta);

        let mut buffer = self.buffers.acquire(ply);
        generate_pseudo_moves(position, &mut buffer.moves);
        let mut orderer = MoveOrderer::new(&mut buffer, tt_move);

        let mut best_score = if maximizing { -INFINITY } else { INFINITY };
        let mut best_move = None;
        let mut cutoff = false;
        let mut failure = None;

        while let Some(mv) = orderer.next_move() {
            let undo = match position.try_make_move(&mv) {
                Ok(Some(undo)) => undo,
                Ok(None) => continue,
                Err(mismatch) => {
                    failure = Some(SearchError::from(mismatch));
                    break;
                }
            };
            let child = self.alpha_beta(position, depth - 1, alpha, beta, !maximizing, ply + 1);
            position.unmake_move(&mv, undo);
            let score = match child {
                Ok(score) => score,
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            };

            if maximizing {
                if best_move.is_none() || score > best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(score);
            } else {
                if best_move.is_none() || score < best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                beta = beta.min(score);
            }
            if alpha >= beta {
                cutoff = true;
                break;
            }
        }
        self.buffers.release(ply, buffer);
        if let Some(err) = failure {
            return Err(err);
        }

        let bound = if best_move.is_none() {
            best_score = terminal_score(position, depth);
            Bound::Exact
        } else if cutoff {
            if maximizing {
                Bound::Lower
            } else {
                Bound::Upper
            }
        } else if maximizing {
            if best_score > window_alpha {
                Bound::Exact
            } else {
                Bound::Upper
            }
        } else if best_score < window_beta {
            Bound::Exact
        } else {
            Bound::Lower
        };

        self.tt.store(TTEntry {
            key,
            depth,
            score: best_score,
            bound,
            best_move,
        });
        Ok(best_score)
    }
}

/// Score of a node with no legal moves. Mates found with more depth left
/// (sooner) are more extreme.
fn terminal_score(position: &Position, depth: u8) -> i32 {
    let side = position.side_to_move();
    if !position.is_king_in_check(side) {
        return 0;
    }
    let mate = MATE_SCORE + i32::from(depth);
    match side {
        Color::White => -mate,
        Color::Black => mate,
    }
}

pub fn iterative_deepening_search<E: Evaluator + ?Sized>(
    position: &mut Position,
    evaluator: &E,
    tt: &mut TranspositionTable,
    config: SearchConfig,
) -> Result<SearchResult, SearchError> {
    Searcher::new(evaluator, tt, config).search(position)
}

/// Follow stored best moves from `position`, stopping at the first missing
/// or illegal one. The position is restored before returning.
pub fn principal_variation(
    position: &mut Position,
    tt: &TranspositionTable,
    max_len: usize,
) -> Vec<Move> {
    let mut line = Vec::new();
    let mut undos = Vec::new();

    while line.len() < max_len {
        let Some(mv) = tt.best_move(position.zobrist_key()) else {
            break;
        };
        if !generate_legal_moves(position).contains(&mv) {
            break;
        }
        let Some(undo) = position.make_move(&mv) else {
            break;
        };
        line.push(mv);
        undos.push(undo);
    }

    for (mv, undo) in line.iter().zip(undos).rev() {
        position.unmake_move(mv, undo);
    }
    line
}
