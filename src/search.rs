//! Minimax Chess - Search Engine Module
//!
//! Fixed-depth minimax with alpha-beta pruning. White maximizes and Black
//! minimizes, so every score is read from White's perspective:
//! - Checkmate and draw detection at every node
//! - Mate-distance adjustment (shorter mates score higher)
//! - Feature-driven move ordering at every interior node
//! - Claimable draws short-circuit to zero at the root, unless the move mates
//!
//! Each root move is searched with a fresh (-INFINITY, INFINITY) window;
//! pruning only happens inside a branch.

use crate::board::{Board, Move};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::evaluation::{PieceSquareEvaluator, StaticEvaluator};
use crate::move_generator::MoveGenerator;
use crate::ordering::MoveOrderer;
use log::{debug, info, trace};
use std::time::{Duration, Instant};

pub type Score = i32;

/// Score of a delivered checkmate, beyond any evaluation
pub const MATE_SCORE: Score = 1_000_000_000;
/// Scores beyond this magnitude are forced mates
pub const MATE_THRESHOLD: Score = 999_000_000;
/// Open search bound
pub const INFINITY: Score = 2_000_000_000;

/// Move a mate score one step toward zero, so a mate found deeper in the
/// tree scores worse than a shorter one. Ordinary scores pass unchanged.
#[inline]
pub fn adjust_mate_distance(score: Score) -> Score {
    if score > MATE_THRESHOLD {
        score - 1
    } else if score < -MATE_THRESHOLD {
        score + 1
    } else {
        score
    }
}

/// True if `score` encodes a forced mate for either side
#[inline]
pub fn is_mate_score(score: Score) -> bool {
    score.abs() > MATE_THRESHOLD
}

/// Counters for one top-level search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Calls into the recursive search, terminal and leaf calls included
    pub nodes: u64,
    pub elapsed: Duration,
}

impl SearchStats {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Result of a completed search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    pub best_move: Move,
    /// Value of `best_move`, White-positive
    pub score: Score,
    pub stats: SearchStats,
}

pub struct Searcher<E: StaticEvaluator = PieceSquareEvaluator> {
    move_generator: MoveGenerator,
    evaluator: E,
    config: EngineConfig,
}

impl Searcher<PieceSquareEvaluator> {
    /// Searcher with the default evaluator weighted by `config`
    pub fn new(config: EngineConfig) -> Self {
        let evaluator = PieceSquareEvaluator::new(config.weights);
        Self::with_evaluator(evaluator, config)
    }
}

impl Default for Searcher<PieceSquareEvaluator> {
    fn default() -> Self {
        Searcher::new(EngineConfig::default())
    }
}

impl<E: StaticEvaluator> Searcher<E> {
    pub fn with_evaluator(evaluator: E, config: EngineConfig) -> Self {
        Searcher {
            move_generator: MoveGenerator::new(),
            evaluator,
            config,
        }
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn orderer(&self) -> MoveOrderer<'_, E> {
        MoveOrderer::new(&self.evaluator, &self.config)
    }

    /// Best move for the side to move, searched `depth` plies deep.
    ///
    /// The board is borrowed mutably for the whole call and is back in its
    /// original state when the call returns, whether it succeeds or fails.
    pub fn select_move(&self, board: &mut Board, depth: i32) -> EngineResult<SearchReport> {
        if depth <= 0 {
            return Err(EngineError::InvalidDepth { depth });
        }

        let started = Instant::now();
        let mut stats = SearchStats::default();

        let legal = self.move_generator.generate_legal_moves(board);
        if legal.is_empty() {
            return Err(EngineError::NoLegalMoves);
        }
        let moves = self.orderer().order_legal(board, legal)?;

        let maximize = board.white_to_move;
        let mut best: Option<(Move, Score)> = None;

        for mv in moves {
            let value = {
                let mut child = board.push(mv);
                // A mate ends the game before any draw claim
                if child.can_claim_draw() && !self.move_generator.is_checkmate(&child) {
                    0
                } else {
                    self.minimax(&mut child, depth - 1, -INFINITY, INFINITY, !maximize, &mut stats)?
                }
            };
            debug!("root move {} scored {}", mv, value);

            let improves = match best {
                None => true,
                Some((_, best_score)) if maximize => value > best_score,
                Some((_, best_score)) => value < best_score,
            };
            if improves {
                best = Some((mv, value));
            }
        }

        let (best_move, score) = best.ok_or(EngineError::NoLegalMoves)?;
        stats.elapsed = started.elapsed();

        info!(
            "info depth {} nodes {} time {:.3} score {} bestmove {}",
            depth,
            stats.nodes,
            stats.elapsed_seconds(),
            score,
            best_move
        );

        Ok(SearchReport { best_move, score, stats })
    }

    /// Depth-limited minimax with alpha-beta pruning, White-positive
    pub fn minimax(
        &self,
        board: &mut Board,
        depth: i32,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
        stats: &mut SearchStats,
    ) -> EngineResult<Score> {
        stats.nodes += 1;

        let legal = self.move_generator.generate_legal_moves(board);
        if legal.is_empty() && self.move_generator.is_in_check(board) {
            return Ok(if maximizing { -MATE_SCORE } else { MATE_SCORE });
        }
        if legal.is_empty() || board.is_automatic_draw() {
            return Ok(0);
        }

        if depth <= 0 {
            return self.evaluator.evaluate_leaf(board);
        }

        let moves = self.orderer().order_legal(board, legal)?;

        if maximizing {
            let mut best = -INFINITY;
            for mv in moves {
                let value = {
                    let mut child = board.push(mv);
                    self.minimax(&mut child, depth - 1, alpha, beta, false, stats)?
                };
                best = best.max(adjust_mate_distance(value));
                alpha = alpha.max(best);
                if beta <= alpha {
                    trace!("beta cutoff at depth {} after {}", depth, mv);
                    break;
                }
            }
            Ok(best)
        } else {
            let mut best = INFINITY;
            for mv in moves {
                let value = {
                    let mut child = board.push(mv);
                    self.minimax(&mut child, depth - 1, alpha, beta, true, stats)?
                };
                best = best.min(adjust_mate_distance(value));
                beta = beta.min(best);
                if beta <= alpha {
                    trace!("alpha cutoff at depth {} after {}", depth, mv);
                    break;
                }
            }
            Ok(best)
        }
    }
}

/// Search with the default engine and return only the chosen move
pub fn next_move(depth: i32, board: &mut Board) -> EngineResult<Move> {
    Searcher::default().select_move(board, depth).map(|report| report.best_move)
}
