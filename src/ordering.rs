//! Move ordering for alpha-beta pruning
//!
//! Orders legal moves best-first for the side to move so the search meets
//! strong moves early and prunes more. Features and material are computed
//! once per position and shared by every move's score.

use crate::board::{Board, Move};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::evaluation::StaticEvaluator;
use crate::features::{material_score, FeatureSummary};
use crate::move_generator::MoveGenerator;

pub struct MoveOrderer<'a, E: StaticEvaluator> {
    evaluator: &'a E,
    config: &'a EngineConfig,
    move_generator: MoveGenerator,
}

impl<'a, E: StaticEvaluator> MoveOrderer<'a, E> {
    pub fn new(evaluator: &'a E, config: &'a EngineConfig) -> Self {
        Self {
            evaluator,
            config,
            move_generator: MoveGenerator::new(),
        }
    }

    /// All legal moves of the position, best-first for the side to move
    pub fn order(&self, board: &Board) -> EngineResult<Vec<Move>> {
        let legal = self.move_generator.generate_legal_moves(board);
        self.order_legal(board, legal)
    }

    /// Order an already generated legal move list.
    ///
    /// Ordering scores are White-positive, so White sorts descending and
    /// Black ascending. The sort is stable: equal scores keep generation order.
    /// A lone legal move is still scored, so an evaluator failure surfaces at
    /// every node.
    pub fn order_legal(&self, board: &Board, moves: Vec<Move>) -> EngineResult<Vec<Move>> {
        if moves.is_empty() {
            return Ok(moves);
        }

        let features = FeatureSummary::compute(board, board.turn(), self.config);
        let material = material_score(board);
        let endgame = self.evaluator.is_endgame(board);

        let mut scored = moves
            .into_iter()
            .map(|mv| {
                let score = self.evaluator.score_for_ordering(board, &mv, endgame, &features, material)?;
                Ok((mv, score))
            })
            .collect::<EngineResult<Vec<_>>>()?;

        if board.white_to_move {
            scored.sort_by(|a, b| b.1.cmp(&a.1));
        } else {
            scored.sort_by(|a, b| a.1.cmp(&b.1));
        }

        Ok(scored.into_iter().map(|(mv, _)| mv).collect())
    }
}
