//! End-to-end tests for move selection

mod common;

use common::positions;
use common::{board, legal_move, mirror_fen, play, reference_root};
use minimax_chess::features::FeatureSummary;
use minimax_chess::move_generator::MoveGenerator;
use minimax_chess::search::{Score, MATE_SCORE, MATE_THRESHOLD};
use minimax_chess::{
    next_move, Board, EngineConfig, EngineError, EngineResult, Move, PieceSquareEvaluator, Searcher,
    StaticEvaluator,
};

/// Orders like the default evaluator but cannot score leaves
struct FailingLeafEvaluator {
    inner: PieceSquareEvaluator,
}

impl StaticEvaluator for FailingLeafEvaluator {
    fn evaluate_leaf(&self, _board: &Board) -> EngineResult<Score> {
        Err(EngineError::Evaluation { message: "leaf oracle unavailable".to_string() })
    }

    fn is_endgame(&self, board: &Board) -> bool {
        self.inner.is_endgame(board)
    }

    fn score_for_ordering(
        &self,
        board: &Board,
        mv: &Move,
        is_endgame: bool,
        features: &FeatureSummary,
        material: Score,
    ) -> EngineResult<Score> {
        self.inner.score_for_ordering(board, mv, is_endgame, features, material)
    }
}

#[test]
fn depth_one_from_start_visits_every_reply_once() {
    let mut start = Board::new();
    let report = Searcher::default().select_move(&mut start, 1).unwrap();

    assert_eq!(report.stats.nodes, 20);
    assert!(MoveGenerator::new().generate_legal_moves(&start).contains(&report.best_move));
    assert_eq!(start, Board::new());
}

#[test]
fn non_positive_depth_is_rejected() {
    let mut start = Board::new();
    for depth in [0, -1, -7] {
        let err = Searcher::default().select_move(&mut start, depth).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDepth { depth: d } if d == depth));
    }
}

#[test]
fn position_without_moves_is_an_error() {
    let mut stalemate = board(positions::BLACK_STALEMATED);
    let err = Searcher::default().select_move(&mut stalemate, 2).unwrap_err();
    assert!(matches!(err, EngineError::NoLegalMoves));

    let mut mated = board("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1");
    assert!(matches!(next_move(1, &mut mated), Err(EngineError::NoLegalMoves)));
}

#[test]
fn white_finds_back_rank_mate() {
    for depth in [2, 3] {
        let mut b = board(positions::WHITE_MATE_IN_ONE);
        let report = Searcher::default().select_move(&mut b, depth).unwrap();
        assert_eq!(report.best_move.to_uci(), "e1e8", "depth {}", depth);
        assert!(report.score > MATE_THRESHOLD);
    }
}

#[test]
fn black_finds_back_rank_mate() {
    for depth in [2, 3] {
        let mut b = board(positions::BLACK_MATE_IN_ONE);
        let report = Searcher::default().select_move(&mut b, depth).unwrap();
        assert_eq!(report.best_move.to_uci(), "e8e1", "depth {}", depth);
        assert!(report.score < -MATE_THRESHOLD);
    }
}

#[test]
fn shorter_mates_score_higher() {
    // Immediate mate keeps the full score even when longer mates are also visible
    let mut one = board(positions::WHITE_MATE_IN_ONE);
    let report = Searcher::default().select_move(&mut one, 3).unwrap();
    assert_eq!(report.score, MATE_SCORE);

    // Two plies deeper costs two points
    let mut two = board(positions::WHITE_MATE_IN_TWO);
    let report = Searcher::default().select_move(&mut two, 3).unwrap();
    assert_eq!(report.score, MATE_SCORE - 2);
    assert!(report.score < MATE_SCORE);
}

#[test]
fn next_move_returns_the_selected_move() {
    let mut b = board(positions::WHITE_MATE_IN_ONE);
    assert_eq!(next_move(2, &mut b).unwrap().to_uci(), "e1e8");
}

#[test]
fn board_is_restored_after_search() {
    for fen in [positions::KIWIPETE, positions::QUIET_MIDDLEGAME] {
        let mut b = board(fen);
        let before = b.clone();
        Searcher::default().select_move(&mut b, 2).unwrap();
        assert_eq!(b, before);
        assert_eq!(b.to_fen(), fen);
    }
}

#[test]
fn evaluator_failure_propagates_and_restores_board() {
    let searcher = Searcher::with_evaluator(
        FailingLeafEvaluator { inner: PieceSquareEvaluator::default() },
        EngineConfig::default(),
    );
    let mut b = board(positions::KIWIPETE);
    let before = b.clone();

    let err = searcher.select_move(&mut b, 3).unwrap_err();
    assert!(matches!(err, EngineError::Evaluation { .. }));
    assert_eq!(b, before);
}

#[test]
fn claimable_repetition_at_root_scores_zero_without_search() {
    let mut b = Board::new();
    play(&mut b, &["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1"]);

    let repeat = legal_move(&b, "f6g8");
    {
        let child = b.push(repeat);
        assert!(child.can_claim_draw());
    }

    let legal_count = MoveGenerator::new().generate_legal_moves(&b).len() as u64;
    let report = Searcher::default().select_move(&mut b, 1).unwrap();
    // Every other reply is a single leaf; the repetition is never searched
    assert_eq!(report.stats.nodes, legal_count - 1);
}

#[test]
fn fifty_move_claim_short_circuits_every_branch() {
    let mut b = board("4k3/8/8/8/8/8/8/R3K3 w - - 149 100");
    let report = Searcher::default().select_move(&mut b, 3).unwrap();
    assert_eq!(report.score, 0);
    assert_eq!(report.stats.nodes, 0);
}

#[test]
fn mate_beats_a_fifty_move_claim() {
    // Qe8 mates on the hundredth quiet ply; the mate stands
    let mut b = board("6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 99 80");
    for depth in [1, 2] {
        let report = Searcher::default().select_move(&mut b, depth).unwrap();
        assert_eq!(report.best_move.to_uci(), "e1e8", "depth {}", depth);
        assert!(report.score > MATE_THRESHOLD);
    }

    let mut black = board("4q1k1/8/8/8/8/8/5PPP/6K1 b - - 99 80");
    let report = Searcher::default().select_move(&mut black, 2).unwrap();
    assert_eq!(report.best_move.to_uci(), "e8e1");
    assert!(report.score < -MATE_THRESHOLD);
}

#[test]
fn saturated_clock_searches_without_overflow() {
    let mut b = board("4k3/8/8/8/8/8/8/R3K3 w - - 65535 1");
    let before = b.clone();
    let report = Searcher::default().select_move(&mut b, 1).unwrap();
    assert_eq!(report.score, 0);
    assert_eq!(b, before);
}

#[test]
fn dead_positions_score_zero() {
    let mut knight_only = board("4k3/8/8/8/8/8/8/4KN2 w - - 0 1");
    let report = Searcher::default().select_move(&mut knight_only, 2).unwrap();
    assert_eq!(report.score, 0);
}

#[test]
fn pruning_matches_full_minimax() {
    let evaluator = PieceSquareEvaluator::default();
    let config = EngineConfig::default();
    for fen in [positions::QUIET_MIDDLEGAME, positions::WHITE_MATE_IN_ONE, positions::BLACK_MATE_IN_ONE] {
        for depth in [1, 2] {
            let mut b = board(fen);
            let (expected_move, expected, full_nodes) = reference_root(&mut b, depth, &evaluator, &config);
            let report = Searcher::default().select_move(&mut b, depth).unwrap();
            assert_eq!(report.best_move, expected_move, "{} at depth {}", fen, depth);
            assert_eq!(report.score, expected, "{} at depth {}", fen, depth);
            assert!(report.stats.nodes <= full_nodes);
        }
    }
}

#[test]
fn mirrored_position_negates_the_score() {
    for fen in [positions::QUIET_MIDDLEGAME, positions::WHITE_MATE_IN_ONE] {
        let mut original = board(fen);
        let mut mirrored = board(&mirror_fen(fen));

        let a = Searcher::default().select_move(&mut original, 2).unwrap();
        let b = Searcher::default().select_move(&mut mirrored, 2).unwrap();
        assert_eq!(a.score, -b.score, "{}", fen);
    }
}

#[test]
fn mirror_helper_round_trips() {
    assert_eq!(mirror_fen(&mirror_fen(positions::KIWIPETE)), positions::KIWIPETE);
    assert_eq!(
        mirror_fen("4k3/8/8/8/3Pp3/8/8/4K3 b - d3 0 1"),
        "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1"
    );
}

#[test]
fn configured_weights_reach_the_searcher() {
    let config = EngineConfig::load_from_json(r#"{"weights": {"mobility": 0, "threats": 0}}"#).unwrap();
    let searcher = Searcher::new(config.clone());
    assert_eq!(searcher.config(), &config);

    let mut b = board(positions::WHITE_MATE_IN_ONE);
    assert_eq!(searcher.select_move(&mut b, 2).unwrap().best_move.to_uci(), "e1e8");
}
