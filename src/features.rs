//! Feature extractors used for move ordering
//!
//! Small integer counters computed from a position for one color: mobility,
//! threats, open lines and pawn structure, plus the material score. The
//! piece subsets they look at come from [`EngineConfig`].

use crate::board::Board;
use crate::config::{EngineConfig, FeatureWeights};
use crate::evaluation::piece_value;
use crate::move_generator::MoveGenerator;
use crate::search::{Score, MATE_SCORE};
use crate::types::*;

/// Feature counters of one position, for one color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureSummary {
    pub mobility: i32,
    pub threats: i32,
    pub open_lines: i32,
    pub pawn_structure: i32,
}

impl FeatureSummary {
    pub fn compute(board: &Board, color: u8, config: &EngineConfig) -> Self {
        Self {
            mobility: mobility(board, color, &config.mobility_pieces),
            threats: threats(board, color, &config.threat_pieces),
            open_lines: open_lines(board, color, &config.open_line_pieces),
            pawn_structure: pawn_structure(board, color),
        }
    }

    /// Threats count against the color, everything else for it
    pub fn weighted(&self, weights: &FeatureWeights) -> i32 {
        weights.mobility * self.mobility - weights.threats * self.threats
            + weights.open_lines * self.open_lines
            + weights.pawn_structure * self.pawn_structure
    }
}

/// Material balance from White's perspective.
///
/// A checkmated side to move scores a full mate against it; stalemate and the
/// automatic draws (insufficient material, seventy-five moves, fivefold
/// repetition) score zero whatever the material.
pub fn material_score(board: &Board) -> Score {
    let gen = MoveGenerator::new();
    if gen.generate_legal_moves(board).is_empty() {
        if !gen.is_in_check(board) {
            return 0;
        }
        return if board.white_to_move { -MATE_SCORE } else { MATE_SCORE };
    }
    if board.is_automatic_draw() {
        return 0;
    }

    [PAWN, KNIGHT, BISHOP, ROOK, QUEEN]
        .iter()
        .map(|&pt| piece_value(pt) * (board.count(WHITE, pt) - board.count(BLACK, pt)))
        .sum()
}

/// Legal moves available to `color`'s pieces of the given types
pub fn mobility(board: &Board, color: u8, piece_types: &[u8]) -> i32 {
    let gen = MoveGenerator::new();
    gen.generate_legal_moves_for(board, color == WHITE)
        .iter()
        .filter(|mv| piece_types.contains(&get_piece_type(board.squares[mv.from_sq])))
        .count() as i32
}

/// Enemy pieces of the given types that have a legal move checking `color`'s king
pub fn threats(board: &Board, color: u8, piece_types: &[u8]) -> i32 {
    let gen = MoveGenerator::new();
    let enemy = opponent(color);
    let enemy_white = enemy == WHITE;
    let enemy_moves = gen.generate_legal_moves_for(board, enemy_white);

    // Scratch copy with the enemy on move, probed with apply/undo
    let mut scratch = board.clone();
    if scratch.white_to_move != enemy_white {
        scratch.white_to_move = enemy_white;
        scratch.en_passant_square = -1;
    }

    let mut count = 0;
    for sq in board.pieces(enemy, piece_types) {
        for mv in enemy_moves.iter().filter(|mv| mv.from_sq == sq) {
            let probe = scratch.push(*mv);
            if gen.is_in_check(&probe) {
                count += 1;
                break;
            }
        }
    }
    count
}

/// `color`'s pieces of the given types, counted when `color` has any legal pawn move
pub fn open_lines(board: &Board, color: u8, piece_types: &[u8]) -> i32 {
    let gen = MoveGenerator::new();
    let has_pawn_move = gen
        .generate_legal_moves_for(board, color == WHITE)
        .iter()
        .any(|mv| get_piece_type(board.squares[mv.from_sq]) == PAWN);

    if has_pawn_move {
        board.pieces(color, piece_types).len() as i32
    } else {
        0
    }
}

/// Per pawn: -1 doubled, +1 on a file without enemy pawns, -1 blocked
/// by an enemy pawn directly in front or behind, +1 otherwise.
pub fn pawn_structure(board: &Board, color: u8) -> i32 {
    let own_pawns = board.pieces(color, &[PAWN]);
    let enemy_pawns = board.pieces(opponent(color), &[PAWN]);
    let enemy_pawn = opponent(color) | PAWN;

    own_pawns
        .iter()
        .map(|&sq| {
            let file = sq % 8;
            if own_pawns.iter().filter(|&&p| p % 8 == file).count() > 1 {
                -1
            } else if !enemy_pawns.iter().any(|&p| p % 8 == file) {
                1
            } else {
                let north = sq + 8;
                let blocked = (north < 64 && board.squares[north] == enemy_pawn)
                    || (sq >= 8 && board.squares[sq - 8] == enemy_pawn);
                if blocked { -1 } else { 1 }
            }
        })
        .sum()
}

/// Material plus the side to move's weighted features, White-positive.
///
/// Finished games short-circuit: checkmate keeps its mate score and draws
/// score zero.
pub fn evaluate_position(board: &Board, config: &EngineConfig) -> Score {
    let material = material_score(board);
    let gen = MoveGenerator::new();
    if gen.is_game_over(board) {
        return material;
    }

    let color = board.turn();
    let positional = FeatureSummary::compute(board, color, config).weighted(&config.weights);
    if color == WHITE {
        material + positional
    } else {
        material - positional
    }
}
