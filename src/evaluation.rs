//! Minimax Chess - Position Evaluation Module
//!
//! The static evaluator consumed by the search. Positions are scored from
//! White's perspective (positive = White is better) considering:
//! - Material balance
//! - Piece positioning (piece-square tables)
//! - Pawn structure (doubled, isolated, passed pawns, chains)
//! - Rook files and seventh rank, bishop pair
//! - Piece mobility
//! - Center control
//!
//! The same evaluator supplies the per-move ordering score.

use crate::board::{Board, Move};
use crate::config::FeatureWeights;
use crate::error::EngineResult;
use crate::features::FeatureSummary;
use crate::search::Score;
use crate::types::*;

/// Leaf and ordering oracles used by the search
pub trait StaticEvaluator {
    /// Score of a position without further search, White-positive
    fn evaluate_leaf(&self, board: &Board) -> EngineResult<Score>;

    fn is_endgame(&self, board: &Board) -> bool;

    /// Desirability of `mv`, White-positive: high is good for White, low is
    /// good for Black. The feature summary and material score are computed
    /// once per position and shared by every move.
    fn score_for_ordering(
        &self,
        board: &Board,
        mv: &Move,
        is_endgame: bool,
        features: &FeatureSummary,
        material: Score,
    ) -> EngineResult<Score>;
}

pub const PIECE_VALUES: [i32; 7] = [
    0,      // EMPTY
    100,    // PAWN
    320,    // KNIGHT
    330,    // BISHOP
    500,    // ROOK
    900,    // QUEEN
    20000,  // KING
];

#[inline]
pub fn piece_value(piece_type: u8) -> i32 {
    PIECE_VALUES.get(piece_type as usize).copied().unwrap_or(0)
}

// Piece-square tables, indexed from White's side (a1 = 0)

#[rustfmt::skip]
const PAWN_PST: [i32; 64] = [
    0,   0,   0,   0,   0,   0,   0,   0,
    5,  10,  10, -20, -20,  10,  10,   5,
    5,  -5, -10,   0,   0, -10,  -5,   5,
    0,   0,   0,  20,  20,   0,   0,   0,
    5,   5,  10,  25,  25,  10,   5,   5,
   10,  10,  20,  30,  30,  20,  10,  10,
   50,  50,  50,  50,  50,  50,  50,  50,
    0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
   -50, -40, -30, -30, -30, -30, -40, -50,
   -40, -20,   0,   5,   5,   0, -20, -40,
   -30,   5,  10,  15,  15,  10,   5, -30,
   -30,   0,  15,  20,  20,  15,   0, -30,
   -30,   5,  15,  20,  20,  15,   5, -30,
   -30,   0,  10,  15,  15,  10,   0, -30,
   -40, -20,   0,   0,   0,   0, -20, -40,
   -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP_PST: [i32; 64] = [
   -20, -10, -10, -10, -10, -10, -10, -20,
   -10,   5,   0,   0,   0,   0,   5, -10,
   -10,  10,  10,  10,  10,  10,  10, -10,
   -10,   0,  10,  10,  10,  10,   0, -10,
   -10,   5,   5,  10,  10,   5,   5, -10,
   -10,   0,   5,  10,  10,   5,   0, -10,
   -10,   0,   0,   0,   0,   0,   0, -10,
   -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK_PST: [i32; 64] = [
    0,   0,   0,   5,   5,   0,   0,   0,
   -5,   0,   0,   0,   0,   0,   0,  -5,
   -5,   0,   0,   0,   0,   0,   0,  -5,
   -5,   0,   0,   0,   0,   0,   0,  -5,
   -5,   0,   0,   0,   0,   0,   0,  -5,
   -5,   0,   0,   0,   0,   0,   0,  -5,
    5,  10,  10,  10,  10,  10,  10,   5,
    0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN_PST: [i32; 64] = [
   -20, -10, -10,  -5,  -5, -10, -10, -20,
   -10,   0,   5,   0,   0,   0,   0, -10,
   -10,   5,   5,   5,   5,   5,   0, -10,
     0,   0,   5,   5,   5,   5,   0,  -5,
    -5,   0,   5,   5,   5,   5,   0,  -5,
   -10,   0,   5,   5,   5,   5,   0, -10,
   -10,   0,   0,   0,   0,   0,   0, -10,
   -20, -10, -10,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
const KING_MIDDLEGAME_PST: [i32; 64] = [
    20,  30,  10,   0,   0,  10,  30,  20,
    20,  20,   0,   0,   0,   0,  20,  20,
   -10, -20, -20, -20, -20, -20, -20, -10,
   -20, -30, -30, -40, -40, -30, -30, -20,
   -30, -40, -40, -50, -50, -40, -40, -30,
   -30, -40, -40, -50, -50, -40, -40, -30,
   -30, -40, -40, -50, -50, -40, -40, -30,
   -30, -40, -40, -50, -50, -40, -40, -30,
];

#[rustfmt::skip]
const KING_ENDGAME_PST: [i32; 64] = [
   -50, -30, -30, -30, -30, -30, -30, -50,
   -30, -30,   0,   0,   0,   0, -30, -30,
   -30, -10,  20,  30,  30,  20, -10, -30,
   -30, -10,  30,  40,  40,  30, -10, -30,
   -30, -10,  30,  40,  40,  30, -10, -30,
   -30, -10,  20,  30,  30,  20, -10, -30,
   -30, -20, -10,   0,   0, -10, -20, -30,
   -50, -40, -30, -20, -20, -30, -40, -50,
];

const DOUBLED_PAWN_PENALTY: i32 = -15;
const ISOLATED_PAWN_PENALTY: i32 = -20;
const PASSED_PAWN_BONUS: [i32; 8] = [0, 10, 20, 35, 60, 100, 150, 0];
const PAWN_CHAIN_BONUS: i32 = 5;

const BISHOP_PAIR_BONUS: i32 = 50;
const ROOK_ON_OPEN_FILE_BONUS: i32 = 25;
const ROOK_ON_SEMI_OPEN_FILE_BONUS: i32 = 15;
const ROOK_ON_7TH_RANK_BONUS: i32 = 30;

const KNIGHT_MOBILITY_BONUS: i32 = 4;
const BISHOP_MOBILITY_BONUS: i32 = 5;
const ROOK_MOBILITY_BONUS: i32 = 3;
const QUEEN_MOBILITY_BONUS: i32 = 2;

const CENTER_SQUARES: [usize; 4] = [27, 28, 35, 36];
const CENTER_PAWN_BONUS: i32 = 15;

const ENDGAME_MATERIAL: i32 = 1300;

// Ordering bonuses not covered by the feature weights
const TRADE_WHEN_AHEAD_BONUS: i32 = 10;
const LOW_MOBILITY: i32 = 10;

const KNIGHT_OFFSETS: [i32; 8] = [17, 15, 10, 6, -6, -10, -15, -17];
const BISHOP_DIRS: [i32; 4] = [7, 9, -7, -9];
const ROOK_DIRS: [i32; 4] = [8, -8, 1, -1];
const QUEEN_DIRS: [i32; 8] = [8, -8, 1, -1, 7, 9, -7, -9];

/// Rank counted from `color`'s own back rank
#[inline]
fn relative_rank(sq: usize, color: u8) -> usize {
    if color == WHITE { sq / 8 } else { 7 - sq / 8 }
}

/// Step from `sq`, rejecting moves off the board or across the edge
#[inline]
fn step(sq: usize, delta: i32, max_file_shift: usize) -> Option<usize> {
    let target = sq as i32 + delta;
    if !(0..64).contains(&target) {
        return None;
    }
    let target = target as usize;
    ((target % 8).abs_diff(sq % 8) <= max_file_shift).then_some(target)
}

fn pst_value(piece_type: u8, sq: usize, color: u8, is_endgame: bool) -> i32 {
    let pst = match piece_type {
        PAWN => &PAWN_PST,
        KNIGHT => &KNIGHT_PST,
        BISHOP => &BISHOP_PST,
        ROOK => &ROOK_PST,
        QUEEN => &QUEEN_PST,
        KING => if is_endgame { &KING_ENDGAME_PST } else { &KING_MIDDLEGAME_PST },
        _ => return 0,
    };
    let index = relative_rank(sq, color) * 8 + sq % 8;
    pst[index]
}

/// Non-king material of one color
fn side_material(board: &Board, color: u8) -> i32 {
    board
        .squares
        .iter()
        .filter(|&&p| p != EMPTY && get_piece_color(p) == color && get_piece_type(p) != KING)
        .map(|&p| piece_value(get_piece_type(p)))
        .sum()
}

/// Pawns per file for one color
fn pawn_files(board: &Board, color: u8) -> [u8; 8] {
    let mut files = [0u8; 8];
    for sq in board.pieces(color, &[PAWN]) {
        files[sq % 8] += 1;
    }
    files
}

fn pawn_structure_for(board: &Board, color: u8) -> i32 {
    let own_files = pawn_files(board, color);
    let enemy_pawn = opponent(color) | PAWN;
    let own_pawn = color | PAWN;
    let forward: i32 = if color == WHITE { 8 } else { -8 };
    let mut score = 0;

    for sq in board.pieces(color, &[PAWN]) {
        let file = sq % 8;

        if own_files[file] > 1 {
            score += DOUBLED_PAWN_PENALTY;
        }

        let has_neighbor = (file > 0 && own_files[file - 1] > 0) || (file < 7 && own_files[file + 1] > 0);
        if !has_neighbor {
            score += ISOLATED_PAWN_PENALTY;
        }

        // No enemy pawn ahead on this or an adjacent file
        let is_passed = (0..64).all(|other| {
            board.squares[other] != enemy_pawn
                || (other % 8).abs_diff(file) > 1
                || relative_rank(other, color) <= relative_rank(sq, color)
        });
        if is_passed {
            score += PASSED_PAWN_BONUS[relative_rank(sq, color)];
        }

        // Defended diagonally from behind
        let defended = [-forward - 1, -forward + 1]
            .into_iter()
            .filter_map(|delta| step(sq, delta, 1))
            .any(|defender| board.squares[defender] == own_pawn);
        if defended {
            score += PAWN_CHAIN_BONUS;
        }
    }

    score
}

fn piece_activity_for(board: &Board, color: u8) -> i32 {
    let own_files = pawn_files(board, color);
    let enemy_files = pawn_files(board, opponent(color));
    let mut score = 0;

    for sq in board.pieces(color, &[ROOK]) {
        let file = sq % 8;
        if own_files[file] == 0 && enemy_files[file] == 0 {
            score += ROOK_ON_OPEN_FILE_BONUS;
        } else if own_files[file] == 0 {
            score += ROOK_ON_SEMI_OPEN_FILE_BONUS;
        }
        if relative_rank(sq, color) == 6 {
            score += ROOK_ON_7TH_RANK_BONUS;
        }
    }

    if board.count(color, BISHOP) >= 2 {
        score += BISHOP_PAIR_BONUS;
    }

    score
}

/// Pseudo-mobility of a single piece (ignores pins and checks)
fn count_mobility(board: &Board, sq: usize, piece_type: u8, color: u8) -> i32 {
    let reachable = |target: usize| {
        let piece = board.squares[target];
        piece == EMPTY || get_piece_color(piece) != color
    };

    if piece_type == KNIGHT {
        return KNIGHT_OFFSETS
            .iter()
            .filter_map(|&d| step(sq, d, 2))
            .filter(|&t| reachable(t))
            .count() as i32;
    }

    let dirs: &[i32] = match piece_type {
        BISHOP => &BISHOP_DIRS,
        ROOK => &ROOK_DIRS,
        QUEEN => &QUEEN_DIRS,
        _ => return 0,
    };

    let mut moves = 0;
    for &d in dirs {
        let mut current = sq;
        while let Some(next) = step(current, d, 1) {
            if board.squares[next] == EMPTY {
                moves += 1;
                current = next;
            } else {
                if reachable(next) {
                    moves += 1;
                }
                break;
            }
        }
    }
    moves
}

fn mobility_for(board: &Board, color: u8) -> i32 {
    board
        .pieces(color, &[KNIGHT, BISHOP, ROOK, QUEEN])
        .into_iter()
        .map(|sq| {
            let piece_type = get_piece_type(board.squares[sq]);
            let bonus = match piece_type {
                KNIGHT => KNIGHT_MOBILITY_BONUS,
                BISHOP => BISHOP_MOBILITY_BONUS,
                ROOK => ROOK_MOBILITY_BONUS,
                _ => QUEEN_MOBILITY_BONUS,
            };
            count_mobility(board, sq, piece_type, color) * bonus
        })
        .sum()
}

fn center_control_for(board: &Board, color: u8) -> i32 {
    let own_pawn = color | PAWN;
    CENTER_SQUARES.iter().filter(|&&sq| board.squares[sq] == own_pawn).count() as i32 * CENTER_PAWN_BONUS
}

/// Everything the evaluation credits to one color
fn evaluate_side(board: &Board, color: u8, is_endgame: bool) -> i32 {
    let placement: i32 = (0..64)
        .filter(|&sq| board.squares[sq] != EMPTY && get_piece_color(board.squares[sq]) == color)
        .map(|sq| {
            let piece_type = get_piece_type(board.squares[sq]);
            piece_value(piece_type) + pst_value(piece_type, sq, color, is_endgame)
        })
        .sum();

    placement
        + pawn_structure_for(board, color)
        + piece_activity_for(board, color)
        + mobility_for(board, color)
        + center_control_for(board, color)
}

/// Material, piece-square and structure evaluator
#[derive(Debug, Clone, Default)]
pub struct PieceSquareEvaluator {
    weights: FeatureWeights,
}

impl PieceSquareEvaluator {
    pub fn new(weights: FeatureWeights) -> Self {
        Self { weights }
    }

    /// Evaluate the position from White's perspective
    pub fn evaluate(&self, board: &Board) -> Score {
        let endgame = self.is_endgame(board);
        evaluate_side(board, WHITE, endgame) - evaluate_side(board, BLACK, endgame)
    }
}

impl StaticEvaluator for PieceSquareEvaluator {
    fn evaluate_leaf(&self, board: &Board) -> EngineResult<Score> {
        Ok(self.evaluate(board))
    }

    fn is_endgame(&self, board: &Board) -> bool {
        side_material(board, WHITE) <= ENDGAME_MATERIAL && side_material(board, BLACK) <= ENDGAME_MATERIAL
    }

    fn score_for_ordering(
        &self,
        board: &Board,
        mv: &Move,
        is_endgame: bool,
        features: &FeatureSummary,
        material: Score,
    ) -> EngineResult<Score> {
        let mover = board.piece_at(mv.from_sq);
        let color = get_piece_color(mover);
        let piece_type = get_piece_type(mover);
        let sign = if color == WHITE { 1 } else { -1 };
        let w = &self.weights;
        let mut score = 0;

        // MVV-LVA
        let victim = if mv.is_en_passant { PAWN } else { get_piece_type(board.piece_at(mv.to_sq)) };
        let is_capture = victim != EMPTY;
        if is_capture {
            score += 10 * piece_value(victim) - piece_value(piece_type);
        }

        if mv.promotion != 0 {
            score += piece_value(mv.promotion);
        }

        score += pst_value(piece_type, mv.to_sq, color, is_endgame) - pst_value(piece_type, mv.from_sq, color, is_endgame);

        if is_capture && material * sign > 0 {
            score += TRADE_WHEN_AHEAD_BONUS;
        }

        match piece_type {
            PAWN => {
                if features.open_lines > 0 {
                    score += w.open_lines;
                }
                if features.pawn_structure < 0 {
                    score -= w.pawn_structure * features.pawn_structure;
                }
            }
            KING if !mv.is_castling => {
                score += w.threats * features.threats;
            }
            KNIGHT | BISHOP => {
                let undeveloped = relative_rank(mv.from_sq, color) == 0;
                if !is_endgame && undeveloped && features.mobility < LOW_MOBILITY {
                    score += w.mobility;
                }
            }
            _ => {}
        }

        Ok(sign * score)
    }
}
