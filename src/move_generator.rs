//! Minimax Chess - Move Generator Module
//!
//! Legal move generation (castling, en passant and promotion included), check
//! detection and the game-over predicates that need move generation.

use crate::board::{Board, Move};
use crate::types::*;

const ROOK_DIRECTIONS: [i32; 4] = [8, -8, -1, 1];
const BISHOP_DIRECTIONS: [i32; 4] = [7, 9, -7, -9];
const QUEEN_DIRECTIONS: [i32; 8] = [8, -8, -1, 1, 7, 9, -7, -9];
const KING_DIRECTIONS: [i32; 8] = [8, -8, -1, 1, 7, 9, -7, -9];
const KNIGHT_OFFSETS: [i32; 8] = [17, 15, 10, 6, -6, -10, -15, -17];

const PROMOTION_PIECES: [u8; 4] = [QUEEN, ROOK, BISHOP, KNIGHT];

/// Castling options: (right, king target, squares that must be empty, squares that must be safe)
type CastleOption = (u8, usize, &'static [usize], &'static [usize]);

const WHITE_CASTLES: [CastleOption; 2] = [
    (CASTLE_WK, 6, &[5, 6], &[5, 6]),
    (CASTLE_WQ, 2, &[1, 2, 3], &[2, 3]),
];
const BLACK_CASTLES: [CastleOption; 2] = [
    (CASTLE_BK, 62, &[61, 62], &[61, 62]),
    (CASTLE_BQ, 58, &[57, 58, 59], &[58, 59]),
];

/// Square reached from `sq` by `delta`, unless it leaves the board or wraps
/// around more than `max_file_shift` files.
#[inline]
fn offset_square(sq: usize, delta: i32, max_file_shift: usize) -> Option<usize> {
    let target = sq as i32 + delta;
    if !(0..64).contains(&target) {
        return None;
    }
    let target = target as usize;
    if (target % 8).abs_diff(sq % 8) > max_file_shift {
        return None;
    }
    Some(target)
}

/// Move generator for chess positions
#[derive(Debug, Default, Clone, Copy)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> Self {
        MoveGenerator
    }

    /// Generate all legal moves for the side to move, in board-scan order
    pub fn generate_legal_moves(&self, board: &Board) -> Vec<Move> {
        self.generate_pseudo_legal_moves(board)
            .into_iter()
            .filter(|mv| self.is_legal(board, mv))
            .collect()
    }

    /// Legal moves for either color.
    ///
    /// The side not on move is generated on a copy with the turn flipped and
    /// the en passant target cleared, since that target belongs to the mover.
    pub fn generate_legal_moves_for(&self, board: &Board, white: bool) -> Vec<Move> {
        if board.white_to_move == white {
            return self.generate_legal_moves(board);
        }
        let mut flipped = board.clone();
        flipped.white_to_move = white;
        flipped.en_passant_square = -1;
        self.generate_legal_moves(&flipped)
    }

    /// Generate all pseudo-legal moves (may leave king in check)
    pub fn generate_pseudo_legal_moves(&self, board: &Board) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        let color = board.turn();

        for sq in 0..64 {
            let piece = board.squares[sq];
            if piece == EMPTY || get_piece_color(piece) != color {
                continue;
            }

            match get_piece_type(piece) {
                PAWN => self.generate_pawn_moves(board, sq, &mut moves),
                KNIGHT => self.generate_step_moves(board, sq, &KNIGHT_OFFSETS, 2, &mut moves),
                BISHOP => self.generate_sliding_moves(board, sq, &BISHOP_DIRECTIONS, &mut moves),
                ROOK => self.generate_sliding_moves(board, sq, &ROOK_DIRECTIONS, &mut moves),
                QUEEN => self.generate_sliding_moves(board, sq, &QUEEN_DIRECTIONS, &mut moves),
                KING => {
                    self.generate_step_moves(board, sq, &KING_DIRECTIONS, 1, &mut moves);
                    self.generate_castling_moves(board, sq, &mut moves);
                }
                _ => {}
            }
        }

        moves
    }

    fn push_pawn_move(from: usize, to: usize, promo_rank: usize, moves: &mut Vec<Move>) {
        if to / 8 == promo_rank {
            for promo in PROMOTION_PIECES {
                moves.push(Move::with_promotion(from, to, promo));
            }
        } else {
            moves.push(Move::new(from, to));
        }
    }

    fn generate_pawn_moves(&self, board: &Board, sq: usize, moves: &mut Vec<Move>) {
        let color = get_piece_color(board.squares[sq]);
        let white = color == WHITE;

        let direction: i32 = if white { 8 } else { -8 };
        let start_rank = if white { 1 } else { 6 };
        let promo_rank = if white { 7 } else { 0 };

        // Pushes
        if let Some(to_sq) = offset_square(sq, direction, 0) {
            if board.squares[to_sq] == EMPTY {
                Self::push_pawn_move(sq, to_sq, promo_rank, moves);

                if sq / 8 == start_rank {
                    if let Some(to_sq2) = offset_square(to_sq, direction, 0) {
                        if board.squares[to_sq2] == EMPTY {
                            moves.push(Move::new(sq, to_sq2));
                        }
                    }
                }
            }
        }

        // Captures
        for delta in [direction - 1, direction + 1] {
            let Some(to_sq) = offset_square(sq, delta, 1) else {
                continue;
            };

            let target = board.squares[to_sq];
            if target != EMPTY && get_piece_color(target) != color {
                Self::push_pawn_move(sq, to_sq, promo_rank, moves);
            }

            if board.en_passant_square >= 0 && to_sq == board.en_passant_square as usize {
                moves.push(Move::en_passant(sq, to_sq));
            }
        }
    }

    /// Knight and king steps
    fn generate_step_moves(&self, board: &Board, sq: usize, offsets: &[i32], max_file_shift: usize, moves: &mut Vec<Move>) {
        let color = get_piece_color(board.squares[sq]);

        for &delta in offsets {
            if let Some(to_sq) = offset_square(sq, delta, max_file_shift) {
                let target = board.squares[to_sq];
                if target == EMPTY || get_piece_color(target) != color {
                    moves.push(Move::new(sq, to_sq));
                }
            }
        }
    }

    fn generate_sliding_moves(&self, board: &Board, sq: usize, directions: &[i32], moves: &mut Vec<Move>) {
        let color = get_piece_color(board.squares[sq]);

        for &direction in directions {
            let mut current_sq = sq;
            while let Some(next_sq) = offset_square(current_sq, direction, 1) {
                let target = board.squares[next_sq];
                if target == EMPTY {
                    moves.push(Move::new(sq, next_sq));
                } else {
                    if get_piece_color(target) != color {
                        moves.push(Move::new(sq, next_sq));
                    }
                    break;
                }
                current_sq = next_sq;
            }
        }
    }

    fn generate_castling_moves(&self, board: &Board, sq: usize, moves: &mut Vec<Move>) {
        let white = get_piece_color(board.squares[sq]) == WHITE;
        let enemy_is_white = !white;

        if self.is_square_attacked(board, sq, enemy_is_white) {
            return;
        }

        let options = if white { &WHITE_CASTLES } else { &BLACK_CASTLES };

        for &(right, target, empty, safe) in options {
            if board.castling_rights & right != 0
                && empty.iter().all(|&s| board.squares[s] == EMPTY)
                && safe.iter().all(|&s| !self.is_square_attacked(board, s, enemy_is_white))
            {
                moves.push(Move::castling(sq, target));
            }
        }
    }

    /// Check if a square is attacked by the specified color
    pub fn is_square_attacked(&self, board: &Board, sq: usize, by_white: bool) -> bool {
        let attacker_color = color_of_side(by_white);
        let is_attacker = |s: usize, piece_type: u8| board.squares[s] == (attacker_color | piece_type);

        // Pawns attack from one rank behind the target, seen from the attacker
        let pawn_direction: i32 = if by_white { -8 } else { 8 };
        for delta in [pawn_direction - 1, pawn_direction + 1] {
            if offset_square(sq, delta, 1).is_some_and(|s| is_attacker(s, PAWN)) {
                return true;
            }
        }

        if KNIGHT_OFFSETS
            .iter()
            .any(|&d| offset_square(sq, d, 2).is_some_and(|s| is_attacker(s, KNIGHT)))
        {
            return true;
        }

        if KING_DIRECTIONS
            .iter()
            .any(|&d| offset_square(sq, d, 1).is_some_and(|s| is_attacker(s, KING)))
        {
            return true;
        }

        ROOK_DIRECTIONS
            .iter()
            .any(|&d| self.check_sliding_attack(board, sq, d, attacker_color, &[ROOK, QUEEN]))
            || BISHOP_DIRECTIONS
                .iter()
                .any(|&d| self.check_sliding_attack(board, sq, d, attacker_color, &[BISHOP, QUEEN]))
    }

    /// First piece met along `direction` is one of `piece_types` of `attacker_color`
    fn check_sliding_attack(&self, board: &Board, sq: usize, direction: i32, attacker_color: u8, piece_types: &[u8]) -> bool {
        let mut current_sq = sq;
        while let Some(next_sq) = offset_square(current_sq, direction, 1) {
            let piece = board.squares[next_sq];
            if piece != EMPTY {
                return get_piece_color(piece) == attacker_color
                    && piece_types.contains(&get_piece_type(piece));
            }
            current_sq = next_sq;
        }
        false
    }

    /// A move is legal if it does not leave the mover's king attacked
    fn is_legal(&self, board: &Board, mv: &Move) -> bool {
        let mut temp_board = board.clone();
        temp_board.make_move(mv);

        let mover_is_white = !temp_board.white_to_move;
        match temp_board.find_king(mover_is_white) {
            Some(sq) => !self.is_square_attacked(&temp_board, sq, temp_board.white_to_move),
            None => false,
        }
    }

    /// Check if the current side's king is in check
    pub fn is_in_check(&self, board: &Board) -> bool {
        match board.find_king(board.white_to_move) {
            Some(king_sq) => self.is_square_attacked(board, king_sq, !board.white_to_move),
            None => false,
        }
    }

    pub fn is_checkmate(&self, board: &Board) -> bool {
        self.is_in_check(board) && self.generate_legal_moves(board).is_empty()
    }

    pub fn is_stalemate(&self, board: &Board) -> bool {
        !self.is_in_check(board) && self.generate_legal_moves(board).is_empty()
    }

    /// Checkmate, stalemate, insufficient material, seventy-five moves or
    /// fivefold repetition. Claimable draws do not end the game.
    pub fn is_game_over(&self, board: &Board) -> bool {
        board.is_automatic_draw() || self.generate_legal_moves(board).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perft(gen: &MoveGenerator, board: &mut Board, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = gen.generate_legal_moves(board);
        if depth == 1 {
            return moves.len() as u64;
        }
        moves
            .into_iter()
            .map(|mv| {
                let mut child = board.push(mv);
                perft(gen, &mut child, depth - 1)
            })
            .sum()
    }

    #[test]
    fn starting_position_perft() {
        let gen = MoveGenerator::new();
        let mut board = Board::new();
        assert_eq!(perft(&gen, &mut board, 1), 20);
        assert_eq!(perft(&gen, &mut board, 2), 400);
        assert_eq!(perft(&gen, &mut board, 3), 8902);
    }

    #[test]
    fn kiwipete_perft_exercises_special_moves() {
        let gen = MoveGenerator::new();
        let mut board =
            Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(perft(&gen, &mut board, 1), 48);
        assert_eq!(perft(&gen, &mut board, 2), 2039);
    }

    #[test]
    fn off_turn_generation_uses_the_requested_color() {
        let gen = MoveGenerator::new();
        let board = Board::new();
        let black = gen.generate_legal_moves_for(&board, false);
        assert_eq!(black.len(), 20);
        assert!(black.iter().all(|mv| !is_white(board.squares[mv.from_sq])));
        assert_eq!(gen.generate_legal_moves_for(&board, true).len(), 20);
    }

    #[test]
    fn detects_checkmate_and_stalemate() {
        let gen = MoveGenerator::new();

        let mate = Board::from_fen("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(gen.is_checkmate(&mate));
        assert!(!gen.is_stalemate(&mate));
        assert!(gen.is_game_over(&mate));

        let stale = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(gen.is_stalemate(&stale));
        assert!(!gen.is_checkmate(&stale));
        assert!(gen.is_game_over(&stale));

        assert!(!gen.is_game_over(&Board::new()));
    }

    #[test]
    fn claimable_draw_does_not_end_the_game() {
        let gen = MoveGenerator::new();
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 100 80").unwrap();
        assert!(board.can_claim_draw());
        assert!(!gen.is_game_over(&board));
    }
}
