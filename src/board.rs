//! Minimax Chess - Board Representation Module
//!
//! The board model consumed by the search: a mailbox position with FEN
//! parsing and generation, reversible move execution, position history for
//! repetition detection, and the draw predicates of the game rules.

use crate::error::{EngineError, EngineResult};
use crate::types::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut};

/// Starting position FEN
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[rustfmt::skip]
const STARTING_SQUARES: [u8; 64] = [
    WHITE_ROOK, WHITE_KNIGHT, WHITE_BISHOP, WHITE_QUEEN, WHITE_KING, WHITE_BISHOP, WHITE_KNIGHT, WHITE_ROOK,
    WHITE_PAWN, WHITE_PAWN, WHITE_PAWN, WHITE_PAWN, WHITE_PAWN, WHITE_PAWN, WHITE_PAWN, WHITE_PAWN,
    EMPTY, EMPTY, EMPTY, EMPTY, EMPTY, EMPTY, EMPTY, EMPTY,
    EMPTY, EMPTY, EMPTY, EMPTY, EMPTY, EMPTY, EMPTY, EMPTY,
    EMPTY, EMPTY, EMPTY, EMPTY, EMPTY, EMPTY, EMPTY, EMPTY,
    EMPTY, EMPTY, EMPTY, EMPTY, EMPTY, EMPTY, EMPTY, EMPTY,
    BLACK_PAWN, BLACK_PAWN, BLACK_PAWN, BLACK_PAWN, BLACK_PAWN, BLACK_PAWN, BLACK_PAWN, BLACK_PAWN,
    BLACK_ROOK, BLACK_KNIGHT, BLACK_BISHOP, BLACK_QUEEN, BLACK_KING, BLACK_BISHOP, BLACK_KNIGHT, BLACK_ROOK,
];

/// Represents a chess move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from_sq: usize,
    pub to_sq: usize,
    pub promotion: u8,
    pub is_castling: bool,
    pub is_en_passant: bool,
}

impl Move {
    pub fn new(from_sq: usize, to_sq: usize) -> Self {
        Move {
            from_sq,
            to_sq,
            promotion: 0,
            is_castling: false,
            is_en_passant: false,
        }
    }

    pub fn with_promotion(from_sq: usize, to_sq: usize, promotion: u8) -> Self {
        Move { promotion, ..Move::new(from_sq, to_sq) }
    }

    pub fn castling(from_sq: usize, to_sq: usize) -> Self {
        Move { is_castling: true, ..Move::new(from_sq, to_sq) }
    }

    pub fn en_passant(from_sq: usize, to_sq: usize) -> Self {
        Move { is_en_passant: true, ..Move::new(from_sq, to_sq) }
    }

    /// Convert move to UCI notation (e.g., "e2e4", "e7e8q")
    pub fn to_uci(&self) -> String {
        let mut uci = format!("{}{}", square_name(self.from_sq), square_name(self.to_sq));
        let promo_char = match self.promotion {
            QUEEN => Some('q'),
            ROOK => Some('r'),
            BISHOP => Some('b'),
            KNIGHT => Some('n'),
            _ => None,
        };
        if let Some(c) = promo_char {
            uci.push(c);
        }
        uci
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

/// Information needed to undo a move
#[derive(Clone, Copy, Debug)]
pub struct UndoInfo {
    pub captured_piece: u8,
    pub castling_rights: u8,
    pub en_passant_square: i8,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
    pub moved_piece: u8,
}

/// Chess board representation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    /// 64-element array representing the board (0=a1, 1=b1, ..., 63=h8)
    pub squares: [u8; 64],
    pub white_to_move: bool,
    /// Bitmask for castling rights (1=K, 2=Q, 4=k, 8=q)
    pub castling_rights: u8,
    /// Target square for en passant (-1 if none)
    pub en_passant_square: i8,
    /// Plies since last pawn move or capture
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
    /// Hashes of every position reached, current one last
    pub position_history: Vec<u64>,
}

fn invalid_fen(fen: &str, reason: impl Into<String>) -> EngineError {
    EngineError::InvalidFen {
        fen: fen.to_string(),
        reason: reason.into(),
    }
}

impl Board {
    /// Create a new board with the starting position
    pub fn new() -> Self {
        let mut board = Board {
            squares: STARTING_SQUARES,
            white_to_move: true,
            castling_rights: CASTLE_WK | CASTLE_WQ | CASTLE_BK | CASTLE_BQ,
            en_passant_square: -1,
            halfmove_clock: 0,
            fullmove_number: 1,
            position_history: Vec::new(),
        };
        board.position_history.push(board.compute_hash());
        board
    }

    /// Create a board from a FEN string
    pub fn from_fen(fen: &str) -> EngineResult<Self> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        let placement = parts.first().ok_or_else(|| invalid_fen(fen, "empty string"))?;

        let mut board = Board {
            squares: [EMPTY; 64],
            white_to_move: true,
            castling_rights: 0,
            en_passant_square: -1,
            halfmove_clock: 0,
            fullmove_number: 1,
            position_history: Vec::new(),
        };

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(invalid_fen(fen, format!("expected 8 ranks, found {}", ranks.len())));
        }

        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i;
            let mut file = 0usize;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                } else if let Some(piece) = fen_to_piece(c) {
                    if file >= 8 {
                        return Err(invalid_fen(fen, format!("rank {} is too long", rank + 1)));
                    }
                    board.squares[rank * 8 + file] = piece;
                    file += 1;
                } else {
                    return Err(invalid_fen(fen, format!("unexpected character '{}'", c)));
                }
            }
            if file != 8 {
                return Err(invalid_fen(fen, format!("rank {} does not cover 8 files", rank + 1)));
            }
        }

        for king in [WHITE_KING, BLACK_KING] {
            let count = board.squares.iter().filter(|&&p| p == king).count();
            if count != 1 {
                return Err(invalid_fen(fen, format!("expected one king per side, found {}", count)));
            }
        }

        // Active color
        if let Some(side) = parts.get(1) {
            board.white_to_move = match *side {
                "w" => true,
                "b" => false,
                other => return Err(invalid_fen(fen, format!("bad side to move '{}'", other))),
            };
        }

        // Castling rights
        if let Some(castling) = parts.get(2).filter(|s| **s != "-") {
            for c in castling.chars() {
                match c {
                    'K' => board.castling_rights |= CASTLE_WK,
                    'Q' => board.castling_rights |= CASTLE_WQ,
                    'k' => board.castling_rights |= CASTLE_BK,
                    'q' => board.castling_rights |= CASTLE_BQ,
                    _ => return Err(invalid_fen(fen, format!("bad castling flag '{}'", c))),
                }
            }
        }

        // En passant square
        if let Some(ep) = parts.get(3).filter(|s| **s != "-") {
            let sq = parse_square(ep).ok_or_else(|| invalid_fen(fen, format!("bad en passant square '{}'", ep)))?;
            board.en_passant_square = sq as i8;
        }

        if let Some(clock) = parts.get(4) {
            board.halfmove_clock =
                clock.parse().map_err(|_| invalid_fen(fen, format!("bad halfmove clock '{}'", clock)))?;
        }
        if let Some(number) = parts.get(5) {
            board.fullmove_number =
                number.parse().map_err(|_| invalid_fen(fen, format!("bad fullmove number '{}'", number)))?;
        }

        board.position_history.push(board.compute_hash());

        Ok(board)
    }

    /// Generate FEN string from current board state
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8).rev() {
            let mut empty_count = 0;
            for file in 0..8 {
                let piece = self.squares[rank * 8 + file];
                match piece_to_fen(piece) {
                    None => empty_count += 1,
                    Some(c) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(c);
                    }
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if self.white_to_move { 'w' } else { 'b' });

        fen.push(' ');
        if self.castling_rights == 0 {
            fen.push('-');
        } else {
            if self.castling_rights & CASTLE_WK != 0 { fen.push('K'); }
            if self.castling_rights & CASTLE_WQ != 0 { fen.push('Q'); }
            if self.castling_rights & CASTLE_BK != 0 { fen.push('k'); }
            if self.castling_rights & CASTLE_BQ != 0 { fen.push('q'); }
        }

        fen.push(' ');
        if self.en_passant_square >= 0 {
            fen.push_str(&square_name(self.en_passant_square as usize));
        } else {
            fen.push('-');
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));

        fen
    }

    /// Hash of the current position for repetition detection
    fn compute_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.squares.hash(&mut hasher);
        self.white_to_move.hash(&mut hasher);
        self.castling_rights.hash(&mut hasher);
        self.en_passant_square.hash(&mut hasher);
        hasher.finish()
    }

    /// Color constant of the side to move
    pub fn turn(&self) -> u8 {
        color_of_side(self.white_to_move)
    }

    pub fn piece_at(&self, sq: usize) -> u8 {
        self.squares.get(sq).copied().unwrap_or(EMPTY)
    }

    /// Squares holding a piece of `color` whose type is in `piece_types`, ascending
    pub fn pieces(&self, color: u8, piece_types: &[u8]) -> Vec<usize> {
        (0..64)
            .filter(|&sq| {
                let piece = self.squares[sq];
                piece != EMPTY
                    && get_piece_color(piece) == color
                    && piece_types.contains(&get_piece_type(piece))
            })
            .collect()
    }

    /// Number of pieces of a given color and type
    pub fn count(&self, color: u8, piece_type: u8) -> i32 {
        self.squares.iter().filter(|&&p| p == (color | piece_type)).count() as i32
    }

    /// Execute a move on the board. Returns UndoInfo for undoing the move later.
    pub fn make_move(&mut self, mv: &Move) -> UndoInfo {
        let from_sq = mv.from_sq;
        let to_sq = mv.to_sq;
        let piece = self.squares[from_sq];
        let captured = self.squares[to_sq];

        let undo = UndoInfo {
            captured_piece: if mv.is_en_passant {
                if self.white_to_move { BLACK_PAWN } else { WHITE_PAWN }
            } else {
                captured
            },
            castling_rights: self.castling_rights,
            en_passant_square: self.en_passant_square,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            moved_piece: piece,
        };

        let piece_type = get_piece_type(piece);
        if piece_type == PAWN || captured != EMPTY {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        if mv.is_en_passant {
            if self.white_to_move {
                self.squares[to_sq - 8] = EMPTY;
            } else {
                self.squares[to_sq + 8] = EMPTY;
            }
        }

        if mv.is_castling {
            if let Some((rook_from, rook_to)) = castling_rook_squares(to_sq) {
                self.squares[rook_to] = self.squares[rook_from];
                self.squares[rook_from] = EMPTY;
            }
        }

        self.squares[to_sq] = piece;
        self.squares[from_sq] = EMPTY;

        if mv.promotion != 0 {
            self.squares[to_sq] = self.turn() | mv.promotion;
        }

        if piece_type == KING {
            if self.white_to_move {
                self.castling_rights &= !(CASTLE_WK | CASTLE_WQ);
            } else {
                self.castling_rights &= !(CASTLE_BK | CASTLE_BQ);
            }
        }

        // Rook moved or captured on its home square
        if from_sq == 0 || to_sq == 0 { self.castling_rights &= !CASTLE_WQ; }
        if from_sq == 7 || to_sq == 7 { self.castling_rights &= !CASTLE_WK; }
        if from_sq == 56 || to_sq == 56 { self.castling_rights &= !CASTLE_BQ; }
        if from_sq == 63 || to_sq == 63 { self.castling_rights &= !CASTLE_BK; }

        self.en_passant_square = -1;
        if piece_type == PAWN && from_sq.abs_diff(to_sq) == 16 {
            self.en_passant_square = ((from_sq + to_sq) / 2) as i8;
        }

        if !self.white_to_move {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        self.white_to_move = !self.white_to_move;
        self.position_history.push(self.compute_hash());

        undo
    }

    /// Undo a move using saved UndoInfo
    pub fn unmake_move(&mut self, mv: &Move, undo: &UndoInfo) {
        self.white_to_move = !self.white_to_move;

        let from_sq = mv.from_sq;
        let to_sq = mv.to_sq;

        self.squares[from_sq] = undo.moved_piece;

        if mv.is_en_passant {
            self.squares[to_sq] = EMPTY;
            if self.white_to_move {
                self.squares[to_sq - 8] = BLACK_PAWN;
            } else {
                self.squares[to_sq + 8] = WHITE_PAWN;
            }
        } else {
            self.squares[to_sq] = undo.captured_piece;
        }

        if mv.is_castling {
            if let Some((rook_from, rook_to)) = castling_rook_squares(to_sq) {
                self.squares[rook_from] = self.squares[rook_to];
                self.squares[rook_to] = EMPTY;
            }
        }

        self.castling_rights = undo.castling_rights;
        self.en_passant_square = undo.en_passant_square;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;

        self.position_history.pop();
    }

    /// Apply a move for the lifetime of the returned guard.
    ///
    /// The move is undone when the guard is dropped, so every exit path of
    /// the caller (normal return, early cutoff, `?` propagation) restores the
    /// position. The guard dereferences to the board for recursive use.
    pub fn push(&mut self, mv: Move) -> MoveGuard<'_> {
        let undo = self.make_move(&mv);
        MoveGuard { board: self, mv, undo }
    }

    /// Find the king's square for the specified color
    pub fn find_king(&self, white: bool) -> Option<usize> {
        let king = if white { WHITE_KING } else { BLACK_KING };
        self.squares.iter().position(|&p| p == king)
    }

    /// Count how many times the current position has occurred
    pub fn repetition_count(&self) -> usize {
        match self.position_history.last() {
            Some(current) => self.position_history.iter().filter(|&h| h == current).count(),
            None => 1,
        }
    }

    /// Threefold repetition (claimable draw)
    pub fn is_repetition(&self) -> bool {
        if self.position_history.len() < 5 {
            return false;
        }
        self.repetition_count() >= 3
    }

    /// Fivefold repetition (automatic draw)
    pub fn is_fivefold_repetition(&self) -> bool {
        self.repetition_count() >= 5
    }

    /// Fifty-move rule (claimable draw)
    pub fn is_fifty_moves(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Seventy-five-move rule (automatic draw)
    pub fn is_seventyfive_moves(&self) -> bool {
        self.halfmove_clock >= 150
    }

    /// True if the side to move could claim a draw right now
    pub fn can_claim_draw(&self) -> bool {
        self.is_fifty_moves() || self.is_repetition()
    }

    /// Draws that end the game without a claim (stalemate excluded, it needs move generation)
    pub fn is_automatic_draw(&self) -> bool {
        self.has_insufficient_material() || self.is_seventyfive_moves() || self.is_fivefold_repetition()
    }

    /// Neither side can possibly deliver mate
    pub fn has_insufficient_material(&self) -> bool {
        self.side_has_insufficient_material(WHITE) && self.side_has_insufficient_material(BLACK)
    }

    /// `color` cannot mate with any sequence of legal moves.
    ///
    /// A lone knight is insufficient against a king with nothing but queens;
    /// bishops are insufficient when every bishop on the board shares one
    /// square color and no pawns or knights remain.
    pub fn side_has_insufficient_material(&self, color: u8) -> bool {
        if !self.pieces(color, &[PAWN, ROOK, QUEEN]).is_empty() {
            return false;
        }

        if self.count(color, KNIGHT) > 0 {
            let own_pieces = self.pieces(color, &[KNIGHT, BISHOP, KING]).len();
            let enemy_support = self.pieces(opponent(color), &[PAWN, KNIGHT, BISHOP, ROOK]);
            return own_pieces <= 2 && enemy_support.is_empty();
        }

        if self.count(color, BISHOP) > 0 {
            let bishops: Vec<usize> =
                [WHITE, BLACK].iter().flat_map(|&c| self.pieces(c, &[BISHOP])).collect();
            let shade = |sq: usize| (sq / 8 + sq % 8) % 2;
            let same_shade = match bishops.first() {
                Some(&first) => bishops.iter().all(|&sq| shade(sq) == shade(first)),
                None => true,
            };
            let blockers = [WHITE, BLACK]
                .iter()
                .any(|&c| !self.pieces(c, &[PAWN, KNIGHT]).is_empty());
            return same_shade && !blockers;
        }

        true
    }
}

/// Rook origin and destination for a castling king landing on `king_to`
fn castling_rook_squares(king_to: usize) -> Option<(usize, usize)> {
    match king_to {
        6 => Some((7, 5)),
        2 => Some((0, 3)),
        62 => Some((63, 61)),
        58 => Some((56, 59)),
        _ => None,
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

/// A move applied to a board, undone on drop
pub struct MoveGuard<'a> {
    board: &'a mut Board,
    mv: Move,
    undo: UndoInfo,
}

impl MoveGuard<'_> {
    pub fn applied_move(&self) -> Move {
        self.mv
    }
}

impl Deref for MoveGuard<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.board.unmake_move(&self.mv, &self.undo);
    }
}
