//! Minimax Chess - Type definitions and constants
//!
//! Piece and color encodings shared by the board model, the feature
//! extractors and the search. A piece is a single byte: the lower three bits
//! hold the piece type and bits 3-4 hold the color.

/// Piece type constants (lower 3 bits)
pub const EMPTY: u8 = 0;
pub const PAWN: u8 = 1;
pub const KNIGHT: u8 = 2;
pub const BISHOP: u8 = 3;
pub const ROOK: u8 = 4;
pub const QUEEN: u8 = 5;
pub const KING: u8 = 6;

/// Every real piece type, in ascending encoding order
pub const PIECE_TYPES: [u8; 6] = [PAWN, KNIGHT, BISHOP, ROOK, QUEEN, KING];

/// Color constants (bits 3-4)
pub const WHITE: u8 = 8;
pub const BLACK: u8 = 16;

pub const PIECE_MASK: u8 = 0b111;
pub const COLOR_MASK: u8 = 0b11000;

pub const WHITE_PAWN: u8 = WHITE | PAWN;
pub const WHITE_KNIGHT: u8 = WHITE | KNIGHT;
pub const WHITE_BISHOP: u8 = WHITE | BISHOP;
pub const WHITE_ROOK: u8 = WHITE | ROOK;
pub const WHITE_QUEEN: u8 = WHITE | QUEEN;
pub const WHITE_KING: u8 = WHITE | KING;

pub const BLACK_PAWN: u8 = BLACK | PAWN;
pub const BLACK_KNIGHT: u8 = BLACK | KNIGHT;
pub const BLACK_BISHOP: u8 = BLACK | BISHOP;
pub const BLACK_ROOK: u8 = BLACK | ROOK;
pub const BLACK_QUEEN: u8 = BLACK | QUEEN;
pub const BLACK_KING: u8 = BLACK | KING;

/// Castling rights bitmasks
pub const CASTLE_WK: u8 = 1;
pub const CASTLE_WQ: u8 = 2;
pub const CASTLE_BK: u8 = 4;
pub const CASTLE_BQ: u8 = 8;

pub const FILE_NAMES: &[u8; 8] = b"abcdefgh";
pub const RANK_NAMES: &[u8; 8] = b"12345678";

#[inline]
pub fn get_piece_type(piece: u8) -> u8 {
    piece & PIECE_MASK
}

#[inline]
pub fn get_piece_color(piece: u8) -> u8 {
    piece & COLOR_MASK
}

#[inline]
pub fn is_white(piece: u8) -> bool {
    (piece & COLOR_MASK) == WHITE
}

/// The other color
#[inline]
pub fn opponent(color: u8) -> u8 {
    if color == WHITE { BLACK } else { WHITE }
}

/// Color constant for a side-to-move flag
#[inline]
pub fn color_of_side(white_to_move: bool) -> u8 {
    if white_to_move { WHITE } else { BLACK }
}

/// True if `piece_type` names a real piece (pawn through king)
#[inline]
pub fn is_piece_type(piece_type: u8) -> bool {
    PIECE_TYPES.contains(&piece_type)
}

/// Convert square index (0-63) to algebraic notation (e.g., "e4")
pub fn square_name(sq: usize) -> String {
    let file = FILE_NAMES[sq % 8] as char;
    let rank = RANK_NAMES[(sq / 8) % 8] as char;
    format!("{}{}", file, rank)
}

/// Convert algebraic notation to square index
pub fn parse_square(name: &str) -> Option<usize> {
    let mut chars = name.chars();
    let file = match chars.next()? {
        c @ 'a'..='h' => (c as usize) - ('a' as usize),
        _ => return None,
    };
    let rank = match chars.next()? {
        c @ '1'..='8' => (c as usize) - ('1' as usize),
        _ => return None,
    };
    Some(rank * 8 + file)
}

/// FEN piece character to piece value
pub fn fen_to_piece(c: char) -> Option<u8> {
    match c {
        'P' => Some(WHITE_PAWN),
        'N' => Some(WHITE_KNIGHT),
        'B' => Some(WHITE_BISHOP),
        'R' => Some(WHITE_ROOK),
        'Q' => Some(WHITE_QUEEN),
        'K' => Some(WHITE_KING),
        'p' => Some(BLACK_PAWN),
        'n' => Some(BLACK_KNIGHT),
        'b' => Some(BLACK_BISHOP),
        'r' => Some(BLACK_ROOK),
        'q' => Some(BLACK_QUEEN),
        'k' => Some(BLACK_KING),
        _ => None,
    }
}

/// Piece value to FEN character
pub fn piece_to_fen(piece: u8) -> Option<char> {
    let c = match get_piece_type(piece) {
        PAWN => 'p',
        KNIGHT => 'n',
        BISHOP => 'b',
        ROOK => 'r',
        QUEEN => 'q',
        KING => 'k',
        _ => return None,
    };
    match get_piece_color(piece) {
        WHITE => Some(c.to_ascii_uppercase()),
        BLACK => Some(c),
        _ => None,
    }
}
