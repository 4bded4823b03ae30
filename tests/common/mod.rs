//! Shared helpers for the integration tests

#![allow(dead_code)]

use minimax_chess::move_generator::MoveGenerator;
use minimax_chess::ordering::MoveOrderer;
use minimax_chess::search::{adjust_mate_distance, Score, MATE_SCORE};
use minimax_chess::{Board, EngineConfig, Move, StaticEvaluator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub mod positions {
    pub const WHITE_MATE_IN_ONE: &str = "6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 0 1";
    pub const BLACK_MATE_IN_ONE: &str = "4q1k1/8/8/8/8/8/5PPP/6K1 b - - 0 1";
    /// Rb7 leaves Kg8 as the only reply, then Ra8 mates
    pub const WHITE_MATE_IN_TWO: &str = "7k/8/8/8/8/8/R7/1R4K1 w - - 0 1";
    pub const BLACK_STALEMATED: &str = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1";
    pub const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    pub const QUIET_MIDDLEGAME: &str = "4k3/ppp2ppp/2n5/3q4/3P4/2N2N2/PP3PPP/3QK3 w - - 0 1";
}

pub fn board(fen: &str) -> Board {
    Board::from_fen(fen).unwrap()
}

/// Find the legal move with the given UCI text
pub fn legal_move(board: &Board, uci: &str) -> Move {
    MoveGenerator::new()
        .generate_legal_moves(board)
        .into_iter()
        .find(|mv| mv.to_uci() == uci)
        .unwrap_or_else(|| panic!("{} is not legal in {}", uci, board.to_fen()))
}

/// Play a sequence of UCI moves permanently
pub fn play(board: &mut Board, moves: &[&str]) {
    for uci in moves {
        let mv = legal_move(board, uci);
        board.make_move(&mv);
    }
}

/// Same position with colors swapped and the board flipped top to bottom
pub fn mirror_fen(fen: &str) -> String {
    let fields: Vec<&str> = fen.split_whitespace().collect();

    let placement = fields[0]
        .split('/')
        .rev()
        .map(|rank| rank.chars().map(swap_case).collect::<String>())
        .collect::<Vec<_>>()
        .join("/");

    let side = if fields[1] == "w" { "b" } else { "w" };

    let castling = if fields[2] == "-" {
        "-".to_string()
    } else {
        let swapped: String = fields[2].chars().map(swap_case).collect();
        let mut ordered: Vec<char> = swapped.chars().collect();
        ordered.sort_by_key(|c| "KQkq".find(*c));
        ordered.into_iter().collect()
    };

    let en_passant = match fields[3] {
        "-" => "-".to_string(),
        ep => {
            let mut chars = ep.chars();
            let file = chars.next().unwrap_or('a');
            let rank = chars.next().and_then(|r| r.to_digit(10)).unwrap_or(1);
            format!("{}{}", file, 9 - rank)
        }
    };

    format!("{} {} {} {} {} {}", placement, side, castling, en_passant, fields[4], fields[5])
}

fn swap_case(c: char) -> char {
    if c.is_ascii_uppercase() {
        c.to_ascii_lowercase()
    } else {
        c.to_ascii_uppercase()
    }
}

/// Plain minimax with no pruning, visiting moves in the engine's order and
/// counting nodes the same way
pub fn reference_minimax<E: StaticEvaluator>(
    board: &mut Board,
    depth: i32,
    maximizing: bool,
    evaluator: &E,
    config: &EngineConfig,
    nodes: &mut u64,
) -> Score {
    *nodes += 1;
    let gen = MoveGenerator::new();
    let moves = gen.generate_legal_moves(board);

    if moves.is_empty() {
        if gen.is_in_check(board) {
            return if maximizing { -MATE_SCORE } else { MATE_SCORE };
        }
        return 0;
    }
    if board.is_automatic_draw() {
        return 0;
    }
    if depth <= 0 {
        return evaluator.evaluate_leaf(board).unwrap();
    }

    let moves = MoveOrderer::new(evaluator, config).order_legal(board, moves).unwrap();
    let mut best = if maximizing { Score::MIN } else { Score::MAX };
    for mv in moves {
        let mut child = board.push(mv);
        let value =
            adjust_mate_distance(reference_minimax(&mut child, depth - 1, !maximizing, evaluator, config, nodes));
        best = if maximizing { best.max(value) } else { best.min(value) };
    }
    best
}

/// Root choice computed the slow way: every branch fully expanded, the first
/// move reaching the best value wins
pub fn reference_root<E: StaticEvaluator>(
    board: &mut Board,
    depth: i32,
    evaluator: &E,
    config: &EngineConfig,
) -> (Move, Score, u64) {
    let gen = MoveGenerator::new();
    let maximize = board.white_to_move;
    let mut nodes = 0;
    let mut best: Option<(Move, Score)> = None;

    let legal = gen.generate_legal_moves(board);
    let moves = MoveOrderer::new(evaluator, config).order_legal(board, legal).unwrap();
    for mv in moves {
        let mut child = board.push(mv);
        let value = if child.can_claim_draw() && !gen.is_checkmate(&child) {
            0
        } else {
            reference_minimax(&mut child, depth - 1, !maximize, evaluator, config, &mut nodes)
        };
        let improves = match best {
            None => true,
            Some((_, b)) if maximize => value > b,
            Some((_, b)) => value < b,
        };
        if improves {
            best = Some((mv, value));
        }
    }

    let (mv, score) = best.unwrap();
    (mv, score, nodes)
}

/// Random legal playout from the starting position, stopping early if the game ends
pub fn random_playout(seed: u64, plies: usize) -> Board {
    let mut rng = StdRng::seed_from_u64(seed);
    let gen = MoveGenerator::new();
    let mut board = Board::new();

    for _ in 0..plies {
        let moves = gen.generate_legal_moves(&board);
        if moves.is_empty() {
            break;
        }
        let mv = moves[rng.gen_range(0..moves.len())];
        board.make_move(&mv);
    }
    board
}
