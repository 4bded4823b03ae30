//! Minimax Chess - fixed-depth move selection
//!
//! A chess move selector written in Rust with support for:
//! - Full FIDE chess rules (board model and legal move generation)
//! - Minimax search with alpha-beta pruning to a fixed depth
//! - Mate-distance score adjustment and draw short-circuiting
//! - Feature-driven move ordering (mobility, threats, open lines, pawn structure)
//! - Explicit per-search statistics

pub mod types;
pub mod error;
pub mod config;
pub mod board;
pub mod move_generator;
pub mod evaluation;
pub mod features;
pub mod ordering;
pub mod search;

pub use board::{Board, Move, MoveGuard};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use evaluation::{PieceSquareEvaluator, StaticEvaluator};
pub use search::{next_move, SearchReport, SearchStats, Searcher};
