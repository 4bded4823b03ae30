//! Error types for move selection
//!
//! Contract violations by the caller (bad depth, finished game), malformed
//! input (FEN, configuration) and failures raised by an evaluator.

use thiserror::Error;

/// Errors that can occur while setting up or running a search
#[derive(Error, Debug)]
pub enum EngineError {
    /// Search depth must be a positive number of plies
    #[error("Invalid search depth: {depth} (must be at least 1)")]
    InvalidDepth { depth: i32 },

    /// The root position has no legal moves (the game is already over)
    #[error("No legal moves in the root position")]
    NoLegalMoves,

    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Raised by a static evaluator; passed through the search unchanged
    #[error("Evaluation failed: {message}")]
    Evaluation { message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
