//! Minimax Chess - command line front end
//!
//! Usage:
//!     minimax_chess [--config FILE] DEPTH [FEN...]
//!
//! Searches the position (the starting position when no FEN is given) to
//! DEPTH plies and prints a search summary followed by `bestmove <uci>`.
//! Set `RUST_LOG=debug` to see per-root-move scores on stderr.

use minimax_chess::{Board, EngineConfig, EngineError, EngineResult, Searcher};
use std::process::ExitCode;

const USAGE: &str = "usage: minimax_chess [--config FILE] DEPTH [FEN...]";

struct Args {
    config_path: Option<String>,
    depth: i32,
    fen: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut config_path = None;
    let mut depth = None;
    let mut fen_parts: Vec<String> = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args.next().ok_or("--config needs a file argument")?;
                config_path = Some(path);
            }
            "--help" | "-h" => return Err(USAGE.to_string()),
            _ if depth.is_none() => {
                let parsed = arg.parse::<i32>().map_err(|_| format!("invalid depth '{}'", arg))?;
                depth = Some(parsed);
            }
            _ => fen_parts.push(arg),
        }
    }

    let depth = depth.ok_or_else(|| USAGE.to_string())?;
    let fen = if fen_parts.is_empty() { None } else { Some(fen_parts.join(" ")) };
    Ok(Args { config_path, depth, fen })
}

fn run(args: Args) -> EngineResult<()> {
    let config = match &args.config_path {
        Some(path) => EngineConfig::load_from_file(path)?,
        None => EngineConfig::default(),
    };
    let mut board = match &args.fen {
        Some(fen) => Board::from_fen(fen)?,
        None => Board::new(),
    };

    let searcher = Searcher::new(config);
    let report = searcher.select_move(&mut board, args.depth)?;

    println!(
        "info depth {} score {} nodes {} time {:.3}",
        args.depth,
        report.score,
        report.stats.nodes,
        report.stats.elapsed_seconds()
    );
    println!("bestmove {}", report.best_move);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(EngineError::NoLegalMoves) => {
            println!("bestmove (none)");
            ExitCode::from(1)
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(1)
        }
    }
}
