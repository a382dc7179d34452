//! One-shot client for a UCI chess engine.
//!
//! Every query spawns a fresh engine process, feeds it the whole command
//! script on stdin and scans stdout for the `bestmove` line. There is no
//! persistent session.

use std::process::Command;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::io::process::run_with_timeout;

/// How to launch and bound the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineSettings {
    /// Program and arguments, e.g. `["stockfish"]`.
    pub command: Vec<String>,
    /// Search depth passed as `go depth <n>`.
    pub depth: u32,
    /// Wall-clock bound for one query, in milliseconds.
    pub timeout_ms: u64,
    /// Stdout beyond this many bytes is discarded.
    pub output_limit_bytes: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            command: vec!["stockfish".to_string()],
            depth: 10,
            timeout_ms: 30_000,
            output_limit_bytes: 100_000,
        }
    }
}

impl EngineSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Move suggested by the engine, in UCI long algebraic form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineMove {
    pub from: String,
    pub to: String,
    pub promotion: Option<String>,
}

/// Ways the engine collaborator can fail. Callers fall back on any of them.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no position to search")]
    MissingPosition,

    #[error("engine command is empty")]
    NoCommand,

    #[error("engine process failed: {0}")]
    Process(String),

    #[error("engine did not answer within {0:?}")]
    TimedOut(Duration),

    #[error("engine exited with {0}")]
    Exited(String),

    #[error("engine output has no bestmove line")]
    NoBestMove,

    #[error("unparsable engine move `{0}`")]
    MalformedMove(String),

    #[error("engine suggested {0}, which is not a legal move")]
    IllegalMove(String),
}

/// Ask the engine for its best move in the position given by `fen`.
pub fn best_move(settings: &EngineSettings, fen: &str) -> Result<EngineMove, EngineError> {
    let (program, args) = settings.command.split_first().ok_or(EngineError::NoCommand)?;
    let mut cmd = Command::new(program);
    cmd.args(args);

    let script = uci_script(fen, settings.depth);
    let out = run_with_timeout(
        cmd,
        script.as_bytes(),
        settings.timeout(),
        settings.output_limit_bytes,
    )
    .map_err(|e| EngineError::Process(format!("{e:#}")))?;
    if out.timed_out {
        return Err(EngineError::TimedOut(settings.timeout()));
    }

    let stdout = out.stdout_lossy();
    match parse_best_move(&stdout) {
        Err(EngineError::NoBestMove) if !out.status.success() => {
            debug!(stderr = %out.stderr_lossy(), "engine exited without an answer");
            Err(EngineError::Exited(out.status.to_string()))
        }
        other => other,
    }
}

fn uci_script(fen: &str, depth: u32) -> String {
    format!("uci\nisready\nposition fen {fen}\ngo depth {depth}\n")
}

/// Find the first `bestmove` line and decode its move.
pub fn parse_best_move(output: &str) -> Result<EngineMove, EngineError> {
    let token = output
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("bestmove"))
        .ok_or(EngineError::NoBestMove)?
        .split_whitespace()
        .nth(1)
        .ok_or(EngineError::NoBestMove)?;
    parse_uci_move(token)
}

fn parse_uci_move(token: &str) -> Result<EngineMove, EngineError> {
    let malformed = || EngineError::MalformedMove(token.to_string());
    if !token.is_ascii() || !(4..=5).contains(&token.len()) {
        return Err(malformed());
    }

    let (from, rest) = token.split_at(2);
    let (to, promotion) = rest.split_at(2);
    if !is_square(from) || !is_square(to) {
        return Err(malformed());
    }
    let promotion = match promotion {
        "" => None,
        p if matches!(p, "q" | "r" | "b" | "n") => Some(p.to_string()),
        _ => return Err(malformed()),
    };

    Ok(EngineMove {
        from: from.to_string(),
        to: to.to_string(),
        promotion,
    })
}

fn is_square(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 2 && (b'a'..=b'h').contains(&bytes[0]) && (b'1'..=b'8').contains(&bytes[1])
}
