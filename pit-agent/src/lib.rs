//! Agent side of the pit invocation protocol.
//!
//! An orchestrator drives a match by handing an agent the current game state
//! and asking for a move, and by announcing game start and end. This crate
//! holds everything that is independent of the HTTP transport:
//!
//! - **[`core`]**: Wire data shapes and typed views over them. No I/O.
//! - **[`agent`]**: The [`Agent`](agent::Agent) contract every bot implements.
//! - **[`policy`]**: Swappable move-selection policies composed into bots.
//! - **[`bots`]**: Reference bots built from a policy, commentary and an RNG.
//! - **[`io`]**: Side-effecting collaborators (child processes, chess engines).
//!
//! The transport lives in the `pit-server` crate.

pub mod agent;
pub mod bots;
pub mod core;
pub mod io;
pub mod policy;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use agent::{Agent, AgentInfo};
pub use crate::core::error::AgentError;
pub use crate::core::types::{GameResult, GameState, GameType, MoveResponse};
