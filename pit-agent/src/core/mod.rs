//! Protocol data shapes shared by agents and the runtime server.
//!
//! Core modules are free of I/O. The runtime passes [`types::GameState`] and
//! [`types::GameResult`] through untouched; only agents look inside them.

pub mod chess;
pub mod error;
pub mod types;
