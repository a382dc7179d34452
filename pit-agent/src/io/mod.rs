//! Side-effecting collaborators used by concrete bots.

pub mod engine;
pub mod process;
