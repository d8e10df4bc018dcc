//! Debate content types: turns, the consensus result and API summaries.

pub mod consensus;
pub mod summary;
pub mod turn;
