//! The branch forest and the in-progress fork draft.

mod entities;
mod forest;
mod fork;

pub use entities::Branch;
pub use forest::BranchForest;
pub use fork::ForkDraft;
