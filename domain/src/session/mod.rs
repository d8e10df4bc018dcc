//! The debate session state machine.
//!
//! [`DebateSession`](state::DebateSession) is the authoritative lifecycle of
//! one debate; [`SessionAction`](action::SessionAction) is the closed action
//! vocabulary. Legality of a transition is decided by the pure validator in
//! [`machine`]; the apply step mutates only when legal and is a no-op
//! otherwise.

pub mod action;
pub mod machine;
pub mod state;
