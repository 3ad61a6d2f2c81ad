//! Model-context construction from board and repository state

pub mod guidance;
pub mod snapshot;
