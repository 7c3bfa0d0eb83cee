//! State module for tracking category traversal
//!
//! # Components
//!
//! - `WalkState`: the per-category pagination state machine
//!   (`Loading -> Ready -> (Extracting -> Ready)* -> Exhausted`)

mod walk_state;

pub use walk_state::WalkState;
