//! State machine error type
//!
//! Shared by domain state machines; currently only the digest cycle.
//! An invalid transition carries the names of the state and event so the
//! rejection is self-describing in logs.

use thiserror::Error;

/// Errors that can occur during state transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("Invalid transition: cannot leave {from} via {event}")]
    InvalidTransition { from: String, event: String },
}
