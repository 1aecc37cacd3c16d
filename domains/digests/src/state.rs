//! State machine for the per-conversation digest cycle
//!
//! Digest states: Idle -> Flushing -> Idle. A flush ends in Idle whether it
//! succeeded (buffer cleared) or failed (buffer preserved); the distinction
//! lives in the events, not the states. Reaching the threshold while a flush
//! is already running is an invalid transition, which is what makes the
//! flight registry a single-flight guard.

pub use recap_common::StateError;

/// Digest cycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestState {
    Idle,
    Flushing,
}

impl DigestState {
    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [DigestState] {
        match self {
            Self::Idle => &[Self::Flushing],
            Self::Flushing => &[Self::Idle],
        }
    }
}

impl std::fmt::Display for DigestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Flushing => write!(f, "flushing"),
        }
    }
}

/// Events that trigger digest cycle transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DigestEvent {
    /// Buffered count reached the threshold (or an on-demand digest was requested)
    ThresholdReached,
    /// Flush summarized and cleared the buffer
    FlushSucceeded,
    /// Flush stopped without clearing the buffer
    FlushFailed,
}

impl std::fmt::Display for DigestEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ThresholdReached => write!(f, "threshold_reached"),
            Self::FlushSucceeded => write!(f, "flush_succeeded"),
            Self::FlushFailed => write!(f, "flush_failed"),
        }
    }
}

/// Digest cycle state machine
pub struct DigestCycleStateMachine;

impl DigestCycleStateMachine {
    /// Attempt a state transition
    pub fn transition(
        current: DigestState,
        event: DigestEvent,
    ) -> Result<DigestState, StateError> {
        let next = match (&current, &event) {
            (DigestState::Idle, DigestEvent::ThresholdReached) => DigestState::Flushing,
            (DigestState::Flushing, DigestEvent::FlushSucceeded) => DigestState::Idle,
            (DigestState::Flushing, DigestEvent::FlushFailed) => DigestState::Idle,
            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition(current: DigestState, event: &DigestEvent) -> bool {
        Self::transition(current, *event).is_ok()
    }
}
