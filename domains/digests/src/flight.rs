//! Per-conversation flush flight registry
//!
//! Grants at most one flush permit per conversation id at any time.
//! Acquisition and release drive the digest cycle state machine; the permit
//! releases on drop, so every exit path of a flush task returns the
//! conversation to idle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::state::{DigestCycleStateMachine, DigestEvent, DigestState};

type Flights = Arc<Mutex<HashMap<String, DigestState>>>;

/// Process-wide registry of in-flight flushes, keyed by conversation id.
#[derive(Debug, Clone, Default)]
pub struct FlightRegistry {
    flights: Flights,
}

impl FlightRegistry {
    pub fn new() -> Self {
        Self {
            flights: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Try to begin a flight for a conversation.
    ///
    /// Returns `None` when the conversation is already flushing, which is
    /// exactly the `ThresholdReached`-while-`Flushing` transition the state
    /// machine rejects.
    pub fn begin(&self, conversation_id: &str) -> Option<FlightPermit> {
        // A poisoned lock means some flush task panicked; the map itself is
        // still coherent, so keep the registry usable
        let mut flights = self.flights.lock().unwrap_or_else(|e| e.into_inner());

        let current = flights
            .get(conversation_id)
            .copied()
            .unwrap_or(DigestState::Idle);

        match DigestCycleStateMachine::transition(current, DigestEvent::ThresholdReached) {
            Ok(next) => {
                flights.insert(conversation_id.to_string(), next);
                Some(FlightPermit {
                    flights: self.flights.clone(),
                    conversation_id: conversation_id.to_string(),
                })
            }
            Err(_) => None,
        }
    }

    /// Check whether a conversation currently has a flush in flight.
    pub fn is_flushing(&self, conversation_id: &str) -> bool {
        let flights = self.flights.lock().unwrap_or_else(|e| e.into_inner());
        matches!(flights.get(conversation_id), Some(DigestState::Flushing))
    }
}

/// RAII permit for a single flush; dropping it returns the conversation
/// to idle.
#[derive(Debug)]
pub struct FlightPermit {
    flights: Flights,
    conversation_id: String,
}

impl Drop for FlightPermit {
    fn drop(&mut self) {
        let mut flights = self.flights.lock().unwrap_or_else(|e| e.into_inner());
        flights.remove(&self.conversation_id);
    }
}
