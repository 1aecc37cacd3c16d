//! Digests domain: buffering and threshold-triggered summarization
//!
//! The digest engine appends inbound conversational messages to the
//! conversation store, checks the buffered count against the per-conversation
//! threshold, and when the threshold is crossed runs a detached flush task
//! that summarizes the buffer, pushes the digest, and clears the buffer.
//! A per-conversation flight registry guarantees at most one flush at a time.

pub mod engine;
pub mod flight;
pub mod mock;
pub mod notices;
pub mod state;
pub mod summarizer;

// Re-export the domain surface at the crate root for convenience
pub use engine::{DigestEngine, IngestOutcome, TriggerOutcome};
pub use flight::{FlightPermit, FlightRegistry};
pub use mock::MockSummarizer;
pub use state::{DigestCycleStateMachine, DigestEvent, DigestState, StateError};
pub use summarizer::{LlmSummarizer, Summarizer, SummarizerError};
