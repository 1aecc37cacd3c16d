//! User-facing notification text
//!
//! Canonical reply and push bodies for the digest flow, shared by the
//! dispatcher (synchronous replies) and the flush task (push delivery).

/// Acknowledgment for a message buffered below the threshold.
pub fn buffered(count: usize, threshold: i64) -> String {
    format!("Message saved ({}/{}).", count, threshold)
}

/// Acknowledgment for a message that crossed the threshold.
pub fn summarizing(count: usize) -> String {
    format!("Threshold reached, preparing a digest of {} messages.", count)
}

/// Acknowledgment when a flush is already running for this conversation.
pub fn flush_in_progress() -> String {
    "A digest is already being prepared for this chat.".to_string()
}

/// Acknowledgment for an accepted on-demand digest request.
pub fn digest_scheduled() -> String {
    "Preparing a digest of this chat.".to_string()
}

/// Confirmation for a threshold update.
pub fn threshold_updated(threshold: i64) -> String {
    format!("Digest threshold set to {} messages.", threshold)
}

/// Validation reply for a bad threshold argument.
pub fn invalid_threshold() -> String {
    "Please provide a whole number of at least 1.".to_string()
}

/// Push body when a flush found an empty buffer.
pub fn nothing_to_digest() -> String {
    "There are no messages to digest.".to_string()
}

/// Push body when summarization failed; the buffer is kept.
pub fn digest_failed() -> String {
    "Digest generation failed. Your messages are kept and will be included next time.".to_string()
}

/// Push body wrapping a finished digest.
pub fn digest(summary: &str) -> String {
    format!("Chat digest:\n{}", summary)
}

/// Greeting sent when the bot joins a conversation.
pub fn greeting() -> String {
    "Hello! I will digest this chat every 50 messages. \
     Use !threshold <n> to change the limit or !digest for an immediate digest."
        .to_string()
}

/// Reply for an unrecognized command.
pub fn usage() -> String {
    "Unknown command. Available commands: !threshold <n>, !digest".to_string()
}

/// Reply when the store is unavailable after retries.
pub fn try_again_later() -> String {
    "Something went wrong, please try again later.".to_string()
}
