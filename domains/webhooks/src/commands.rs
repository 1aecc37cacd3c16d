//! Chat command grammar
//!
//! Messages starting with `!` are commands; everything else is
//! conversational and goes to the digest engine. Parsing never fails:
//! a malformed threshold argument becomes `InvalidThreshold` so the
//! dispatcher can reply with guidance instead of dropping the message.

/// A parsed inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMessage {
    /// Plain chat text, to be buffered.
    Conversational,
    /// `!threshold <n>` with a valid positive integer argument.
    SetThreshold(i64),
    /// `!threshold` with a missing, non-numeric, or out-of-range argument.
    InvalidThreshold,
    /// `!digest` — request an immediate digest.
    Digest,
    /// Any other `!`-prefixed text.
    Unknown,
}

/// Classify one message text.
pub fn parse(text: &str) -> ParsedMessage {
    let trimmed = text.trim();
    if !trimmed.starts_with('!') {
        return ParsedMessage::Conversational;
    }

    let mut parts = trimmed.split_whitespace();
    let command = parts.next().unwrap_or_default();

    match command {
        "!digest" => ParsedMessage::Digest,
        "!threshold" => match parts.next().map(str::parse::<i64>) {
            Some(Ok(n)) if n >= 1 => ParsedMessage::SetThreshold(n),
            _ => ParsedMessage::InvalidThreshold,
        },
        _ => ParsedMessage::Unknown,
    }
}
