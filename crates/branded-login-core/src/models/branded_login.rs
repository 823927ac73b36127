//! Branded login sub-record

use serde::{Deserialize, Serialize};

/// Longest custom login message a community may store.
pub const MAX_MESSAGE_CHARS: usize = 280;

/// Community-level branded login settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandedLogin {
    /// Whether the custom message is shown on the community's login screen
    pub is_enabled: bool,
    /// Stored custom message, if any
    #[serde(default)]
    pub message: Option<String>,
}

/// Length of a message in characters (Unicode scalar values, not bytes).
pub fn message_length(message: &str) -> usize {
    message.chars().count()
}

/// Whether a message is over the [`MAX_MESSAGE_CHARS`] limit.
pub fn exceeds_message_limit(message: &str) -> bool {
    message_length(message) > MAX_MESSAGE_CHARS
}
