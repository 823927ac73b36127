//! Data models for branded login settings

mod branded_login;
mod community;

pub use branded_login::{exceeds_message_limit, message_length, BrandedLogin, MAX_MESSAGE_CHARS};
pub use community::{CommunityId, CommunityRecord, RecordSnapshot};
