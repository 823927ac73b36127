pub mod common;
pub mod completions;
pub mod config;
pub mod create;
pub mod edit;
pub mod set_message;
pub mod show;
pub mod toggle;
