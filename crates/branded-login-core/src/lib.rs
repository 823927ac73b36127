//! branded-login-core - Core library for branded login settings
//!
//! This crate contains the community models, the edit-buffer controller that
//! reconciles a remotely loaded login message with a local edit, and the
//! transports used to load and persist it.

pub mod config;
pub mod controller;
pub mod error;
pub mod graphql;
pub mod models;
pub mod notify;
pub mod panel;
pub mod services;
pub mod store;
pub mod toggle;
pub mod util;

pub use controller::{ControllerState, EditBufferController, ValidationError};
pub use error::{Error, Result};
pub use models::{BrandedLogin, CommunityId, CommunityRecord, RecordSnapshot};
pub use panel::{BrandedLoginPanel, PanelView};
pub use services::{SaveError, SaveRequest};
