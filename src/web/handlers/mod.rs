//! API handlers.

pub mod contact;

pub use contact::*;

use std::sync::Arc;

use crate::config::Config;
use crate::contact::ContactService;
use crate::mail::Mailer;

/// Shared application state.
pub struct AppState {
    /// Contact pipeline.
    pub contact: ContactService,
}

impl AppState {
    /// Create a new application state.
    pub fn new(contact: ContactService) -> Self {
        Self { contact }
    }

    /// Build state from configuration and a mailer.
    pub fn from_config(config: &Config, mailer: Arc<dyn Mailer>) -> Self {
        Self::new(ContactService::from_config(config, mailer))
    }
}
