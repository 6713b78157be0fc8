//! contact-relay - contact-form intake service
//!
//! Accepts JSON submissions from a website's contact form, filters out
//! automated ones, and relays the rest to a fixed inbox over SMTP.

pub mod config;
pub mod contact;
pub mod error;
pub mod logging;
pub mod mail;
pub mod web;

pub use config::Config;
pub use contact::{ContactError, ContactService, Submission};
pub use error::{RelayError, Result};
pub use mail::{Mailer, MemoryMailer, SmtpMailer};
pub use web::WebServer;
