//! Contact-form intake.
//!
//! A submission goes through a single linear pipeline:
//!
//! 1. [`SubmissionValidator`] rejects automated or incomplete submissions
//!    (honeypot, arithmetic challenge, required fields, email format)
//! 2. [`MessageComposer`] turns the validated submission into an
//!    [`OutboundMessage`](crate::mail::OutboundMessage) with header-safe
//!    values and an escaped HTML body
//! 3. [`ContactService`] checks the transport settings and hands the message
//!    to a [`Mailer`](crate::mail::Mailer), with a bounded timeout and a
//!    single attempt
//!
//! Nothing is persisted; failures are reported synchronously as
//! [`ContactError`].

mod challenge;
mod composer;
mod service;
mod submission;
mod validator;

pub use challenge::{ChallengeClaims, ChallengeError, ChallengeIssuer, IssuedChallenge};
pub use composer::{escape_html, header_safe, MessageComposer};
pub use service::ContactService;
pub use submission::{AntibotChallenge, Submission, ValidatedSubmission};
pub use validator::{SubmissionValidator, MAX_EMAIL_LENGTH};

use thiserror::Error;

/// Why the anti-bot check rejected a submission.
///
/// Only logged; clients always get the same generic message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AntibotReason {
    #[error("honeypot field was filled in")]
    Honeypot,

    #[error("challenge answer did not match")]
    WrongAnswer,

    #[error("challenge token was missing")]
    MissingToken,

    #[error("challenge token was invalid or expired")]
    InvalidToken,
}

/// Failure of a contact submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// Wrong HTTP method.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Request body could not be parsed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Honeypot filled in or challenge not solved.
    #[error("anti-bot check failed: {0}")]
    AntibotRejected(AntibotReason),

    /// Required fields are empty, in form order.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Email address is malformed.
    #[error("invalid email address")]
    InvalidEmail,

    /// Transport settings are incomplete.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The transport was called and failed.
    #[error("delivery failed: {0}")]
    DeliveryFailed(String),
}
