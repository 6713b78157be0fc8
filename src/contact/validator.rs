//! Submission validation.

use std::sync::Arc;

use lettre::Address;
use validator::ValidateEmail;

use super::{
    AntibotChallenge, AntibotReason, ChallengeIssuer, ContactError, Submission,
    ValidatedSubmission,
};

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Validates raw submissions.
///
/// Checks run in a fixed order and stop at the first failure:
/// honeypot, arithmetic challenge, required fields, email format.
pub struct SubmissionValidator {
    challenges: Arc<ChallengeIssuer>,
    require_signed_challenge: bool,
}

impl SubmissionValidator {
    /// Create a validator.
    ///
    /// With `require_signed_challenge`, submissions must carry a token
    /// issued by `challenges`.
    pub fn new(challenges: Arc<ChallengeIssuer>, require_signed_challenge: bool) -> Self {
        Self {
            challenges,
            require_signed_challenge,
        }
    }

    /// Issuer used for signed challenges.
    pub fn challenges(&self) -> &Arc<ChallengeIssuer> {
        &self.challenges
    }

    /// Validate a submission.
    pub fn validate(&self, submission: &Submission) -> Result<ValidatedSubmission, ContactError> {
        check_honeypot(submission)?;
        self.check_challenge(submission.antibot.as_ref())?;

        let validated = required_fields(submission)?;
        check_email(&validated.email)?;

        Ok(validated)
    }

    fn check_challenge(&self, antibot: Option<&AntibotChallenge>) -> Result<(), ContactError> {
        let fallback = AntibotChallenge::default();
        let antibot = antibot.unwrap_or(&fallback);

        let (a, b) = match antibot.token() {
            Some(token) => {
                let claims = self.challenges.verify(token).map_err(|e| {
                    tracing::debug!(error = %e, "Rejected challenge token");
                    ContactError::AntibotRejected(AntibotReason::InvalidToken)
                })?;
                (claims.a, claims.b)
            }
            None if self.require_signed_challenge => {
                return Err(ContactError::AntibotRejected(AntibotReason::MissingToken));
            }
            None => antibot.operands(),
        };

        match a.checked_add(b) {
            Some(sum) if sum == antibot.answer() => Ok(()),
            _ => Err(ContactError::AntibotRejected(AntibotReason::WrongAnswer)),
        }
    }
}

fn check_honeypot(submission: &Submission) -> Result<(), ContactError> {
    if submission.honeypot_filled() {
        return Err(ContactError::AntibotRejected(AntibotReason::Honeypot));
    }
    Ok(())
}

fn trimmed(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or_default()
}

fn required_fields(submission: &Submission) -> Result<ValidatedSubmission, ContactError> {
    let name = trimmed(&submission.name);
    let email = trimmed(&submission.email);
    let message = trimmed(&submission.message);

    let missing: Vec<&'static str> = [("name", name), ("email", email), ("message", message)]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

    if !missing.is_empty() {
        return Err(ContactError::MissingFields(missing));
    }

    let phone = trimmed(&submission.phone);

    Ok(ValidatedSubmission {
        name: name.to_string(),
        email: email.to_string(),
        phone: (!phone.is_empty()).then(|| phone.to_string()),
        message: message.to_string(),
    })
}

/// Validate an email address.
///
/// The address must satisfy the HTML5 address grammar and be accepted by
/// the SMTP transport as a mailbox.
fn check_email(email: &str) -> Result<(), ContactError> {
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ContactError::InvalidEmail);
    }

    if !email.to_owned().validate_email() || email.parse::<Address>().is_err() {
        return Err(ContactError::InvalidEmail);
    }

    Ok(())
}
