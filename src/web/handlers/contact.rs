//! Contact form handlers.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::contact::{ContactError, Submission};
use crate::web::dto::{ChallengeResponse, ContactJson, ContactResponse};
use crate::web::error::ApiError;

use super::AppState;

/// POST /api/contact - Validate a submission and relay it to the inbox.
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    ContactJson(submission): ContactJson<Submission>,
) -> Result<Json<ContactResponse>, ApiError> {
    let receipt = state.contact.submit(&submission).await?;
    Ok(Json(receipt.into()))
}

/// GET /api/contact/challenge - Issue a signed arithmetic challenge.
pub async fn issue_challenge(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ChallengeResponse>, ApiError> {
    let challenge = state.contact.challenges().issue().map_err(|e| {
        tracing::error!("Failed to issue challenge: {}", e);
        ApiError::internal()
    })?;
    Ok(Json(challenge.into()))
}

/// Any other method on /api/contact.
pub async fn method_not_allowed() -> ApiError {
    ContactError::MethodNotAllowed.into()
}
