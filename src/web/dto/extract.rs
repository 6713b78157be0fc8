//! Request body extraction.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::contact::ContactError;
use crate::web::error::ApiError;

/// JSON extractor whose rejection is the API's own 400 body.
///
/// Axum's default rejection is plain text with varying status codes
/// (415, 422, 400); every one of them becomes `BAD_REQUEST` here.
pub struct ContactJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ContactJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::from(ContactError::BadRequest(e.body_text())))?;

        Ok(ContactJson(value))
    }
}
