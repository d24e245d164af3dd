//! Request extractors shared by service handlers.

use crate::error::AppError;
use axum::{
    Json,
    async_trait,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that has been deserialized and then checked with `validator`.
///
/// Rejections are reported through [`AppError`] so every failure shares the
/// same `{error, detail}` envelope. Every rejection is a 422: missing or
/// mistyped fields, a body that is not JSON (syntax, content type) and a
/// body that deserializes but fails validation.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection_to_error)?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

fn json_rejection_to_error(rejection: JsonRejection) -> AppError {
    AppError::UnprocessableEntity(anyhow::anyhow!(rejection.body_text()))
}
