//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// Validated JSON extractor that automatically validates requests.
///
/// Deserialization failures (missing fields, wrong types) and validation
/// failures both map to a 422 with the offending fields listed.
///
/// # Example
///
/// ```rust,ignore
/// use serde::Deserialize;
/// use validator::Validate;
/// use review_api::api::extractors::ValidatedJson;
///
/// #[derive(Deserialize, Validate)]
/// struct ReviewRequest {
///     rating: i32,
///     #[validate(length(min = 1))]
///     review: String,
/// }
///
/// async fn create_review(ValidatedJson(payload): ValidatedJson<ReviewRequest>) {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Format validation errors as "field: message" pairs so clients can see
/// which fields failed.
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match e.message.as_ref() {
                Some(m) => format!("{}: {}", field, m),
                None => format!("{}: invalid value", field),
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}
