use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON body extractor that reports malformed or incomplete payloads as the
/// API's standard validation error body instead of axum's plain-text
/// rejection. A payload missing a required field (e.g. contact `name`,
/// lead/task `title`) fails deserialization and surfaces as a 400.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                let message = rejection.body_text();
                Err(match rejection {
                    JsonRejection::JsonDataError(_) => ApiError::validation_error(message),
                    _ => ApiError::bad_request(message),
                })
            }
        }
    }
}
