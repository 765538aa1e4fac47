use axum::async_trait;
use axum::body::HttpBody;
use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::header::CONTENT_LENGTH;
use axum::http::Request;
use axum::{BoxError, Json};
use serde::de::DeserializeOwned;

/// A JSON request body that falls back to `T::default()` when the client sent no body, or sent
/// one without a JSON content type. Malformed JSON is still rejected.
///
/// This lets handlers answer a bare `POST` with their own "field required" validation error
/// instead of a content type rejection.
pub(super) struct JsonOrEmpty<T>(pub T);

#[async_trait]
impl<T, S, B> FromRequest<S, B> for JsonOrEmpty<T>
where
    T: DeserializeOwned + Default,
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
    S: Send + Sync,
{
    type Rejection = JsonRejection;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        let empty = req
            .headers()
            .get(CONTENT_LENGTH)
            .is_some_and(|len| len.as_bytes() == b"0");
        if empty {
            return Ok(Self(T::default()));
        }
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(JsonRejection::MissingJsonContentType(_)) => Ok(Self(T::default())),
            Err(rejection) => Err(rejection),
        }
    }
}
