use crate::error::Error;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub(crate) struct APIError(anyhow::Error);

fn upstream_status(status: Option<u16>) -> StatusCode {
    status
        .and_then(|s| StatusCode::from_u16(s).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn rejection_status(rejection: &JsonRejection) -> StatusCode {
    match rejection {
        JsonRejection::JsonDataError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        JsonRejection::JsonSyntaxError(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for APIError {
    fn into_response(self) -> Response {
        let any_err = self.0;
        let fallback_body = Json(json!({
            "error": format!("{any_err}"),
        }));
        // Extractor rejections arrive unwrapped from `WithRejection`.
        if let Some(rejection) = any_err.downcast_ref::<JsonRejection>() {
            return (rejection_status(rejection), fallback_body).into_response();
        }
        match any_err.downcast_ref::<Error>() {
            Some(Error::Validation(_)) => (StatusCode::BAD_REQUEST, fallback_body).into_response(),
            Some(Error::RuleNotFound(_)) => (StatusCode::NOT_FOUND, fallback_body).into_response(),
            Some(err @ Error::IncompleteRule { .. }) => {
                (upstream_status(err.upstream_status()), fallback_body).into_response()
            }
            Some(Error::Upstream {
                status,
                body: Some(body),
                ..
            }) => (upstream_status(*status), Json(body.clone())).into_response(),
            Some(Error::Upstream {
                status, message, ..
            }) => (
                upstream_status(*status),
                Json(json!({ "error": message })),
            )
                .into_response(),
            _ => {
                tracing::error!("unhandled error: {any_err:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, fallback_body).into_response()
            }
        }
    }
}

impl<E> From<E> for APIError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
