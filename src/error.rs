use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Error reading file")]
    Read(#[source] std::io::Error),

    #[error("Error parsing data")]
    Parse(#[from] serde_json::Error),

    #[error("Error writing to file")]
    Write(#[source] std::io::Error),

    #[error("No file uploaded.")]
    MissingUpload,

    #[error("Item not found")]
    ItemNotFound(String),

    #[error("Invalid request body")]
    Body(#[from] JsonRejection),

    #[error("Invalid multipart request")]
    Multipart(#[from] MultipartError),

    #[error("Error rendering page")]
    Template(#[from] minijinja::Error),
}

impl InventoryError {
    /// Text of the underlying error, sent to the client as `details`.
    pub fn details(&self) -> Option<String> {
        match self {
            InventoryError::Read(e) | InventoryError::Write(e) => Some(e.to_string()),
            InventoryError::Parse(e) => Some(e.to_string()),
            InventoryError::Body(e) => Some(e.body_text()),
            InventoryError::Multipart(e) => Some(e.body_text()),
            InventoryError::Template(e) => Some(e.to_string()),
            InventoryError::ItemNotFound(id) => Some(id.clone()),
            InventoryError::MissingUpload => None,
        }
    }
}

impl IntoResponse for InventoryError {
    fn into_response(self) -> axum::response::Response {
        let message = self.to_string();
        let details = self.details();

        match self {
            InventoryError::ItemNotFound(_)
            | InventoryError::MissingUpload
            | InventoryError::Body(_) => {
                warn!("{message} {}", details.as_deref().unwrap_or_default())
            }
            _ => error!("{message}: {}", details.as_deref().unwrap_or_default()),
        }

        match self {
            InventoryError::ItemNotFound(_) => {
                (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
            }
            InventoryError::MissingUpload => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            InventoryError::Body(e) => (
                e.status(),
                Json(json!({ "error": message, "details": details })),
            )
                .into_response(),
            InventoryError::Multipart(e) => (
                e.status(),
                Json(json!({ "error": message, "details": details })),
            )
                .into_response(),
            InventoryError::Read(_)
            | InventoryError::Parse(_)
            | InventoryError::Write(_)
            | InventoryError::Template(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": message, "details": details })),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let response = InventoryError::ItemNotFound("abc".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn missing_upload_maps_to_400() {
        let response = InventoryError::MissingUpload.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_body_is_a_client_error_with_details() {
        use axum::{
            body::{to_bytes, Body},
            extract::FromRequest,
            http::{header, Request},
        };

        let request = Request::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("[{ nope"))
            .unwrap();
        let rejection = Json::<serde_json::Value>::from_request(request, &())
            .await
            .unwrap_err();

        let err = InventoryError::from(rejection);
        assert_eq!(err.to_string(), "Invalid request body");
        assert!(err.details().is_some_and(|d| !d.is_empty()));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Invalid request body");
        assert!(body["details"].is_string());
    }

    #[test]
    fn io_failures_carry_details() {
        let err = InventoryError::Read(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));
        assert_eq!(err.to_string(), "Error reading file");
        assert_eq!(err.details().as_deref(), Some("no such file"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
