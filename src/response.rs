//! Uniform response envelope.
//!
//! Every endpoint, successful or not, answers with
//! `{"status": <code>, "message": <text>, "data": <payload>}` where `data` is omitted
//! when there is nothing to return.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// HTTP status code, repeated in the body
    pub status: u16,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            data: Some(data),
        }
    }

    /// 200 with the conventional "OK" message.
    pub fn ok(data: T) -> Self {
        Self::success(StatusCode::OK, "OK", data)
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::success(StatusCode::CREATED, message, data)
    }
}

impl ApiResponse<()> {
    /// Envelope without a payload.
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn omits_missing_data() {
        let body = serde_json::to_value(ApiResponse::message(StatusCode::OK, "pong")).unwrap();
        assert_eq!(body, json!({ "status": 200, "message": "pong" }));
    }

    #[test]
    fn created_carries_payload() {
        let body =
            serde_json::to_value(ApiResponse::created("Category created", json!({ "id": 1 })))
                .unwrap();
        assert_eq!(
            body,
            json!({ "status": 201, "message": "Category created", "data": { "id": 1 } })
        );
    }

    #[test]
    fn response_status_matches_envelope() {
        let response = ApiResponse::created("Transaction created", json!({})).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
