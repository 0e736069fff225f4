/// Response helpers shared by route handlers
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// `{ "error": ..., "message": ... }` with the given status
pub fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
            message: message.into(),
        }),
    )
        .into_response()
}

pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Lenient numeric query parsing: anything unparseable falls back to `default`
pub fn parse_or(value: Option<&str>, default: usize) -> usize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or() {
        assert_eq!(parse_or(Some("20"), 50), 20);
        assert_eq!(parse_or(Some("abc"), 50), 50);
        assert_eq!(parse_or(Some("-3"), 0), 0);
        assert_eq!(parse_or(None, 7), 7);
    }
}
