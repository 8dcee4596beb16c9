use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::env;
use std::fmt::{self, Debug};

#[derive(Clone, Debug, PartialEq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    PermissionDenied,
    LookupFailed,
    PersistenceFailed,
    InvalidState,
    InvalidInput,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self.code {
            2 | 7 => ErrorKind::PersistenceFailed,
            3 | 4 | 6 => ErrorKind::LookupFailed,
            100 => ErrorKind::InvalidState,
            101 => ErrorKind::InvalidInput,
            102 => ErrorKind::PermissionDenied,
            _ => ErrorKind::Internal,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        database_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            102 => (StatusCode::FORBIDDEN, self.message.as_str()),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn invalid_state_error() -> Error {
    Error {
        code: 100,
        message: "invalid state".into(),
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 101,
        message: "invalid input".into(),
    }
}

pub fn permission_denied_error() -> Error {
    Error {
        code: 102,
        message: "location permission denied".into(),
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: 1,
        message: "environment variable error".into(),
    }
}

pub fn config_error(message: impl Into<String>) -> Error {
    Error {
        code: 1,
        message: message.into(),
    }
}

pub fn database_error<T: Debug>(err: T) -> Error {
    tracing::error!("database error: {:?}", err);

    Error {
        code: 2,
        message: "database error".into(),
    }
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    tracing::error!("reqwest error: {:?}", err);

    Error {
        code: 3,
        message: "reqwest error".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: 4,
        message: "upstream error".into(),
    }
}

pub fn unexpected_error() -> Error {
    Error {
        code: 5,
        message: "unexpected error".into(),
    }
}

pub fn lookup_failed_error(message: impl Into<String>) -> Error {
    Error {
        code: 6,
        message: message.into(),
    }
}

pub fn persistence_failed_error(message: impl Into<String>) -> Error {
    Error {
        code: 7,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_codes() {
        assert_eq!(upstream_error().kind(), ErrorKind::LookupFailed);
        assert_eq!(lookup_failed_error("no route").kind(), ErrorKind::LookupFailed);
        assert_eq!(database_error("boom").kind(), ErrorKind::PersistenceFailed);
        assert_eq!(
            persistence_failed_error("write rejected").kind(),
            ErrorKind::PersistenceFailed
        );
        assert_eq!(permission_denied_error().kind(), ErrorKind::PermissionDenied);
        assert_eq!(invalid_state_error().kind(), ErrorKind::InvalidState);
        assert_eq!(unexpected_error().kind(), ErrorKind::Internal);
    }

    #[test]
    fn internal_errors_hide_their_message() {
        let response = unexpected_error().into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = invalid_input_error().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = permission_denied_error().into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
