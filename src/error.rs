//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("config validation: {0}")]
    Validation(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Subscriber #{0} does not exist.")]
    NotFound(u16),
    #[error("{0}")]
    MalformedInput(String),
    #[error("{0}")]
    MissingParameters(String),
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error("database unavailable: {0}")]
    Connection(sqlx::Error),
    #[error("subscriber index range exhausted: no index left below {}", u16::MAX)]
    IndexExhausted,
    #[error("database: {0}")]
    Db(sqlx::Error),
    #[error("request exceeded its {0:?} deadline")]
    Timeout(Duration),
    #[error("HTTP method not allowed on this resource.")]
    MethodNotAllowed,
    #[error("no route for {0}")]
    UnknownRoute(String),
    #[error("middleware: {0}")]
    Middleware(String),
}

/// Check constraint keeping `"index"` inside the `u16` range.
pub const INDEX_RANGE_CONSTRAINT: &str = "subscribers_index_range";

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;
        if let sqlx::Error::Database(db) = &e {
            if db.constraint() == Some(INDEX_RANGE_CONSTRAINT) {
                return AppError::IndexExhausted;
            }
            if matches!(
                db.kind(),
                ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
            ) {
                return AppError::Constraint(db.message().to_string());
            }
        }
        match e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => AppError::Connection(e),
            _ => AppError::Db(e),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            AppError::MissingParameters(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Constraint(_) => StatusCode::CONFLICT,
            AppError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::IndexExhausted => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::UnknownRoute(_) => StatusCode::NOT_FOUND,
            AppError::Middleware(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_per_kind() {
        assert_eq!(AppError::NotFound(3).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::MalformedInput("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::MissingParameters("x".into()).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(AppError::Constraint("dup".into()).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::IndexExhausted.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            AppError::Timeout(Duration::from_millis(20)).status(),
            StatusCode::REQUEST_TIMEOUT
        );
        assert_eq!(AppError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            AppError::from(sqlx::Error::PoolTimedOut).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::from(sqlx::Error::Protocol("bad".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_index() {
        assert_eq!(AppError::NotFound(7).to_string(), "Subscriber #7 does not exist.");
    }
}
