use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Every handler converts its failures into one of these kinds; the
/// kind-to-status table below is the only place a status code is chosen.
#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "{}", _0)]
    Unauthenticated(String),

    #[display(fmt = "Access denied")]
    Forbidden,

    #[display(fmt = "{} not found", _0)]
    NotFound(&'static str),

    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "{}", _0)]
    Conflict(String),

    #[display(fmt = "Database error")]
    Store(sqlx::Error),

    #[display(fmt = "Internal server error")]
    Internal(anyhow::Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Store(e) => tracing::error!(error = %e, "store failure"),
            ApiError::Internal(e) => tracing::error!(error = %e, "unexpected failure"),
            _ => {}
        }

        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => ApiError::NotFound("Record"),
            other => ApiError::Store(other),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_the_documented_statuses() {
        assert_eq!(
            ApiError::Unauthenticated("Token expired".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("Student").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("taken".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Store(sqlx::Error::PoolClosed).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn row_not_found_becomes_not_found() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn messages_do_not_leak_store_details() {
        let err: ApiError = sqlx::Error::PoolClosed.into();
        assert_eq!(err.to_string(), "Database error");
    }
}
