use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use diesel::result::DatabaseErrorKind;
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::core::validate::ValidationErrors;

#[derive(Error, Debug)]
pub enum Error {
    #[error("error querying database: {0}")]
    DBQueryError(diesel::result::Error),
    #[error("error getting database connection: {0}")]
    DBPoolError(#[from] r2d2::Error),
    #[error("invalid request: {0}")]
    ValidationError(ValidationErrors),
    #[error("not found")]
    NotFoundError,
    #[error("invalid page")]
    InvalidPageError,
    #[error("authentication credentials were not provided")]
    MissingCredentialsError,
    #[error("invalid token")]
    InvalidTokenError,
    #[error("missing environment variable {0}")]
    MissingEnvError(String),
    #[error("invalid value for environment variable {0}: {1}")]
    InvalidEnvError(String, String),
    #[error("blocking call was canceled")]
    CanceledError,
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        match constraint_errors(&err) {
            Some(invalid) => Error::ValidationError(invalid),
            None => Error::DBQueryError(err),
        }
    }
}

/// Unique and foreign key violations are reported to the client as field errors.
fn constraint_errors(err: &diesel::result::Error) -> Option<ValidationErrors> {
    use diesel::result::Error::DatabaseError;

    match err {
        DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            let table = info.table_name()?;
            let (field, _) = parse_key_detail(info.details()?)?;
            Some(ValidationErrors::single(&field, duplicate_message(table, &field)))
        }
        DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            let (field, value) = parse_key_detail(info.details()?)?;
            Some(ValidationErrors::single(
                field.trim_end_matches("_id"),
                ValidationErrors::invalid_pk(&value),
            ))
        }
        _ => None,
    }
}

impl From<BlockingError<Error>> for Error {
    fn from(err: BlockingError<Error>) -> Self {
        match err {
            BlockingError::Error(e) => e,
            BlockingError::Canceled => Error::CanceledError,
        }
    }
}

/// Pulls `(column, value)` out of a postgres key detail such as
/// `Key (name)=(Drama) already exists.`
fn parse_key_detail(details: &str) -> Option<(String, String)> {
    let rest = details.strip_prefix("Key (")?;
    let (field, rest) = rest.split_at(rest.find(")=(")?);
    let rest = &rest[3..];
    let value = &rest[..rest.find(')')?];
    Some((field.to_string(), value.to_string()))
}

fn duplicate_message(table: &str, field: &str) -> String {
    let entity = table.trim_end_matches('s').replace('_', " ");
    format!("{} with this {} already exists.", entity, field)
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::ValidationError(_) => StatusCode::BAD_REQUEST,
            Error::NotFoundError | Error::InvalidPageError => StatusCode::NOT_FOUND,
            Error::MissingCredentialsError | Error::InvalidTokenError => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            Error::ValidationError(errors) => HttpResponse::build(status).json(errors),
            Error::NotFoundError => HttpResponse::build(status).json(json!({"detail": "Not found."})),
            Error::InvalidPageError => HttpResponse::build(status).json(json!({"detail": "Invalid page."})),
            Error::MissingCredentialsError => HttpResponse::build(status)
                .header("WWW-Authenticate", "Token")
                .json(json!({"detail": "Authentication credentials were not provided."})),
            Error::InvalidTokenError => HttpResponse::build(status)
                .header("WWW-Authenticate", "Token")
                .json(json!({"detail": "Invalid token."})),
            other => {
                error!("{}", other);
                HttpResponse::build(status).json(json!({"detail": "A server error occurred."}))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_detail_is_parsed() {
        assert_eq!(
            parse_key_detail("Key (name)=(Drama) already exists."),
            Some(("name".to_string(), "Drama".to_string()))
        );
        assert_eq!(
            parse_key_detail("Key (movie_session_id)=(42) is not present in table \"movie_sessions\"."),
            Some(("movie_session_id".to_string(), "42".to_string()))
        );
        assert_eq!(parse_key_detail("something else"), None);
    }

    #[test]
    fn duplicate_message_names_the_entity() {
        assert_eq!(duplicate_message("genres", "name"), "genre with this name already exists.");
        assert_eq!(duplicate_message("cinema_halls", "name"), "cinema hall with this name already exists.");
    }

    #[test]
    fn statuses_follow_the_error_kind() {
        assert_eq!(Error::NotFoundError.error_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(Error::InvalidPageError.error_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(Error::InvalidTokenError.error_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::MissingCredentialsError.error_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::CanceledError.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let invalid = Error::ValidationError(ValidationErrors::single("name", "This field may not be blank."));
        assert_eq!(invalid.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn plain_database_errors_stay_internal() {
        let err: Error = diesel::result::Error::NotFound.into();
        assert!(matches!(err, Error::DBQueryError(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn canceled_blocking_call_is_internal() {
        let err: Error = BlockingError::<Error>::Canceled.into();
        assert!(matches!(err, Error::CanceledError));

        let err: Error = BlockingError::Error(Error::NotFoundError).into();
        assert!(matches!(err, Error::NotFoundError));
    }
}
