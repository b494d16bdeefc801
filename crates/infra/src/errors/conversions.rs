//! Conversions from external infrastructure errors into domain errors.

use rallypoint_domain::RallypointError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub RallypointError);

impl From<InfraError> for RallypointError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<RallypointError> for InfraError {
    fn from(value: RallypointError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoRallypointError {
    fn into_rallypoint(self) -> RallypointError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → RallypointError */
/* -------------------------------------------------------------------------- */

impl IntoRallypointError for SqlError {
    fn into_rallypoint(self) -> RallypointError {
        use rusqlite::ffi::{ErrorCode, SQLITE_CONSTRAINT_CHECK, SQLITE_CONSTRAINT_PRIMARYKEY};
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked, _) => {
                        RallypointError::Database(format!("database is busy: {message}"))
                    }
                    // Duplicate availability record id
                    (ErrorCode::ConstraintViolation, SQLITE_CONSTRAINT_PRIMARYKEY) => {
                        RallypointError::InvalidInput(format!("record already exists: {message}"))
                    }
                    // start_ts < end_ts
                    (ErrorCode::ConstraintViolation, SQLITE_CONSTRAINT_CHECK) => {
                        RallypointError::InvalidInput(format!("record rejected: {message}"))
                    }
                    _ => RallypointError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => {
                RallypointError::NotFound("no rows returned by query".into())
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                RallypointError::Database(format!("stored value is unreadable: {cause}"))
            }
            other => RallypointError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_rallypoint())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → RallypointError */
/* -------------------------------------------------------------------------- */

impl IntoRallypointError for r2d2::Error {
    fn into_rallypoint(self) -> RallypointError {
        RallypointError::Database(format!("connection pool error: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(value.into_rallypoint())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → RallypointError */
/* -------------------------------------------------------------------------- */

impl IntoRallypointError for HttpError {
    fn into_rallypoint(self) -> RallypointError {
        if self.is_timeout() {
            return RallypointError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return RallypointError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return RallypointError::Network(format!("malformed provider response: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => RallypointError::Auth(message),
                404 => RallypointError::NotFound(message),
                429 => RallypointError::Network(message),
                400..=499 => RallypointError::InvalidInput(message),
                _ => RallypointError::Network(message),
            };
        }

        RallypointError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_rallypoint())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
