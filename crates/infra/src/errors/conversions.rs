//! Conversions from external infrastructure errors into domain errors.

use payline_domain::PaylineError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub PaylineError);

impl From<InfraError> for PaylineError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<PaylineError> for InfraError {
    fn from(value: PaylineError) -> Self {
        InfraError(value)
    }
}

trait IntoPaylineError {
    fn into_payline(self) -> PaylineError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → PaylineError */
/* -------------------------------------------------------------------------- */

impl IntoPaylineError for SqlError {
    fn into_payline(self) -> PaylineError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        PaylineError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        PaylineError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        PaylineError::Database("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 275) => {
                        PaylineError::InvalidInput(format!("check constraint failed: {message}"))
                    }
                    (ErrorCode::CannotOpen, _) => {
                        PaylineError::Database(format!("unable to open database: {message}"))
                    }
                    _ => PaylineError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => PaylineError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                PaylineError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                PaylineError::Database(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => PaylineError::Config(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => PaylineError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_payline())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → PaylineError */
/* -------------------------------------------------------------------------- */

impl IntoPaylineError for r2d2::Error {
    fn into_payline(self) -> PaylineError {
        PaylineError::Database(format!("connection pool error: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(value.into_payline())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → PaylineError */
/* -------------------------------------------------------------------------- */

impl IntoPaylineError for HttpError {
    fn into_payline(self) -> PaylineError {
        if self.is_timeout() {
            return PaylineError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return PaylineError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                404 => PaylineError::NotFound(message),
                400..=499 if code != 429 => PaylineError::InvalidInput(message),
                _ => PaylineError::Network(message),
            };
        }

        if self.is_decode() {
            return PaylineError::Network(format!("malformed response body: {self}"));
        }

        PaylineError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_payline())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use rusqlite::ffi::{Error as FfiError, ErrorCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn sqlite_busy_maps_to_database_error() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::DatabaseBusy, extended_code: 5 },
            Some("database is locked".into()),
        );

        let mapped: PaylineError = InfraError::from(err).into();
        match mapped {
            PaylineError::Database(msg) => assert!(msg.contains("busy")),
            other => panic!("expected database error, got {other:?}"),
        }
    }

    #[test]
    fn sqlite_check_violation_maps_to_invalid_input() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::ConstraintViolation, extended_code: 275 },
            Some("CHECK constraint failed: hours".into()),
        );

        let mapped: PaylineError = InfraError::from(err).into();
        assert!(matches!(mapped, PaylineError::InvalidInput(msg) if msg.contains("hours")));
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let mapped: PaylineError = InfraError::from(SqlError::QueryReturnedNoRows).into();
        assert_eq!(mapped.label(), "not_found");
    }

    #[tokio::test]
    async fn http_status_503_maps_to_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::SERVICE_UNAVAILABLE))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: PaylineError = InfraError::from(error).into();
        match mapped {
            PaylineError::Network(msg) => assert_eq!(msg, "HTTP 503 Service Unavailable"),
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_status_404_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::NOT_FOUND))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: PaylineError = InfraError::from(error).into();
        assert!(matches!(mapped, PaylineError::NotFound(msg) if msg.contains("404")));
    }
}
