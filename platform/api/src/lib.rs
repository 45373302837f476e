use std::{collections::BTreeMap, sync::Arc};

use async_graphql::{Error, ErrorExtensions, Name, Value};
use thiserror::Error;

/// Shared GraphQL result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,
    #[error("bad request: {0}")]
    InvalidInput(String),
    #[error("validation failed")]
    Validation(BTreeMap<String, String>),
    #[error("internal server error")]
    Internal(Arc<anyhow::Error>),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound => "NOT_FOUND",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::Validation(_) => "VALIDATION",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        tracing::error!(error = %err, "internal error");
        Self::Internal(Arc::new(err))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::internal(value)
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> Error {
        let mut err = Error::new(self.to_string());
        err = err.extend_with(|_err, e| {
            e.set("code", self.code());
        });
        match self {
            ApiError::InvalidInput(_) => {
                err = err.extend_with(|_err, e| {
                    e.set("type", "BAD_REQUEST");
                });
            }
            ApiError::Validation(fields) => {
                let fields = Value::Object(
                    fields
                        .iter()
                        .map(|(field, message)| (Name::new(field), Value::from(message.as_str())))
                        .collect(),
                );
                err = err.extend_with(move |_err, e| {
                    e.set("type", "BAD_REQUEST");
                    e.set("fields", fields);
                });
            }
            _ => {}
        }
        err
    }
}

/// Convert any error into a GraphQL error payload while hiding internals.
pub fn internal_error(err: impl Into<anyhow::Error>) -> Error {
    ApiError::internal(err.into()).extend()
}
