//! Error types shared by the attendance core, the record stores and the
//! HTTP layer.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("email must belong to the @{domain} domain")]
    InvalidDomain { domain: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("location has not been resolved yet")]
    NotResolved,

    #[error("location provider failed: {0}")]
    Provider(String),

    #[error("location is missing a coordinate")]
    Incomplete,

    #[error("location coordinates are not finite numbers")]
    NonFinite,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("record store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("record store rejected the request: {0}")]
    Rejected(String),

    #[error("record store returned malformed data: {0}")]
    Decode(String),
}

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("location is not ready: {0}")]
    LocationNotReady(#[source] LocationError),

    #[error("record store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),
}
