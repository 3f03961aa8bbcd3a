use axum::http::StatusCode;

pub(crate) mod authenticated_user;

/// Shared rejection type for extractors: an HTTP status plus a message body.
pub(crate) type RejectionType = (StatusCode, String);
