//! Result helpers for HTTP handlers.

use std::fmt::Display;

use salvo::prelude::StatusError;
use tracing::error;

/// Turn a failure the client cannot act on into a logged `500`.
pub(crate) trait ResultExt<T> {
    fn or_500(self, what: &str) -> Result<T, StatusError>;
}

impl<T, E: Display> ResultExt<T> for Result<T, E> {
    fn or_500(self, what: &str) -> Result<T, StatusError> {
        self.map_err(|source| {
            error!(%source, "{what}");

            StatusError::internal_server_error()
        })
    }
}
