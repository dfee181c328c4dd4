//! Response envelope shared by user endpoints and authentication failures.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

/// Envelope code for successful responses.
pub(crate) const CODE_SUCCESS: u32 = 200;

/// Envelope without a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ApiMessage {
    /// Outcome code: 200 on success, otherwise an error code.
    pub code: u32,

    /// Human-readable outcome.
    pub message: String,
}

impl ApiMessage {
    pub(crate) fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn success(message: impl Into<String>) -> Self {
        Self::new(CODE_SUCCESS, message)
    }
}

/// Envelope carrying a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ApiResponse<T: ToSchema + 'static> {
    /// Outcome code: 200 on success.
    pub code: u32,

    /// Human-readable outcome.
    pub message: String,

    /// Response payload.
    pub data: T,
}

impl<T: ToSchema + 'static> ApiResponse<T> {
    pub(crate) fn success(data: T) -> Self {
        Self {
            code: CODE_SUCCESS,
            message: "success".to_string(),
            data,
        }
    }
}
