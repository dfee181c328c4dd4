//! Authentication

pub mod bypass;
pub mod claims;
mod errors;
pub mod fingerprint;
pub mod gate;
pub mod registry;
pub mod sessions;
pub mod tokens;

pub use bypass::BypassRules;
pub use claims::{SESSION_TTL, SessionClaims};
pub use errors::*;
pub use fingerprint::TokenFingerprint;
pub use gate::{Admission, AuthGate, bearer_token};
pub use registry::{DEFAULT_SWEEP_INTERVAL, RevocationRegistry, RevocationSweeper};
pub use sessions::{LogoutOutcome, PasswordResetRevocation, SessionRevocationError, SessionRevoker};
pub use tokens::{SessionTokens, SigningSecret, TokenError};
