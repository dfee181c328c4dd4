//! User session endpoints

mod errors;
pub(crate) mod handlers;
mod validation;

pub(crate) use handlers::*;
