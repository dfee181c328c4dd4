//! Domain Concerns

pub mod users;
