//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};

use strm_app::{
    auth::{SessionClaims, SigningSecret, TokenError},
    context::{AppContext, AuthSettings},
    domain::users::{MockUsersService, records::UserRecord},
};

use crate::{auth, state::State};

pub(crate) const TEST_SECRET: &str = "test-secret";

pub(crate) fn test_user(token_invalid_before: Option<Timestamp>) -> UserRecord {
    UserRecord {
        id: 7,
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        password_hash: String::new(),
        is_active: true,
        failed_login_count: 0,
        locked_until: None,
        token_invalid_before,
        created_at: Timestamp::UNIX_EPOCH,
    }
}

/// Users mock that answers every subject lookup with `record`.
pub(crate) fn users_returning(record: UserRecord) -> MockUsersService {
    let mut users = MockUsersService::new();

    users
        .expect_find_by_username()
        .returning(move |_| Ok(record.clone()));

    users
}

pub(crate) fn state_with_users(users: MockUsersService) -> Arc<State> {
    State::from_app_context(AppContext::new(
        Arc::new(users),
        AuthSettings {
            secret: SigningSecret::new(TEST_SECRET),
            ..AuthSettings::default()
        },
    ))
}

pub(crate) fn issue_token(state: &State, claims: &SessionClaims) -> Result<String, TokenError> {
    state.app.tokens.issue(claims)
}

/// `route` behind the authentication gate, as mounted by the server.
pub(crate) fn gated_service(users: MockUsersService, route: Router) -> (Service, Arc<State>) {
    let state = state_with_users(users);

    let service = Service::new(
        Router::new()
            .hoop(inject(Arc::clone(&state)))
            .hoop(auth::middleware::handler)
            .push(route),
    );

    (service, state)
}
