//! Test context for service-level integration tests.

use crate::domain::users::{
    PgUsersService, UsersService, UsersServiceError, data::NewUser, records::UserRecord,
};

use super::db::TestDb;

pub(crate) struct TestContext {
    pub(crate) db: TestDb,
    pub(crate) users: PgUsersService,
}

impl TestContext {
    pub(crate) async fn new() -> Self {
        let db = TestDb::new().await;

        Self {
            users: PgUsersService::new(db.pool().clone()),
            db,
        }
    }

    /// Create an active user named `username` with email `{username}@example.com`.
    pub(crate) async fn create_user(&self, username: &str) -> Result<UserRecord, UsersServiceError> {
        self.users
            .create_user(NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: "Passw0rd!".to_string(),
            })
            .await
    }
}
