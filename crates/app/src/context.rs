//! App Context

use std::{sync::Arc, time::Duration};

use thiserror::Error;

use crate::{
    auth::{
        AuthGate, BypassRules, DEFAULT_SWEEP_INTERVAL, RevocationRegistry, RevocationSweeper,
        SessionRevoker, SessionTokens, SigningSecret,
    },
    database,
    domain::users::{PgUsersService, UsersService},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Authentication settings resolved once at startup.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Key for signing and verifying session credentials.
    pub secret: SigningSecret,

    /// Paths served without a credential.
    pub bypass: BypassRules,

    /// Period between revocation registry sweeps.
    pub sweep_interval: Duration,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            secret: SigningSecret::from_config(None),
            bypass: BypassRules::default(),
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub users: Arc<dyn UsersService>,
    pub tokens: SessionTokens,
    pub registry: Arc<RevocationRegistry>,
    pub gate: AuthGate,
    pub sessions: SessionRevoker,
    sweeper: Arc<RevocationSweeper>,
}

impl AppContext {
    /// Wire the authentication core around `users`, starting the revocation sweeper.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(users: Arc<dyn UsersService>, settings: AuthSettings) -> Self {
        let tokens = SessionTokens::new(&settings.secret);
        let registry = Arc::new(RevocationRegistry::new());

        let gate = AuthGate::new(
            settings.bypass,
            Arc::clone(&registry),
            tokens.clone(),
            Arc::clone(&users),
        );

        let sessions = SessionRevoker::new(Arc::clone(&registry), tokens.clone(), Arc::clone(&users));

        let sweeper = Arc::new(RevocationSweeper::spawn(
            Arc::clone(&registry),
            settings.sweep_interval,
        ));

        Self {
            users,
            tokens,
            registry,
            gate,
            sessions,
            sweeper,
        }
    }

    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str, settings: AuthSettings) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::new(Arc::new(PgUsersService::new(pool)), settings))
    }

    /// Stop background maintenance tasks.
    pub fn shutdown(&self) {
        self.sweeper.shutdown();
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("gate", &self.gate)
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}
