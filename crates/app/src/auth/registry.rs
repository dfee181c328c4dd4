//! In-memory registry of revoked session credentials.
//!
//! Entries live only until the credential would have expired on its own, after which
//! the signature check rejects it anyway. Expired entries are dropped lazily on lookup
//! and in bulk by [`RevocationSweeper`].

use std::{collections::HashMap, sync::Arc, time::Duration};

use jiff::Timestamp;
use parking_lot::RwLock;
use tokio::{select, sync::watch, time::sleep};
use tracing::{debug, info};

use crate::auth::fingerprint::TokenFingerprint;

/// Default period between background sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Fingerprint to natural-expiry map shared by every request handler.
#[derive(Debug, Default)]
pub struct RevocationRegistry {
    entries: RwLock<HashMap<TokenFingerprint, Timestamp>>,
}

impl RevocationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `fingerprint` as revoked until `expires_at`, replacing any earlier entry.
    pub fn register(&self, fingerprint: TokenFingerprint, expires_at: Timestamp) {
        self.entries.write().insert(fingerprint, expires_at);

        debug!(fingerprint = %fingerprint.short(), %expires_at, "credential revoked");
    }

    /// Fingerprint `raw` and record it as revoked until `expires_at`.
    pub fn revoke(&self, raw: &str, expires_at: Timestamp) -> TokenFingerprint {
        let fingerprint = TokenFingerprint::of(raw);

        self.register(fingerprint, expires_at);

        fingerprint
    }

    /// Whether `raw` is currently revoked.
    #[must_use]
    pub fn is_revoked(&self, raw: &str) -> bool {
        self.is_revoked_at(raw, Timestamp::now())
    }

    /// Whether `raw` is revoked at `now`. An entry stops counting once `now` reaches its
    /// expiry and is evicted on the spot.
    #[must_use]
    pub fn is_revoked_at(&self, raw: &str, now: Timestamp) -> bool {
        let fingerprint = TokenFingerprint::of(raw);

        match self.entries.read().get(&fingerprint) {
            None => return false,
            Some(expires_at) if now < *expires_at => return true,
            Some(_) => {}
        }

        // Re-check under the write lock: the entry may have been re-registered meanwhile.
        let mut entries = self.entries.write();

        match entries.get(&fingerprint) {
            Some(expires_at) if now < *expires_at => true,
            Some(_) => {
                entries.remove(&fingerprint);
                false
            }
            None => false,
        }
    }

    /// Drop every entry that has expired by now, returning how many were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Timestamp::now())
    }

    /// Drop every entry with an expiry at or before `now`.
    pub fn sweep_at(&self, now: Timestamp) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();

        entries.retain(|_, expires_at| now < *expires_at);

        let removed = before - entries.len();

        if removed > 0 {
            info!(removed, remaining = entries.len(), "revocation registry swept");
        }

        removed
    }

    /// Number of entries currently held, including expired ones not yet swept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Background task that periodically sweeps a [`RevocationRegistry`].
///
/// The task exits when [`shutdown`](Self::shutdown) is called or the sweeper is dropped.
#[derive(Debug)]
pub struct RevocationSweeper {
    shutdown_tx: watch::Sender<()>,
}

impl RevocationSweeper {
    /// Spawn the sweep loop on the current tokio runtime.
    #[must_use]
    pub fn spawn(registry: Arc<RevocationRegistry>, interval: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(());

        tokio::spawn(sweep_periodically(registry, interval, shutdown_rx));

        info!(interval_secs = interval.as_secs(), "revocation sweeper started");

        Self { shutdown_tx }
    }

    /// Signal the sweep loop to stop. Idempotent.
    pub fn shutdown(&self) {
        // The loop may already have exited.
        let _ = self.shutdown_tx.send(());
    }
}

impl Drop for RevocationSweeper {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn sweep_periodically(
    registry: Arc<RevocationRegistry>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<()>,
) {
    loop {
        select! {
            () = sleep(interval) => {}
            _ = shutdown_rx.changed() => {
                debug!("revocation sweeper stopped");
                return;
            }
        }

        registry.sweep();
    }
}
