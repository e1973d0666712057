//! Per-user ride clients.
//!
//! Each `userId` gets its own [`RideClient`], so one rider's simulated
//! bookings and mode switch never leak into another's. Sessions are dropped
//! after a period of inactivity, and the registry is bounded in size.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tokio::sync::RwLock;
use tracing::debug;

use crate::clock::Clock;
use crate::domain::SessionToken;
use crate::namma_yatri::NammaYatriClient;
use crate::rides::RideClient;

/// Configuration for the session registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// How long a session may go unused before it is dropped.
    pub idle: Duration,

    /// Maximum number of live sessions.
    pub max_capacity: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            idle: Duration::from_secs(3600),
            max_capacity: 10_000,
        }
    }
}

/// One rider's client and the credential obtained for it.
pub struct UserSession {
    pub client: RideClient,
    credential: RwLock<Option<SessionToken>>,
}

impl UserSession {
    fn new(client: RideClient) -> Self {
        Self {
            client,
            credential: RwLock::new(None),
        }
    }

    /// The credential from the last successful OTP verification, if any.
    pub async fn credential(&self) -> Option<SessionToken> {
        self.credential.read().await.clone()
    }

    pub async fn set_credential(&self, token: SessionToken) {
        *self.credential.write().await = Some(token);
    }
}

/// Sessions keyed by user id.
pub struct SessionRegistry {
    sessions: MokaCache<String, Arc<UserSession>>,
    upstream: NammaYatriClient,
    clock: Arc<dyn Clock>,
}

impl SessionRegistry {
    /// Create an empty registry. New sessions share `upstream`'s connection
    /// pool but nothing else.
    pub fn new(config: &RegistryConfig, upstream: NammaYatriClient, clock: Arc<dyn Clock>) -> Self {
        let sessions = MokaCache::builder()
            .time_to_idle(config.idle)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            sessions,
            upstream,
            clock,
        }
    }

    /// The session for `user_id`, created in live mode if it doesn't exist.
    pub async fn get_or_create(&self, user_id: &str) -> Arc<UserSession> {
        self.sessions
            .get_with(user_id.to_owned(), async {
                debug!(user_id, "new ride session");
                let client = RideClient::new(self.upstream.clone(), self.clock.clone());
                Arc::new(UserSession::new(client))
            })
            .await
    }

    /// The session for `user_id`, if one exists.
    pub async fn get(&self, user_id: &str) -> Option<Arc<UserSession>> {
        self.sessions.get(user_id).await
    }

    /// Remember the credential for `user_id`, creating the session if needed.
    pub async fn store_credential(&self, user_id: &str, token: SessionToken) {
        self.get_or_create(user_id).await.set_credential(token).await;
    }

    /// Drop the session for `user_id`.
    pub async fn evict(&self, user_id: &str) {
        self.sessions.invalidate(user_id).await;
    }

    /// Number of live sessions.
    pub async fn len(&self) -> u64 {
        self.sessions.run_pending_tasks().await;
        self.sessions.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
