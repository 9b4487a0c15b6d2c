//! Portal application state.

use crate::users::UserRegistry;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use gridgate_core::GridgateConfig;
use gridgate_sync::SyncClient;
use gridgate_token::TokenSigner;
use rand::RngCore;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Warning,
    Info,
}

/// A one-shot notice shown on the next page render.
#[derive(Debug, Clone)]
pub struct Flash {
    pub kind: FlashKind,
    pub text: String,
}

/// Server-side session entry. Sessions live in process memory; a
/// restart signs everyone out.
#[derive(Debug)]
struct Session {
    username: String,
    flashes: Vec<Flash>,
}

/// Shared application state for the portal.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// The loaded configuration (read-only after startup).
    config: GridgateConfig,
    /// Signer for viewer tokens.
    signer: TokenSigner,
    /// Sync client, absent when sync is disabled.
    sync: Option<SyncClient>,
    /// Local user registry.
    users: UserRegistry,
    /// Active sessions keyed by cookie token.
    sessions: RwLock<HashMap<String, Session>>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(config: GridgateConfig, signer: TokenSigner, sync: Option<SyncClient>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                signer,
                sync,
                users: UserRegistry::new(),
                sessions: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &GridgateConfig {
        &self.inner.config
    }

    /// Project name for page titles.
    pub fn project_name(&self) -> &str {
        self.inner.config.project.as_deref().unwrap_or("Gridgate")
    }

    /// Get the viewer token signer.
    pub fn signer(&self) -> &TokenSigner {
        &self.inner.signer
    }

    /// Get the sync client if sync is enabled.
    pub fn sync(&self) -> Option<&SyncClient> {
        self.inner.sync.as_ref()
    }

    /// Get the user registry.
    pub fn users(&self) -> &UserRegistry {
        &self.inner.users
    }

    /// Create a session for a user and return the cookie token.
    pub fn create_session(&self, username: &str) -> String {
        let mut bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut bytes);
        let token = URL_SAFE_NO_PAD.encode(bytes);

        self.inner.sessions.write().unwrap().insert(
            token.clone(),
            Session {
                username: username.to_string(),
                flashes: Vec::new(),
            },
        );
        token
    }

    /// Drop a session (logout).
    pub fn remove_session(&self, token: &str) {
        self.inner.sessions.write().unwrap().remove(token);
    }

    /// Resolve a session token to a username.
    pub fn session_username(&self, token: &str) -> Option<String> {
        self.inner
            .sessions
            .read()
            .unwrap()
            .get(token)
            .map(|s| s.username.clone())
    }

    /// Queue a flash message on a session.
    pub fn push_flash(&self, token: &str, kind: FlashKind, text: impl Into<String>) {
        if let Some(session) = self.inner.sessions.write().unwrap().get_mut(token) {
            session.flashes.push(Flash {
                kind,
                text: text.into(),
            });
        }
    }

    /// Drain the pending flash messages for a session.
    pub fn take_flashes(&self, token: &str) -> Vec<Flash> {
        self.inner
            .sessions
            .write()
            .unwrap()
            .get_mut(token)
            .map(|s| std::mem::take(&mut s.flashes))
            .unwrap_or_default()
    }
}
