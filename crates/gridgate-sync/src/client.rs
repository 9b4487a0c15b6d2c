//! The external sync client.

use crate::error::SyncError;
use gridgate_core::GridgateConfig;
use gridgate_token::{AdminClaims, TokenSigner};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Outcome of a sync attempt.
///
/// Callers must handle both arms explicitly; the failure arm is
/// advisory only and never blocks the registration that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The external system accepted the user.
    Synced,
    /// The call did not land; `reason` is a diagnostic for logs and
    /// user-facing warnings.
    Failed { reason: String },
}

impl SyncOutcome {
    /// Whether the external system accepted the user.
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncOutcome::Synced)
    }

    fn failed(reason: impl Into<String>) -> Self {
        SyncOutcome::Failed {
            reason: reason.into(),
        }
    }
}

/// Expected response body from the external endpoint.
#[derive(Debug, Deserialize)]
struct SyncResponse {
    #[serde(default)]
    success: bool,
}

/// Client for the external `add_user` endpoint.
///
/// The endpoint is normalized at construction: any query string or
/// fragment on the configured URL belongs to the iframe use of the
/// same web app and must not leak into sync requests.
#[derive(Clone)]
pub struct SyncClient {
    http: reqwest::Client,
    endpoint: Url,
    signer: TokenSigner,
}

impl std::fmt::Debug for SyncClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // TokenSigner holds the shared secret, so it is omitted here.
        f.debug_struct("SyncClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl SyncClient {
    /// Build a client from an endpoint URL, shared secret, and timeout.
    pub fn new(endpoint: &str, secret: &str, timeout: Duration) -> Result<Self, SyncError> {
        if endpoint.is_empty() {
            return Err(SyncError::MissingEndpoint);
        }

        let mut endpoint = Url::parse(endpoint)?;
        endpoint.set_query(None);
        endpoint.set_fragment(None);

        let signer = TokenSigner::new(secret)?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            endpoint,
            signer,
        })
    }

    /// Build a client from the loaded portal configuration.
    pub fn from_config(config: &GridgateConfig) -> Result<Self, SyncError> {
        let secret = config.widget.resolve_shared_secret().unwrap_or_default();
        Self::new(
            &config.widget.webapp_url,
            &secret,
            Duration::from_secs(config.sync.timeout_secs),
        )
    }

    /// The normalized endpoint this client targets.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Register a newly created user with the external system.
    ///
    /// Issues `GET <endpoint>?action=add_user&token=..&username=..&email=..`
    /// and reports [`SyncOutcome::Synced`] only for an HTTP 200 whose
    /// JSON body carries `"success": true`. Every other outcome, of
    /// any kind, is a soft [`SyncOutcome::Failed`].
    pub async fn sync_user(&self, username: &str, email: &str) -> SyncOutcome {
        let claims = AdminClaims::add_user(username, email);
        let token = self.signer.admin_token(&claims);

        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("action", claims.action.as_str())
            .append_pair("token", &token)
            .append_pair("username", username)
            .append_pair("email", email);

        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(username, error = %e, "user sync request failed");
                return SyncOutcome::failed(format!("request failed: {e}"));
            }
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!(username, %status, "user sync rejected by external endpoint");
            return SyncOutcome::failed(format!("unexpected status {status}"));
        }

        match response.json::<SyncResponse>().await {
            Ok(body) if body.success => {
                tracing::info!(username, "user synced to external system");
                SyncOutcome::Synced
            }
            Ok(_) => {
                tracing::warn!(username, "external endpoint reported failure");
                SyncOutcome::failed("external endpoint reported failure")
            }
            Err(e) => {
                tracing::warn!(username, error = %e, "user sync returned malformed body");
                SyncOutcome::failed(format!("malformed response body: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(base_url: &str) -> SyncClient {
        SyncClient::new(base_url, "s3cr3t", Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_missing_endpoint_rejected() {
        let err = SyncClient::new("", "s3cr3t", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, SyncError::MissingEndpoint));
    }

    #[test]
    fn test_missing_secret_rejected() {
        let err =
            SyncClient::new("https://ex.com/x", "", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, SyncError::Token(_)));
    }

    #[test]
    fn test_endpoint_query_and_fragment_stripped() {
        let client = client_for("https://ex.com/x?token=abc&mode=iframe#top");
        assert_eq!(client.endpoint().as_str(), "https://ex.com/x");
    }

    #[tokio::test]
    async fn test_sync_success() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET)
                .path("/exec")
                .query_param("action", "add_user")
                .query_param("username", "alice")
                .query_param("email", "a@x.com")
                .query_param_exists("token");
            then.status(200).json_body(json!({ "success": true }));
        });

        let client = client_for(&format!("{}/exec", server.base_url()));
        let outcome = client.sync_user("alice", "a@x.com").await;

        assert_eq!(outcome, SyncOutcome::Synced);
        m.assert();
    }

    #[tokio::test]
    async fn test_configured_query_params_do_not_leak() {
        let server = MockServer::start();
        // Any request still carrying the iframe token from the
        // configured URL lands on this mock instead of the good one.
        let leaked = server.mock(|when, then| {
            when.method(GET).path("/exec").query_param("token", "abc");
            then.status(500);
        });
        let good = server.mock(|when, then| {
            when.method(GET)
                .path("/exec")
                .query_param("action", "add_user")
                .query_param("username", "alice");
            then.status(200).json_body(json!({ "success": true }));
        });

        let client = client_for(&format!("{}/exec?token=abc", server.base_url()));
        let outcome = client.sync_user("alice", "a@x.com").await;

        assert_eq!(outcome, SyncOutcome::Synced);
        leaked.assert_hits(0);
        good.assert();
    }

    #[tokio::test]
    async fn test_non_200_is_soft_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/exec");
            then.status(500);
        });

        let client = client_for(&format!("{}/exec", server.base_url()));
        let outcome = client.sync_user("alice", "a@x.com").await;

        assert!(!outcome.is_synced());
    }

    #[tokio::test]
    async fn test_success_false_is_soft_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/exec");
            then.status(200).json_body(json!({ "success": false }));
        });

        let client = client_for(&format!("{}/exec", server.base_url()));
        assert!(!client.sync_user("alice", "a@x.com").await.is_synced());
    }

    #[tokio::test]
    async fn test_success_absent_is_soft_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/exec");
            then.status(200).json_body(json!({ "ok": true }));
        });

        let client = client_for(&format!("{}/exec", server.base_url()));
        assert!(!client.sync_user("alice", "a@x.com").await.is_synced());
    }

    #[tokio::test]
    async fn test_malformed_body_is_soft_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/exec");
            then.status(200).body("not json at all");
        });

        let client = client_for(&format!("{}/exec", server.base_url()));
        assert!(!client.sync_user("alice", "a@x.com").await.is_synced());
    }

    #[tokio::test]
    async fn test_timeout_is_soft_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/exec");
            then.status(200)
                .json_body(json!({ "success": true }))
                .delay(Duration::from_millis(500));
        });

        let client = SyncClient::new(
            &format!("{}/exec", server.base_url()),
            "s3cr3t",
            Duration::from_millis(50),
        )
        .unwrap();
        let outcome = client.sync_user("alice", "a@x.com").await;

        assert!(matches!(outcome, SyncOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn test_connection_failure_is_soft_failure() {
        // Nothing listens here.
        let client = client_for("http://127.0.0.1:1/exec");
        assert!(!client.sync_user("alice", "a@x.com").await.is_synced());
    }

    #[tokio::test]
    async fn test_token_is_well_formed_admin_token() {
        use gridgate_token::ParsedToken;

        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/exec");
            then.status(200).json_body(json!({ "success": true }));
        });

        let client = client_for(&format!("{}/exec", server.base_url()));
        client.sync_user("alice", "a@x.com").await;

        // Reconstruct what the client sent by signing the same claims
        // and checking the shape: action first, then username/email.
        let claims = gridgate_token::AdminClaims::add_user("alice", "a@x.com");
        let signer = TokenSigner::new("s3cr3t").unwrap();
        let parsed = ParsedToken::parse(&signer.admin_token(&claims)).unwrap();
        let fields = parsed.fields();
        assert_eq!(fields[0], "add_user");
        assert_eq!(fields[1], "alice");
        assert_eq!(fields[2], "a@x.com");
    }
}
