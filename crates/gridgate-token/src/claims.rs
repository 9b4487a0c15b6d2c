//! Typed payload schemas for the two token kinds.
//!
//! Field order is part of the wire contract: the verifier splits the
//! payload on `|` and reads fields positionally. For admin tokens the
//! action literal must come first so the verifier can dispatch on it
//! before parsing the rest.

use chrono::Utc;

/// Claims for a viewer token: who is viewing, when, and from which
/// origin. The verifier binds the iframe session to the origin and
/// rejects stale timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerClaims {
    /// Identity of the viewer (user id or username).
    pub subject_id: String,
    /// Unix timestamp (seconds) at mint time.
    pub timestamp: i64,
    /// Origin URL of the embedding page, e.g. "http://localhost:8000".
    pub origin: String,
}

impl ViewerClaims {
    /// Claims stamped with the current time.
    pub fn new(subject_id: impl Into<String>, origin: impl Into<String>) -> Self {
        Self::at(subject_id, Utc::now().timestamp(), origin)
    }

    /// Claims with an explicit timestamp.
    pub fn at(
        subject_id: impl Into<String>,
        timestamp: i64,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            timestamp,
            origin: origin.into(),
        }
    }

    /// Payload fields in wire order: `subject_id | timestamp | origin`.
    ///
    /// Fields must not contain a literal `|`; boundaries become
    /// ambiguous to the verifier otherwise. This is the caller's
    /// obligation, matching the deployed verifier.
    pub fn fields(&self) -> [String; 3] {
        [
            self.subject_id.clone(),
            self.timestamp.to_string(),
            self.origin.clone(),
        ]
    }
}

/// Server-to-server actions a shared secret can authorize.
///
/// A single secret covers every action type; the action literal in the
/// payload is what disambiguates them as the schema grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    /// Register a new user in the external system.
    AddUser,
}

impl AdminAction {
    /// The wire literal for this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminAction::AddUser => "add_user",
        }
    }
}

impl std::fmt::Display for AdminAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims for an admin action token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminClaims {
    /// The action being authorized.
    pub action: AdminAction,
    /// Username of the affected user.
    pub username: String,
    /// Email of the affected user.
    pub email: String,
    /// Unix timestamp (seconds) at mint time.
    pub timestamp: i64,
}

impl AdminClaims {
    /// `add_user` claims stamped with the current time.
    pub fn add_user(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            action: AdminAction::AddUser,
            username: username.into(),
            email: email.into(),
            timestamp: Utc::now().timestamp(),
        }
    }

    /// Payload fields in wire order: `action | username | email | timestamp`.
    ///
    /// Same `|` caveat as [`ViewerClaims::fields`].
    pub fn fields(&self) -> [String; 4] {
        [
            self.action.as_str().to_string(),
            self.username.clone(),
            self.email.clone(),
            self.timestamp.to_string(),
        ]
    }
}
