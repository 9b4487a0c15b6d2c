//! # gridgate-token
//!
//! Signed token construction for the Gridgate portal.
//!
//! This crate produces the compact tokens the external spreadsheet app
//! verifies:
//! - **Viewer tokens** grant a signed-in user access to the embedded
//!   iframe widget.
//! - **Admin tokens** authorize a server-to-server action (currently
//!   only `add_user`).
//!
//! ## Wire format
//!
//! ```text
//! base64url(payload) "." base64url(hmac_sha256(secret, payload))
//! ```
//!
//! The payload is a pipe-joined UTF-8 field list; base64 is URL-safe
//! without padding. This encoding is a contract with the external
//! verifier and must stay bit-exact.
//!
//! ## Trust model
//!
//! One shared secret signs both token types. There is no token-type
//! isolation, no revocation, and no local freshness check; the remote
//! verifier compares the embedded timestamp against its own policy
//! window. This is a deliberate trade-off for a low-value internal
//! integration, not a general-purpose credential scheme. Tokens are
//! only ever *produced* here; verification is the remote side's job.

pub mod claims;
pub mod error;
pub mod signer;

pub use claims::{AdminAction, AdminClaims, ViewerClaims};
pub use error::TokenError;
pub use signer::{ParsedToken, TokenSigner};
