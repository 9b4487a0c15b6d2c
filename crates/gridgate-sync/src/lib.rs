//! # gridgate-sync
//!
//! Best-effort notification of newly registered users to the external
//! spreadsheet system.
//!
//! The sync call is fire-and-forget: it runs on the request that
//! triggered it, carries an admin-signed token, and collapses every
//! runtime failure (non-200, timeout, transport error, malformed body)
//! into [`SyncOutcome::Failed`]. Nothing here may abort a registration
//! that already committed locally. There are no retries, no queueing,
//! and no circuit breaking; the downstream sheet is a convenience
//! mirror, not the source of truth.
//!
//! Configuration problems (missing endpoint or secret) are different:
//! they surface as [`SyncError`] when the client is constructed, since
//! no call could ever succeed without them.

pub mod client;
pub mod error;

pub use client::{SyncClient, SyncOutcome};
pub use error::SyncError;
