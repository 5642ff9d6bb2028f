//! Session types: the data structures that represent one login.
//!
//! A "session" is the server's record of one successful login. It
//! tracks:
//! - WHO logged in (the owner identity, an email)
//! - WHICH two tokens were minted for it (access + refresh)
//! - WHEN it was created and when each token runs out
//!
//! The expiries are duplicated here from the token vault's records for
//! convenience; they're copied from the issuance result, so they can't
//! drift from what the vault will report.

use serde::Serialize;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Access token lifetime: 30 minutes.
pub const DEFAULT_ACCESS_TTL_MS: u64 = 30 * 60 * 1_000;

/// Refresh token lifetime: 28 days.
pub const DEFAULT_REFRESH_TTL_MS: u64 = 28 * 24 * 60 * 60 * 1_000;

/// Token lifetimes for newly created sessions.
///
/// The defaults are the dashboard's fixed policy (30 minutes / 28
/// days). The refresh TTL must exceed the access TTL — a session where
/// the refresh token dies first could never be refreshed, and
/// `refresh_expires_at > access_expires_at` is an invariant the rest
/// of the stack relies on.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long (in milliseconds) a freshly minted access token lives.
    pub access_ttl_ms: u64,

    /// How long (in milliseconds) the refresh token lives. Must be
    /// greater than `access_ttl_ms`.
    pub refresh_ttl_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            access_ttl_ms: DEFAULT_ACCESS_TTL_MS,
            refresh_ttl_ms: DEFAULT_REFRESH_TTL_MS,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The classification of a presented access/refresh token pair.
///
/// This is a state machine with four terminal classifications per
/// lookup (classification is a pure read — presenting the same
/// unexpired pair twice yields the same state):
///
/// ```text
///   Active ──(30 min pass)──→ Refreshable ──(28 days pass)──→ Expired
///      ↑                           │
///      └────────(refresh)──────────┘
///
///   anything malformed / never issued ──→ Invalidated
/// ```
///
/// The tie-break rule: **access-token validity always wins**. The
/// refresh token is only consulted once the access token is confirmed
/// invalid, so a pair where both tokens are valid is Active, never
/// Refreshable.
///
/// Expired vs Invalidated matters: Expired means both tokens are
/// *known* and genuinely ran out (the user was logged in, 28 days
/// passed). Invalidated covers everything else — tampered tokens,
/// tokens from before a server restart, garbage input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// The access token is valid. Requests proceed normally.
    Active,

    /// The access token is no longer valid but the refresh token is:
    /// the caller should obtain a new access token via
    /// [`SessionManager::refresh`](crate::SessionManager::refresh).
    Refreshable,

    /// Both tokens are known but past their expiry. The user must log
    /// in again.
    Expired,

    /// At least one token is malformed or unknown (and the pair isn't
    /// cleanly expired). Treated as unauthenticated.
    Invalidated,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One login's worth of state: an access/refresh token pair plus the
/// metadata the flow layer reports back to clients.
///
/// Created at login. The access token (and its expiry) is rewritten in
/// place on refresh; the refresh token never changes for the life of
/// the session. Removed from the store at logout — and only then.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The short-lived token presented on every request. Also the
    /// session's key in the store.
    pub access_token: String,

    /// The long-lived token used solely to mint new access tokens.
    pub refresh_token: String,

    /// The identity (email) this session belongs to.
    pub owner: String,

    /// When the session was created, in epoch milliseconds.
    pub issued_at_ms: u64,

    /// When the current access token expires. Always equals the
    /// vault's record for `access_token`.
    pub access_expires_at_ms: u64,

    /// When the refresh token expires. Always equals the vault's
    /// record for `refresh_token`, and always later than
    /// `access_expires_at_ms`.
    pub refresh_expires_at_ms: u64,
}
