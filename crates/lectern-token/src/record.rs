//! Token types: what the vault remembers about each minted token.
//!
//! A token string on its own means nothing — all of its meaning lives
//! server-side in a [`TokenRecord`]: WHO it was issued for, WHAT role
//! it plays (access vs refresh), and WHEN it stops being valid.

/// The role a token plays in a session.
///
/// - **Access**: short-lived (minutes), presented on every request.
/// - **Refresh**: long-lived (weeks), used solely to obtain a new
///   access token without re-entering credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived credential authorizing normal requests.
    Access,
    /// Long-lived credential used only to mint new access tokens.
    Refresh,
}

/// Server-side metadata for one issued token.
///
/// Records are immutable once stored: the owner and expiry of a token
/// value never change after issuance. Logout removes *sessions*, not
/// token records, so a record outlives any session built on it.
#[derive(Debug, Clone)]
pub struct TokenRecord {
    /// The identity (email) the token was issued for.
    pub owner: String,

    /// Whether this is an access or a refresh token.
    pub kind: TokenKind,

    /// Absolute expiry, in milliseconds since the Unix epoch.
    /// The token is valid strictly before this instant.
    pub expires_at_ms: u64,
}

/// A freshly minted token, handed back from
/// [`TokenVault::issue`](crate::TokenVault::issue).
///
/// Carries the expiry alongside the token string so callers never
/// recompute it — a session's duplicated expiry field is *copied* from
/// here, which is what keeps it equal to the vault's record by
/// construction.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The opaque token value: 64 lowercase hex characters.
    pub value: String,

    /// When the token expires, in epoch milliseconds.
    pub expires_at_ms: u64,
}

/// The outcome of verifying a presented token.
///
/// Verification *fails closed* and never errors: malformed input, an
/// unknown token, and an expired token are all ordinary outcomes,
/// distinguished by the two flags:
///
/// | `valid` | `expired` | meaning                                  |
/// |---------|-----------|------------------------------------------|
/// | `true`  | `false`   | token is known and inside its lifetime   |
/// | `false` | `true`    | token is known but past its expiry       |
/// | `false` | `false`   | empty / malformed / never issued         |
///
/// Owner, kind, and expiry are only reported for a *known* token
/// (valid or expired) — a rejected token reveals nothing.
#[derive(Debug, Clone)]
pub struct Verification {
    /// The token is known and currently inside its lifetime.
    pub valid: bool,

    /// The token is known but its expiry has passed.
    pub expired: bool,

    /// The identity the token was issued for, when the token is known.
    pub owner: Option<String>,

    /// The token's role, when the token is known.
    pub kind: Option<TokenKind>,

    /// The token's absolute expiry, when the token is known.
    pub expires_at_ms: Option<u64>,
}

impl Verification {
    /// The fail-closed outcome: not valid, not expired, no metadata.
    /// Used for empty, malformed, and never-issued tokens.
    pub(crate) fn rejected() -> Self {
        Self {
            valid: false,
            expired: false,
            owner: None,
            kind: None,
            expires_at_ms: None,
        }
    }
}
