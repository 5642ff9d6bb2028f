//! The token vault: mints opaque tokens and verifies presented ones.
//!
//! This is the single writer of token records. Everything above it
//! (session manager, flow layer) goes through the vault's two
//! operations — `issue` and `verify` — and never touches the table
//! directly.
//!
//! # Concurrency note
//!
//! `TokenVault` is NOT thread-safe by itself — it uses a plain
//! `HashMap`, not a concurrent one. This is intentional: the vault is
//! owned by a single `SessionManager`, which is itself driven by one
//! short synchronous operation at a time. Sharing across workers would
//! need a lock or an external store at a higher level.

use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;

use crate::{Clock, IssuedToken, SystemClock, TokenKind, TokenRecord, Verification};

/// Length of a token string: 32 random bytes, hex-encoded.
pub const TOKEN_HEX_LEN: usize = 64;

/// In-memory table of issued tokens, keyed by token value.
///
/// ## Lifecycle
///
/// ```text
/// issue() ──→ [record stored] ──→ verify() ··· verify()
///                    │
///                    └──→ (never removed; expiry is checked lazily)
/// ```
///
/// Records are never deleted: logout removes the *session*, not the
/// token records behind it, and expired records simply verify as
/// expired forever. The table therefore grows without bound — a known
/// resource gap that's acceptable for a single-process prototype.
pub struct TokenVault {
    /// All issued tokens, keyed by token value. `HashMap` gives O(1)
    /// average lookup, which is all verification needs.
    records: HashMap<String, TokenRecord>,

    /// Where "now" comes from. Production uses the wall clock; tests
    /// inject a [`ManualClock`](crate::ManualClock).
    clock: Arc<dyn Clock>,
}

impl TokenVault {
    /// Creates an empty vault backed by the system wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty vault backed by the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: HashMap::new(),
            clock,
        }
    }

    /// Reads the vault's clock. The session layer uses this so that a
    /// session's `issued_at` comes from the same time source as its
    /// tokens' expiries.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Mints a token for `owner` expiring `ttl_ms` from now.
    pub fn issue(&mut self, owner: &str, kind: TokenKind, ttl_ms: u64) -> IssuedToken {
        let now = self.clock.now_ms();
        self.issue_at(now, owner, kind, ttl_ms)
    }

    /// Mints a token whose expiry is anchored to an explicit instant.
    ///
    /// Issuing an access/refresh pair means two calls; anchoring both
    /// to one `now_ms` read keeps their expiries exactly
    /// `refresh_ttl - access_ttl` apart, instead of drifting by
    /// however long the first issuance took.
    pub fn issue_at(
        &mut self,
        now_ms: u64,
        owner: &str,
        kind: TokenKind,
        ttl_ms: u64,
    ) -> IssuedToken {
        let mut token = generate_token();
        // 256 bits of entropy makes a collision astronomically
        // unlikely, but uniqueness is an invariant of the table, so
        // regenerate rather than silently overwrite a record.
        while self.records.contains_key(&token) {
            token = generate_token();
        }

        let expires_at_ms = now_ms.saturating_add(ttl_ms);
        self.records.insert(
            token.clone(),
            TokenRecord {
                owner: owner.to_string(),
                kind,
                expires_at_ms,
            },
        );

        tracing::debug!(owner, ?kind, expires_at_ms, "token issued");

        IssuedToken {
            value: token,
            expires_at_ms,
        }
    }

    /// Verifies a presented token. Never panics, never errors.
    ///
    /// Fails closed: empty input, input that isn't exactly 64 lowercase
    /// hex characters, and tokens absent from the table all come back
    /// `valid=false, expired=false`. A known token reports `expired`
    /// by lazy comparison against the clock, plus its owner and kind.
    pub fn verify(&self, token: &str) -> Verification {
        if !is_well_formed(token) {
            return Verification::rejected();
        }

        let Some(record) = self.records.get(token) else {
            return Verification::rejected();
        };

        let expired = self.clock.now_ms() >= record.expires_at_ms;
        Verification {
            valid: !expired,
            expired,
            owner: Some(record.owner.clone()),
            kind: Some(record.kind),
            expires_at_ms: Some(record.expires_at_ms),
        }
    }

    /// Returns the number of records in the table (all kinds, expired
    /// included — records are never removed).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no tokens have been issued yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for TokenVault {
    fn default() -> Self {
        Self::new()
    }
}

/// Generates a random 64-character hex string (256 bits of entropy).
///
/// `rand::rng()` is a CSPRNG, so these are safe to use as bearer
/// secrets: guessing a valid token means guessing 2^256 possibilities.
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Lexical gate applied before any table lookup: exactly
/// [`TOKEN_HEX_LEN`] characters, all lowercase hex (`^[a-f0-9]{64}$`).
fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_HEX_LEN
        && token
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

// =========================================================================
// Tests
// =========================================================================
