//! The session manager: creates, classifies, refreshes, and stores
//! sessions.
//!
//! This is the central piece of the auth core. It's responsible for:
//! - Minting a token pair when an identity logs in
//! - Classifying a presented token pair into a [`SessionState`]
//! - Refreshing expired access tokens against a valid refresh token
//! - Keeping the in-memory session store (the only destructive
//!   operation is `remove`, invoked by logout)
//! - Sweeping sessions whose refresh token has expired
//!
//! # Concurrency note
//!
//! `SessionManager` is NOT thread-safe by itself — it uses plain
//! `HashMap`s, not concurrent ones. This is intentional: every
//! operation is short, synchronous, and non-suspending, and the
//! manager is meant to be owned by a single request-handling task (or
//! wrapped in a mutex at a higher level). Multiple worker processes
//! sharing session state would need an external store instead; the
//! in-memory maps are implicitly single-instance.

use std::collections::HashMap;
use std::sync::Arc;

use lectern_token::{Clock, IssuedToken, TokenKind, TokenVault, Verification};

use crate::{Session, SessionConfig, SessionError, SessionState};

/// Orchestrates the session lifecycle over an owned [`TokenVault`].
///
/// ## Lifecycle
///
/// ```text
/// create_session() ──→ store() ──→ classify() ··· classify()
///                                      │
///                        [Refreshable] ▼
///                    refresh() ──→ apply_refresh()
///                                      │
///                             [logout] ▼
///                                  remove()
/// ```
///
/// The manager owns the vault and is its sole caller — callers above
/// this layer see tokens only as opaque strings and states.
pub struct SessionManager {
    /// The token table. Private by design: nothing outside the
    /// session layer touches token records.
    vault: TokenVault,

    /// Stored sessions, keyed by access token. A refresh re-keys the
    /// entry (the access token IS the key), which `apply_refresh`
    /// handles.
    sessions: HashMap<String, Session>,

    /// Token lifetimes for new sessions.
    config: SessionConfig,
}

impl SessionManager {
    /// Creates an empty manager backed by the system wall clock.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            vault: TokenVault::new(),
            sessions: HashMap::new(),
            config,
        }
    }

    /// Creates an empty manager backed by the given clock. Tests and
    /// demos pass a [`ManualClock`](lectern_token::ManualClock) here
    /// to simulate token expiry without waiting 28 days.
    pub fn with_clock(config: SessionConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            vault: TokenVault::with_clock(clock),
            sessions: HashMap::new(),
            config,
        }
    }

    /// Mints an access/refresh token pair for `identity` and assembles
    /// a [`Session`].
    ///
    /// Both expiries are anchored to the same `issued_at` instant, so
    /// `refresh_expires - access_expires` is exactly the difference of
    /// the two configured TTLs.
    ///
    /// The session is returned, not stored — login calls
    /// [`store`](Self::store) separately once the caller decides to
    /// keep it.
    pub fn create_session(&mut self, identity: &str) -> Session {
        let now = self.vault.now_ms();
        let access = self
            .vault
            .issue_at(now, identity, TokenKind::Access, self.config.access_ttl_ms);
        let refresh = self
            .vault
            .issue_at(now, identity, TokenKind::Refresh, self.config.refresh_ttl_ms);

        tracing::info!(identity, issued_at_ms = now, "session created");

        Session {
            access_token: access.value,
            refresh_token: refresh.value,
            owner: identity.to_string(),
            issued_at_ms: now,
            access_expires_at_ms: access.expires_at_ms,
            refresh_expires_at_ms: refresh.expires_at_ms,
        }
    }

    /// Classifies a presented token pair into one of the four states.
    ///
    /// Access-token validity takes priority: the refresh token is only
    /// consulted once the access token is confirmed invalid. A pure
    /// read — calling this never changes anything, and repeated calls
    /// with the same unexpired tokens return the same state.
    pub fn classify(&self, access_token: &str, refresh_token: &str) -> SessionState {
        let access = self.vault.verify(access_token);
        if access.valid {
            return SessionState::Active;
        }

        let refresh = self.vault.verify(refresh_token);
        if refresh.valid {
            return SessionState::Refreshable;
        }

        // Neither token works. "Expired" is reserved for the honest
        // case — both tokens known, both past expiry. Anything
        // murkier (malformed, never issued) is Invalidated.
        if access.expired && refresh.expired {
            SessionState::Expired
        } else {
            SessionState::Invalidated
        }
    }

    /// Mints a new access token against a currently-valid refresh
    /// token.
    ///
    /// The refresh token is re-verified here even though callers are
    /// expected to have seen [`SessionState::Refreshable`] first —
    /// refresh hands out a credential, so it doesn't trust the caller
    /// to have checked. The refresh token itself is not rotated, and
    /// the old access token's record stays in the vault (it expires on
    /// its own schedule).
    ///
    /// # Errors
    /// Returns [`SessionError::InvalidRefreshToken`] if the token
    /// fails verification or isn't a refresh token.
    pub fn refresh(&mut self, refresh_token: &str) -> Result<IssuedToken, SessionError> {
        let v = self.vault.verify(refresh_token);
        if !v.valid || v.kind != Some(TokenKind::Refresh) {
            return Err(SessionError::InvalidRefreshToken);
        }
        // A valid verification always carries the owner.
        let Some(owner) = v.owner else {
            return Err(SessionError::InvalidRefreshToken);
        };

        let new_access = self
            .vault
            .issue(&owner, TokenKind::Access, self.config.access_ttl_ms);

        tracing::info!(
            identity = %owner,
            expires_at_ms = new_access.expires_at_ms,
            "access token refreshed"
        );

        Ok(new_access)
    }

    /// Rewrites the stored session behind `refresh_token` with a newly
    /// minted access token, re-keying the store entry.
    ///
    /// This is the in-place mutation half of the refresh transition:
    /// [`refresh`](Self::refresh) mints the token,
    /// `apply_refresh` moves the stored session under its new key.
    /// Only the access token and its expiry change — owner, refresh
    /// token, and `issued_at` stay put.
    ///
    /// Returns the updated session, or `None` if no stored session
    /// carries that refresh token.
    pub fn apply_refresh(
        &mut self,
        refresh_token: &str,
        new_access: &IssuedToken,
    ) -> Option<&Session> {
        let old_key = self
            .sessions
            .iter()
            .find(|(_, s)| s.refresh_token == refresh_token)
            .map(|(k, _)| k.clone())?;

        // Remove-then-insert because the access token is the map key.
        let mut session = self.sessions.remove(&old_key)?;
        session.access_token = new_access.value.clone();
        session.access_expires_at_ms = new_access.expires_at_ms;
        self.sessions.insert(new_access.value.clone(), session);

        self.sessions.get(&new_access.value)
    }

    // -- Store operations --------------------------------------------------

    /// Stores a session, keyed by its access token.
    pub fn store(&mut self, session: Session) {
        self.sessions.insert(session.access_token.clone(), session);
    }

    /// Looks up a stored session by access token.
    pub fn get(&self, access_token: &str) -> Option<&Session> {
        self.sessions.get(access_token)
    }

    /// Removes a session from the store. This is logout — the only
    /// destructive operation on the store. Token records in the vault
    /// are untouched; the tokens just stop mapping to a session.
    ///
    /// Returns the removed session, or `None` if nothing was stored
    /// under that access token.
    pub fn remove(&mut self, access_token: &str) -> Option<Session> {
        let removed = self.sessions.remove(access_token);
        if let Some(session) = &removed {
            tracing::info!(identity = %session.owner, "session removed");
        }
        removed
    }

    /// Finds a stored session by its refresh token. A linear scan —
    /// the store is keyed by access token, and the refresh path is
    /// rare enough (once per 30 minutes per user) not to warrant a
    /// second index.
    pub fn get_by_refresh_token(&self, refresh_token: &str) -> Option<&Session> {
        self.sessions
            .values()
            .find(|s| s.refresh_token == refresh_token)
    }

    /// Drops every stored session whose refresh token has expired —
    /// nothing could ever revive those, they only hold memory.
    ///
    /// Nothing calls this automatically; expiry stays lazy. A host
    /// that cares about memory under long uptimes calls this on
    /// whatever schedule it likes. Returns the number of sessions
    /// removed.
    pub fn sweep_stale(&mut self) -> usize {
        let now = self.vault.now_ms();
        let before = self.sessions.len();
        self.sessions.retain(|_, s| now < s.refresh_expires_at_ms);

        let removed = before - self.sessions.len();
        if removed > 0 {
            tracing::info!(removed, "swept stale sessions");
        }
        removed
    }

    /// Verifies a single token against the vault. The delegated read
    /// for callers above this layer — they never hold the vault.
    pub fn verify(&self, token: &str) -> Verification {
        self.vault.verify(token)
    }

    /// Reads the manager's clock (epoch milliseconds).
    pub fn now_ms(&self) -> u64 {
        self.vault.now_ms()
    }

    /// Returns the number of stored sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if no sessions are stored.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
