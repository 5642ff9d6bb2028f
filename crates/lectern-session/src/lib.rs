//! Session lifecycle management for Lectern.
//!
//! This crate pairs two opaque tokens — one access, one refresh — into
//! a [`Session`], and handles the lifecycle of that pairing:
//!
//! 1. **Creation** — mint both tokens for an identity in one step
//! 2. **Classification** — sort a presented token pair into one of four
//!    [`SessionState`]s (Active, Refreshable, Expired, Invalidated)
//! 3. **Refresh** — replace an expired access token with a fresh one
//!    while the refresh token rides along unchanged
//! 4. **Storage** — an in-memory store keyed by access token, with
//!    logout (`remove`) as the only destructive operation
//!
//! # How it fits in the stack
//!
//! ```text
//! Flow Layer (above)     ← maps states to HTTP outcomes and cookies
//!     ↕
//! Session Layer (this crate)  ← owns the vault; sole caller into it
//!     ↕
//! Token Layer (below)    ← mints and verifies individual tokens
//! ```
//!
//! The [`SessionManager`] owns its [`TokenVault`](lectern_token::TokenVault)
//! outright — nothing above this crate ever touches token records
//! directly.

mod error;
mod manager;
mod session;

pub use error::SessionError;
pub use manager::SessionManager;
pub use session::{
    Session, SessionConfig, SessionState, DEFAULT_ACCESS_TTL_MS, DEFAULT_REFRESH_TTL_MS,
};
