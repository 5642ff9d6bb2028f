//! Opaque token issuance and verification for Lectern.
//!
//! This crate is the bottom of the auth stack. It mints random opaque
//! tokens (no embedded claims — just 256 bits of entropy as lowercase
//! hex) and answers one question: "is this token currently valid, and
//! for whom?"
//!
//! Tokens are *opaque* on purpose: verification requires a server-side
//! lookup in the [`TokenVault`], which keeps the token format trivially
//! simple and leaks nothing to the client. The trade-off is that the
//! vault is the single source of truth — a multi-instance deployment
//! would need either a shared store or self-describing signed tokens
//! (HMAC/JWT). That's an extension point, not something this crate does.
//!
//! # How it fits in the stack
//!
//! ```text
//! Flow Layer (above)     ← login / session-check / logout orchestration
//!     ↕
//! Session Layer          ← pairs tokens into sessions, classifies state
//!     ↕
//! Token Layer (this crate)  ← mints and verifies individual tokens
//! ```

mod clock;
mod record;
mod vault;

pub use clock::{Clock, ManualClock, SystemClock};
pub use record::{IssuedToken, TokenKind, TokenRecord, Verification};
pub use vault::{TokenVault, TOKEN_HEX_LEN};
