//! Error types for the session layer.

/// Errors that can escape the session layer.
///
/// Deliberately tiny: verification and classification failures are
/// *states*, not errors — callers branch on [`SessionState`](crate::SessionState)
/// and nothing ever panics or errors on a bad token. The one exception
/// is refreshing with a token that doesn't currently verify, which
/// signals the caller skipped the expected `classify()` precondition.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The presented refresh token is missing, malformed, unknown,
    /// expired, or not a refresh token at all. Refresh requires a
    /// currently-valid refresh token; callers should have confirmed
    /// the Refreshable state first.
    #[error("invalid refresh token")]
    InvalidRefreshToken,
}
