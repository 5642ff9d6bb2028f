//! The three auth flows the HTTP layer drives: login, session check,
//! and logout.
//!
//! Each flow is one method on [`AuthGateway`] and returns everything
//! the HTTP layer needs — a serializable response payload plus the
//! [`CookieDirective`]s to apply. The gateway owns the
//! [`SessionManager`] (and through it the token vault); the HTTP layer
//! holds only opaque strings it read from cookies.
//!
//! Failure is split the way the rest of the stack splits it: login
//! rejections are [`FlowError`] values the HTTP layer maps to status
//! codes; a failed session check is not an error at all, just the
//! [`SessionCheck::Unauthenticated`] variant.

use std::sync::Arc;

use serde::Serialize;

use lectern_session::{Session, SessionConfig, SessionManager, SessionState};
use lectern_token::Clock;

use crate::cookies::{grant_cookies, refresh_cookies, CookieDirective};
use crate::credentials::CredentialPolicy;

// ---------------------------------------------------------------------------
// Errors and wire payloads
// ---------------------------------------------------------------------------

/// Why a login was rejected.
///
/// Format problems are distinguished from a credential mismatch so the
/// client can show the right message; the HTTP layer maps each variant
/// to a status code via [`FlowError::status_code`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FlowError {
    /// One or both fields were empty.
    #[error("email and password are required")]
    MissingCredentials,

    /// The email doesn't look like `local@domain.tld`.
    #[error("invalid email format")]
    InvalidEmailFormat,

    /// The password fails the dashboard's policy.
    #[error("password must be at least 8 characters and contain a special character")]
    WeakPassword,

    /// Well-formed credentials that don't match any known identity.
    /// Deliberately vague — doesn't say which half was wrong.
    #[error("invalid email or password")]
    InvalidCredentials,
}

impl FlowError {
    /// The HTTP status this rejection maps to: 400 for malformed
    /// input, 401 for a credential mismatch.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingCredentials | Self::InvalidEmailFormat | Self::WeakPassword => 400,
            Self::InvalidCredentials => 401,
        }
    }

    /// The error body the HTTP layer serializes.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            status_code: self.status_code(),
        }
    }
}

/// Wire-facing error body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Human-readable rejection message.
    pub error: String,
    /// The HTTP status the message pairs with.
    pub status_code: u16,
}

/// The teacher identity reported back to the client.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TeacherProfile {
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
}

/// The pair of absolute expiries (epoch milliseconds) the client sees.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryPair {
    /// When the current access token expires.
    pub access_token: u64,
    /// When the refresh token expires.
    pub refresh_token: u64,
}

/// Wire-facing login response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Always `true` — failures are [`ErrorResponse`]s instead.
    pub success: bool,
    /// Who logged in.
    pub teacher: TeacherProfile,
    /// Both token expiries.
    pub expires_at: ExpiryPair,
}

/// Everything a successful login produces.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    /// The stored session (tokens included) — the HTTP layer reads
    /// the token values from here when rendering cookies.
    pub session: Session,
    /// Who logged in.
    pub teacher: TeacherProfile,
    /// The five cookies to set.
    pub cookies: Vec<CookieDirective>,
}

impl LoginGrant {
    /// The JSON body the login endpoint returns.
    pub fn to_response(&self) -> LoginResponse {
        LoginResponse {
            success: true,
            teacher: self.teacher.clone(),
            expires_at: ExpiryPair {
                access_token: self.session.access_expires_at_ms,
                refresh_token: self.session.refresh_expires_at_ms,
            },
        }
    }
}

/// Wire-facing session-check response body (the 200 case).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCheckResponse {
    /// Always `true` — an invalid session is reported as
    /// [`SessionCheck::Unauthenticated`], not as a body.
    pub valid: bool,
    /// Who the session belongs to.
    pub teacher: TeacherProfile,
    /// Current token expiries (post-refresh values when refreshed).
    pub expires_at: ExpiryPair,
    /// Whether this check minted a new access token.
    pub refreshed: bool,
}

/// The outcome of a session check.
#[derive(Debug, Clone)]
pub enum SessionCheck {
    /// The access token is valid; nothing changed.
    Active {
        /// Body to return with `refreshed: false`.
        response: SessionCheckResponse,
    },

    /// The access token was expired but the refresh token valid: a new
    /// access token was minted and the stored session rewritten.
    Refreshed {
        /// Body to return with `refreshed: true` and the new expiry.
        response: SessionCheckResponse,
        /// The two cookies to rewrite (new access token + companion).
        cookies: Vec<CookieDirective>,
    },

    /// The caller is not authenticated: the pair classified Expired or
    /// Invalidated, or no stored session backs the tokens. The HTTP
    /// layer returns 401.
    Unauthenticated {
        /// The classification that led here, for logging.
        state: SessionState,
    },
}

// ---------------------------------------------------------------------------
// AuthGateway
// ---------------------------------------------------------------------------

/// The facade the HTTP layer talks to: credential policy + session
/// manager behind three flow methods.
///
/// Generic over the [`CredentialPolicy`] the same way the session
/// layer is generic over its clock: production wires in
/// [`FixedCredentials`](crate::FixedCredentials), tests wire in
/// whatever they need.
pub struct AuthGateway<P: CredentialPolicy> {
    policy: P,
    sessions: SessionManager,
}

impl<P: CredentialPolicy> AuthGateway<P> {
    /// Creates a gateway on the system wall clock.
    pub fn new(policy: P, config: SessionConfig) -> Self {
        Self {
            policy,
            sessions: SessionManager::new(config),
        }
    }

    /// Creates a gateway on an injected clock (tests, demos).
    pub fn with_clock(policy: P, config: SessionConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            policy,
            sessions: SessionManager::with_clock(config, clock),
        }
    }

    /// The login flow: validate the submission's shape, check
    /// credentials, create and store a session.
    ///
    /// Validation order matters for the client's error message:
    /// missing fields, then email shape, then password policy, then
    /// the credential comparison.
    ///
    /// # Errors
    /// A [`FlowError`] describing the first check that failed.
    pub fn login(&mut self, email: &str, password: &str) -> Result<LoginGrant, FlowError> {
        if email.is_empty() || password.is_empty() {
            return Err(FlowError::MissingCredentials);
        }
        if !crate::email_is_valid(email) {
            return Err(FlowError::InvalidEmailFormat);
        }
        if !crate::password_meets_policy(password) {
            return Err(FlowError::WeakPassword);
        }

        let Some(identity) = self.policy.authenticate(email, password) else {
            tracing::warn!(email, "login rejected: credential mismatch");
            return Err(FlowError::InvalidCredentials);
        };

        let session = self.sessions.create_session(&identity.email);
        self.sessions.store(session.clone());

        tracing::info!(email = %identity.email, "login succeeded");

        let cookies = grant_cookies(&session);
        Ok(LoginGrant {
            teacher: TeacherProfile {
                email: identity.email,
                name: identity.display_name,
            },
            session,
            cookies,
        })
    }

    /// The session-check flow: classify the presented pair and either
    /// confirm it, transparently refresh it, or reject it.
    ///
    /// The stored session is the source of truth for what gets
    /// reported back — tokens that verify but no longer map to a
    /// stored session (logged out, or from before a restart) come back
    /// `Unauthenticated`, which is what makes logout stick.
    pub fn check_session(&mut self, access_token: &str, refresh_token: &str) -> SessionCheck {
        let state = self.sessions.classify(access_token, refresh_token);

        match state {
            SessionState::Active => {
                let Some(session) = self.sessions.get(access_token) else {
                    tracing::debug!("valid access token without a stored session");
                    return SessionCheck::Unauthenticated {
                        state: SessionState::Invalidated,
                    };
                };
                SessionCheck::Active {
                    response: self.response_for(session, false),
                }
            }

            SessionState::Refreshable => {
                // Refresh re-validates defensively; a failure here
                // means the token aged out between classify and now.
                let Ok(new_access) = self.sessions.refresh(refresh_token) else {
                    return SessionCheck::Unauthenticated { state };
                };
                let Some(updated) = self.sessions.apply_refresh(refresh_token, &new_access)
                else {
                    tracing::debug!("valid refresh token without a stored session");
                    return SessionCheck::Unauthenticated {
                        state: SessionState::Invalidated,
                    };
                };
                let updated = updated.clone();
                SessionCheck::Refreshed {
                    response: self.response_for(&updated, true),
                    cookies: refresh_cookies(&updated),
                }
            }

            SessionState::Expired | SessionState::Invalidated => {
                tracing::debug!(?state, "session check rejected");
                SessionCheck::Unauthenticated { state }
            }
        }
    }

    /// The logout flow: remove the stored session. Returns whether a
    /// session was actually removed; either way the HTTP layer clears
    /// all five cookies ([`clear_cookies`](crate::clear_cookies)).
    ///
    /// Token records stay in the vault — they expire on their own —
    /// but without a stored session the pair can no longer pass a
    /// session check.
    pub fn logout(&mut self, access_token: &str) -> bool {
        self.sessions.remove(access_token).is_some()
    }

    /// Drops stored sessions whose refresh token has expired. Hosts
    /// call this on their own schedule; nothing sweeps automatically.
    pub fn sweep_stale(&mut self) -> usize {
        self.sessions.sweep_stale()
    }

    /// Read access to the session manager, for hosts that want to
    /// inspect state (health endpoints, tests).
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Builds the check response for a stored session. The display
    /// name comes from the policy; an identity that has a session but
    /// no profile (shouldn't happen with a fixed policy) falls back to
    /// the email.
    fn response_for(&self, session: &Session, refreshed: bool) -> SessionCheckResponse {
        let name = self
            .policy
            .lookup(&session.owner)
            .map(|i| i.display_name)
            .unwrap_or_else(|| session.owner.clone());
        SessionCheckResponse {
            valid: true,
            teacher: TeacherProfile {
                email: session.owner.clone(),
                name,
            },
            expires_at: ExpiryPair {
                access_token: session.access_expires_at_ms,
                refresh_token: session.refresh_expires_at_ms,
            },
            refreshed,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for the flow layer. Policy doubles stand in for
    //! `FixedCredentials` where the scenario needs them; clock-driven
    //! scenarios live in `tests/auth_flows.rs`.

    use super::*;
    use crate::credentials::{FixedCredentials, Identity};

    const EMAIL: &str = "teacher1@teacher.com";
    const PASSWORD: &str = "Password!";

    fn gateway() -> AuthGateway<FixedCredentials> {
        AuthGateway::new(FixedCredentials::default(), SessionConfig::default())
    }

    /// A policy that accepts any well-formed submission. Used to test
    /// the flows independently of the fixed credential pair.
    struct AcceptAll;

    impl CredentialPolicy for AcceptAll {
        fn authenticate(&self, email: &str, _password: &str) -> Option<Identity> {
            self.lookup(email)
        }

        fn lookup(&self, email: &str) -> Option<Identity> {
            Some(Identity {
                email: email.to_string(),
                display_name: "Anyone".to_string(),
            })
        }
    }

    // =====================================================================
    // login()
    // =====================================================================

    #[test]
    fn test_login_happy_path_stores_session_and_sets_cookies() {
        let mut gw = gateway();

        let grant = gw.login(EMAIL, PASSWORD).expect("should succeed");

        assert_eq!(grant.teacher.email, EMAIL);
        assert_eq!(grant.teacher.name, "Teacher One");
        assert_eq!(grant.cookies.len(), 5);
        assert!(gw.sessions().get(&grant.session.access_token).is_some());

        let response = grant.to_response();
        assert!(response.success);
        assert_eq!(
            response.expires_at.access_token,
            grant.session.access_expires_at_ms
        );
    }

    #[test]
    fn test_login_empty_fields_is_missing_credentials() {
        let mut gw = gateway();

        assert_eq!(gw.login("", PASSWORD).unwrap_err(), FlowError::MissingCredentials);
        assert_eq!(gw.login(EMAIL, "").unwrap_err(), FlowError::MissingCredentials);
        assert_eq!(gw.login("", "").unwrap_err(), FlowError::MissingCredentials);
    }

    #[test]
    fn test_login_bad_email_shape_is_format_error() {
        let mut gw = gateway();

        assert_eq!(
            gw.login("not-an-email", PASSWORD).unwrap_err(),
            FlowError::InvalidEmailFormat
        );
    }

    #[test]
    fn test_login_weak_password_is_policy_error() {
        let mut gw = gateway();

        // Correct email, policy-failing password: rejected before the
        // credential comparison ever runs.
        assert_eq!(gw.login(EMAIL, "short!").unwrap_err(), FlowError::WeakPassword);
        assert_eq!(
            gw.login(EMAIL, "nospecialchar").unwrap_err(),
            FlowError::WeakPassword
        );
    }

    #[test]
    fn test_login_wrong_credentials_is_unauthorized() {
        let mut gw = gateway();

        let result = gw.login("other@teacher.com", "Wrong-Pass1!");

        assert_eq!(result.unwrap_err(), FlowError::InvalidCredentials);
        assert!(gw.sessions().is_empty(), "no session on failed login");
    }

    #[test]
    fn test_login_error_maps_to_status_codes() {
        assert_eq!(FlowError::MissingCredentials.status_code(), 400);
        assert_eq!(FlowError::InvalidEmailFormat.status_code(), 400);
        assert_eq!(FlowError::WeakPassword.status_code(), 400);
        assert_eq!(FlowError::InvalidCredentials.status_code(), 401);

        let body = FlowError::InvalidCredentials.to_response();
        assert_eq!(body.error, "invalid email or password");
        assert_eq!(body.status_code, 401);
    }

    #[test]
    fn test_login_with_permissive_policy_accepts_any_identity() {
        let mut gw = AuthGateway::new(AcceptAll, SessionConfig::default());

        let grant = gw.login("someone@else.org", "Whatever-1!").expect("accept-all");

        assert_eq!(grant.session.owner, "someone@else.org");
    }

    // =====================================================================
    // check_session()
    // =====================================================================

    #[test]
    fn test_check_session_fresh_login_is_active() {
        let mut gw = gateway();
        let grant = gw.login(EMAIL, PASSWORD).unwrap();

        let check =
            gw.check_session(&grant.session.access_token, &grant.session.refresh_token);

        match check {
            SessionCheck::Active { response } => {
                assert!(response.valid);
                assert!(!response.refreshed);
                assert_eq!(response.teacher.name, "Teacher One");
                assert_eq!(
                    response.expires_at.access_token,
                    grant.session.access_expires_at_ms
                );
            }
            other => panic!("expected Active, got {other:?}"),
        }
    }

    #[test]
    fn test_check_session_garbage_tokens_is_unauthenticated() {
        let mut gw = gateway();

        let check = gw.check_session("", "not-hex");

        assert!(matches!(
            check,
            SessionCheck::Unauthenticated {
                state: SessionState::Invalidated
            }
        ));
    }

    #[test]
    fn test_check_session_after_logout_is_unauthenticated() {
        // The tokens still verify (records outlive the session), but
        // no stored session backs them — logout must stick.
        let mut gw = gateway();
        let grant = gw.login(EMAIL, PASSWORD).unwrap();
        gw.logout(&grant.session.access_token);

        let check =
            gw.check_session(&grant.session.access_token, &grant.session.refresh_token);

        assert!(matches!(check, SessionCheck::Unauthenticated { .. }));
    }

    // =====================================================================
    // logout()
    // =====================================================================

    #[test]
    fn test_logout_removes_stored_session() {
        let mut gw = gateway();
        let grant = gw.login(EMAIL, PASSWORD).unwrap();

        assert!(gw.logout(&grant.session.access_token));
        assert!(gw.sessions().is_empty());
    }

    #[test]
    fn test_logout_twice_reports_nothing_to_remove() {
        let mut gw = gateway();
        let grant = gw.login(EMAIL, PASSWORD).unwrap();

        assert!(gw.logout(&grant.session.access_token));
        assert!(!gw.logout(&grant.session.access_token));
    }

    #[test]
    fn test_logout_unknown_token_reports_false() {
        let mut gw = gateway();

        assert!(!gw.logout("never-issued"));
    }
}
