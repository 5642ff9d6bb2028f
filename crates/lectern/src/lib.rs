//! # Lectern
//!
//! The authentication/session core of a single-teacher dashboard
//! prototype: opaque access/refresh token pairs, a four-state session
//! lifecycle, and the login / session-check / logout flows an HTTP
//! layer drives.
//!
//! Lectern is deliberately NOT an identity provider. One hardcoded
//! teacher, in-memory state, no cryptographic signing — tokens are
//! random lookup keys, not signed claims. What it does provide is a
//! clean seam: an HTTP layer maps requests onto [`AuthGateway`] calls
//! and renders the returned payloads and [`CookieDirective`]s; it
//! never touches tokens or sessions directly.
//!
//! ## Quick Start
//!
//! ```rust
//! use lectern::{AuthGateway, FixedCredentials, SessionCheck};
//! use lectern_session::SessionConfig;
//!
//! let mut gateway = AuthGateway::new(FixedCredentials::default(), SessionConfig::default());
//!
//! let grant = gateway
//!     .login("teacher1@teacher.com", "Password!")
//!     .expect("prototype credentials");
//!
//! match gateway.check_session(&grant.session.access_token, &grant.session.refresh_token) {
//!     SessionCheck::Active { response } => assert!(response.valid),
//!     _ => unreachable!("fresh session is active"),
//! }
//!
//! assert!(gateway.logout(&grant.session.access_token));
//! ```

mod cookies;
mod credentials;
mod flows;

pub use cookies::{
    clear_cookies, grant_cookies, refresh_cookies, CookieDirective, ACCESS_MAX_AGE_SECS,
    COOKIE_ACCESS_TOKEN, COOKIE_ACCESS_TOKEN_EXPIRES, COOKIE_REFRESH_TOKEN,
    COOKIE_REFRESH_TOKEN_EXPIRES, COOKIE_TEACHER_EMAIL, REFRESH_MAX_AGE_SECS,
};
pub use credentials::{
    email_is_valid, password_meets_policy, CredentialPolicy, FixedCredentials, Identity,
};
pub use flows::{
    AuthGateway, ErrorResponse, ExpiryPair, FlowError, LoginGrant, LoginResponse, SessionCheck,
    SessionCheckResponse, TeacherProfile,
};
