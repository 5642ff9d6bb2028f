//! The cookie contract between the auth core and its HTTP layer.
//!
//! The core never talks HTTP, but the dashboard's wire format is fixed:
//! five cookies, named here, carried as HttpOnly / Secure /
//! SameSite=Strict on `Path=/`. The flow layer returns
//! [`CookieDirective`]s describing exactly which cookies to set (or
//! clear) after each operation; the HTTP layer renders them into
//! `Set-Cookie` headers with [`CookieDirective::header_value`].
//!
//! Two of the five (`*_expires`) plus the email cookie are plaintext
//! companions to the opaque tokens — the client can't decode a token,
//! so its expiry and owner ride alongside. Server-side, the session
//! store stays authoritative; the companions are a convenience copy
//! for the client only.

use lectern_session::Session;

/// Cookie holding the access token.
pub const COOKIE_ACCESS_TOKEN: &str = "session_access_token";

/// Cookie holding the refresh token.
pub const COOKIE_REFRESH_TOKEN: &str = "session_refresh_token";

/// Plaintext companion: access token expiry, epoch milliseconds.
pub const COOKIE_ACCESS_TOKEN_EXPIRES: &str = "session_access_token_expires";

/// Plaintext companion: refresh token expiry, epoch milliseconds.
pub const COOKIE_REFRESH_TOKEN_EXPIRES: &str = "session_refresh_token_expires";

/// Plaintext companion: the session owner's email.
pub const COOKIE_TEACHER_EMAIL: &str = "session_teacher_email";

/// Max-Age for access-token-scoped cookies: 30 minutes.
pub const ACCESS_MAX_AGE_SECS: u32 = 1_800;

/// Max-Age for refresh-token-scoped cookies: 28 days.
pub const REFRESH_MAX_AGE_SECS: u32 = 2_419_200;

/// One cookie the HTTP layer should set.
///
/// The attribute set is fixed for every session cookie (HttpOnly,
/// Secure, SameSite=Strict, Path=/) — only the name, value, and
/// Max-Age vary. A cleared cookie is an empty value with Max-Age 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieDirective {
    /// Cookie name, one of the five `COOKIE_*` constants.
    pub name: &'static str,

    /// Cookie value; empty when clearing.
    pub value: String,

    /// Max-Age in seconds; 0 clears the cookie.
    pub max_age_secs: u32,
}

impl CookieDirective {
    /// A directive to set `name` to `value` for `max_age_secs`.
    pub fn set(name: &'static str, value: impl Into<String>, max_age_secs: u32) -> Self {
        Self {
            name,
            value: value.into(),
            max_age_secs,
        }
    }

    /// A directive to clear `name` (empty value, Max-Age 0).
    pub fn clear(name: &'static str) -> Self {
        Self::set(name, "", 0)
    }

    /// Returns `true` if this directive clears its cookie.
    pub fn is_clear(&self) -> bool {
        self.max_age_secs == 0
    }

    /// Renders the directive as a `Set-Cookie` header value.
    ///
    /// Token values are lowercase hex and the companions are digits or
    /// an email, so no cookie-value escaping is needed.
    pub fn header_value(&self) -> String {
        format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; Secure; SameSite=Strict",
            self.name, self.value, self.max_age_secs
        )
    }
}

/// The five cookies a successful login sets.
pub fn grant_cookies(session: &Session) -> Vec<CookieDirective> {
    vec![
        CookieDirective::set(
            COOKIE_ACCESS_TOKEN,
            session.access_token.clone(),
            ACCESS_MAX_AGE_SECS,
        ),
        CookieDirective::set(
            COOKIE_REFRESH_TOKEN,
            session.refresh_token.clone(),
            REFRESH_MAX_AGE_SECS,
        ),
        CookieDirective::set(
            COOKIE_ACCESS_TOKEN_EXPIRES,
            session.access_expires_at_ms.to_string(),
            ACCESS_MAX_AGE_SECS,
        ),
        CookieDirective::set(
            COOKIE_REFRESH_TOKEN_EXPIRES,
            session.refresh_expires_at_ms.to_string(),
            REFRESH_MAX_AGE_SECS,
        ),
        CookieDirective::set(
            COOKIE_TEACHER_EMAIL,
            session.owner.clone(),
            REFRESH_MAX_AGE_SECS,
        ),
    ]
}

/// The two cookies a successful refresh rewrites: the new access token
/// and its companion expiry. The refresh-token cookies are untouched —
/// that token didn't change.
pub fn refresh_cookies(session: &Session) -> Vec<CookieDirective> {
    vec![
        CookieDirective::set(
            COOKIE_ACCESS_TOKEN,
            session.access_token.clone(),
            ACCESS_MAX_AGE_SECS,
        ),
        CookieDirective::set(
            COOKIE_ACCESS_TOKEN_EXPIRES,
            session.access_expires_at_ms.to_string(),
            ACCESS_MAX_AGE_SECS,
        ),
    ]
}

/// Directives clearing all five session cookies. Logout sends these
/// unconditionally, whether or not a session was actually removed.
pub fn clear_cookies() -> Vec<CookieDirective> {
    vec![
        CookieDirective::clear(COOKIE_ACCESS_TOKEN),
        CookieDirective::clear(COOKIE_REFRESH_TOKEN),
        CookieDirective::clear(COOKIE_ACCESS_TOKEN_EXPIRES),
        CookieDirective::clear(COOKIE_REFRESH_TOKEN_EXPIRES),
        CookieDirective::clear(COOKIE_TEACHER_EMAIL),
    ]
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> Session {
        Session {
            access_token: "a".repeat(64),
            refresh_token: "b".repeat(64),
            owner: "teacher1@teacher.com".to_string(),
            issued_at_ms: 1_000,
            access_expires_at_ms: 1_801_000,
            refresh_expires_at_ms: 2_419_201_000,
        }
    }

    #[test]
    fn test_grant_cookies_covers_all_five_names() {
        let cookies = grant_cookies(&sample_session());

        let names: Vec<_> = cookies.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                COOKIE_ACCESS_TOKEN,
                COOKIE_REFRESH_TOKEN,
                COOKIE_ACCESS_TOKEN_EXPIRES,
                COOKIE_REFRESH_TOKEN_EXPIRES,
                COOKIE_TEACHER_EMAIL,
            ]
        );
        assert!(cookies.iter().all(|c| !c.is_clear()));
    }

    #[test]
    fn test_grant_cookies_scopes_max_ages_by_token_lifetime() {
        let cookies = grant_cookies(&sample_session());

        let max_age = |name: &str| {
            cookies
                .iter()
                .find(|c| c.name == name)
                .map(|c| c.max_age_secs)
                .unwrap()
        };
        assert_eq!(max_age(COOKIE_ACCESS_TOKEN), ACCESS_MAX_AGE_SECS);
        assert_eq!(max_age(COOKIE_ACCESS_TOKEN_EXPIRES), ACCESS_MAX_AGE_SECS);
        assert_eq!(max_age(COOKIE_REFRESH_TOKEN), REFRESH_MAX_AGE_SECS);
        assert_eq!(max_age(COOKIE_REFRESH_TOKEN_EXPIRES), REFRESH_MAX_AGE_SECS);
        assert_eq!(max_age(COOKIE_TEACHER_EMAIL), REFRESH_MAX_AGE_SECS);
    }

    #[test]
    fn test_refresh_cookies_touch_only_access_pair() {
        let cookies = refresh_cookies(&sample_session());

        let names: Vec<_> = cookies.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![COOKIE_ACCESS_TOKEN, COOKIE_ACCESS_TOKEN_EXPIRES]
        );
    }

    #[test]
    fn test_clear_cookies_zeroes_all_five() {
        let cookies = clear_cookies();

        assert_eq!(cookies.len(), 5);
        assert!(cookies.iter().all(|c| c.is_clear()));
        assert!(cookies.iter().all(|c| c.value.is_empty()));
    }

    #[test]
    fn test_header_value_renders_full_attribute_set() {
        let directive = CookieDirective::set(COOKIE_ACCESS_TOKEN, "abc123", 1_800);

        assert_eq!(
            directive.header_value(),
            "session_access_token=abc123; Path=/; Max-Age=1800; HttpOnly; Secure; SameSite=Strict"
        );
    }

    #[test]
    fn test_header_value_for_cleared_cookie_has_max_age_zero() {
        let directive = CookieDirective::clear(COOKIE_TEACHER_EMAIL);

        assert_eq!(
            directive.header_value(),
            "session_teacher_email=; Path=/; Max-Age=0; HttpOnly; Secure; SameSite=Strict"
        );
    }
}
