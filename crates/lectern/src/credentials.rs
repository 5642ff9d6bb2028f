//! Credential policy: who can log in, and what a submission must look
//! like before we even compare it.
//!
//! Lectern doesn't do real identity management — the prototype knows
//! exactly one teacher, hardcoded. What's worth abstracting is the
//! seam: the flow layer checks credentials through the
//! [`CredentialPolicy`] trait, so tests can use a permissive or
//! failing policy and a later backend (LDAP, OAuth, a user table) can
//! slot in without touching the flows.
//!
//! Format validation (email shape, password policy) is separate from
//! the credential comparison and runs first — a malformed submission
//! is rejected as malformed, not as "wrong password".

/// An identity the policy vouches for: the email the session will be
/// issued to, plus the display name reported back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Email address; the owner string on every token and session.
    pub email: String,
    /// Human-readable name shown in the dashboard.
    pub display_name: String,
}

/// Decides whether a submitted email/password pair belongs to a known
/// identity.
///
/// # Why a trait?
///
/// Same reasoning as any auth seam: the production policy is a
/// hardcoded comparison today, but tests want a policy that accepts or
/// rejects on cue, and a real user store is an obvious later swap.
/// The flows only ever see `Option<Identity>`.
pub trait CredentialPolicy {
    /// Returns the identity behind the credentials, or `None` if they
    /// don't match any known identity.
    fn authenticate(&self, email: &str, password: &str) -> Option<Identity>;

    /// Looks up the identity for an email that already holds a
    /// session. Used by the session-check flow to rebuild the profile
    /// without re-seeing the password.
    fn lookup(&self, email: &str) -> Option<Identity>;
}

/// The prototype policy: a single fixed identity/secret pair.
#[derive(Debug, Clone)]
pub struct FixedCredentials {
    email: String,
    password: String,
    display_name: String,
}

impl FixedCredentials {
    /// A policy accepting exactly this email/password pair.
    pub fn new(email: &str, password: &str, display_name: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

/// The hardcoded prototype teacher.
impl Default for FixedCredentials {
    fn default() -> Self {
        Self::new("teacher1@teacher.com", "Password!", "Teacher One")
    }
}

impl CredentialPolicy for FixedCredentials {
    fn authenticate(&self, email: &str, password: &str) -> Option<Identity> {
        if email == self.email && password == self.password {
            self.lookup(email)
        } else {
            None
        }
    }

    fn lookup(&self, email: &str) -> Option<Identity> {
        (email == self.email).then(|| Identity {
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        })
    }
}

/// Shape check for a submitted email: one `@`, non-empty local part,
/// and a domain containing a dot (`local@domain.tld`). Not RFC 5322 —
/// just enough to bounce obvious garbage before the credential
/// comparison.
pub fn email_is_valid(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if email.contains(char::is_whitespace) || domain.contains('@') {
        return false;
    }
    // The domain needs a dot with something on both sides.
    match domain.split_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Password policy: at least 8 characters and at least one special
/// character. Checked before the credential comparison so the client
/// gets a policy error rather than a generic rejection.
pub fn password_meets_policy(password: &str) -> bool {
    const SPECIAL: &str = r##"!@#$%^&*()_+-=[]{};':"\|,.<>/?"##;
    password.len() >= 8 && password.chars().any(|c| SPECIAL.contains(c))
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // =====================================================================
    // FixedCredentials
    // =====================================================================

    #[test]
    fn test_authenticate_exact_match_returns_identity() {
        let policy = FixedCredentials::default();

        let identity = policy
            .authenticate("teacher1@teacher.com", "Password!")
            .expect("prototype credentials should match");

        assert_eq!(identity.email, "teacher1@teacher.com");
        assert_eq!(identity.display_name, "Teacher One");
    }

    #[test]
    fn test_authenticate_wrong_password_returns_none() {
        let policy = FixedCredentials::default();

        assert!(policy.authenticate("teacher1@teacher.com", "Password?").is_none());
    }

    #[test]
    fn test_authenticate_wrong_email_returns_none() {
        let policy = FixedCredentials::default();

        assert!(policy.authenticate("teacher2@teacher.com", "Password!").is_none());
    }

    #[test]
    fn test_authenticate_is_case_sensitive() {
        let policy = FixedCredentials::default();

        assert!(policy.authenticate("Teacher1@teacher.com", "Password!").is_none());
        assert!(policy.authenticate("teacher1@teacher.com", "password!").is_none());
    }

    #[test]
    fn test_lookup_known_email_returns_identity() {
        let policy = FixedCredentials::default();

        let identity = policy.lookup("teacher1@teacher.com").expect("known email");

        assert_eq!(identity.display_name, "Teacher One");
    }

    #[test]
    fn test_lookup_unknown_email_returns_none() {
        let policy = FixedCredentials::default();

        assert!(policy.lookup("stranger@teacher.com").is_none());
    }

    // =====================================================================
    // email_is_valid()
    // =====================================================================

    #[test]
    fn test_email_is_valid_accepts_ordinary_addresses() {
        assert!(email_is_valid("teacher1@teacher.com"));
        assert!(email_is_valid("a@b.co"));
        assert!(email_is_valid("first.last@sub.domain.org"));
    }

    #[test]
    fn test_email_is_valid_rejects_garbage() {
        assert!(!email_is_valid(""));
        assert!(!email_is_valid("no-at-sign"));
        assert!(!email_is_valid("@domain.com"));
        assert!(!email_is_valid("local@"));
        assert!(!email_is_valid("local@nodot"));
        assert!(!email_is_valid("local@domain."));
        assert!(!email_is_valid("two@@domain.com"));
        assert!(!email_is_valid("spa ce@domain.com"));
    }

    // =====================================================================
    // password_meets_policy()
    // =====================================================================

    #[test]
    fn test_password_meets_policy_accepts_prototype_password() {
        assert!(password_meets_policy("Password!"));
    }

    #[test]
    fn test_password_meets_policy_rejects_short_passwords() {
        // Seven characters, special character present — still too short.
        assert!(!password_meets_policy("Pass!23"));
    }

    #[test]
    fn test_password_meets_policy_requires_special_character() {
        assert!(!password_meets_policy("Password1"));
        assert!(!password_meets_policy("justletters"));
    }
}
