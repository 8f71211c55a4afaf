use crate::error::AuthenticationError;

/// Identity established by a successful login. Only `IdentityGate` builds
/// one, so the email is always non-empty and inside the corporate domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    email: String,
}

impl SessionIdentity {
    pub fn email(&self) -> &str {
        &self.email
    }
}

#[derive(Debug, Clone)]
pub struct IdentityGate {
    domain: String,
}

impl IdentityGate {
    pub fn new(domain: &str) -> Self {
        let domain = domain.trim().trim_start_matches('@').to_lowercase();
        Self { domain }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Accepts `<local>@<domain>` with a non-empty local part. The identity
    /// is stored lower-cased so history lookups do not depend on how the
    /// user typed their address.
    pub fn authenticate(&self, email: &str) -> Result<SessionIdentity, AuthenticationError> {
        let normalized = email.trim().to_lowercase();
        let suffix = format!("@{}", self.domain);

        match normalized.strip_suffix(&suffix) {
            Some(local) if !local.is_empty() && !local.contains('@') => {
                tracing::info!("Login accepted for {}", normalized);
                Ok(SessionIdentity { email: normalized })
            }
            _ => {
                tracing::warn!("Login rejected for {:?}", email.trim());
                Err(AuthenticationError::InvalidDomain {
                    domain: self.domain.clone(),
                })
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn identity_for_tests(email: &str) -> SessionIdentity {
    SessionIdentity {
        email: email.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> IdentityGate {
        IdentityGate::new("decathlon.com")
    }

    #[test]
    fn accepts_corporate_addresses_case_insensitively() {
        let identity = gate().authenticate("Alice@Decathlon.com").unwrap();
        assert_eq!(identity.email(), "alice@decathlon.com");

        let identity = gate().authenticate("bob@decathlon.com ").unwrap();
        assert_eq!(identity.email(), "bob@decathlon.com");
    }

    #[test]
    fn rejects_other_domains() {
        let err = gate().authenticate("eve@gmail.com").unwrap_err();
        assert_eq!(
            err,
            AuthenticationError::InvalidDomain {
                domain: "decathlon.com".to_string()
            }
        );
        assert!(gate().authenticate("eve@notdecathlon.com.evil").is_err());
        assert!(gate().authenticate("").is_err());
    }

    #[test]
    fn bare_domain_is_rejected() {
        assert!(gate().authenticate("@decathlon.com").is_err());
        assert!(gate().authenticate("  @DECATHLON.COM").is_err());
    }

    #[test]
    fn lookalike_domain_suffix_is_rejected() {
        // the domain must follow the '@' directly
        assert!(gate().authenticate("eve@mail.fakedecathlon.com").is_err());
        assert!(gate().authenticate("a@b@decathlon.com").is_err());
    }

    #[test]
    fn configured_domain_is_normalized() {
        let gate = IdentityGate::new(" @Example.ORG ");
        assert_eq!(gate.domain(), "example.org");
        assert!(gate.authenticate("x@example.org").is_ok());
    }

    #[test]
    fn retries_are_unlimited() {
        let gate = gate();
        for _ in 0..10 {
            assert!(gate.authenticate("eve@gmail.com").is_err());
        }
        assert!(gate.authenticate("eve@decathlon.com").is_ok());
    }
}
