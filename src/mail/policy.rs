// ABOUTME: Access policy consulted once before a merge job may run
// ABOUTME: Ships a deny-list implementation keyed on sender addresses

use tracing::debug;

use super::identity::SenderIdentity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    Allow,
    Deny { reason: String },
}

pub trait AccessPolicy: Send + Sync {
    fn check(&self, identity: &SenderIdentity) -> PolicyDecision;
}

/// Denies senders whose address appears on a configured list; allows
/// everyone else. Fuller address-book or group based policies plug in
/// behind the same trait.
#[derive(Debug, Clone, Default)]
pub struct DenyListPolicy {
    denied: Vec<String>,
}

impl DenyListPolicy {
    pub fn new(denied: Vec<String>) -> Self {
        Self { denied }
    }
}

impl AccessPolicy for DenyListPolicy {
    fn check(&self, identity: &SenderIdentity) -> PolicyDecision {
        let listed = self
            .denied
            .iter()
            .any(|addr| addr.eq_ignore_ascii_case(&identity.email));

        if listed {
            debug!("Sender '{}' is on the deny list", identity.email);
            PolicyDecision::Deny {
                reason: "sender address is on the deny list".to_string(),
            }
        } else {
            PolicyDecision::Allow
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(email: &str) -> SenderIdentity {
        SenderIdentity {
            name: "Test".to_string(),
            email: email.to_string(),
            organization: None,
        }
    }

    #[test]
    fn test_empty_list_allows() {
        let policy = DenyListPolicy::default();
        assert_eq!(policy.check(&identity("a@x.com")), PolicyDecision::Allow);
    }

    #[test]
    fn test_listed_sender_denied_case_insensitively() {
        let policy = DenyListPolicy::new(vec!["Spam@X.com".to_string()]);

        assert!(matches!(
            policy.check(&identity("spam@x.com")),
            PolicyDecision::Deny { .. }
        ));
        assert_eq!(policy.check(&identity("ok@x.com")), PolicyDecision::Allow);
    }
}
