// ABOUTME: Sender identity lookup used for From headers and access checks
// ABOUTME: Ships a config-backed implementation mapping identity ids to identities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Display name, address, and optional organization of a sending identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderIdentity {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub organization: Option<String>,
}

impl SenderIdentity {
    /// RFC-style display form, `Name <address>`, or just the address when
    /// no name is set.
    pub fn display(&self) -> String {
        if self.name.is_empty() {
            self.email.clone()
        } else {
            format!("{} <{}>", self.name, self.email)
        }
    }

    /// Domain part of the address, used as the content-id and message-id
    /// suffix. Falls back to `localhost` for malformed addresses.
    pub fn domain(&self) -> &str {
        match self.email.rsplit_once('@') {
            Some((_, domain)) if !domain.is_empty() => domain,
            _ => "localhost",
        }
    }
}

pub trait IdentityLookup: Send + Sync {
    fn lookup(&self, id: &str) -> Option<SenderIdentity>;
}

/// Identity lookup over a configured id → identity map.
#[derive(Debug, Clone, Default)]
pub struct ConfigIdentityLookup {
    identities: HashMap<String, SenderIdentity>,
}

impl ConfigIdentityLookup {
    pub fn new(identities: HashMap<String, SenderIdentity>) -> Self {
        Self { identities }
    }
}

impl IdentityLookup for ConfigIdentityLookup {
    fn lookup(&self, id: &str) -> Option<SenderIdentity> {
        self.identities.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(name: &str, email: &str) -> SenderIdentity {
        SenderIdentity {
            name: name.to_string(),
            email: email.to_string(),
            organization: None,
        }
    }

    #[test]
    fn test_display_form() {
        assert_eq!(
            identity("Jane Doe", "jane@example.org").display(),
            "Jane Doe <jane@example.org>"
        );
        assert_eq!(identity("", "jane@example.org").display(), "jane@example.org");
    }

    #[test]
    fn test_domain_extraction() {
        assert_eq!(identity("J", "jane@example.org").domain(), "example.org");
        assert_eq!(identity("J", "not-an-address").domain(), "localhost");
        assert_eq!(identity("J", "broken@").domain(), "localhost");
    }

    #[test]
    fn test_config_lookup() {
        let mut map = HashMap::new();
        map.insert("work".to_string(), identity("Jane", "jane@example.org"));
        let lookup = ConfigIdentityLookup::new(map);

        assert!(lookup.lookup("work").is_some());
        assert!(lookup.lookup("home").is_none());
    }
}
