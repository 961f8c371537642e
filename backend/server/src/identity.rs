//! # Identity
//!
//! Voters type an email or a phone number into a single field, so the ledger
//! key is the submitted string trimmed and ASCII-lowercased. Nothing else is
//! rewritten: `A@B.com` and ` a@b.com ` collide, `a+1@b.com` does not.
use std::fmt;

use serde::{Deserialize, Serialize};

pub fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Normalized, non-empty voter identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize(raw);

        if normalized.is_empty() {
            return None;
        }

        Some(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{Identity, normalize};

    #[test]
    fn test_basic() {
        assert_eq!(normalize("a@b.com"), "a@b.com");
        assert_eq!(normalize("A@B.COM"), "a@b.com");
        assert_eq!(normalize("+63 912 345 6789"), "+63 912 345 6789");
    }

    #[test]
    fn test_leading_trailing_spaces() {
        assert_eq!(normalize("   a@b.com   "), "a@b.com");
        assert_eq!(normalize("\ta@b.com\n"), "a@b.com");
    }

    #[test]
    fn test_non_ascii_untouched() {
        assert_eq!(normalize("ÉLAN@b.com"), "Élan@b.com");
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("     "), "");
        assert!(Identity::parse("   ").is_none());
    }

    #[test]
    fn test_parse_keeps_normalized_form() {
        let identity = Identity::parse(" Voter@Example.com ").unwrap();
        assert_eq!(identity.as_str(), "voter@example.com");
        assert_eq!(identity.to_string(), "voter@example.com");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(raw in ".{0,40}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn case_variants_collide(raw in "[a-zA-Z0-9@.+]{1,30}") {
            prop_assert_eq!(normalize(&raw.to_ascii_uppercase()), normalize(&raw.to_ascii_lowercase()));
        }
    }
}
