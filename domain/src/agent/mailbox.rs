//! Comment-stream addressing.
//!
//! The board's comment stream doubles as an inter-agent mailbox: a comment
//! is "for" a persona when it carries that persona's `@name` tag. Matching
//! is deliberately stricter than a raw substring search - the tag must end at
//! a word boundary, so `@alice` never consumes a message addressed to
//! `@alicesmith`.

use crate::ticket::value_objects::AgentName;
use serde::{Deserialize, Serialize};

/// The `@name` token that addresses a persona in comment text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientTag(String);

impl RecipientTag {
    /// Build the tag for a persona name. Invariant: always `"@" + name`.
    pub fn for_agent(name: &AgentName) -> Self {
        Self(format!("@{}", name.as_str()))
    }

    /// Build a tag from a raw name (e.g. a configured reviewer handle).
    /// A leading `@` is accepted and not doubled.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref();
        if let Some(stripped) = raw.strip_prefix('@') {
            Self(format!("@{}", stripped))
        } else {
            Self(format!("@{}", raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when `text` contains this tag at a word boundary.
    ///
    /// The character after the tag (if any) must not be part of an
    /// identifier, otherwise the tag is a prefix of a longer name.
    pub fn matches(&self, text: &str) -> bool {
        let mut search = text;
        while let Some(pos) = search.find(self.0.as_str()) {
            let after = &search[pos + self.0.len()..];
            match after.chars().next() {
                Some(c) if c.is_alphanumeric() || c == '_' => {
                    search = &search[pos + self.0.len()..];
                }
                _ => return true,
            }
        }
        false
    }

    /// Append this tag to a message body on its own line.
    pub fn address(&self, body: &str) -> String {
        format!("{}\n{}", body, self.0)
    }
}

impl std::fmt::Display for RecipientTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_renders_with_at_prefix() {
        let tag = RecipientTag::for_agent(&AgentName::new("engmanager"));
        assert_eq!(tag.as_str(), "@engmanager");
        assert_eq!(RecipientTag::new("@po").as_str(), "@po");
        assert_eq!(RecipientTag::new("po").as_str(), "@po");
    }

    #[test]
    fn test_matches_plain_mention() {
        let tag = RecipientTag::new("alice");
        assert!(tag.matches("looks good\n@alice"));
        assert!(tag.matches("@alice please review"));
        assert!(tag.matches("cc @alice, thanks"));
    }

    #[test]
    fn test_does_not_match_longer_name() {
        let tag = RecipientTag::new("alice");
        assert!(!tag.matches("ping @alicesmith"));
        assert!(!tag.matches("@alice_2 owns this"));
    }

    #[test]
    fn test_matches_after_skipping_prefix_collision() {
        let tag = RecipientTag::new("alice");
        assert!(tag.matches("@alicesmith and @alice"));
    }

    #[test]
    fn test_address_appends_tag_on_own_line() {
        let tag = RecipientTag::new("bob");
        assert_eq!(tag.address("Is the cap per user?"), "Is the cap per user?\n@bob");
    }
}
