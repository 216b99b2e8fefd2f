//! Opaque session correlation tokens.
//!
//! A token groups the queries of one search burst for upstream billing and
//! relevance. Created lazily on the first query after readiness and cleared
//! when a selection is finalized; exactly one token is live per session.

use uuid::Uuid;

/// Opaque correlation handle scoping a sequence of queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique() {
        assert_ne!(SessionToken::new(), SessionToken::new());
    }

    #[test]
    fn token_is_non_empty() {
        assert!(!SessionToken::new().as_str().is_empty());
    }
}
