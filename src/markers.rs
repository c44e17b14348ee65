use regex::{Regex, RegexBuilder};
use std::sync::{Arc, LazyLock};

use crate::error::BoldTodoError;

/// Marker tokens highlighted inside comments, in result order.
pub const DEFAULT_TOKENS: &[&str] = &["todo", "hack"];

/// Characters allowed immediately before a marker.
pub const DEFAULT_BEFORE: &[char] = &[' ', ',', '(', '/'];

/// Characters allowed immediately after a marker.
pub const DEFAULT_AFTER: &[char] = &[' ', ':', ')'];

static DEFAULT_SET: LazyLock<Arc<TokenSet>> = LazyLock::new(|| {
    Arc::new(
        TokenSet::new(DEFAULT_TOKENS, DEFAULT_BEFORE, DEFAULT_AFTER)
            .expect("default marker tokens must compile"),
    )
});

/// A marker token together with its case-insensitive matcher.
#[derive(Debug, Clone)]
pub struct Token {
    text: String,
    matcher: Regex,
}

impl Token {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// First case-insensitive occurrence of the token at or after `start`.
    /// Returns the byte range of the matched text.
    pub fn find_at(&self, haystack: &str, start: usize) -> Option<(usize, usize)> {
        self.matcher
            .find_at(haystack, start)
            .map(|m| (m.start(), m.end()))
    }
}

/// Immutable marker configuration: the tokens to look for and the
/// characters that may surround them.
#[derive(Debug, Clone)]
pub struct TokenSet {
    tokens: Vec<Token>,
    before: Vec<char>,
    after: Vec<char>,
}

impl TokenSet {
    /// Build a token set. Each token is matched literally, ignoring case.
    pub fn new(tokens: &[&str], before: &[char], after: &[char]) -> Result<Self, BoldTodoError> {
        let tokens = tokens
            .iter()
            .map(|text| -> Result<Token, BoldTodoError> {
                let matcher = RegexBuilder::new(&regex::escape(text))
                    .case_insensitive(true)
                    .build()?;
                Ok(Token {
                    text: (*text).to_string(),
                    matcher,
                })
            })
            .collect::<Result<Vec<_>, BoldTodoError>>()?;

        Ok(TokenSet {
            tokens,
            before: before.to_vec(),
            after: after.to_vec(),
        })
    }

    /// The process-wide default set (`todo`, `hack`).
    pub fn shared() -> Arc<TokenSet> {
        Arc::clone(&DEFAULT_SET)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn allows_before(&self, c: char) -> bool {
        self.before.contains(&c)
    }

    pub fn allows_after(&self, c: char) -> bool {
        self.after.contains(&c)
    }
}
