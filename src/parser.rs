use std::ops::Range;
use std::sync::Arc;

use crate::markers::TokenSet;

/// A fragment of a document together with its byte offset in that document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanInput<'a> {
    pub fragment: &'a str,
    pub offset: usize,
}

impl<'a> ScanInput<'a> {
    pub fn new(fragment: &'a str, offset: usize) -> Self {
        ScanInput { fragment, offset }
    }
}

/// A located marker, in document byte coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRange {
    pub offset: usize,
    pub length: usize,
}

impl MatchRange {
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    pub fn as_range(&self) -> Range<usize> {
        self.offset..self.end()
    }
}

/// A match found by [`scan_content`], tagged with its 1-indexed line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMatch {
    pub line_number: usize,
    pub range: MatchRange,
}

/// Finds marker tokens that appear as whole words inside a comment.
///
/// Holds no mutable state; one scanner can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct CommentMarkerScanner {
    tokens: Arc<TokenSet>,
}

impl Default for CommentMarkerScanner {
    fn default() -> Self {
        CommentMarkerScanner::new(TokenSet::shared())
    }
}

impl CommentMarkerScanner {
    pub fn new(tokens: Arc<TokenSet>) -> Self {
        CommentMarkerScanner { tokens }
    }

    pub fn tokens(&self) -> &TokenSet {
        &self.tokens
    }

    /// Scan one fragment. Results follow token order, and each token is
    /// reported at most once (its first occurrence after the opener).
    /// This is a pure function with no IO.
    pub fn scan(&self, input: ScanInput<'_>) -> Vec<MatchRange> {
        let text = input.fragment;
        let Some(opener) = comment_opener(text) else {
            return Vec::new();
        };
        let real_len = real_length(text);

        // one keyword per comment is the common case
        let mut result = Vec::with_capacity(1);

        for token in self.tokens.tokens() {
            let Some((start, end)) = token.find_at(text, opener) else {
                continue;
            };
            if start <= opener {
                continue;
            }

            let trailing_ok = end == real_len
                || text[end..]
                    .chars()
                    .next()
                    .is_some_and(|c| self.tokens.allows_after(c));
            if !trailing_ok {
                continue;
            }

            // No preceding character counts as a violated boundary.
            let leading_ok = text[..start]
                .chars()
                .next_back()
                .is_some_and(|c| self.tokens.allows_before(c));
            if !leading_ok {
                continue;
            }

            result.push(MatchRange {
                offset: input.offset + start,
                length: end - start,
            });
        }

        result
    }
}

/// Scan a fragment with the default token set.
pub fn scan(fragment: &str, offset: usize) -> Vec<MatchRange> {
    CommentMarkerScanner::default().scan(ScanInput::new(fragment, offset))
}

/// Scan every line of a document, the way an editor classifies each visible
/// line in turn. Line terminators stay attached to their line.
pub fn scan_content(scanner: &CommentMarkerScanner, content: &str) -> Vec<LineMatch> {
    let mut offset = 0;
    let mut matches = Vec::new();

    for (idx, line) in content.split_inclusive('\n').enumerate() {
        matches.extend(
            scanner
                .scan(ScanInput::new(line, offset))
                .into_iter()
                .map(|range| LineMatch {
                    line_number: idx + 1,
                    range,
                }),
        );
        offset += line.len();
    }

    matches
}

/// Byte index where the comment starts: the first `//`, or else a `*` that is
/// preceded only by whitespace and `/`.
fn comment_opener(text: &str) -> Option<usize> {
    if let Some(idx) = text.find("//") {
        return Some(idx);
    }

    for (idx, c) in text.char_indices() {
        if c.is_whitespace() || c == '/' {
            continue;
        }
        return (c == '*').then_some(idx);
    }

    None
}

/// Length of the fragment without a trailing `\n` or `\r\n`.
fn real_length(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut len = bytes.len();
    if len > 2 && bytes[len - 1] == b'\n' {
        len -= 1;
        if bytes[len - 1] == b'\r' {
            len -= 1;
        }
    }
    len
}
