// WHY: when only tokens survive (no raw text), offsets must be rebuilt from
// token identity and punctuation attachment alone, deterministically

use crate::document::{Sentence, Token};
use std::collections::HashSet;

/// Punctuation-attachment rules for inferring whitespace between bare tokens.
///
/// A single implied space separates two tokens unless the previous token is in
/// the `no_space_after` set or the current one is in `no_space_before`.
#[derive(Debug, Clone)]
pub struct SpacingRules {
    pub no_space_before: HashSet<String>,
    pub no_space_after: HashSet<String>,
}

impl Default for SpacingRules {
    fn default() -> Self {
        // Sentence punctuation, closers and English clitics attach left;
        // openers attach right. The ASCII double quote is ambiguous between
        // the two roles and lives in both sets.
        let no_space_before = [
            ".", ",", ":", ";", "!", "?", ")", "]", "}", "%", "…", "'", "’", "”", "\"", "'s",
            "'ll", "'m", "'re", "'ve", "'d", "n't",
        ];
        let no_space_after = ["(", "[", "{", "“", "‘", "``", "\""];
        Self {
            no_space_before: no_space_before.iter().map(|s| s.to_string()).collect(),
            no_space_after: no_space_after.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SpacingRules {
    /// Whether an implied space belongs between `prev` and `next`.
    pub fn space_between(&self, prev: Option<&str>, next: &str) -> bool {
        match prev {
            None => false,
            Some(prev) => {
                !self.no_space_after.contains(prev) && !self.no_space_before.contains(next)
            }
        }
    }
}

/// Rebuild exact token offsets for a bare token stream.
///
/// Walks the list with a write cursor starting at `offset`, inserting one
/// implied space wherever the rules call for it, and sets every token's span
/// to `[cursor, cursor + text.len())`. The whole stream becomes one sentence:
/// splitting a bare token stream back into multiple sentences is deliberately
/// not attempted. Returns `None` for an empty stream.
pub fn sentence_from_token_texts<I, S>(
    texts: I,
    rules: &SpacingRules,
    offset: usize,
) -> Option<Sentence>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut cursor = offset;
    let mut prev: Option<String> = None;
    let mut tokens = Vec::new();

    for text in texts {
        let text: String = text.into();
        if rules.space_between(prev.as_deref(), &text) {
            cursor += 1;
        }
        let start = cursor;
        cursor += text.len();
        tokens.push(Token::new(text.clone(), start, cursor));
        prev = Some(text);
    }

    Sentence::from_tokens(tokens)
}
