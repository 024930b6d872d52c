// WHY: owned document model produced by segmentation and consumed read-only by
// downstream encoders; tokens belong to exactly one sentence, sentences to one document

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// A single token with its exact position in the owning text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            span: Span::new(start, end),
        }
    }
}

/// An ordered run of tokens. The sentence span is derived from its tokens;
/// empty sentences are never constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub tokens: Vec<Token>,
    pub span: Span,
}

impl Sentence {
    /// Build a sentence from a non-empty token list, deriving the span from
    /// the first and last token. Returns `None` for an empty list.
    pub fn from_tokens(tokens: Vec<Token>) -> Option<Self> {
        let first = tokens.first()?.span.start;
        let last = tokens.last()?.span.end;
        Some(Self {
            tokens,
            span: Span::new(first, last),
        })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Borrowed token texts in order.
    pub fn token_texts(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.text.as_str())
    }
}

/// An ordered sequence of sentences assembled over one or more segmentation calls.
///
/// Invariant: sentence spans are strictly increasing and non-overlapping. When
/// `text` is present, the substring at each token span equals that token's text
/// (modulo bytes intentionally elided by the newline policy).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub sentences: Vec<Sentence>,
    pub language: Option<String>,
    pub text: Option<String>,
}

impl Document {
    /// Create an empty document with no language assigned yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document whose language is already known; segmentation
    /// will skip language detection for it.
    pub fn with_language(language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            ..Self::default()
        }
    }

    /// End offset of the last sentence, or 0 for an empty document.
    /// Used as the continuation base for append calls.
    pub fn end(&self) -> usize {
        self.sentences.last().map(|s| s.span.end).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// All tokens in document order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.sentences.iter().flat_map(|s| s.tokens.iter())
    }

    /// Read-only iteration over token texts, the interface downstream
    /// vocabulary/embedding encoders consume.
    pub fn token_texts(&self) -> impl Iterator<Item = &str> {
        self.tokens().map(|t| t.text.as_str())
    }

    /// Rebuild a text projection from token spans alone, padding inter-token
    /// gaps with single spaces. This is the document text for the
    /// token-stream path, where no raw source text exists.
    pub fn reconstructed_text(&self) -> String {
        let mut out = String::new();
        let mut cursor = 0usize;
        for token in self.tokens() {
            while cursor < token.span.start {
                out.push(' ');
                cursor += 1;
            }
            out.push_str(&token.text);
            cursor = token.span.end;
        }
        out
    }
}
