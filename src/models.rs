// WHY: predictors and tokenizers are pretrained, per-language, swappable collaborators;
// the registry is the explicit process-wide model state, constructed once and shared
// read-only across pipelines (no implicit global singleton)

use crate::span::Span;
use anyhow::{bail, Result};
use regex_automata::{
    dfa::{dense::DFA, Automaton},
    Input,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// External sentence-boundary predictor for one language.
///
/// Returns ordered candidate sentence spans local to `text`, with surrounding
/// whitespace excluded. Implementations are stateless after construction and
/// shareable across threads.
pub trait SentencePredictor: Send + Sync {
    fn predict(&self, text: &str) -> Vec<Span>;
}

/// External tokenizer for one language.
///
/// Returns ordered token spans local to `text`. Every literal `\n` in the input
/// must surface as its own single-byte span so the newline policy can act on it.
pub trait SentenceTokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Span>;
}

/// Per-language model lookup with a default-language fallback.
///
/// Missing models for a requested language silently fall back to the default
/// language's models; a registry whose default language has no models is a
/// construction error (model loading is fatal at startup).
pub struct ModelRegistry {
    predictors: HashMap<String, Arc<dyn SentencePredictor>>,
    tokenizers: HashMap<String, Arc<dyn SentenceTokenizer>>,
    default_predictor: Arc<dyn SentencePredictor>,
    default_tokenizer: Arc<dyn SentenceTokenizer>,
    default_language: String,
}

impl ModelRegistry {
    pub fn builder(default_language: impl Into<String>) -> ModelRegistryBuilder {
        ModelRegistryBuilder {
            default_language: default_language.into(),
            predictors: HashMap::new(),
            tokenizers: HashMap::new(),
        }
    }

    /// Registry backed by the built-in rule models, English as default.
    pub fn builtin() -> Result<Self> {
        Self::builder("en")
            .register(
                "en",
                Arc::new(RuleSentencePredictor::new()?),
                Arc::new(RuleTokenizer::new()),
            )
            .build()
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Predictor for `language`, or the default language's predictor when the
    /// language is unknown or has no registered model.
    pub fn predictor_for(&self, language: Option<&str>) -> Arc<dyn SentencePredictor> {
        language
            .and_then(|lang| self.predictors.get(lang))
            .cloned()
            .unwrap_or_else(|| {
                debug!(?language, "no predictor for language, using default");
                self.default_predictor.clone()
            })
    }

    /// Tokenizer for `language`, with the same fallback as [`Self::predictor_for`].
    pub fn tokenizer_for(&self, language: Option<&str>) -> Arc<dyn SentenceTokenizer> {
        language
            .and_then(|lang| self.tokenizers.get(lang))
            .cloned()
            .unwrap_or_else(|| {
                debug!(?language, "no tokenizer for language, using default");
                self.default_tokenizer.clone()
            })
    }
}

/// Builder for [`ModelRegistry`]; fails at `build` when the default language
/// has no registered models.
pub struct ModelRegistryBuilder {
    default_language: String,
    predictors: HashMap<String, Arc<dyn SentencePredictor>>,
    tokenizers: HashMap<String, Arc<dyn SentenceTokenizer>>,
}

impl ModelRegistryBuilder {
    pub fn register(
        mut self,
        language: impl Into<String>,
        predictor: Arc<dyn SentencePredictor>,
        tokenizer: Arc<dyn SentenceTokenizer>,
    ) -> Self {
        let language = language.into();
        self.predictors.insert(language.clone(), predictor);
        self.tokenizers.insert(language, tokenizer);
        self
    }

    pub fn build(self) -> Result<ModelRegistry> {
        let default_predictor = match self.predictors.get(&self.default_language) {
            Some(p) => p.clone(),
            None => bail!(
                "no sentence predictor registered for default language '{}'",
                self.default_language
            ),
        };
        let default_tokenizer = match self.tokenizers.get(&self.default_language) {
            Some(t) => t.clone(),
            None => bail!(
                "no tokenizer registered for default language '{}'",
                self.default_language
            ),
        };
        info!(
            languages = self.predictors.len(),
            default = %self.default_language,
            "model registry constructed"
        );
        Ok(ModelRegistry {
            predictors: self.predictors,
            tokenizers: self.tokenizers,
            default_predictor,
            default_tokenizer,
            default_language: self.default_language,
        })
    }
}

/// Built-in rule-based boundary predictor.
///
/// Uses a regex-automata dense DFA over the boundary shape
/// `[.!?]` + optional closers + whitespace + sentence opener, which gives O(n)
/// scanning. Openers are ASCII only; statistical per-language models plug in
/// through [`SentencePredictor`] when more is needed.
pub struct RuleSentencePredictor {
    dfa: DFA<Vec<u32>>,
}

impl RuleSentencePredictor {
    pub fn new() -> Result<Self> {
        // Opener class is deliberately single-byte so the match end minus one
        // is always the opener's byte position.
        let pattern = r#"[.!?]["')\]]*\s+["'(\[A-Z0-9]"#;
        let dfa = DFA::new(pattern)?;
        debug!("compiled sentence boundary DFA with pattern: {pattern}");
        Ok(Self { dfa })
    }
}

impl SentencePredictor for RuleSentencePredictor {
    fn predict(&self, text: &str) -> Vec<Span> {
        let bytes = text.as_bytes();
        let mut spans = Vec::new();

        // Candidate sentences exclude surrounding whitespace, like the
        // statistical predictors this stands in for.
        let mut sentence_start = 0usize;
        while sentence_start < bytes.len() && bytes[sentence_start].is_ascii_whitespace() {
            sentence_start += 1;
        }

        let mut search = sentence_start;
        while search < bytes.len() {
            let input = Input::new(bytes).range(search..);
            let half = match self.dfa.try_search_fwd(&input) {
                Ok(Some(half)) => half,
                _ => break,
            };
            let match_end = half.offset();
            let opener = match_end - 1;

            // Sentence ends where the inter-sentence whitespace run begins.
            let mut end = opener;
            while end > sentence_start && bytes[end - 1].is_ascii_whitespace() {
                end -= 1;
            }
            if end > sentence_start {
                spans.push(Span::new(sentence_start, end));
            }

            sentence_start = opener;
            search = match_end;
        }

        // Remaining text forms the final candidate, trailing whitespace trimmed.
        if sentence_start < bytes.len() {
            let mut end = bytes.len();
            while end > sentence_start && bytes[end - 1].is_ascii_whitespace() {
                end -= 1;
            }
            if end > sentence_start {
                spans.push(Span::new(sentence_start, end));
            }
        }

        spans
    }
}

/// Built-in rule-based tokenizer: alphanumeric runs are words, every other
/// non-whitespace character is its own token, and each literal `\n` is emitted
/// as its own span (required by the tokenizer contract).
#[derive(Debug, Default, Clone)]
pub struct RuleTokenizer;

impl RuleTokenizer {
    pub fn new() -> Self {
        Self
    }
}

impl SentenceTokenizer for RuleTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut word_start: Option<usize> = None;

        for (pos, ch) in text.char_indices() {
            if ch.is_alphanumeric() {
                if word_start.is_none() {
                    word_start = Some(pos);
                }
                continue;
            }
            if let Some(start) = word_start.take() {
                spans.push(Span::new(start, pos));
            }
            if ch == '\n' {
                spans.push(Span::new(pos, pos + 1));
            } else if !ch.is_whitespace() {
                spans.push(Span::new(pos, pos + ch.len_utf8()));
            }
        }
        if let Some(start) = word_start {
            spans.push(Span::new(start, text.len()));
        }

        spans
    }
}
