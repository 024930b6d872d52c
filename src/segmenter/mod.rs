// WHY: single pipeline entry point owning the model registry, language resolver
// and policy; documents are assembled here so continuation offsets stay in one place

pub mod reconcile;
pub mod stream;
pub mod tokenize;

use crate::document::{Document, Sentence};
use crate::language::LanguageResolver;
use crate::models::ModelRegistry;
use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use reconcile::reconcile;
pub use stream::{sentence_from_token_texts, SpacingRules};
pub use tokenize::{tokenize_sentence, NewlineLedger};

/// How literal newline characters in the input are treated.
///
/// Newlines force a sentence break under every policy; the policy only decides
/// whether the newline characters themselves survive as tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NewlinePolicy {
    /// Every newline becomes its own sentence-break token.
    Keep,
    /// Only the second of two consecutive newlines becomes a break token;
    /// single newlines are absorbed.
    KeepDouble,
    /// Newlines never become tokens; a run collapses to one implied
    /// whitespace boundary.
    #[default]
    Discard,
}

/// Converts raw text (or a bare token stream) into a [`Document`] of sentences
/// and offset-exact tokens.
pub struct DocumentSegmenter {
    registry: ModelRegistry,
    resolver: LanguageResolver,
    policy: NewlinePolicy,
    spacing: SpacingRules,
}

impl DocumentSegmenter {
    /// Segmenter over an explicitly constructed registry, with no language
    /// detection and the default newline policy.
    pub fn new(registry: ModelRegistry) -> Self {
        Self {
            registry,
            resolver: LanguageResolver::unknown(),
            policy: NewlinePolicy::default(),
            spacing: SpacingRules::default(),
        }
    }

    /// Segmenter backed by the built-in rule models.
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(ModelRegistry::builtin()?))
    }

    pub fn with_policy(mut self, policy: NewlinePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_resolver(mut self, resolver: LanguageResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_spacing_rules(mut self, spacing: SpacingRules) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn policy(&self) -> NewlinePolicy {
        self.policy
    }

    /// Segment `text` into a fresh document.
    pub fn segment(&self, text: &str) -> Document {
        let mut doc = Document::new();
        self.append_to(text, &mut doc);
        doc
    }

    /// Segment `text` into a fresh document with a known language, skipping
    /// detection.
    pub fn segment_with_language(&self, text: &str, language: impl Into<String>) -> Document {
        let mut doc = Document::with_language(language);
        self.append_to(text, &mut doc);
        doc
    }

    /// Segment `text` and append the resulting sentences to `doc`.
    ///
    /// The continuation base is `doc.end() + 1` for a non-empty document (one
    /// implied separator character), else 0, so repeated calls concatenate
    /// rather than overlap. Spans already present are not re-validated.
    pub fn append_to(&self, text: &str, doc: &mut Document) {
        // A document that already carries a language is authoritative.
        let language = match &doc.language {
            Some(lang) => Some(lang.clone()),
            None => {
                let resolved = self.resolver.resolve(text);
                doc.language = resolved.clone();
                resolved
            }
        };

        let doc_base = match doc.end() {
            0 => 0,
            end => end + 1,
        };

        if doc.is_empty() {
            doc.text = Some(text.to_string());
        } else if let Some(existing) = &mut doc.text {
            existing.push(' ');
            existing.push_str(text);
        }

        let predictor = self.registry.predictor_for(language.as_deref());
        let tokenizer = self.registry.tokenizer_for(language.as_deref());

        let raw = predictor.predict(text);
        let spans = reconcile(&raw, text);
        debug!(
            raw = raw.len(),
            finalized = spans.len(),
            policy = ?self.policy,
            "reconciled sentence spans"
        );

        let mut ledger = NewlineLedger::new();
        for span in spans {
            let tokens = tokenize_sentence(
                span,
                text,
                tokenizer.as_ref(),
                self.policy,
                doc_base,
                &mut ledger,
            );
            // Newline-only sentences can lose every token to the policy;
            // empty sentences are never emitted.
            if let Some(sentence) = Sentence::from_tokens(tokens) {
                doc.sentences.push(sentence);
            }
        }
    }

    /// Build a document from an already-tokenized stream, inferring
    /// whitespace from the spacing rules. The stream always forms a single
    /// sentence; its text is the deterministic reconstruction.
    pub fn document_from_tokens<I, S>(&self, texts: I) -> Document
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut doc = Document::new();
        if let Some(sentence) = sentence_from_token_texts(texts, &self.spacing, 0) {
            doc.sentences.push(sentence);
        }
        let text = doc.reconstructed_text();
        doc.language = self.resolver.resolve(&text);
        doc.text = Some(text);
        doc
    }
}
