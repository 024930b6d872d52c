pub mod document;
pub mod language;
pub mod models;
pub mod segmenter;
pub mod span;

// Re-export main types for convenient access
pub use document::{Document, Sentence, Token};
pub use language::{LanguageDetect, LanguageResolver};
pub use models::{
    ModelRegistry, ModelRegistryBuilder, RuleSentencePredictor, RuleTokenizer, SentencePredictor,
    SentenceTokenizer,
};
pub use segmenter::{DocumentSegmenter, NewlinePolicy, SpacingRules};
pub use span::Span;
