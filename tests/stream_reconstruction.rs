// Integration tests for the no-raw-text path: offsets rebuilt from
// punctuation-attachment rules over a bare token stream

use docseg::segmenter::sentence_from_token_texts;
use docseg::{DocumentSegmenter, SpacingRules};

#[test]
fn test_quote_and_period_attachment() {
    let rules = SpacingRules::default();
    let tokens = ["Mr", ".", "Smith", "said", "\"", "Hi", "\""];

    let sentence = sentence_from_token_texts(tokens, &rules, 0).unwrap();

    // No space before the period: "." starts where "Mr" ends.
    assert_eq!(sentence.tokens[1].span.start, sentence.tokens[0].span.end);
    // No space after the opening quote: "Hi" starts where "\"" ends.
    assert_eq!(sentence.tokens[5].span.start, sentence.tokens[4].span.end);

    // Every finalized token span matches its text width exactly.
    for token in &sentence.tokens {
        assert_eq!(token.span.len(), token.text.len());
    }
}

#[test]
fn test_document_from_tokens_reconstruction() {
    let segmenter = DocumentSegmenter::builtin().unwrap();
    let doc = segmenter.document_from_tokens(["Hello", ",", "world", "!"]);

    assert_eq!(doc.len(), 1);
    assert_eq!(doc.text.as_deref(), Some("Hello, world!"));

    // Token spans index into the reconstructed text.
    let text = doc.text.as_deref().unwrap();
    for token in doc.tokens() {
        assert_eq!(&text[token.span.start..token.span.end], token.text);
    }
}

#[test]
fn test_reconstruction_is_deterministic_and_stable() {
    let segmenter = DocumentSegmenter::builtin().unwrap();
    let tokens = ["She", "said", ",", "\"", "wait", "\"", "."];

    let first = segmenter.document_from_tokens(tokens);
    let again = segmenter.document_from_tokens(tokens);
    assert_eq!(first, again);

    // Re-segmenting the output token stream reproduces the same structure.
    let texts: Vec<String> = first.token_texts().map(str::to_string).collect();
    let second = segmenter.document_from_tokens(texts);
    assert_eq!(first.text, second.text);
    assert_eq!(first.sentences, second.sentences);
}

#[test]
fn test_single_sentence_regardless_of_punctuation() {
    // Known limitation carried over deliberately: a bare token stream is
    // never split back into multiple sentences.
    let segmenter = DocumentSegmenter::builtin().unwrap();
    let doc =
        segmenter.document_from_tokens(["First", ".", "Second", ".", "Third", "."]);

    assert_eq!(doc.len(), 1);
    assert_eq!(doc.text.as_deref(), Some("First. Second. Third."));
}

#[test]
fn test_empty_token_stream() {
    let segmenter = DocumentSegmenter::builtin().unwrap();
    let doc = segmenter.document_from_tokens(Vec::<String>::new());

    assert_eq!(doc.len(), 0);
    assert_eq!(doc.text.as_deref(), Some(""));
}

#[test]
fn test_custom_spacing_rules() {
    let mut rules = SpacingRules::default();
    rules.no_space_before.insert("€".to_string());

    let sentence = sentence_from_token_texts(["42", "€"], &rules, 0).unwrap();
    assert_eq!(sentence.tokens[1].span.start, sentence.tokens[0].span.end);
}

#[test]
fn test_sentence_span_covers_tokens_from_offset() {
    let rules = SpacingRules::default();
    let sentence = sentence_from_token_texts(["pick", "up"], &rules, 100).unwrap();

    assert_eq!(sentence.span.start, 100);
    assert_eq!(sentence.span.end, 100 + "pick up".len());
}
