// WHY: token offsets must stay document-global and monotonic even though the
// newline policy elides characters from the emitted stream; the ledger carries
// the correction across sentence boundaries

use crate::document::Token;
use crate::models::SentenceTokenizer;
use crate::segmenter::NewlinePolicy;
use crate::span::Span;
use tracing::warn;

/// Running counters threaded through the per-sentence tokenization step.
///
/// `consecutive_newlines` counts the current newline run across sentence
/// boundaries; `dropped_bytes` is the total width of newline characters elided
/// so far, subtracted from every subsequent global offset. Kept as an explicit
/// value (not ambient state) so single sentences can be tokenized in isolation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NewlineLedger {
    pub consecutive_newlines: u32,
    pub dropped_bytes: usize,
}

impl NewlineLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Tokenize one finalized sentence span, mapping local token offsets to
/// document-global offsets and applying the newline policy.
///
/// `doc_base` is the continuation base from the document assembler. The global
/// offset of a token is `doc_base + sentence.start + local.start - dropped_bytes`.
///
/// Per-policy treatment of a `\n` token:
/// - `Keep`: emitted like any other token.
/// - `KeepDouble`: only the second newline of a run is emitted as the break
///   marker; the first (and any beyond the second) is dropped and added to the
///   ledger. A lone trailing newline is therefore dropped with a ledger
///   increment nothing ever observes.
/// - `Discard`: never emitted; only runs longer than one add to the ledger, a
///   single isolated newline counts as ordinary inter-token whitespace.
pub fn tokenize_sentence(
    sentence: Span,
    text: &str,
    tokenizer: &dyn SentenceTokenizer,
    policy: NewlinePolicy,
    doc_base: usize,
    ledger: &mut NewlineLedger,
) -> Vec<Token> {
    let sentence_text = &text[sentence.start..sentence.end];
    let base = doc_base + sentence.start;

    let mut tokens: Vec<Token> = Vec::new();
    let mut prev_local_end = 0usize;

    for local in tokenizer.tokenize(sentence_text) {
        if !is_well_formed(local, prev_local_end, sentence_text) {
            debug_assert!(false, "malformed token span {local:?} in {sentence:?}");
            warn!(?local, ?sentence, "skipping malformed token span");
            continue;
        }
        prev_local_end = local.end;
        let token_text = &sentence_text[local.start..local.end];

        if token_text == "\n" {
            ledger.consecutive_newlines += 1;
            match policy {
                NewlinePolicy::Keep => {
                    tokens.push(emit(token_text, local, base, ledger));
                }
                NewlinePolicy::KeepDouble if ledger.consecutive_newlines == 2 => {
                    tokens.push(emit(token_text, local, base, ledger));
                }
                NewlinePolicy::KeepDouble => {
                    ledger.dropped_bytes += local.len();
                }
                NewlinePolicy::Discard => {
                    if ledger.consecutive_newlines > 1 {
                        ledger.dropped_bytes += local.len();
                    }
                }
            }
        } else {
            tokens.push(emit(token_text, local, base, ledger));
            ledger.consecutive_newlines = 0;
        }
    }

    tokens
}

fn emit(token_text: &str, local: Span, base: usize, ledger: &NewlineLedger) -> Token {
    // dropped_bytes only counts newlines strictly before this position, so the
    // subtraction cannot underflow.
    debug_assert!(ledger.dropped_bytes <= base + local.start);
    let start = base + local.start - ledger.dropped_bytes;
    Token::new(token_text, start, start + local.len())
}

fn is_well_formed(local: Span, prev_end: usize, sentence_text: &str) -> bool {
    local.in_bounds(sentence_text.len())
        && !local.is_empty()
        && local.start >= prev_end
        && sentence_text.is_char_boundary(local.start)
        && sentence_text.is_char_boundary(local.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RuleTokenizer;

    fn run(text: &str, policy: NewlinePolicy) -> (Vec<Token>, NewlineLedger) {
        let tokenizer = RuleTokenizer::new();
        let mut ledger = NewlineLedger::new();
        let tokens = tokenize_sentence(
            Span::new(0, text.len()),
            text,
            &tokenizer,
            policy,
            0,
            &mut ledger,
        );
        (tokens, ledger)
    }

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_keep_emits_every_newline() {
        let (tokens, ledger) = run("one\ntwo\n", NewlinePolicy::Keep);
        assert_eq!(texts(&tokens), vec!["one", "\n", "two", "\n"]);
        assert_eq!(ledger.dropped_bytes, 0);
        assert_eq!(tokens[1].span, Span::new(3, 4));
        assert_eq!(tokens[3].span, Span::new(7, 8));
    }

    #[test]
    fn test_keep_double_emits_second_of_pair() {
        let (tokens, ledger) = run("one\n\ntwo", NewlinePolicy::KeepDouble);
        assert_eq!(texts(&tokens), vec!["one", "\n", "two"]);
        // First newline of the pair was dropped, so the emitted break and the
        // following word both sit one byte earlier.
        assert_eq!(tokens[1].span, Span::new(3, 4));
        assert_eq!(tokens[2].span, Span::new(4, 7));
        assert_eq!(ledger.dropped_bytes, 1);
    }

    #[test]
    fn test_keep_double_single_newline_dropped() {
        let (tokens, ledger) = run("one\ntwo", NewlinePolicy::KeepDouble);
        assert_eq!(texts(&tokens), vec!["one", "two"]);
        // The lone newline still lands in the ledger (original behavior):
        // everything after it shifts back one byte.
        assert_eq!(ledger.dropped_bytes, 1);
        assert_eq!(tokens[1].span, Span::new(3, 6));
    }

    #[test]
    fn test_keep_double_triple_newline() {
        let (tokens, ledger) = run("a\n\n\nb", NewlinePolicy::KeepDouble);
        assert_eq!(texts(&tokens), vec!["a", "\n", "b"]);
        assert_eq!(ledger.dropped_bytes, 2);
        // Emitted projection is "a\nb": the break marker and the following
        // word pack tightly behind the two dropped newlines.
        assert_eq!(tokens[1].span, Span::new(1, 2));
        assert_eq!(tokens[2].span, Span::new(2, 3));
    }

    #[test]
    fn test_discard_single_newline_is_plain_whitespace() {
        let (tokens, ledger) = run("one\ntwo", NewlinePolicy::Discard);
        assert_eq!(texts(&tokens), vec!["one", "two"]);
        assert_eq!(ledger.dropped_bytes, 0);
        assert_eq!(tokens[1].span, Span::new(4, 7));
    }

    #[test]
    fn test_discard_newline_run_shrinks_offsets() {
        let (tokens, ledger) = run("one\n\n\ntwo", NewlinePolicy::Discard);
        assert_eq!(texts(&tokens), vec!["one", "two"]);
        // Run of three collapses to a single implied whitespace boundary.
        assert_eq!(ledger.dropped_bytes, 2);
        assert_eq!(tokens[1].span, Span::new(4, 7));
    }

    #[test]
    fn test_ledger_carries_across_sentences() {
        let tokenizer = RuleTokenizer::new();
        let text = "a.\n\nb.";
        let mut ledger = NewlineLedger::new();

        let first = tokenize_sentence(
            Span::new(0, 4),
            text,
            &tokenizer,
            NewlinePolicy::Discard,
            0,
            &mut ledger,
        );
        assert_eq!(texts(&first), vec!["a", "."]);
        assert_eq!(ledger.dropped_bytes, 1);
        assert_eq!(ledger.consecutive_newlines, 2);

        let second = tokenize_sentence(
            Span::new(4, 6),
            text,
            &tokenizer,
            NewlinePolicy::Discard,
            0,
            &mut ledger,
        );
        // Offsets corrected by the byte dropped in the previous sentence.
        assert_eq!(second[0].span, Span::new(3, 4));
        assert_eq!(ledger.consecutive_newlines, 0);
    }

    #[test]
    fn test_doc_base_offsets() {
        let tokenizer = RuleTokenizer::new();
        let mut ledger = NewlineLedger::new();
        let tokens = tokenize_sentence(
            Span::new(0, 3),
            "Hi.",
            &tokenizer,
            NewlinePolicy::Discard,
            10,
            &mut ledger,
        );
        assert_eq!(tokens[0].span, Span::new(10, 12));
        assert_eq!(tokens[1].span, Span::new(12, 13));
    }

    #[test]
    fn test_offsets_monotonic_under_all_policies() {
        for policy in [
            NewlinePolicy::Keep,
            NewlinePolicy::KeepDouble,
            NewlinePolicy::Discard,
        ] {
            let (tokens, _) = run("a\nb\n\nc d\n\n\ne", policy);
            for pair in tokens.windows(2) {
                assert!(
                    pair[0].span.end <= pair[1].span.start,
                    "overlap under {policy:?}: {pair:?}"
                );
            }
        }
    }

    #[test]
    fn test_empty_sentence_text() {
        let (tokens, ledger) = run("", NewlinePolicy::Keep);
        assert!(tokens.is_empty());
        assert_eq!(ledger, NewlineLedger::new());
    }
}
