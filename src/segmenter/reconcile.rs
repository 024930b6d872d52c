// WHY: raw predictor spans do not respect literal newlines; this pass rewrites them
// so every newline run ends up attached to the sentence it conceptually terminates

use crate::span::Span;
use tracing::warn;

/// Rewrite raw predictor spans into finalized sentence spans.
///
/// Newlines force sentence breaks under every newline policy, so this pass is
/// policy-independent: the policy only decides later what the tokenizer adapter
/// does with the newline characters themselves. Rules applied, in order:
///
/// - a newline-bearing gap between the cursor and the next raw span is merged
///   into the previous finalized span (newlines between sentences belong to the
///   sentence before them);
/// - a raw span is split at each interior newline; a newline at the very start
///   of the remainder (plus any whitespace run behind it) is merged backward
///   into the most recent finalized span;
/// - zero-length pieces are discarded, never emitted;
/// - a newline-bearing tail after the last raw span is merged into the last
///   finalized span so the output tiles the text.
///
/// Malformed collaborator spans (out of bounds, regressing behind the cursor,
/// off a UTF-8 boundary) are a contract violation: rejected loudly in debug
/// builds, skipped defensively in release builds.
///
/// The result is ordered, non-overlapping, and idempotent: feeding finalized
/// spans back in yields them unchanged.
pub fn reconcile(raw: &[Span], text: &str) -> Vec<Span> {
    let mut out: Vec<Span> = Vec::new();
    let mut cursor = 0usize;

    for &span in raw {
        if !is_well_formed(span, cursor, text) {
            debug_assert!(false, "malformed predictor span {span:?} at cursor {cursor}");
            warn!(?span, cursor, "skipping malformed predictor span");
            continue;
        }

        // Gap between sentences: newlines in it belong to the previous sentence.
        if span.start > cursor {
            if let Some(last) = out.last_mut() {
                if text[cursor..span.start].contains('\n') {
                    last.end = span.start;
                }
            }
        }

        // Split the span itself at interior newlines.
        let mut start = span.start;
        while let Some(rel) = text[start..span.end].find('\n') {
            if rel == 0 {
                // Leading newline (and the whitespace run it drags along)
                // belongs to the previous sentence, if there is one.
                let mut skip = 1;
                let rest = &text[start + 1..span.end];
                skip += rest.len() - rest.trim_start().len();
                if let Some(last) = out.last_mut() {
                    last.end = start + skip;
                }
                start += skip;
            } else {
                out.push(Span::new(start, start + rel));
                start += rel;
            }
        }
        if start < span.end {
            out.push(Span::new(start, span.end));
        }
        cursor = span.end;
    }

    // Trailing text the predictor trimmed: a newline in it still belongs to the
    // final sentence.
    if cursor < text.len() && text[cursor..].contains('\n') {
        if let Some(last) = out.last_mut() {
            last.end = text.len();
        }
    }

    out
}

fn is_well_formed(span: Span, cursor: usize, text: &str) -> bool {
    span.in_bounds(text.len())
        && span.start >= cursor
        && text.is_char_boundary(span.start)
        && text.is_char_boundary(span.end)
}
