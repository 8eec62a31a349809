//! Rendering of a [`ParseState`] into a regex source string.
//!
//! This is a pure join step: the prefix, the per-segment token fragments
//! joined by an escaped separator, and the suffix. The only rendering
//! decision made here concerns [`TokenKind::GlobStar`] tokens, whose
//! fragment and adjacent separator must be optional *as a unit* so that
//! `a/**/b` matches `a/b`.

use crate::parse::{parse, ParseState, TokenKind};

/// The escaped path separator used to join segment fragments.
const SEP: &str = "\\/";

/// A globstar that is followed by more segments: zero or more whole
/// segments, each with its trailing separator.
const GLOBSTAR_SEGMENT: &str = "(?:[^/]+\\/)*";

/// A trailing globstar after a rendered segment: zero or more additional
/// segments, each introduced by a separator, plus an optional trailing one.
const GLOBSTAR_TAIL: &str = "(?:\\/[^/]+)*\\/?";

/// A trailing globstar with nothing rendered immediately before it (the
/// previous token was itself a globstar): zero or more segments without a
/// required leading separator.
const GLOBSTAR_TAIL_BARE: &str = "(?:[^/]+(?:\\/[^/]+)*)?\\/?";

/// A pattern that is nothing but `**`: matches any candidate.
const GLOBSTAR_WHOLE: &str = ".*";

/// Renders a parse state into a single regex source string.
pub fn compile(state: &ParseState) -> String {
    let mut out = String::with_capacity(state.pattern.len() * 2 + 4);
    out.push_str(&state.prefix);

    // Set when the previous token was a mid-pattern globstar, whose
    // fragment already covers the following separator.
    let mut sep_rendered = false;

    for (i, token) in state.stash.iter().enumerate() {
        let first = i == 0;
        let last = i + 1 == state.stash.len();

        match token.kind {
            TokenKind::GlobStar => {
                if first && last {
                    out.push_str(GLOBSTAR_WHOLE);
                } else if last {
                    if sep_rendered {
                        out.push_str(GLOBSTAR_TAIL_BARE);
                    } else {
                        out.push_str(GLOBSTAR_TAIL);
                    }
                } else {
                    if !first && !sep_rendered {
                        out.push_str(SEP);
                    }
                    out.push_str(GLOBSTAR_SEGMENT);
                    sep_rendered = true;
                    continue;
                }
            }
            _ => {
                if !first && !sep_rendered {
                    out.push_str(SEP);
                }
                out.push_str(&token.value);
            }
        }
        sep_rendered = false;
    }

    out.push_str(&state.suffix);
    out
}

/// Convenience overload: parses `pattern` (as non-negated) and renders it.
pub fn compile_pattern(pattern: &str) -> String {
    compile(&parse(pattern, false))
}
