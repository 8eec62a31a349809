#![deny(missing_docs)]
//! A library for matching path-like strings against shell-style glob
//! patterns by compiling each pattern into an equivalent regular expression.
//!
//! This crate classifies strings that are already in hand (path lists from
//! build tools, walkers or filters); it never touches the filesystem and
//! performs no shell expansion.
//!
//! # Glob Semantics
//!
//! - `*` matches zero or more characters within one path segment; it never
//!   crosses a `/`.
//! - `**` as a whole segment matches zero or more full segments, including
//!   none: `a/**/b` matches `a/b`, `a/x/b` and `a/x/y/b`.
//! - `?` matches exactly one character other than `/`.
//! - `[a-c]` and the negated forms `[!a-c]`/`[^a-c]` are character classes.
//! - `{a,b}` is alternation; braces nest, and separators inside braces are
//!   segment content (`{a,b/c}` matches the two-segment candidate `b/c`).
//! - `@(..)`, `?(..)`, `*(..)` and `+(..)` are extglob groups with `|`
//!   alternation and the usual repetition semantics.
//! - `\` escapes the next character.
//! - Trailing and leading separators are significant: `a/` matches `a/` but
//!   not `a`.
//!
//! Malformed nesting never fails: an unmatched `]` or an unclosed `{` is
//! matched literally, so every pattern compiles to *some* usable
//! expression.
//!
//! # Negation and Lists
//!
//! A leading `!` is interpreted by the list entry points: `match_list(list,
//! "!p")` returns everything that does not match `p`. [`match_all`]
//! combines several patterns, unioning positive matches and subtracting
//! negated ones. Single-candidate matching ([`is_match`]) does not strip
//! `!`; set [`MatchOptions::nonegate`] to make the list entry points treat
//! it literally too.
//!
//! # Caching
//!
//! Compiling a pattern with default options stores the result in a
//! [`GlobCache`] keyed by pattern text, so repeated matching against the
//! same pattern reuses one compiled expression. The crate-root functions
//! share one process-wide [`GlobMatcher`]; create your own instance for an
//! isolated cache lifetime. The cache is purely an optimization: clearing
//! it never changes match results.

mod compile;
mod list;
mod matcher;
mod parse;

use once_cell::sync::Lazy;

pub use compile::{compile, compile_pattern};
pub use matcher::{
    Glob, GlobCache, GlobError, GlobMatcher, MatchOptions, Matcher, MemoizedMatcher,
};
pub use parse::{parse, BracketKind, ParseState, Token, TokenKind};

/// The process-wide matcher context behind the crate-root functions.
static DEFAULT_MATCHER: Lazy<GlobMatcher> = Lazy::new(GlobMatcher::new);

/// Returns the process-wide matcher context.
pub fn default_matcher() -> &'static GlobMatcher {
    &DEFAULT_MATCHER
}

/// Tests a single candidate against a pattern with default options, using
/// the process-wide cache.
///
/// ```
/// assert!(glob_filter::is_match("src/main.rs", "src/*.rs").unwrap());
/// assert!(!glob_filter::is_match("src/sub/main.rs", "src/*.rs").unwrap());
/// ```
pub fn is_match(candidate: &str, pattern: &str) -> Result<bool, GlobError> {
    DEFAULT_MATCHER.is_match(candidate, pattern)
}

/// Tests a single candidate against a pattern with explicit options.
pub fn is_match_with(
    candidate: &str,
    pattern: &str,
    options: &MatchOptions,
) -> Result<bool, GlobError> {
    DEFAULT_MATCHER.is_match_with(candidate, pattern, options)
}

/// Returns a reusable predicate for a pattern, compiled through the
/// process-wide cache.
pub fn matcher(pattern: &str) -> Result<Matcher, GlobError> {
    DEFAULT_MATCHER.matcher(pattern)
}

/// Returns a reusable predicate for a pattern with explicit options.
pub fn matcher_with(pattern: &str, options: &MatchOptions) -> Result<Matcher, GlobError> {
    DEFAULT_MATCHER.matcher_with(pattern, options)
}

/// Filters an ordered candidate list with a single pattern (leading `!`
/// negates), using the process-wide cache.
///
/// ```
/// let kept = glob_filter::match_list(["a.rs", "a.txt", "b.rs"], "*.rs").unwrap();
/// assert_eq!(kept, vec!["a.rs", "b.rs"]);
/// ```
pub fn match_list<'a>(
    list: impl IntoIterator<Item = &'a str>,
    pattern: &str,
) -> Result<Vec<&'a str>, GlobError> {
    DEFAULT_MATCHER.match_list(list, pattern)
}

/// Filters an ordered candidate list with a single pattern and explicit
/// options.
pub fn match_list_with<'a>(
    list: impl IntoIterator<Item = &'a str>,
    pattern: &str,
    options: &MatchOptions,
) -> Result<Vec<&'a str>, GlobError> {
    DEFAULT_MATCHER.match_list_with(list, pattern, options)
}

/// Filters an ordered candidate list with several patterns, unioning
/// positive matches and subtracting negated ones.
///
/// ```
/// let kept = glob_filter::match_all(["a", "b", "c"], ["*", "!b"]).unwrap();
/// assert_eq!(kept, vec!["a", "c"]);
/// ```
pub fn match_all<'a, 'p>(
    list: impl IntoIterator<Item = &'a str>,
    patterns: impl IntoIterator<Item = &'p str>,
) -> Result<Vec<&'a str>, GlobError> {
    DEFAULT_MATCHER.match_all(list, patterns)
}

/// Filters an ordered candidate list with several patterns and explicit
/// options.
pub fn match_all_with<'a, 'p>(
    list: impl IntoIterator<Item = &'a str>,
    patterns: impl IntoIterator<Item = &'p str>,
    options: &MatchOptions,
) -> Result<Vec<&'a str>, GlobError> {
    DEFAULT_MATCHER.match_all_with(list, patterns, options)
}

/// Empties the process-wide pattern cache.
pub fn clear_cache() {
    DEFAULT_MATCHER.cache().clear();
}

/// Registers (or overrides) a precompiled regex for a pattern in the
/// process-wide cache.
pub fn set_cache_entry(pattern: &str, regex: regex::Regex) {
    DEFAULT_MATCHER
        .cache()
        .insert(pattern, std::sync::Arc::new(Glob::from_regex(pattern, regex)));
}
