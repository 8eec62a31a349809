//! Compiled globs, the pattern cache, and the matcher context.

use std::{borrow::Cow, sync::Arc};

use dashmap::DashMap;
use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    compile::compile,
    parse::{parse, ParseState},
};

/// Errors that can occur when building a matcher for a pattern.
///
/// Parsing itself never fails (malformed nesting degrades to literals); the
/// failure modes left are the regex construction and the option surface.
#[derive(Debug, Error)]
pub enum GlobError {
    /// The rendered regex source was rejected by the regex engine.
    #[error("failed to build a regular expression for pattern `{pattern}`")]
    BuildRegex {
        /// The pattern that was being compiled.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// [`MatchOptions::flags`] contained a flag this engine does not know.
    #[error("unsupported regex flag `{flag}`")]
    UnsupportedFlag {
        /// The offending flag character.
        flag: char,
    },
}

/// Options controlling how a pattern is compiled and interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Compile the pattern case-insensitively.
    pub nocase: bool,
    /// Raw regex flags (`i`, `m`, `s`, `x`, `U`; `u` is accepted and is the
    /// default). When set, this overrides `nocase`.
    pub flags: Option<String>,
    /// Treat a leading `!` as a literal character instead of negation.
    pub nonegate: bool,
}

/// A pattern compiled to a regular expression, together with the parse
/// state it was built from.
///
/// Immutable once built; safely shared for read-only matching.
#[derive(Debug)]
pub struct Glob {
    pattern: String,
    state: ParseState,
    regex: Regex,
}

impl Glob {
    pub(crate) fn build(
        pattern: &str,
        options: Option<&MatchOptions>,
        negated: bool,
    ) -> Result<Self, GlobError> {
        let state = parse(pattern, negated);
        let source = compile(&state);
        trace!(pattern, source = %source, "rendered glob pattern");

        let mut builder = RegexBuilder::new(&source);
        if let Some(options) = options {
            apply_flags(&mut builder, options)?;
        }
        let regex = builder.build().map_err(|source| GlobError::BuildRegex {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            state,
            regex,
        })
    }

    /// Wraps a caller-provided regex as a compiled glob, e.g. to register a
    /// hand-tuned expression in a cache.
    pub fn from_regex(pattern: &str, regex: Regex) -> Self {
        Self {
            pattern: pattern.to_string(),
            state: parse(pattern, false),
            regex,
        }
    }

    /// Tests a candidate against the full compiled expression. The anchors
    /// rendered into the source make this a whole-string match.
    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    /// The pattern this glob was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The parse state the regex was rendered from, for inspection.
    pub fn state(&self) -> &ParseState {
        &self.state
    }

    /// The compiled regular expression.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// A cache from raw pattern text to compiled globs.
///
/// Entries are added once at first compilation and never evicted except by
/// [`GlobCache::clear`]. The map is concurrency-safe, so a cache shared
/// across threads needs no external locking.
#[derive(Debug, Default)]
pub struct GlobCache {
    entries: DashMap<String, Arc<Glob>>,
}

impl GlobCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached glob for a pattern, if any.
    pub fn get(&self, pattern: &str) -> Option<Arc<Glob>> {
        self.entries.get(pattern).map(|entry| Arc::clone(entry.value()))
    }

    /// Registers (or overrides) the entry for a pattern.
    pub fn insert(&self, pattern: impl Into<String>, glob: Arc<Glob>) {
        self.entries.insert(pattern.into(), glob);
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// The number of cached patterns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The matching context: owns a [`GlobCache`] and exposes the compile and
/// match entry points.
///
/// A process-wide instance backs the crate-root free functions; callers that
/// want an isolated cache lifetime create their own.
#[derive(Debug, Default)]
pub struct GlobMatcher {
    cache: GlobCache,
}

impl GlobMatcher {
    /// Creates a matcher context with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache owned by this context.
    pub fn cache(&self) -> &GlobCache {
        &self.cache
    }

    /// Builds or retrieves the compiled glob for a pattern.
    ///
    /// The cache is consulted whenever no options are supplied, and written
    /// only when additionally the negation status is unspecified. The cache
    /// is keyed by pattern text alone; because negation is applied outside
    /// the regex, a read that ignores `negated` returns an equivalent
    /// expression.
    pub(crate) fn make_regex(
        &self,
        pattern: &str,
        options: Option<&MatchOptions>,
        negated: Option<bool>,
    ) -> Result<Arc<Glob>, GlobError> {
        if options.is_none() {
            if let Some(glob) = self.cache.get(pattern) {
                return Ok(glob);
            }
        }

        debug!(pattern, "compiling glob pattern");
        let glob = Arc::new(Glob::build(pattern, options, negated.unwrap_or(false))?);

        if options.is_none() && negated.is_none() {
            self.cache.insert(pattern, Arc::clone(&glob));
        }
        Ok(glob)
    }

    /// Compiles a pattern with default options, sharing the result through
    /// the cache.
    pub fn compile(&self, pattern: &str) -> Result<Arc<Glob>, GlobError> {
        self.make_regex(pattern, None, None)
    }

    /// Compiles a pattern with explicit options. Bypasses the cache in both
    /// directions; the result is owned by the caller alone.
    pub fn compile_with(&self, pattern: &str, options: &MatchOptions) -> Result<Glob, GlobError> {
        Glob::build(pattern, Some(options), false)
    }

    /// Returns a reusable predicate for a pattern, compiled with default
    /// options.
    pub fn matcher(&self, pattern: &str) -> Result<Matcher, GlobError> {
        self.matcher_inner(pattern, None, None)
    }

    /// Returns a reusable predicate for a pattern, compiled with the given
    /// options.
    pub fn matcher_with(
        &self,
        pattern: &str,
        options: &MatchOptions,
    ) -> Result<Matcher, GlobError> {
        self.matcher_inner(pattern, Some(options), None)
    }

    pub(crate) fn matcher_inner(
        &self,
        pattern: &str,
        options: Option<&MatchOptions>,
        negated: Option<bool>,
    ) -> Result<Matcher, GlobError> {
        Ok(Matcher {
            glob: self.make_regex(pattern, options, negated)?,
        })
    }

    /// Tests a single candidate against a pattern with default options.
    pub fn is_match(&self, candidate: &str, pattern: &str) -> Result<bool, GlobError> {
        self.is_match_inner(candidate, pattern, None, None)
    }

    /// Tests a single candidate against a pattern with explicit options.
    pub fn is_match_with(
        &self,
        candidate: &str,
        pattern: &str,
        options: &MatchOptions,
    ) -> Result<bool, GlobError> {
        self.is_match_inner(candidate, pattern, Some(options), None)
    }

    /// The single-candidate predicate with its literal fast paths. The fast
    /// paths are a pure optimization: their results are identical to what
    /// the compiled regex would produce.
    fn is_match_inner(
        &self,
        candidate: &str,
        pattern: &str,
        options: Option<&MatchOptions>,
        negated: Option<bool>,
    ) -> Result<bool, GlobError> {
        // An all-whitespace pattern only matches its own exact text.
        if pattern.trim().is_empty() {
            return Ok(candidate == pattern);
        }

        if !has_glob_metachars(pattern) {
            if candidate == pattern || unixify(candidate) == unixify(pattern) {
                return Ok(true);
            }
            if let Some(stripped) = pattern.strip_prefix("./") {
                return Ok(candidate == stripped);
            }
            return Ok(false);
        }

        Ok(self
            .matcher_inner(pattern, options, negated)?
            .is_match(candidate))
    }
}

/// A reusable single-string predicate over a compiled glob.
#[derive(Debug, Clone)]
pub struct Matcher {
    glob: Arc<Glob>,
}

impl Matcher {
    /// Tests a candidate string.
    pub fn is_match(&self, candidate: &str) -> bool {
        self.glob.is_match(candidate)
    }

    /// The compiled glob backing this predicate.
    pub fn glob(&self) -> &Glob {
        &self.glob
    }

    /// Wraps the predicate with a bounded recency memo over candidates,
    /// useful when the same candidates recur across calls.
    pub fn memoized(self, capacity: usize) -> MemoizedMatcher {
        MemoizedMatcher {
            glob: self.glob,
            memo: mtf_memo::Memo::new(capacity),
        }
    }
}

/// A [`Matcher`] that remembers recent candidate results in a bounded
/// move-to-front memo.
#[derive(Debug)]
pub struct MemoizedMatcher {
    glob: Arc<Glob>,
    memo: mtf_memo::Memo<String, bool>,
}

impl MemoizedMatcher {
    /// Tests a candidate string, consulting the memo first.
    pub fn is_match(&mut self, candidate: &str) -> bool {
        if let Some(&result) = self.memo.get(candidate) {
            return result;
        }
        let result = self.glob.is_match(candidate);
        self.memo.insert(candidate.to_string(), result);
        result
    }
}

/// Returns `true` if the pattern contains any character the glob syntax
/// treats specially. Patterns without them are plain path literals.
fn has_glob_metachars(pattern: &str) -> bool {
    pattern.chars().any(|ch| {
        matches!(
            ch,
            '!' | '*' | '+' | '?' | '(' | ')' | '{' | '}' | '[' | ']'
        )
    })
}

/// Normalizes path separators by collapsing each run of backslashes into a
/// single forward slash. Applied to candidates during literal comparison,
/// never to patterns handed to the parser.
fn unixify(path: &str) -> Cow<'_, str> {
    if !path.contains('\\') {
        return Cow::Borrowed(path);
    }
    let mut out = String::with_capacity(path.len());
    let mut in_backslash_run = false;
    for ch in path.chars() {
        if ch == '\\' {
            if !in_backslash_run {
                out.push('/');
            }
            in_backslash_run = true;
        } else {
            out.push(ch);
            in_backslash_run = false;
        }
    }
    Cow::Owned(out)
}

fn apply_flags(builder: &mut RegexBuilder, options: &MatchOptions) -> Result<(), GlobError> {
    match &options.flags {
        Some(flags) => {
            for flag in flags.chars() {
                match flag {
                    'i' => {
                        builder.case_insensitive(true);
                    }
                    'm' => {
                        builder.multi_line(true);
                    }
                    's' => {
                        builder.dot_matches_new_line(true);
                    }
                    'x' => {
                        builder.ignore_whitespace(true);
                    }
                    'U' => {
                        builder.swap_greed(true);
                    }
                    // Unicode is the engine default.
                    'u' => {}
                    _ => return Err(GlobError::UnsupportedFlag { flag }),
                }
            }
        }
        None => {
            builder.case_insensitive(options.nocase);
        }
    }
    Ok(())
}
