//! Parsing of glob patterns into an intermediate representation.
//!
//! A pattern is first split into path segments on unescaped `/` characters
//! that occur outside of any bracket, brace, paren or angle group. Each
//! segment is then translated into a regex fragment ([`Token`]). The
//! resulting [`ParseState`] is rendered into a single regex source string by
//! [`crate::compile`].
//!
//! The parser never fails: malformed nesting (an unmatched `]`, an unclosed
//! `{`) degrades to literally matched characters instead of an error, so
//! every input produces a usable, regex-safe state.

use smallvec::SmallVec;

/// The nesting-group family a delimiter character belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    /// `<` and `>`.
    Angles,
    /// `{` and `}`.
    Braces,
    /// `[` and `]`.
    Brackets,
    /// `(` and `)`.
    Parens,
    /// Any other character.
    Other,
}

impl BracketKind {
    /// Classifies a single character. Pure and total; every character maps
    /// to exactly one family.
    pub fn of(ch: char) -> Self {
        match ch {
            '<' | '>' => BracketKind::Angles,
            '{' | '}' => BracketKind::Braces,
            '[' | ']' => BracketKind::Brackets,
            '(' | ')' => BracketKind::Parens,
            _ => BracketKind::Other,
        }
    }
}

/// How a parsed segment behaves when rendered and joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Only literally matched characters.
    Literal,
    /// Contains a wildcard, class or group; matches within one segment.
    Wildcard,
    /// A lone `**` segment; matches zero or more whole segments.
    GlobStar,
    /// An empty segment produced by a leading, trailing or doubled
    /// separator. Matches exactly empty content at its position.
    Empty,
}

/// One path segment's compiled regex fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The regex fragment for this segment. Empty for [`TokenKind::Empty`]
    /// and [`TokenKind::GlobStar`]; a globstar's rendering depends on its
    /// position and is chosen by the compiler.
    pub value: String,
    /// The behavioral classification of the segment.
    pub kind: TokenKind,
}

/// The parser's output: everything the compiler needs to render a regex
/// source string, retained on compiled globs for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseState {
    /// The pattern this state was parsed from (negation already stripped).
    pub pattern: String,
    /// Fragment emitted before the joined segments. Carries the `^` anchor.
    pub prefix: String,
    /// One token per path segment, in left-to-right order.
    pub stash: Vec<Token>,
    /// Fragment emitted after the joined segments. Carries the `$` anchor.
    pub suffix: String,
    /// Whether the caller stripped a leading `!` before handing the pattern
    /// to the parser. Informational; negation is applied by the list
    /// matcher, never inside the regex.
    pub negated: bool,
}

/// Parses a glob pattern into a [`ParseState`]. Infallible; see the module
/// docs for the literal-degradation policy.
pub fn parse(pattern: &str, negated: bool) -> ParseState {
    let stash = split_segments(pattern)
        .into_iter()
        .map(translate_segment)
        .collect();
    ParseState {
        pattern: pattern.to_string(),
        prefix: "^".to_string(),
        stash,
        suffix: "$".to_string(),
        negated,
    }
}

/// Splits a pattern into segments on unescaped separators, treating
/// separators inside an open group as segment content. A separator is a
/// split point only while the nesting stack is empty.
fn split_segments(pattern: &str) -> Vec<&str> {
    if pattern.is_empty() {
        return Vec::new();
    }

    let chars: Vec<(usize, char)> = pattern.char_indices().collect();
    let mut stack: SmallVec<[BracketKind; 8]> = SmallVec::new();
    let mut segments = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (idx, ch) = chars[i];
        match ch {
            '\\' => {
                i += 2;
                continue;
            }
            '[' => {
                // A well-formed class is opaque: separators and delimiters
                // inside it are content. An unclosed `[` is a literal.
                if let Some(end) = class_end(pattern, idx) {
                    while i < chars.len() && chars[i].0 <= end {
                        i += 1;
                    }
                    continue;
                }
            }
            '/' if stack.is_empty() => {
                segments.push(&pattern[start..idx]);
                start = idx + 1;
            }
            '{' | '(' | '<' => stack.push(BracketKind::of(ch)),
            '}' | ')' | '>' => {
                // Only a closer of the topmost family pops; the stack never
                // pops below another family's unmatched opener.
                if stack.last() == Some(&BracketKind::of(ch)) {
                    stack.pop();
                }
            }
            _ => {}
        }
        i += 1;
    }

    segments.push(&pattern[start..]);
    segments
}

/// Returns the byte offset of the `]` that closes a character class opened
/// at `open`, or `None` when the class never closes.
///
/// Follows shell conventions: a `!` or `^` directly after the opener negates
/// the class, and a `]` in the first content position is literal content.
fn class_end(pattern: &str, open: usize) -> Option<usize> {
    let bytes = pattern.as_bytes();
    let mut i = open + 1;
    if i < bytes.len() && (bytes[i] == b'!' || bytes[i] == b'^') {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b']' {
        i += 1;
    }
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b']' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// An open group recorded during translation: its family plus the text to
/// emit when its structural closer is reached.
struct OpenGroup {
    family: BracketKind,
    close: &'static str,
}

/// Translates one segment into a [`Token`].
fn translate_segment(segment: &str) -> Token {
    if segment.is_empty() {
        return Token {
            value: String::new(),
            kind: TokenKind::Empty,
        };
    }
    if segment == "**" {
        return Token {
            value: String::new(),
            kind: TokenKind::GlobStar,
        };
    }

    let structural = classify_structural(segment);
    let chars: Vec<(usize, char)> = segment.char_indices().collect();
    let mut out = String::with_capacity(segment.len() + 8);
    let mut groups: SmallVec<[OpenGroup; 4]> = SmallVec::new();
    let mut wildcard = false;
    let mut i = 0;

    while i < chars.len() {
        let (idx, ch) = chars[i];
        match ch {
            '\\' => {
                i += 1;
                if i < chars.len() {
                    push_literal(&mut out, chars[i].1);
                    i += 1;
                } else {
                    // Trailing backslash: match a literal backslash.
                    out.push_str("\\\\");
                }
                continue;
            }
            '*' => {
                wildcard = true;
                if let Some(group) = extglob_group(ch, &chars, &structural, i) {
                    out.push_str("(?:");
                    groups.push(group);
                    i += 2;
                    continue;
                }
                // A run of stars inside a segment collapses to a single
                // wildcard; `**` only spans segments when it is a whole
                // segment of its own.
                while i + 1 < chars.len() && chars[i + 1].1 == '*' {
                    i += 1;
                }
                out.push_str("[^/]*");
            }
            '?' => {
                wildcard = true;
                if let Some(group) = extglob_group(ch, &chars, &structural, i) {
                    out.push_str("(?:");
                    groups.push(group);
                    i += 2;
                    continue;
                }
                out.push_str("[^/]");
            }
            '@' | '+' => {
                if let Some(group) = extglob_group(ch, &chars, &structural, i) {
                    wildcard = true;
                    out.push_str("(?:");
                    groups.push(group);
                    i += 2;
                    continue;
                }
                push_literal(&mut out, ch);
            }
            '[' if structural[idx] => {
                wildcard = true;
                let end = class_end(segment, idx).unwrap_or(idx);
                translate_class(&segment[idx + 1..end], &mut out);
                while i < chars.len() && chars[i].0 <= end {
                    i += 1;
                }
                continue;
            }
            '{' if structural[idx] => {
                wildcard = true;
                out.push_str("(?:");
                groups.push(OpenGroup {
                    family: BracketKind::Braces,
                    close: ")",
                });
            }
            '(' if structural[idx] => {
                wildcard = true;
                out.push_str("(?:");
                groups.push(OpenGroup {
                    family: BracketKind::Parens,
                    close: ")",
                });
            }
            '<' if structural[idx] => {
                // Angles nest (the classifier tracks them) but carry no glob
                // semantics; both delimiters render literally.
                out.push('<');
                groups.push(OpenGroup {
                    family: BracketKind::Angles,
                    close: ">",
                });
            }
            '}' | ')' | '>' if structural[idx] => {
                if let Some(group) = groups.pop() {
                    out.push_str(group.close);
                } else {
                    push_literal(&mut out, ch);
                }
            }
            ',' => {
                if groups.last().map(|group| group.family) == Some(BracketKind::Braces) {
                    out.push('|');
                } else {
                    out.push(',');
                }
            }
            '|' => {
                if groups.last().map(|group| group.family) == Some(BracketKind::Parens) {
                    out.push('|');
                } else {
                    out.push_str("\\|");
                }
            }
            '/' => {
                // Reached only inside a group; top-level separators were
                // split points.
                out.push_str("\\/");
            }
            _ => push_literal(&mut out, ch),
        }
        i += 1;
    }

    Token {
        value: out,
        kind: if wildcard {
            TokenKind::Wildcard
        } else {
            TokenKind::Literal
        },
    }
}

/// Marks which delimiter bytes of a segment are structural (part of a
/// matched pair or a closed class). Everything left unmarked is rendered as
/// a literal by the translation pass.
fn classify_structural(segment: &str) -> Vec<bool> {
    let mut structural = vec![false; segment.len()];
    let mut stack: SmallVec<[(BracketKind, usize); 8]> = SmallVec::new();
    let chars: Vec<(usize, char)> = segment.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (idx, ch) = chars[i];
        match ch {
            '\\' => {
                i += 2;
                continue;
            }
            '[' => {
                if let Some(end) = class_end(segment, idx) {
                    structural[idx] = true;
                    structural[end] = true;
                    while i < chars.len() && chars[i].0 <= end {
                        i += 1;
                    }
                    continue;
                }
            }
            '{' | '(' | '<' => stack.push((BracketKind::of(ch), idx)),
            '}' | ')' | '>' => {
                if let Some(&(family, open_idx)) = stack.last() {
                    if family == BracketKind::of(ch) {
                        stack.pop();
                        structural[open_idx] = true;
                        structural[idx] = true;
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }

    structural
}

/// Recognizes an extglob opener: a qualifier character directly followed by
/// a structural `(`. Returns the group to push, or `None` when the
/// qualifier stands alone.
fn extglob_group(
    qualifier: char,
    chars: &[(usize, char)],
    structural: &[bool],
    i: usize,
) -> Option<OpenGroup> {
    let (next_idx, next_ch) = *chars.get(i + 1)?;
    if next_ch != '(' || !structural[next_idx] {
        return None;
    }
    let close = match qualifier {
        '@' => ")",
        '?' => ")?",
        '*' => ")*",
        '+' => ")+",
        _ => return None,
    };
    Some(OpenGroup {
        family: BracketKind::Parens,
        close,
    })
}

/// Renders the content of a character class, mapping shell negation to
/// regex negation and escaping characters the regex class syntax treats
/// specially.
fn translate_class(content: &str, out: &mut String) {
    out.push('[');
    let mut chars = content.chars();
    let mut first = true;
    while let Some(ch) = chars.next() {
        if first && (ch == '!' || ch == '^') {
            out.push('^');
            first = false;
            continue;
        }
        first = false;
        match ch {
            '\\' => {
                out.push('\\');
                match chars.next() {
                    Some(escaped) => out.push(escaped),
                    None => out.push('\\'),
                }
            }
            '[' => out.push_str("\\["),
            ']' => out.push_str("\\]"),
            // `&&` and `~~` are set operations in Rust regex classes.
            '&' => out.push_str("\\&"),
            '~' => out.push_str("\\~"),
            _ => out.push(ch),
        }
    }
    out.push(']');
}

/// Appends a character as a regex literal, escaping metacharacters.
fn push_literal(out: &mut String, ch: char) {
    if matches!(
        ch,
        '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$' | '\\'
    ) {
        out.push('\\');
    }
    out.push(ch);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifier_is_total() {
        assert_eq!(BracketKind::of('<'), BracketKind::Angles);
        assert_eq!(BracketKind::of('>'), BracketKind::Angles);
        assert_eq!(BracketKind::of('{'), BracketKind::Braces);
        assert_eq!(BracketKind::of('}'), BracketKind::Braces);
        assert_eq!(BracketKind::of('['), BracketKind::Brackets);
        assert_eq!(BracketKind::of(']'), BracketKind::Brackets);
        assert_eq!(BracketKind::of('('), BracketKind::Parens);
        assert_eq!(BracketKind::of(')'), BracketKind::Parens);
        assert_eq!(BracketKind::of('a'), BracketKind::Other);
        assert_eq!(BracketKind::of('/'), BracketKind::Other);
        assert_eq!(BracketKind::of('\\'), BracketKind::Other);
    }

    #[test]
    fn splits_on_top_level_separators_only() {
        assert_eq!(split_segments("a/b/c"), vec!["a", "b", "c"]);
        assert_eq!(split_segments("{a,b/c}"), vec!["{a,b/c}"]);
        assert_eq!(split_segments("a(b/c)d"), vec!["a(b/c)d"]);
        assert_eq!(split_segments("[/]"), vec!["[/]"]);
        assert_eq!(split_segments("a\\/b"), vec!["a\\/b"]);
    }

    #[test]
    fn empty_segments_are_preserved() {
        assert_eq!(split_segments(""), Vec::<&str>::new());
        assert_eq!(split_segments("a/"), vec!["a", ""]);
        assert_eq!(split_segments("/a"), vec!["", "a"]);
        assert_eq!(split_segments("a//b"), vec!["a", "", "b"]);
    }

    #[test]
    fn empty_pattern_has_empty_state() {
        let state = parse("", false);
        assert_eq!(state.prefix, "^");
        assert_eq!(state.suffix, "$");
        assert!(state.stash.is_empty());
    }

    #[test]
    fn globstar_is_a_whole_segment_token() {
        let state = parse("a/**/b", false);
        assert_eq!(state.stash.len(), 3);
        assert_eq!(state.stash[1].kind, TokenKind::GlobStar);

        // Inside a segment, star runs collapse to a single-segment wildcard.
        let state = parse("a**b", false);
        assert_eq!(state.stash.len(), 1);
        assert_eq!(state.stash[0].kind, TokenKind::Wildcard);
        assert_eq!(state.stash[0].value, "a[^/]*b");
    }

    #[test]
    fn token_kinds_reflect_segment_content() {
        assert_eq!(parse("src", false).stash[0].kind, TokenKind::Literal);
        assert_eq!(parse("*.rs", false).stash[0].kind, TokenKind::Wildcard);
        assert_eq!(parse("a/", false).stash[1].kind, TokenKind::Empty);
    }

    #[test]
    fn literal_metacharacters_are_escaped() {
        assert_eq!(parse("a.b", false).stash[0].value, "a\\.b");
        assert_eq!(parse("a$b", false).stash[0].value, "a\\$b");
        assert_eq!(parse("a\\*b", false).stash[0].value, "a\\*b");
    }

    #[test]
    fn classes_translate_to_regex_classes() {
        assert_eq!(parse("[a-c]", false).stash[0].value, "[a-c]");
        assert_eq!(parse("[!a-c]", false).stash[0].value, "[^a-c]");
        assert_eq!(parse("[^a-c]", false).stash[0].value, "[^a-c]");
        assert_eq!(parse("[]]", false).stash[0].value, "[\\]]");
        assert_eq!(parse("x[&~]y", false).stash[0].value, "x[\\&\\~]y");
    }

    #[test]
    fn braces_translate_to_alternation() {
        assert_eq!(parse("{a,b,c}", false).stash[0].value, "(?:a|b|c)");
        assert_eq!(parse("{a,{b,c}}", false).stash[0].value, "(?:a|(?:b|c))");
        // A comma outside of braces is literal.
        assert_eq!(parse("a,b", false).stash[0].value, "a,b");
        // A separator inside braces is segment content.
        assert_eq!(parse("{a,b/c}", false).stash[0].value, "(?:a|b\\/c)");
    }

    #[test]
    fn extglob_qualifiers_map_to_repetition() {
        assert_eq!(parse("@(a|b)", false).stash[0].value, "(?:a|b)");
        assert_eq!(parse("?(a|b)", false).stash[0].value, "(?:a|b)?");
        assert_eq!(parse("*(a|b)", false).stash[0].value, "(?:a|b)*");
        assert_eq!(parse("+(a|b)", false).stash[0].value, "(?:a|b)+");
        // Without a following group the qualifiers are ordinary glob chars.
        assert_eq!(parse("a+b", false).stash[0].value, "a\\+b");
        assert_eq!(parse("a@b", false).stash[0].value, "a@b");
    }

    #[test]
    fn unmatched_closers_are_literal() {
        assert_eq!(parse("a]b", false).stash[0].value, "a\\]b");
        assert_eq!(parse("a}b", false).stash[0].value, "a\\}b");
        assert_eq!(parse("a)b", false).stash[0].value, "a\\)b");
    }

    #[test]
    fn unclosed_openers_degrade_to_literals() {
        assert_eq!(parse("{a,b", false).stash[0].value, "\\{a,b");
        assert_eq!(parse("(ab", false).stash[0].value, "\\(ab");
        assert_eq!(parse("[ab", false).stash[0].value, "\\[ab");
    }

    #[test]
    fn mismatched_nesting_never_pops_across_families() {
        // `}` arrives while a paren group is innermost: the brace stays open
        // and both brace delimiters degrade to literals.
        assert_eq!(parse("{(}", false).stash[0].value, "\\{\\(\\}");
        // The paren pair brackets the brace closer, so the parens are
        // structural and the braces are not.
        assert_eq!(parse("{(})", false).stash[0].value, "\\{(?:\\})");
    }

    #[test]
    fn angles_nest_but_render_literally() {
        assert_eq!(parse("<a>", false).stash[0].value, "<a>");
        // An unmatched `<` degrades like the other families.
        assert_eq!(parse("<a", false).stash[0].value, "<a");
    }
}
