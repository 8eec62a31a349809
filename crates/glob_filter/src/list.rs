//! Matching over ordered candidate lists: single-pattern partitioning with
//! negation, and the multi-pattern include/omit orchestrator.

use itertools::{Either, Itertools};

use crate::matcher::{GlobError, GlobMatcher, MatchOptions};

impl GlobMatcher {
    /// Filters an ordered candidate list with a single pattern, using
    /// default options.
    ///
    /// A leading `!` negates: the result is then every candidate that did
    /// *not* match the stripped pattern. Output order preserves input order.
    pub fn match_list<'a>(
        &self,
        list: impl IntoIterator<Item = &'a str>,
        pattern: &str,
    ) -> Result<Vec<&'a str>, GlobError> {
        self.match_list_inner(list, pattern, None)
    }

    /// Filters an ordered candidate list with a single pattern and explicit
    /// options.
    pub fn match_list_with<'a>(
        &self,
        list: impl IntoIterator<Item = &'a str>,
        pattern: &str,
        options: &MatchOptions,
    ) -> Result<Vec<&'a str>, GlobError> {
        self.match_list_inner(list, pattern, Some(options))
    }

    fn match_list_inner<'a>(
        &self,
        list: impl IntoIterator<Item = &'a str>,
        pattern: &str,
        options: Option<&MatchOptions>,
    ) -> Result<Vec<&'a str>, GlobError> {
        let nonegate = options.is_some_and(|options| options.nonegate);
        let (pattern, negated) = match pattern.strip_prefix('!') {
            Some(stripped) if !nonegate => (stripped, true),
            _ => (pattern, false),
        };

        let matcher = self.matcher_inner(pattern, options, Some(negated))?;
        let (matched, unmatched): (Vec<&'a str>, Vec<&'a str>) =
            list.into_iter().partition_map(|candidate| {
                if matcher.is_match(candidate) {
                    Either::Left(candidate)
                } else {
                    Either::Right(candidate)
                }
            });

        Ok(if negated { unmatched } else { matched })
    }

    /// Filters an ordered candidate list with several patterns, using
    /// default options.
    ///
    /// Positive patterns contribute the union of their match sets, in
    /// pattern order and without deduplication. Negated patterns form omit
    /// sets: each omitted element removes the first equal occurrence from
    /// the kept set. When only negated patterns are given, the kept set
    /// starts as the whole candidate list.
    pub fn match_all<'a, 'p>(
        &self,
        list: impl IntoIterator<Item = &'a str>,
        patterns: impl IntoIterator<Item = &'p str>,
    ) -> Result<Vec<&'a str>, GlobError> {
        self.match_all_inner(list, patterns, None)
    }

    /// Filters an ordered candidate list with several patterns and explicit
    /// options.
    pub fn match_all_with<'a, 'p>(
        &self,
        list: impl IntoIterator<Item = &'a str>,
        patterns: impl IntoIterator<Item = &'p str>,
        options: &MatchOptions,
    ) -> Result<Vec<&'a str>, GlobError> {
        self.match_all_inner(list, patterns, Some(options))
    }

    fn match_all_inner<'a, 'p>(
        &self,
        list: impl IntoIterator<Item = &'a str>,
        patterns: impl IntoIterator<Item = &'p str>,
        options: Option<&MatchOptions>,
    ) -> Result<Vec<&'a str>, GlobError> {
        let list: Vec<&'a str> = list.into_iter().collect();
        let patterns: Vec<&'p str> = patterns.into_iter().collect();

        if list.is_empty() || patterns.is_empty() {
            return Ok(Vec::new());
        }
        if patterns.len() == 1 {
            return self.match_list_inner(list, patterns[0], options);
        }

        let nonegate = options.is_some_and(|options| options.nonegate);
        let mut keep: Vec<&'a str> = Vec::new();
        let mut omit: Vec<&'a str> = Vec::new();

        for pattern in patterns {
            match pattern.strip_prefix('!') {
                Some(stripped) if !nonegate => {
                    omit.extend(self.match_list_inner(list.iter().copied(), stripped, options)?);
                }
                _ => {
                    keep.extend(self.match_list_inner(list.iter().copied(), pattern, options)?);
                }
            }
        }

        if !omit.is_empty() {
            if keep.is_empty() {
                keep.clone_from(&list);
            }
            for element in omit {
                if let Some(pos) = keep.iter().position(|&kept| kept == element) {
                    keep.remove(pos);
                }
            }
        }

        Ok(keep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partitions_in_input_order() {
        let matchers = GlobMatcher::new();
        let list = ["b.rs", "a.txt", "a.rs", "c.txt"];
        assert_eq!(
            matchers.match_list(list, "*.rs").unwrap(),
            vec!["b.rs", "a.rs"]
        );
    }

    #[test]
    fn brace_alternation_selects_named_candidates() {
        let matchers = GlobMatcher::new();
        assert_eq!(
            matchers.match_list(["a", "b", "c"], "{a,b}").unwrap(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn negation_returns_the_complement() {
        let matchers = GlobMatcher::new();
        let list = ["a.rs", "a.txt", "b.rs"];
        let positive = matchers.match_list(list, "*.rs").unwrap();
        let negative = matchers.match_list(list, "!*.rs").unwrap();

        assert_eq!(negative, vec!["a.txt"]);
        // Negation law: the two partitions are an order-preserving split.
        let mut union: Vec<&str> = positive.clone();
        union.extend(&negative);
        union.sort_unstable();
        let mut expected = list.to_vec();
        expected.sort_unstable();
        assert_eq!(union, expected);
    }

    #[test]
    fn nonegate_treats_bang_as_literal() {
        let matchers = GlobMatcher::new();
        let options = MatchOptions {
            nonegate: true,
            ..MatchOptions::default()
        };
        assert_eq!(
            matchers
                .match_list_with(["!a", "a"], "!a", &options)
                .unwrap(),
            vec!["!a"]
        );
    }

    #[test]
    fn union_and_subtraction_across_patterns() {
        let matchers = GlobMatcher::new();
        assert_eq!(
            matchers.match_all(["a", "b", "c"], ["*", "!b"]).unwrap(),
            vec!["a", "c"]
        );
    }

    #[test]
    fn omit_without_keep_subtracts_from_the_whole_list() {
        let matchers = GlobMatcher::new();
        assert_eq!(
            matchers
                .match_all(["a.rs", "b.txt", "c.rs"], ["!*.rs", "!b*"])
                .unwrap(),
            Vec::<&str>::new()
        );
        assert_eq!(
            matchers
                .match_all(["a.rs", "b.txt", "c.rs"], ["!*.rs"])
                .unwrap(),
            vec!["b.txt"]
        );
    }

    #[test]
    fn union_keeps_duplicates() {
        // Two positive patterns both matching `a.rs` push it twice; the
        // union is deliberately not deduplicated.
        let matchers = GlobMatcher::new();
        assert_eq!(
            matchers
                .match_all(["a.rs", "b.txt"], ["*.rs", "a.*"])
                .unwrap(),
            vec!["a.rs", "a.rs"]
        );
    }

    #[test]
    fn omit_removes_one_occurrence_per_hit() {
        let matchers = GlobMatcher::new();
        // `a.rs` is kept twice; a single omit hit removes only the first
        // occurrence.
        assert_eq!(
            matchers
                .match_all(["a.rs", "b.txt"], ["*.rs", "a.*", "!a.rs"])
                .unwrap(),
            vec!["a.rs"]
        );
    }

    #[test]
    fn empty_inputs_short_circuit() {
        let matchers = GlobMatcher::new();
        assert_eq!(
            matchers.match_all([], ["*"]).unwrap(),
            Vec::<&str>::new()
        );
        assert_eq!(
            matchers.match_all(["a"], []).unwrap(),
            Vec::<&str>::new()
        );
    }

    #[test]
    fn single_pattern_short_circuits_to_match_list() {
        let matchers = GlobMatcher::new();
        assert_eq!(
            matchers.match_all(["a", "b"], ["!a"]).unwrap(),
            vec!["b"]
        );
    }
}
