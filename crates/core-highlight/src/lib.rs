//! Occurrence highlighting for a single line of text.
//!
//! A query is matched as a literal string (pattern metacharacters carry no
//! meaning), case-insensitively and globally. Each occurrence is wrapped in a
//! [`Marker`] while the matched characters keep the casing found in the line.
//! An empty query leaves the line untouched.
//!
//! Callers highlighting many lines with the same query should build a
//! [`Highlighter`] once; the free functions compile the query per call.
//!
//! Queries longer than [`LITERAL_SCAN_MIN_LEN`] bytes, and queries the regex
//! engine refuses to compile, are matched by a char-by-char scan instead of a
//! compiled pattern, so no query is ever too large to highlight.

use regex::{Captures, Regex, RegexBuilder};
use std::borrow::Cow;
use std::ops::Range;
use thiserror::Error;
use tracing::{trace, warn};

pub mod marker;
pub use marker::{DEFAULT_MARK_CLASS, Marker};

/// Compiled program limit used when no explicit limit is requested. Mirrors the
/// regex crate default.
const DEFAULT_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Queries of at least this many bytes skip pattern compilation.
pub const LITERAL_SCAN_MIN_LEN: usize = 1024;

#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("query of {len} bytes could not be compiled: {source}")]
    Pattern {
        len: usize,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone)]
enum Matcher {
    Pattern(Regex),
    /// Query chars, compared one by one after lowercasing.
    Literal(Vec<char>),
}

/// A query compiled for repeated highlighting.
#[derive(Debug, Clone)]
pub struct Highlighter {
    matcher: Matcher,
    marker: Marker,
}

impl Highlighter {
    /// Compile `query` into a pattern. Returns `Ok(None)` for an empty query
    /// since there is nothing to highlight.
    pub fn new(query: &str, marker: Marker) -> Result<Option<Self>, HighlightError> {
        Self::with_size_limit(query, marker, DEFAULT_SIZE_LIMIT)
    }

    /// Like [`Highlighter::new`] with an explicit bound on the compiled
    /// pattern size.
    pub fn with_size_limit(
        query: &str,
        marker: Marker,
        size_limit: usize,
    ) -> Result<Option<Self>, HighlightError> {
        if query.is_empty() {
            return Ok(None);
        }
        let pattern = RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .size_limit(size_limit)
            .build()
            .map_err(|source| HighlightError::Pattern {
                len: query.len(),
                source,
            })?;
        trace!(target: "highlight", query_len = query.len(), "highlighter_compiled");
        Ok(Some(Self {
            matcher: Matcher::Pattern(pattern),
            marker,
        }))
    }

    /// Highlighter that scans for `query` without compiling a pattern. `None`
    /// for an empty query.
    pub fn literal(query: &str, marker: Marker) -> Option<Self> {
        if query.is_empty() {
            return None;
        }
        Some(Self {
            matcher: Matcher::Literal(query.chars().collect()),
            marker,
        })
    }

    /// Infallible constructor used by the free functions: long queries and
    /// queries rejected by the regex engine fall back to a literal scan.
    pub fn for_query(query: &str, marker: Marker) -> Option<Self> {
        Self::for_query_with_limit(query, marker, DEFAULT_SIZE_LIMIT)
    }

    fn for_query_with_limit(query: &str, marker: Marker, size_limit: usize) -> Option<Self> {
        if query.len() >= LITERAL_SCAN_MIN_LEN {
            trace!(target: "highlight", query_len = query.len(), "highlighter_literal_scan");
            return Self::literal(query, marker);
        }
        match Self::with_size_limit(query, marker.clone(), size_limit) {
            Ok(h) => h,
            Err(err) => {
                warn!(target: "highlight", %err, "highlight_pattern_fallback_to_scan");
                Self::literal(query, marker)
            }
        }
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    /// Byte ranges of every non-overlapping occurrence, left to right.
    pub fn ranges(&self, line: &str) -> Vec<Range<usize>> {
        match &self.matcher {
            Matcher::Pattern(pattern) => pattern.find_iter(line).map(|m| m.range()).collect(),
            Matcher::Literal(query) => scan_ranges(line, query),
        }
    }

    /// Wrap every occurrence in the marker. Borrows `line` when nothing matched.
    pub fn apply<'a>(&self, line: &'a str) -> Cow<'a, str> {
        match &self.matcher {
            Matcher::Pattern(pattern) => pattern.replace_all(line, |caps: &Captures<'_>| {
                let mut wrapped = String::new();
                self.marker.wrap_into(&mut wrapped, &caps[0]);
                wrapped
            }),
            Matcher::Literal(query) => {
                let ranges = scan_ranges(line, query);
                if ranges.is_empty() {
                    return Cow::Borrowed(line);
                }
                let mut out = String::with_capacity(line.len());
                let mut last = 0;
                for r in ranges {
                    out.push_str(&line[last..r.start]);
                    self.marker.wrap_into(&mut out, &line[r.clone()]);
                    last = r.end;
                }
                out.push_str(&line[last..]);
                Cow::Owned(out)
            }
        }
    }
}

// Lowercase alone misses pairs such as `ſ`/`s` that only meet in uppercase.
fn chars_match(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase()) || a.to_uppercase().eq(b.to_uppercase())
}

/// Byte length of the occurrence of `query` at the start of `rest`, if any.
fn match_len(rest: &str, query: &[char]) -> Option<usize> {
    let mut chars = rest.char_indices();
    for &q in query {
        let (_, c) = chars.next()?;
        if !chars_match(c, q) {
            return None;
        }
    }
    Some(chars.next().map_or(rest.len(), |(end, _)| end))
}

fn scan_ranges(line: &str, query: &[char]) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    while let Some(c) = line[start..].chars().next() {
        match match_len(&line[start..], query) {
            Some(len) => {
                ranges.push(start..start + len);
                start += len;
            }
            None => start += c.len_utf8(),
        }
    }
    ranges
}

/// Highlight every case-insensitive occurrence of `query` in `line` with the
/// default marker.
///
/// Case-insensitivity is Unicode aware: besides ASCII letters, `é` matches
/// `É`, the long s `ſ` matches `s` and the Kelvin sign matches `k`. A plain
/// ASCII-only comparison would match none of these.
pub fn highlight(line: &str, query: &str) -> String {
    highlight_with(line, query, &Marker::default())
}

/// [`highlight`] with a caller supplied marker. Never fails.
pub fn highlight_with(line: &str, query: &str, marker: &Marker) -> String {
    match Highlighter::for_query(query, marker.clone()) {
        Some(h) => h.apply(line).into_owned(),
        None => line.to_owned(),
    }
}

/// Byte ranges of all occurrences of `query` in `line`. Empty for an empty
/// query.
pub fn occurrences(line: &str, query: &str) -> Vec<Range<usize>> {
    Highlighter::for_query(query, Marker::default())
        .map(|h| h.ranges(line))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN: &str = r#"<mark class="bg-yellow-200 text-black">"#;

    #[test]
    fn empty_query_returns_line() {
        assert_eq!(highlight("Hello world", ""), "Hello world");
        assert_eq!(highlight("", ""), "");
    }

    #[test]
    fn wraps_every_occurrence() {
        assert_eq!(
            highlight("Hello world", "o"),
            format!("Hell{OPEN}o</mark> w{OPEN}o</mark>rld")
        );
    }

    #[test]
    fn substring_must_be_contiguous() {
        // "lo" occurs once: "Hel|lo| world"
        assert_eq!(
            highlight("Hello world", "lo"),
            format!("Hel{OPEN}lo</mark> world")
        );
    }

    #[test]
    fn keeps_line_casing() {
        assert_eq!(
            highlight("FOO bar", "foo"),
            format!("{OPEN}FOO</mark> bar")
        );
        assert_eq!(highlight("foo", "FOO"), format!("{OPEN}foo</mark>"));
    }

    #[test]
    fn no_match_borrows() {
        let h = Highlighter::new("zzz", Marker::default()).unwrap().unwrap();
        assert!(matches!(h.apply("abc"), Cow::Borrowed("abc")));
        let scan = Highlighter::literal("zzz", Marker::default()).unwrap();
        assert!(matches!(scan.apply("abc"), Cow::Borrowed("abc")));
    }

    #[test]
    fn empty_query_has_no_highlighter() {
        assert!(Highlighter::new("", Marker::default()).unwrap().is_none());
        assert!(Highlighter::literal("", Marker::default()).is_none());
        assert!(Highlighter::for_query("", Marker::default()).is_none());
        assert!(occurrences("abc", "").is_empty());
    }

    #[test]
    fn occurrences_are_non_overlapping() {
        assert_eq!(occurrences("aaaa", "aa"), vec![0..2, 2..4]);
        assert_eq!(occurrences("xAbyab", "AB"), vec![1..3, 4..6]);
    }

    #[test]
    fn metacharacters_match_literally() {
        assert_eq!(
            highlight("a.b axb", "a.b"),
            format!("{OPEN}a.b</mark> axb")
        );
        assert_eq!(
            highlight("call f(x) now", "f(x)"),
            format!("call {OPEN}f(x)</mark> now")
        );
        assert_eq!(highlight("a+b aab", "a+"), format!("{OPEN}a+</mark>b aab"));
    }

    #[test]
    fn dollar_in_marker_is_not_expanded() {
        let marker = Marker::new("$1[", "]$0");
        assert_eq!(highlight_with("xax", "a", &marker), "x$1[a]$0x");
    }

    #[test]
    fn non_ascii_case_folding() {
        assert_eq!(occurrences("ÉCOLE école", "école"), vec![0..6, 7..13]);
    }

    #[test]
    fn oversized_query_is_rejected() {
        let query = "abcdefghij".repeat(20);
        let err = Highlighter::with_size_limit(&query, Marker::default(), 16).unwrap_err();
        assert!(matches!(err, HighlightError::Pattern { len: 200, .. }));
    }

    #[test]
    fn rejected_pattern_falls_back_to_scan() {
        let query = "abcdefghij".repeat(20);
        let line = format!("x{}y", query.to_uppercase());
        let h = Highlighter::for_query_with_limit(&query, Marker::new("[", "]"), 16).unwrap();
        assert_eq!(h.ranges(&line), vec![1..201]);
        assert_eq!(
            h.apply(&line),
            format!("x[{}]y", query.to_uppercase())
        );
    }

    #[test]
    fn long_query_inside_line_is_wrapped() {
        let query = "ab".repeat(100_000);
        let line = format!("x{query}y");
        assert_eq!(occurrences(&line, &query), vec![1..200_001]);
        let marked = highlight_with(&line, &query, &Marker::new("[", "]"));
        assert_eq!(marked, format!("x[{query}]y"));
    }

    #[test]
    fn scan_agrees_with_pattern_on_short_queries() {
        let line = "ÉCOLE école f(x) a.b A.B aaaa";
        for query in ["école", "f(x)", "a.b", "aa", "zz", "É"] {
            let pattern = Highlighter::new(query, Marker::default()).unwrap().unwrap();
            let scan = Highlighter::literal(query, Marker::default()).unwrap();
            assert_eq!(pattern.ranges(line), scan.ranges(line), "{query}");
        }
    }

    #[test]
    fn unicode_case_pairs_match_on_both_paths() {
        let line = "s K";
        for query in ["\u{17F}", "\u{212A}"] {
            let pattern = Highlighter::new(query, Marker::default()).unwrap().unwrap();
            let scan = Highlighter::literal(query, Marker::default()).unwrap();
            assert_eq!(pattern.ranges(line).len(), 1, "{query}");
            assert_eq!(pattern.ranges(line), scan.ranges(line), "{query}");
        }
    }

    #[test]
    fn scan_walks_char_boundaries() {
        let scan = Highlighter::literal("é", Marker::new("[", "]")).unwrap();
        assert_eq!(scan.apply("ÉtéX"), "[É]t[é]X");
    }
}
