use rustc_hash::FxHashSet;
use std::ops::Range;

/// Char boundaries of `text`, including the end offset.
///
/// `boundaries[i]..boundaries[j]` is the byte span of chars `i..j`.
#[inline]
pub fn char_boundaries(text: &str) -> Vec<usize> {
    let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    bounds.push(text.len());
    bounds
}

/// Visit every distinct substring of `text` whose length in chars lies in
/// `min_chars..=max_chars`.
///
/// Each distinct substring *value* is reported exactly once, as the byte span
/// of its first occurrence (ordered by start offset, then by length). A
/// substring that occurs at several offsets is not reported again.
pub fn for_each_unique_substring<F>(text: &str, min_chars: usize, max_chars: usize, mut f: F)
where
    F: FnMut(Range<usize>),
{
    let min_chars = min_chars.max(1);
    if text.is_empty() || min_chars > max_chars {
        return;
    }

    let bounds = char_boundaries(text);
    let char_count = bounds.len() - 1;
    let max_chars = max_chars.min(char_count);
    if min_chars > max_chars {
        return;
    }

    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for start in 0..char_count {
        let longest = max_chars.min(char_count - start);
        for len in min_chars..=longest {
            let span = bounds[start]..bounds[start + len];
            if seen.insert(&text[span.clone()]) {
                f(span);
            }
        }
    }
}

/// Collect the spans produced by [`for_each_unique_substring`].
pub fn unique_substrings(text: &str, min_chars: usize, max_chars: usize) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    for_each_unique_substring(text, min_chars, max_chars, |span| spans.push(span));
    spans
}

/// Number of distinct substrings of `text` with char length in `min_chars..=max_chars`.
pub fn count_unique_substrings(text: &str, min_chars: usize, max_chars: usize) -> usize {
    let mut count = 0;
    for_each_unique_substring(text, min_chars, max_chars, |_| count += 1);
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values<'a>(text: &'a str, min: usize, max: usize) -> Vec<&'a str> {
        unique_substrings(text, min, max)
            .into_iter()
            .map(|span| &text[span])
            .collect()
    }

    #[test]
    fn test_char_boundaries() {
        assert_eq!(char_boundaries(""), vec![0]);
        assert_eq!(char_boundaries("ab"), vec![0, 1, 2]);
        assert_eq!(char_boundaries("aé"), vec![0, 1, 3]);
    }

    #[test]
    fn test_unique_substrings_simple() {
        assert_eq!(values("abc", 1, 2), vec!["a", "ab", "b", "bc", "c"]);
    }

    #[test]
    fn test_unique_substrings_dedup() {
        // "a" occurs three times, "aa" twice
        assert_eq!(values("aaa", 1, 2), vec!["a", "aa"]);
        assert_eq!(values("abab", 2, 2), vec!["ab", "ba"]);
    }

    #[test]
    fn test_unique_substrings_clamps_to_text_length() {
        assert_eq!(values("ab", 1, 10), vec!["a", "ab", "b"]);
        assert!(values("ab", 3, 10).is_empty());
    }

    #[test]
    fn test_unique_substrings_empty_inputs() {
        assert!(values("", 1, 3).is_empty());
        assert!(values("abc", 2, 1).is_empty());
        // A zero minimum behaves like one, zero-length substrings are never reported
        assert_eq!(values("ab", 0, 1), vec!["a", "b"]);
    }

    #[test]
    fn test_unique_substrings_multibyte() {
        let text = "ñaña";
        let got = values(text, 1, 2);
        assert_eq!(got, vec!["ñ", "ña", "a", "añ"]);
        // Spans always land on char boundaries
        for span in unique_substrings(text, 1, 4) {
            assert!(text.is_char_boundary(span.start));
            assert!(text.is_char_boundary(span.end));
        }
    }

    #[test]
    fn test_count_matches_collect() {
        for text in ["", "a", "banana", "mississippi", "日本語日本"] {
            for max in 1..5 {
                assert_eq!(
                    count_unique_substrings(text, 1, max),
                    unique_substrings(text, 1, max).len()
                );
            }
        }
    }
}
