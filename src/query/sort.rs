//! Result ordering for presenting names to a user.
//!
//! All comparators are pure functions over the two names (and the query for
//! the "prefix first" variants). They carry no state from the index.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Case-insensitive order. Names equal after lowercasing fall back to the
/// case-sensitive order, so the result is total.
pub fn cmp_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Names starting with `query` first, each group in plain lexicographic order.
pub fn ux_order(query: &str) -> impl Fn(&str, &str) -> Ordering + use<> {
    let query = query.to_string();
    move |a, b| {
        let a_first = a.starts_with(query.as_str());
        let b_first = b.starts_with(query.as_str());
        b_first.cmp(&a_first).then_with(|| a.cmp(b))
    }
}

/// Names starting case-insensitively with `query` first, each group ordered
/// by [`cmp_ci`].
pub fn ux_ci_order(query: &str) -> impl Fn(&str, &str) -> Ordering + use<> {
    let query = query.to_lowercase();
    move |a, b| {
        let low_a = a.to_lowercase();
        let low_b = b.to_lowercase();
        let a_first = low_a.starts_with(query.as_str());
        let b_first = low_b.starts_with(query.as_str());
        b_first
            .cmp(&a_first)
            .then_with(|| low_a.cmp(&low_b))
            .then_with(|| a.cmp(b))
    }
}

/// How to order search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Leave results in index order
    Unsorted,
    /// Byte-wise lexicographic
    Lexical,
    /// Case-insensitive lexicographic
    #[value(alias = "ci")]
    CaseInsensitive,
    /// Names starting with the query first, then lexicographic
    Ux,
    /// Names starting case-insensitively with the query first, then case-insensitive
    #[default]
    #[value(alias = "ux-ci")]
    UxCaseInsensitive,
}

impl SortOrder {
    /// Sort `names` in place for `query`
    pub fn sort(self, names: &mut [&str], query: &str) {
        match self {
            SortOrder::Unsorted => {}
            SortOrder::Lexical => names.sort_unstable(),
            SortOrder::CaseInsensitive => {
                names.sort_by_cached_key(|name| (name.to_lowercase(), *name));
            }
            SortOrder::Ux => {
                let cmp = ux_order(query);
                names.sort_by(|a, b| cmp(a, b));
            }
            SortOrder::UxCaseInsensitive => {
                let query = query.to_lowercase();
                names.sort_by_cached_key(|name| {
                    let low = name.to_lowercase();
                    (!low.starts_with(query.as_str()), low, *name)
                });
            }
        }
    }
}
