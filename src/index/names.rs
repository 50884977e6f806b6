//! In-memory substring index over a set of names.
//!
//! Every distinct substring of a name up to `max_anchor_len` chars is an
//! *anchor* with its own candidate list. Queries no longer than that are a
//! single map lookup. Longer queries slide a window of `max_anchor_len` chars
//! across the query, pick the window with the shortest candidate list, and
//! verify each candidate with a literal substring search.

use crate::index::types::{IndexConfig, IndexStats, anchor_capacity};
use crate::utils::{char_boundaries, unique_substrings};
use anyhow::{Result, bail, ensure};
use memchr::memmem;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Anchor -> slot of the owning name inside that anchor's candidate list
type Positions = FxHashMap<Box<str>, usize>;

/// A set of strings supporting fast substring search.
pub struct SubstringIndex {
    config: IndexConfig,
    /// Stored names. The value is `None` when removal is not supported.
    members: FxHashMap<Arc<str>, Option<Positions>>,
    /// Anchor -> every member containing it, each at most once
    anchors: FxHashMap<Box<str>, Vec<Arc<str>>>,
}

impl SubstringIndex {
    /// Create an empty index.
    ///
    /// # Panics
    /// If `max_anchor_len` is zero.
    pub fn new(max_anchor_len: usize, support_remove: bool) -> Self {
        Self::with_config(IndexConfig::new(max_anchor_len, support_remove))
    }

    /// Create an empty index from a config.
    ///
    /// # Panics
    /// If `config.max_anchor_len` is zero.
    pub fn with_config(config: IndexConfig) -> Self {
        assert!(
            config.max_anchor_len >= 1,
            "max_anchor_len must be greater than zero"
        );
        Self {
            config,
            members: FxHashMap::default(),
            anchors: FxHashMap::default(),
        }
    }

    pub fn config(&self) -> IndexConfig {
        self.config
    }

    pub fn max_anchor_len(&self) -> usize {
        self.config.max_anchor_len
    }

    /// Whether [`remove`](Self::remove) may be called on this index
    pub fn supports_remove(&self) -> bool {
        self.config.support_remove
    }

    /// Number of stored names
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of distinct anchors currently indexed
    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// O(1) membership test
    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Iterate over stored names in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.members.keys().map(|name| &**name)
    }

    /// Raw candidate list for an anchor (empty if the anchor is unknown)
    pub fn candidates(&self, anchor: &str) -> &[Arc<str>] {
        self.anchors.get(anchor).map_or(&[][..], Vec::as_slice)
    }

    /// Add `name`. Returns false and does nothing if it is already stored.
    ///
    /// Amortized O(len(name) * max_anchor_len).
    pub fn insert(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }

        let name: Arc<str> = Arc::from(name);
        let spans = unique_substrings(&name, 1, self.config.max_anchor_len);
        let mut positions: Option<Positions> = self
            .config
            .support_remove
            .then(|| FxHashMap::with_capacity_and_hasher(spans.len(), Default::default()));

        for span in spans {
            let anchor = &name[span];
            let slot = match self.anchors.get_mut(anchor) {
                Some(list) => {
                    list.push(Arc::clone(&name));
                    list.len() - 1
                }
                None => {
                    let mut list = Vec::with_capacity(anchor_capacity(anchor.chars().count()));
                    list.push(Arc::clone(&name));
                    self.anchors.insert(anchor.into(), list);
                    0
                }
            };
            if let Some(positions) = positions.as_mut() {
                positions.insert(anchor.into(), slot);
            }
        }

        self.members.insert(name, positions);
        true
    }

    /// Remove `name`. Returns false and does nothing if it is not stored.
    ///
    /// O(len(name) * max_anchor_len): each candidate list is patched with a
    /// swap-remove and the moved name's recorded slot is updated.
    ///
    /// # Panics
    /// If the index was created without removal support.
    pub fn remove(&mut self, name: &str) -> bool {
        assert!(
            self.config.support_remove,
            "support_remove must be enabled when the index is created to call remove()"
        );

        let Some(positions) = self.members.remove(name) else {
            return false;
        };

        for (anchor, slot) in positions.into_iter().flatten() {
            let Some(list) = self.anchors.get_mut(&*anchor) else {
                continue;
            };

            let removed = list.swap_remove(slot);
            debug_assert_eq!(&*removed, name);

            if let Some(moved) = list.get(slot) {
                // The former tail now lives at `slot`
                if let Some(Some(moved_positions)) = self.members.get_mut(&**moved) {
                    if let Some(moved_slot) = moved_positions.get_mut(&*anchor) {
                        *moved_slot = slot;
                    }
                }
            } else if list.is_empty() {
                self.anchors.remove(&*anchor);
            }
        }

        true
    }

    /// All stored names containing `query`.
    ///
    /// An empty query returns every stored name. Order is unspecified.
    pub fn find(&self, query: &str) -> Vec<&str> {
        let mut out = Vec::new();
        self.find_into(query, &mut out);
        out
    }

    /// Like [`find`](Self::find), but writes into `out`, reusing its allocation.
    /// `out` is cleared first.
    pub fn find_into<'a>(&'a self, query: &str, out: &mut Vec<&'a str>) {
        out.clear();

        if query.is_empty() {
            out.extend(self.iter());
            return;
        }

        let bounds = char_boundaries(query);
        if bounds.len() - 1 <= self.config.max_anchor_len {
            // Exact anchor hit, every listed name contains the query
            out.extend(self.candidates(query).iter().map(|name| &**name));
            return;
        }

        let Some(candidates) = self.scan_set(query, &bounds) else {
            return;
        };

        let finder = memmem::Finder::new(query);
        out.extend(
            candidates
                .iter()
                .filter(|name| finder.find(name.as_bytes()).is_some())
                .map(|name| &**name),
        );
    }

    /// Number of names [`find`](Self::find) would verify one by one for `query`.
    ///
    /// Zero for queries of at most `max_anchor_len` chars, which need no scan.
    pub fn num_search_names(&self, query: &str) -> usize {
        let bounds = char_boundaries(query);
        if bounds.len() - 1 <= self.config.max_anchor_len {
            return 0;
        }
        self.scan_set(query, &bounds).map_or(0, <[_]>::len)
    }

    /// Pick the shortest candidate list among all `max_anchor_len`-char
    /// windows of `query`. Ties go to the later window.
    ///
    /// `bounds` are the char boundaries of `query`, which must be longer
    /// than `max_anchor_len` chars.
    fn scan_set(&self, query: &str, bounds: &[usize]) -> Option<&[Arc<str>]> {
        let width = self.config.max_anchor_len;
        let window_count = bounds.len() - width;

        let mut best: Option<&[Arc<str>]> = None;
        let mut best_len = usize::MAX;
        for start in 0..window_count {
            let window = &query[bounds[start]..bounds[start + width]];
            let candidates = self.anchors.get(window).map(Vec::as_slice);
            let len = candidates.map_or(0, <[_]>::len);
            if len <= best_len {
                best = candidates;
                best_len = len;
            }
            if len == 0 {
                // No name contains this window, so none contains the query
                break;
            }
        }

        trace!(query, scan = best_len, "selected scan set");
        best
    }

    /// Size and shape of the index
    pub fn stats(&self) -> IndexStats {
        let mut anchors_by_len = vec![0usize; self.config.max_anchor_len];
        let mut postings = 0;
        let mut largest: Option<(&str, usize)> = None;

        for (anchor, list) in &self.anchors {
            let chars = anchor.chars().count();
            if let Some(count) = anchors_by_len.get_mut(chars.saturating_sub(1)) {
                *count += 1;
            }
            postings += list.len();
            if largest.is_none_or(|(_, len)| list.len() > len) {
                largest = Some((&**anchor, list.len()));
            }
        }

        IndexStats {
            max_anchor_len: self.config.max_anchor_len,
            support_remove: self.config.support_remove,
            names: self.members.len(),
            name_bytes: self.members.keys().map(|name| name.len()).sum(),
            anchors: self.anchors.len(),
            postings,
            anchors_by_len,
            largest_list: largest.map(|(anchor, len)| (anchor.to_string(), len)),
        }
    }

    /// Walk the whole structure and check that the anchor lists and the
    /// recorded slots agree with the stored names.
    ///
    /// Cost is proportional to the total size of the index.
    pub fn verify_integrity(&self) -> Result<()> {
        let max = self.config.max_anchor_len;
        let mut postings = 0;

        for (anchor, list) in &self.anchors {
            ensure!(!list.is_empty(), "anchor {anchor:?} has an empty candidate list");
            let chars = anchor.chars().count();
            ensure!(
                (1..=max).contains(&chars),
                "anchor {anchor:?} has {chars} chars, outside 1..={max}"
            );

            let mut seen = FxHashSet::default();
            for (slot, name) in list.iter().enumerate() {
                ensure!(
                    seen.insert(&**name),
                    "name {name:?} listed twice under anchor {anchor:?}"
                );
                ensure!(
                    name.contains(&**anchor),
                    "name {name:?} does not contain anchor {anchor:?}"
                );
                match self.members.get(&**name) {
                    None => bail!("anchor {anchor:?} lists unknown name {name:?}"),
                    Some(Some(positions)) => {
                        let recorded = positions.get(&**anchor).copied();
                        ensure!(
                            recorded == Some(slot),
                            "name {name:?} records slot {recorded:?} for anchor {anchor:?}, actual {slot}"
                        );
                    }
                    Some(None) => {}
                }
            }
            postings += list.len();
        }

        let mut expected = 0;
        for (name, positions) in &self.members {
            let spans = unique_substrings(name, 1, max);
            if let Some(positions) = positions {
                ensure!(
                    positions.len() == spans.len(),
                    "name {name:?} records {} anchors, expected {}",
                    positions.len(),
                    spans.len()
                );
            } else {
                ensure!(
                    !self.config.support_remove,
                    "name {name:?} has no slot bookkeeping"
                );
            }
            for span in spans {
                let anchor = &name[span];
                ensure!(
                    self.candidates(anchor).iter().any(|n| n == name),
                    "name {name:?} missing from anchor {anchor:?}"
                );
                expected += 1;
            }
        }
        ensure!(
            postings == expected,
            "anchor lists hold {postings} entries, expected {expected}"
        );

        Ok(())
    }
}

impl Default for SubstringIndex {
    fn default() -> Self {
        Self::with_config(IndexConfig::default())
    }
}

impl fmt::Debug for SubstringIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubstringIndex")
            .field("config", &self.config)
            .field("names", &self.members.len())
            .field("anchors", &self.anchors.len())
            .finish()
    }
}

impl<S: AsRef<str>> Extend<S> for SubstringIndex {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for name in iter {
            self.insert(name.as_ref());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for SubstringIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut index = Self::default();
        index.extend(iter);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut names: Vec<&str>) -> Vec<&str> {
        names.sort_unstable();
        names
    }

    fn fruit_index() -> SubstringIndex {
        let mut index = SubstringIndex::new(2, true);
        for name in ["apple", "maple", "grape"] {
            assert!(index.insert(name));
        }
        index
    }

    #[test]
    #[should_panic(expected = "max_anchor_len must be greater than zero")]
    fn test_zero_anchor_len_panics() {
        SubstringIndex::new(0, true);
    }

    #[test]
    fn test_accessors() {
        let index = SubstringIndex::new(4, false);
        assert_eq!(index.max_anchor_len(), 4);
        assert!(!index.supports_remove());
        assert_eq!(index.config(), IndexConfig::new(4, false));
        assert!(index.is_empty());
    }

    #[test]
    fn test_insert_contains_remove() {
        let mut index = SubstringIndex::new(3, true);
        assert!(!index.contains("hello"));
        assert!(index.insert("hello"));
        assert!(index.contains("hello"));
        assert_eq!(index.len(), 1);
        assert!(index.remove("hello"));
        assert!(!index.contains("hello"));
        assert!(index.is_empty());
        assert_eq!(index.anchor_count(), 0);
    }

    #[test]
    fn test_insert_twice_is_noop() {
        let mut index = SubstringIndex::new(2, true);
        assert!(index.insert("banana"));
        assert!(!index.insert("banana"));
        assert_eq!(index.len(), 1);
        // "an" occurs twice in banana but is listed once
        assert_eq!(index.candidates("an").len(), 1);
        index.verify_integrity().unwrap();
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut index = fruit_index();
        let before = index.stats();
        assert!(!index.remove("pear"));
        assert_eq!(index.stats(), before);
    }

    #[test]
    #[should_panic(expected = "support_remove")]
    fn test_remove_without_support_panics() {
        let mut index = SubstringIndex::new(2, false);
        index.insert("apple");
        index.remove("apple");
    }

    #[test]
    fn test_find_short_query() {
        let index = fruit_index();
        assert_eq!(sorted(index.find("ap")), vec!["apple", "grape", "maple"]);
        assert_eq!(sorted(index.find("m")), vec!["maple"]);
        assert!(index.find("zz").is_empty());
    }

    #[test]
    fn test_find_long_query_verifies() {
        let index = fruit_index();
        assert_eq!(sorted(index.find("ple")), vec!["apple", "maple"]);
        assert_eq!(index.find("grape"), vec!["grape"]);
        assert!(index.find("apex").is_empty());
        assert!(index.find("applesauce").is_empty());
    }

    #[test]
    fn test_find_empty_query_returns_everything() {
        let index = fruit_index();
        assert_eq!(sorted(index.find("")), vec!["apple", "grape", "maple"]);
    }

    #[test]
    fn test_find_after_remove() {
        let mut index = fruit_index();
        assert!(index.remove("maple"));
        assert_eq!(sorted(index.find("ap")), vec!["apple", "grape"]);
        assert_eq!(index.find("ple"), vec!["apple"]);
        assert_eq!(index.len(), 2);
        index.verify_integrity().unwrap();
    }

    #[test]
    fn test_find_into_reuses_buffer() {
        let index = fruit_index();
        let mut buf = Vec::with_capacity(32);
        index.find_into("ap", &mut buf);
        assert_eq!(buf.len(), 3);
        let cap = buf.capacity();

        index.find_into("grape", &mut buf);
        assert_eq!(buf, vec!["grape"]);
        assert_eq!(buf.capacity(), cap);

        index.find_into("nothing here", &mut buf);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_num_search_names() {
        let index = fruit_index();
        // Short queries hit the index directly
        assert_eq!(index.num_search_names(""), 0);
        assert_eq!(index.num_search_names("ap"), 0);
        // "pl" -> {apple, maple}, "le" -> {apple, maple}; tie goes to "le"
        assert_eq!(index.num_search_names("ple"), 2);
        // "gr" only appears in grape
        assert_eq!(index.num_search_names("grape"), 1);
        // Unknown window short-circuits to an empty scan
        assert_eq!(index.num_search_names("xyzzy"), 0);
    }

    #[test]
    fn test_later_window_wins_ties() {
        let mut index = SubstringIndex::new(1, true);
        index.extend(["ab", "ba"]);
        // Windows "a" and "b" both list two names; the later one is scanned
        let scan = index.scan_set("ab", &char_boundaries("ab")).unwrap();
        assert!(std::ptr::eq(scan, index.candidates("b")));
    }

    #[test]
    fn test_multibyte_names() {
        let mut index = SubstringIndex::new(2, true);
        index.extend(["日本語", "本日", "にほん"]);
        assert_eq!(sorted(index.find("本")), vec!["日本語", "本日"]);
        assert_eq!(index.find("日本語"), vec!["日本語"]);
        // Three chars but nine bytes: still the long-query path
        assert_eq!(index.num_search_names("日本語"), 1);
        index.verify_integrity().unwrap();
    }

    #[test]
    fn test_empty_name() {
        let mut index = SubstringIndex::new(2, true);
        assert!(index.insert(""));
        assert!(index.contains(""));
        assert_eq!(index.anchor_count(), 0);
        assert_eq!(index.find(""), vec![""]);
        assert!(index.remove(""));
        assert!(index.is_empty());
    }

    #[test]
    fn test_remove_keeps_slots_consistent() {
        let mut index = SubstringIndex::new(3, true);
        let names = ["alpha", "alps", "palace", "lap", "pal", "salsa"];
        index.extend(names);
        index.verify_integrity().unwrap();

        for name in ["alps", "alpha", "salsa"] {
            assert!(index.remove(name));
            index.verify_integrity().unwrap();
        }
        assert_eq!(sorted(index.find("al")), vec!["pal", "palace"]);

        for name in ["lap", "pal", "palace"] {
            assert!(index.remove(name));
        }
        assert!(index.is_empty());
        assert_eq!(index.anchor_count(), 0);
    }

    #[test]
    fn test_reinsert_after_remove() {
        let mut index = fruit_index();
        assert!(index.remove("apple"));
        assert!(index.insert("apple"));
        assert_eq!(sorted(index.find("ppl")), vec!["apple"]);
        index.verify_integrity().unwrap();
    }

    #[test]
    fn test_no_remove_support_skips_bookkeeping() {
        let mut index = SubstringIndex::new(2, false);
        index.extend(["apple", "maple", "grape"]);
        assert_eq!(sorted(index.find("ple")), vec!["apple", "maple"]);
        index.verify_integrity().unwrap();
    }

    #[test]
    fn test_stats() {
        let mut index = SubstringIndex::new(2, true);
        index.extend(["ab", "abc"]);
        let stats = index.stats();
        assert_eq!(stats.names, 2);
        assert_eq!(stats.name_bytes, 5);
        // a, b, c, ab, bc
        assert_eq!(stats.anchors, 5);
        assert_eq!(stats.anchors_by_len, vec![3, 2]);
        // ab: a, b, ab; abc: a, b, c, ab, bc
        assert_eq!(stats.postings, 8);
        assert_eq!(stats.largest_list.map(|(_, len)| len), Some(2));
    }

    #[test]
    fn test_from_iterator() {
        let index: SubstringIndex = ["one", "two", "three", "two"].into_iter().collect();
        assert_eq!(index.len(), 3);
        assert_eq!(index.config(), IndexConfig::default());
        assert_eq!(sorted(index.find("t")), vec!["three", "two"]);
    }

    #[test]
    fn test_debug_is_compact() {
        let index = fruit_index();
        let debug = format!("{:?}", index);
        assert!(debug.contains("names: 3"));
        assert!(!debug.contains("apple"));
    }
}
