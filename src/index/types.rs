use serde::{Deserialize, Serialize};

/// Default maximum anchor length in chars
pub const DEFAULT_MAX_ANCHOR_LEN: usize = 3;

/// Configuration for a [`SubstringIndex`](crate::index::SubstringIndex).
///
/// Both values are fixed for the lifetime of the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Longest substring (in chars) that gets its own candidate list.
    /// Larger values use more memory but make long queries cheaper.
    pub max_anchor_len: usize,
    /// Keep per-name position bookkeeping so names can be removed later.
    pub support_remove: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_anchor_len: DEFAULT_MAX_ANCHOR_LEN,
            support_remove: true,
        }
    }
}

impl IndexConfig {
    pub fn new(max_anchor_len: usize, support_remove: bool) -> Self {
        Self {
            max_anchor_len,
            support_remove,
        }
    }
}

/// Initial capacity for a freshly created candidate list.
///
/// Short anchors are shared by far more names, so they start larger.
#[inline]
pub fn anchor_capacity(anchor_chars: usize) -> usize {
    match anchor_chars {
        1 => 15,
        2 => 7,
        _ => 1,
    }
}

/// Snapshot of index size and shape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub max_anchor_len: usize,
    pub support_remove: bool,
    /// Number of stored names
    pub names: usize,
    /// Total bytes across all stored names
    pub name_bytes: usize,
    /// Number of distinct anchors with a candidate list
    pub anchors: usize,
    /// Sum of all candidate list lengths
    pub postings: usize,
    /// Anchor count per anchor length; entry `i` is for length `i + 1`
    pub anchors_by_len: Vec<usize>,
    /// Anchor with the longest candidate list, and that list's length
    pub largest_list: Option<(String, usize)>,
}

impl IndexStats {
    /// Average candidate list length
    pub fn mean_list_len(&self) -> f64 {
        if self.anchors == 0 {
            0.0
        } else {
            self.postings as f64 / self.anchors as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_config_default() {
        let config = IndexConfig::default();
        assert_eq!(config.max_anchor_len, 3);
        assert!(config.support_remove);
    }

    #[test]
    fn test_index_config_serialization() {
        let config = IndexConfig::new(2, false);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: IndexConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_anchor_capacity() {
        assert_eq!(anchor_capacity(1), 15);
        assert_eq!(anchor_capacity(2), 7);
        assert_eq!(anchor_capacity(3), 1);
        assert_eq!(anchor_capacity(10), 1);
    }

    #[test]
    fn test_mean_list_len() {
        let mut stats = IndexStats::default();
        assert_eq!(stats.mean_list_len(), 0.0);
        stats.anchors = 4;
        stats.postings = 10;
        assert_eq!(stats.mean_list_len(), 2.5);
    }
}
