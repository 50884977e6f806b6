use crate::index::SubstringIndex;
use crate::query::sort::SortOrder;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Presentation options applied after the index lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub sort: SortOrder,
    /// Maximum results (0 = unlimited)
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            sort: SortOrder::default(),
            limit: 0,
        }
    }
}

/// Result of one search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome<'a> {
    /// Matching names, ordered and truncated per [`SearchOptions`]
    pub names: Vec<&'a str>,
    /// Number of matches before the limit was applied
    pub total: usize,
    /// Names that had to be verified one by one
    pub scanned: usize,
    pub elapsed: Duration,
}

impl SearchOutcome<'_> {
    pub fn is_truncated(&self) -> bool {
        self.names.len() < self.total
    }
}

/// Runs find + sort + limit against an index
pub struct NameSearch<'a> {
    index: &'a SubstringIndex,
    buffer: Vec<&'a str>,
}

impl<'a> NameSearch<'a> {
    pub fn new(index: &'a SubstringIndex) -> Self {
        Self {
            index,
            buffer: Vec::new(),
        }
    }

    pub fn index(&self) -> &'a SubstringIndex {
        self.index
    }

    /// Execute a query and return matches
    pub fn execute(&mut self, query: &str, options: &SearchOptions) -> SearchOutcome<'a> {
        let start = Instant::now();

        self.index.find_into(query, &mut self.buffer);
        let total = self.buffer.len();
        options.sort.sort(&mut self.buffer, query);

        let keep = if options.limit == 0 {
            total
        } else {
            options.limit.min(total)
        };

        SearchOutcome {
            names: self.buffer[..keep].to_vec(),
            total,
            scanned: self.index.num_search_names(query),
            elapsed: start.elapsed(),
        }
    }

    /// Number of matches for `query`, without ordering them
    pub fn count(&mut self, query: &str) -> usize {
        self.index.find_into(query, &mut self.buffer);
        self.buffer.len()
    }
}
