//! # subdex - in-memory substring index
//!
//! subdex keeps a set of names (file paths, identifiers, any short strings)
//! and answers "which names contain this substring?" without scanning the
//! whole set.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`index`] - The [`SubstringIndex`](index::SubstringIndex) and loading names into it
//! - [`query`] - Search execution, result ordering and limits
//! - [`tui`] - Interactive picker (feature `interactive`)
//! - [`output`] - Terminal and JSON result formatting
//! - [`utils`] - Substring enumeration, configuration, progress spinners
//!
//! ## Quick Start
//!
//! ```
//! use subdex::index::SubstringIndex;
//!
//! let mut index = SubstringIndex::new(3, true);
//! index.insert("apple");
//! index.insert("maple");
//! index.insert("grape");
//!
//! let mut hits = index.find("ple");
//! hits.sort_unstable();
//! assert_eq!(hits, ["apple", "maple"]);
//!
//! assert!(index.remove("maple"));
//! assert_eq!(index.find("map"), Vec::<&str>::new());
//! ```
//!
//! ## How lookups work
//!
//! Every distinct substring of a name up to `max_anchor_len` chars is kept
//! as an anchor mapping to the names containing it:
//!
//! 1. **Short queries** (at most `max_anchor_len` chars) are answered by one
//!    map lookup with no verification
//! 2. **Long queries** pick the query window with the fewest candidates and
//!    confirm each candidate with a literal substring search

pub mod index;
pub mod output;
pub mod query;
#[cfg(feature = "interactive")]
pub mod tui;
pub mod utils;
