//! Utility functions and data structures.
//!
//! ## Modules
//!
//! - [`app_data`] - Configuration file location and loading
//! - [`progress`] - Progress spinners (no-op without the `progress` feature)
//! - [`substrings`] - Distinct substring enumeration used to build anchors
//!
//! ## Key Functions
//!
//! ```
//! use subdex::utils::unique_substrings;
//!
//! let name = "abab";
//! let anchors: Vec<&str> = unique_substrings(name, 1, 2)
//!     .into_iter()
//!     .map(|span| &name[span])
//!     .collect();
//! assert_eq!(anchors, ["a", "ab", "b", "ba"]);
//! ```

pub mod app_data;
pub mod progress;
pub mod substrings;

pub use app_data::*;
pub use progress::*;
pub use substrings::*;
