pub mod build;
pub mod names;
pub mod stats;
pub mod types;

pub use build::{BuildReport, NameSource, build_index, extend_index};
pub use names::SubstringIndex;
pub use types::*;
