pub mod executor;
pub mod sort;

pub use executor::{NameSearch, SearchOptions, SearchOutcome};
pub use sort::{SortOrder, cmp_ci, ux_ci_order, ux_order};
