//! View pipeline over the record set
//!
//! The filter, the sorter and the page window are pure functions over row
//! indices into the immutable dataset. [`TableController`] owns the state
//! that ties them together and recomputes the view on every input change.

pub mod controller;
pub mod filter;
pub mod page_window;
pub mod sorter;

pub use controller::{TableController, ViewSettings};
pub use filter::{filter, filter_rows};
pub use page_window::{PageWindow, ScrollMetrics};
pub use sorter::{sort, sort_rows, ParseSortKeyError, SortDirection, SortKey, SortState};
