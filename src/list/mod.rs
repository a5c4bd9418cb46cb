//! List screen building blocks: state controller, pager and search debouncing.

pub mod controller;
pub mod debounce;
pub mod pager;

pub use controller::{FetchTicket, ListController, ListViewState};
pub use pager::{compute_page_sequence, PageItem, PageNav};
