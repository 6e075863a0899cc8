//! Core view state: item sources, sorting, pagination, filtering and the
//! section/report view models built on top of them.

pub mod filter;
pub mod items;
pub mod pagination;
pub mod report_view;
pub mod section;
pub mod sort;
