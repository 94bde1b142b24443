//! Data transfer objects for the application layer.

mod paging_dto;

pub use paging_dto::{BatchOutcome, PageSummary, SkipReason};
