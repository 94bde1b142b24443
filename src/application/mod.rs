//! Application layer with services, use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Stateful application services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{BatchOutcome, PageSummary, SkipReason};
pub use services::{CatalogPager, PagerConfig, derive_color};
pub use use_cases::DeriveAccentUseCase;
