//! Pokegrid - paginated Pokémon catalog browsing.
//!
//! This crate loads the catalog in fixed-size pages behind a single-flight
//! pager, resolves sprites through a bounded in-memory LRU cache, and derives
//! an accent color for the selected entry. Rendering is left to the host.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the pager, services and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "pokegrid";

/// User agent sent with every HTTP request.
pub const USER_AGENT: &str = concat!("pokegrid/", env!("CARGO_PKG_VERSION"));
