//! Use case implementations.

mod derive_accent_use_case;

pub use derive_accent_use_case::DeriveAccentUseCase;
