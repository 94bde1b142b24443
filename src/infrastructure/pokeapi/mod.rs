//! PokeAPI catalog adapter.

mod client;
mod dto;

pub use client::{POKEAPI_BASE, PokeApiClient};
