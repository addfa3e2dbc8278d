//! Type-safe wrapper around the state actor's channel.

pub mod cafe_client;

pub use cafe_client::*;
