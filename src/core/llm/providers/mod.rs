//! Gateway Implementations
//!
//! Concrete implementations of the `StructuredGateway` trait.

mod google;

pub use google::{GoogleGateway, DEFAULT_BASE_URL, DEFAULT_FAST_MODEL, DEFAULT_PRECISE_MODEL};
