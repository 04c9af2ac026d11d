/// upper-bounds - Solution boundary detection for assignment pages
///
/// Core library that asks a multimodal structured-extraction engine where
/// each problem or subproblem's solution begins on a page image, and
/// validates the answer against a declared schema.

pub mod config;
pub mod core;


pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
