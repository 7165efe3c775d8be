//! Ready-made queries against well-known YQL tables.

mod finance;
mod weather;

// Re-export public API
pub use finance::StockRetriever;
pub use weather::Weather;
