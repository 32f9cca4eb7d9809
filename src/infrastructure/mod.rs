//! Infrastructure - HTTP access to the Plenty config service and the TzKT indexer

pub mod api;

pub use api::{DataFetcher, MarketData, PlentyApi};
