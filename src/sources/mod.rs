// Data collection: pluggable sources feeding a single report stream.
//
// Every source implements the DataSource trait and emits RawReport values.
// The DataCollector owns an ordered registry of named sources and runs them
// together; build_collector wires the registry from the Config.

pub mod citizen;
pub mod client;
pub mod collector;
pub mod models;
pub mod news;
pub mod rate_limiter;
pub mod sample;
pub mod social;
pub mod traits;

pub use collector::{build_collector, DataCollector};
pub use models::{CollectParams, RawReport};
pub use traits::DataSource;
