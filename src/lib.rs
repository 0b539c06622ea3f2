// Ohm: community-powered ocean hazard monitoring.
//
// This is the library root. Each module corresponds to a stage of the
// monitoring pipeline: collect -> analyze -> prioritize -> persist -> present.

pub mod config;
pub mod db;
pub mod detection;
pub mod monitor;
pub mod nlp;
pub mod output;
pub mod sources;
pub mod status;

#[cfg(feature = "web")]
pub mod web;
