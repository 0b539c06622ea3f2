pub mod analyze;
pub mod hazards;
pub mod refresh;
pub mod reports;
pub mod status;
