pub mod detector;
pub mod models;
pub mod patterns;
pub mod priority;

pub use detector::HazardDetector;
