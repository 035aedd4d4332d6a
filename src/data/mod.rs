//! Data acquisition: the live analytics API and the offline sample generator.

pub mod api;
pub mod sample;

pub use api::{ApiClient, ApiConfig, DashboardData, ForecastPanel, ForecastResponse};
pub use sample::{SampleConfig, generate_sample, illustrative_forecast};
