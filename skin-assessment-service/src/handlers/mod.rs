//! HTTP handlers for the skin assessment service.

pub mod assessment;
pub mod health;

pub use assessment::create_assessment;
pub use health::{health_check, metrics, readiness_check};
