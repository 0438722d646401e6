//! DTOs for health check endpoint.

use serde::{Deserialize, Serialize};

use crate::application::services::HealthStatus;

/// Connectivity of the record store (`db`) and the cache (`redis`).
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub db: bool,
    pub redis: bool,
}

impl From<HealthStatus> for HealthResponse {
    fn from(status: HealthStatus) -> Self {
        Self {
            db: status.db,
            redis: status.redis,
        }
    }
}
