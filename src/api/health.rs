use chrono::Utc;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::types::dto::common::HealthResponse;

/// Health check API
///
/// Unauthenticated; load balancers and uptime probes hit this endpoint.
pub struct HealthApi;

/// API tags for health endpoints
#[derive(Tags)]
enum ApiTags {
    /// Health check endpoints
    Health,
}

#[OpenApi]
impl HealthApi {
    /// Report service liveness
    #[oai(path = "/health", method = "get", tag = "ApiTags::Health")]
    async fn health(&self) -> Json<HealthResponse> {
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn test_health_reports_healthy_with_a_valid_timestamp() {
        let api = HealthApi;

        let response = api.health().await;

        assert_eq!(response.status, "healthy");
        assert!(DateTime::parse_from_rfc3339(&response.timestamp).is_ok());
    }
}
