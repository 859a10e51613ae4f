use async_trait::async_trait;
use grantline_application::{SubscriptionPlan, SubscriptionProvider};
use grantline_core::AppResult;
use serde::Deserialize;

use crate::http_api_client::HttpApiClient;

#[derive(Debug, Deserialize)]
struct SubscriptionResponse {
    plan: SubscriptionPlanResponse,
}

#[derive(Debug, Deserialize)]
struct SubscriptionPlanResponse {
    #[serde(default)]
    rbac: bool,
}

/// HTTP adapter for subscription entitlements.
#[derive(Clone)]
pub struct HttpSubscriptionProvider {
    client: HttpApiClient,
}

impl HttpSubscriptionProvider {
    /// Creates a new subscription adapter.
    #[must_use]
    pub fn new(client: HttpApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SubscriptionProvider for HttpSubscriptionProvider {
    async fn current_subscription(&self) -> AppResult<SubscriptionPlan> {
        let response = self
            .client
            .get_json::<SubscriptionResponse>("/api/v1/subscription", "fetch subscription")
            .await?;

        Ok(SubscriptionPlan {
            rbac: response.plan.rbac,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::SubscriptionResponse;

    #[test]
    fn missing_rbac_flag_means_not_entitled() {
        let response = serde_json::from_str::<SubscriptionResponse>(r#"{"plan":{"tier":"free"}}"#);
        assert!(response.is_ok());
        assert!(!response.map(|response| response.plan.rbac).unwrap_or(true));
    }
}
