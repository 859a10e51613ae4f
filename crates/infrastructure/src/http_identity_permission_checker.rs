use async_trait::async_trait;
use grantline_application::IdentityPermissionChecker;
use grantline_core::{AppResult, IdentityId, ProjectId};
use serde::Deserialize;

use crate::http_api_client::HttpApiClient;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityPermissionsResponse {
    can_edit: bool,
}

/// HTTP adapter for the identity edit authorization predicate.
#[derive(Clone)]
pub struct HttpIdentityPermissionChecker {
    client: HttpApiClient,
}

impl HttpIdentityPermissionChecker {
    /// Creates a new permission checker adapter.
    #[must_use]
    pub fn new(client: HttpApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityPermissionChecker for HttpIdentityPermissionChecker {
    async fn can_edit_identity(
        &self,
        project_id: ProjectId,
        identity_id: IdentityId,
    ) -> AppResult<bool> {
        let response = self
            .client
            .get_json::<IdentityPermissionsResponse>(
                format!(
                    "/api/v1/projects/{project_id}/identity-memberships/{identity_id}/permissions"
                )
                .as_str(),
                "check identity permissions",
            )
            .await?;

        Ok(response.can_edit)
    }
}
