use async_trait::async_trait;
use chrono::{DateTime, Utc};
use grantline_application::{IdentityMembershipRepository, IdentityRoleMembership, IdentityRoleUpdate};
use grantline_core::{AppResult, IdentityId, ProjectId};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http_api_client::HttpApiClient;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityMembershipEnvelope {
    identity_membership: IdentityMembershipResponse,
}

#[derive(Debug, Deserialize)]
struct IdentityMembershipResponse {
    #[serde(default)]
    roles: Vec<IdentityRoleResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityRoleResponse {
    role: String,
    custom_role_slug: Option<String>,
    #[serde(default)]
    is_temporary: bool,
    temporary_range: Option<String>,
    temporary_access_start_time: Option<DateTime<Utc>>,
    temporary_access_end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct UpdateIdentityRolesRequest {
    roles: Vec<IdentityRoleUpdateRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IdentityRoleUpdateRequest {
    role: String,
    is_temporary: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temporary_mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temporary_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temporary_access_start_time: Option<DateTime<Utc>>,
}

impl From<IdentityRoleResponse> for IdentityRoleMembership {
    fn from(value: IdentityRoleResponse) -> Self {
        Self {
            role: value.role,
            custom_role_slug: value.custom_role_slug,
            is_temporary: value.is_temporary,
            temporary_range: value.temporary_range,
            temporary_access_start_time: value.temporary_access_start_time,
            temporary_access_end_time: value.temporary_access_end_time,
        }
    }
}

impl From<IdentityRoleUpdate> for IdentityRoleUpdateRequest {
    fn from(value: IdentityRoleUpdate) -> Self {
        match value {
            IdentityRoleUpdate::Permanent { role } => Self {
                role,
                is_temporary: false,
                temporary_mode: None,
                temporary_range: None,
                temporary_access_start_time: None,
            },
            IdentityRoleUpdate::Temporary {
                role,
                temporary_mode,
                temporary_range,
                temporary_access_start_time,
            } => Self {
                role,
                is_temporary: true,
                temporary_mode: Some(temporary_mode.as_str()),
                temporary_range: Some(temporary_range),
                temporary_access_start_time: Some(temporary_access_start_time),
            },
        }
    }
}

/// HTTP adapter for reading and replacing identity project roles.
#[derive(Clone)]
pub struct HttpIdentityMembershipRepository {
    client: HttpApiClient,
}

impl HttpIdentityMembershipRepository {
    /// Creates a new membership adapter.
    #[must_use]
    pub fn new(client: HttpApiClient) -> Self {
        Self { client }
    }
}

fn membership_path(project_id: ProjectId, identity_id: IdentityId) -> String {
    format!("/api/v2/projects/{project_id}/identity-memberships/{identity_id}")
}

#[async_trait]
impl IdentityMembershipRepository for HttpIdentityMembershipRepository {
    async fn list_identity_roles(
        &self,
        project_id: ProjectId,
        identity_id: IdentityId,
    ) -> AppResult<Vec<IdentityRoleMembership>> {
        let envelope = self
            .client
            .get_json::<IdentityMembershipEnvelope>(
                membership_path(project_id, identity_id).as_str(),
                "fetch identity membership",
            )
            .await?;

        Ok(envelope
            .identity_membership
            .roles
            .into_iter()
            .map(IdentityRoleMembership::from)
            .collect())
    }

    async fn update_identity_roles(
        &self,
        project_id: ProjectId,
        identity_id: IdentityId,
        roles: Vec<IdentityRoleUpdate>,
    ) -> AppResult<()> {
        let request = UpdateIdentityRolesRequest {
            roles: roles
                .into_iter()
                .map(IdentityRoleUpdateRequest::from)
                .collect(),
        };
        debug!(
            project_id = %project_id,
            identity_id = %identity_id,
            role_count = request.roles.len(),
            "sending identity role update"
        );

        self.client
            .send_json(
                Method::PATCH,
                membership_path(project_id, identity_id).as_str(),
                &request,
                "update identity roles",
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use grantline_application::{IdentityRoleUpdate, TemporaryMode};
    use serde_json::json;

    use super::{IdentityMembershipEnvelope, IdentityRoleUpdateRequest, UpdateIdentityRolesRequest};

    #[test]
    fn update_request_omits_end_time_and_permanent_fields() {
        let start_time = Utc
            .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .unwrap_or_else(|| unreachable!());
        let request = UpdateIdentityRolesRequest {
            roles: vec![
                IdentityRoleUpdateRequest::from(IdentityRoleUpdate::Permanent {
                    role: "admin".to_owned(),
                }),
                IdentityRoleUpdateRequest::from(IdentityRoleUpdate::Temporary {
                    role: "viewer".to_owned(),
                    temporary_mode: TemporaryMode::Relative,
                    temporary_range: "1h".to_owned(),
                    temporary_access_start_time: start_time,
                }),
            ],
        };

        let value = serde_json::to_value(&request);
        assert!(value.is_ok());
        assert_eq!(
            value.unwrap_or_default(),
            json!({
                "roles": [
                    { "role": "admin", "isTemporary": false },
                    {
                        "role": "viewer",
                        "isTemporary": true,
                        "temporaryMode": "relative",
                        "temporaryRange": "1h",
                        "temporaryAccessStartTime": "2026-03-01T12:00:00Z"
                    }
                ]
            })
        );
    }

    #[test]
    fn membership_response_maps_custom_and_temporary_roles() {
        let envelope = serde_json::from_value::<IdentityMembershipEnvelope>(json!({
            "identityMembership": {
                "roles": [
                    { "role": "member" },
                    {
                        "role": "custom",
                        "customRoleSlug": "deployers",
                        "isTemporary": true,
                        "temporaryRange": "2h",
                        "temporaryAccessStartTime": "2026-03-01T12:00:00Z",
                        "temporaryAccessEndTime": "2026-03-01T14:00:00Z"
                    }
                ]
            }
        }));
        assert!(envelope.is_ok());
        let roles = envelope
            .map(|envelope| envelope.identity_membership.roles)
            .unwrap_or_default();

        assert_eq!(roles.len(), 2);
        assert!(!roles[0].is_temporary);
        assert_eq!(roles[1].custom_role_slug.as_deref(), Some("deployers"));
        assert_eq!(
            roles[1].temporary_access_end_time,
            Utc.with_ymd_and_hms(2026, 3, 1, 14, 0, 0).single()
        );
    }
}
