use async_trait::async_trait;
use grantline_application::{ProjectRole, ProjectRoleCatalog};
use grantline_core::{AppResult, ProjectId};
use serde::Deserialize;

use crate::http_api_client::HttpApiClient;

#[derive(Debug, Deserialize)]
struct ProjectRolesResponse {
    roles: Vec<ProjectRoleResponse>,
}

#[derive(Debug, Deserialize)]
struct ProjectRoleResponse {
    id: String,
    slug: String,
    name: String,
}

/// HTTP adapter for the project role catalog.
#[derive(Clone)]
pub struct HttpProjectRoleCatalog {
    client: HttpApiClient,
}

impl HttpProjectRoleCatalog {
    /// Creates a new catalog adapter.
    #[must_use]
    pub fn new(client: HttpApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProjectRoleCatalog for HttpProjectRoleCatalog {
    async fn list_project_roles(&self, project_id: ProjectId) -> AppResult<Vec<ProjectRole>> {
        let response = self
            .client
            .get_json::<ProjectRolesResponse>(
                format!("/api/v1/projects/{project_id}/roles").as_str(),
                "list project roles",
            )
            .await?;

        Ok(response
            .roles
            .into_iter()
            .map(|role| ProjectRole {
                id: role.id,
                slug: role.slug,
                name: role.name,
            })
            .collect())
    }
}
