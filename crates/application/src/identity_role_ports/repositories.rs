use async_trait::async_trait;

use grantline_core::{AppResult, IdentityId, ProjectId};

use super::catalog::{ProjectRole, SubscriptionPlan};
use super::membership::{IdentityRoleMembership, IdentityRoleUpdate};

/// Port for the project role catalog.
#[async_trait]
pub trait ProjectRoleCatalog: Send + Sync {
    /// Lists roles selectable in a project.
    async fn list_project_roles(&self, project_id: ProjectId) -> AppResult<Vec<ProjectRole>>;
}

/// Port for subscription entitlements.
#[async_trait]
pub trait SubscriptionProvider: Send + Sync {
    /// Returns the current subscription plan.
    async fn current_subscription(&self) -> AppResult<SubscriptionPlan>;
}

/// Port for reading and replacing an identity's project roles.
#[async_trait]
pub trait IdentityMembershipRepository: Send + Sync {
    /// Lists the identity's current role memberships in a project.
    async fn list_identity_roles(
        &self,
        project_id: ProjectId,
        identity_id: IdentityId,
    ) -> AppResult<Vec<IdentityRoleMembership>>;

    /// Replaces the identity's roles with one batched request.
    async fn update_identity_roles(
        &self,
        project_id: ProjectId,
        identity_id: IdentityId,
        roles: Vec<IdentityRoleUpdate>,
    ) -> AppResult<()>;
}

/// Port for the external authorization predicate on identity edits.
#[async_trait]
pub trait IdentityPermissionChecker: Send + Sync {
    /// Returns whether the caller may mutate the identity's roles.
    async fn can_edit_identity(
        &self,
        project_id: ProjectId,
        identity_id: IdentityId,
    ) -> AppResult<bool>;
}
