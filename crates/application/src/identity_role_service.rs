//! Editing sessions for an identity's project role assignments.
//!
//! A session is opened from the identity's current memberships, mutated
//! through row-level commands and submitted as one batched update.

mod config;
mod editor;
mod reconcile;


use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use tokio::sync::Mutex;
use tracing::info;

use grantline_core::{AppError, AppResult, IdentityId, NonEmptyString, ProjectId};
use grantline_domain::{
    DurationParser, RoleAssignmentEntry, RoleAssignmentList, TemporaryAccess, TemporaryGrant,
};

use crate::identity_role_ports::{
    IdentityMembershipRepository, IdentityPermissionChecker, IdentityRoleMembership, Notifier,
    ProjectRoleCatalog, SubscriptionProvider,
};

pub use config::IdentityRoleEditorConfig;
pub use editor::{IdentityRoleEditor, SubmitOutcome};
pub use reconcile::{CustomRoleGatingError, SubmitError, reconcile};

/// Application service that opens identity role editing sessions.
#[derive(Clone)]
pub struct IdentityRoleService {
    role_catalog: Arc<dyn ProjectRoleCatalog>,
    subscription_provider: Arc<dyn SubscriptionProvider>,
    membership_repository: Arc<dyn IdentityMembershipRepository>,
    permission_checker: Arc<dyn IdentityPermissionChecker>,
    notifier: Arc<dyn Notifier>,
    duration_parser: Arc<dyn DurationParser>,
    config: IdentityRoleEditorConfig,
}

impl IdentityRoleService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        role_catalog: Arc<dyn ProjectRoleCatalog>,
        subscription_provider: Arc<dyn SubscriptionProvider>,
        membership_repository: Arc<dyn IdentityMembershipRepository>,
        permission_checker: Arc<dyn IdentityPermissionChecker>,
        notifier: Arc<dyn Notifier>,
        duration_parser: Arc<dyn DurationParser>,
        config: IdentityRoleEditorConfig,
    ) -> Self {
        Self {
            role_catalog,
            subscription_provider,
            membership_repository,
            permission_checker,
            notifier,
            duration_parser,
            config,
        }
    }

    /// Opens a session seeded from the identity's current memberships.
    ///
    /// An identity without memberships starts with one row holding the
    /// default role.
    pub async fn open_editor(
        &self,
        project_id: ProjectId,
        identity_id: IdentityId,
    ) -> AppResult<IdentityRoleEditor> {
        let memberships = self
            .membership_repository
            .list_identity_roles(project_id, identity_id)
            .await?;
        let role_catalog = self.role_catalog.list_project_roles(project_id).await?;
        let subscription = self.subscription_provider.current_subscription().await?;
        let can_edit = self
            .permission_checker
            .can_edit_identity(project_id, identity_id)
            .await?;

        let mut entries = memberships
            .into_iter()
            .map(entry_from_membership)
            .collect::<AppResult<Vec<_>>>()?;
        if entries.is_empty() {
            entries.push(RoleAssignmentEntry::permanent(
                self.config.default_role_slug.clone(),
            ));
        }
        let roles = RoleAssignmentList::try_from_entries(entries)?;

        info!(
            project_id = %project_id,
            identity_id = %identity_id,
            role_count = roles.len(),
            can_edit,
            rbac = subscription.rbac,
            "opened identity role editor"
        );

        Ok(IdentityRoleEditor {
            project_id,
            identity_id,
            roles: Mutex::new(roles),
            submitting: AtomicBool::new(false),
            can_edit,
            allows_custom_roles: subscription.rbac,
            role_catalog,
            builtin_role_ids: self.config.builtin_role_ids.clone(),
            default_role_slug: self.config.default_role_slug.clone(),
            membership_repository: self.membership_repository.clone(),
            notifier: self.notifier.clone(),
            duration_parser: self.duration_parser.clone(),
        })
    }
}

fn entry_from_membership(membership: IdentityRoleMembership) -> AppResult<RoleAssignmentEntry> {
    let slug = NonEmptyString::new(membership.effective_slug().trim())?;

    if !membership.is_temporary {
        return Ok(RoleAssignmentEntry::permanent(slug));
    }

    let start_time = membership.temporary_access_start_time.ok_or_else(|| {
        AppError::Validation(format!(
            "temporary membership for role '{}' has no start time",
            slug.as_str()
        ))
    })?;
    let grant = TemporaryGrant::new(
        membership.temporary_range.unwrap_or_default(),
        start_time,
        membership.temporary_access_end_time,
    )?;

    Ok(RoleAssignmentEntry::new(
        slug,
        TemporaryAccess::Temporary(grant),
    ))
}
