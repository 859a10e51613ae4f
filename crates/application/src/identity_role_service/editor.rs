use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use grantline_core::{IdentityId, NonEmptyString, ProjectId};
use grantline_domain::{
    AccessStatus, AccessTransition, DurationParser, RoleAssignmentEntry, RoleAssignmentError,
    RoleAssignmentList,
};

use crate::identity_role_ports::{
    IdentityMembershipRepository, Notification, Notifier, ProjectRole,
};

use super::reconcile::{SubmitError, reconcile};

/// Result of a submit request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The batched update was applied.
    Submitted {
        /// Number of roles sent.
        role_count: usize,
    },
    /// Another submission was in flight; nothing was sent.
    Ignored,
}

/// Editing session over one identity's project roles.
///
/// The role list is owned by the session. Only submission awaits remote
/// work, and a submission already in flight makes further submits no-ops.
pub struct IdentityRoleEditor {
    pub(super) project_id: ProjectId,
    pub(super) identity_id: IdentityId,
    pub(super) roles: Mutex<RoleAssignmentList>,
    pub(super) submitting: AtomicBool,
    pub(super) can_edit: bool,
    pub(super) allows_custom_roles: bool,
    pub(super) role_catalog: Vec<ProjectRole>,
    pub(super) builtin_role_ids: BTreeSet<String>,
    pub(super) default_role_slug: NonEmptyString,
    pub(super) membership_repository: Arc<dyn IdentityMembershipRepository>,
    pub(super) notifier: Arc<dyn Notifier>,
    pub(super) duration_parser: Arc<dyn DurationParser>,
}

impl IdentityRoleEditor {
    /// Returns the project being edited.
    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the identity being edited.
    #[must_use]
    pub fn identity_id(&self) -> IdentityId {
        self.identity_id
    }

    /// Returns whether the caller may mutate roles. Informational only.
    #[must_use]
    pub fn can_edit(&self) -> bool {
        self.can_edit
    }

    /// Returns whether the subscription allows custom roles.
    #[must_use]
    pub fn allows_custom_roles(&self) -> bool {
        self.allows_custom_roles
    }

    /// Returns the selectable project roles.
    #[must_use]
    pub fn role_catalog(&self) -> &[ProjectRole] {
        self.role_catalog.as_slice()
    }

    /// Returns a read-only copy of the current rows.
    pub async fn entries(&self) -> Vec<RoleAssignmentEntry> {
        self.roles.lock().await.entries().to_vec()
    }

    /// Returns each row with its access status derived at `now`.
    pub async fn entry_statuses(
        &self,
        now: DateTime<Utc>,
    ) -> Vec<(RoleAssignmentEntry, AccessStatus)> {
        self.roles
            .lock()
            .await
            .entries()
            .iter()
            .map(|entry| (entry.clone(), entry.status(now)))
            .collect()
    }

    /// Returns whether there are unsubmitted edits.
    pub async fn is_dirty(&self) -> bool {
        self.roles.lock().await.is_dirty()
    }

    /// Returns whether a submission is in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Appends a permanent row for `slug`, or for the default role.
    pub async fn add(&self, slug: Option<&str>) -> Result<usize, RoleAssignmentError> {
        let slug = match slug {
            Some(slug) => NonEmptyString::new(slug.trim())
                .map_err(|_| RoleAssignmentError::EmptyRoleSlug)?,
            None => self.default_role_slug.clone(),
        };

        let index = self.roles.lock().await.add(slug);
        debug!(identity_id = %self.identity_id, index, "role row added");
        Ok(index)
    }

    /// Removes a row. Returns `false` when it is the last one.
    pub async fn remove(&self, index: usize) -> Result<bool, RoleAssignmentError> {
        let removed = self.roles.lock().await.remove(index)?;
        if removed {
            debug!(identity_id = %self.identity_id, index, "role row removed");
        } else {
            debug!(
                identity_id = %self.identity_id,
                index,
                "refused to remove the last role row"
            );
        }

        Ok(removed)
    }

    /// Changes the role of a row.
    pub async fn set_role(&self, index: usize, slug: &str) -> Result<(), RoleAssignmentError> {
        self.roles.lock().await.set_slug(index, slug)
    }

    /// Grants time-boxed access on a row for `range` starting at `now`.
    pub async fn grant(
        &self,
        index: usize,
        range: &str,
        now: DateTime<Utc>,
    ) -> Result<RoleAssignmentEntry, RoleAssignmentError> {
        self.transition(index, AccessTransition::Grant { range }, now)
            .await
    }

    /// Replaces a row's access window with a fresh one starting at `now`.
    pub async fn restart(
        &self,
        index: usize,
        range: &str,
        now: DateTime<Utc>,
    ) -> Result<RoleAssignmentEntry, RoleAssignmentError> {
        self.transition(index, AccessTransition::Restart { range }, now)
            .await
    }

    /// Turns a row back into a permanent assignment.
    pub async fn revoke(&self, index: usize) -> Result<RoleAssignmentEntry, RoleAssignmentError> {
        self.transition(index, AccessTransition::Revoke, Utc::now())
            .await
    }

    /// Discards edits and restores the last loaded or submitted rows.
    pub async fn reset(&self) {
        self.roles.lock().await.reset();
    }

    /// Validates, gates and sends the whole list as one update request.
    ///
    /// Nothing is sent when validation or gating fails. A transport failure
    /// keeps the edited rows so that submitting again retries them.
    pub async fn submit(&self) -> Result<SubmitOutcome, SubmitError> {
        let Some(_submission) = SubmissionGuard::acquire(&self.submitting) else {
            debug!(
                identity_id = %self.identity_id,
                "submission already in flight, ignoring submit"
            );
            return Ok(SubmitOutcome::Ignored);
        };

        let snapshot = {
            let roles = self.roles.lock().await;
            roles.validate()?;
            roles.snapshot()
        };

        let payload = reconcile(
            snapshot.entries(),
            self.allows_custom_roles,
            &self.builtin_role_ids,
        )
        .inspect_err(|error| {
            warn!(
                identity_id = %self.identity_id,
                custom_roles = ?error.custom_roles,
                "custom roles require an upgraded plan"
            );
        })?;
        let role_count = payload.len();

        match self
            .membership_repository
            .update_identity_roles(self.project_id, self.identity_id, payload)
            .await
        {
            Ok(()) => {
                self.roles.lock().await.mark_submitted(snapshot);
                info!(
                    project_id = %self.project_id,
                    identity_id = %self.identity_id,
                    role_count,
                    "identity roles updated"
                );
                self.notifier
                    .notify(Notification::success("Successfully updated roles"))
                    .await;
                Ok(SubmitOutcome::Submitted { role_count })
            }
            Err(error) => {
                warn!(
                    project_id = %self.project_id,
                    identity_id = %self.identity_id,
                    error = %error,
                    "failed to update identity roles"
                );
                self.notifier
                    .notify(Notification::error("Failed to update roles"))
                    .await;
                Err(SubmitError::Transport(error))
            }
        }
    }

    async fn transition(
        &self,
        index: usize,
        transition: AccessTransition<'_>,
        now: DateTime<Utc>,
    ) -> Result<RoleAssignmentEntry, RoleAssignmentError> {
        let mut roles = self.roles.lock().await;
        let entry = roles
            .apply_transition(index, transition, self.duration_parser.as_ref(), now)
            .cloned()?;

        debug!(
            identity_id = %self.identity_id,
            index,
            transition = transition.as_str(),
            role = entry.slug(),
            "role access transition applied"
        );
        Ok(entry)
    }
}

/// Holds the in-flight flag for the duration of one submission.
struct SubmissionGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SubmissionGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
