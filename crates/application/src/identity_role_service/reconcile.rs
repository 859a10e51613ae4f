use std::collections::BTreeSet;

use grantline_core::AppError;
use grantline_domain::{RoleAssignmentEntry, RoleAssignmentError, TemporaryAccess};
use thiserror::Error;

use crate::identity_role_ports::{IdentityRoleUpdate, TemporaryMode};

/// Custom roles were selected without the subscription entitlement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("assigning custom roles requires an upgraded plan: {}", .custom_roles.join(", "))]
pub struct CustomRoleGatingError {
    /// Selected slugs that are not built-in roles.
    pub custom_roles: Vec<String>,
}

/// Why a submission did not apply.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The list violates a whole-list invariant; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] RoleAssignmentError),

    /// Custom roles are not allowed by the subscription; nothing was sent.
    #[error(transparent)]
    Gated(#[from] CustomRoleGatingError),

    /// The remote update failed; the edited list is kept for a retry.
    #[error("failed to update identity roles: {0}")]
    Transport(AppError),
}

impl From<SubmitError> for AppError {
    fn from(value: SubmitError) -> Self {
        match value {
            SubmitError::Invalid(error) => error.into(),
            SubmitError::Gated(error) => Self::Forbidden(error.to_string()),
            SubmitError::Transport(error) => error,
        }
    }
}

/// Maps rows to the update payload and applies custom-role gating.
///
/// End times are never part of the payload.
pub fn reconcile(
    entries: &[RoleAssignmentEntry],
    subscription_allows_custom_roles: bool,
    builtin_role_ids: &BTreeSet<String>,
) -> Result<Vec<IdentityRoleUpdate>, CustomRoleGatingError> {
    let payload: Vec<IdentityRoleUpdate> = entries.iter().map(role_update).collect();

    let custom_roles: Vec<String> = payload
        .iter()
        .map(IdentityRoleUpdate::role)
        .filter(|role| !builtin_role_ids.contains(*role))
        .map(str::to_owned)
        .collect();

    if !custom_roles.is_empty() && !subscription_allows_custom_roles {
        return Err(CustomRoleGatingError { custom_roles });
    }

    Ok(payload)
}

fn role_update(entry: &RoleAssignmentEntry) -> IdentityRoleUpdate {
    let role = entry.slug().to_owned();
    match entry.temporary_access() {
        TemporaryAccess::Permanent => IdentityRoleUpdate::Permanent { role },
        TemporaryAccess::Temporary(grant) => IdentityRoleUpdate::Temporary {
            role,
            temporary_mode: TemporaryMode::Relative,
            temporary_range: grant.range().to_owned(),
            temporary_access_start_time: grant.start_time(),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{TimeZone, Utc};
    use grantline_core::NonEmptyString;
    use grantline_domain::{RoleAssignmentEntry, TemporaryAccess, TemporaryGrant, builtin_role_ids};

    use super::{CustomRoleGatingError, reconcile};
    use crate::identity_role_ports::{IdentityRoleUpdate, TemporaryMode};

    fn permanent(slug: &str) -> RoleAssignmentEntry {
        RoleAssignmentEntry::permanent(
            NonEmptyString::new(slug).unwrap_or_else(|_| unreachable!()),
        )
    }

    #[test]
    fn temporary_rows_carry_start_and_range_only() {
        let start_time = Utc
            .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .unwrap_or_else(|| unreachable!());
        let grant = TemporaryGrant::new("1h", start_time, Some(start_time))
            .unwrap_or_else(|_| unreachable!());
        let entries = vec![
            permanent("admin"),
            RoleAssignmentEntry::new(
                NonEmptyString::new("viewer").unwrap_or_else(|_| unreachable!()),
                TemporaryAccess::Temporary(grant),
            ),
        ];

        let payload = reconcile(&entries, false, &builtin_role_ids());

        assert_eq!(
            payload,
            Ok(vec![
                IdentityRoleUpdate::Permanent {
                    role: "admin".to_owned()
                },
                IdentityRoleUpdate::Temporary {
                    role: "viewer".to_owned(),
                    temporary_mode: TemporaryMode::Relative,
                    temporary_range: "1h".to_owned(),
                    temporary_access_start_time: start_time,
                },
            ])
        );
    }

    #[test]
    fn custom_role_without_entitlement_is_gated() {
        let entries = vec![permanent("custom-role-x")];
        let builtin: BTreeSet<String> = ["admin".to_owned(), "member".to_owned()].into();

        assert_eq!(
            reconcile(&entries, false, &builtin),
            Err(CustomRoleGatingError {
                custom_roles: vec!["custom-role-x".to_owned()]
            })
        );
    }

    #[test]
    fn custom_role_with_entitlement_passes() {
        let entries = vec![permanent("member"), permanent("custom-role-x")];
        let payload = reconcile(&entries, true, &builtin_role_ids());
        assert_eq!(payload.map(|roles| roles.len()), Ok(2));
    }

    #[test]
    fn builtin_roles_need_no_entitlement() {
        let entries = vec![permanent("member"), permanent("no-access")];
        assert!(reconcile(&entries, false, &builtin_role_ids()).is_ok());
    }
}
