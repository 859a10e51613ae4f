//! Application services and ports.

#![forbid(unsafe_code)]

mod identity_role_ports;
mod identity_role_service;

pub use identity_role_ports::{
    IdentityMembershipRepository, IdentityPermissionChecker, IdentityRoleMembership,
    IdentityRoleUpdate, Notification, NotificationKind, Notifier, ProjectRole, ProjectRoleCatalog,
    SubscriptionPlan, SubscriptionProvider, TemporaryMode,
};
pub use identity_role_service::{
    CustomRoleGatingError, IdentityRoleEditor, IdentityRoleEditorConfig, IdentityRoleService,
    SubmitError, SubmitOutcome, reconcile,
};
