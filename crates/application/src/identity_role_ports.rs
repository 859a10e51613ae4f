mod catalog;
mod membership;
mod notifications;
mod repositories;

pub use catalog::{ProjectRole, SubscriptionPlan};
pub use membership::{IdentityRoleMembership, IdentityRoleUpdate, TemporaryMode};
pub use notifications::{Notification, NotificationKind, Notifier};
pub use repositories::{
    IdentityMembershipRepository, IdentityPermissionChecker, ProjectRoleCatalog,
    SubscriptionProvider,
};
