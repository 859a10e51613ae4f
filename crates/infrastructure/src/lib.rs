//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_api_client;
mod http_identity_membership_repository;
mod http_identity_permission_checker;
mod http_project_role_catalog;
mod http_subscription_provider;
mod relative_duration_parser;
mod tracing_notifier;

pub use http_api_client::HttpApiClient;
pub use http_identity_membership_repository::HttpIdentityMembershipRepository;
pub use http_identity_permission_checker::HttpIdentityPermissionChecker;
pub use http_project_role_catalog::HttpProjectRoleCatalog;
pub use http_subscription_provider::HttpSubscriptionProvider;
pub use relative_duration_parser::RelativeDurationParser;
pub use tracing_notifier::TracingNotifier;
