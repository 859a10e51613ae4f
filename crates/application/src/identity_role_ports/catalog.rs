/// Role definition selectable for a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRole {
    /// Stable role identifier.
    pub id: String,
    /// Role slug used in assignments.
    pub slug: String,
    /// Display name.
    pub name: String,
}

/// Entitlements of the current organization subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionPlan {
    /// Whether custom roles may be assigned.
    pub rbac: bool,
}
