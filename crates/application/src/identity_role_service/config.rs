use std::collections::BTreeSet;

use grantline_core::{AppResult, NonEmptyString};
use grantline_domain::builtin_role_ids;

/// Settings applied to every editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRoleEditorConfig {
    /// Role given to rows added without an explicit role.
    pub default_role_slug: NonEmptyString,
    /// Role slugs treated as built-in by custom-role gating.
    pub builtin_role_ids: BTreeSet<String>,
}

impl IdentityRoleEditorConfig {
    /// Creates a config gating on the built-in role enumeration.
    pub fn new(default_role_slug: &str) -> AppResult<Self> {
        Ok(Self {
            default_role_slug: NonEmptyString::new(default_role_slug.trim())?,
            builtin_role_ids: builtin_role_ids(),
        })
    }

    /// Replaces the built-in role set used for gating.
    #[must_use]
    pub fn with_builtin_role_ids(mut self, builtin_role_ids: BTreeSet<String>) -> Self {
        self.builtin_role_ids = builtin_role_ids;
        self
    }
}
