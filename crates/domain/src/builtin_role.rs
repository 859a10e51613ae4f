use std::collections::BTreeSet;
use std::str::FromStr;

use grantline_core::AppError;

/// Project roles that exist in every project without a custom definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinProjectRole {
    /// Full project administration.
    Admin,
    /// Read and write access to project resources.
    Member,
    /// Read-only access to project resources.
    Viewer,
    /// Membership without any project access.
    NoAccess,
}

impl BuiltinProjectRole {
    /// Returns the stable role slug.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
            Self::Viewer => "viewer",
            Self::NoAccess => "no-access",
        }
    }

    /// Returns all built-in roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[BuiltinProjectRole] = &[
            BuiltinProjectRole::Admin,
            BuiltinProjectRole::Member,
            BuiltinProjectRole::Viewer,
            BuiltinProjectRole::NoAccess,
        ];

        ALL
    }
}

impl FromStr for BuiltinProjectRole {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            "viewer" => Ok(Self::Viewer),
            "no-access" => Ok(Self::NoAccess),
            _ => Err(AppError::Validation(format!(
                "unknown built-in role '{value}'"
            ))),
        }
    }
}

/// Returns the slugs of all built-in roles, used to detect custom roles.
#[must_use]
pub fn builtin_role_ids() -> BTreeSet<String> {
    BuiltinProjectRole::all()
        .iter()
        .map(|role| role.as_str().to_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{BuiltinProjectRole, builtin_role_ids};

    #[test]
    fn builtin_role_roundtrip_storage_value() {
        for role in BuiltinProjectRole::all() {
            let restored = BuiltinProjectRole::from_str(role.as_str());
            assert!(restored.is_ok());
            assert_eq!(restored.unwrap_or(BuiltinProjectRole::Admin), *role);
        }
    }

    #[test]
    fn custom_slug_is_not_builtin() {
        assert!(BuiltinProjectRole::from_str("custom-role-x").is_err());
        assert!(builtin_role_ids().contains("no-access"));
    }

    #[test]
    fn builtin_role_ids_cover_every_role() {
        let ids = builtin_role_ids();
        assert_eq!(ids.len(), BuiltinProjectRole::all().len());
        assert!(ids.contains("viewer"));
    }
}
