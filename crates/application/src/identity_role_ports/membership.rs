use chrono::{DateTime, Utc};

/// How a temporary range is interpreted by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporaryMode {
    /// Range is relative to the supplied start time.
    Relative,
}

impl TemporaryMode {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relative => "relative",
        }
    }
}

/// Existing role membership of an identity as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRoleMembership {
    /// Role slug, or `custom` for custom roles.
    pub role: String,
    /// Custom role slug when `role` is `custom`.
    pub custom_role_slug: Option<String>,
    /// Whether the membership is time-boxed.
    pub is_temporary: bool,
    /// Relative duration of a temporary membership.
    pub temporary_range: Option<String>,
    /// Start of a temporary membership.
    pub temporary_access_start_time: Option<DateTime<Utc>>,
    /// End of a temporary membership, as computed by the server.
    pub temporary_access_end_time: Option<DateTime<Utc>>,
}

impl IdentityRoleMembership {
    /// Returns the slug the membership is edited under.
    #[must_use]
    pub fn effective_slug(&self) -> &str {
        self.custom_role_slug
            .as_deref()
            .filter(|slug| !slug.trim().is_empty())
            .unwrap_or(self.role.as_str())
    }
}

/// One role of the batched update request.
///
/// Temporary roles carry their start and relative range only; the server
/// owns expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityRoleUpdate {
    /// Role without expiry.
    Permanent {
        /// Role slug.
        role: String,
    },
    /// Time-boxed role.
    Temporary {
        /// Role slug.
        role: String,
        /// Range interpretation.
        temporary_mode: TemporaryMode,
        /// Relative duration string.
        temporary_range: String,
        /// Instant the grant starts.
        temporary_access_start_time: DateTime<Utc>,
    },
}

impl IdentityRoleUpdate {
    /// Returns the role slug.
    #[must_use]
    pub fn role(&self) -> &str {
        match self {
            Self::Permanent { role } | Self::Temporary { role, .. } => role.as_str(),
        }
    }
}
