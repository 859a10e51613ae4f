use grantline_core::AppError;
use thiserror::Error;

/// Errors raised while editing an identity's role assignment list.
///
/// Every variant is local to one row or to the list as a whole and never
/// terminates the editing session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleAssignmentError {
    /// A temporary grant was requested without a duration.
    #[error("temporary access duration is required")]
    RequiredField,

    /// The duration string could not be resolved to a positive time span.
    #[error("invalid temporary access duration '{range}'")]
    InvalidDuration {
        /// The rejected duration string.
        range: String,
    },

    /// The addressed row does not exist.
    #[error("role assignment row {index} does not exist")]
    EntryNotFound {
        /// Requested row index.
        index: usize,
    },

    /// A role row was given an empty role slug.
    #[error("role slug must not be empty")]
    EmptyRoleSlug,

    /// The same role appears on more than one row.
    #[error("role '{slug}' is already assigned")]
    DuplicateRole {
        /// Duplicated role slug.
        slug: String,
    },

    /// A role list was built without any rows.
    #[error("at least one role is required")]
    EmptyList,
}

impl RoleAssignmentError {
    /// Returns whether the error belongs to the duration field of one row.
    #[must_use]
    pub fn is_field_error(&self) -> bool {
        matches!(self, Self::RequiredField | Self::InvalidDuration { .. })
    }
}

impl From<RoleAssignmentError> for AppError {
    fn from(value: RoleAssignmentError) -> Self {
        match value {
            RoleAssignmentError::EntryNotFound { .. } => Self::NotFound(value.to_string()),
            RoleAssignmentError::DuplicateRole { .. } => Self::Conflict(value.to_string()),
            RoleAssignmentError::RequiredField
            | RoleAssignmentError::InvalidDuration { .. }
            | RoleAssignmentError::EmptyRoleSlug
            | RoleAssignmentError::EmptyList => Self::Validation(value.to_string()),
        }
    }
}
