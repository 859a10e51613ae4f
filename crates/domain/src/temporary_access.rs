use chrono::{DateTime, Utc};

use crate::RoleAssignmentError;
use crate::duration::{DurationParser, is_expired, resolve_access_window};

/// Time-boxed grant data carried by a temporary role assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporaryGrant {
    range: String,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
}

impl TemporaryGrant {
    /// Creates a temporary grant, rejecting an empty duration.
    pub fn new(
        range: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: Option<DateTime<Utc>>,
    ) -> Result<Self, RoleAssignmentError> {
        let range = range.into().trim().to_owned();
        if range.is_empty() {
            return Err(RoleAssignmentError::RequiredField);
        }

        Ok(Self {
            range,
            start_time,
            end_time,
        })
    }

    /// Returns the relative duration the grant was made with.
    #[must_use]
    pub fn range(&self) -> &str {
        self.range.as_str()
    }

    /// Returns the instant access started.
    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Returns the instant access ends, when known.
    #[must_use]
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }
}

/// Whether a role assignment is permanent or time-boxed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TemporaryAccess {
    /// Assignment without an expiry.
    #[default]
    Permanent,
    /// Assignment valid inside a window.
    Temporary(TemporaryGrant),
}

/// Access state derived from stored data and the current instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessStatus {
    /// No expiry applies.
    Permanent,
    /// Temporary grant whose end has not been resolved yet.
    Pending,
    /// Temporary grant that is still valid.
    Active {
        /// Instant access ends.
        ends_at: DateTime<Utc>,
    },
    /// Temporary grant whose window is over.
    Expired {
        /// Instant access ended.
        ended_at: DateTime<Utc>,
    },
}

/// Transition requested for one row's access state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessTransition<'a> {
    /// Grants time-boxed access for `range`, starting now.
    Grant {
        /// Relative duration string.
        range: &'a str,
    },
    /// Replaces the current window with a fresh one starting now.
    Restart {
        /// Relative duration string.
        range: &'a str,
    },
    /// Turns the assignment back into a permanent one.
    Revoke,
}

impl AccessTransition<'_> {
    /// Returns a stable name for logging.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grant { .. } => "grant",
            Self::Restart { .. } => "restart",
            Self::Revoke => "revoke",
        }
    }
}

impl TemporaryAccess {
    /// Creates a temporary grant covering `range` from `now`.
    pub fn granted<P>(
        parser: &P,
        range: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, RoleAssignmentError>
    where
        P: DurationParser + ?Sized,
    {
        let range = range.trim();
        if range.is_empty() {
            return Err(RoleAssignmentError::RequiredField);
        }

        let window = resolve_access_window(parser, range, now)?;
        TemporaryGrant::new(range, window.start_time, Some(window.end_time)).map(Self::Temporary)
    }

    /// Returns the temporary grant data, when present.
    #[must_use]
    pub fn as_temporary(&self) -> Option<&TemporaryGrant> {
        match self {
            Self::Permanent => None,
            Self::Temporary(grant) => Some(grant),
        }
    }

    /// Derives the access status at `now`. Never cached.
    #[must_use]
    pub fn status(&self, now: DateTime<Utc>) -> AccessStatus {
        match self {
            Self::Permanent => AccessStatus::Permanent,
            Self::Temporary(grant) => match grant.end_time {
                None => AccessStatus::Pending,
                Some(end_time) if is_expired(end_time, now) => AccessStatus::Expired {
                    ended_at: end_time,
                },
                Some(end_time) => AccessStatus::Active { ends_at: end_time },
            },
        }
    }

    /// Computes the state reached by applying `transition` at `now`.
    ///
    /// Grant and Restart both discard any previous window. Revoke always
    /// yields [`TemporaryAccess::Permanent`].
    pub fn apply<P>(
        &self,
        transition: AccessTransition<'_>,
        parser: &P,
        now: DateTime<Utc>,
    ) -> Result<Self, RoleAssignmentError>
    where
        P: DurationParser + ?Sized,
    {
        match transition {
            AccessTransition::Grant { range } | AccessTransition::Restart { range } => {
                Self::granted(parser, range, now)
            }
            AccessTransition::Revoke => Ok(Self::Permanent),
        }
    }
}
