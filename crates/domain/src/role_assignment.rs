use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use grantline_core::NonEmptyString;

use crate::RoleAssignmentError;
use crate::duration::DurationParser;
use crate::temporary_access::{AccessStatus, AccessTransition, TemporaryAccess};

/// One role row of an identity's assignment list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignmentEntry {
    slug: NonEmptyString,
    temporary_access: TemporaryAccess,
}

impl RoleAssignmentEntry {
    /// Creates an entry for a role slug and access state.
    #[must_use]
    pub fn new(slug: NonEmptyString, temporary_access: TemporaryAccess) -> Self {
        Self {
            slug,
            temporary_access,
        }
    }

    /// Creates a permanent entry.
    #[must_use]
    pub fn permanent(slug: NonEmptyString) -> Self {
        Self::new(slug, TemporaryAccess::Permanent)
    }

    /// Returns the role slug.
    #[must_use]
    pub fn slug(&self) -> &str {
        self.slug.as_str()
    }

    /// Returns the stored access state.
    #[must_use]
    pub fn temporary_access(&self) -> &TemporaryAccess {
        &self.temporary_access
    }

    /// Derives the access status at `now`.
    #[must_use]
    pub fn status(&self, now: DateTime<Utc>) -> AccessStatus {
        self.temporary_access.status(now)
    }
}

/// Point-in-time copy of a list, used as a submission baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignmentSnapshot {
    entries: Vec<RoleAssignmentEntry>,
}

impl RoleAssignmentSnapshot {
    /// Returns the captured rows.
    #[must_use]
    pub fn entries(&self) -> &[RoleAssignmentEntry] {
        self.entries.as_slice()
    }
}

/// Ordered role rows edited in one session.
///
/// The list never becomes empty. It is dirty while its rows differ from the
/// last loaded or submitted baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignmentList {
    entries: Vec<RoleAssignmentEntry>,
    baseline: Vec<RoleAssignmentEntry>,
}

impl RoleAssignmentList {
    /// Creates a clean list from loaded rows.
    pub fn try_from_entries(
        entries: Vec<RoleAssignmentEntry>,
    ) -> Result<Self, RoleAssignmentError> {
        if entries.is_empty() {
            return Err(RoleAssignmentError::EmptyList);
        }

        Ok(Self {
            baseline: entries.clone(),
            entries,
        })
    }

    /// Returns all rows in display order.
    #[must_use]
    pub fn entries(&self) -> &[RoleAssignmentEntry] {
        self.entries.as_slice()
    }

    /// Returns one row.
    pub fn entry(&self, index: usize) -> Result<&RoleAssignmentEntry, RoleAssignmentError> {
        self.entries
            .get(index)
            .ok_or(RoleAssignmentError::EntryNotFound { index })
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the list has no rows, which never holds once built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns whether the rows differ from the last clean baseline.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.entries != self.baseline
    }

    /// Appends a permanent row and returns its index.
    pub fn add(&mut self, slug: NonEmptyString) -> usize {
        self.entries.push(RoleAssignmentEntry::permanent(slug));
        self.entries.len() - 1
    }

    /// Removes one row.
    ///
    /// Returns `false` without touching the list when it holds a single row.
    pub fn remove(&mut self, index: usize) -> Result<bool, RoleAssignmentError> {
        self.entry(index)?;
        if self.entries.len() <= 1 {
            return Ok(false);
        }

        self.entries.remove(index);
        Ok(true)
    }

    /// Replaces the role slug of one row, keeping its access state.
    pub fn set_slug(&mut self, index: usize, slug: &str) -> Result<(), RoleAssignmentError> {
        self.entry(index)?;
        let slug = slug.trim();
        let slug = NonEmptyString::new(slug).map_err(|_| RoleAssignmentError::EmptyRoleSlug)?;

        let taken = self
            .entries
            .iter()
            .enumerate()
            .any(|(position, entry)| position != index && entry.slug() == slug.as_str());
        if taken {
            return Err(RoleAssignmentError::DuplicateRole {
                slug: slug.into(),
            });
        }

        if let Some(entry) = self.entries.get_mut(index) {
            entry.slug = slug;
        }

        Ok(())
    }

    /// Replaces the access state of one row wholesale.
    pub fn set_temporary_access(
        &mut self,
        index: usize,
        temporary_access: TemporaryAccess,
    ) -> Result<(), RoleAssignmentError> {
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(RoleAssignmentError::EntryNotFound { index })?;
        entry.temporary_access = temporary_access;

        Ok(())
    }

    /// Applies an access transition to one row.
    ///
    /// On error the row is left unchanged.
    pub fn apply_transition<P>(
        &mut self,
        index: usize,
        transition: AccessTransition<'_>,
        parser: &P,
        now: DateTime<Utc>,
    ) -> Result<&RoleAssignmentEntry, RoleAssignmentError>
    where
        P: DurationParser + ?Sized,
    {
        let next = self
            .entry(index)?
            .temporary_access
            .apply(transition, parser, now)?;
        self.set_temporary_access(index, next)?;
        self.entry(index)
    }

    /// Checks whole-list invariants before submission.
    pub fn validate(&self) -> Result<(), RoleAssignmentError> {
        if self.entries.is_empty() {
            return Err(RoleAssignmentError::EmptyList);
        }

        let mut seen = BTreeSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.slug()) {
                return Err(RoleAssignmentError::DuplicateRole {
                    slug: entry.slug().to_owned(),
                });
            }
        }

        Ok(())
    }

    /// Captures the current rows.
    #[must_use]
    pub fn snapshot(&self) -> RoleAssignmentSnapshot {
        RoleAssignmentSnapshot {
            entries: self.entries.clone(),
        }
    }

    /// Moves the clean baseline to rows confirmed by the server.
    ///
    /// Edits made after the snapshot was taken keep the list dirty.
    pub fn mark_submitted(&mut self, snapshot: RoleAssignmentSnapshot) {
        self.baseline = snapshot.entries;
    }

    /// Discards edits and restores the clean baseline.
    pub fn reset(&mut self) {
        self.entries = self.baseline.clone();
    }
}
