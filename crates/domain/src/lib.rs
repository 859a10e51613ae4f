//! Domain entities and invariants for identity role assignments.

#![forbid(unsafe_code)]

mod builtin_role;
mod duration;
mod error;
mod role_assignment;
mod temporary_access;

pub use builtin_role::{BuiltinProjectRole, builtin_role_ids};
pub use duration::{AccessWindow, DurationParser, is_expired, resolve_access_window};
pub use error::RoleAssignmentError;
pub use role_assignment::{RoleAssignmentEntry, RoleAssignmentList, RoleAssignmentSnapshot};
pub use temporary_access::{AccessStatus, AccessTransition, TemporaryAccess, TemporaryGrant};
