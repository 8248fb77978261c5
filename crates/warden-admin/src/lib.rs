//! WARDEN Admin — user and role management operations for the admin
//! area.
//!
//! Every operation authorizes against the `admin` role once at its
//! boundary, then runs to completion; there are no per-step permission
//! checks inside an operation.

pub mod service;

pub use service::{AdminService, AdminStats, UserWithRoles};
