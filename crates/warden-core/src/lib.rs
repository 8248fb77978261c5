//! WARDEN Core — domain models, repository traits, and the shared
//! error taxonomy.
//!
//! This crate has no I/O. Storage backends implement the repository
//! traits defined here; the auth and admin crates build on top of the
//! traits so they stay independent of the database crate.

pub mod error;
pub mod models;
pub mod repository;
pub mod validation;

pub use error::{WardenError, WardenResult};
