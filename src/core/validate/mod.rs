//! Snapshot validation
//!
//! [`Validator`] checks the structural integrity of a static course
//! directory: commit marker present, chunk files complete and consistent
//! with the manifest, indices and attachments accounted for. It gates the
//! Migrator and serves standalone verification.

pub mod validator;

pub use validator::{ValidationReport, Validator};
