//! Secret validation suite
//!
//! Create, update and delete checks for Kubernetes Secrets managed through
//! the Rancher Steve API, usable from the integration tests and from the
//! `secret-validation` binary.

pub mod checks;
pub mod logging;
pub mod output;
pub mod secrets;
