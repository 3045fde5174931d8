//! Higher level helpers built on the raw clients

pub mod clusters;
pub mod secrets;
