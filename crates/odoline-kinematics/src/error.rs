//! Error types for the odometry engine.
//!
//! Only construction can fail. Once an engine exists every motion command has a
//! defined outcome, so stepping never returns an error.

use core::fmt;

/// Errors that can occur while building an odometry engine.
#[derive(Debug, Clone, PartialEq)]
pub enum KinematicsError {
    /// Error for an invalid geometric, calibration or slip parameter.
    /// The message names the parameter and the rule it broke.
    InvalidConfig(&'static str),
}

impl fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KinematicsError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for KinematicsError {}
