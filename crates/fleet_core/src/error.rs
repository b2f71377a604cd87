//! Error types for the fleet simulation.
//!
//! Only boundary operations (content loading, persistence, validation)
//! return errors. The tick loop itself never fails: inconsistencies found
//! while stepping are logged and skipped.

use thiserror::Error;

use crate::data::{BuildingTypeId, ElementId, TechId};

/// Result type alias using [`SimError`].
pub type Result<T> = std::result::Result<T, SimError>;

/// Top-level error type for all simulation errors.
#[derive(Debug, Error)]
pub enum SimError {
    /// Content definition refers to a building the registry does not know.
    #[error("Unknown building type: {0:?}")]
    UnknownBuilding(BuildingTypeId),

    /// Content definition refers to a tech the registry does not know.
    #[error("Unknown tech: {0:?}")]
    UnknownTech(TechId),

    /// Content definition refers to an element the registry does not know.
    #[error("Unknown element: {0:?}")]
    UnknownElement(ElementId),

    /// Data file parsing error.
    #[error("Failed to parse {what}: {message}")]
    DataParseError {
        /// What was being parsed.
        what: String,
        /// Error message.
        message: String,
    },

    /// Binary (de)serialization failed.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Invalid configuration value.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Invalid simulation state.
    #[error("Invalid simulation state: {0}")]
    InvalidState(String),
}
