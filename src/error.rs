//! Error types for zonewire
//!
//! Provides a unified error type for all codec operations.

use thiserror::Error;

use crate::protocol::VariantType;

/// Result type alias using WireError
pub type Result<T> = std::result::Result<T, WireError>;

/// Unified error type for zonewire operations
#[derive(Debug, Error)]
pub enum WireError {
    // -------------------------------------------------------------------------
    // Decode Errors
    // -------------------------------------------------------------------------
    #[error("Type mismatch: expected {expected} tag, found tag {found}")]
    TypeMismatch { expected: VariantType, found: u32 },

    #[error("Could not read value at offset {offset}: requested {requested} bytes, {available} available")]
    OutOfRange {
        requested: usize,
        available: usize,
        offset: usize,
    },

    #[error("Non-ASCII string content at offset {offset}")]
    NonAscii { offset: usize },

    #[error("Invalid length prefix: {0}")]
    InvalidLength(i64),

    #[error("Nesting depth limit of {limit} exceeded")]
    DepthExceeded { limit: usize },

    // -------------------------------------------------------------------------
    // Type Table Errors
    // -------------------------------------------------------------------------
    #[error("Unsupported type tag: {0}")]
    UnsupportedType(u32),

    // -------------------------------------------------------------------------
    // Encode Errors
    // -------------------------------------------------------------------------
    #[error("Write capacity exceeded: message needs {requested} bytes (capacity {capacity})")]
    CapacityExceeded { requested: usize, capacity: usize },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
