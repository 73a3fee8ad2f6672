//! Error types for the core crate
//!
//! Every failure in the codec and the commit-reveal protocol is deterministic
//! and locally detectable. None of them is transient, so callers must supply
//! corrected input rather than retry.

use thiserror::Error;
use std::io;

use crate::models::ItemId;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// Value does not fit the declared fixed width
    #[error("Value {value} is out of range for {type_label}")]
    OutOfRangeError {
        /// Label of the declared type
        type_label: String,
        /// Offending literal
        value: String,
    },

    /// Integer literal is malformed
    #[error("Invalid integer literal: {value:?}")]
    InvalidIntegerError {
        /// Offending literal
        value: String,
    },

    /// Decimal literal is malformed or carries too many fractional digits
    #[error("Invalid fixed-point literal {value:?}: {reason}")]
    InvalidFixedPointError {
        /// Offending literal
        value: String,
        /// What was wrong with it
        reason: String,
    },

    /// Boolean literal is neither `true` nor `false`
    #[error("Invalid boolean literal: {value:?}")]
    InvalidBooleanError {
        /// Offending literal
        value: String,
    },

    /// Address literal is not valid hex or is too wide
    #[error("Invalid address {value:?}: {reason}")]
    InvalidAddressError {
        /// Offending literal
        value: String,
        /// What was wrong with it
        reason: String,
    },

    /// Type label does not name a supported field type
    #[error("Unsupported field type: {0}")]
    UnsupportedTypeError(String),

    /// Variable-length value cannot carry a 2-byte length prefix
    #[error("Encoded value is {length} bytes, the maximum is {max}")]
    ValueTooLongError {
        /// Actual encoded length
        length: usize,
        /// Largest length the prefix can express
        max: usize,
    },

    /// Record lacks a value for a schema field
    #[error("Missing value for field `{field}`")]
    MissingFieldError {
        /// Name of the missing field
        field: String,
    },

    /// A value failed to encode for the named field
    #[error("Failed to encode field `{field}`: {source}")]
    FieldEncodingError {
        /// Name of the offending field
        field: String,
        /// Underlying value error
        #[source]
        source: Box<CoreError>,
    },

    /// Reveal data belongs to a different committed item than claimed
    #[error("Reveal for item {expected} matches the commitment of item {actual}")]
    WrongIdentityError {
        /// Identity the caller claimed
        expected: ItemId,
        /// Identity whose commitment the data actually matches
        actual: ItemId,
    },

    /// Reveal data matches no outstanding commitment
    #[error("Reveal for item {id} matches no known commitment")]
    UnknownCommitmentError {
        /// Identity the caller claimed
        id: ItemId,
    },

    /// Item has already been revealed
    #[error("Item {id} has already been revealed")]
    AlreadyRevealedError {
        /// Identity of the revealed item
        id: ItemId,
    },

    /// A commitment is already tracked under this identity
    #[error("Item {id} already has a commitment")]
    DuplicateIdentityError {
        /// Conflicting identity
        id: ItemId,
    },

    /// A salt was used for more than one commitment
    #[error("Salt reused by item {id}")]
    DuplicateSaltError {
        /// Identity of the item that first used the salt
        id: ItemId,
    },

    /// Assigned identities do not line up with a committed batch
    #[error("Batch holds {expected} commitments but {actual} identities were assigned")]
    BatchSizeMismatchError {
        /// Number of commitments in the batch
        expected: usize,
        /// Number of identities supplied
        actual: usize,
    },

    /// The execution environment refused a submission
    #[error("Submission error: {0}")]
    SubmissionError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// State management error
    #[error("State management error: {0}")]
    StateError(String),
}

/// Result type for the core crate
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Attach a field name to a value-level error
    pub fn in_field(self, field: impl Into<String>) -> Self {
        CoreError::FieldEncodingError {
            field: field.into(),
            source: Box::new(self),
        }
    }

    /// Name of the field the error was raised for, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            CoreError::FieldEncodingError { field, .. } => Some(field),
            CoreError::MissingFieldError { field } => Some(field),
            _ => None,
        }
    }

    /// Innermost error, skipping field context
    pub fn root_cause(&self) -> &CoreError {
        match self {
            CoreError::FieldEncodingError { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Convert a string error to a ConfigError
pub fn to_config_error<E: std::fmt::Display>(err: E) -> CoreError {
    CoreError::ConfigError(err.to_string())
}

/// Convert a string error to a StateError
pub fn to_state_error<E: std::fmt::Display>(err: E) -> CoreError {
    CoreError::StateError(err.to_string())
}
