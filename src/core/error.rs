//! Error types for SRT socket options.

use thiserror::Error;

use crate::config::Phase;

/// Errors raised by option validation, storage, and the handshake codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptionError {
    /// No option is registered under this name or id.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// Option cannot be changed in the socket's current phase.
    #[error("option {option} cannot be set in phase {phase:?}")]
    InvalidPhase {
        /// Option name.
        option: &'static str,
        /// Phase the socket was in.
        phase: Phase,
    },

    /// Size mismatch on a fixed type, undersized read buffer, or oversized write.
    #[error("invalid length for {option}: expected {expected}, got {actual}")]
    InvalidLength {
        /// Option name.
        option: &'static str,
        /// Required size (exact for fixed kinds, maximum or minimum otherwise).
        expected: usize,
        /// Size supplied by the caller.
        actual: usize,
    },

    /// Value fails the option's semantic predicate.
    #[error("invalid value for {option}: {reason}")]
    InvalidValue {
        /// Option name.
        option: &'static str,
        /// What the predicate rejected.
        reason: &'static str,
    },

    /// Peer declared a block longer than the local maximum for that option.
    #[error("extension block 0x{block_type:04x} declares {declared} bytes, limit is {max}")]
    ExtensionOverflow {
        /// Block type on the wire.
        block_type: u16,
        /// Declared logical length.
        declared: usize,
        /// Local maximum.
        max: usize,
    },

    /// Extension buffer ends inside a block.
    #[error("malformed extension: expected {expected} bytes, got {actual}")]
    MalformedExtension {
        /// Bytes needed to finish the current block.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },

    /// Local and peer values cannot be reconciled.
    #[error("negotiation of {option} failed: {reason}")]
    NegotiationFailed {
        /// Option name.
        option: &'static str,
        /// Why the values conflict.
        reason: &'static str,
    },
}

impl OptionError {
    /// Check if the handshake state machine must reject the connection attempt.
    pub fn rejects_connection(&self) -> bool {
        matches!(
            self,
            OptionError::ExtensionOverflow { .. }
                | OptionError::MalformedExtension { .. }
                | OptionError::NegotiationFailed { .. }
        )
    }

    /// Check if the error was caused by an application set/get call.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            OptionError::UnknownOption(_)
                | OptionError::InvalidPhase { .. }
                | OptionError::InvalidLength { .. }
                | OptionError::InvalidValue { .. }
        )
    }
}

/// Result type for option operations.
pub type OptionResult<T> = Result<T, OptionError>;
