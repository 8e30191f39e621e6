//! Structural validation errors for domain types.

use thiserror::Error;

/// Error from basic structural validation of blocks and headers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The header carries no chain identifier.
    #[error("empty chain id")]
    EmptyChainId,

    /// The header height is zero.
    #[error("zero block height")]
    ZeroHeight,

    /// The header carries no proposer address.
    #[error("missing proposer address")]
    MissingProposer,

    /// A filled intermediate-state-root list has the wrong length.
    #[error("invalid length of ISR list: {got}, expected length: {expected}")]
    InvalidIsrLength {
        /// Required length, transaction count plus three.
        expected: usize,
        /// Observed length.
        got: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_strings() {
        assert_eq!(ValidationError::EmptyChainId.to_string(), "empty chain id");
        assert_eq!(
            ValidationError::InvalidIsrLength { expected: 5, got: 3 }.to_string(),
            "invalid length of ISR list: 3, expected length: 5"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ValidationError>();
    }
}
