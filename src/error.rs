//! Error types for splitting and merging.

use crate::types::GroupId;

/// Errors surfaced by the split/merge engine and the artifact codec.
///
/// Every variant is terminal for the operation that produced it.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    /// Share count or threshold out of range at split time.
    #[error("invalid parameters: {reason}")]
    InvalidParameters {
        /// What was wrong with the requested split.
        reason: String,
    },

    /// Fewer shares were supplied than the artifacts require.
    #[error("found {found} out of {required} required shares")]
    InsufficientShares {
        /// Distinct shares actually supplied.
        found: usize,
        /// Shares required by the artifacts.
        required: usize,
    },

    /// The supplied shares do not belong to the same split.
    #[error("share #{share} is inconsistent with the first readable share: {reason}")]
    InconsistentArtifacts {
        /// One-based position of the offending share in the input.
        share: usize,
        /// Which field disagreed.
        reason: String,
    },

    /// An artifact could not be decoded.
    #[error("malformed share artifact: {reason}")]
    MalformedArtifact {
        /// Why decoding failed.
        reason: String,
    },

    /// Enough shares were supplied but none of their groups is complete.
    #[error("no complete group found among {shares} shares")]
    NoCompleteGroup {
        /// Number of shares that were scanned.
        shares: usize,
    },

    /// A complete group was found but its material did not decrypt.
    #[error("group {group} failed to decrypt: {reason}")]
    DecryptionFailed {
        /// The group whose chunks were reassembled.
        group: GroupId,
        /// Error reported by the cipher.
        reason: String,
    },

    /// The encryption primitive failed while generating a group.
    #[error("group {group} failed to encrypt: {reason}")]
    EncryptionFailed {
        /// The group being generated.
        group: GroupId,
        /// Error reported by the cipher.
        reason: String,
    },

    /// Two complete groups decrypted to different contents.
    #[error("complete groups {first} and {second} decrypt to different contents")]
    DivergentGroups {
        /// Group used for the reconstruction.
        first: GroupId,
        /// Group that disagreed with it.
        second: GroupId,
    },
}

impl SplitError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParameters { reason: reason.into() }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedArtifact { reason: reason.into() }
    }
}

/// Result alias used throughout the engine.
pub type Result<T, E = SplitError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_shares_message() {
        let err = SplitError::InsufficientShares { found: 1, required: 2 };
        assert_eq!(err.to_string(), "found 1 out of 2 required shares");
    }

    #[test]
    fn test_decryption_failed_names_group() {
        let err = SplitError::DecryptionFailed { group: 7, reason: "aes-gcm authentication failed".into() };
        assert_eq!(err.to_string(), "group 7 failed to decrypt: aes-gcm authentication failed");
    }
}
