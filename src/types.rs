//! Common type definitions for SplitByte.
//!
//! # Overview
//!
//! - [`Chunk`]: one passphrase fragment plus one ciphertext fragment of a group
//! - [`Share`]: everything one output artifact holds
//! - [`SplitParams`]: validated share count and threshold
//! - [`Operation`]: labels for progress and result output
//! - [`ShareInfo`]: what `inspect` reports about one file

use std::fmt::{self, Debug, Display, Formatter};
use std::path::PathBuf;

use wincode::{SchemaRead, SchemaWrite};

use crate::artifact::Parameters;
use crate::error::{Result, SplitError};

/// Rank of an `r`-subset of share indices in lexicographic enumeration order.
pub type GroupId = u64;

/// Position of a chunk within its group, `0..r`.
pub type ChunkIndex = u32;

/// Index of an output share, `0..n`.
pub type ShareIndex = u32;

/// Smallest distributed unit: one fragment of a group's passphrase and the
/// matching fragment of its ciphertext.
#[derive(Clone, PartialEq, Eq, SchemaRead, SchemaWrite)]
pub struct Chunk {
    /// Group this chunk belongs to.
    pub group: GroupId,

    /// Position of the fragments within the group.
    pub index: ChunkIndex,

    /// Fragment of the group passphrase.
    pub passphrase: Vec<u8>,

    /// Fragment of the group ciphertext.
    pub ciphertext: Vec<u8>,
}

impl Debug for Chunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("group", &self.group)
            .field("index", &self.index)
            .field("passphrase", &format_args!("[... {} bytes ...]", self.passphrase.len()))
            .field("ciphertext", &format_args!("[... {} bytes ...]", self.ciphertext.len()))
            .finish()
    }
}

/// The chunks owned by one output index.
///
/// Chunk order carries no meaning; merging sorts by group and index.
#[derive(Debug, Clone, PartialEq, Eq, SchemaRead, SchemaWrite)]
pub struct Share {
    /// Number of shares needed to rebuild the file.
    pub required_pieces: u32,

    /// Every chunk this share participates in.
    pub chunks: Vec<Chunk>,
}

impl Share {
    /// Distinct groups this share holds a chunk of, in stored order.
    pub fn groups(&self) -> Vec<GroupId> {
        let mut groups: Vec<GroupId> = Vec::with_capacity(self.chunks.len());
        for chunk in &self.chunks {
            if !groups.contains(&chunk.group) {
                groups.push(chunk.group);
            }
        }
        groups
    }
}

/// Validated pair of share count `n` and threshold `r`.
///
/// Enforces `1 <= r <= n` so a split can never produce shares that no
/// selection is able to reconstruct from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitParams {
    share_count: usize,
    threshold: usize,
}

impl SplitParams {
    /// Creates split parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidParameters`] if `share_count` is zero,
    /// `threshold` is zero, `threshold` exceeds `share_count`, or either
    /// does not fit the artifact format.
    pub fn new(share_count: usize, threshold: usize) -> Result<Self> {
        if share_count == 0 {
            return Err(SplitError::invalid("share count must be at least 1"));
        }
        if threshold == 0 {
            return Err(SplitError::invalid("required pieces must be at least 1"));
        }
        if threshold > share_count {
            return Err(SplitError::invalid(format!("required pieces {threshold} cannot exceed share count {share_count}")));
        }
        if u32::try_from(share_count).is_err() {
            return Err(SplitError::invalid(format!("share count {share_count} is too large")));
        }

        Ok(Self { share_count, threshold })
    }

    /// Total number of shares `n`.
    #[inline]
    #[must_use]
    pub const fn share_count(&self) -> usize {
        self.share_count
    }

    /// Shares required to reconstruct, `r`.
    #[inline]
    #[must_use]
    pub const fn threshold(&self) -> usize {
        self.threshold
    }
}

/// A user-facing operation, used for progress and result labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Operation {
    /// Splitting a file into shares.
    #[strum(to_string = "Split")]
    Split,

    /// Merging shares back into a file.
    #[strum(to_string = "Merge")]
    Merge,
}

impl Operation {
    /// Returns a progress label for the operation.
    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Self::Split => "Generating groups...",
            Self::Merge => "Merging...",
        }
    }
}

/// Summary of one file passed to `inspect`.
#[derive(Debug, Clone)]
pub struct ShareInfo {
    pub path: PathBuf,
    pub size: u64,
    pub status: ShareStatus,
}

/// Decoded contents of an inspected file, or why it could not be decoded.
#[derive(Debug, Clone)]
pub enum ShareStatus {
    Valid {
        parameters: Parameters,
        required_pieces: u32,
        chunks: usize,
        groups: usize,
    },
    Malformed(String),
}

impl Display for Chunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "group {} chunk {}", self.group, self.index)
    }
}
