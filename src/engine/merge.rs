//! Reconstruction from a set of shares.
//!
//! Chunks of all supplied shares are pooled by group. The first group, in
//! order of first appearance, that has every chunk index `0..r` is
//! reassembled and decrypted. Any complete group yields the original
//! contents, so no alternative is tried when it fails.

use hashbrown::HashMap;
use subtle::ConstantTimeEq;
use tracing::{debug, info};

use crate::cipher::Encryptor;
use crate::engine::splitter;
use crate::error::{Result, SplitError};
use crate::secret::Passphrase;
use crate::types::{Chunk, ChunkIndex, GroupId, Share};

/// Outcome of a successful merge.
#[derive(Debug)]
pub struct Merged {
    /// The reconstructed contents.
    pub data: Vec<u8>,
    /// Group that was decrypted.
    pub group: GroupId,
    /// Number of complete groups present among the shares.
    pub complete_groups: usize,
}

/// Chunks of the supplied shares keyed by group and chunk index.
///
/// Groups remember the order they were first seen in; a later chunk with
/// the same group and index replaces the earlier one.
#[derive(Debug, Default)]
pub struct ChunkPool<'a> {
    order: Vec<GroupId>,
    groups: HashMap<GroupId, HashMap<ChunkIndex, &'a Chunk>>,
}

impl<'a> ChunkPool<'a> {
    /// Pools the chunks of `shares`, share by share in the order given.
    pub fn new(shares: &'a [Share]) -> Self {
        let mut pool = Self::default();
        for chunk in shares.iter().flat_map(|share| &share.chunks) {
            pool.insert(chunk);
        }
        pool
    }

    fn insert(&mut self, chunk: &'a Chunk) {
        let entry = self.groups.entry(chunk.group).or_insert_with(|| {
            self.order.push(chunk.group);
            HashMap::new()
        });
        entry.insert(chunk.index, chunk);
    }

    /// Number of distinct groups seen.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Groups holding exactly the indices `0..required`, in first-seen order.
    pub fn complete_groups(&self, required: u32) -> Vec<GroupId> {
        self.order
            .iter()
            .copied()
            .filter(|group| self.groups.get(group).is_some_and(|chunks| chunks.len() == required as usize && (0..required).all(|index| chunks.contains_key(&index))))
            .collect()
    }

    /// The `required` chunks of `group`, ordered by index.
    ///
    /// Returns `None` unless the group is complete.
    pub fn ordered(&self, group: GroupId, required: u32) -> Option<Vec<&'a Chunk>> {
        let chunks = self.groups.get(&group)?;
        (0..required).map(|index| chunks.get(&index).copied()).collect()
    }
}

/// Merges shares back into the original contents.
pub struct MergeEngine<'a, E> {
    encryptor: &'a E,
    verify: bool,
}

impl<'a, E: Encryptor> MergeEngine<'a, E> {
    #[inline]
    pub fn new(encryptor: &'a E) -> Self {
        Self { encryptor, verify: false }
    }

    /// Also decrypts every other complete group and requires all of them
    /// to agree with the first.
    #[inline]
    #[must_use]
    pub fn verify_all(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Reconstructs the contents the shares were split from.
    ///
    /// # Errors
    ///
    /// - [`SplitError::InconsistentArtifacts`] if the shares disagree on the
    ///   required piece count.
    /// - [`SplitError::InsufficientShares`] if fewer shares than required
    ///   were supplied.
    /// - [`SplitError::NoCompleteGroup`] if no group has all of its chunks.
    /// - [`SplitError::DecryptionFailed`] if the complete group does not
    ///   decrypt.
    /// - [`SplitError::DivergentGroups`] if verification is enabled and two
    ///   complete groups disagree.
    pub fn merge(&self, shares: &[Share]) -> Result<Merged> {
        let Some(first) = shares.first() else {
            return Err(SplitError::InsufficientShares { found: 0, required: 1 });
        };

        let required = first.required_pieces;
        if required == 0 {
            return Err(SplitError::malformed("share #1 requires zero pieces"));
        }

        for (position, share) in shares.iter().enumerate().skip(1) {
            if share.required_pieces != required {
                return Err(SplitError::InconsistentArtifacts {
                    share: position + 1,
                    reason: format!("requires {} pieces, expected {required}", share.required_pieces),
                });
            }
        }

        if shares.len() < required as usize {
            return Err(SplitError::InsufficientShares { found: shares.len(), required: required as usize });
        }

        let pool = ChunkPool::new(shares);
        let complete = pool.complete_groups(required);
        debug!(groups = pool.len(), complete = complete.len(), "pooled chunks");

        let Some(&group) = complete.first() else {
            return Err(SplitError::NoCompleteGroup { shares: shares.len() });
        };

        info!(group, "found a complete group, merging");
        let data = self.decrypt_group(&pool, group, required)?;

        if self.verify {
            for &other in &complete[1..] {
                let candidate = self.decrypt_group(&pool, other, required)?;
                if !bool::from(data.ct_eq(&candidate)) {
                    return Err(SplitError::DivergentGroups { first: group, second: other });
                }
                debug!(group = other, "complete group agrees");
            }
        }

        Ok(Merged { data, group, complete_groups: complete.len() })
    }

    fn decrypt_group(&self, pool: &ChunkPool<'_>, group: GroupId, required: u32) -> Result<Vec<u8>> {
        let chunks = pool.ordered(group, required).ok_or(SplitError::NoCompleteGroup { shares: 0 })?;

        let passphrase = Passphrase::from_fragments(chunks.iter().map(|chunk| chunk.passphrase.as_slice()));
        let ciphertext = splitter::join(chunks.iter().map(|chunk| chunk.ciphertext.as_slice()));

        self.encryptor.decrypt(passphrase.expose_secret(), &ciphertext).map_err(|e| SplitError::DecryptionFailed { group, reason: format!("{e:#}") })
    }
}
