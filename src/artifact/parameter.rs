//! Parameters block stored in every share artifact.
//!
//! Records how the split was produced so merge can decode the shares
//! without any flags: the cipher suite, the Argon2id costs, whether the
//! payload was compressed and where this share sits among its siblings.

use wincode::{SchemaRead, SchemaWrite};

use crate::cipher::KdfParams;
use crate::compression::Compression;
use crate::config::{ALGORITHM_AES_256_GCM, ALGORITHM_CHACHA20_POLY1305, CURRENT_VERSION, KDF_ARGON2};
use crate::error::{Result, SplitError};
use crate::types::{ShareIndex, SplitParams};

/// Split settings carried by a share artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, SchemaRead, SchemaWrite)]
pub struct Parameters {
    /// Artifact format version (must match [`CURRENT_VERSION`]).
    pub version: u16,
    /// Encryption algorithms used for every group (bit flags).
    pub algorithm: u8,
    /// Key derivation function identifier.
    pub kdf: u8,
    /// Argon2id memory cost in KiB.
    pub kdf_memory: u32,
    /// Argon2id time cost.
    pub kdf_time: u32,
    /// Argon2id parallelism.
    pub kdf_parallelism: u32,
    /// Compression applied to the payload before splitting.
    pub compression: u8,
    /// Index of this share, `0..share_count`.
    pub share_index: ShareIndex,
    /// Number of shares the file was split into.
    pub share_count: u32,
}

impl Parameters {
    /// Parameters for share `share_index` of a split.
    #[must_use]
    pub fn new(params: SplitParams, kdf: KdfParams, compression: Compression, share_index: ShareIndex) -> Self {
        Self {
            version: CURRENT_VERSION,
            algorithm: ALGORITHM_AES_256_GCM | ALGORITHM_CHACHA20_POLY1305,
            kdf: KDF_ARGON2,
            kdf_memory: kdf.memory,
            kdf_time: kdf.time,
            kdf_parallelism: kdf.parallelism,
            compression: compression.id(),
            share_index,
            share_count: params.share_count() as u32,
        }
    }

    /// Rejects versions, algorithms and identifiers this build cannot decode.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::MalformedArtifact`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.version != CURRENT_VERSION {
            return Err(SplitError::malformed(format!("unsupported version {}", self.version)));
        }

        if self.algorithm != (ALGORITHM_AES_256_GCM | ALGORITHM_CHACHA20_POLY1305) {
            return Err(SplitError::malformed(format!("invalid algorithm flags {:#04x}", self.algorithm)));
        }

        if self.kdf != KDF_ARGON2 {
            return Err(SplitError::malformed(format!("invalid kdf {:#04x}", self.kdf)));
        }

        if Compression::from_id(self.compression).is_none() {
            return Err(SplitError::malformed(format!("invalid compression {:#04x}", self.compression)));
        }

        if self.share_count == 0 || self.share_index >= self.share_count {
            return Err(SplitError::malformed(format!("share index {} out of range for {} shares", self.share_index, self.share_count)));
        }

        self.kdf_params().validate().map_err(|e| SplitError::malformed(format!("{e:#}")))
    }

    /// Argon2id costs the groups were encrypted with.
    #[inline]
    #[must_use]
    pub const fn kdf_params(&self) -> KdfParams {
        KdfParams::new(self.kdf_memory, self.kdf_time, self.kdf_parallelism)
    }

    /// Compression mode, falling back to none for unknown ids.
    ///
    /// Unknown ids never pass [`Parameters::validate`].
    #[inline]
    #[must_use]
    pub fn compression(&self) -> Compression {
        Compression::from_id(self.compression).unwrap_or(Compression::None)
    }

    /// Describes the first field, other than the share index, on which
    /// `other` disagrees with `self`.
    #[must_use]
    pub fn mismatch(&self, other: &Self) -> Option<String> {
        let fields: [(&str, u64, u64); 8] = [
            ("version", self.version.into(), other.version.into()),
            ("algorithm", self.algorithm.into(), other.algorithm.into()),
            ("kdf", self.kdf.into(), other.kdf.into()),
            ("kdf_memory", self.kdf_memory.into(), other.kdf_memory.into()),
            ("kdf_time", self.kdf_time.into(), other.kdf_time.into()),
            ("kdf_parallelism", self.kdf_parallelism.into(), other.kdf_parallelism.into()),
            ("compression", self.compression.into(), other.compression.into()),
            ("share_count", self.share_count.into(), other.share_count.into()),
        ];

        fields.into_iter().find(|(_, mine, theirs)| mine != theirs).map(|(name, mine, theirs)| format!("{name} is {theirs}, expected {mine}"))
    }
}
