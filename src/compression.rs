//! Zstd compression applied once to the input before splitting.

use anyhow::{Context, Result};
use strum::{Display, FromRepr};

use crate::config::{COMPRESSION_NONE, COMPRESSION_ZSTD, ZSTD_LEVEL};

/// Compression mode recorded in every artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, FromRepr)]
#[repr(u8)]
pub enum Compression {
    #[strum(to_string = "none")]
    None = COMPRESSION_NONE,
    #[default]
    #[strum(to_string = "zstd")]
    Zstd = COMPRESSION_ZSTD,
}

impl Compression {
    /// Identifier stored in the artifact parameters.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Parses a stored identifier.
    #[inline]
    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        Self::from_repr(id)
    }

    pub fn compress(self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::None => Ok(data.to_vec()),
            Self::Zstd => zstd::encode_all(data, ZSTD_LEVEL).context("zstd compression failed"),
        }
    }

    pub fn decompress(self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::None => Ok(data.to_vec()),
            Self::Zstd => zstd::decode_all(data).context("zstd decompression failed"),
        }
    }
}
