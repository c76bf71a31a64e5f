//! Share artifact codec.
//!
//! # Layout
//!
//! ```text
//! +-------+---------+--------------+----------------------------------+
//! | magic | version | crc32(body)  | body                             |
//! | 4 BE  | 2 BE    | 4 BE         | wincode(Artifact)                |
//! +-------+---------+--------------+----------------------------------+
//! ```
//!
//! The envelope prefix is checked before the body is decoded, so a file
//! that is not a share, comes from a newer format or was damaged is
//! rejected without interpreting its contents.

use wincode::config::Configuration;
use wincode::{SchemaRead, SchemaWrite};

use crate::config::{CURRENT_VERSION, ENVELOPE_HEADER_SIZE, MAGIC_BYTES, MAX_ARTIFACT_ALLOCATION};
use crate::error::{Result, SplitError};
use crate::types::Share;

pub mod parameter;

pub use parameter::Parameters;

/// Everything one output file holds.
#[derive(Debug, Clone, PartialEq, Eq, SchemaRead, SchemaWrite)]
pub struct Artifact {
    pub parameters: Parameters,
    pub share: Share,
}

impl Artifact {
    #[inline]
    #[must_use]
    pub const fn new(parameters: Parameters, share: Share) -> Self {
        Self { parameters, share }
    }

    /// Serializes the artifact into its on-disk form.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::MalformedArtifact`] if the body cannot be
    /// serialized.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let body = wincode::config::serialize(self, Configuration::default().with_preallocation_size_limit::<MAX_ARTIFACT_ALLOCATION>()).map_err(|e| SplitError::malformed(format!("cannot serialize artifact: {e}")))?;
        let checksum = crc32fast::hash(&body);

        let mut out = Vec::with_capacity(ENVELOPE_HEADER_SIZE + body.len());
        out.extend_from_slice(&MAGIC_BYTES.to_be_bytes());
        out.extend_from_slice(&CURRENT_VERSION.to_be_bytes());
        out.extend_from_slice(&checksum.to_be_bytes());
        out.extend_from_slice(&body);

        Ok(out)
    }

    /// Parses and validates an artifact.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::MalformedArtifact`] on bad magic, an unknown
    /// version, a checksum mismatch, truncation, an undecodable body or
    /// invalid parameters.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < ENVELOPE_HEADER_SIZE {
            return Err(SplitError::malformed(format!("{} bytes is too short for a share", bytes.len())));
        }

        let (header, body) = bytes.split_at(ENVELOPE_HEADER_SIZE);
        let magic = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
        let version = u16::from_be_bytes([header[4], header[5]]);
        let checksum = u32::from_be_bytes([header[6], header[7], header[8], header[9]]);

        if magic != MAGIC_BYTES {
            return Err(SplitError::malformed("invalid magic bytes"));
        }

        if version != CURRENT_VERSION {
            return Err(SplitError::malformed(format!("unsupported version {version}")));
        }

        if body.len() > MAX_ARTIFACT_ALLOCATION {
            return Err(SplitError::malformed(format!("{} byte body exceeds {MAX_ARTIFACT_ALLOCATION} bytes", body.len())));
        }

        let actual = crc32fast::hash(body);
        if actual != checksum {
            return Err(SplitError::malformed(format!("checksum mismatch: stored {checksum:08x}, computed {actual:08x}")));
        }

        let config = Configuration::default().with_preallocation_size_limit::<MAX_ARTIFACT_ALLOCATION>();
        let artifact: Self = wincode::config::deserialize(body, config).map_err(|e| SplitError::malformed(format!("undecodable body: {e}")))?;
        artifact.validate()?;

        Ok(artifact)
    }

    fn validate(&self) -> Result<()> {
        self.parameters.validate()?;

        if self.share.required_pieces == 0 || self.share.required_pieces > self.parameters.share_count {
            return Err(SplitError::malformed(format!("{} required pieces for {} shares", self.share.required_pieces, self.parameters.share_count)));
        }

        Ok(())
    }
}
