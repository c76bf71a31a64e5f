//! # Key Derivation with Argon2id
//!
//! Turns a group passphrase and a per-ciphertext salt into the 64 bytes of
//! key material the dual-layer cipher needs. The cost parameters are chosen
//! at split time and travel with every artifact, so a merge always derives
//! with the parameters the split used.
use anyhow::{Result, anyhow, ensure};
use argon2::Algorithm::Argon2id;
use argon2::Version::V0x13;
use argon2::{Argon2, Params};
use rand::{CryptoRng, RngCore};

use crate::config::{ARGON_KEY_LEN, ARGON_MEMORY, ARGON_THREADS, ARGON_TIME, MAX_KDF_MEMORY, MAX_KDF_TIME};

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory: u32,
    /// Number of passes.
    pub time: u32,
    /// Number of lanes.
    pub parallelism: u32,
}

impl KdfParams {
    #[must_use]
    pub const fn new(memory: u32, time: u32, parallelism: u32) -> Self {
        Self { memory, time, parallelism }
    }

    /// Checks the parameters against the limits Argon2 accepts and the
    /// cost ceilings in [`crate::config`].
    ///
    /// # Errors
    ///
    /// Returns an error if a cost is above its ceiling or Argon2 rejects
    /// any of the values.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.memory <= MAX_KDF_MEMORY, "argon2 memory cost {} KiB exceeds {MAX_KDF_MEMORY} KiB", self.memory);
        ensure!(self.time <= MAX_KDF_TIME, "argon2 time cost {} exceeds {MAX_KDF_TIME}", self.time);
        self.argon_params().map(|_| ())
    }

    fn argon_params(&self) -> Result<Params> {
        Params::new(self.memory, self.time, self.parallelism, Some(ARGON_KEY_LEN)).map_err(|e| anyhow!("invalid argon2 parameter: {e}"))
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::new(ARGON_MEMORY, ARGON_TIME, ARGON_THREADS)
    }
}

/// # Key Derivation Function
///
/// Wrapper for Argon2id (v1.3) key derivation over passphrase bytes.
pub struct Derive<'a> {
    key: &'a [u8],
}

impl<'a> Derive<'a> {
    /// Creates a new key derivation instance.
    ///
    /// # Errors
    ///
    /// Returns error if the passphrase is empty.
    pub fn new(key: &'a [u8]) -> Result<Self> {
        ensure!(!key.is_empty(), "key cannot be empty");
        Ok(Self { key })
    }

    /// Derives a 64-byte key using Argon2id.
    ///
    /// # Errors
    ///
    /// Returns error if the parameters are out of range or derivation fails.
    pub fn derive_key(&self, salt: &[u8], params: &KdfParams) -> Result<[u8; ARGON_KEY_LEN]> {
        let argon2 = Argon2::new(Argon2id, V0x13, params.argon_params()?);

        let mut key = [0u8; ARGON_KEY_LEN];
        argon2.hash_password_into(self.key, salt, &mut key).map_err(|e| anyhow!("key derivation failed: {e}"))?;

        Ok(key)
    }

    /// Draws a salt of `N` bytes from the given generator.
    pub fn generate_salt<const N: usize, R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> [u8; N] {
        let mut bytes = [0u8; N];
        rng.fill_bytes(&mut bytes);
        bytes
    }
}
