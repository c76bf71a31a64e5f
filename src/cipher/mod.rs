//! # Passphrase Encryption
//!
//! The symmetric primitive every group is sealed with. A group passphrase
//! never touches an AEAD directly: it is stretched with Argon2id under a
//! fresh salt, and the resulting 64 bytes key two authenticated layers.
//!
//! ## Ciphertext Layout
//!
//! ```text
//! salt (32) || XChaCha20-Poly1305( AES-256-GCM( plaintext ) )
//! ```
//!
//! Each AEAD layer prefixes its own random nonce and appends a 16-byte tag.
//! Any change to the salt, a nonce, the payload or a tag, and any wrong
//! passphrase, makes decryption fail instead of returning altered data.
//!
//! ## Architecture
//!
//! - [`Encryptor`]: the seam the split/merge engine depends on
//! - [`PassphraseCipher`]: the Argon2id + dual AEAD implementation
//! - [`Cipher`]: the keyed dual-layer cipher with type-level layer selection

use anyhow::{Context, Result, ensure};
use rand::{CryptoRng, RngCore};

mod aes_gcm;
mod chacha20poly1305;
mod derive;

pub use self::aes_gcm::AesGcm;
pub use self::chacha20poly1305::ChaCha20Poly1305;
pub use derive::{Derive, KdfParams};

use crate::config::{ARGON_KEY_LEN, ARGON_SALT_LEN, KEY_SIZE, MIN_CIPHERTEXT_LEN};

/// Marker types for compile-time layer selection.
pub mod algorithm {
    /// AES-256-GCM, the inner layer.
    pub struct Aes256Gcm;
    /// XChaCha20-Poly1305, the outer layer.
    pub struct XChaCha20Poly1305;
}

pub use algorithm::{Aes256Gcm, XChaCha20Poly1305};

/// Dispatches a [`Cipher`] operation to one of its layers.
pub trait CipherAlgorithm {
    fn encrypt<R: RngCore + CryptoRng + ?Sized>(cipher: &Cipher, rng: &mut R, plaintext: &[u8]) -> Result<Vec<u8>>;

    fn decrypt(cipher: &Cipher, ciphertext: &[u8]) -> Result<Vec<u8>>;
}

impl CipherAlgorithm for algorithm::Aes256Gcm {
    #[inline]
    fn encrypt<R: RngCore + CryptoRng + ?Sized>(cipher: &Cipher, rng: &mut R, plaintext: &[u8]) -> Result<Vec<u8>> {
        cipher.aes.encrypt(rng, plaintext)
    }

    #[inline]
    fn decrypt(cipher: &Cipher, ciphertext: &[u8]) -> Result<Vec<u8>> {
        cipher.aes.decrypt(ciphertext)
    }
}

impl CipherAlgorithm for algorithm::XChaCha20Poly1305 {
    #[inline]
    fn encrypt<R: RngCore + CryptoRng + ?Sized>(cipher: &Cipher, rng: &mut R, plaintext: &[u8]) -> Result<Vec<u8>> {
        cipher.chacha.encrypt(rng, plaintext)
    }

    #[inline]
    fn decrypt(cipher: &Cipher, ciphertext: &[u8]) -> Result<Vec<u8>> {
        cipher.chacha.decrypt(ciphertext)
    }
}

/// # Dual-Layer Cipher
///
/// The 64-byte derived key is split in half: the first 32 bytes key
/// AES-256-GCM, the second 32 bytes key XChaCha20-Poly1305.
pub struct Cipher {
    aes: AesGcm,
    chacha: ChaCha20Poly1305,
}

impl Cipher {
    /// Creates both layers from a derived key.
    ///
    /// # Errors
    ///
    /// Returns error if a sub-cipher cannot be initialized.
    pub fn new(key: &[u8; ARGON_KEY_LEN]) -> Result<Self> {
        let (aes_key, chacha_key) = key.split_at(KEY_SIZE);
        let aes_key: &[u8; KEY_SIZE] = aes_key.try_into().context("invalid AES key length")?;
        let chacha_key: &[u8; KEY_SIZE] = chacha_key.try_into().context("invalid ChaCha key length")?;

        Ok(Self { aes: AesGcm::new(aes_key)?, chacha: ChaCha20Poly1305::new(chacha_key)? })
    }

    #[inline]
    pub fn encrypt<A: CipherAlgorithm, R: RngCore + CryptoRng + ?Sized>(&self, rng: &mut R, plaintext: &[u8]) -> Result<Vec<u8>> {
        A::encrypt(self, rng, plaintext)
    }

    #[inline]
    pub fn decrypt<A: CipherAlgorithm>(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        A::decrypt(self, ciphertext)
    }
}

/// Symmetric encryption under a passphrase.
///
/// Implementations must be shareable across the worker threads that
/// generate groups. All randomness comes from `rng`.
pub trait Encryptor: Sync {
    /// Encrypts `plaintext` under `passphrase`.
    ///
    /// # Errors
    ///
    /// Returns an error if the primitive fails.
    fn encrypt<R: RngCore + CryptoRng + ?Sized>(&self, passphrase: &[u8], plaintext: &[u8], rng: &mut R) -> Result<Vec<u8>>;

    /// Decrypts `ciphertext` under `passphrase`.
    ///
    /// # Errors
    ///
    /// Returns an error if the passphrase is wrong or the ciphertext was
    /// altered.
    fn decrypt(&self, passphrase: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>>;
}

/// Argon2id + AES-256-GCM + XChaCha20-Poly1305.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassphraseCipher {
    kdf: KdfParams,
}

impl PassphraseCipher {
    /// Creates a cipher deriving keys with the given cost parameters.
    ///
    /// # Errors
    ///
    /// Returns error if Argon2 rejects the parameters.
    pub fn new(kdf: KdfParams) -> Result<Self> {
        kdf.validate()?;
        Ok(Self { kdf })
    }

    #[inline]
    #[must_use]
    pub const fn kdf(&self) -> &KdfParams {
        &self.kdf
    }

    fn keyed(&self, passphrase: &[u8], salt: &[u8]) -> Result<Cipher> {
        let key = Derive::new(passphrase)?.derive_key(salt, &self.kdf)?;
        Cipher::new(&key)
    }
}

impl Encryptor for PassphraseCipher {
    fn encrypt<R: RngCore + CryptoRng + ?Sized>(&self, passphrase: &[u8], plaintext: &[u8], rng: &mut R) -> Result<Vec<u8>> {
        let salt: [u8; ARGON_SALT_LEN] = Derive::generate_salt(rng);
        let cipher = self.keyed(passphrase, &salt)?;

        let aes_encrypted = cipher.encrypt::<Aes256Gcm, _>(rng, plaintext)?;
        let chacha_encrypted = cipher.encrypt::<XChaCha20Poly1305, _>(rng, &aes_encrypted)?;

        let mut result = Vec::with_capacity(ARGON_SALT_LEN + chacha_encrypted.len());
        result.extend_from_slice(&salt);
        result.extend_from_slice(&chacha_encrypted);
        Ok(result)
    }

    fn decrypt(&self, passphrase: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        ensure!(ciphertext.len() >= MIN_CIPHERTEXT_LEN, "ciphertext too short: need at least {} bytes, got {}", MIN_CIPHERTEXT_LEN, ciphertext.len());

        let (salt, data) = ciphertext.split_at(ARGON_SALT_LEN);
        let cipher = self.keyed(passphrase, salt)?;

        let chacha_decrypted = cipher.decrypt::<XChaCha20Poly1305>(data).context("chacha20poly1305 decrypt")?;
        cipher.decrypt::<Aes256Gcm>(&chacha_decrypted).context("aes256gcm decrypt")
    }
}
