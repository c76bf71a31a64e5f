//! XChaCha20-Poly1305 encryption layer.
//!
//! Outer layer of the passphrase cipher. The 192-bit nonce is drawn from the
//! caller's generator, so random nonces are safe even across the thousands of
//! independent groups a single split can produce.
//!
//! # Format
//!
//! `[Nonce (24 bytes)] || [Ciphertext] || [Auth Tag (16 bytes)]`

use anyhow::{Result, anyhow, ensure};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use rand::{CryptoRng, RngCore};

use crate::config::{CHACHA_NONCE_SIZE, KEY_SIZE};

/// Keyed XChaCha20-Poly1305 context.
pub struct ChaCha20Poly1305 {
    inner: XChaCha20Poly1305,
}

impl ChaCha20Poly1305 {
    /// Initializes a new context with the provided key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key length is invalid.
    #[inline]
    pub fn new(key: &[u8; KEY_SIZE]) -> Result<Self> {
        let inner = XChaCha20Poly1305::new_from_slice(key).map_err(|e| anyhow!("invalid chacha20poly1305 key: {e}"))?;
        Ok(Self { inner })
    }

    /// Encrypts the plaintext and prepends a fresh extended nonce.
    ///
    /// # Errors
    ///
    /// Returns an error if encryption fails.
    #[inline]
    pub fn encrypt<R: RngCore + CryptoRng + ?Sized>(&self, rng: &mut R, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut nonce = [0u8; CHACHA_NONCE_SIZE];
        rng.fill_bytes(&mut nonce);

        // The tag is appended by the inner encrypt.
        let mut result = self.inner.encrypt(XNonce::from_slice(&nonce), plaintext).map_err(|e| anyhow!("chacha20poly1305 encryption failed: {e}"))?;

        result.splice(0..0, nonce.iter().copied());

        Ok(result)
    }

    /// Decrypts the ciphertext using the prepended extended nonce.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The ciphertext is shorter than the nonce size.
    /// - The authentication tag verification fails.
    #[inline]
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        ensure!(ciphertext.len() >= CHACHA_NONCE_SIZE, "ciphertext too short: need at least {} bytes, got {}", CHACHA_NONCE_SIZE, ciphertext.len());

        let (nonce, data) = ciphertext.split_at(CHACHA_NONCE_SIZE);

        self.inner.decrypt(XNonce::from_slice(nonce), data).map_err(|_| anyhow!("chacha20poly1305 authentication failed"))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::config::TAG_SIZE;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let cipher = ChaCha20Poly1305::new(&[0u8; KEY_SIZE]).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let plaintext = b"Hello, XChaCha20!";

        let ciphertext = cipher.encrypt(&mut rng, plaintext).unwrap();
        assert_ne!(plaintext, &ciphertext[..]);

        // 24 (nonce) + 17 (plaintext) + 16 (tag)
        assert_eq!(ciphertext.len(), CHACHA_NONCE_SIZE + plaintext.len() + TAG_SIZE);

        let decrypted = cipher.decrypt(&ciphertext).unwrap();
        assert_eq!(plaintext, &decrypted[..]);
    }

    #[test]
    fn test_same_seed_same_ciphertext() {
        let cipher = ChaCha20Poly1305::new(&[0u8; KEY_SIZE]).unwrap();

        let first = cipher.encrypt(&mut StdRng::seed_from_u64(5), b"payload").unwrap();
        let second = cipher.encrypt(&mut StdRng::seed_from_u64(5), b"payload").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_decrypt_too_short() {
        let cipher = ChaCha20Poly1305::new(&[0u8; KEY_SIZE]).unwrap();
        let ciphertext = vec![0u8; CHACHA_NONCE_SIZE - 1];
        assert!(cipher.decrypt(&ciphertext).is_err());
    }

    #[test]
    fn test_decrypt_tampered_ciphertext() {
        let cipher = ChaCha20Poly1305::new(&[0u8; KEY_SIZE]).unwrap();
        let mut rng = StdRng::seed_from_u64(12);
        let mut ciphertext = cipher.encrypt(&mut rng, b"Secret Message").unwrap();

        ciphertext[CHACHA_NONCE_SIZE] ^= 0x01;

        let result = cipher.decrypt(&ciphertext);
        assert_eq!(result.unwrap_err().to_string(), "chacha20poly1305 authentication failed");
    }
}
