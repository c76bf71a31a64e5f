use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use anyhow::{Result, anyhow, ensure};
use rand::{CryptoRng, RngCore};

use crate::config::{AES_NONCE_SIZE, KEY_SIZE};

pub struct AesGcm {
    inner: Aes256Gcm,
}

impl AesGcm {
    #[inline]
    pub fn new(key: &[u8; KEY_SIZE]) -> Result<Self> {
        let inner = Aes256Gcm::new_from_slice(key).map_err(|e| anyhow!("invalid aes-gcm key: {e}"))?;
        Ok(Self { inner })
    }

    #[inline]
    pub fn encrypt<R: RngCore + CryptoRng + ?Sized>(&self, rng: &mut R, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut nonce = [0u8; AES_NONCE_SIZE];
        rng.fill_bytes(&mut nonce);

        let mut result = self.inner.encrypt(Nonce::from_slice(&nonce), plaintext).map_err(|e| anyhow!("aes-gcm encryption failed: {e}"))?;

        result.splice(0..0, nonce.iter().copied());
        Ok(result)
    }

    #[inline]
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        ensure!(ciphertext.len() >= AES_NONCE_SIZE, "ciphertext too short: need at least {} bytes, got {}", AES_NONCE_SIZE, ciphertext.len());

        let (nonce, data) = ciphertext.split_at(AES_NONCE_SIZE);
        self.inner.decrypt(Nonce::from_slice(nonce), data).map_err(|_| anyhow!("aes-gcm authentication failed"))
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
        let cipher = AesGcm::new(&[7u8; KEY_SIZE]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let ciphertext = cipher.encrypt(&mut rng, b"Hello, AES!").unwrap();
        assert_eq!(ciphertext.len(), AES_NONCE_SIZE + 11 + TAG_SIZE);

        assert_eq!(cipher.decrypt(&ciphertext).unwrap(), b"Hello, AES!");
    }

    #[test]
    fn test_encrypt_empty_plaintext() {
        let cipher = AesGcm::new(&[7u8; KEY_SIZE]).unwrap();
        let mut rng = StdRng::seed_from_u64(2);

        let ciphertext = cipher.encrypt(&mut rng, &[]).unwrap();
        assert!(cipher.decrypt(&ciphertext).unwrap().is_empty());
    }

    #[test]
    fn test_decrypt_tampered_ciphertext() {
        let cipher = AesGcm::new(&[7u8; KEY_SIZE]).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mut ciphertext = cipher.encrypt(&mut rng, b"Secret Message").unwrap();

        ciphertext[AES_NONCE_SIZE] ^= 0x01;

        let result = cipher.decrypt(&ciphertext);
        assert_eq!(result.unwrap_err().to_string(), "aes-gcm authentication failed");
    }

    #[test]
    fn test_decrypt_too_short() {
        let cipher = AesGcm::new(&[7u8; KEY_SIZE]).unwrap();
        assert!(cipher.decrypt(&[0u8; AES_NONCE_SIZE - 1]).is_err());
    }
}
