//! Generation of a single group.
//!
//! A group is a fresh passphrase, the file encrypted under it, and both cut
//! into `r` chunks. Any `r - 1` chunks hold neither the whole passphrase nor
//! the whole ciphertext.

use rand::{CryptoRng, Rng, RngCore};
use tracing::debug;

use crate::cipher::Encryptor;
use crate::config::{PASSPHRASE_ALPHABET, PASSPHRASE_LENGTH};
use crate::engine::splitter;
use crate::error::{Result, SplitError};
use crate::secret::Passphrase;
use crate::types::{Chunk, ChunkIndex, GroupId};

/// Draws a [`PASSPHRASE_LENGTH`] character passphrase from
/// [`PASSPHRASE_ALPHABET`].
pub fn generate_passphrase<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Passphrase {
    let data = (0..PASSPHRASE_LENGTH).map(|_| PASSPHRASE_ALPHABET[rng.random_range(0..PASSPHRASE_ALPHABET.len())]).collect();
    Passphrase::from_vec(data)
}

/// Builds the chunks of one group.
pub struct GroupGenerator<'a, E> {
    encryptor: &'a E,
    threshold: usize,
}

impl<'a, E: Encryptor> GroupGenerator<'a, E> {
    #[inline]
    pub fn new(encryptor: &'a E, threshold: usize) -> Self {
        Self { encryptor, threshold }
    }

    /// Generates group `group` for `data`.
    ///
    /// Returns exactly `threshold` chunks with indices `0..threshold` in
    /// ascending order. When the ciphertext or the passphrase is shorter
    /// than `threshold` bytes the trailing chunks carry empty fragments.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::EncryptionFailed`] if the encryptor fails.
    pub fn generate<R: RngCore + CryptoRng + ?Sized>(&self, group: GroupId, data: &[u8], rng: &mut R) -> Result<Vec<Chunk>> {
        let passphrase = generate_passphrase(rng);
        let ciphertext = self
            .encryptor
            .encrypt(passphrase.expose_secret(), data, rng)
            .map_err(|e| SplitError::EncryptionFailed { group, reason: format!("{e:#}") })?;

        let passphrase_pieces = splitter::split(passphrase.expose_secret(), self.threshold);
        let ciphertext_pieces = splitter::split(&ciphertext, self.threshold);

        debug!(group, ciphertext_len = ciphertext.len(), pieces = ciphertext_pieces.len(), "generated group");

        let chunks = (0..self.threshold)
            .map(|position| Chunk {
                group,
                index: position as ChunkIndex,
                passphrase: passphrase_pieces.get(position).map_or_else(Vec::new, |piece| piece.to_vec()),
                ciphertext: ciphertext_pieces.get(position).map_or_else(Vec::new, |piece| piece.to_vec()),
            })
            .collect();

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::cipher::{KdfParams, PassphraseCipher};

    fn cipher() -> PassphraseCipher {
        PassphraseCipher::new(KdfParams::new(8, 1, 1)).unwrap()
    }

    struct FailingEncryptor;

    impl Encryptor for FailingEncryptor {
        fn encrypt<R: RngCore + CryptoRng + ?Sized>(&self, _: &[u8], _: &[u8], _: &mut R) -> anyhow::Result<Vec<u8>> {
            Err(anyhow!("primitive unavailable"))
        }

        fn decrypt(&self, _: &[u8], _: &[u8]) -> anyhow::Result<Vec<u8>> {
            Err(anyhow!("primitive unavailable"))
        }
    }

    #[test]
    fn test_passphrase_length_and_alphabet() {
        let passphrase = generate_passphrase(&mut StdRng::seed_from_u64(1));
        assert_eq!(passphrase.len(), PASSPHRASE_LENGTH);
        assert!(passphrase.expose_secret().iter().all(|b| PASSPHRASE_ALPHABET.contains(b)));
    }

    #[test]
    fn test_alphabet_is_printable_ascii() {
        assert_eq!(PASSPHRASE_ALPHABET.len(), 100);
        let mut sorted = PASSPHRASE_ALPHABET.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 100);
    }

    #[test]
    fn test_passphrases_are_independent() {
        let mut rng = StdRng::seed_from_u64(2);
        let first = generate_passphrase(&mut rng);
        let second = generate_passphrase(&mut rng);
        assert_ne!(first.expose_secret(), second.expose_secret());
    }

    #[test]
    fn test_generate_indices_and_reassembly() {
        let cipher = cipher();
        let generator = GroupGenerator::new(&cipher, 3);
        let chunks = generator.generate(5, b"hello world", &mut StdRng::seed_from_u64(3)).unwrap();

        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.group == 5));
        assert_eq!(chunks.iter().map(|c| c.index).collect::<Vec<_>>(), vec![0, 1, 2]);

        let passphrase = splitter::join(chunks.iter().map(|c| c.passphrase.as_slice()));
        let ciphertext = splitter::join(chunks.iter().map(|c| c.ciphertext.as_slice()));
        assert_eq!(passphrase.len(), PASSPHRASE_LENGTH);
        assert_eq!(cipher.decrypt(&passphrase, &ciphertext).unwrap(), b"hello world");
    }

    #[test]
    fn test_fragments_even_except_last() {
        let cipher = cipher();
        let chunks = GroupGenerator::new(&cipher, 3).generate(0, &[7u8; 500], &mut StdRng::seed_from_u64(4)).unwrap();

        // 1024 / 3 rounds up to 342.
        assert_eq!(chunks[0].passphrase.len(), 342);
        assert_eq!(chunks[1].passphrase.len(), 342);
        assert_eq!(chunks[2].passphrase.len(), 340);
        assert_eq!(chunks[0].ciphertext.len(), chunks[1].ciphertext.len());
        assert!(chunks[2].ciphertext.len() <= chunks[0].ciphertext.len());
    }

    #[test]
    fn test_single_chunk_group() {
        let cipher = cipher();
        let chunks = GroupGenerator::new(&cipher, 1).generate(0, b"solo", &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].passphrase.len(), PASSPHRASE_LENGTH);
    }

    #[test]
    fn test_threshold_above_ciphertext_len_pads_chunks() {
        let cipher = cipher();
        let threshold = 150;
        let chunks = GroupGenerator::new(&cipher, threshold).generate(0, b"", &mut StdRng::seed_from_u64(6)).unwrap();

        assert_eq!(chunks.len(), threshold);
        assert_eq!(chunks.last().map(|c| c.index), Some(149));

        let passphrase = splitter::join(chunks.iter().map(|c| c.passphrase.as_slice()));
        let ciphertext = splitter::join(chunks.iter().map(|c| c.ciphertext.as_slice()));
        assert!(cipher.decrypt(&passphrase, &ciphertext).unwrap().is_empty());
    }

    #[test]
    fn test_encryption_failure_propagates() {
        let generator = GroupGenerator::new(&FailingEncryptor, 2);
        let err = generator.generate(4, b"data", &mut StdRng::seed_from_u64(7)).unwrap_err();
        assert!(matches!(err, SplitError::EncryptionFailed { group: 4, .. }));
        assert!(err.to_string().contains("primitive unavailable"));
    }
}
