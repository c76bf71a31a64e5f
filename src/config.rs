//! Global Configuration Constants
//!
//! Every tunable of SplitByte lives here: passphrase generation, the
//! Argon2id defaults used by the passphrase cipher, AEAD sizes, the
//! artifact format identifiers and the ceilings the command line applies
//! before starting a split.
//!
//! ## Cost Model
//!
//! A split with `n` shares and threshold `r` encrypts the file once per
//! `r`-subset, i.e. `C(n, r)` times, and every share stores `C(n-1, r-1)`
//! ciphertexts. The ceilings at the bottom of this file keep the command
//! line from starting a split whose cost explodes combinatorially.

/// Application name used in user interfaces.
pub const APP_NAME: &str = "SplitByte";

// === Passphrase Generation ===

/// Number of characters in every per-group passphrase.
pub const PASSPHRASE_LENGTH: usize = 1024;

/// Alphabet passphrase characters are drawn from.
///
/// The 100 printable ASCII characters: digits, letters, punctuation and
/// whitespace.
pub const PASSPHRASE_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~ \t\n\r\x0b\x0c";

// === Argon2 Key Derivation Parameters ===
// Defaults for turning a group passphrase into cipher keys. The values a
// split actually used are recorded in every artifact.

/// Argon2 time cost parameter (number of passes).
pub const ARGON_TIME: u32 = 3;

/// Argon2 memory cost parameter in KiB.
///
/// Every group derives its own key, so this much memory is held once per
/// rayon worker while a split runs.
pub const ARGON_MEMORY: u32 = 64 * 1024;

/// Argon2 parallelism parameter (number of lanes).
pub const ARGON_THREADS: u32 = 4;

/// Length of derived keys in bytes: one AES-256 key plus one XChaCha20 key.
pub const ARGON_KEY_LEN: usize = 64;

/// Length of the per-ciphertext Argon2 salt in bytes.
pub const ARGON_SALT_LEN: usize = 32;

// === AEAD Parameters ===

/// Size of each encryption key in bytes.
pub const KEY_SIZE: usize = 32;

/// Size of AES-GCM nonce in bytes.
pub const AES_NONCE_SIZE: usize = 12;

/// Size of XChaCha20 nonce in bytes.
pub const CHACHA_NONCE_SIZE: usize = 24;

/// Size of the authentication tag appended by both AEAD layers.
pub const TAG_SIZE: usize = 16;

/// Smallest possible ciphertext produced by the passphrase cipher.
pub const MIN_CIPHERTEXT_LEN: usize = ARGON_SALT_LEN + CHACHA_NONCE_SIZE + TAG_SIZE + AES_NONCE_SIZE + TAG_SIZE;

// === Artifact Format ===

/// Magic bytes at the start of every share artifact ("SPLT").
pub const MAGIC_BYTES: u32 = 0x5350_4C54;

/// Current artifact format version.
pub const CURRENT_VERSION: u16 = 0x0001;

/// Size of the fixed envelope prefix: magic, version and CRC-32.
pub const ENVELOPE_HEADER_SIZE: usize = 4 + 2 + 4;

/// Identifier for AES-256-GCM encryption algorithm.
pub const ALGORITHM_AES_256_GCM: u8 = 0x01;

/// Identifier for XChaCha20-Poly1305 encryption algorithm.
pub const ALGORITHM_CHACHA20_POLY1305: u8 = 0x02;

/// Identifier for Argon2id key derivation.
pub const KDF_ARGON2: u8 = 0x01;

/// Identifier for uncompressed payloads.
pub const COMPRESSION_NONE: u8 = 0x00;

/// Identifier for zstd compressed payloads.
pub const COMPRESSION_ZSTD: u8 = 0x01;

/// Compression level used for zstd.
pub const ZSTD_LEVEL: i32 = 3;

/// Largest single allocation the artifact body codec makes, in bytes.
///
/// Bounds every sequence in an artifact body, most notably one ciphertext
/// fragment. Length prefixes above it are rejected before allocating.
pub const MAX_ARTIFACT_ALLOCATION: usize = 1 << 30;

// === Command Line Limits ===

/// Largest share count accepted by `split`.
pub const MAX_SHARE_COUNT: usize = 32;

/// Largest number of groups (`C(n, r)`) accepted by `split`.
pub const MAX_GROUP_COUNT: u64 = 10_000;

/// Largest Argon2 memory cost in KiB (4 GiB), for splits and artifacts.
pub const MAX_KDF_MEMORY: u32 = 4 * 1024 * 1024;

/// Largest Argon2 pass count, for splits and artifacts.
pub const MAX_KDF_TIME: u32 = 64;
