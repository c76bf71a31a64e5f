//! SplitByte - threshold file splitting.
//!
//! Splits a file into `n` shares so that any `r` of them rebuild it and any
//! fewer reveal nothing beyond its approximate size:
//! - one group per `r`-subset of the shares, each with its own random passphrase
//! - Argon2id key derivation, AES-256-GCM and XChaCha20-Poly1305 per group
//! - zstd compression before splitting
//! - checksummed, versioned share artifacts

pub mod app;
pub mod artifact;
pub mod cipher;
pub mod compression;
pub mod config;
pub mod engine;
pub mod error;
pub mod processor;
pub mod secret;
pub mod types;
pub mod ui;

pub use error::{Result, SplitError};
