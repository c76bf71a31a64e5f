//! Threshold splitting engine.
//!
//! A split over `n` shares with threshold `r` generates one group per
//! `r`-subset of the shares. Each group encrypts the whole input under its
//! own random passphrase and cuts passphrase and ciphertext into `r`
//! chunks, one per subset member. Any `r` shares hold all chunks of at least
//! one group; fewer hold none.
//!
//! # Pipeline
//!
//! ```text
//! split:  Combinations -> Scheduler -> GroupGenerator -> distribute -> Vec<Share>
//! merge:  Vec<Share> -> ChunkPool -> first complete group -> decrypt
//! ```

pub mod combination;
pub mod distributor;
pub mod group;
pub mod merge;
pub mod scheduler;
pub mod splitter;

use rand::{CryptoRng, RngCore};

pub use combination::{Combinations, binomial};
pub use distributor::distribute;
pub use group::{GroupGenerator, generate_passphrase};
pub use merge::{ChunkPool, MergeEngine, Merged};
pub use scheduler::{Assignment, Scheduler};

use crate::cipher::Encryptor;
use crate::error::Result;
use crate::types::{Share, SplitParams};

/// Splits `data` into `params.share_count()` shares.
///
/// # Errors
///
/// See [`Scheduler::schedule`].
pub fn split<E, R>(data: &[u8], params: SplitParams, encryptor: &E, rng: &mut R) -> Result<Vec<Share>>
where
    E: Encryptor,
    R: RngCore + CryptoRng + ?Sized,
{
    let assignments = Scheduler::new(encryptor, params).schedule(data, rng)?;
    Ok(distribute(params, assignments))
}

/// Rebuilds the contents `shares` were split from.
///
/// # Errors
///
/// See [`MergeEngine::merge`].
pub fn merge<E: Encryptor>(shares: &[Share], encryptor: &E) -> Result<Vec<u8>> {
    MergeEngine::new(encryptor).merge(shares).map(|merged| merged.data)
}
