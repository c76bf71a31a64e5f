//! Parallel generation of every group of a split.
//!
//! One unit of work per `r`-subset of the share indices. Units share only
//! the plaintext; each owns a generator seeded from the caller's master
//! generator before dispatch, so results depend on the master seed alone
//! and never on which worker finished first.

use rand::rngs::StdRng;
use rand::{CryptoRng, RngCore, SeedableRng};
use rayon::prelude::*;
use tracing::info;

use crate::cipher::Encryptor;
use crate::engine::combination::{Combinations, binomial};
use crate::engine::group::GroupGenerator;
use crate::error::{Result, SplitError};
use crate::types::{Chunk, GroupId, ShareIndex, SplitParams};
use crate::ui::progress::Bar;

/// Chunks of one group together with the shares they go to.
///
/// `chunks[p]` belongs to share `members[p]`.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub group: GroupId,
    pub members: Vec<ShareIndex>,
    pub chunks: Vec<Chunk>,
}

struct Unit {
    group: GroupId,
    members: Vec<ShareIndex>,
    seed: [u8; 32],
}

/// Enumerates all `C(n, r)` subsets and generates one group for each.
pub struct Scheduler<'a, E> {
    encryptor: &'a E,
    params: SplitParams,
    progress: Option<&'a Bar>,
}

impl<'a, E: Encryptor> Scheduler<'a, E> {
    #[inline]
    pub fn new(encryptor: &'a E, params: SplitParams) -> Self {
        Self { encryptor, params, progress: None }
    }

    /// Advances `progress` once per generated group.
    #[inline]
    #[must_use]
    pub fn with_progress(mut self, progress: &'a Bar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Number of groups this split generates.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidParameters`] if `C(n, r)` overflows.
    pub fn group_count(&self) -> Result<u64> {
        let (n, r) = (self.params.share_count(), self.params.threshold());
        binomial(n, r).ok_or_else(|| SplitError::invalid(format!("C({n}, {r}) groups do not fit in memory")))
    }

    /// Generates every group, in group-id order.
    ///
    /// # Errors
    ///
    /// Fails before generating anything if the group count cannot be
    /// represented or allocated, and with the first
    /// [`SplitError::EncryptionFailed`] if any group fails.
    pub fn schedule<R: RngCore + CryptoRng + ?Sized>(&self, data: &[u8], rng: &mut R) -> Result<Vec<Assignment>> {
        let (n, r) = (self.params.share_count(), self.params.threshold());
        let total = usize::try_from(self.group_count()?).map_err(|_| SplitError::invalid(format!("C({n}, {r}) groups do not fit in memory")))?;

        let mut units = Vec::new();
        units.try_reserve_exact(total).map_err(|_| SplitError::invalid(format!("cannot allocate {total} groups")))?;

        for (group, members) in Combinations::new(n, r).enumerate() {
            let mut seed = [0u8; 32];
            rng.fill_bytes(&mut seed);
            units.push(Unit { group: group as GroupId, members, seed });
        }

        info!(groups = total, shares = n, required = r, bytes = data.len(), "generating groups");

        let generator = GroupGenerator::new(self.encryptor, r);

        units
            .into_par_iter()
            .map(|unit| -> Result<Assignment> {
                let mut rng = StdRng::from_seed(unit.seed);
                let chunks = generator.generate(unit.group, data, &mut rng)?;

                if let Some(progress) = self.progress {
                    progress.add(1);
                }

                Ok(Assignment { group: unit.group, members: unit.members, chunks })
            })
            .collect()
    }
}
