//! Property tests for split/merge workflows

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use splitbyte::SplitError;
use splitbyte::cipher::{KdfParams, PassphraseCipher};
use splitbyte::engine::{self, ChunkPool, binomial};
use splitbyte::types::{Share, SplitParams};

fn cipher() -> PassphraseCipher {
    PassphraseCipher::new(KdfParams::new(8, 1, 1)).expect("light kdf params are valid")
}

/// Share count and threshold with `1 <= r <= n <= 8`.
#[derive(Clone, Copy, Debug)]
struct SmallParams {
    shares: usize,
    required: usize,
}

impl Arbitrary for SmallParams {
    fn arbitrary(g: &mut Gen) -> Self {
        let shares = usize::from(u8::arbitrary(g) % 8) + 1;
        let required = usize::from(u8::arbitrary(g)) % shares + 1;
        SmallParams { shares, required }
    }
}

impl SmallParams {
    fn split(self, data: &[u8], seed: u64) -> Vec<Share> {
        let params = SplitParams::new(self.shares, self.required).expect("generated params are valid");
        engine::split(data, params, &cipher(), &mut StdRng::seed_from_u64(seed)).expect("split succeeds")
    }
}

/// `amount` distinct shares in random order.
fn pick(shares: &[Share], amount: usize, seed: u64) -> Vec<Share> {
    let mut rng = StdRng::seed_from_u64(seed);
    index::sample(&mut rng, shares.len(), amount).into_iter().map(|i| shares[i].clone()).collect()
}

#[quickcheck]
fn prop_any_threshold_subset_merges(data: Vec<u8>, params: SmallParams, seed: u64) -> bool {
    let shares = params.split(&data, seed);
    let selection = pick(&shares, params.required, seed.wrapping_add(1));

    engine::merge(&selection, &cipher()).is_ok_and(|merged| merged == data)
}

#[quickcheck]
fn prop_more_than_threshold_merges(data: Vec<u8>, params: SmallParams, seed: u64) -> bool {
    let shares = params.split(&data, seed);
    let amount = params.required + (seed as usize) % (params.shares - params.required + 1);
    let selection = pick(&shares, amount, seed.wrapping_add(2));

    engine::merge(&selection, &cipher()).is_ok_and(|merged| merged == data)
}

#[quickcheck]
fn prop_chunk_counts(params: SmallParams, seed: u64) -> bool {
    let shares = params.split(b"counting chunks", seed);
    let per_share = binomial(params.shares - 1, params.required - 1).expect("small binomial") as usize;

    shares.len() == params.shares && shares.iter().all(|s| s.chunks.len() == per_share && s.required_pieces as usize == params.required)
}

#[quickcheck]
fn prop_every_group_has_one_chunk_per_index(params: SmallParams, seed: u64) -> bool {
    let shares = params.split(b"group layout", seed);
    let groups = binomial(params.shares, params.required).expect("small binomial");

    (0..groups).all(|group| {
        let mut indices: Vec<u32> = shares.iter().flat_map(|s| &s.chunks).filter(|c| c.group == group).map(|c| c.index).collect();
        indices.sort_unstable();
        indices == (0..params.required as u32).collect::<Vec<_>>()
    })
}

#[quickcheck]
fn prop_below_threshold_fails(params: SmallParams, seed: u64) -> bool {
    if params.required < 2 {
        return true;
    }

    let shares = params.split(b"not enough", seed);
    let selection = pick(&shares, params.required - 1, seed.wrapping_add(3));

    matches!(engine::merge(&selection, &cipher()), Err(SplitError::InsufficientShares { found, required }) if found == params.required - 1 && required == params.required)
}

#[quickcheck]
fn prop_below_threshold_holds_no_complete_group(params: SmallParams, seed: u64) -> bool {
    if params.required < 2 {
        return true;
    }

    let shares = params.split(b"structurally hidden", seed);
    let selection = pick(&shares, params.required - 1, seed.wrapping_add(4));

    ChunkPool::new(&selection).complete_groups(params.required as u32).is_empty()
}
