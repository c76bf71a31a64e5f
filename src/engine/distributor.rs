//! Folding generated groups into per-share chunk lists.

use crate::engine::scheduler::Assignment;
use crate::types::{Share, SplitParams};

/// Hands chunk `p` of every group to the `p`-th member of its subset.
///
/// Assignments are consumed in the order given, so each share lists its
/// chunks by ascending group id when fed scheduler output.
pub fn distribute(params: SplitParams, assignments: Vec<Assignment>) -> Vec<Share> {
    let required_pieces = params.threshold() as u32;
    let per_share = assignments.len() * params.threshold() / params.share_count();

    let mut shares: Vec<Share> = (0..params.share_count()).map(|_| Share { required_pieces, chunks: Vec::with_capacity(per_share) }).collect();

    for assignment in assignments {
        debug_assert_eq!(assignment.members.len(), assignment.chunks.len());

        for (member, chunk) in assignment.members.into_iter().zip(assignment.chunks) {
            shares[member as usize].chunks.push(chunk);
        }
    }

    shares
}
