//! Property tests for fragment splitting

use quickcheck_macros::quickcheck;
use splitbyte::engine::splitter;

#[quickcheck]
fn prop_join_restores_input(data: Vec<u8>, n: u8) -> bool {
    let n = usize::from(n % 16) + 1;
    splitter::join(splitter::split(&data, n)) == data
}

#[quickcheck]
fn prop_fragments_even_except_last(data: Vec<u8>, n: u8) -> bool {
    let n = usize::from(n % 16) + 1;
    let pieces = splitter::split(&data, n);

    if data.is_empty() {
        return pieces.is_empty();
    }

    let size = data.len().div_ceil(n);
    let Some((last, rest)) = pieces.split_last() else {
        return false;
    };

    pieces.len() <= n && rest.iter().all(|p| p.len() == size) && !last.is_empty() && last.len() <= size
}
