//! Contiguous, loss-free fragmentation of byte sequences.

/// Splits `data` into at most `n` contiguous fragments of
/// `ceil(len / n)` bytes; only the last fragment may be shorter.
///
/// Fewer than `n` fragments come back when `data` is too short to fill
/// them, and an empty input yields no fragments at all. A zero `n` is
/// treated as one.
pub fn split(data: &[u8], n: usize) -> Vec<&[u8]> {
    if data.is_empty() {
        return Vec::new();
    }

    let size = data.len().div_ceil(n.max(1));
    data.chunks(size).collect()
}

/// Concatenates fragments back into one buffer.
pub fn join<'a>(fragments: impl IntoIterator<Item = &'a [u8]>) -> Vec<u8> {
    let mut data = Vec::new();
    for fragment in fragments {
        data.extend_from_slice(fragment);
    }
    data
}
