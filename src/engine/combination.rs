//! Lexicographic enumeration of `k`-subsets of `0..n`.
//!
//! Group ids are ranks in this order, so the order must never change:
//! `[0, 1]`, `[0, 2]`, `[1, 2]` for `n = 3, k = 2`.

use crate::types::ShareIndex;

/// Iterator over every `k`-element subset of `0..n`, as ascending index
/// tuples in lexicographic order.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    current: Option<Vec<usize>>,
}

impl Combinations {
    /// Creates the enumeration. Yields nothing when `k > n`, and a single
    /// empty subset when `k == 0`.
    #[must_use]
    pub fn new(n: usize, k: usize) -> Self {
        let current = (k <= n).then(|| (0..k).collect());
        Self { n, current }
    }

    fn advance(&mut self) {
        let Some(current) = self.current.as_mut() else {
            return;
        };
        let k = current.len();

        // Rightmost position that can still move up.
        let Some(pos) = (0..k).rev().find(|&i| current[i] < self.n - k + i) else {
            self.current = None;
            return;
        };

        current[pos] += 1;
        for i in pos + 1..k {
            current[i] = current[i - 1] + 1;
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<ShareIndex>;

    fn next(&mut self) -> Option<Self::Item> {
        let subset = self.current.as_ref()?.iter().map(|&i| i as ShareIndex).collect();
        self.advance();
        Some(subset)
    }
}

/// `C(n, k)`, or `None` if it does not fit a `u64`.
#[must_use]
pub fn binomial(n: usize, k: usize) -> Option<u64> {
    if k > n {
        return Some(0);
    }

    let k = k.min(n - k) as u64;
    let n = n as u64;
    let mut result: u64 = 1;
    for i in 0..k {
        // result * (n - i) is always divisible by (i + 1) here.
        let wide = u128::from(result) * u128::from(n - i) / u128::from(i + 1);
        result = u64::try_from(wide).ok()?;
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_choose_two_order() {
        let subsets: Vec<_> = Combinations::new(3, 2).collect();
        assert_eq!(subsets, vec![vec![0, 1], vec![0, 2], vec![1, 2]]);
    }

    #[test]
    fn test_four_choose_two_order() {
        let subsets: Vec<_> = Combinations::new(4, 2).collect();
        assert_eq!(subsets, vec![vec![0, 1], vec![0, 2], vec![0, 3], vec![1, 2], vec![1, 3], vec![2, 3]]);
    }

    #[test]
    fn test_full_and_single() {
        assert_eq!(Combinations::new(4, 4).collect::<Vec<_>>(), vec![vec![0, 1, 2, 3]]);
        assert_eq!(Combinations::new(3, 1).collect::<Vec<_>>(), vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_degenerate() {
        assert_eq!(Combinations::new(2, 3).count(), 0);
        assert_eq!(Combinations::new(3, 0).collect::<Vec<_>>(), vec![Vec::<ShareIndex>::new()]);
    }

    #[test]
    fn test_counts_match_binomial() {
        for n in 0..=10 {
            for k in 0..=n {
                assert_eq!(Combinations::new(n, k).count() as u64, binomial(n, k).unwrap(), "n={n} k={k}");
            }
        }
    }

    #[test]
    fn test_subsets_sorted_and_strictly_increasing() {
        let subsets: Vec<_> = Combinations::new(7, 3).collect();
        assert!(subsets.windows(2).all(|w| w[0] < w[1]));
        assert!(subsets.iter().all(|s| s.windows(2).all(|p| p[0] < p[1])));
    }

    #[test]
    fn test_binomial_values() {
        assert_eq!(binomial(3, 2), Some(3));
        assert_eq!(binomial(8, 4), Some(70));
        assert_eq!(binomial(32, 16), Some(601_080_390));
        assert_eq!(binomial(5, 6), Some(0));
        assert_eq!(binomial(200, 100), None);
    }
}
