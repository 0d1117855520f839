//! Pinata smashing: interval dynamic programming, unrelated to matching.
//!
//! Smashing pinata `i` while its nearest unsmashed neighbours are `l` and
//! `r` drops `v[l] * v[i] * v[r]` candies; the row is padded with a `1` at
//! each end. [`max_candies`] finds the best smashing order's total.

/// Maximum candies obtainable by smashing every pinata.
///
/// Returns None if any candidate total overflows a `u128`.
///
/// `best[l][r]` is the best total for the open interval `(l, r)` of the
/// padded row, choosing which pinata in it is smashed last.
///
/// # Example
///
/// ```
/// use fxmatch::candies::max_candies;
///
/// assert_eq!(max_candies(&[3, 1, 5, 8]), Some(167));
/// assert_eq!(max_candies(&[]), Some(0));
/// ```
pub fn max_candies(pinatas: &[u64]) -> Option<u128> {
    let mut padded: Vec<u128> = Vec::with_capacity(pinatas.len() + 2);
    padded.push(1);
    padded.extend(pinatas.iter().map(|&value| u128::from(value)));
    padded.push(1);

    let n = padded.len();
    let mut best = vec![vec![0u128; n]; n];

    for width in 2..n {
        for left in 0..n - width {
            let right = left + width;
            let edge = padded[left].checked_mul(padded[right])?;

            let mut interval = 0;
            for last in left + 1..right {
                let candies = edge
                    .checked_mul(padded[last])?
                    .checked_add(best[left][last])?
                    .checked_add(best[last][right])?;
                interval = interval.max(candies);
            }
            best[left][right] = interval;
        }
    }

    Some(best[0][n - 1])
}
