//! Bisection search for the nearest difficulty.
//!
//! Used by the closest-difficulty selector: given a pool already sorted
//! ascending by difficulty, find the item nearest a target ability in
//! O(log n) instead of scanning the pool.

/// Index of the value in `sorted` nearest to `target`.
///
/// `sorted` must be non-empty and ascending. The search clamps at both ends
/// (`target` below the first value returns 0, above the last returns
/// `n − 1`) and resolves exact midpoints to the lower index.
pub fn closest_index(sorted: &[f64], target: f64) -> usize {
    debug_assert!(!sorted.is_empty(), "closest_index requires a non-empty slice");

    let n = sorted.len();
    if target <= sorted[0] {
        return 0;
    }
    if target >= sorted[n - 1] {
        return n - 1;
    }

    // First index with sorted[idx] >= target; 0 < idx < n by the clamps.
    let idx = sorted.partition_point(|&value| value < target);
    let below = target - sorted[idx - 1];
    let above = sorted[idx] - target;
    if above < below {
        idx
    } else {
        idx - 1
    }
}
