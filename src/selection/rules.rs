//! The five selection rules.
//!
//! Each rule takes ownership of the pool, extracts one record, and returns
//! the pair `(chosen, rest)`. Callers dispatch through
//! [`Selector::select`](crate::selection::Selector::select), which handles
//! the empty pool uniformly, so every rule below may assume at least one
//! item.

use rand::Rng;
use rand_pcg::Pcg64;

use crate::irt::model::fisher_information;
use crate::irt::search::closest_index;
use crate::selection::FlatStimulus;

/// Offset added to θ when targeting the next difficulty.
///
/// Selecting slightly above the current estimate maximizes the expected
/// information of a Rasch item for a typical correct-response rate.
const CLOSEST_OFFSET: f64 = 0.481;

fn sort_by_difficulty(items: &mut [FlatStimulus]) {
    items.sort_by(|x, y| x.params.difficulty.total_cmp(&y.params.difficulty));
}

/// Maximum Fisher information at the current θ; ties keep the earliest
/// item. The rest comes back sorted ascending by difficulty.
pub(super) fn select_mfi(
    mut items: Vec<FlatStimulus>, theta: f64,
) -> (Option<FlatStimulus>, Vec<FlatStimulus>) {
    let mut best = 0;
    let mut best_info = fisher_information(theta, &items[0].params);
    for (index, item) in items.iter().enumerate().skip(1) {
        let info = fisher_information(theta, &item.params);
        if info > best_info {
            best = index;
            best_info = info;
        }
    }
    let chosen = items.remove(best);
    sort_by_difficulty(&mut items);
    (Some(chosen), items)
}

/// Difficulty nearest to `θ + 0.481`, resolved by bisection over the
/// difficulty-sorted pool; exact midpoints go to the easier item.
pub(super) fn select_closest(
    mut items: Vec<FlatStimulus>, theta: f64,
) -> (Option<FlatStimulus>, Vec<FlatStimulus>) {
    sort_by_difficulty(&mut items);
    let difficulties: Vec<f64> = items.iter().map(|item| item.params.difficulty).collect();
    let index = closest_index(&difficulties, theta + CLOSEST_OFFSET);
    let chosen = items.remove(index);
    (Some(chosen), items)
}

/// Uniform draw from the pool.
pub(super) fn select_random(
    mut items: Vec<FlatStimulus>, rng: &mut Pcg64,
) -> (Option<FlatStimulus>, Vec<FlatStimulus>) {
    let index = rng.random_range(0..items.len());
    let chosen = items.remove(index);
    (Some(chosen), items)
}

/// First item in input order.
pub(super) fn select_fixed(
    mut items: Vec<FlatStimulus>,
) -> (Option<FlatStimulus>, Vec<FlatStimulus>) {
    let chosen = items.remove(0);
    (Some(chosen), items)
}

/// Center of the pool, jittered inside a window sized by the start-item
/// count `k`: the offset is uniform in `[−⌊k/2⌋, ⌊k/2⌋]` once the pool
/// holds at least `k` items, and the index clamps to the pool.
pub(super) fn select_middle(
    mut items: Vec<FlatStimulus>, n_start_items: usize, rng: &mut Pcg64,
) -> (Option<FlatStimulus>, Vec<FlatStimulus>) {
    let n = items.len();
    let base = (n / 2) as i64;
    let offset = if n_start_items > 0 && n >= n_start_items {
        let half = (n_start_items / 2) as i64;
        rng.random_range(-half..=half)
    } else {
        0
    };
    let index = (base + offset).clamp(0, n as i64 - 1) as usize;
    let chosen = items.remove(index);
    (Some(chosen), items)
}
