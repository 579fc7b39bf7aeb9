#![forbid(unsafe_code)]

//! Integer-division thresholding for the B3/S23 rule.
//!
//! With `n` the live-neighbour count and `a` the current cell value:
//!
//! ```text
//! generate = min(n/3, 1) - min(n/4, 1)     1 iff n == 3
//! survive  = min(n/2, 1) - min(n/4, 1)     1 iff n ∈ {2, 3}
//! next     = max(generate, a * survive)
//! ```
//!
//! The convolution engine folds the cell itself into the count with weight 1
//! and the neighbours with weight 2, so a single band test on the combined
//! value `v = a + 2n` decides the next state: alive iff `5 <= v <= 7`.

/// Next state from the current value and the live-neighbour count.
#[inline]
#[must_use]
pub fn next_state(alive: u8, neighbours: u32) -> u8 {
    let generate = (neighbours / 3).min(1) - (neighbours / 4).min(1);
    let survive = (neighbours / 2).min(1) - (neighbours / 4).min(1);
    generate.max(u32::from(alive) * survive) as u8
}

/// Next state from the weighted convolution value `alive + 2 * neighbours`.
#[inline]
#[must_use]
pub fn next_state_weighted(value: u32) -> u8 {
    ((value / 5).min(1) - (value / 8).min(1)) as u8
}

/// Apply [`next_state`] cell-wise over a grid and its neighbour counts.
pub(crate) fn threshold(cells: &[u8], neighbours: &[u32]) -> Vec<u8> {
    debug_assert_eq!(cells.len(), neighbours.len());
    cells
        .iter()
        .zip(neighbours)
        .map(|(&a, &n)| next_state(a, n))
        .collect()
}

/// The textbook rule, used as the reference in tests.
#[cfg(test)]
pub(crate) fn canonical(alive: u8, neighbours: u32) -> u8 {
    match (alive, neighbours) {
        (1, 2) | (1, 3) | (0, 3) => 1,
        _ => 0,
    }
}
