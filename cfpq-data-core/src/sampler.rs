//! Cumulative-weight sampler for preferential attachment.
//!
//! Weights live in a Fenwick tree so both updates and weighted draws cost
//! `O(log n)`. Sampling without replacement zeroes each chosen candidate for
//! the remainder of the call, which renormalises later draws over the
//! candidates still in play, and restores the weights before returning.

use rand::Rng;
use thiserror::Error;

/// The remaining weight ran out before the requested number of distinct draws
/// was made.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("weight exhausted after {drawn} of {requested} draws (initial total {total_weight})")]
pub struct InsufficientWeight {
    /// Aggregate weight before the first draw.
    pub total_weight: u64,
    /// Number of distinct draws requested.
    pub requested: usize,
    /// Number of draws completed before the weight ran out.
    pub drawn: usize,
}

/// Integer weights indexed by dense position, supporting weighted sampling.
///
/// # Examples
/// ```
/// use cfpq_data_core::WeightedSampler;
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut sampler = WeightedSampler::with_capacity(3);
/// sampler.push(0);
/// sampler.push(5);
/// sampler.push(5);
/// let mut rng = SmallRng::seed_from_u64(1);
/// let mut drawn = sampler.sample_distinct(2, &mut rng).expect("two weighted candidates");
/// drawn.sort_unstable();
/// assert_eq!(drawn, vec![1, 2]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct WeightedSampler {
    weights: Vec<u64>,
    // 1-based Fenwick tree; `tree[0]` is unused.
    tree: Vec<u64>,
    total: u64,
}

impl WeightedSampler {
    /// Creates an empty sampler with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut tree = Vec::with_capacity(capacity.saturating_add(1));
        tree.push(0);
        Self {
            weights: Vec::with_capacity(capacity),
            tree,
            total: 0,
        }
    }

    /// Number of entries.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.weights.len() }

    /// Returns `true` when no entry has been pushed.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.weights.is_empty() }

    /// Sum of all weights.
    #[must_use]
    #[rustfmt::skip]
    pub fn total(&self) -> u64 { self.total }

    /// Current weight at `index`, if present.
    #[must_use]
    pub fn weight(&self, index: usize) -> Option<u64> {
        self.weights.get(index).copied()
    }

    /// Read-only view of every weight in index order.
    #[must_use]
    pub fn weights(&self) -> &[u64] {
        &self.weights
    }

    /// Appends a new entry and returns its index.
    pub fn push(&mut self, weight: u64) -> usize {
        let index = self.weights.len();
        self.weights.push(weight);
        if self.tree.is_empty() {
            self.tree.push(0);
        }
        // Node `position` covers `(position - lowbit, position]`.
        let position = index + 1;
        let covered_from = position - lowbit(position);
        let node = weight
            .wrapping_add(self.prefix_sum(index))
            .wrapping_sub(self.prefix_sum(covered_from));
        self.tree.push(node);
        self.total = self.total.wrapping_add(weight);
        index
    }

    /// Adds `delta` to the weight at `index`. Returns `false` when the index
    /// is out of range.
    pub fn increment(&mut self, index: usize, delta: u64) -> bool {
        let Some(weight) = self.weights.get_mut(index) else {
            return false;
        };
        *weight = weight.wrapping_add(delta);
        self.tree_add(index, delta);
        self.total = self.total.wrapping_add(delta);
        true
    }

    /// Draws `count` distinct indices, each draw proportional to the weights
    /// of the indices not drawn yet. Indices are returned in draw order.
    ///
    /// # Errors
    /// Returns [`InsufficientWeight`] when fewer than `count` entries carry
    /// non-zero weight. The sampler is left unchanged either way.
    pub fn sample_distinct<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>, InsufficientWeight> {
        let initial_total = self.total;
        let mut drawn: Vec<(usize, u64)> = Vec::with_capacity(count);
        while drawn.len() < count {
            if self.total == 0 {
                let completed = drawn.len();
                self.restore(&drawn);
                return Err(InsufficientWeight {
                    total_weight: initial_total,
                    requested: count,
                    drawn: completed,
                });
            }
            let target = rng.gen_range(0..self.total);
            let index = self.find(target);
            let weight = self.weight(index).unwrap_or(0);
            self.suppress(index, weight);
            drawn.push((index, weight));
        }
        self.restore(&drawn);
        Ok(drawn.into_iter().map(|(index, _)| index).collect())
    }

    /// Returns the smallest index whose inclusive prefix sum exceeds `target`.
    /// Requires `target < self.total`.
    #[expect(
        clippy::indexing_slicing,
        reason = "descent only visits positions within 1..=len"
    )]
    fn find(&self, target: u64) -> usize {
        let len = self.weights.len();
        let mut position = 0_usize;
        let mut remaining = target;
        let mut step = highest_power_of_two(len);
        while step > 0 {
            let next = position + step;
            if next <= len && self.tree[next] <= remaining {
                position = next;
                remaining -= self.tree[next];
            }
            step >>= 1;
        }
        position
    }

    #[expect(
        clippy::indexing_slicing,
        reason = "Fenwick positions stay within 1..=prefix_len"
    )]
    fn prefix_sum(&self, prefix_len: usize) -> u64 {
        let mut position = prefix_len;
        let mut sum = 0_u64;
        while position > 0 {
            sum = sum.wrapping_add(self.tree[position]);
            position -= lowbit(position);
        }
        sum
    }

    fn tree_add(&mut self, index: usize, delta: u64) {
        let mut position = index + 1;
        while let Some(node) = self.tree.get_mut(position) {
            *node = node.wrapping_add(delta);
            position += lowbit(position);
        }
    }

    fn tree_sub(&mut self, index: usize, delta: u64) {
        let mut position = index + 1;
        while let Some(node) = self.tree.get_mut(position) {
            *node = node.wrapping_sub(delta);
            position += lowbit(position);
        }
    }

    fn suppress(&mut self, index: usize, weight: u64) {
        self.tree_sub(index, weight);
        self.total = self.total.wrapping_sub(weight);
    }

    fn restore(&mut self, drawn: &[(usize, u64)]) {
        for &(index, weight) in drawn {
            self.tree_add(index, weight);
            self.total = self.total.wrapping_add(weight);
        }
    }
}

const fn lowbit(position: usize) -> usize {
    position & position.wrapping_neg()
}

const fn highest_power_of_two(value: usize) -> usize {
    if value == 0 {
        0
    } else {
        1 << (usize::BITS - 1 - value.leading_zeros())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    fn sampler_from(weights: &[u64]) -> WeightedSampler {
        let mut sampler = WeightedSampler::with_capacity(weights.len());
        for weight in weights {
            sampler.push(*weight);
        }
        sampler
    }

    fn naive_prefix(weights: &[u64], len: usize) -> u64 {
        weights.iter().take(len).sum()
    }

    #[rstest]
    #[case::single(&[7])]
    #[case::uniform(&[3, 3, 3, 3, 3])]
    #[case::mixed(&[3, 0, 1, 9, 4, 0, 2, 8, 5, 6, 1, 1, 0])]
    fn prefix_sums_match_naive_sums(#[case] weights: &[u64]) {
        let sampler = sampler_from(weights);
        for len in 0..=weights.len() {
            assert_eq!(sampler.prefix_sum(len), naive_prefix(weights, len));
        }
        assert_eq!(sampler.total(), naive_prefix(weights, weights.len()));
    }

    #[test]
    fn find_maps_every_target_to_its_bucket() {
        let weights = [2_u64, 0, 3, 1, 0, 4];
        let sampler = sampler_from(&weights);
        let mut expected = Vec::new();
        for (index, weight) in weights.iter().enumerate() {
            for _ in 0..*weight {
                expected.push(index);
            }
        }
        let found: Vec<usize> = (0..sampler.total()).map(|target| sampler.find(target)).collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn increment_updates_weights_and_totals() {
        let mut sampler = sampler_from(&[3, 3, 0]);
        assert!(sampler.increment(2, 4));
        assert!(sampler.increment(0, 1));
        assert!(!sampler.increment(3, 1));
        assert_eq!(sampler.weights(), &[4, 3, 4]);
        assert_eq!(sampler.total(), 11);
        assert_eq!(sampler.prefix_sum(2), 7);
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(6)]
    fn sample_distinct_returns_unique_indices(#[case] count: usize) {
        let mut sampler = sampler_from(&[3, 1, 4, 1, 5, 9]);
        let before = sampler.weights().to_vec();
        let mut rng = SmallRng::seed_from_u64(17);
        for _ in 0..50 {
            let drawn = sampler
                .sample_distinct(count, &mut rng)
                .expect("enough weighted candidates");
            let mut unique = drawn.clone();
            unique.sort_unstable();
            unique.dedup();
            assert_eq!(unique.len(), count);
            assert!(drawn.iter().all(|index| *index < 6));
        }
        assert_eq!(sampler.weights(), before.as_slice());
        assert_eq!(sampler.total(), 23);
    }

    #[test]
    fn zero_weight_entries_are_never_drawn() {
        let mut sampler = sampler_from(&[0, 2, 0, 2, 0]);
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..100 {
            let mut drawn = sampler.sample_distinct(2, &mut rng).expect("two candidates");
            drawn.sort_unstable();
            assert_eq!(drawn, vec![1, 3]);
        }
    }

    #[test]
    fn insufficient_weight_is_reported_and_state_restored() {
        let mut sampler = sampler_from(&[0, 5, 0]);
        let mut rng = SmallRng::seed_from_u64(9);
        let err = sampler
            .sample_distinct(2, &mut rng)
            .expect_err("only one candidate carries weight");
        assert_eq!(
            err,
            InsufficientWeight {
                total_weight: 5,
                requested: 2,
                drawn: 1,
            }
        );
        assert_eq!(sampler.total(), 5);
        assert_eq!(sampler.prefix_sum(3), 5);
    }

    #[test]
    fn single_draw_frequencies_follow_weights() {
        let mut sampler = sampler_from(&[1, 3, 6]);
        let mut rng = SmallRng::seed_from_u64(2024);
        let mut counts = [0_u32; 3];
        let draws = 30_000;
        for _ in 0..draws {
            let drawn = sampler.sample_distinct(1, &mut rng).expect("weighted candidates");
            counts[drawn[0]] += 1;
        }
        let expected = [0.1_f64, 0.3, 0.6];
        for (observed, probability) in counts.iter().zip(expected) {
            let frequency = f64::from(*observed) / f64::from(draws);
            assert!(
                (frequency - probability).abs() < 0.02,
                "frequency {frequency} should approach {probability}",
            );
        }
    }

    #[test]
    fn second_draw_is_renormalised_over_remaining_candidates() {
        // With weights [1, 1, 2] the chance that index 2 is drawn in either
        // of two draws is 1/2 + 2 * (1/4 * 2/3) = 5/6.
        let mut sampler = sampler_from(&[1, 1, 2]);
        let mut rng = SmallRng::seed_from_u64(77);
        let trials = 30_000;
        let mut hits = 0_u32;
        for _ in 0..trials {
            let drawn = sampler.sample_distinct(2, &mut rng).expect("weighted candidates");
            if drawn.contains(&2) {
                hits += 1;
            }
        }
        let frequency = f64::from(hits) / f64::from(trials);
        assert!((frequency - 5.0 / 6.0).abs() < 0.02, "observed {frequency}");
    }
}
