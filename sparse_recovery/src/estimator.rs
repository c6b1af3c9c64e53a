/// Running moments of every update routed into a single bucket.
///
/// Keeps Φ = Σw, ι = Σw·i and τ = Σw·i². When the bucket has only ever seen
/// one distinct index i with net weight w, the three moments are exactly
/// (w, w·i, w·i²), which is what the one-sparsity test exploits.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub struct OneSparseEstimator {
    phi: i128,
    iota: i128,
    tau: i128,
}

impl OneSparseEstimator {
    #[inline]
    pub fn update(&mut self, index: u64, weight: i64) {
        let weight = i128::from(weight);
        let index = i128::from(index);
        self.phi = self
            .phi
            .checked_add(weight)
            .expect("weight moment overflow");
        self.iota = weight
            .checked_mul(index)
            .and_then(|term| self.iota.checked_add(term))
            .expect("weighted-index moment overflow");
        self.tau = index
            .checked_mul(index)
            .and_then(|sq| sq.checked_mul(weight))
            .and_then(|term| self.tau.checked_add(term))
            .expect("weighted-index-square moment overflow");
    }

    /// Φ == 0: never touched, or all updates canceled out exactly.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.phi == 0
    }

    /// Ganguly's algebraic test: for a bucket holding exactly one distinct
    /// index, Φ·τ = ι² holds exactly, and with non-negative weights it holds
    /// only in that case. Negative weights can make the identity accidentally
    /// true for mixtures, so soundness is conditioned on non-negative streams
    /// (or exact compensating removals).
    #[inline]
    pub fn is_one_sparse(&self) -> bool {
        match (
            self.phi.checked_mul(self.tau),
            self.iota.checked_mul(self.iota),
        ) {
            (Some(lhs), Some(rhs)) => lhs == rhs,
            // An overflowing product cannot be trusted either way.
            _ => false,
        }
    }

    /// The `(index, weight)` pair this bucket holds, assuming it is
    /// one-sparse. A non-integral ι/Φ quotient means a collision slipped
    /// through the algebraic test with a fractional "index"; reject it rather
    /// than fabricate a recovery.
    pub fn recovered(&self) -> Option<(u64, i64)> {
        if self.phi == 0 || self.iota % self.phi != 0 {
            return None;
        }
        let index = u64::try_from(self.iota / self.phi).ok()?;
        let weight = i64::try_from(self.phi).ok()?;
        Some((index, weight))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn accumulates_moments_of_a_single_index() {
        let mut estimator = OneSparseEstimator::default();
        estimator.update(7, 5);
        estimator.update(7, 2);

        assert!(!estimator.is_zero());
        assert!(estimator.is_one_sparse());
        assert_eq!(estimator.recovered(), Some((7, 7)));
    }

    #[test]
    fn two_distinct_indices_fail_the_one_sparsity_test() {
        let mut estimator = OneSparseEstimator::default();
        estimator.update(3, 1);
        estimator.update(5, 1);

        // Φ·τ - ι² = w_a·w_b·(a-b)² > 0 for distinct positive-weight indices.
        assert!(!estimator.is_one_sparse());
    }

    #[test]
    fn exact_cancellation_returns_to_zero() {
        let mut estimator = OneSparseEstimator::default();
        estimator.update(11, 9);
        estimator.update(11, -9);

        assert!(estimator.is_zero());
        assert_eq!(estimator.recovered(), None);
    }

    #[test]
    fn non_exact_quotient_is_rejected() {
        let mut estimator = OneSparseEstimator::default();
        // Φ = 2, ι = 5: the quotient 5/2 is not an index.
        estimator.update(1, 1);
        estimator.update(4, 1);

        assert_eq!(estimator.recovered(), None);
    }

    #[test]
    fn negative_net_weight_recovers_with_its_sign() {
        let mut estimator = OneSparseEstimator::default();
        estimator.update(4, -3);

        // ι/Φ = 4 is exact; the signed net weight comes back as-is.
        assert_eq!(estimator.recovered(), Some((4, -3)));
    }

    proptest! {
        #[test]
        fn single_index_streams_are_always_one_sparse(
            index in 1_u64..=u32::MAX as u64,
            weights in proptest::collection::vec(1_i64..=1_000_000, 1..64),
        ) {
            let mut estimator = OneSparseEstimator::default();
            for &weight in &weights {
                estimator.update(index, weight);
            }
            prop_assert!(estimator.is_one_sparse());
            prop_assert_eq!(
                estimator.recovered(),
                Some((index, weights.iter().sum::<i64>()))
            );
        }

        #[test]
        fn distinct_positive_pairs_are_never_one_sparse(
            index_a in 1_u64..=u32::MAX as u64,
            offset in 1_u64..=1_000_000,
            weight_a in 1_i64..=1_000_000,
            weight_b in 1_i64..=1_000_000,
        ) {
            let index_b = index_a + offset;
            let mut estimator = OneSparseEstimator::default();
            estimator.update(index_a, weight_a);
            estimator.update(index_b, weight_b);
            prop_assert!(!estimator.is_one_sparse());
        }
    }
}
