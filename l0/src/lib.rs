//! L0 sampling
//!
//! An implementation of the L0-sampling structure described by Cormode and
//! Firmani in "On Unifying the Space of L0-Sampling Algorithms" (2013). The
//! sampler summarizes a stream of additive `(index, weight)` updates over a
//! domain of `N` indices and can later return one index with nonzero
//! accumulated weight, together with that weight, without ever holding the
//! full vector.
//!
//! Each of the round(log2(N)) levels owns an s-sparse recovery grid and is
//! fed a nested geometric sub-sample of the stream: level j keeps the indices
//! whose routing hash falls below N/2^(j+1). Whichever level's substream
//! happens to retain close to `sparsity` distinct nonzero indices is the one
//! likely to pass the sparsity gate and recover. Draining repeats
//! recover-and-remove until no level yields anything.
//!
//! Recovery soundness rests on the per-bucket algebraic one-sparsity test,
//! which with non-negative weights only passes for genuinely one-sparse
//! buckets. Streams that go negative beyond exact removals would need the
//! prime-field variant of the test, which this crate does not implement.

mod config;

use std::{collections::HashSet, error, fmt, iter};

use rand::Rng;
use sampler_traits::{New, StreamSampler};
use sparse_recovery::SSparseRecovery;

pub use crate::config::{Config, ConfigError, MAX_DOMAIN_SIZE};

#[derive(Clone, Debug)]
pub struct L0Sampler {
    config: Config,
    /// Shallowest (widest sub-sample) first; ordering fixed at construction.
    levels: Vec<SSparseRecovery>,
}

impl New for L0Sampler {
    type Config = Config;

    fn new(config: &Self::Config) -> Self {
        Self {
            config: config.clone(),
            levels: iter::repeat_with(|| SSparseRecovery::new(&config.level_config))
                .take(config.num_levels)
                .collect(),
        }
    }
}

impl StreamSampler for L0Sampler {
    type UpdateError = RangeError;

    #[inline]
    fn update(&mut self, index: u64, weight: i64) -> Result<(), Self::UpdateError> {
        if index == 0 || index > self.config.domain_size {
            return Err(RangeError {
                index,
                domain_size: self.config.domain_size,
            });
        }
        let position = self.config.routing_hash_builder.hash_one(index) % self.config.domain_size;
        for (depth, level) in self.levels.iter_mut().enumerate() {
            // Level j keeps indices whose routing position falls below
            // floor(N / 2^(j+1)). The thresholds are nested, so the first
            // level that rejects ends the walk.
            if position >= self.config.domain_size >> (depth + 1) {
                break;
            }
            level.update(index, weight);
        }
        Ok(())
    }

    /// Scans levels from the widest sub-sample down, skipping levels that do
    /// not look sparse, and resolves the first non-empty candidate set. A
    /// `None` does not mean the summarized vector is all-zero, only that
    /// recovery failed at every level this time.
    fn recover(&self, hint: Option<u64>) -> Option<(u64, i64)> {
        let hint =
            hint.unwrap_or_else(|| rand::thread_rng().gen_range(0..self.config.domain_size));
        self.levels
            .iter()
            .filter(|level| level.looks_sparse())
            .map(|level| level.recover(hint))
            .find(|candidates| !candidates.is_empty())
            .map(|candidates| self.select(&candidates))
    }

    fn drain(&mut self) -> Vec<(u64, i64)> {
        let mut sample = Vec::new();
        while let Some((index, weight)) = self.recover(None) {
            if self.update(index, -weight).is_err() {
                // An out-of-range index can only be a fabrication from
                // colliding buckets; it cannot be compensated away, so stop
                // rather than loop on it.
                break;
            }
            sample.push((index, weight));
        }
        sample
    }
}

impl L0Sampler {
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Picks the candidate with the smallest routing hash. Repeated
    /// observations of one true index collapse to the same key, and when a
    /// grid collision surfaces several true indices the choice stays
    /// reproducible and hash-uniform rather than arbitrary.
    fn select(&self, candidates: &HashSet<(u64, i64)>) -> (u64, i64) {
        *candidates
            .iter()
            .min_by_key(|&&(index, weight)| {
                (
                    self.config.routing_hash_builder.hash_one(index),
                    index,
                    weight,
                )
            })
            .unwrap() // callers only pass non-empty sets
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RangeError {
    pub index: u64,
    pub domain_size: u64,
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "index {} outside the domain 1..={}",
            self.index, self.domain_size
        )
    }
}

impl error::Error for RangeError {}
