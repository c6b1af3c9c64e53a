use std::{error, fmt};

use ahash::RandomState;
use rand::random;

/// Indices above this would let a single update's Σw·i² term escape the
/// `i128` moment accumulators, and level thresholds would no longer fit in a
/// plain shift.
pub const MAX_DOMAIN_SIZE: u64 = 1 << 32;

#[derive(Clone, Debug)]
pub struct Config {
    /// The index universe is `1..=domain_size`.
    pub(crate) domain_size: u64,
    pub(crate) sparsity: usize,
    pub(crate) num_rows: usize,
    pub(crate) num_levels: usize,
    seeds: [u64; 8],
    /// Shared by level routing and select tie-breaking, distinct from the
    /// per-row seeds used inside each level's grid.
    pub(crate) routing_hash_builder: RandomState,
    /// One grid shape `(num_rows, 2·sparsity)` shared by every level; the
    /// levels also share row seeds, so they differ only in the substream they
    /// are fed.
    pub(crate) level_config: sparse_recovery::Config,
}

impl Config {
    /// Builds a sampler configuration for a domain of `domain_size` indices
    /// and per-level recovery sparsity `sparsity`.
    ///
    /// When `num_rows` is `None` it is derived from the sparsity via the
    /// failure-rate slack δ = 2^(-s/12), as k = round(log2(s/δ)). Cormode and
    /// Firmani observe that small row counts (k <= 7) already hold the failure
    /// rate steady, so the derivation errs toward few rows.
    pub fn new(
        domain_size: u64,
        sparsity: usize,
        num_rows: Option<usize>,
        seeds: Option<[u64; 8]>,
    ) -> Result<Self, ConfigError> {
        if domain_size < 2 {
            return Err(ConfigError::DomainTooSmall);
        }
        if domain_size > MAX_DOMAIN_SIZE {
            return Err(ConfigError::DomainTooLarge);
        }
        if sparsity == 0 {
            return Err(ConfigError::ZeroSparsity);
        }
        let num_rows = match num_rows {
            Some(num_rows) => num_rows,
            None => {
                let delta = 2_f64.powf(-(sparsity as f64) / 12.0);
                (sparsity as f64 / delta).log2().round() as usize
            }
        };
        if num_rows == 0 {
            return Err(ConfigError::ZeroRows);
        }
        let num_levels = (domain_size as f64).log2().round() as usize;
        let seeds_or_random = seeds.unwrap_or_else(random);
        Ok(Self {
            domain_size,
            sparsity,
            num_rows,
            num_levels,
            seeds: seeds_or_random,
            routing_hash_builder: RandomState::with_seeds(
                seeds_or_random[0],
                seeds_or_random[1],
                seeds_or_random[2],
                seeds_or_random[3],
            ),
            level_config: sparse_recovery::Config::new(
                num_rows,
                2 * sparsity,
                Some([
                    seeds_or_random[4],
                    seeds_or_random[5],
                    seeds_or_random[6],
                    seeds_or_random[7],
                ]),
            )
            .unwrap_or_else(
                // Rows and columns were validated above.
                |_| unreachable!(),
            ),
        })
    }

    pub fn domain_size(&self) -> u64 {
        self.domain_size
    }

    pub fn sparsity(&self) -> usize {
        self.sparsity
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_levels(&self) -> usize {
        self.num_levels
    }
}

impl PartialEq for Config {
    fn eq(&self, other: &Self) -> bool {
        self.domain_size == other.domain_size
            && self.sparsity == other.sparsity
            && self.num_rows == other.num_rows
            && self.seeds == other.seeds
    }
}

impl Eq for Config {}

#[derive(Clone, Debug)]
pub enum ConfigError {
    DomainTooSmall,
    DomainTooLarge,
    ZeroSparsity,
    ZeroRows,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DomainTooSmall => {
                write!(f, "the domain should hold at least two indices")
            }
            ConfigError::DomainTooLarge => {
                write!(f, "the domain should hold at most 2^32 indices")
            }
            ConfigError::ZeroSparsity => write!(f, "the sparsity should not be zero"),
            ConfigError::ZeroRows => {
                write!(f, "the number of rows should not be zero, given or derived")
            }
        }
    }
}

impl error::Error for ConfigError {}
