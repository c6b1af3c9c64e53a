use std::{error, fmt};

use ahash::RandomState;
use rand::random;

#[derive(Clone, Debug)]
pub struct Config {
    pub(crate) num_rows: usize,
    pub(crate) num_columns: usize,
    seeds: [u64; 4],
    /// One independent hash builder per row, used for column routing.
    pub(crate) row_hash_builders: Vec<RandomState>,
}

impl Config {
    pub fn new(
        num_rows: usize,
        num_columns: usize,
        seeds: Option<[u64; 4]>,
    ) -> Result<Self, ConfigError> {
        if num_rows == 0 {
            return Err(ConfigError::ZeroRows);
        }
        if num_columns == 0 {
            return Err(ConfigError::ZeroColumns);
        }
        let seeds_or_random = seeds.unwrap_or_else(random);
        Ok(Self {
            num_rows,
            num_columns,
            seeds: seeds_or_random,
            row_hash_builders: (0..num_rows)
                .map(|row| {
                    RandomState::with_seeds(
                        seeds_or_random[0],
                        seeds_or_random[1],
                        seeds_or_random[2],
                        seeds_or_random[3] ^ row as u64,
                    )
                })
                .collect(),
        })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }
}

impl PartialEq for Config {
    fn eq(&self, other: &Self) -> bool {
        self.num_rows == other.num_rows
            && self.num_columns == other.num_columns
            && self.seeds == other.seeds
    }
}

impl Eq for Config {}

#[derive(Clone, Debug)]
pub enum ConfigError {
    ZeroRows,
    ZeroColumns,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroRows => write!(f, "the number of rows should not be zero"),
            ConfigError::ZeroColumns => write!(f, "the number of columns should not be zero"),
        }
    }
}

impl error::Error for ConfigError {}
