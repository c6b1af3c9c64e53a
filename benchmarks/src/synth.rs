use rand::prelude::*;

/// Synthetic `(index, weight)` streams for exercising the sampler.
pub trait Stream {
    fn entries(&self, rng_seed: u64) -> Vec<(u64, i64)>;
}

/// Uniformly random indices with unit weights; repeated indices accumulate.
#[derive(Clone, Debug)]
pub struct Uniform {
    domain_size: u64,
    num_entries: usize,
}

impl Uniform {
    pub fn new(domain_size: u64, num_entries: usize) -> Self {
        Self {
            domain_size,
            num_entries,
        }
    }
}

impl Stream for Uniform {
    fn entries(&self, rng_seed: u64) -> Vec<(u64, i64)> {
        let mut rng = StdRng::seed_from_u64(rng_seed);
        (0..self.num_entries)
            .map(|_| (rng.gen_range(1..=self.domain_size), 1))
            .collect()
    }
}

/// Zipf-distributed indices, so a handful of indices carry most of the mass.
#[derive(Clone, Debug)]
pub struct Zipf {
    domain_size: u64,
    exponent: f64,
    num_entries: usize,
}

impl Zipf {
    pub fn new(domain_size: u64, exponent: f64, num_entries: usize) -> Self {
        Self {
            domain_size,
            exponent,
            num_entries,
        }
    }
}

impl Stream for Zipf {
    fn entries(&self, rng_seed: u64) -> Vec<(u64, i64)> {
        let mut rng = StdRng::seed_from_u64(rng_seed);
        let zipf = rand_distr::Zipf::new(self.domain_size, self.exponent).unwrap();
        (0..self.num_entries)
            .map(|_| (rng.sample(zipf) as u64, 1))
            .collect()
    }
}

/// A fixed number of distinct indices, each updated once with unit weight.
/// Useful for drain benchmarks, where the distinct count bounds the work.
#[derive(Clone, Debug)]
pub struct Distinct {
    num_entries: u64,
}

impl Distinct {
    pub fn new(num_entries: u64) -> Self {
        Self { num_entries }
    }
}

impl Stream for Distinct {
    fn entries(&self, rng_seed: u64) -> Vec<(u64, i64)> {
        let mut entries: Vec<(u64, i64)> = (1..=self.num_entries).map(|index| (index, 1)).collect();
        entries.shuffle(&mut StdRng::seed_from_u64(rng_seed));
        entries
    }
}
