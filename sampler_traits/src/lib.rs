use std::error;

/// A sketch summarizing a stream of additive `(index, weight)` updates that
/// can later hand back individual nonzero entries of the summarized vector.
pub trait StreamSampler {
    type UpdateError: error::Error;

    /// Applies `weight` to `index`. Negative weights remove previously
    /// accumulated mass.
    fn update(&mut self, index: u64, weight: i64) -> Result<(), Self::UpdateError>;

    /// Attempts to recover one currently-nonzero `(index, weight)` pair.
    /// `None` is a normal outcome of the probabilistic scheme, not an error.
    fn recover(&self, hint: Option<u64>) -> Option<(u64, i64)>;

    /// Repeatedly recovers and removes entries until recovery fails,
    /// returning the pairs in recovery order. Consumes the sketch contents.
    fn drain(&mut self) -> Vec<(u64, i64)>;
}

pub trait New {
    type Config;

    fn new(config: &Self::Config) -> Self;
}
