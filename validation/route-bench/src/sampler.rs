//! Random selection of query parameters.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::prelude::*;
use routing_client::TravelMode;

use crate::coords::CoordinateSet;
use crate::error::{BenchError, BenchResult};
use crate::query::{DirectPathQuery, MatrixQuery};

/// Picks coordinates and a travel mode for each iteration.
///
/// Generic over the generator so tests can inject a seeded one. Each worker
/// owns its own sampler; see [`Sampler::fork`].
pub struct Sampler<R = StdRng> {
    rng: R,
}

impl Sampler<StdRng> {
    /// Sampler with a deterministic generator.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Sampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Derive an independent sampler, e.g. one per worker.
    pub fn fork(&mut self) -> Sampler<StdRng> {
        Sampler::seeded(self.rng.gen())
    }

    pub fn pick_mode(&mut self) -> TravelMode {
        TravelMode::ALL[self.rng.gen_range(0..TravelMode::ALL.len())]
    }

    /// Random origin and destination (possibly the same one) and a random mode.
    pub fn pick_direct_path(&mut self, coords: &CoordinateSet) -> BenchResult<DirectPathQuery> {
        let from = self.pick_index(coords)?;
        let to = self.pick_index(coords)?;
        let mode = self.pick_mode();
        Ok(DirectPathQuery::new(
            coords[from].clone(),
            coords[to].clone(),
            mode,
        ))
    }

    /// One random origin against every coordinate of the set.
    ///
    /// The returned query carries the default `max_duration`.
    pub fn pick_matrix_origin(&mut self, coords: &CoordinateSet) -> BenchResult<MatrixQuery> {
        let from = self.pick_index(coords)?;
        let mode = self.pick_mode();
        Ok(MatrixQuery::new(coords[from].clone(), coords.to_vec(), mode))
    }

    fn pick_index(&mut self, coords: &CoordinateSet) -> BenchResult<usize> {
        if coords.is_empty() {
            return Err(BenchError::Configuration(
                "cannot sample from an empty coordinate set".to_string(),
            ));
        }
        Ok(self.rng.gen_range(0..coords.len()))
    }
}

/// Process seed derived from the wall clock.
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
