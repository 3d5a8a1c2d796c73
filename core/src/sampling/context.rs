//! Sampling Context

use crate::pbrt::*;
use crate::rng::*;

/// Where the random numbers of a `SamplingContext` come from.
#[derive(Clone, Debug)]
enum SampleSource {
    /// PCG pseudo-random stream.
    Random(RNG),

    /// A recorded sequence replayed in order. Cycles when exhausted.
    Fixed { values: Vec<Float>, cursor: usize },
}

/// Per-path cursor handing out uniform random numbers in [0, 1).
///
/// Values are handed out in atomic blocks of 1, 2 or 4 dimensions and every
/// drawn dimension is counted so callers can verify how many randoms a
/// scattering function consumed.
#[derive(Clone, Debug)]
pub struct SamplingContext {
    /// The source of random numbers.
    source: SampleSource,

    /// Number of dimensions drawn so far.
    draws: usize,
}

impl SamplingContext {
    /// Create a context backed by a PCG stream.
    ///
    /// * `seed` - Sequence index used to seed the generator.
    pub fn new(seed: u64) -> Self {
        Self {
            source: SampleSource::Random(RNG::new(seed)),
            draws: 0,
        }
    }

    /// Create a context that replays a fixed sequence of values.
    ///
    /// * `values` - Values in [0, 1). Must not be empty.
    pub fn from_sequence(values: &[Float]) -> Self {
        debug_assert!(!values.is_empty());
        let values = values
            .iter()
            .map(|v| clamp(*v, 0.0, ONE_MINUS_EPSILON))
            .collect();
        Self {
            source: SampleSource::Fixed { values, cursor: 0 },
            draws: 0,
        }
    }

    /// Returns the number of dimensions drawn so far.
    pub fn draw_count(&self) -> usize {
        self.draws
    }

    /// Returns the next value.
    fn next(&mut self) -> Float {
        self.draws += 1;
        match &mut self.source {
            SampleSource::Random(rng) => rng.uniform_float(),
            SampleSource::Fixed { values, cursor } => {
                if values.is_empty() {
                    return 0.0;
                }
                let v = values[*cursor % values.len()];
                *cursor += 1;
                v
            }
        }
    }

    /// Returns a 1D sample.
    pub fn next_1d(&mut self) -> Float {
        self.next()
    }

    /// Returns a 2D sample.
    pub fn next_2d(&mut self) -> [Float; 2] {
        [self.next(), self.next()]
    }

    /// Returns a 4D sample.
    pub fn next_4d(&mut self) -> [Float; 4] {
        [self.next(), self.next(), self.next(), self.next()]
    }
}
