// src/random.rs
//
// Gaussian noise for the thermal kernels. The generator is always passed in
// explicitly; nothing here holds global state.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// One standard-normal sample.
#[inline]
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.sample(StandardNormal)
}

/// One independent random stream per parallel partition.
///
/// All streams share the seed but use distinct ChaCha stream ids, so a
/// fixed (seed, partition count) pair always reproduces the same noise.
#[derive(Debug, Clone)]
pub struct PartitionStreams {
    streams: Vec<ChaCha8Rng>,
}

impl PartitionStreams {
    pub fn new(seed: u64, n_partitions: usize) -> Self {
        let streams = (0..n_partitions.max(1))
            .map(|p| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_stream(p as u64);
                rng
            })
            .collect();
        Self { streams }
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ChaCha8Rng> {
        self.streams.iter_mut()
    }

    pub fn get_mut(&mut self, partition: usize) -> &mut ChaCha8Rng {
        &mut self.streams[partition]
    }
}
