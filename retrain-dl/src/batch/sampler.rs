use crate::common::*;

/// The sample indexes allocated for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchIndexes {
    pub indexes: Vec<usize>,
    /// Position of the batch's first sample within the epoch.
    pub offset: usize,
    pub epoch: usize,
}

/// Allocates batch indexes over an endless series of epochs.
///
/// Allocation mutates the shared cursor and must be exclusive, so the state
/// sits behind a mutex; everything callers do with the returned indexes
/// happens outside of it. The final batch of an epoch is truncated to the
/// remainder, and the next allocation starts a fresh, optionally reshuffled
/// epoch.
#[derive(Debug)]
pub struct IndexSampler {
    samples: usize,
    batch_size: usize,
    shuffle: bool,
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    order: Vec<usize>,
    position: usize,
    epoch: usize,
    rng: StdRng,
}

impl IndexSampler {
    pub fn new(samples: usize, batch_size: usize, shuffle: bool, seed: Option<u64>) -> Result<Self> {
        ensure!(samples > 0, "cannot sample from an empty index list");
        ensure!(batch_size > 0, "batch size must be positive");

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut order: Vec<_> = (0..samples).collect();
        if shuffle {
            order.shuffle(&mut rng);
        }

        Ok(Self {
            samples,
            batch_size,
            shuffle,
            state: Mutex::new(State {
                order,
                position: 0,
                epoch: 0,
                rng,
            }),
        })
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Allocates the next batch of sample indexes. Never exhausts.
    pub fn next_batch(&self) -> BatchIndexes {
        let mut state = self.state.lock().unwrap();

        if state.position >= self.samples {
            state.position = 0;
            state.epoch += 1;
            if self.shuffle {
                let State { order, rng, .. } = &mut *state;
                order.shuffle(rng);
            }
        }

        let offset = state.position;
        let end = (offset + self.batch_size).min(self.samples);
        let indexes = state.order[offset..end].to_vec();
        state.position = end;

        BatchIndexes {
            indexes,
            offset,
            epoch: state.epoch,
        }
    }
}
