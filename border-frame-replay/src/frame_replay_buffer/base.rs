//! Replay buffer sampling stacked observations.
use super::{BoundaryAwareSampler, Experience, FrameBatch, FrameReplayBufferConfig, RingStore};
use crate::{ExperienceBufferBase, ReplayBufferBase};
use anyhow::Result;
use log::debug;
use num_traits::Zero;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// A replay buffer returning batches of stacked observations.
///
/// Experiences are stored in a [`RingStore`]. Sampled indices never have an
/// episode boundary in their history window, see [`BoundaryAwareSampler`].
///
/// # Examples
///
/// ```rust
/// use border_frame_replay::{Experience, FrameReplayBuffer, FrameReplayBufferConfig};
/// use ndarray::{ArrayD, IxDyn};
///
/// let config = FrameReplayBufferConfig::default()
///     .capacity(100)
///     .batch_size(4)
///     .history_window(2)
///     .obs_shape(vec![3]);
/// let mut buffer = FrameReplayBuffer::<f32>::build(&config)?;
///
/// for t in 0..10 {
///     let obs = ArrayD::from_elem(IxDyn(&[3]), t as f32);
///     buffer.push(Experience::new(obs, 0, 1.0, false))?;
/// }
///
/// let batch = buffer.sample()?;
/// assert_eq!(batch.obs.shape(), &[4, 2, 3]);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct FrameReplayBuffer<T> {
    history_window: usize,
    store: RingStore<T>,
    sampler: BoundaryAwareSampler,

    /// Reused by [`FrameReplayBuffer::sample`].
    batch: FrameBatch<T>,
    rng: StdRng,
}

impl<T> FrameReplayBuffer<T>
where
    T: Clone + Zero,
{
    /// Builds a replay buffer, allocating all storage up front.
    ///
    /// # Errors
    ///
    /// Returns [`FrameReplayError::InvalidConfig`](crate::FrameReplayError::InvalidConfig)
    /// if the configuration can never produce a sample.
    pub fn build(config: &FrameReplayBufferConfig) -> Result<Self> {
        config.check()?;
        debug!(
            "Build FrameReplayBuffer: capacity = {}, batch_size = {}, history_window = {}, obs_shape = {:?}",
            config.capacity, config.batch_size, config.history_window, config.obs_shape
        );

        Ok(Self {
            history_window: config.history_window,
            store: RingStore::new(config.capacity, &config.obs_shape)?,
            sampler: BoundaryAwareSampler::new(config.max_attempts),
            batch: FrameBatch::zeros(
                config.batch_size,
                config.history_window,
                &config.obs_shape,
            ),
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    /// Pushes an experience, evicting the oldest one if the buffer is full.
    pub fn push(&mut self, tr: Experience<T>) -> Result<()> {
        self.store.push(tr)
    }

    /// Fills the internal batch using the buffer's own random number generator.
    ///
    /// The returned batch borrows the buffer, so it must be dropped (or cloned)
    /// before the next call. Its contents are overwritten by every call.
    ///
    /// # Errors
    ///
    /// * [`NotEnoughData`](crate::FrameReplayError::NotEnoughData) if at most
    ///   `2 * history_window` experiences are stored.
    /// * [`NoValidIndex`](crate::FrameReplayError::NoValidIndex) if no index
    ///   without an episode boundary was found.
    pub fn sample(&mut self) -> Result<&FrameBatch<T>> {
        self.batch
            .fill(&self.store, &self.sampler, self.history_window, &mut self.rng)?;
        Ok(&self.batch)
    }

    /// Same as [`FrameReplayBuffer::sample`] with the given random number generator.
    pub fn sample_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&FrameBatch<T>> {
        self.batch
            .fill(&self.store, &self.sampler, self.history_window, rng)?;
        Ok(&self.batch)
    }

    /// Zero-fills the stored experiences and the batch, and empties the ring.
    pub fn reset(&mut self) {
        debug!("Reset FrameReplayBuffer");
        self.store.reset();
        self.batch.reset();
    }
}

impl<T> FrameReplayBuffer<T> {
    /// Returns the underlying storage.
    pub fn store(&self) -> &RingStore<T> {
        &self.store
    }

    /// Number of stacked observations in a sample.
    pub fn history_window(&self) -> usize {
        self.history_window
    }

    /// Number of transitions returned by [`FrameReplayBuffer::sample`].
    pub fn batch_size(&self) -> usize {
        self.batch.len()
    }

    /// Returns the batch filled by the last call of [`FrameReplayBuffer::sample`] or
    /// [`FrameReplayBuffer::sample_with`].
    pub fn last_batch(&self) -> &FrameBatch<T> {
        &self.batch
    }

    /// Number of stored experiences.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if no experience is stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns `true` if [`FrameReplayBuffer::sample`] has enough data.
    ///
    /// Sampling may still fail if episode boundaries exclude every index.
    pub fn is_ready(&self) -> bool {
        self.store.len() > 2 * self.history_window
    }
}

impl<T> ExperienceBufferBase for FrameReplayBuffer<T>
where
    T: Clone + Zero,
{
    type Item = Experience<T>;

    fn push(&mut self, tr: Self::Item) -> Result<()> {
        FrameReplayBuffer::push(self, tr)
    }

    fn len(&self) -> usize {
        self.store.len()
    }
}

impl<T> ReplayBufferBase for FrameReplayBuffer<T>
where
    T: Clone + Zero,
{
    type Config = FrameReplayBufferConfig;
    type Batch = FrameBatch<T>;

    fn build(config: &Self::Config) -> Result<Self> {
        FrameReplayBuffer::build(config)
    }

    /// Allocates a new batch of `size` transitions, leaving the internal batch
    /// untouched.
    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        let mut batch = FrameBatch::zeros(size, self.history_window, self.store.obs_shape());
        batch.fill(&self.store, &self.sampler, self.history_window, &mut self.rng)?;
        Ok(batch)
    }
}
