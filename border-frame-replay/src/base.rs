//! Interfaces of buffers storing experiences.
//!
//! Storing experiences and generating batches are separate concerns: a process
//! collecting experiences only needs [`ExperienceBufferBase`], while a trainer
//! only needs [`ReplayBufferBase`].
use anyhow::Result;

/// Interface for buffers that store experiences from environments.
pub trait ExperienceBufferBase {
    /// The type of items stored in the buffer.
    type Item;

    /// Pushes an experience into the buffer.
    fn push(&mut self, tr: Self::Item) -> Result<()>;

    /// Returns the number of experiences in the buffer.
    fn len(&self) -> usize;

    /// Returns `true` if the buffer holds no experience.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Interface for replay buffers that generate batches for training.
pub trait ReplayBufferBase: Sized {
    /// Configuration of the replay buffer.
    type Config: Clone;

    /// The type of batch generated for training.
    type Batch;

    /// Builds a replay buffer from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    fn build(config: &Self::Config) -> Result<Self>;

    /// Constructs a batch of `size` experiences for training.
    ///
    /// The returned batch is owned by the caller.
    fn batch(&mut self, size: usize) -> Result<Self::Batch>;
}
