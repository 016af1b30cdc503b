//! Configuration of [`FrameReplayBuffer`](super::FrameReplayBuffer).
use crate::FrameReplayError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`FrameReplayBuffer`](super::FrameReplayBuffer).
///
/// # Examples
///
/// ```rust
/// use border_frame_replay::FrameReplayBufferConfig;
///
/// let config = FrameReplayBufferConfig::default()
///     .capacity(100_000)
///     .batch_size(32)
///     .history_window(4)
///     .obs_shape(vec![84, 84])
///     .seed(42);
/// ```
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct FrameReplayBufferConfig {
    /// Maximum number of experiences. When the buffer is full, new experiences
    /// replace the oldest ones.
    pub capacity: usize,

    /// Number of samples in a batch returned by
    /// [`FrameReplayBuffer::sample`](super::FrameReplayBuffer::sample).
    pub batch_size: usize,

    /// Number of consecutive observations stacked into a state.
    pub history_window: usize,

    /// Shape of a single raw observation.
    pub obs_shape: Vec<usize>,

    /// Seed of the random number generator used for sampling.
    pub seed: u64,

    /// Maximum number of draws for a single sample before giving up.
    /// Draws are rejected when an episode boundary lies in the history window.
    pub max_attempts: usize,
}

impl Default for FrameReplayBufferConfig {
    fn default() -> Self {
        Self {
            capacity: 10000,
            batch_size: 32,
            history_window: 4,
            obs_shape: vec![84, 84],
            seed: 42,
            max_attempts: 1000,
        }
    }
}

impl FrameReplayBufferConfig {
    /// Sets the capacity of the replay buffer.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the batch size.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the number of stacked observations.
    pub fn history_window(mut self, history_window: usize) -> Self {
        self.history_window = history_window;
        self
    }

    /// Sets the shape of a raw observation.
    pub fn obs_shape(mut self, obs_shape: Vec<usize>) -> Self {
        self.obs_shape = obs_shape;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the maximum number of draws for a single sample.
    pub fn max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Checks that the configuration can produce valid samples.
    ///
    /// Sampling needs more than `2 * history_window` stored experiences, so the
    /// capacity must exceed that number.
    pub fn check(&self) -> Result<()> {
        if self.capacity == 0 {
            return invalid("capacity must be positive".to_string());
        }
        if self.batch_size == 0 {
            return invalid("batch_size must be positive".to_string());
        }
        if self.history_window == 0 {
            return invalid("history_window must be positive".to_string());
        }
        if self
            .history_window
            .checked_mul(2)
            .map_or(true, |m| m >= self.capacity)
        {
            return invalid(format!(
                "capacity ({}) must exceed twice the history_window ({})",
                self.capacity, self.history_window
            ));
        }
        if self.obs_shape.iter().any(|&d| d == 0) {
            return invalid(format!("obs_shape {:?} has an empty axis", self.obs_shape));
        }
        if self.max_attempts == 0 {
            return invalid("max_attempts must be positive".to_string());
        }
        Ok(())
    }

    /// Loads the configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves the configuration to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

fn invalid(msg: String) -> Result<()> {
    Err(FrameReplayError::InvalidConfig(msg).into())
}

#[cfg(test)]
mod tests {
    use super::FrameReplayBufferConfig;
    use crate::FrameReplayError;
    use anyhow::Result;
    use tempdir::TempDir;

    fn check_err(config: &FrameReplayBufferConfig) -> FrameReplayError {
        config
            .check()
            .unwrap_err()
            .downcast::<FrameReplayError>()
            .unwrap()
    }

    #[test]
    fn test_default_is_valid() {
        assert!(FrameReplayBufferConfig::default().check().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        let base = FrameReplayBufferConfig::default()
            .capacity(10)
            .history_window(2)
            .obs_shape(vec![3]);

        for config in [
            base.clone().capacity(0),
            base.clone().batch_size(0),
            base.clone().history_window(0),
            base.clone().history_window(5),
            base.clone().history_window(10),
            base.clone().history_window(usize::MAX / 2 + 1),
            base.clone().capacity(usize::MAX).history_window(usize::MAX),
            base.clone().obs_shape(vec![3, 0]),
            base.clone().max_attempts(0),
        ]
        .iter()
        {
            match check_err(config) {
                FrameReplayError::InvalidConfig(_) => {}
                e => panic!("unexpected error {:?}", e),
            }
        }

        // 2 * 4 < 9
        assert!(base.capacity(9).history_window(4).check().is_ok());
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let tmp_dir = TempDir::new("frame_replay_buffer_config")?;
        let path = tmp_dir.path().join("config.yaml");
        let config = FrameReplayBufferConfig::default()
            .capacity(500)
            .batch_size(8)
            .history_window(3)
            .obs_shape(vec![1, 16, 16])
            .seed(7)
            .max_attempts(50);

        config.save(&path)?;
        let loaded = FrameReplayBufferConfig::load(&path)?;
        assert_eq!(config, loaded);
        Ok(())
    }
}
