//! Fixed-capacity circular storage of experiences.
use crate::FrameReplayError;
use anyhow::Result;
use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn};
use num_traits::Zero;

/// A single interaction with an environment.
#[derive(Clone, Debug, PartialEq)]
pub struct Experience<T> {
    /// Raw observation.
    pub obs: ArrayD<T>,

    /// Index of the discrete action taken after `obs`.
    pub act: i64,

    /// Reward.
    pub reward: f32,

    /// Whether the episode terminated at this step.
    pub is_terminated: bool,
}

impl<T> Experience<T> {
    /// Creates an experience.
    pub fn new(obs: ArrayD<T>, act: i64, reward: f32, is_terminated: bool) -> Self {
        Self {
            obs,
            act,
            reward,
            is_terminated,
        }
    }
}

/// Ring buffer of experiences stored in parallel arrays.
///
/// All arrays are allocated in [`RingStore::new`]. The ring is represented by the
/// insertion index `i` and the number of stored experiences `size`: after `n` pushes
/// `i == n % capacity` and `size == min(n, capacity)`.
#[derive(Clone, Debug)]
pub struct RingStore<T> {
    capacity: usize,
    i: usize,
    size: usize,
    obs_shape: Vec<usize>,

    /// Shape `[capacity, obs_shape..]`.
    obs: ArrayD<T>,
    act: Vec<i64>,
    reward: Vec<f32>,
    is_terminated: Vec<i8>,
}

impl<T> RingStore<T>
where
    T: Clone + Zero,
{
    /// Allocates a store for `capacity` experiences with observations of `obs_shape`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameReplayError::InvalidConfig`] if `capacity` is zero or
    /// `obs_shape` has an empty axis.
    pub fn new(capacity: usize, obs_shape: &[usize]) -> Result<Self> {
        if capacity == 0 {
            return Err(
                FrameReplayError::InvalidConfig("capacity must be positive".to_string()).into(),
            );
        }
        if obs_shape.iter().any(|&d| d == 0) {
            return Err(FrameReplayError::InvalidConfig(format!(
                "obs_shape {:?} has an empty axis",
                obs_shape
            ))
            .into());
        }

        let mut shape = obs_shape.to_vec();
        shape.insert(0, capacity);

        Ok(Self {
            capacity,
            i: 0,
            size: 0,
            obs_shape: obs_shape.to_vec(),
            obs: ArrayD::zeros(IxDyn(&shape)),
            act: vec![0; capacity],
            reward: vec![0.; capacity],
            is_terminated: vec![0; capacity],
        })
    }

    /// Writes `tr` over the oldest experience once the store is full.
    ///
    /// # Errors
    ///
    /// Returns [`FrameReplayError::ShapeMismatch`] if the observation does not have
    /// the configured shape. Nothing is written in that case.
    pub fn push(&mut self, tr: Experience<T>) -> Result<()> {
        if tr.obs.shape() != self.obs_shape.as_slice() {
            return Err(FrameReplayError::ShapeMismatch {
                expected: self.obs_shape.clone(),
                actual: tr.obs.shape().to_vec(),
            }
            .into());
        }

        let i = self.i;
        self.obs.index_axis_mut(Axis(0), i).assign(&tr.obs);
        self.act[i] = tr.act;
        self.reward[i] = tr.reward;
        self.is_terminated[i] = tr.is_terminated as i8;

        self.i = (i + 1) % self.capacity;
        self.size = (self.size + 1).min(self.capacity);

        Ok(())
    }

    /// Zero-fills all arrays and empties the ring.
    pub fn reset(&mut self) {
        self.obs.fill(T::zero());
        self.act.iter_mut().for_each(|a| *a = 0);
        self.reward.iter_mut().for_each(|r| *r = 0.);
        self.is_terminated.iter_mut().for_each(|d| *d = 0);
        self.i = 0;
        self.size = 0;
    }

    /// Returns a copy of the experience stored at position `ix`.
    pub fn get(&self, ix: usize) -> Option<Experience<T>> {
        if ix >= self.size {
            return None;
        }
        Some(Experience {
            obs: self.obs.index_axis(Axis(0), ix).to_owned(),
            act: self.act[ix],
            reward: self.reward[ix],
            is_terminated: self.is_terminated[ix] != 0,
        })
    }
}

impl<T> RingStore<T> {
    /// Maximum number of experiences.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored experiences.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if no experience is stored.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Position where the next experience will be written.
    pub fn cursor(&self) -> usize {
        self.i
    }

    /// Shape of a single observation.
    pub fn obs_shape(&self) -> &[usize] {
        &self.obs_shape
    }

    /// Position of the most recently pushed experience.
    pub fn last_index(&self) -> Option<usize> {
        if self.size == 0 {
            None
        } else {
            Some((self.i + self.capacity - 1) % self.capacity)
        }
    }

    /// Observations of all positions, shape `[capacity, obs_shape..]`.
    pub fn obs(&self) -> ArrayViewD<'_, T> {
        self.obs.view()
    }

    /// Actions of all positions.
    pub fn act(&self) -> &[i64] {
        &self.act
    }

    /// Rewards of all positions.
    pub fn reward(&self) -> &[f32] {
        &self.reward
    }

    /// Termination flags of all positions, `1` for terminated.
    pub fn is_terminated(&self) -> &[i8] {
        &self.is_terminated
    }

    /// Returns the number of termination flags among stored experiences.
    pub fn num_terminated_flags(&self) -> usize {
        self.is_terminated[..self.size]
            .iter()
            .map(|&d| d as usize)
            .sum()
    }

    /// Returns the sum of rewards of stored experiences.
    pub fn sum_rewards(&self) -> f32 {
        self.reward[..self.size].iter().sum()
    }
}
