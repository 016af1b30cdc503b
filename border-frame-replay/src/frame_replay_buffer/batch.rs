//! Batches of stacked observations.
use super::{BoundaryAwareSampler, RingStore};
use anyhow::Result;
use ndarray::{ArrayD, Axis, IxDyn, Slice};
use num_traits::Zero;
use rand::Rng;

/// A batch of transitions with stacked observations.
///
/// For a sampled index `i` and history window `h`, `obs` holds the observations
/// at positions `i - h .. i` and `next_obs` those at `i .. i + h`.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBatch<T> {
    /// Stacked observations, shape `[batch_size, history_window, obs_shape..]`.
    pub obs: ArrayD<T>,

    /// Stacked next observations, same shape as `obs`.
    pub next_obs: ArrayD<T>,

    /// Actions at the sampled indices.
    pub act: Vec<i64>,

    /// Rewards at the sampled indices.
    pub reward: Vec<f32>,

    /// Termination flags at the sampled indices.
    pub is_terminated: Vec<i8>,

    /// Sampled indices.
    pub ix_sample: Vec<usize>,
}

impl<T> FrameBatch<T>
where
    T: Clone + Zero,
{
    /// Allocates a zero-filled batch.
    pub fn zeros(batch_size: usize, history_window: usize, obs_shape: &[usize]) -> Self {
        let mut shape = obs_shape.to_vec();
        shape.insert(0, history_window);
        shape.insert(0, batch_size);

        Self {
            obs: ArrayD::zeros(IxDyn(&shape)),
            next_obs: ArrayD::zeros(IxDyn(&shape)),
            act: vec![0; batch_size],
            reward: vec![0.; batch_size],
            is_terminated: vec![0; batch_size],
            ix_sample: vec![0; batch_size],
        }
    }

    /// Zero-fills the batch.
    pub fn reset(&mut self) {
        self.obs.fill(T::zero());
        self.next_obs.fill(T::zero());
        self.act.iter_mut().for_each(|a| *a = 0);
        self.reward.iter_mut().for_each(|r| *r = 0.);
        self.is_terminated.iter_mut().for_each(|d| *d = 0);
        self.ix_sample.iter_mut().for_each(|ix| *ix = 0);
    }

    /// Overwrites every slot of the batch with a transition drawn from `store`.
    ///
    /// If sampling fails the batch is left partially overwritten.
    pub(super) fn fill<R: Rng + ?Sized>(
        &mut self,
        store: &RingStore<T>,
        sampler: &BoundaryAwareSampler,
        history_window: usize,
        rng: &mut R,
    ) -> Result<()> {
        let h = history_window;
        BoundaryAwareSampler::check_size(store.len(), h)?;

        for slot in 0..self.len() {
            let i = sampler.sample_ix(rng, store.is_terminated(), store.len(), h)?;
            let obs = store.obs();

            self.obs
                .index_axis_mut(Axis(0), slot)
                .assign(&obs.slice_axis(Axis(0), Slice::from(i - h..i)));
            self.next_obs
                .index_axis_mut(Axis(0), slot)
                .assign(&obs.slice_axis(Axis(0), Slice::from(i..i + h)));
            self.act[slot] = store.act()[i];
            self.reward[slot] = store.reward()[i];
            self.is_terminated[slot] = store.is_terminated()[i];
            self.ix_sample[slot] = i;
        }

        Ok(())
    }
}

impl<T> FrameBatch<T> {
    /// Number of transitions in the batch.
    pub fn len(&self) -> usize {
        self.reward.len()
    }

    /// Returns `true` if the batch has no transition.
    pub fn is_empty(&self) -> bool {
        self.reward.is_empty()
    }
}
