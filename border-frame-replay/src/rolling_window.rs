//! A window of the most recent observations.
use crate::FrameReplayError;
use anyhow::Result;
use log::debug;
use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn, SliceInfoElem};
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Configuration of [`RollingWindow`].
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct RollingWindowConfig {
    /// Number of stacked observations.
    pub n_stack: usize,

    /// Shape of a single raw observation.
    pub obs_shape: Vec<usize>,
}

impl Default for RollingWindowConfig {
    fn default() -> Self {
        Self {
            n_stack: 4,
            obs_shape: vec![84, 84],
        }
    }
}

impl RollingWindowConfig {
    /// Sets the number of stacked observations.
    pub fn n_stack(mut self, n_stack: usize) -> Self {
        self.n_stack = n_stack;
        self
    }

    /// Sets the shape of a raw observation.
    pub fn obs_shape(mut self, obs_shape: Vec<usize>) -> Self {
        self.obs_shape = obs_shape;
        self
    }
}

/// Fixed-length sequence of the last `n_stack` observations.
///
/// The frames are ordered from the oldest to the newest along the first axis.
/// Slots not yet filled since construction or [`RollingWindow::reset`] are zero.
///
/// ```rust
/// use border_frame_replay::{RollingWindow, RollingWindowConfig};
/// use ndarray::arr1;
///
/// let config = RollingWindowConfig::default().n_stack(2).obs_shape(vec![1]);
/// let mut window = RollingWindow::<f32>::build(&config)?;
/// window.push(&arr1(&[1.0]).into_dyn())?;
/// window.push(&arr1(&[2.0]).into_dyn())?;
/// window.push(&arr1(&[3.0]).into_dyn())?;
/// assert_eq!(window.state().as_slice().unwrap(), &[2.0, 3.0]);
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct RollingWindow<T> {
    n_stack: usize,
    obs_shape: Vec<usize>,

    /// Shape `[n_stack, obs_shape..]`.
    frames: ArrayD<T>,
}

impl<T> RollingWindow<T>
where
    T: Clone + Zero,
{
    /// Builds a zero-filled window.
    pub fn build(config: &RollingWindowConfig) -> Result<Self> {
        if config.n_stack == 0 {
            return Err(
                FrameReplayError::InvalidConfig("n_stack must be positive".to_string()).into(),
            );
        }
        if config.obs_shape.iter().any(|&d| d == 0) {
            return Err(FrameReplayError::InvalidConfig(format!(
                "obs_shape {:?} has an empty axis",
                config.obs_shape
            ))
            .into());
        }
        debug!(
            "Build RollingWindow: n_stack = {}, obs_shape = {:?}",
            config.n_stack, config.obs_shape
        );

        let mut shape = config.obs_shape.clone();
        shape.insert(0, config.n_stack);

        Ok(Self {
            n_stack: config.n_stack,
            obs_shape: config.obs_shape.clone(),
            frames: ArrayD::zeros(IxDyn(&shape)),
        })
    }

    /// Slice of frame `j`: equivalent to `arr[j, ...]` in numpy.
    fn s(&self, j: usize) -> Vec<SliceInfoElem> {
        let mut slicer = vec![SliceInfoElem::Index(j as isize)];
        let (start, end, step) = (0, None, 1);
        slicer.extend(vec![
            SliceInfoElem::Slice { start, end, step };
            self.obs_shape.len()
        ]);
        slicer
    }

    fn check_shape(&self, obs: &ArrayD<T>) -> Result<()> {
        if obs.shape() != self.obs_shape.as_slice() {
            return Err(FrameReplayError::ShapeMismatch {
                expected: self.obs_shape.clone(),
                actual: obs.shape().to_vec(),
            }
            .into());
        }
        Ok(())
    }

    /// Drops the oldest frame and appends `obs` as the newest one.
    pub fn push(&mut self, obs: &ArrayD<T>) -> Result<()> {
        self.check_shape(obs)?;

        // frame(j) <- frame(j + 1) for j = 0, .., n_stack - 2
        for j in 0..self.n_stack - 1 {
            let dst_slice = self.s(j);
            let src_slice = self.s(j + 1);
            let (mut dst, src) = self
                .frames
                .multi_slice_mut((dst_slice.as_slice(), src_slice.as_slice()));
            dst.assign(&src);
        }
        let last = self.s(self.n_stack - 1);
        self.frames.slice_mut(last.as_slice()).assign(obs);

        Ok(())
    }

    /// Sets every frame to `obs`, typically with the first observation of an episode.
    pub fn fill(&mut self, obs: &ArrayD<T>) -> Result<()> {
        self.check_shape(obs)?;
        for mut frame in self.frames.axis_iter_mut(Axis(0)) {
            frame.assign(obs);
        }
        Ok(())
    }

    /// Sets every frame to zero.
    pub fn reset(&mut self) {
        self.frames.fill(T::zero());
    }

    /// Stacked frames with a leading batch axis, shape `[1, n_stack, obs_shape..]`.
    pub fn batched_state(&self) -> ArrayD<T> {
        self.frames.clone().insert_axis(Axis(0))
    }
}

impl<T> RollingWindow<T> {
    /// Stacked frames, shape `[n_stack, obs_shape..]`, oldest first.
    pub fn state(&self) -> ArrayViewD<'_, T> {
        self.frames.view()
    }

    /// Number of stacked frames.
    pub fn n_stack(&self) -> usize {
        self.n_stack
    }

    /// Shape of a single frame.
    pub fn obs_shape(&self) -> &[usize] {
        &self.obs_shape
    }
}

#[cfg(test)]
mod tests {
    use super::{RollingWindow, RollingWindowConfig};
    use crate::FrameReplayError;
    use anyhow::Result;
    use ndarray::{arr2, ArrayD, Axis, IxDyn};

    fn frame(v: u8) -> ArrayD<u8> {
        ArrayD::from_elem(IxDyn(&[2, 3]), v)
    }

    fn build_window(n_stack: usize) -> Result<RollingWindow<u8>> {
        let config = RollingWindowConfig::default()
            .n_stack(n_stack)
            .obs_shape(vec![2, 3]);
        RollingWindow::build(&config)
    }

    fn frame_values(window: &RollingWindow<u8>) -> Vec<u8> {
        window
            .state()
            .axis_iter(Axis(0))
            .map(|f| {
                assert!(f.iter().all(|&e| e == f[[0, 0]]));
                f[[0, 0]]
            })
            .collect()
    }

    #[test]
    fn test_initially_zero() -> Result<()> {
        let window = build_window(3)?;
        assert_eq!(window.state().shape(), &[3, 2, 3]);
        assert_eq!(frame_values(&window), vec![0, 0, 0]);
        Ok(())
    }

    #[test]
    fn test_push_shifts_oldest_out() -> Result<()> {
        let mut window = build_window(3)?;
        window.push(&frame(1))?;
        assert_eq!(frame_values(&window), vec![0, 0, 1]);

        window.push(&frame(2))?;
        window.push(&frame(3))?;
        assert_eq!(frame_values(&window), vec![1, 2, 3]);

        window.push(&frame(4))?;
        assert_eq!(frame_values(&window), vec![2, 3, 4]);
        Ok(())
    }

    #[test]
    fn test_single_frame() -> Result<()> {
        let mut window = build_window(1)?;
        window.push(&frame(5))?;
        window.push(&frame(6))?;
        assert_eq!(frame_values(&window), vec![6]);
        Ok(())
    }

    #[test]
    fn test_frame_contents_are_kept() -> Result<()> {
        let config = RollingWindowConfig::default().n_stack(2).obs_shape(vec![2, 2]);
        let mut window = RollingWindow::<f32>::build(&config)?;
        let o1 = arr2(&[[1., 2.], [3., 4.]]).into_dyn();
        let o2 = arr2(&[[5., 6.], [7., 8.]]).into_dyn();
        window.push(&o1)?;
        window.push(&o2)?;

        assert_eq!(window.state().index_axis(Axis(0), 0), o1.view());
        assert_eq!(window.state().index_axis(Axis(0), 1), o2.view());
        Ok(())
    }

    #[test]
    fn test_fill_and_reset() -> Result<()> {
        let mut window = build_window(4)?;
        window.fill(&frame(7))?;
        assert_eq!(frame_values(&window), vec![7, 7, 7, 7]);

        window.push(&frame(8))?;
        assert_eq!(frame_values(&window), vec![7, 7, 7, 8]);

        window.reset();
        assert_eq!(frame_values(&window), vec![0, 0, 0, 0]);
        assert_eq!(window.n_stack(), 4);
        Ok(())
    }

    #[test]
    fn test_batched_state() -> Result<()> {
        let mut window = build_window(2)?;
        window.push(&frame(9))?;
        let state = window.batched_state();
        assert_eq!(state.shape(), &[1, 2, 2, 3]);
        assert_eq!(state[[0, 1, 1, 2]], 9);
        assert_eq!(state[[0, 0, 1, 2]], 0);
        Ok(())
    }

    #[test]
    fn test_errors() -> Result<()> {
        assert!(build_window(0).is_err());

        let mut window = build_window(2)?;
        let err = window.push(&ArrayD::zeros(IxDyn(&[3, 2]))).unwrap_err();
        assert_eq!(
            err.downcast_ref::<FrameReplayError>(),
            Some(&FrameReplayError::ShapeMismatch {
                expected: vec![2, 3],
                actual: vec![3, 2]
            })
        );
        assert_eq!(frame_values(&window), vec![0, 0]);
        Ok(())
    }
}
