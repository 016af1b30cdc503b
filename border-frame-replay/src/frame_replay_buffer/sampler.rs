//! Sampling of indices whose history does not cross an episode boundary.
use crate::FrameReplayError;
use anyhow::Result;
use log::{trace, warn};
use rand::Rng;

/// Draws indices uniformly with rejection of episode boundaries.
///
/// An index `i` is valid if `history_window <= i < size - history_window` and none
/// of the experiences in `[i - history_window, i)` terminated an episode. Otherwise
/// the stacked observations would mix frames of two different episodes.
///
/// The valid range depends only on the number of stored experiences, not on the
/// capacity of the buffer.
#[derive(Clone, Debug)]
pub struct BoundaryAwareSampler {
    max_attempts: usize,
}

impl BoundaryAwareSampler {
    /// Creates a sampler giving up after `max_attempts` rejected draws.
    pub fn new(max_attempts: usize) -> Self {
        Self { max_attempts }
    }

    /// Maximum number of draws for a single index.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Returns `true` if no flag in `[ix - history_window, ix)` is set.
    ///
    /// The range bounds are not checked against the number of stored experiences.
    pub fn is_valid_ix(is_terminated: &[i8], ix: usize, history_window: usize) -> bool {
        ix >= history_window
            && ix <= is_terminated.len()
            && is_terminated[ix - history_window..ix]
                .iter()
                .all(|&d| d == 0)
    }

    /// Checks that `size` experiences are enough to sample with `history_window`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameReplayError::NotEnoughData`] if `size <= 2 * history_window`.
    pub fn check_size(size: usize, history_window: usize) -> Result<()> {
        let enough = history_window
            .checked_mul(2)
            .map_or(false, |m| size > m);
        if !enough {
            let required = history_window.saturating_mul(2).saturating_add(1);
            return Err(FrameReplayError::NotEnoughData { size, required }.into());
        }
        Ok(())
    }

    /// Draws an index from the first `size` entries of `is_terminated`.
    ///
    /// # Errors
    ///
    /// * [`FrameReplayError::NotEnoughData`] if `size <= 2 * history_window`.
    /// * [`FrameReplayError::NoValidIndex`] if `max_attempts` draws were rejected.
    pub fn sample_ix<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        is_terminated: &[i8],
        size: usize,
        history_window: usize,
    ) -> Result<usize> {
        Self::check_size(size, history_window)?;

        for _ in 0..self.max_attempts {
            let ix = rng.gen_range(history_window..size - history_window);
            if Self::is_valid_ix(is_terminated, ix, history_window) {
                return Ok(ix);
            }
            trace!("Rejected index {}: episode boundary in history", ix);
        }

        warn!(
            "No valid index in {} draws (size = {}, history_window = {})",
            self.max_attempts, size, history_window
        );
        Err(FrameReplayError::NoValidIndex {
            attempts: self.max_attempts,
        }
        .into())
    }
}
