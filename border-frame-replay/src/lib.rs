#![warn(missing_docs)]
//! Experience replay with stacked observation frames for reinforcement learning.
//!
//! [`FrameReplayBuffer`] stores single observation frames in a ring and samples
//! batches of stacked frames whose history never crosses an episode boundary.
//! [`RollingWindow`] keeps the most recent frames to build the agent's current state.
pub mod error;
pub mod frame_replay_buffer;
pub mod rolling_window;

mod base;
pub use base::{ExperienceBufferBase, ReplayBufferBase};
pub use error::FrameReplayError;
pub use frame_replay_buffer::{
    BoundaryAwareSampler, Experience, FrameBatch, FrameReplayBuffer, FrameReplayBufferConfig,
    RingStore,
};
pub use rolling_window::{RollingWindow, RollingWindowConfig};
