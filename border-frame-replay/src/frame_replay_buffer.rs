//! Replay buffer of stacked observations with episode-boundary-aware sampling.
//!
//! Observations are stored one frame per experience. A sample at index `i` stacks
//! the `history_window` frames before `i` as the state and the frames starting at
//! `i` as the next state, so frames are never duplicated in the buffer.
//!
//! - [`RingStore`]: fixed-capacity ring of experiences
//! - [`BoundaryAwareSampler`]: draws indices whose history stays in one episode
//! - [`FrameBatch`]: stacked batch buffers
//! - [`FrameReplayBuffer`]: the replay buffer combining the above
mod base;
mod batch;
mod config;
mod ring_store;
mod sampler;
pub use base::FrameReplayBuffer;
pub use batch::FrameBatch;
pub use config::FrameReplayBufferConfig;
pub use ring_store::{Experience, RingStore};
pub use sampler::BoundaryAwareSampler;
