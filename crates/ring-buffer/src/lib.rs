//! Fixed-Capacity Sample Windows
//!
//! Provides a ring buffer that evicts its oldest entry once full, and a
//! moving average built on top of it for damping per-frame jitter.

mod average;
mod buffer;

pub use average::{MovingAverage, DEFAULT_WINDOW};
pub use buffer::RingBuffer;
