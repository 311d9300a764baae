//! Moving Average Filter

use crate::RingBuffer;

/// Default window size in processed frames
pub const DEFAULT_WINDOW: usize = 10;

/// Sliding window mean for noise reduction.
///
/// Averages whatever has been pushed so far until the window fills, then
/// evicts the oldest sample on every push.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: RingBuffer<f64>,
    sum: f64,
}

impl MovingAverage {
    /// Create a new moving average with given window size
    pub fn new(size: usize) -> Self {
        Self {
            window: RingBuffer::new(size),
            sum: 0.0,
        }
    }

    /// Add a sample and get the smoothed output
    pub fn push(&mut self, value: f64) -> f64 {
        if let Some(evicted) = self.window.push(value) {
            self.sum -= evicted;
        }
        self.sum += value;
        self.sum / self.window.len() as f64
    }

    /// Current mean, `None` before the first sample
    pub fn mean(&self) -> Option<f64> {
        if self.window.is_empty() {
            None
        } else {
            Some(self.sum / self.window.len() as f64)
        }
    }

    /// Reset the filter
    pub fn reset(&mut self) {
        self.window.clear();
        self.sum = 0.0;
    }
}

impl Default for MovingAverage {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}
