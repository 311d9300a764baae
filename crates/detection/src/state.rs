//! Streak and latch tracking

/// Consecutive-frame streak with a rising-edge latch.
///
/// The latch is set only by `acknowledge`, never by `observe`, so an
/// unacknowledged condition keeps reporting ready on every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatchState {
    streak: u32,
    latched: bool,
}

impl LatchState {
    /// Record this frame's condition; returns true when an event is due
    pub fn observe(&mut self, condition: bool, trigger_frames: u32) -> bool {
        if !condition {
            self.reset();
            return false;
        }
        self.streak = self.streak.saturating_add(1);
        self.streak >= trigger_frames && !self.latched
    }

    /// Mark the current occurrence as shown
    pub fn acknowledge(&mut self) {
        self.latched = true;
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Clear streak and latch
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
