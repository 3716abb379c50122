/// Index/middle tip separation below which a frame counts as a pinch
pub const EXIT_DISTANCE_THRESHOLD: f32 = 20.0;

/// Streak length that must be exceeded before exiting (4 consecutive frames)
pub const PINCH_STREAK_LIMIT: u32 = 3;

/// Debounces the exit gesture across frames
///
/// Any frame without a qualifying pinch resets the streak, so a single noisy
/// frame cannot trigger an exit.
#[derive(Clone, Debug, Default)]
pub struct ExitDebouncer {
    pinch_streak: u32,
}

impl ExitDebouncer {
    pub fn pinch_streak(&self) -> u32 {
        self.pinch_streak
    }

    /// Feed one frame's exit distance (`None` when no usable hand was seen)
    ///
    /// Returns true once the pinch has been held long enough.
    pub fn observe(&mut self, exit_distance: Option<f32>) -> bool {
        match exit_distance {
            Some(distance) if distance < EXIT_DISTANCE_THRESHOLD => {
                self.pinch_streak += 1;
                tracing::debug!("Pinch count: {}", self.pinch_streak);
            }
            _ => self.pinch_streak = 0,
        }

        self.pinch_streak > PINCH_STREAK_LIMIT
    }
}
