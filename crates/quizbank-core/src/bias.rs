//! The cyclic bias schedule that picks which band to draw from next.

use crate::classify::Band;

/// Target band indices, cycled through in order.
///
/// Band 0 appears 6 times, band 1 4 times, band 2 3 times and bands 3-5
/// twice each.
pub const BIAS_SCHEDULE: [usize; 20] = [0, 0, 1, 0, 2, 0, 1, 3, 0, 1, 4, 0, 1, 2, 0, 5, 2, 3, 4, 1];

/// Walks [`BIAS_SCHEDULE`], wrapping at the end.
#[derive(Debug, Clone, Default)]
pub struct BiasWalker {
    cursor: usize,
}

impl BiasWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position in the schedule.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The band the next draw will target.
    pub fn peek(&self) -> Band {
        Band::new(BIAS_SCHEDULE[self.cursor]).unwrap_or(Band::WEAKEST)
    }

    /// Return the current target band and move to the next entry.
    pub fn advance(&mut self) -> Band {
        let band = self.peek();
        self.cursor = (self.cursor + 1) % BIAS_SCHEDULE.len();
        band
    }
}
