//! Run score

/// Accumulates points for the current run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreKeeper {
    value: u64,
}

impl ScoreKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add points; score only ever goes up within a run
    pub fn add(&mut self, points: u64) -> u64 {
        self.value = self.value.saturating_add(points);
        self.value
    }

    #[inline]
    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }
}
