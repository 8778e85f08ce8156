const HISTORY: usize = 120;

/// Draw timings for the frames the pipeline has produced, in milliseconds.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    recent: Vec<f64>,
    frames: u64,
    peak_ms: f64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, ms: f64) {
        self.frames += 1;
        if ms > self.peak_ms {
            self.peak_ms = ms;
        }
        if self.recent.len() == HISTORY {
            self.recent.remove(0);
        }
        self.recent.push(ms);
    }

    /// Total frames the pipeline has drawn.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_ms(&self) -> Option<f64> {
        self.recent.last().copied()
    }

    /// Mean over the retained window, `None` before the first frame.
    pub fn mean_ms(&self) -> Option<f64> {
        if self.recent.is_empty() {
            return None;
        }
        Some(self.recent.iter().sum::<f64>() / self.recent.len() as f64)
    }

    /// Slowest frame since the engine was mounted.
    pub fn peak_ms(&self) -> f64 {
        self.peak_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats_report_nothing() {
        let stats = FrameStats::new();
        assert_eq!(stats.frames(), 0);
        assert_eq!(stats.last_ms(), None);
        assert_eq!(stats.mean_ms(), None);
    }

    #[test]
    fn window_is_bounded_but_peak_and_count_are_not() {
        let mut stats = FrameStats::new();
        stats.record(50.0);
        for _ in 0..HISTORY {
            stats.record(2.0);
        }
        assert_eq!(stats.frames(), HISTORY as u64 + 1);
        assert_eq!(stats.recent.len(), HISTORY);
        assert_eq!(stats.mean_ms(), Some(2.0));
        assert_eq!(stats.peak_ms(), 50.0);
        assert_eq!(stats.last_ms(), Some(2.0));
    }
}
