//! Sensor sampler
//!
//! Accumulates raw analog samples and produces one integer average per
//! full window. The accumulator is cleared every time a reading is
//! produced, so consecutive readings never share samples.

/// Windowed averaging sampler
#[derive(Debug, Clone)]
pub struct SensorSampler {
    /// Sum of the samples in the current window
    sum: u32,
    /// Samples accumulated so far, always in `0..window`
    count: u16,
    /// Samples per smoothed reading
    window: u16,
}

impl SensorSampler {
    /// Create a sampler producing one reading per `window` samples
    ///
    /// A zero window is treated as one.
    pub fn new(window: u16) -> Self {
        Self {
            sum: 0,
            count: 0,
            window: window.max(1),
        }
    }

    /// Accumulate one raw sample
    ///
    /// Returns the smoothed reading when this sample completes a window.
    pub fn push(&mut self, raw: u16) -> Option<u16> {
        self.sum = self.sum.saturating_add(raw as u32);
        self.count += 1;

        if self.count < self.window {
            return None;
        }

        let average = self.sum / self.count as u32;
        self.sum = 0;
        self.count = 0;
        Some(average as u16)
    }

    /// Samples accumulated toward the next reading
    pub fn pending(&self) -> u16 {
        self.count
    }

    /// Samples per reading
    pub fn window(&self) -> u16 {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_every_window() {
        let mut sampler = SensorSampler::new(20);

        for _ in 0..19 {
            assert_eq!(sampler.push(300), None);
        }
        assert_eq!(sampler.push(300), Some(300));
        assert_eq!(sampler.pending(), 0);

        for _ in 0..19 {
            assert_eq!(sampler.push(100), None);
        }
        assert_eq!(sampler.push(100), Some(100));
    }

    #[test]
    fn test_integer_average_truncates() {
        let mut sampler = SensorSampler::new(3);
        assert_eq!(sampler.push(1), None);
        assert_eq!(sampler.push(2), None);
        assert_eq!(sampler.push(2), Some(1));
    }

    #[test]
    fn test_count_stays_below_window() {
        let mut sampler = SensorSampler::new(4);
        for i in 0..50u16 {
            sampler.push(i);
            assert!(sampler.pending() < sampler.window());
        }
    }

    #[test]
    fn test_zero_window_yields_every_sample() {
        let mut sampler = SensorSampler::new(0);
        assert_eq!(sampler.push(512), Some(512));
        assert_eq!(sampler.push(7), Some(7));
    }
}
