use serde::Serialize;
use std::sync::Mutex;

/// Running tallies of converted pixels.
pub struct ConversionMetrics {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub pixels: usize,
    pub out_of_range: usize,
    pub failures: usize,
}

impl ConversionMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_pixels(&self, pixels: usize, out_of_range: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.pixels += pixels;
            metrics.out_of_range += out_of_range;
        }
    }

    pub fn record_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failures += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for ConversionMetrics {
    fn default() -> Self {
        Self::new()
    }
}
