//! Sustained (thermal/breaker style) current limiting over a rolling window.

use std::collections::VecDeque;

use simcore::Model;

pub const DEFAULT_WINDOW: usize = 20;

/// Rolling window of per-motor current samples with a sticky limit latch.
///
/// Once the window average has exceeded the sustained limit, the latch stays
/// set until [`CurrentLimiter::clear_latch`] or a reset, even if the average
/// later falls back under the limit.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentLimiter {
    window_size: usize,
    history: VecDeque<f64>,
    latched: bool,
}

impl CurrentLimiter {
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        CurrentLimiter {
            window_size,
            history: std::iter::repeat(0.0).take(window_size).collect(),
            latched: false,
        }
    }

    /// Append a sample, discarding the oldest once the window is full.
    pub fn record(&mut self, current: f64) {
        self.history.push_back(current);
        while self.history.len() > self.window_size {
            self.history.pop_front();
        }
    }

    pub fn average(&self) -> f64 {
        self.history.iter().sum::<f64>() / self.history.len() as f64
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }

    pub fn clear_latch(&mut self) {
        self.latched = false;
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Apply the sustained limit to a raw per-motor current.
    ///
    /// Only forward motion is limited. With no limit configured the current
    /// passes through untouched.
    pub fn limit(&mut self, current: f64, velocity: f64, sustained_limit: Option<f64>) -> f64 {
        let Some(limit) = sustained_limit else {
            return current;
        };
        if velocity <= 0.0 {
            return current;
        }
        if self.latched || self.average() > limit {
            if !self.latched {
                log::debug!("sustained current limit latched at {limit} A (window average {:.2} A)", self.average());
            }
            self.latched = true;
            return current.min(limit);
        }
        current
    }
}

impl Default for CurrentLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl Model for CurrentLimiter {
    fn reset(&mut self) {
        self.history.clear();
        self.history.extend(std::iter::repeat(0.0).take(self.window_size));
        self.latched = false;
    }
}

/// Instantaneous peak limit, applied regardless of the sustained latch.
pub fn limit_peak(current: f64, peak_limit: Option<f64>) -> f64 {
    match peak_limit {
        Some(peak) => current.min(peak),
        None => current,
    }
}
