//! Signal conditioning filters.
//!
//! Single-pole exponentially weighted moving average:
//!
//! ```text
//! y[n] = alpha·x[n] + (1 − alpha)·y[n−1]
//! ```
//!
//! `alpha` is not validated here. Values outside `[0, 1]` blend
//! arithmetically; bounded configurations are checked when loaded.

/// Blend one sample into the previous filtered value.
#[inline]
pub fn ewma_filter(input: f64, filtered: f64, alpha: f64) -> f64 {
    alpha * input + (1.0 - alpha) * filtered
}

/// Caller-side holder for the persisted filtered value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ewma {
    alpha: f64,
    value: f64,
}

impl Ewma {
    /// Create a filter starting from `initial`.
    pub fn new(alpha: f64, initial: f64) -> Self {
        Self {
            alpha,
            value: initial,
        }
    }

    /// Apply one sample and return the new filtered value.
    #[inline]
    pub fn apply(&mut self, input: f64) -> f64 {
        self.value = ewma_filter(input, self.value, self.alpha);
        self.value
    }

    /// Last filtered value.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Restart from `value`.
    #[inline]
    pub fn reset(&mut self, value: f64) {
        self.value = value;
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
