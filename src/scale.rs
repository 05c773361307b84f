//! Scale functions for data-to-visual mappings.
//!
//! Scales transform data values to visual properties (position, area, color).
//! Based on the Grammar of Graphics [Wilkinson 2005].

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if domain_min equals domain_max.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        if (domain.0 - domain.1).abs() < f64::EPSILON {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self { domain_min: domain.0, domain_max: domain.1, range_min: range.0, range_max: range.1 })
    }

    /// Approximately `count` evenly spaced, human-friendly values inside the
    /// domain (steps of 1, 2 or 5 times a power of ten).
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain_min <= self.domain_max {
            (self.domain_min, self.domain_max)
        } else {
            (self.domain_max, self.domain_min)
        };

        let Some(step) = tick_step(lo, hi, count) else {
            return Vec::new();
        };

        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

fn tick_step(lo: f64, hi: f64, count: usize) -> Option<f64> {
    if count == 0 || !(hi - lo).is_finite() || hi <= lo {
        return None;
    }

    let raw = (hi - lo) / count as f64;
    let power = raw.log10().floor();
    let magnitude = 10f64.powf(power);
    let error = raw / magnitude;

    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    Some(factor * magnitude)
}

impl Scale<f64, f64> for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

/// Base-10 logarithmic scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy)]
pub struct LogScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LogScale {
    /// Create a new logarithmic scale with base 10.
    ///
    /// # Errors
    ///
    /// Returns an error if domain contains non-positive values or its ends
    /// are equal.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        if domain.0 <= 0.0 || domain.1 <= 0.0 {
            return Err(Error::ScaleDomain("Log scale domain must be positive".to_string()));
        }

        if (domain.0 - domain.1).abs() < f64::EPSILON {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self { domain_min: domain.0, domain_max: domain.1, range_min: range.0, range_max: range.1 })
    }
}

impl Scale<f64, f64> for LogScale {
    fn scale(&self, value: f64) -> f64 {
        let log_min = self.domain_min.log10();
        let log_max = self.domain_max.log10();
        let log_val = value.max(f64::MIN_POSITIVE).log10();

        let t = (log_val - log_min) / (log_max - log_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

/// Ordinal scale for categorical-to-discrete mapping.
///
/// Keys are assigned range values in the order they are first seen, cycling
/// through the range when there are more keys than values. Once a key has a
/// value it keeps it for the lifetime of the scale.
#[derive(Debug, Clone)]
pub struct OrdinalScale<R> {
    range: Vec<R>,
    assigned: HashMap<String, usize>,
}

impl<R: Clone> OrdinalScale<R> {
    /// Create a new ordinal scale over `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if `range` is empty.
    pub fn new(range: Vec<R>) -> Result<Self> {
        if range.is_empty() {
            return Err(Error::ScaleDomain("Ordinal scale requires at least one value".to_string()));
        }

        Ok(Self { range, assigned: HashMap::new() })
    }

    /// Map `key` to its range value, assigning the next one if `key` is new.
    pub fn scale(&mut self, key: &str) -> R {
        let next = self.assigned.len();
        let slot = *self.assigned.entry(key.to_string()).or_insert(next);
        self.range[slot % self.range.len()].clone()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// A linear scale with increasing domain and range is monotonic.
        #[test]
        fn prop_linear_monotonic(a in 0.0f64..1e9, b in 0.0f64..1e9) {
            let scale = LinearScale::new((2000.0, 1.4e9), (25.0, 1500.0)).unwrap();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(scale.scale(lo) <= scale.scale(hi));
        }

        /// Every tick lies inside the domain.
        #[test]
        fn prop_ticks_inside_domain(lo in -1e6f64..1e6, span in 1e-3f64..1e6, count in 1usize..20) {
            let scale = LinearScale::new((lo, lo + span), (0.0, 1.0)).unwrap();
            for t in scale.ticks(count) {
                prop_assert!(t >= lo - span * 1e-9 && t <= lo + span + span * 1e-9);
            }
        }
    }
}
