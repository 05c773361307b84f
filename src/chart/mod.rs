//! Chart geometry and the four data-to-visual mappings.
//!
//! The plot maps GDP per capita to x on a log scale, life expectancy to y
//! (inverted, so longer lives draw higher), population to circle *area*, and
//! continent to a categorical fill.

mod join;
mod transition;

pub use join::{ChartRenderer, Reconciliation, RenderedEntity};
pub use transition::{ease_cubic_in_out, Transition};

use std::f64::consts::PI;

use crate::color::{Rgba, PASTEL1};
use crate::data::CountryRecord;
use crate::error::{Error, Result};
use crate::scale::{LinearScale, LogScale, OrdinalScale, Scale};

/// GDP per capita domain of the x axis.
pub const INCOME_DOMAIN: (f64, f64) = (142.0, 150_000.0);
/// Life expectancy domain of the y axis, in years.
pub const LIFE_EXP_DOMAIN: (f64, f64) = (0.0, 90.0);
/// Population domain of the area scale.
pub const POPULATION_DOMAIN: (f64, f64) = (2000.0, 1_400_000_000.0);
/// Circle area range, in square pixels.
pub const AREA_RANGE: (f64, f64) = (25.0 * PI, 1500.0 * PI);

/// Space reserved around the plot area for axes and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margin {
    /// Left margin in pixels.
    pub left: u32,
    /// Right margin in pixels.
    pub right: u32,
    /// Top margin in pixels.
    pub top: u32,
    /// Bottom margin in pixels.
    pub bottom: u32,
}

impl Default for Margin {
    fn default() -> Self {
        Self { left: 100, right: 10, top: 10, bottom: 100 }
    }
}

/// Outer size of the chart and its margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLayout {
    width: u32,
    height: u32,
    margin: Margin,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self { width: 800, height: 500, margin: Margin::default() }
    }
}

impl ChartLayout {
    /// Create a layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the margins leave no plot area.
    pub fn new(width: u32, height: u32, margin: Margin) -> Result<Self> {
        let horizontal = margin.left.saturating_add(margin.right);
        let vertical = margin.top.saturating_add(margin.bottom);
        if width <= horizontal || height <= vertical {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self { width, height, margin })
    }

    /// Outer width.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Outer height.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Margins.
    #[must_use]
    pub fn margin(&self) -> Margin {
        self.margin
    }

    /// Width of the plot area.
    #[must_use]
    pub fn plot_width(&self) -> f64 {
        f64::from(self.width - self.margin.left - self.margin.right)
    }

    /// Height of the plot area.
    #[must_use]
    pub fn plot_height(&self) -> f64 {
        f64::from(self.height - self.margin.top - self.margin.bottom)
    }
}

/// Position and radius of a circle, in plot-area pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CircleAttrs {
    /// Center x.
    pub cx: f64,
    /// Center y.
    pub cy: f64,
    /// Radius.
    pub r: f64,
}

impl CircleAttrs {
    /// Linear interpolation towards `other`; `t` is clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            cx: self.cx + (other.cx - self.cx) * t,
            cy: self.cy + (other.cy - self.cy) * t,
            r: self.r + (other.r - self.r) * t,
        }
    }
}

/// The chart's scales, built for one layout.
#[derive(Debug, Clone)]
pub struct ChartScales {
    x: LogScale,
    y: LinearScale,
    area: LinearScale,
    color: OrdinalScale<Rgba>,
}

impl ChartScales {
    /// Build the scales for `layout`.
    ///
    /// # Errors
    ///
    /// Returns a scale error if a domain is invalid.
    pub fn new(layout: &ChartLayout) -> Result<Self> {
        Ok(Self {
            x: LogScale::new(INCOME_DOMAIN, (0.0, layout.plot_width()))?,
            y: LinearScale::new(LIFE_EXP_DOMAIN, (layout.plot_height(), 0.0))?,
            area: LinearScale::new(POPULATION_DOMAIN, AREA_RANGE)?,
            color: OrdinalScale::new(PASTEL1.to_vec())?,
        })
    }

    /// The x (income) scale.
    #[must_use]
    pub fn x_scale(&self) -> &LogScale {
        &self.x
    }

    /// The y (life expectancy) scale.
    #[must_use]
    pub fn y_scale(&self) -> &LinearScale {
        &self.y
    }

    /// Horizontal position for an income.
    #[must_use]
    pub fn x(&self, income: f64) -> f64 {
        self.x.scale(income)
    }

    /// Vertical position for a life expectancy.
    #[must_use]
    pub fn y(&self, life_exp: f64) -> f64 {
        self.y.scale(life_exp)
    }

    /// Circle area for a population.
    #[must_use]
    pub fn area(&self, population: u64) -> f64 {
        self.area.scale(population as f64)
    }

    /// Circle radius for a population, so that area (not radius) grows
    /// linearly with population.
    #[must_use]
    pub fn radius(&self, population: u64) -> f64 {
        (self.area(population).max(0.0) / PI).sqrt()
    }

    /// Fill color for a continent. Stable for the lifetime of these scales.
    pub fn color(&mut self, continent: &str) -> Rgba {
        self.color.scale(continent)
    }

    /// Target circle attributes for a record.
    #[must_use]
    pub fn attrs(&self, record: &CountryRecord) -> CircleAttrs {
        CircleAttrs {
            cx: self.x(record.income),
            cy: self.y(record.life_exp),
            r: self.radius(record.population),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scales() -> ChartScales {
        ChartScales::new(&ChartLayout::default()).unwrap()
    }

    #[test]
    fn test_default_layout_plot_area() {
        let layout = ChartLayout::default();
        assert_relative_eq!(layout.plot_width(), 690.0);
        assert_relative_eq!(layout.plot_height(), 390.0);
    }

    #[test]
    fn test_layout_rejects_oversized_margins() {
        let margin = Margin { left: 400, right: 400, top: 0, bottom: 0 };
        assert!(matches!(
            ChartLayout::new(800, 500, margin),
            Err(Error::InvalidDimensions { width: 800, height: 500 })
        ));
    }

    #[test]
    fn test_radius_at_domain_ends() {
        let s = scales();
        assert_relative_eq!(s.area(2000), 25.0 * PI, max_relative = 1e-12);
        assert_relative_eq!(s.radius(2000), 5.0, max_relative = 1e-12);
        assert_relative_eq!(s.area(1_400_000_000), 1500.0 * PI, max_relative = 1e-12);
        assert_relative_eq!(s.radius(1_400_000_000), 1500f64.sqrt(), max_relative = 1e-12);
        assert!((s.radius(1_400_000_000) - 38.73).abs() < 0.01);
    }

    #[test]
    fn test_radius_below_domain_stays_finite() {
        let s = scales();
        let r = s.radius(0);
        assert!(r.is_finite());
        assert!(r > 0.0 && r < 5.0);
    }

    #[test]
    fn test_position_mapping() {
        let s = scales();
        assert_relative_eq!(s.x(142.0), 0.0, epsilon = 1e-9);
        assert_relative_eq!(s.x(150_000.0), 690.0, epsilon = 1e-9);
        assert_relative_eq!(s.y(0.0), 390.0);
        assert_relative_eq!(s.y(90.0), 0.0);
    }

    #[test]
    fn test_color_is_stable_per_continent() {
        let mut s = scales();
        let asia = s.color("asia");
        let europe = s.color("europe");
        assert_ne!(asia, europe);
        assert_eq!(s.color("asia"), asia);
        assert_eq!(asia, PASTEL1[0]);
    }

    #[test]
    fn test_attrs_for_record() {
        let s = scales();
        let record = CountryRecord {
            country: "X".to_string(),
            continent: "asia".to_string(),
            income: 142.0,
            life_exp: 90.0,
            population: 2000,
        };
        let a = s.attrs(&record);
        assert_relative_eq!(a.cx, 0.0, epsilon = 1e-9);
        assert_relative_eq!(a.cy, 0.0);
        assert_relative_eq!(a.r, 5.0, max_relative = 1e-12);
    }

    #[test]
    fn test_circle_attrs_lerp() {
        let a = CircleAttrs { cx: 0.0, cy: 10.0, r: 1.0 };
        let b = CircleAttrs { cx: 10.0, cy: 0.0, r: 3.0 };
        let mid = a.lerp(b, 0.5);
        assert_relative_eq!(mid.cx, 5.0);
        assert_relative_eq!(mid.cy, 5.0);
        assert_relative_eq!(mid.r, 2.0);
        assert_eq!(a.lerp(b, 2.0), b);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        /// Larger populations never get smaller circles.
        #[test]
        fn prop_area_monotonic(a in 0u64..3_000_000_000, b in 0u64..3_000_000_000) {
            let s = ChartScales::new(&ChartLayout::default()).unwrap();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(s.area(lo) <= s.area(hi));
            prop_assert!(s.radius(lo) <= s.radius(hi));
        }

        /// radius == sqrt(area / PI) whenever the area is non-negative.
        #[test]
        fn prop_radius_from_area(p in 0u64..3_000_000_000) {
            let s = ChartScales::new(&ChartLayout::default()).unwrap();
            let area = s.area(p);
            prop_assume!(area >= 0.0);
            let expected = (area / PI).sqrt();
            prop_assert!((s.radius(p) - expected).abs() <= 1e-9 * expected.max(1.0));
        }
    }
}
