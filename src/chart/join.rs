//! Keyed data join: reconcile rendered circles against a year's records.
//!
//! # Algorithm
//!
//! Given the keys currently rendered (`old`) and the keys of the new slice
//! (`new`), three disjoint partitions are computed:
//!
//! 1. **exit** = `old - new`: destroyed immediately, no transition
//! 2. **enter** = `new - old`: created at their target with the continent fill
//!    and no transition-in, appended after existing circles
//! 3. **update** = `old ∩ new`: moved to their new target over the transition
//!    duration, fill unchanged
//!
//! The time label is replaced afterwards. Rendering the same slice twice is a
//! no-op: every key lands in update and every target is unchanged.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use super::{ChartScales, CircleAttrs, Transition};
use crate::color::Rgba;
use crate::data::YearDataset;
use crate::output::{CircleFrame, Frame};

/// A circle currently on screen, keyed by country.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEntity {
    key: String,
    continent: String,
    fill: Rgba,
    attrs: CircleAttrs,
    transition: Option<Transition>,
}

impl RenderedEntity {
    /// Country identifier.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Continent the fill was assigned from.
    #[must_use]
    pub fn continent(&self) -> &str {
        &self.continent
    }

    /// Fill color.
    #[must_use]
    pub fn fill(&self) -> Rgba {
        self.fill
    }

    /// Target attributes (the state once any transition completes).
    #[must_use]
    pub fn attrs(&self) -> CircleAttrs {
        self.attrs
    }

    /// Transition in flight from the last update, if the target moved.
    #[must_use]
    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    fn retarget(&mut self, target: CircleAttrs, duration: Duration) {
        // Each transition is declared to finish within one tick, so the
        // previous target is where the circle is drawn now.
        self.transition = if target == self.attrs {
            None
        } else {
            Some(Transition::new(self.attrs, target, duration))
        };
        self.attrs = target;
    }
}

/// Keys in each partition of one reconciliation, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Keys created.
    pub entered: Vec<String>,
    /// Keys retained and re-targeted.
    pub updated: Vec<String>,
    /// Keys destroyed.
    pub exited: Vec<String>,
}

impl Reconciliation {
    /// Whether the set of rendered keys changed.
    #[must_use]
    pub fn membership_changed(&self) -> bool {
        !self.entered.is_empty() || !self.exited.is_empty()
    }
}

/// Owns the rendered circles and reconciles them against each new slice.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    scales: ChartScales,
    transition_duration: Duration,
    entities: HashMap<String, RenderedEntity>,
    /// Draw order; every key here is in `entities` and vice versa.
    order: Vec<String>,
    time_label: String,
}

impl ChartRenderer {
    /// Create an empty renderer.
    #[must_use]
    pub fn new(scales: ChartScales, transition_duration: Duration) -> Self {
        Self {
            scales,
            transition_duration,
            entities: HashMap::new(),
            order: Vec::new(),
            time_label: String::new(),
        }
    }

    /// Reconcile against `dataset` and set the time label.
    pub fn render(&mut self, dataset: &YearDataset, time_label: impl Into<String>) -> Reconciliation {
        let incoming: HashSet<&str> = dataset.records.iter().map(|r| r.country.as_str()).collect();

        let mut exited: Vec<String> =
            self.order.iter().filter(|k| !incoming.contains(k.as_str())).cloned().collect();
        for key in &exited {
            self.entities.remove(key);
        }
        self.order.retain(|k| self.entities.contains_key(k));

        let mut entered = Vec::new();
        let mut updated = Vec::new();
        for record in &dataset.records {
            let target = self.scales.attrs(record);
            if let Some(entity) = self.entities.get_mut(&record.country) {
                entity.retarget(target, self.transition_duration);
                updated.push(record.country.clone());
            } else {
                let fill = self.scales.color(&record.continent);
                self.entities.insert(
                    record.country.clone(),
                    RenderedEntity {
                        key: record.country.clone(),
                        continent: record.continent.clone(),
                        fill,
                        attrs: target,
                        transition: None,
                    },
                );
                self.order.push(record.country.clone());
                entered.push(record.country.clone());
            }
        }

        self.time_label = time_label.into();

        entered.sort_unstable();
        updated.sort_unstable();
        exited.sort_unstable();
        Reconciliation { entered, updated, exited }
    }

    /// Number of rendered circles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether `key` is rendered.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entities.contains_key(key)
    }

    /// Rendered circle for `key`.
    #[must_use]
    pub fn entity(&self, key: &str) -> Option<&RenderedEntity> {
        self.entities.get(key)
    }

    /// Rendered keys in draw order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Current time label.
    #[must_use]
    pub fn time_label(&self) -> &str {
        &self.time_label
    }

    /// Duration given to update transitions.
    #[must_use]
    pub fn transition_duration(&self) -> Duration {
        self.transition_duration
    }

    /// Change the duration given to subsequent update transitions.
    pub fn set_transition_duration(&mut self, duration: Duration) {
        self.transition_duration = duration;
    }

    /// Scales used for positioning.
    #[must_use]
    pub fn scales(&self) -> &ChartScales {
        &self.scales
    }

    /// Snapshot of everything on screen, in draw order.
    #[must_use]
    pub fn frame(&self) -> Frame {
        let circles = self
            .order
            .iter()
            .filter_map(|key| self.entities.get(key))
            .map(|e| CircleFrame {
                key: e.key.clone(),
                cx: e.attrs.cx,
                cy: e.attrs.cy,
                r: e.attrs.r,
                fill: e.fill,
                from: e.transition.map(|t| t.from),
            })
            .collect();

        Frame {
            time_label: self.time_label.clone(),
            transition_duration: self.transition_duration,
            circles,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::chart::ChartLayout;
    use crate::data::CountryRecord;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn arb_year() -> impl Strategy<Value = YearDataset> {
        prop::collection::btree_map("[A-Z]", (142.0f64..150_000.0, 0.0f64..90.0, 0u64..2_000_000_000), 0..8)
            .prop_map(|rows| YearDataset {
                year: 1800,
                records: rows
                    .into_iter()
                    .map(|(country, (income, life_exp, population))| CountryRecord {
                        continent: (if country.as_str() < "M" { "asia" } else { "europe" }).to_string(),
                        country,
                        income,
                        life_exp,
                        population,
                    })
                    .collect(),
            })
    }

    fn renderer() -> ChartRenderer {
        ChartRenderer::new(ChartScales::new(&ChartLayout::default()).unwrap(), Duration::from_millis(100))
    }

    /// End state of every circle, ignoring where transitions started.
    fn settled(frame: &Frame) -> Vec<(String, f64, f64, f64, Rgba)> {
        frame.circles.iter().map(|c| (c.key.clone(), c.cx, c.cy, c.r, c.fill)).collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// Rendering the same slice twice leaves the same circles and no motion.
        #[test]
        fn prop_reconcile_idempotent(prev in arb_year(), next in arb_year()) {
            let mut r = renderer();
            r.render(&prev, "a");
            r.render(&next, "b");
            let once = r.frame();
            let rec = r.render(&next, "b");
            let twice = r.frame();
            prop_assert!(rec.entered.is_empty() && rec.exited.is_empty());
            prop_assert_eq!(settled(&twice), settled(&once));
            prop_assert!(twice.circles.iter().all(|c| c.from.is_none()));
            prop_assert_eq!(twice.time_label, once.time_label);
        }

        /// After rendering, the rendered keys are exactly the slice's keys.
        #[test]
        fn prop_rendered_keys_match_slice(prev in arb_year(), next in arb_year()) {
            let mut r = renderer();
            r.render(&prev, "a");
            let rec = r.render(&next, "b");

            let rendered: BTreeSet<&str> = r.keys().collect();
            let expected: BTreeSet<&str> = next.records.iter().map(|c| c.country.as_str()).collect();
            prop_assert_eq!(&rendered, &expected);
            prop_assert_eq!(r.len(), expected.len());

            for key in &rec.exited {
                prop_assert!(!r.contains(key));
                prop_assert!(next.get(key).is_none());
            }
        }
    }
}
