//! Dataset loading: raw yearly JSON records into an immutable [`Timeline`].
//!
//! The source is a JSON array with one entry per calendar year:
//!
//! ```json
//! [
//!   { "year": "1800",
//!     "countries": [
//!       { "country": "Afghanistan", "continent": "asia",
//!         "income": 603, "life_exp": 28.21, "population": 3280000 }
//!     ] }
//! ]
//! ```
//!
//! A country entry survives loading only if both `income` and `life_exp` are
//! present and truthy (non-null, non-zero, non-empty). Survivors have their
//! numeric fields coerced; a value that does not coerce is a load error for
//! the whole dataset.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// One country's figures for one calendar year.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryRecord {
    /// Country identifier, unique within a year. The reconciliation key.
    pub country: String,
    /// Continent name (`asia`, `europe`, ...).
    pub continent: String,
    /// GDP per capita.
    pub income: f64,
    /// Life expectancy in years.
    pub life_exp: f64,
    /// Population count.
    pub population: u64,
}

/// All records for one calendar year, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct YearDataset {
    /// Calendar year.
    pub year: i32,
    /// Country records; at most one per country.
    pub records: Vec<CountryRecord>,
}

impl YearDataset {
    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the year has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find a record by country identifier.
    #[must_use]
    pub fn get(&self, country: &str) -> Option<&CountryRecord> {
        self.records.iter().find(|r| r.country == country)
    }
}

/// Ordered sequence of yearly datasets; index `i` is year `base_year + i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    base_year: i32,
    years: Vec<YearDataset>,
}

impl Timeline {
    /// Build a timeline from yearly datasets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::YearGap`] if the years are not consecutive,
    /// [`Error::InvalidYear`] if they run past `i32::MAX`, or
    /// [`Error::DuplicateCountry`] if a country appears twice in one year.
    pub fn new(years: Vec<YearDataset>) -> Result<Self> {
        let base_year = years.first().map_or(DEFAULT_BASE_YEAR, |y| y.year);

        for (index, dataset) in years.iter().enumerate() {
            let expected = offset_year(base_year, index).ok_or_else(|| Error::InvalidYear {
                index,
                label: dataset.year.to_string(),
            })?;
            if dataset.year != expected {
                return Err(Error::YearGap { index, expected, found: dataset.year });
            }

            let mut seen = HashSet::with_capacity(dataset.records.len());
            for record in &dataset.records {
                if !seen.insert(record.country.as_str()) {
                    return Err(Error::DuplicateCountry {
                        year: dataset.year,
                        country: record.country.clone(),
                    });
                }
            }
        }

        Ok(Self { base_year, years })
    }

    /// Parse a timeline from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns a load error if the JSON is malformed or a field is invalid.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: Vec<RawYear> = serde_json::from_str(json)?;
        Self::from_raw(raw, None)
    }

    /// Parse a timeline from a reader producing JSON.
    ///
    /// # Errors
    ///
    /// Returns a load error if reading fails, the JSON is malformed, or a
    /// field is invalid.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let raw: Vec<RawYear> = serde_json::from_reader(reader)?;
        Self::from_raw(raw, None)
    }

    /// Parse a timeline from JSON, numbering unlabelled years from `base_year`.
    ///
    /// # Errors
    ///
    /// Returns a load error if the JSON is malformed or a field is invalid.
    pub fn from_json_str_with_base(json: &str, base_year: i32) -> Result<Self> {
        let raw: Vec<RawYear> = serde_json::from_str(json)?;
        Self::from_raw(raw, Some(base_year))
    }

    fn from_raw(raw: Vec<RawYear>, fallback_base: Option<i32>) -> Result<Self> {
        let fallback_base = fallback_base.unwrap_or(DEFAULT_BASE_YEAR);
        let mut years = Vec::with_capacity(raw.len());
        let mut total = 0usize;

        for (index, raw_year) in raw.into_iter().enumerate() {
            let year = match &raw_year.year {
                Some(label) => parse_year(index, label)?,
                None => offset_year(fallback_base, index)
                    .ok_or_else(|| Error::InvalidYear { index, label: "null".to_string() })?,
            };

            let before = raw_year.countries.len();
            let complete = filter_complete(raw_year.countries);
            let dropped = before - complete.len();
            tracing::debug!(year, kept = complete.len(), dropped, "filtered year");

            let records = complete
                .into_iter()
                .map(|c| c.coerce(year))
                .collect::<Result<Vec<_>>>()?;
            total += records.len();
            years.push(YearDataset { year, records });
        }

        let timeline = Self::new(years)?;
        tracing::info!(
            years = timeline.len(),
            records = total,
            base_year = timeline.base_year,
            "loaded timeline"
        );
        Ok(timeline)
    }

    /// Calendar year of index 0.
    #[must_use]
    pub fn base_year(&self) -> i32 {
        self.base_year
    }

    /// Number of years.
    #[must_use]
    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// Whether the timeline has no years.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Dataset at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&YearDataset> {
        self.years.get(index)
    }

    /// Calendar year for `index`. Exact for every index in the timeline;
    /// saturates at `i32::MAX` beyond it.
    #[must_use]
    pub fn year_at(&self, index: usize) -> i32 {
        offset_year(self.base_year, index).unwrap_or(i32::MAX)
    }

    /// Iterate over the yearly datasets in order.
    pub fn iter(&self) -> std::slice::Iter<'_, YearDataset> {
        self.years.iter()
    }
}

/// Year assumed for index 0 when the source carries no year labels.
pub const DEFAULT_BASE_YEAR: i32 = 1800;

/// Read and parse a timeline from a JSON file.
///
/// # Errors
///
/// Returns a load error if the file cannot be read or parsed.
pub fn load(path: impl AsRef<Path>) -> Result<Timeline> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), "loading dataset");
    let content = std::fs::read_to_string(path)?;
    Timeline::from_json_str(&content)
}

/// Read and parse a timeline. Years without a label are numbered from
/// `base_year`.
///
/// Only reading the file is bounded by `timeout`; parsing and validation run
/// afterwards without a time limit.
///
/// # Errors
///
/// Returns [`Error::LoadTimeout`] if the file is not fully read within
/// `timeout`, otherwise the same errors as [`load`].
pub async fn load_with_timeout(
    path: impl AsRef<Path>,
    timeout: Duration,
    base_year: i32,
) -> Result<Timeline> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), ?timeout, "loading dataset");

    let content = tokio::time::timeout(timeout, tokio::fs::read_to_string(path))
        .await
        .map_err(|_| Error::LoadTimeout(timeout))??;

    Timeline::from_json_str_with_base(&content, base_year)
}

/// One year as it appears in the source file.
#[derive(Debug, Clone, Deserialize)]
struct RawYear {
    #[serde(default)]
    year: Option<Value>,
    #[serde(default)]
    countries: Vec<RawCountry>,
}

/// One country entry as it appears in the source file, before coercion.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawCountry {
    /// Country identifier.
    #[serde(default)]
    pub country: String,
    /// Continent name.
    #[serde(default)]
    pub continent: String,
    /// GDP per capita, any JSON value.
    #[serde(default)]
    pub income: Value,
    /// Life expectancy, any JSON value.
    #[serde(default)]
    pub life_exp: Value,
    /// Population, any JSON value.
    #[serde(default)]
    pub population: Value,
}

impl RawCountry {
    /// Whether both `income` and `life_exp` are present and truthy.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        is_truthy(&self.income) && is_truthy(&self.life_exp)
    }

    fn coerce(self, year: i32) -> Result<CountryRecord> {
        let income = self.number(year, "income", &self.income)?;
        let life_exp = self.number(year, "life_exp", &self.life_exp)?;
        let population = match &self.population {
            Value::Null => 0,
            value => {
                let n = self.number(year, "population", value)?;
                if n < 0.0 {
                    return Err(self.non_numeric(year, "population", value));
                }
                n.round() as u64
            }
        };

        Ok(CountryRecord {
            country: self.country,
            continent: self.continent,
            income,
            life_exp,
            population,
        })
    }

    fn number(&self, year: i32, field: &'static str, value: &Value) -> Result<f64> {
        coerce_number(value).ok_or_else(|| self.non_numeric(year, field, value))
    }

    fn non_numeric(&self, year: i32, field: &'static str, value: &Value) -> Error {
        Error::NonNumericField {
            year,
            country: self.country.clone(),
            field,
            value: value.to_string(),
        }
    }
}

/// Keep only entries whose `income` and `life_exp` are both truthy.
///
/// Idempotent: filtering an already-filtered list returns it unchanged.
#[must_use]
pub fn filter_complete(countries: Vec<RawCountry>) -> Vec<RawCountry> {
    countries.into_iter().filter(RawCountry::is_complete).collect()
}

/// JavaScript truthiness of a JSON value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Numeric coercion for a JSON value; `None` when it has no finite number.
fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().ok()?
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    n.is_finite().then_some(n)
}

/// `base + index`, or `None` if it does not fit in an `i32`.
fn offset_year(base: i32, index: usize) -> Option<i32> {
    i32::try_from(index).ok().and_then(|i| base.checked_add(i))
}

fn parse_year(index: usize, label: &Value) -> Result<i32> {
    let invalid = || Error::InvalidYear { index, label: label.to_string() };
    match label {
        Value::Number(n) => n
            .as_i64()
            .and_then(|y| i32::try_from(y).ok())
            .ok_or_else(invalid),
        Value::String(s) => s.trim().parse::<i32>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}
