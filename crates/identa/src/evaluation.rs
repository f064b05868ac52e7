use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::input::Factors;
use crate::scoring;

/// A scored evaluation that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEvaluation {
  pub person_name: String,
  pub universality: Option<f64>,
  pub frequency: Option<f64>,
  pub duration: Option<f64>,
  pub months_ago: Option<f64>,
  /// Raw score, may be NaN or infinite
  pub score: f64,
}

/// Missing factors enter the formula as NaN
fn as_float(value: Option<f64>) -> f64 {
  value.unwrap_or(f64::NAN)
}

/// JSON has no NaN or infinity, those are stored as `null`
fn finite(value: Option<f64>) -> Option<f64> {
  value.filter(|v| v.is_finite())
}

impl ScoredEvaluation {
  pub fn from_factors(factors: Factors) -> Self {
    let score = scoring::calculate_score(
      as_float(factors.universality),
      as_float(factors.frequency),
      as_float(factors.duration),
      as_float(factors.months_ago),
    );

    Self {
      person_name: factors.person_name,
      universality: factors.universality,
      frequency: factors.frequency,
      duration: factors.duration,
      months_ago: factors.months_ago,
      score,
    }
  }

  pub fn breakdown(&self) -> scoring::ScoreBreakdown {
    scoring::score_breakdown(
      as_float(self.universality),
      as_float(self.frequency),
      as_float(self.duration),
      as_float(self.months_ago),
    )
  }

  /// Attach identity and timestamp, producing the record that gets persisted
  pub fn into_record(self, id: i64, date: DateTime<Utc>) -> Evaluation {
    Evaluation {
      id,
      person_name: self.person_name,
      universality: finite(self.universality),
      frequency: finite(self.frequency),
      duration: finite(self.duration),
      months_ago: finite(self.months_ago),
      score: finite(Some(self.score)),
      date,
    }
  }
}

/// A persisted evaluation. Never mutated once stored.
///
/// Factors and score are JavaScript numbers: any JSON number reads back, whole
/// values are written without a fraction, and NaN or infinity are `null`, the
/// same shape `JSON.stringify` produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
  pub id: i64,
  #[serde(default)]
  pub person_name: String,
  #[serde(with = "js_number")]
  pub universality: Option<f64>,
  #[serde(with = "js_number")]
  pub frequency: Option<f64>,
  #[serde(with = "js_number")]
  pub duration: Option<f64>,
  #[serde(with = "js_number")]
  pub months_ago: Option<f64>,
  #[serde(with = "js_number")]
  pub score: Option<f64>,
  #[serde(with = "iso_millis")]
  pub date: DateTime<Utc>,
}

impl Evaluation {
  /// Name to show, falling back to a placeholder
  pub fn display_name(&self) -> &str {
    display_name(&self.person_name)
  }
}

pub const UNNAMED: &str = "(unnamed)";

pub fn display_name(name: &str) -> &str {
  if name.is_empty() {
    UNNAMED
  } else {
    name
  }
}

/// Numbers written the way `JSON.stringify` writes them
mod js_number {
  use serde::{Deserialize, Deserializer, Serializer};

  /// Largest magnitude below which every whole f64 is an exact integer
  const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

  pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
      Some(v) if v.is_finite() && v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER => {
        serializer.serialize_i64(*v as i64)
      }
      Some(v) if v.is_finite() => serializer.serialize_f64(*v),
      _ => serializer.serialize_none(),
    }
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Option::<f64>::deserialize(deserializer)
  }
}

/// Dates in `toISOString` form: UTC, millisecond precision, `Z` suffix
mod iso_millis {
  use chrono::{DateTime, SecondsFormat, Utc};
  use serde::{de, Deserialize, Deserializer, Serializer};

  pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&raw).map(|date| date.with_timezone(&Utc)).map_err(de::Error::custom)
  }
}
