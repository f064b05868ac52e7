//! Form input parsing
//!
//! The numeric fields arrive as raw text. Parsing follows `parseInt`: leading
//! whitespace is skipped, an optional sign is accepted and the longest run of
//! digits is read, so `"12 months"` parses as 12 and `"abc"` parses as
//! not-a-number. What happens to not-a-number, negative or zero input is
//! decided by the [`InputPolicy`].

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Field, Problem, ValidationError};

/// How strictly form input is checked before scoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputPolicy {
  /// Anything goes: non-numbers score as NaN, zero universality as infinity
  #[default]
  Permissive,
  /// Every field must be numeric and non-negative, universality at least 1
  Strict,
}

/// Raw contents of the evaluation form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationForm {
  pub person_name: String,
  pub universality: String,
  pub frequency: String,
  pub duration: String,
  pub months_ago: String,
}

impl EvaluationForm {
  pub fn new(
    person_name: impl Into<String>,
    universality: impl Into<String>,
    frequency: impl Into<String>,
    duration: impl Into<String>,
    months_ago: impl Into<String>,
  ) -> Self {
    Self {
      person_name: person_name.into(),
      universality: universality.into(),
      frequency: frequency.into(),
      duration: duration.into(),
      months_ago: months_ago.into(),
    }
  }

  /// Clear every field
  pub fn reset(&mut self) {
    *self = Self::default();
  }
}

/// Parsed factors. `None` stands for not-a-number.
#[derive(Debug, Clone, PartialEq)]
pub struct Factors {
  pub person_name: String,
  pub universality: Option<f64>,
  pub frequency: Option<f64>,
  pub duration: Option<f64>,
  pub months_ago: Option<f64>,
}

/// Read a leading integer the way `parseInt(text, 10)` does. Long digit runs
/// lose precision rather than range, as JavaScript numbers do.
pub fn parse_integer(text: &str) -> Option<f64> {
  let trimmed = text.trim_start();
  let (negative, rest) = match trimmed.as_bytes().first() {
    Some(b'-') => (true, &trimmed[1..]),
    Some(b'+') => (false, &trimmed[1..]),
    _ => (false, trimmed),
  };

  let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
  let digits = &rest[..digits_end];
  if digits.is_empty() {
    return None;
  }

  let magnitude: f64 = digits.parse().ok()?;
  Some(if negative { -magnitude } else { magnitude })
}

fn check(
  field: Field,
  raw: &str,
  minimum: f64,
  failures: &mut Vec<(Field, Problem)>,
) -> Option<f64> {
  let value = parse_integer(raw);
  match value {
    None => failures.push((field, Problem::NotANumber(raw.to_string()))),
    Some(v) if v.is_infinite() => failures.push((field, Problem::OutOfRange(raw.to_string()))),
    Some(v) if v < 0.0 => failures.push((field, Problem::Negative(v))),
    Some(v) if v < minimum => failures.push((field, Problem::Zero)),
    Some(_) => {}
  }
  value
}

/// Parse the form's numeric fields under the given policy
pub fn parse_form(form: &EvaluationForm, policy: InputPolicy) -> Result<Factors, ValidationError> {
  let mut failures = Vec::new();

  let universality = check(Field::Universality, &form.universality, 1.0, &mut failures);
  let frequency = check(Field::Frequency, &form.frequency, 0.0, &mut failures);
  let duration = check(Field::Duration, &form.duration, 0.0, &mut failures);
  let months_ago = check(Field::MonthsAgo, &form.months_ago, 0.0, &mut failures);

  if policy == InputPolicy::Strict && !failures.is_empty() {
    return Err(ValidationError { failures });
  }

  if !failures.is_empty() {
    tracing::debug!(?failures, "accepting unvalidated input under permissive policy");
  }

  Ok(Factors {
    person_name: form.person_name.clone(),
    universality,
    frequency,
    duration,
    months_ago,
  })
}
