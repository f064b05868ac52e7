use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Form field that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Universality,
  Frequency,
  Duration,
  MonthsAgo,
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Field::Universality => "universality",
      Field::Frequency => "frequency",
      Field::Duration => "duration",
      Field::MonthsAgo => "months-ago",
    };
    f.write_str(name)
  }
}

/// Why a single field was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Problem {
  #[error("'{0}' is not a number")]
  NotANumber(String),
  #[error("'{0}' is too large")]
  OutOfRange(String),
  #[error("{0} is negative")]
  Negative(f64),
  #[error("must be at least 1")]
  Zero,
}

/// Every field that failed validation, in form order
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid evaluation input ({})", join_failures(.failures))]
pub struct ValidationError {
  pub failures: Vec<(Field, Problem)>,
}

impl ValidationError {
  pub fn fields(&self) -> Vec<Field> {
    self.failures.iter().map(|(field, _)| *field).collect()
  }
}

fn join_failures(failures: &[(Field, Problem)]) -> String {
  failures.iter().map(|(field, problem)| format!("{field}: {problem}")).collect::<Vec<_>>().join("; ")
}

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("stored evaluations are not valid JSON: {0}")]
  Corrupt(#[source] serde_json::Error),

  #[error("failed to serialize evaluations: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("no evaluation id left after {last}")]
  IdExhausted { last: i64 },

  #[error("storage I/O error at {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid config {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("could not determine a data directory; set IDENTA_HOME")]
  NoDataDir,
}
