//! Evaluation store
//!
//! Every operation reads the whole collection from storage and, when it
//! changes something, writes the whole collection back. Only safe with a
//! single writer at a time.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::evaluation::{Evaluation, ScoredEvaluation};
use crate::storage::Storage;

/// What `list` does when the stored blob cannot be parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorruptionPolicy {
  /// Log a warning and behave as if nothing were stored. The unreadable
  /// content is backed up before the next write replaces it.
  #[default]
  TreatAsEmpty,
  /// Surface the parse failure
  Fail,
}

pub type Clock = Box<dyn Fn() -> DateTime<Utc>>;

pub struct EvaluationStore<S: Storage> {
  storage: S,
  clock: Clock,
  corruption: CorruptionPolicy,
}

impl<S: Storage> EvaluationStore<S> {
  pub fn new(storage: S) -> Self {
    Self { storage, clock: Box::new(Utc::now), corruption: CorruptionPolicy::default() }
  }

  /// Replace the time source used for ids and dates
  pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
    self.clock = Box::new(clock);
    self
  }

  pub fn with_corruption_policy(mut self, policy: CorruptionPolicy) -> Self {
    self.corruption = policy;
    self
  }

  pub fn storage(&self) -> &S {
    &self.storage
  }

  /// All stored evaluations in insertion order
  pub fn list(&self) -> Result<Vec<Evaluation>, StoreError> {
    Ok(self.load()?.evaluations)
  }

  fn load(&self) -> Result<Loaded, StoreError> {
    let Some(contents) = self.storage.read()? else {
      return Ok(Loaded::default());
    };

    match serde_json::from_str(&contents) {
      Ok(evaluations) => Ok(Loaded { evaluations, unreadable: None }),
      Err(e) => match self.corruption {
        CorruptionPolicy::TreatAsEmpty => {
          tracing::warn!(error = %e, "stored evaluations are unreadable, treating as empty");
          Ok(Loaded { evaluations: Vec::new(), unreadable: Some(contents) })
        }
        CorruptionPolicy::Fail => Err(StoreError::Corrupt(e)),
      },
    }
  }

  pub fn get(&self, id: i64) -> Result<Option<Evaluation>, StoreError> {
    Ok(self.list()?.into_iter().find(|e| e.id == id))
  }

  /// Persist a scored evaluation under a fresh id, returning the stored record
  pub fn append(&mut self, scored: ScoredEvaluation) -> Result<Evaluation, StoreError> {
    let Loaded { mut evaluations, unreadable } = self.load()?;

    let now = (self.clock)();
    let last_id = evaluations.iter().map(|e| e.id).max();
    let id = next_id(now.timestamp_millis(), last_id)?;
    let date = Utc.timestamp_millis_opt(id).single().unwrap_or(now);

    let record = scored.into_record(id, date);
    evaluations.push(record.clone());
    self.save(unreadable, &evaluations)?;

    tracing::debug!(id, count = evaluations.len(), "appended evaluation");
    Ok(record)
  }

  /// Remove the evaluation with `id`. Returns false, and writes nothing, when
  /// there is no such evaluation.
  pub fn remove(&mut self, id: i64) -> Result<bool, StoreError> {
    let Loaded { evaluations, unreadable } = self.load()?;
    let before = evaluations.len();
    let remaining: Vec<Evaluation> = evaluations.into_iter().filter(|e| e.id != id).collect();

    if remaining.len() == before {
      tracing::debug!(id, "no evaluation to remove");
      return Ok(false);
    }

    self.save(unreadable, &remaining)?;
    tracing::debug!(id, count = remaining.len(), "removed evaluation");
    Ok(true)
  }

  /// Remove every evaluation, returning how many there were
  pub fn clear(&mut self) -> Result<usize, StoreError> {
    let Loaded { evaluations, unreadable } = self.load()?;
    self.save(unreadable, &[])?;
    Ok(evaluations.len())
  }

  /// Write the collection back. Unreadable content it replaces is handed to
  /// the backend's backup first, and nothing is written if that fails.
  fn save(
    &mut self,
    unreadable: Option<String>,
    evaluations: &[Evaluation],
  ) -> Result<(), StoreError> {
    let json = serde_json::to_string(evaluations).map_err(StoreError::Serialize)?;
    if let Some(contents) = unreadable {
      self.storage.preserve(&contents)?;
      tracing::warn!(bytes = contents.len(), "backed up unreadable evaluations before overwriting");
    }
    self.storage.write(&json)
  }
}

/// Collection as read from storage, plus the raw blob when it could not be parsed
#[derive(Default)]
struct Loaded {
  evaluations: Vec<Evaluation>,
  unreadable: Option<String>,
}

/// Millisecond timestamp, bumped past the last id so ids stay unique and
/// increasing even when two evaluations land in the same millisecond
fn next_id(now_millis: i64, last_id: Option<i64>) -> Result<i64, StoreError> {
  match last_id {
    Some(last) if last >= now_millis => {
      last.checked_add(1).ok_or(StoreError::IdExhausted { last })
    }
    _ => Ok(now_millis),
  }
}
