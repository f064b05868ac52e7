//! Identa - identity evaluation scoring
//!
//! Scores a person's identity-defining experience from four factors
//! (universality, frequency, duration, recency), keeps every scored
//! evaluation in a single JSON collection and renders the history newest
//! first with a delete action per entry.

pub mod config;
pub mod controller;
pub mod error;
pub mod evaluation;
pub mod input;
pub mod render;
pub mod scoring;
pub mod storage;
pub mod store;

pub use controller::{FormController, Submission};
pub use evaluation::{Evaluation, ScoredEvaluation};
pub use input::{EvaluationForm, InputPolicy};
pub use scoring::calculate_score;
pub use storage::{JsonFileStorage, MemoryStorage, Storage};
pub use store::{CorruptionPolicy, EvaluationStore};
