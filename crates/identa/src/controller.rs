//! Form controller
//!
//! The submit, load and delete actions as plain calls. Front ends translate
//! their own events into these.

use anyhow::{Context, Result};

use crate::evaluation::{Evaluation, ScoredEvaluation};
use crate::input::{parse_form, EvaluationForm, InputPolicy};
use crate::render;
use crate::storage::Storage;
use crate::store::EvaluationStore;

/// Outcome of a form submission
#[derive(Debug, Clone)]
pub struct Submission {
  pub evaluation: Evaluation,
  pub score_panel: String,
  pub history_panel: String,
}

pub struct FormController<S: Storage> {
  store: EvaluationStore<S>,
  policy: InputPolicy,
}

impl<S: Storage> FormController<S> {
  pub fn new(store: EvaluationStore<S>, policy: InputPolicy) -> Self {
    Self { store, policy }
  }

  pub fn store(&self) -> &EvaluationStore<S> {
    &self.store
  }

  /// Score the form, store the result, render both panels and clear the form.
  /// The form is left untouched when validation fails.
  pub fn submit(&mut self, form: &mut EvaluationForm) -> Result<Submission> {
    let factors = parse_form(form, self.policy)?;
    let scored = ScoredEvaluation::from_factors(factors);
    let score_panel = render::render_score(scored.score, &scored);

    let evaluation = self.store.append(scored).context("Failed to save evaluation")?;
    let history_panel = self.load()?;

    form.reset();

    Ok(Submission { evaluation, score_panel, history_panel })
  }

  /// Render the stored history
  pub fn load(&self) -> Result<String> {
    let history = self.store.list().context("Failed to load evaluation history")?;
    Ok(render::render_history(&history))
  }

  /// Delete an evaluation and re-render the history
  pub fn delete(&mut self, id: i64) -> Result<String> {
    self.store.remove(id).with_context(|| format!("Failed to delete evaluation {id}"))?;
    self.load()
  }
}
