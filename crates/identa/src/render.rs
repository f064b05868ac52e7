//! Score and history panels
//!
//! Plain strings with `colored` highlights; callers decide where they go.

use chrono::{DateTime, Local, SecondsFormat, Utc};
use colored::*;

use crate::evaluation::{display_name, Evaluation, ScoredEvaluation};

/// Format a number the way JavaScript prints it: `NaN`, `Infinity`, or the
/// shortest decimal
pub fn format_score(score: f64) -> String {
  if score.is_nan() {
    "NaN".to_string()
  } else if score == f64::INFINITY {
    "Infinity".to_string()
  } else if score == f64::NEG_INFINITY {
    "-Infinity".to_string()
  } else {
    score.to_string()
  }
}

fn format_factor(value: Option<f64>) -> String {
  value.map(format_score).unwrap_or_else(|| "NaN".to_string())
}

fn format_stored_score(score: Option<f64>) -> String {
  score.map(format_score).unwrap_or_else(|| "null".to_string())
}

/// Local calendar date of a stored evaluation
pub fn format_date(date: DateTime<Utc>) -> String {
  let local: DateTime<Local> = date.into();
  local.format("%Y-%m-%d").to_string()
}

/// Summary of a just-submitted evaluation
pub fn render_score(score: f64, evaluation: &ScoredEvaluation) -> String {
  let breakdown = evaluation.breakdown();
  let mut out = String::new();

  out.push_str(&format!("{} {}\n", "Score:".bold(), format_score(score).green().bold()));
  out.push_str(&format!("Person: {}\n", display_name(&evaluation.person_name)));
  out.push_str(&format!("Universality (m): {} people\n", format_factor(evaluation.universality)));
  out.push_str(&format!("Frequency (t): {} times\n", format_factor(evaluation.frequency)));
  out.push_str(&format!("Duration (d): {} months\n", format_factor(evaluation.duration)));
  out.push_str(&format!("Recency (p): {} months ago\n", format_factor(evaluation.months_ago)));
  out.push_str(
    &format!(
      "  rarity {:.2} + frequency {:.2} + duration {:.2} + recency {:.2}\n",
      breakdown.rarity, breakdown.frequency, breakdown.duration, breakdown.recency
    )
    .dimmed()
    .to_string(),
  );

  out
}

fn render_entry(item: &Evaluation) -> String {
  let mut out = String::new();
  out.push_str(&format!(
    "{} - {}\n",
    item.display_name().cyan().bold(),
    format_date(item.date)
  ));
  out.push_str(&format!("  Score: {}\n", format_stored_score(item.score).green()));
  out.push_str(&format!(
    "  Universality: {} people / Frequency: {} times\n",
    format_factor(item.universality),
    format_factor(item.frequency)
  ));
  out.push_str(&format!(
    "  Duration: {} months / Recency: {} months ago\n",
    format_factor(item.duration),
    format_factor(item.months_ago)
  ));
  out.push_str(&format!("  {}\n", format!("[delete {}]", item.id).dimmed()));
  out
}

/// All evaluations, most recent first, each with its delete action
pub fn render_history(list: &[Evaluation]) -> String {
  if list.is_empty() {
    return format!("{}\n", "No evaluations yet".yellow());
  }

  list.iter().rev().map(render_entry).collect::<Vec<_>>().join("\n")
}

/// History as a JSON array, most recent first
pub fn render_history_json(list: &[Evaluation]) -> serde_json::Result<String> {
  let newest_first: Vec<&Evaluation> = list.iter().rev().collect();
  serde_json::to_string_pretty(&newest_first)
}

/// One stored evaluation in full
pub fn render_evaluation(item: &Evaluation) -> String {
  let mut out = render_entry(item);
  let recorded = item.date.to_rfc3339_opts(SecondsFormat::Millis, true);
  out.push_str(&format!("  Recorded: {recorded}\n"));
  out
}
