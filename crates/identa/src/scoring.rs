//! Identity scoring
//!
//! Closed-form score over four factors: a rarity bonus, two diminishing-returns
//! growth terms and a linear recency decay over a 24 month window.

/// Months after which an experience no longer contributes to recency
pub const RECENCY_WINDOW_MONTHS: f64 = 24.0;

/// Per-term contributions of a score, before rounding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
  pub rarity: f64,
  pub frequency: f64,
  pub duration: f64,
  pub recency: f64,
  pub total: f64,
}

/// `1/m`, infinite for `m = 0`
pub fn rarity(universality: f64) -> f64 {
  1.0 / universality
}

/// `ln(1 + x)`, shared by the frequency and duration terms
pub fn growth(count: f64) -> f64 {
  (1.0 + count).ln()
}

/// `(24 - min(p, 24)) / 24`
pub fn recency(months_ago: f64) -> f64 {
  // f64::min drops NaN, the clamp has to keep it
  let clamped = if months_ago > RECENCY_WINDOW_MONTHS { RECENCY_WINDOW_MONTHS } else { months_ago };
  (RECENCY_WINDOW_MONTHS - clamped) / RECENCY_WINDOW_MONTHS
}

/// Round to two decimal places, half away from zero
pub fn round_score(score: f64) -> f64 {
  (score * 100.0).round() / 100.0
}

pub fn score_breakdown(
  universality: f64,
  frequency: f64,
  duration: f64,
  months_ago: f64,
) -> ScoreBreakdown {
  let rarity = rarity(universality);
  let frequency = growth(frequency);
  let duration = growth(duration);
  let recency = recency(months_ago);

  ScoreBreakdown {
    rarity,
    frequency,
    duration,
    recency,
    total: round_score(rarity + frequency + duration + recency),
  }
}

/// Score an evaluation. Inputs are not validated: zero universality gives an
/// infinite score and NaN inputs give a NaN score.
pub fn calculate_score(universality: f64, frequency: f64, duration: f64, months_ago: f64) -> f64 {
  score_breakdown(universality, frequency, duration, months_ago).total
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_unit_inputs() {
    assert_eq!(calculate_score(1.0, 0.0, 0.0, 0.0), 2.0);
  }

  #[test]
  fn test_mixed_inputs_round_to_two_places() {
    assert_eq!(calculate_score(2.0, 1.0, 1.0, 12.0), 2.39);
  }

  #[test]
  fn test_matches_formula() {
    for m in 1..6 {
      for t in 0..5 {
        for d in [0, 3, 12] {
          for p in [0, 6, 23, 24, 30] {
            let (m, t, d, p) = (m as f64, t as f64, d as f64, p as f64);
            let expected =
              ((1.0 / m + (1.0 + t).ln() + (1.0 + d).ln() + (24.0 - p.min(24.0)) / 24.0) * 100.0)
                .round()
                / 100.0;
            assert_eq!(calculate_score(m, t, d, p), expected);
          }
        }
      }
    }
  }

  #[test]
  fn test_recency_is_zero_past_window() {
    let at_window = calculate_score(3.0, 2.0, 5.0, 24.0);
    assert_eq!(calculate_score(3.0, 2.0, 5.0, 25.0), at_window);
    assert_eq!(calculate_score(3.0, 2.0, 5.0, 1000.0), at_window);
    assert_eq!(recency(24.0), 0.0);
    assert_eq!(recency(1000.0), 0.0);
  }

  #[test]
  fn test_recency_decays_linearly() {
    assert_eq!(recency(0.0), 1.0);
    assert_eq!(recency(12.0), 0.5);
    assert_eq!(recency(18.0), 0.25);
  }

  #[test]
  fn test_zero_universality_is_infinite() {
    let score = calculate_score(0.0, 1.0, 1.0, 1.0);
    assert!(score.is_infinite());
    assert!(score > 0.0);
  }

  #[test]
  fn test_nan_propagates_through_every_term() {
    assert!(calculate_score(f64::NAN, 0.0, 0.0, 0.0).is_nan());
    assert!(calculate_score(1.0, f64::NAN, 0.0, 0.0).is_nan());
    assert!(calculate_score(1.0, 0.0, f64::NAN, 0.0).is_nan());
    assert!(calculate_score(1.0, 0.0, 0.0, f64::NAN).is_nan());
  }

  #[test]
  fn test_breakdown_terms() {
    let b = score_breakdown(2.0, 1.0, 1.0, 12.0);
    assert_eq!(b.rarity, 0.5);
    assert_eq!(b.frequency, 2f64.ln());
    assert_eq!(b.duration, 2f64.ln());
    assert_eq!(b.recency, 0.5);
    assert_eq!(b.total, 2.39);
  }
}
