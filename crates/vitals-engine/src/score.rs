//! Activity-derived health score computation.

/// Totals over a user's activities within a scoring window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActivityTotals {
    pub total_duration_minutes: f64,
    pub total_calories: f64,
    pub activity_count: usize,
}

/// Compute a 0-100 health score from recent activity totals.
///
/// Scoring formula: duration / 10 + calories / 100 + 2 per activity,
/// clamped to 100. No activities scores zero.
pub fn health_score(totals: &ActivityTotals) -> f64 {
    if totals.activity_count == 0 {
        return 0.0;
    }
    let score = totals.total_duration_minutes / 10.0
        + totals.total_calories / 100.0
        + totals.activity_count as f64 * 2.0;
    score.min(100.0)
}

/// Mean of a series of scores; zero for an empty series.
pub fn average_score(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}
