use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{Application, Recommendation};
use crate::store::AiVerdict;

/// Rounds a model score and clamps it to 0..=100. Non-finite scores become 0.
pub fn clamp_score(score: f64) -> i32 {
    if !score.is_finite() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as i32
}

/// Turns model output into verdicts for `applications`.
///
/// Verdicts for ids outside `applications` are dropped. When an id appears
/// more than once the last verdict wins. Output follows the input order.
pub fn collect_verdicts(
    applications: &[Application],
    recommendations: &[Recommendation],
) -> Vec<AiVerdict> {
    let mut latest: HashMap<Uuid, &Recommendation> = HashMap::new();
    for rec in recommendations {
        if let Ok(id) = Uuid::parse_str(rec.application_id.trim()) {
            latest.insert(id, rec);
        }
    }

    applications
        .iter()
        .filter_map(|app| {
            let rec = latest.get(&app.id)?;
            Some(AiVerdict {
                application_id: app.id,
                score: clamp_score(rec.score),
                feedback: rec.feedback.trim().to_string(),
            })
        })
        .collect()
}
