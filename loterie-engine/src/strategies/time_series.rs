use rand::rngs::StdRng;

use loterie_db::models::Pool;

use super::{sample_weighted, Strategy, TrainingStats};
use crate::error::EngineError;

/// Tendance récente : fréquences sur la fenêtre des derniers tirages,
/// mêlées à l'horizon complet pour la stabilité, puis tirage pondéré sans
/// remise.
pub struct TimeSeriesStrategy {
    recent_weight: f64,
}

impl TimeSeriesStrategy {
    pub fn new(recent_weight: f64) -> Self {
        Self { recent_weight }
    }
}

impl Default for TimeSeriesStrategy {
    fn default() -> Self {
        Self::new(0.7)
    }
}

impl Strategy for TimeSeriesStrategy {
    fn name(&self) -> &str {
        "tendance"
    }

    fn pick(
        &self,
        stats: &TrainingStats,
        pool: Pool,
        rng: &mut StdRng,
    ) -> Result<Vec<u8>, EngineError> {
        let n = stats.spec.pick_count(pool);
        let size = stats.spec.size(pool);
        let recent = stats.recent_freq(pool);
        let long = stats.freq(pool);

        // Taux par tirage sur chaque horizon, plancher pour éviter les
        // poids nuls
        let floor = 1.0 / (size as f64 * 10.0);
        let candidates: Vec<(u8, f64)> = (1..=size as u8)
            .map(|s| {
                let blended = self.recent_weight * recent.rate(s)
                    + (1.0 - self.recent_weight) * long.rate(s);
                (s, blended.max(floor))
            })
            .collect();

        sample_weighted(&candidates, n, rng)
    }
}
