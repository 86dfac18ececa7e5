use rand::rngs::StdRng;

use loterie_db::models::Pool;

use super::{sample_uniform, Strategy, TrainingStats};
use crate::error::EngineError;

/// Tire uniformément parmi les K numéros les plus fréquents de
/// l'entraînement.
pub struct FrequencyStrategy {
    top_k: usize,
}

impl FrequencyStrategy {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }
}

impl Strategy for FrequencyStrategy {
    fn name(&self) -> &str {
        "frequence"
    }

    fn pick(
        &self,
        stats: &TrainingStats,
        pool: Pool,
        rng: &mut StdRng,
    ) -> Result<Vec<u8>, EngineError> {
        let n = stats.spec.pick_count(pool);
        let table = stats.freq(pool);
        let k = self.top_k.min(table.domain_size());
        let hot = table.hot(k);
        sample_uniform(&hot, n, rng)
    }
}
