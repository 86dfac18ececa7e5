use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use loterie_db::models::Pool;

use super::{Strategy, TrainingStats};
use crate::error::EngineError;

/// Répartition des sélections entre tertiles chaud/tiède/froid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TertileProfile {
    pub hot: usize,
    pub warm: usize,
    pub cold: usize,
}

impl Default for TertileProfile {
    fn default() -> Self {
        Self {
            hot: 2,
            warm: 2,
            cold: 1,
        }
    }
}

impl TertileProfile {
    /// Rééchelonne le profil sur `m` sélections, méthode du plus fort reste.
    /// Déterministe : à reste égal, priorité chaud > tiède > froid.
    pub fn scaled_to(&self, m: usize) -> [usize; 3] {
        let total = self.hot + self.warm + self.cold;
        if total == 0 {
            return [m, 0, 0];
        }
        if total == m {
            return [self.hot, self.warm, self.cold];
        }

        let shares = [self.hot, self.warm, self.cold];
        let mut counts = [0usize; 3];
        let mut remainders = [0usize; 3];
        let mut assigned = 0;
        for i in 0..3 {
            counts[i] = shares[i] * m / total;
            remainders[i] = shares[i] * m % total;
            assigned += counts[i];
        }
        let mut order = [0usize, 1, 2];
        order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]).then(a.cmp(&b)));
        let mut left = m - assigned;
        for &i in &order {
            if left == 0 {
                break;
            }
            counts[i] += 1;
            left -= 1;
        }
        counts
    }
}

/// Équilibre risque/rendement : tertiles par rang de fréquence, sélection
/// selon un profil nommé. Tertile épuisé : repli sur le tertile le plus
/// proche plutôt qu'échec.
pub struct RiskRewardStrategy {
    profile: TertileProfile,
}

impl RiskRewardStrategy {
    pub fn new(profile: TertileProfile) -> Self {
        Self { profile }
    }
}

impl Default for RiskRewardStrategy {
    fn default() -> Self {
        Self::new(TertileProfile::default())
    }
}

// Ordre de repli par tertile : 0 = chaud, 1 = tiède, 2 = froid.
const FALLBACK_ORDER: [[usize; 3]; 3] = [[0, 1, 2], [1, 0, 2], [2, 1, 0]];

impl Strategy for RiskRewardStrategy {
    fn name(&self) -> &str {
        "risque-rendement"
    }

    fn pick(
        &self,
        stats: &TrainingStats,
        pool: Pool,
        rng: &mut StdRng,
    ) -> Result<Vec<u8>, EngineError> {
        let n = stats.spec.pick_count(pool);
        let size = stats.spec.size(pool);
        let ranked = stats.freq(pool).ranked();

        let t1 = size / 3;
        let t2 = 2 * size / 3;
        let tertiles: [&[u8]; 3] = [&ranked[..t1], &ranked[t1..t2], &ranked[t2..]];

        let counts = self.profile.scaled_to(n);
        let mut picked: Vec<u8> = Vec::with_capacity(n);

        for (tertile, &want) in counts.iter().enumerate() {
            for _ in 0..want {
                let mut chosen = None;
                for &candidate_tertile in &FALLBACK_ORDER[tertile] {
                    let available: Vec<u8> = tertiles[candidate_tertile]
                        .iter()
                        .filter(|s| !picked.contains(s))
                        .copied()
                        .collect();
                    if let Some(&c) = available.choose(rng) {
                        chosen = Some(c);
                        break;
                    }
                }
                match chosen {
                    Some(c) => picked.push(c),
                    None => {
                        return Err(EngineError::InsufficientDomain {
                            needed: n,
                            available: size,
                        })
                    }
                }
            }
        }

        Ok(picked)
    }
}
