use rand::rngs::StdRng;

use loterie_db::models::Pool;

use super::{sample_uniform, Strategy, TrainingStats};
use crate::bands::Band;
use crate::error::EngineError;

/// Répartition des sélections entre tranches de valeurs basse/médiane/haute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandAllocation {
    pub low: usize,
    pub mid: usize,
    pub high: usize,
}

impl Default for BandAllocation {
    fn default() -> Self {
        Self {
            low: 2,
            mid: 2,
            high: 1,
        }
    }
}

impl BandAllocation {
    /// Rééchelonne sur `m` sélections, plus fort reste, priorité basse >
    /// médiane > haute à reste égal.
    pub fn scaled_to(&self, m: usize) -> [usize; 3] {
        let total = self.low + self.mid + self.high;
        if total == 0 {
            return [m, 0, 0];
        }
        if total == m {
            return [self.low, self.mid, self.high];
        }

        let shares = [self.low, self.mid, self.high];
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

/// Couvre les tranches de valeurs du domaine : un quota par tranche, tiré
/// parmi les numéros les plus fréquents de la tranche. Manque comblé depuis
/// le classement global.
pub struct CoverageStrategy {
    allocation: BandAllocation,
}

impl CoverageStrategy {
    pub fn new(allocation: BandAllocation) -> Self {
        Self { allocation }
    }
}

impl Default for CoverageStrategy {
    fn default() -> Self {
        Self::new(BandAllocation::default())
    }
}

impl Strategy for CoverageStrategy {
    fn name(&self) -> &str {
        "couverture"
    }

    fn pick(
        &self,
        stats: &TrainingStats,
        pool: Pool,
        rng: &mut StdRng,
    ) -> Result<Vec<u8>, EngineError> {
        let n = stats.spec.pick_count(pool);
        let size = stats.spec.size(pool);
        let table = stats.freq(pool);
        let bands = stats.bands(pool);

        let counts = self.allocation.scaled_to(n);
        let mut picked: Vec<u8> = Vec::with_capacity(n);

        for (band, &want) in [Band::Low, Band::Mid, Band::High].iter().zip(counts.iter()) {
            if want == 0 {
                continue;
            }
            // Numéros de la tranche, du plus fréquent au moins fréquent
            let mut in_band: Vec<u8> = bands.range(*band).collect();
            in_band.sort_by(|&a, &b| table.count(b).cmp(&table.count(a)).then(a.cmp(&b)));

            // Tirage dans la moitié la plus fréquente de la tranche
            let top = in_band.len().div_ceil(2).max(want).min(in_band.len());
            let take = want.min(in_band.len());
            if take > 0 {
                picked.extend(sample_uniform(&in_band[..top], take, rng)?);
            }
        }

        // Manque (tranche trop petite) : compléter depuis le classement global
        if picked.len() < n {
            for s in table.ranked() {
                if !picked.contains(&s) {
                    picked.push(s);
                    if picked.len() == n {
                        break;
                    }
                }
            }
        }

        if picked.len() < n {
            return Err(EngineError::InsufficientDomain {
                needed: n,
                available: size,
            });
        }

        Ok(picked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::make_test_draws;
    use loterie_db::models::Game;
    use rand::SeedableRng;

    fn stats() -> TrainingStats {
        let spec = Game::Euromillions.spec();
        TrainingStats::build(&spec, &make_test_draws(40), 25).unwrap()
    }

    #[test]
    fn test_band_allocation_exact() {
        // Tranches EuroMillions : 1-16 / 17-33 / 34-50, quota 2+2+1,
        // respecté à chaque invocation
        let stats = stats();
        let strategy = CoverageStrategy::default();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let picked = strategy.pick(&stats, Pool::Balls, &mut rng).unwrap();
            assert_eq!(picked.len(), 5);
            let low = picked.iter().filter(|&&s| s <= 16).count();
            let mid = picked.iter().filter(|&&s| s >= 17 && s <= 33).count();
            let high = picked.iter().filter(|&&s| s >= 34).count();
            assert_eq!((low, mid, high), (2, 2, 1), "grille {:?}", picked);
        }
    }

    #[test]
    fn test_scaled_to_star_pools() {
        let allocation = BandAllocation::default();
        assert_eq!(allocation.scaled_to(5), [2, 2, 1]);
        assert_eq!(allocation.scaled_to(2), [1, 1, 0]);
        assert_eq!(allocation.scaled_to(1), [1, 0, 0]);
    }

    #[test]
    fn test_star_pool_valid() {
        let stats = stats();
        let strategy = CoverageStrategy::default();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..20 {
            let picked = strategy.pick(&stats, Pool::Stars, &mut rng).unwrap();
            assert_eq!(picked.len(), 2);
            let mut unique = picked.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), 2);
        }
    }

    #[test]
    fn test_no_duplicates_across_bands() {
        let stats = stats();
        let strategy = CoverageStrategy::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let picked = strategy.pick(&stats, Pool::Balls, &mut rng).unwrap();
            let mut unique = picked.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), picked.len());
        }
    }

    #[test]
    fn test_shortfall_filled_from_global_ranking() {
        // Mini-domaine : tranche haute d'un seul numéro avec un quota de 2.
        // Le manque vient du classement global, la grille reste complète.
        use loterie_db::models::{Draw, GameSpec};
        let spec = GameSpec {
            name: "mini",
            ball_count: 3,
            ball_max: 4,
            star_count: 1,
            star_max: 4,
        };
        let draws: Vec<Draw> = (0..10u8)
            .map(|i| Draw {
                draw_id: format!("{:03}", i),
                day: String::new(),
                date: format!("2024-01-{:02}", (i % 28) + 1),
                balls: vec![1, 2, (i % 2) + 3],
                stars: vec![(i % 4) + 1],
            })
            .collect();
        let stats = TrainingStats::build(&spec, &draws, 5).unwrap();

        // max = 4 : tranches 1 / 2 / 3-4. Quota {0, 0, 3} > taille de la
        // tranche haute (2)
        let strategy = CoverageStrategy::new(BandAllocation {
            low: 0,
            mid: 0,
            high: 3,
        });
        let mut rng = StdRng::seed_from_u64(42);
        let picked = strategy.pick(&stats, Pool::Balls, &mut rng).unwrap();
        assert_eq!(picked.len(), 3);
        let mut unique = picked.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 3);
    }
}
