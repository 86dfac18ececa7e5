use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use loterie_db::models::Pool;

use super::{Strategy, TrainingStats};
use crate::error::EngineError;

/// Chaîne de Markov séquentielle : amorce sur un numéro fréquent puis suit
/// les transitions observées, avec la liste chaude comme repli.
pub struct MarkovStrategy {
    top_k: usize,
}

impl MarkovStrategy {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }
}

impl Strategy for MarkovStrategy {
    fn name(&self) -> &str {
        "markov"
    }

    fn pick(
        &self,
        stats: &TrainingStats,
        pool: Pool,
        rng: &mut StdRng,
    ) -> Result<Vec<u8>, EngineError> {
        let n = stats.spec.pick_count(pool);
        let size = stats.spec.size(pool);
        if size < n {
            return Err(EngineError::InsufficientDomain {
                needed: n,
                available: size,
            });
        }

        let transitions = stats.transitions(pool);
        let hot = stats.freq(pool).hot(self.top_k.min(size));

        let mut picked: Vec<u8> = Vec::with_capacity(n);
        let seed = match hot.choose(rng) {
            Some(&s) => s,
            None => {
                return Err(EngineError::InsufficientDomain {
                    needed: n,
                    available: 0,
                })
            }
        };
        picked.push(seed);

        let mut current = seed;
        let mut attempts = 0;
        while picked.len() < n && attempts < 10 * n {
            attempts += 1;
            match transitions.sample_next(current, &picked, &hot, rng) {
                Some(next) => {
                    picked.push(next);
                    current = next;
                }
                None => break,
            }
        }

        // Budget d'essais épuisé ou chaîne à sec : compléter depuis la
        // liste chaude
        if picked.len() < n {
            for &h in &hot {
                if !picked.contains(&h) {
                    picked.push(h);
                    if picked.len() == n {
                        break;
                    }
                }
            }
        }

        if picked.len() < n {
            return Err(EngineError::InsufficientDomain {
                needed: n,
                available: picked.len(),
            });
        }

        Ok(picked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::make_test_draws;
    use loterie_db::models::{Draw, Game};
    use rand::SeedableRng;

    fn stats() -> TrainingStats {
        let spec = Game::Euromillions.spec();
        TrainingStats::build(&spec, &make_test_draws(40), 25).unwrap()
    }

    #[test]
    fn test_exact_count_unique() {
        let stats = stats();
        let strategy = MarkovStrategy::new(20);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let picked = strategy.pick(&stats, Pool::Balls, &mut rng).unwrap();
            assert_eq!(picked.len(), 5);
            let mut unique = picked.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), 5);
        }
    }

    #[test]
    fn test_empty_transitions_uses_fallback() {
        // Pool à une seule étoile : aucune paire adjacente, la grille vient
        // entièrement du repli chaud
        let spec = Game::Loto.spec();
        let draws: Vec<Draw> = (0..20u8)
            .map(|i| Draw {
                draw_id: format!("{:03}", i),
                day: String::new(),
                date: format!("2024-01-{:02}", (i % 28) + 1),
                balls: vec![1, 12, 23, 34, 45],
                stars: vec![(i % 10) + 1],
            })
            .collect();
        let stats = TrainingStats::build(&spec, &draws, 10).unwrap();
        assert!(stats.star_transitions.is_empty());

        let strategy = MarkovStrategy::new(20);
        let mut rng = StdRng::seed_from_u64(42);
        let picked = strategy.pick(&stats, Pool::Stars, &mut rng).unwrap();
        assert_eq!(picked.len(), 1);
        assert!(picked[0] >= 1 && picked[0] <= 10);
    }

    #[test]
    fn test_chain_follows_observed_transitions() {
        // Un seul motif dans l'entraînement : la chaîne le reproduit
        let spec = Game::Euromillions.spec();
        let draws: Vec<Draw> = (0..20u8)
            .map(|i| Draw {
                draw_id: format!("{:03}", i),
                day: String::new(),
                date: format!("2024-01-{:02}", (i % 28) + 1),
                balls: vec![3, 11, 19, 27, 35],
                stars: vec![2, 7],
            })
            .collect();
        let stats = TrainingStats::build(&spec, &draws, 10).unwrap();

        let strategy = MarkovStrategy::new(5);
        let mut rng = StdRng::seed_from_u64(42);
        let mut picked = strategy.pick(&stats, Pool::Balls, &mut rng).unwrap();
        picked.sort();
        assert_eq!(picked, vec![3, 11, 19, 27, 35]);
    }

    #[test]
    fn test_domain_smaller_than_pick_fails() {
        use loterie_db::models::GameSpec;
        let spec = GameSpec {
            name: "mini",
            ball_count: 5,
            ball_max: 12,
            star_count: 3,
            star_max: 2,
        };
        let draws: Vec<Draw> = (0..5u8)
            .map(|i| Draw {
                draw_id: format!("{:03}", i),
                day: String::new(),
                date: format!("2024-01-{:02}", i + 1),
                balls: vec![1, 2, 3, 4, 5],
                stars: vec![1, 2],
            })
            .collect();
        let stats = TrainingStats::build(&spec, &draws, 5).unwrap();

        let strategy = MarkovStrategy::new(20);
        let mut rng = StdRng::seed_from_u64(42);
        let err = strategy.pick(&stats, Pool::Stars, &mut rng).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientDomain {
                needed: 3,
                available: 2
            }
        );
    }
}
