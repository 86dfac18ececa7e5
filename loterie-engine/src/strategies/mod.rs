pub mod coverage;
pub mod frequency;
pub mod markov_chain;
pub mod risk_reward;
pub mod time_series;

use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use loterie_db::models::{Draw, GameSpec, Pool};

use crate::bands::RangeClassifier;
use crate::error::EngineError;
use crate::freq::{frequencies, frequencies_recent, FrequencyTable};
use crate::markov::TransitionTable;

/// Statistiques dérivées de la seule tranche d'entraînement. Reconstruites
/// à chaque backtest, jamais modifiées ensuite : les générateurs les lisent,
/// c'est tout.
#[derive(Debug)]
pub struct TrainingStats {
    pub spec: GameSpec,
    pub ball_freq: FrequencyTable,
    pub star_freq: FrequencyTable,
    pub recent_ball_freq: FrequencyTable,
    pub recent_star_freq: FrequencyTable,
    pub ball_transitions: TransitionTable,
    pub star_transitions: TransitionTable,
    pub ball_bands: RangeClassifier,
    pub star_bands: RangeClassifier,
}

impl TrainingStats {
    /// `train` du plus récent au plus ancien. `ts_window` : fenêtre des
    /// statistiques récentes (stratégie tendance).
    pub fn build(
        spec: &GameSpec,
        train: &[Draw],
        ts_window: usize,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            spec: *spec,
            ball_freq: frequencies(train, Pool::Balls, spec)?,
            star_freq: frequencies(train, Pool::Stars, spec)?,
            recent_ball_freq: frequencies_recent(train, Pool::Balls, spec, ts_window)?,
            recent_star_freq: frequencies_recent(train, Pool::Stars, spec, ts_window)?,
            ball_transitions: TransitionTable::build(train, Pool::Balls),
            star_transitions: TransitionTable::build(train, Pool::Stars),
            ball_bands: RangeClassifier::new(spec.ball_max),
            star_bands: RangeClassifier::new(spec.star_max),
        })
    }

    pub fn freq(&self, pool: Pool) -> &FrequencyTable {
        match pool {
            Pool::Balls => &self.ball_freq,
            Pool::Stars => &self.star_freq,
        }
    }

    pub fn recent_freq(&self, pool: Pool) -> &FrequencyTable {
        match pool {
            Pool::Balls => &self.recent_ball_freq,
            Pool::Stars => &self.recent_star_freq,
        }
    }

    pub fn transitions(&self, pool: Pool) -> &TransitionTable {
        match pool {
            Pool::Balls => &self.ball_transitions,
            Pool::Stars => &self.star_transitions,
        }
    }

    pub fn bands(&self, pool: Pool) -> &RangeClassifier {
        match pool {
            Pool::Balls => &self.ball_bands,
            Pool::Stars => &self.star_bands,
        }
    }
}

/// Une stratégie de génération. `pick` retourne exactement
/// `spec.pick_count(pool)` numéros uniques dans [1, spec.size(pool)],
/// triés par ordre croissant. La source aléatoire est toujours injectée.
pub trait Strategy: Send + Sync {
    fn name(&self) -> &str;
    fn pick(
        &self,
        stats: &TrainingStats,
        pool: Pool,
        rng: &mut StdRng,
    ) -> Result<Vec<u8>, EngineError>;
}

/// Grille générée : mêmes contraintes structurelles qu'un tirage, étiquetée
/// par la stratégie qui l'a produite. En lecture seule après génération.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    pub strategy: String,
    pub balls: Vec<u8>,
    pub stars: Vec<u8>,
}

/// Génère une grille complète : boules et étoiles tirées indépendamment,
/// chaque pool avec sa propre table de fréquences et son propre domaine.
pub fn generate_combination(
    strategy: &dyn Strategy,
    stats: &TrainingStats,
    rng: &mut StdRng,
) -> Result<Combination, EngineError> {
    let mut balls = strategy.pick(stats, Pool::Balls, rng)?;
    let mut stars = strategy.pick(stats, Pool::Stars, rng)?;
    balls.sort();
    stars.sort();
    Ok(Combination {
        strategy: strategy.name().to_string(),
        balls,
        stars,
    })
}

#[derive(Debug, Clone, Copy)]
pub struct StrategyParams {
    /// Taille de la liste chaude (stratégies fréquence et markov).
    pub top_k: usize,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self { top_k: 20 }
    }
}

pub fn all_strategies(params: &StrategyParams) -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(frequency::FrequencyStrategy::new(params.top_k)),
        Box::new(risk_reward::RiskRewardStrategy::default()),
        Box::new(coverage::CoverageStrategy::default()),
        Box::new(markov_chain::MarkovStrategy::new(params.top_k)),
        Box::new(time_series::TimeSeriesStrategy::default()),
    ]
}

/// Tire `k` numéros uniformément dans `pool`, sans remise.
pub(crate) fn sample_uniform(
    pool: &[u8],
    k: usize,
    rng: &mut StdRng,
) -> Result<Vec<u8>, EngineError> {
    if pool.len() < k {
        return Err(EngineError::InsufficientDomain {
            needed: k,
            available: pool.len(),
        });
    }
    Ok(pool.choose_multiple(rng, k).copied().collect())
}

/// Tire `k` numéros pondérés, sans remise. Les poids doivent être
/// strictement positifs (les appelants lissent leurs comptages).
pub(crate) fn sample_weighted(
    candidates: &[(u8, f64)],
    k: usize,
    rng: &mut StdRng,
) -> Result<Vec<u8>, EngineError> {
    if candidates.len() < k {
        return Err(EngineError::InsufficientDomain {
            needed: k,
            available: candidates.len(),
        });
    }

    let mut available = candidates.to_vec();
    let mut selected = Vec::with_capacity(k);
    for _ in 0..k {
        let weights: Vec<f64> = available.iter().map(|(_, w)| *w).collect();
        let dist = WeightedIndex::new(&weights).map_err(|_| EngineError::InsufficientDomain {
            needed: k,
            available: selected.len(),
        })?;
        let idx = dist.sample(rng);
        selected.push(available.remove(idx).0);
    }
    Ok(selected)
}

/// Tirages de test synthétiques (forme EuroMillions), du plus récent au
/// plus ancien.
pub fn make_test_draws(n: usize) -> Vec<Draw> {
    (0..n)
        .map(|i| {
            let base = (i % 10) as u8;
            let j = n - i;
            Draw {
                draw_id: format!("{:03}", i),
                day: if i % 2 == 0 { "MARDI".to_string() } else { "VENDREDI".to_string() },
                date: format!("2024-{:02}-{:02}", (j / 28) + 1, (j % 28) + 1),
                balls: vec![
                    base * 5 + 1,
                    base * 5 + 2,
                    base * 5 + 3,
                    base * 5 + 4,
                    base * 5 + 5,
                ],
                stars: vec![base % 12 + 1, (base + 1) % 12 + 1],
            }
        })
        .collect()
}

/// Vérifie les contraintes structurelles d'une sélection de numéros.
pub fn validate_pick(spec: &GameSpec, pool: Pool, numbers: &[u8]) -> bool {
    if numbers.len() != spec.pick_count(pool) {
        return false;
    }
    let max = spec.size(pool) as u8;
    if numbers.iter().any(|&n| n < 1 || n > max) {
        return false;
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use loterie_db::models::Game;
    use rand::SeedableRng;

    fn stats_euromillions() -> TrainingStats {
        let spec = Game::Euromillions.spec();
        TrainingStats::build(&spec, &make_test_draws(40), 25).unwrap()
    }

    fn stats_loto() -> TrainingStats {
        let spec = Game::Loto.spec();
        let draws: Vec<Draw> = (0..40usize)
            .map(|i| {
                let base = (i % 9) as u8;
                let j = 40 - i;
                Draw {
                    draw_id: format!("L{:03}", i),
                    day: "LUNDI".to_string(),
                    date: format!("2024-{:02}-{:02}", (j / 28) + 1, (j % 28) + 1),
                    balls: vec![
                        base * 5 + 1,
                        base * 5 + 2,
                        base * 5 + 3,
                        base * 5 + 4,
                        base * 5 + 5,
                    ],
                    stars: vec![base % 10 + 1],
                }
            })
            .collect();
        TrainingStats::build(&spec, &draws, 25).unwrap()
    }

    #[test]
    fn test_build_requires_draws() {
        let spec = Game::Euromillions.spec();
        let err = TrainingStats::build(&spec, &[], 25).unwrap_err();
        assert_eq!(err, EngineError::EmptyInput);
    }

    #[test]
    fn test_all_strategies_names() {
        let strategies = all_strategies(&StrategyParams::default());
        let names: Vec<&str> = strategies.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["frequence", "risque-rendement", "couverture", "markov", "tendance"]
        );
    }

    #[test]
    fn test_every_strategy_produces_valid_combination() {
        let stats = stats_euromillions();
        let spec = stats.spec;
        let mut rng = StdRng::seed_from_u64(42);

        for strategy in all_strategies(&StrategyParams::default()) {
            for _ in 0..20 {
                let combo = generate_combination(strategy.as_ref(), &stats, &mut rng).unwrap();
                assert!(
                    validate_pick(&spec, Pool::Balls, &combo.balls),
                    "{} : boules invalides {:?}",
                    strategy.name(),
                    combo.balls
                );
                assert!(
                    validate_pick(&spec, Pool::Stars, &combo.stars),
                    "{} : étoiles invalides {:?}",
                    strategy.name(),
                    combo.stars
                );
                assert_eq!(combo.strategy, strategy.name());
            }
        }
    }

    #[test]
    fn test_every_strategy_valid_on_loto() {
        // Même contrat sur le jeu 5+1 : domaines 49 et 10, une seule chance
        let stats = stats_loto();
        let spec = stats.spec;
        let mut rng = StdRng::seed_from_u64(99);

        for strategy in all_strategies(&StrategyParams::default()) {
            for _ in 0..10 {
                let combo = generate_combination(strategy.as_ref(), &stats, &mut rng).unwrap();
                assert!(validate_pick(&spec, Pool::Balls, &combo.balls));
                assert!(validate_pick(&spec, Pool::Stars, &combo.stars));
            }
        }
    }

    #[test]
    fn test_pools_generated_independently() {
        // Boules et étoiles ont chacune leur table de fréquences et leur
        // domaine : la liste chaude des boules n'influence pas les étoiles
        let spec = Game::Euromillions.spec();
        let draws: Vec<Draw> = (0..30u8)
            .map(|i| Draw {
                draw_id: format!("{:03}", i),
                day: String::new(),
                date: format!("2024-01-{:02}", 28 - (i % 28)),
                balls: vec![41, 43, 45, 47, 49],
                stars: vec![2, 4],
            })
            .collect();
        let stats = TrainingStats::build(&spec, &draws, 25).unwrap();

        let strategy = frequency::FrequencyStrategy::new(5);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let combo = generate_combination(&strategy, &stats, &mut rng).unwrap();
            for b in &combo.balls {
                assert!([41, 43, 45, 47, 49].contains(b));
            }
            for s in &combo.stars {
                // Liste chaude des étoiles : 2 et 4 sortis, puis 1, 3, 5 à zéro
                assert!(*s <= 5, "étoile {} hors de la liste chaude", s);
            }
        }
    }

    #[test]
    fn test_generation_deterministic_with_seed() {
        let stats = stats_euromillions();

        for strategy in all_strategies(&StrategyParams::default()) {
            let mut rng1 = StdRng::seed_from_u64(777);
            let mut rng2 = StdRng::seed_from_u64(777);
            let c1 = generate_combination(strategy.as_ref(), &stats, &mut rng1).unwrap();
            let c2 = generate_combination(strategy.as_ref(), &stats, &mut rng2).unwrap();
            assert_eq!(c1, c2, "{} non déterministe à seed fixée", strategy.name());
        }
    }

    #[test]
    fn test_sample_uniform_exact_count() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool: Vec<u8> = (1..=20).collect();
        let picked = sample_uniform(&pool, 5, &mut rng).unwrap();
        assert_eq!(picked.len(), 5);
        let mut unique = picked.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn test_sample_uniform_insufficient() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = sample_uniform(&[1, 2, 3], 5, &mut rng).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientDomain {
                needed: 5,
                available: 3
            }
        );
    }

    #[test]
    fn test_sample_weighted_without_replacement() {
        let mut rng = StdRng::seed_from_u64(5);
        let candidates: Vec<(u8, f64)> = (1..=10).map(|n| (n, n as f64)).collect();
        let picked = sample_weighted(&candidates, 10, &mut rng).unwrap();
        let mut sorted = picked.clone();
        sorted.sort();
        assert_eq!(sorted, (1..=10).collect::<Vec<u8>>());
    }

    #[test]
    fn test_make_test_draws_dates_descending() {
        let draws = make_test_draws(30);
        for pair in draws.windows(2) {
            assert!(pair[0].date >= pair[1].date);
        }
    }
}
