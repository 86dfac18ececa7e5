use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use loterie_db::models::{Draw, GameSpec};

use crate::error::EngineError;
use crate::prize::PrizeTable;
use crate::score::score;
use crate::strategies::{
    all_strategies, generate_combination, Strategy, StrategyParams, TrainingStats,
};

#[derive(Debug, Clone)]
pub struct BacktestConfig {
    /// Date ISO de coupure : entraînement strictement avant, test à partir
    /// de cette date incluse.
    pub cutoff: String,
    /// Noms des stratégies à évaluer ; vide = toutes.
    pub strategies: Vec<String>,
    pub seed: u64,
    pub top_k: usize,
    /// Fenêtre des fréquences récentes (stratégie tendance).
    pub ts_window: usize,
}

impl BacktestConfig {
    pub fn new(cutoff: impl Into<String>) -> Self {
        Self {
            cutoff: cutoff.into(),
            strategies: Vec::new(),
            seed: 42,
            top_k: 20,
            ts_window: 25,
        }
    }
}

/// Cumul d'une stratégie sur l'ensemble des tirages de test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyAggregate {
    pub strategy: String,
    pub plays: u32,
    pub total_points: u64,
    pub total_ball_matches: u32,
    pub total_star_matches: u32,
    pub wins: u32,
}

impl StrategyAggregate {
    fn empty(strategy: &str) -> Self {
        Self {
            strategy: strategy.to_string(),
            plays: 0,
            total_points: 0,
            total_ball_matches: 0,
            total_star_matches: 0,
            wins: 0,
        }
    }

    pub fn mean_ball_matches(&self) -> f64 {
        if self.plays == 0 {
            0.0
        } else {
            self.total_ball_matches as f64 / self.plays as f64
        }
    }

    pub fn mean_star_matches(&self) -> f64 {
        if self.plays == 0 {
            0.0
        } else {
            self.total_star_matches as f64 / self.plays as f64
        }
    }

    /// Part des grilles ayant décroché un rang (points > 0).
    pub fn win_rate(&self) -> f64 {
        if self.plays == 0 {
            0.0
        } else {
            self.wins as f64 / self.plays as f64
        }
    }
}

/// Partitionne par date de coupure : entraînement < cutoff ≤ test.
/// Entraînement du plus récent au plus ancien, test en ordre chronologique.
pub fn split_draws(
    draws: &[Draw],
    cutoff: &str,
) -> Result<(Vec<Draw>, Vec<Draw>), EngineError> {
    let mut train: Vec<Draw> = draws
        .iter()
        .filter(|d| d.date.as_str() < cutoff)
        .cloned()
        .collect();
    let mut test: Vec<Draw> = draws
        .iter()
        .filter(|d| d.date.as_str() >= cutoff)
        .cloned()
        .collect();

    if train.is_empty() {
        return Err(EngineError::InsufficientData {
            cutoff: cutoff.to_string(),
            side: "entraînement",
        });
    }
    if test.is_empty() {
        return Err(EngineError::InsufficientData {
            cutoff: cutoff.to_string(),
            side: "test",
        });
    }

    train.sort_by(|a, b| b.date.cmp(&a.date));
    test.sort_by(|a, b| a.date.cmp(&b.date));
    Ok((train, test))
}

/// Évalue une stratégie sur la tranche de test : une grille FRAÎCHE par
/// tirage — un joueur rejoue à chaque tirage, il ne recycle pas sa grille —
/// scorée immédiatement puis cumulée. Un échec de génération avorte la
/// passe.
pub fn backtest_strategy(
    strategy: &dyn Strategy,
    stats: &TrainingStats,
    test: &[Draw],
    prizes: &PrizeTable,
    seed: u64,
) -> Result<StrategyAggregate, EngineError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut agg = StrategyAggregate::empty(strategy.name());

    for draw in test {
        let combo = generate_combination(strategy, stats, &mut rng)?;
        let result = score(&combo, draw, prizes);

        agg.plays += 1;
        agg.total_points += result.points as u64;
        agg.total_ball_matches += result.ball_matches as u32;
        agg.total_star_matches += result.star_matches as u32;
        if result.points > 0 {
            agg.wins += 1;
        }
    }

    Ok(agg)
}

/// Lance le backtest complet : découpage, statistiques d'entraînement
/// (jamais contaminées par la tranche de test), évaluation de chaque
/// stratégie, classement. Les noms inconnus dans `config.strategies` sont
/// ignorés.
pub fn run_backtest(
    spec: &GameSpec,
    draws: &[Draw],
    config: &BacktestConfig,
    prizes: &PrizeTable,
) -> Result<Vec<StrategyAggregate>, EngineError> {
    let (train, test) = split_draws(draws, &config.cutoff)?;
    let stats = TrainingStats::build(spec, &train, config.ts_window)?;

    let params = StrategyParams {
        top_k: config.top_k,
    };
    let strategies = all_strategies(&params);

    let mut aggregates = Vec::new();
    for strategy in &strategies {
        if !config.strategies.is_empty()
            && !config.strategies.iter().any(|n| n == strategy.name())
        {
            continue;
        }
        aggregates.push(backtest_strategy(
            strategy.as_ref(),
            &stats,
            &test,
            prizes,
            config.seed,
        )?);
    }

    rank_aggregates(&mut aggregates);
    Ok(aggregates)
}

/// Classement : points totaux décroissants, puis moyenne de boules
/// trouvées, puis moyenne d'étoiles, puis nom croissant — ordre total et
/// reproductible.
pub fn rank_aggregates(aggregates: &mut [StrategyAggregate]) {
    aggregates.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| {
                b.mean_ball_matches()
                    .partial_cmp(&a.mean_ball_matches())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| {
                b.mean_star_matches()
                    .partial_cmp(&a.mean_star_matches())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.strategy.cmp(&b.strategy))
    });
}

/// Meilleur appariement : boules et étoiles étant générées indépendamment,
/// la meilleure stratégie boules peut différer de la meilleure stratégie
/// étoiles. Égalités départagées par nom croissant.
pub fn best_pairing(aggregates: &[StrategyAggregate]) -> Option<(String, String)> {
    let best_by = |key: fn(&StrategyAggregate) -> f64| {
        aggregates.iter().max_by(|a, b| {
            key(a)
                .partial_cmp(&key(b))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.strategy.cmp(&a.strategy))
        })
    };
    let balls = best_by(StrategyAggregate::mean_ball_matches)?;
    let stars = best_by(StrategyAggregate::mean_star_matches)?;
    Some((balls.strategy.clone(), stars.strategy.clone()))
}
