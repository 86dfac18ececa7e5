use loterie_db::models::Draw;

use crate::prize::PrizeTable;
use crate::strategies::Combination;

/// Résultat du score d'une grille contre un tirage réel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreResult {
    pub strategy: String,
    pub ball_matches: usize,
    pub star_matches: usize,
    pub tier: String,
    pub points: u32,
}

/// Compte les intersections grille/tirage et consulte la table des rangs.
/// Fonction pure : mêmes entrées, même résultat.
pub fn score(combination: &Combination, draw: &Draw, prizes: &PrizeTable) -> ScoreResult {
    let ball_matches = combination
        .balls
        .iter()
        .filter(|b| draw.balls.contains(b))
        .count();
    let star_matches = combination
        .stars
        .iter()
        .filter(|s| draw.stars.contains(s))
        .count();

    let (tier, points) = prizes.tier(ball_matches, star_matches);

    ScoreResult {
        strategy: combination.strategy.clone(),
        ball_matches,
        star_matches,
        tier: tier.to_string(),
        points,
    }
}
