use std::collections::HashMap;

use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use loterie_db::models::{Draw, Pool};

/// Table de transitions d'ordre 1 : pour chaque numéro, les successeurs
/// observés juste après lui dans l'ordre croissant d'un même tirage, avec
/// leur comptage.
#[derive(Debug, Clone, Default)]
pub struct TransitionTable {
    next: HashMap<u8, Vec<(u8, u32)>>,
}

impl TransitionTable {
    pub fn build(draws: &[Draw], pool: Pool) -> Self {
        let mut next: HashMap<u8, Vec<(u8, u32)>> = HashMap::new();

        for draw in draws {
            let mut numbers = draw.numbers(pool).to_vec();
            numbers.sort();
            for pair in numbers.windows(2) {
                let successors = next.entry(pair[0]).or_default();
                match successors.iter_mut().find(|(s, _)| *s == pair[1]) {
                    Some((_, count)) => *count += 1,
                    None => successors.push((pair[1], 1)),
                }
            }
        }

        // Ordre stable des candidats : l'échantillonnage à seed fixée est reproductible
        for successors in next.values_mut() {
            successors.sort();
        }

        Self { next }
    }

    pub fn successors(&self, current: u8) -> &[(u8, u32)] {
        self.next.get(&current).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }

    /// Tire le numéro suivant parmi les successeurs pondérés de `current`,
    /// en excluant `used`. Sans successeur disponible, repli uniforme sur
    /// `fallback_pool` : la couverture des transitions sur un domaine fini
    /// est clairsemée, le repli fait partie du contrat. `None` seulement si
    /// le repli est lui aussi épuisé.
    pub fn sample_next(
        &self,
        current: u8,
        used: &[u8],
        fallback_pool: &[u8],
        rng: &mut StdRng,
    ) -> Option<u8> {
        if let Some(successors) = self.next.get(&current) {
            let candidates: Vec<(u8, u32)> = successors
                .iter()
                .filter(|(s, _)| !used.contains(s))
                .copied()
                .collect();
            if !candidates.is_empty() {
                let weights: Vec<u32> = candidates.iter().map(|(_, c)| *c).collect();
                if let Ok(dist) = WeightedIndex::new(&weights) {
                    return Some(candidates[dist.sample(rng)].0);
                }
            }
        }

        let remaining: Vec<u8> = fallback_pool
            .iter()
            .filter(|s| !used.contains(s))
            .copied()
            .collect();
        remaining.choose(rng).copied()
    }
}
