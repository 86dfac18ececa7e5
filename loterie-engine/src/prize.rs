use std::collections::HashMap;

/// Libellé renvoyé pour toute paire de correspondances absente de la table.
pub const NO_PRIZE: &str = "Aucun gain";

/// Rang de gain : (boules trouvées, étoiles trouvées) → libellé + points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierEntry {
    pub ball_matches: usize,
    pub star_matches: usize,
    pub label: String,
    pub points: u32,
}

impl TierEntry {
    pub fn new(ball_matches: usize, star_matches: usize, label: &str, points: u32) -> Self {
        Self {
            ball_matches,
            star_matches,
            label: label.to_string(),
            points,
        }
    }
}

/// Table des rangs de gain d'un jeu. C'est une donnée fournie par
/// l'appelant, pas une logique du moteur : les barèmes de points varient
/// d'un jeu (et d'un usage) à l'autre. La table est totale : toute paire
/// non listée vaut `NO_PRIZE` / 0 point.
#[derive(Debug, Clone)]
pub struct PrizeTable {
    entries: HashMap<(usize, usize), (String, u32)>,
}

impl PrizeTable {
    pub fn new(entries: Vec<TierEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| ((e.ball_matches, e.star_matches), (e.label, e.points)))
            .collect();
        Self { entries }
    }

    pub fn tier(&self, ball_matches: usize, star_matches: usize) -> (&str, u32) {
        match self.entries.get(&(ball_matches, star_matches)) {
            Some((label, points)) => (label.as_str(), *points),
            None => (NO_PRIZE, 0),
        }
    }

    /// Barème EuroMillions (13 rangs, 5 boules + 2 étoiles).
    pub fn euromillions() -> Self {
        Self::new(vec![
            TierEntry::new(5, 2, "Jackpot", 100),
            TierEntry::new(5, 1, "Rang 2", 50),
            TierEntry::new(5, 0, "Rang 3", 30),
            TierEntry::new(4, 2, "Rang 4", 20),
            TierEntry::new(4, 1, "Rang 5", 15),
            TierEntry::new(3, 2, "Rang 6", 12),
            TierEntry::new(4, 0, "Rang 7", 10),
            TierEntry::new(2, 2, "Rang 8", 8),
            TierEntry::new(3, 1, "Rang 9", 6),
            TierEntry::new(3, 0, "Rang 10", 4),
            TierEntry::new(1, 2, "Rang 11", 3),
            TierEntry::new(2, 1, "Rang 12", 2),
            TierEntry::new(2, 0, "Rang 13", 1),
        ])
    }

    /// Barème Loto (5 boules + 1 numéro chance).
    pub fn loto() -> Self {
        Self::new(vec![
            TierEntry::new(5, 1, "Jackpot", 100),
            TierEntry::new(5, 0, "Rang 2", 50),
            TierEntry::new(4, 1, "Rang 3", 20),
            TierEntry::new(4, 0, "Rang 4", 10),
            TierEntry::new(3, 1, "Rang 5", 8),
            TierEntry::new(3, 0, "Rang 6", 5),
            TierEntry::new(2, 1, "Rang 7", 3),
            TierEntry::new(2, 0, "Rang 8", 1),
            TierEntry::new(1, 1, "Rang 9", 1),
            TierEntry::new(0, 1, "Rang 9", 1),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jackpot_and_default() {
        let table = PrizeTable::euromillions();
        assert_eq!(table.tier(5, 2), ("Jackpot", 100));
        assert_eq!(table.tier(0, 0), (NO_PRIZE, 0));
        assert_eq!(table.tier(1, 0), (NO_PRIZE, 0));
    }

    #[test]
    fn test_table_total_euromillions() {
        // Toute paire de [0,5]×[0,2] a un rang défini, sans panique
        let table = PrizeTable::euromillions();
        for balls in 0..=5 {
            for stars in 0..=2 {
                let (label, _points) = table.tier(balls, stars);
                assert!(!label.is_empty());
            }
        }
    }

    #[test]
    fn test_table_total_loto() {
        let table = PrizeTable::loto();
        for balls in 0..=5 {
            for stars in 0..=1 {
                let (label, _points) = table.tier(balls, stars);
                assert!(!label.is_empty());
            }
        }
        assert_eq!(table.tier(5, 1), ("Jackpot", 100));
        assert_eq!(table.tier(0, 1).1, 1);
    }

    #[test]
    fn test_caller_supplied_table() {
        // Le barème est une donnée : l'appelant peut fournir le sien
        let table = PrizeTable::new(vec![
            TierEntry::new(5, 2, "JACKPOT", 1000),
            TierEntry::new(0, 0, "RIEN", 0),
        ]);
        assert_eq!(table.tier(5, 2), ("JACKPOT", 1000));
        assert_eq!(table.tier(0, 0), ("RIEN", 0));
        assert_eq!(table.tier(3, 1), (NO_PRIZE, 0));
    }
}
