use anyhow::{bail, Result};

/// Jeux supportés. Chaque jeu fixe le nombre et la plage des numéros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Game {
    /// 5 boules (1-50) + 2 étoiles (1-12)
    Euromillions,
    /// 5 boules (1-49) + 1 numéro chance (1-10)
    Loto,
}

impl Game {
    pub fn spec(&self) -> GameSpec {
        match self {
            Game::Euromillions => GameSpec {
                name: "euromillions",
                ball_count: 5,
                ball_max: 50,
                star_count: 2,
                star_max: 12,
            },
            Game::Loto => GameSpec {
                name: "loto",
                ball_count: 5,
                ball_max: 49,
                star_count: 1,
                star_max: 10,
            },
        }
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.spec().name)
    }
}

/// Paramètres d'un jeu : tailles de tirage et bornes des domaines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSpec {
    pub name: &'static str,
    pub ball_count: usize,
    pub ball_max: u8,
    pub star_count: usize,
    pub star_max: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    Balls,
    Stars,
}

impl GameSpec {
    /// Taille du domaine (plus grand numéro tirable) pour une pool.
    pub fn size(&self, pool: Pool) -> usize {
        match pool {
            Pool::Balls => self.ball_max as usize,
            Pool::Stars => self.star_max as usize,
        }
    }

    /// Nombre de numéros tirés par grille pour une pool.
    pub fn pick_count(&self, pool: Pool) -> usize {
        match pool {
            Pool::Balls => self.ball_count,
            Pool::Stars => self.star_count,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Draw {
    pub draw_id: String,
    pub day: String,
    /// Date ISO (AAAA-MM-JJ) : l'ordre lexicographique est l'ordre chronologique.
    pub date: String,
    pub balls: Vec<u8>,
    pub stars: Vec<u8>,
}

impl Draw {
    pub fn numbers(&self, pool: Pool) -> &[u8] {
        match pool {
            Pool::Balls => &self.balls,
            Pool::Stars => &self.stars,
        }
    }
}

/// Valide un jeu de numéros pour une pool : effectif exact, plage, unicité.
/// Les tirages sont validés ici, à l'ingestion ; le moteur suppose ensuite
/// des données propres.
pub fn validate_numbers(spec: &GameSpec, pool: Pool, numbers: &[u8]) -> Result<()> {
    let expected = spec.pick_count(pool);
    let max = spec.size(pool) as u8;
    let label = match pool {
        Pool::Balls => "Boule",
        Pool::Stars => "Étoile",
    };

    if numbers.len() != expected {
        bail!(
            "{}s : {} numéros attendus, {} reçus",
            label,
            expected,
            numbers.len()
        );
    }
    for &n in numbers {
        if n < 1 || n > max {
            bail!("{} {} hors limites (1-{})", label, n, max);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("{} en double : {}", label, numbers[i]);
            }
        }
    }
    Ok(())
}

pub fn validate_draw(spec: &GameSpec, balls: &[u8], stars: &[u8]) -> Result<()> {
    validate_numbers(spec, Pool::Balls, balls)?;
    validate_numbers(spec, Pool::Stars, stars)?;
    Ok(())
}
