use anyhow::{bail, Context, Result};
use loterie_db::rusqlite::Connection;
use std::path::Path;

use loterie_db::db::insert_draw;
use loterie_db::models::{validate_draw, Draw, Game};

/// Positions des colonnes dans les CSV officiels (format français,
/// séparateur point-virgule).
struct CsvLayout {
    draw_id: usize,
    day: usize,
    date: usize,
    balls: [usize; 5],
    stars: &'static [usize],
}

fn layout_for(game: Game) -> CsvLayout {
    match game {
        Game::Euromillions => CsvLayout {
            draw_id: 0,
            day: 1,
            date: 2,
            balls: [5, 6, 7, 8, 9],
            stars: &[10, 11],
        },
        Game::Loto => CsvLayout {
            draw_id: 0,
            day: 1,
            date: 2,
            balls: [4, 5, 6, 7, 8],
            stars: &[9],
        },
    }
}

fn parse_record(game: Game, record: &csv::StringRecord) -> Result<Draw> {
    let layout = layout_for(game);

    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let get_u8 = |idx: usize| -> Result<u8> {
        let s = get(idx)?;
        s.parse::<u8>()
            .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))
    };

    let draw_id = get(layout.draw_id)?;
    let day = get(layout.day)?;

    let raw_date = get(layout.date)?;
    let date = parse_date(&raw_date)?;

    let balls: Vec<u8> = layout
        .balls
        .iter()
        .map(|&idx| get_u8(idx))
        .collect::<Result<_>>()?;
    let stars: Vec<u8> = layout
        .stars
        .iter()
        .map(|&idx| get_u8(idx))
        .collect::<Result<_>>()?;

    // Validation à l'ingestion : le moteur suppose des tirages propres
    validate_draw(&game.spec(), &balls, &stars)?;

    Ok(Draw {
        draw_id,
        day,
        date,
        balls,
        stars,
    })
}

fn parse_date(raw: &str) -> Result<String> {
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() != 3 {
        bail!("Format de date invalide: '{}'", raw);
    }
    Ok(format!("{}-{}-{}", parts[2], parts[1], parts[0]))
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

/// Importe un CSV officiel. Les lignes invalides (numéros hors plage,
/// doublons, champs illisibles) sont signalées et sautées : le lot
/// continue, il n'avorte pas.
pub fn import_csv(conn: &Connection, game: Game, path: &Path) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let tx = conn
        .unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record_result in reader.records() {
        result.total_records += 1;
        match record_result {
            Ok(record) => match parse_record(game, &record) {
                Ok(draw) => match insert_draw(&tx, game, &draw) {
                    Ok(true) => result.inserted += 1,
                    Ok(false) => result.skipped += 1,
                    Err(e) => {
                        eprintln!("Erreur insertion tirage {}: {}", result.total_records, e);
                        result.errors += 1;
                    }
                },
                Err(e) => {
                    eprintln!("Erreur parsing ligne {}: {}", result.total_records, e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                eprintln!("Erreur lecture ligne {}: {}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    Ok(result)
}
