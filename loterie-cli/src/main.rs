mod display;
mod import;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use loterie_db::db::{count_draws, db_path, fetch_last_draws, insert_draw, migrate, open_db};
use loterie_db::models::{validate_draw, validate_numbers, Draw, Game, Pool};
use loterie_engine::backtest::{backtest_strategy, rank_aggregates, split_draws};
use loterie_engine::freq::frequencies;
use loterie_engine::prize::PrizeTable;
use loterie_engine::score::score;
use loterie_engine::strategies::{all_strategies, Combination, StrategyParams, TrainingStats};

use crate::display::{
    display_backtest_results, display_check_result, display_draws, display_import_summary,
    display_stats,
};

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum GameArg {
    #[default]
    Euromillions,
    Loto,
}

impl From<GameArg> for Game {
    fn from(arg: GameArg) -> Self {
        match arg {
            GameArg::Euromillions => Game::Euromillions,
            GameArg::Loto => Game::Loto,
        }
    }
}

fn default_prizes(game: Game) -> PrizeTable {
    match game {
        Game::Euromillions => PrizeTable::euromillions(),
        Game::Loto => PrizeTable::loto(),
    }
}

/// Seed déterministe basé sur la date du jour (AAAAMMJJ).
fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

#[derive(Parser)]
#[command(name = "loterie", about = "Backtest de stratégies de loterie")]
struct Cli {
    /// Jeu ciblé
    #[arg(short, long, value_enum, default_value = "euromillions")]
    game: GameArg,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer les tirages depuis un fichier CSV officiel
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    History {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Afficher les statistiques de fréquence
    Stats {
        /// Fenêtre d'analyse (nombre de tirages)
        #[arg(short, long, default_value = "100")]
        window: u32,
    },

    /// Backtester les stratégies contre l'historique
    Backtest {
        /// Date de coupure entraînement/test (AAAA-MM-JJ)
        #[arg(short, long)]
        cutoff: String,

        /// Stratégies à évaluer (séparées par des virgules ; défaut : toutes)
        #[arg(short, long)]
        strategies: Option<String>,

        /// Seed pour la reproductibilité (défaut : date du jour AAAAMMJJ)
        #[arg(long)]
        seed: Option<u64>,

        /// Taille de la liste chaude (stratégies fréquence et markov)
        #[arg(long, default_value = "20")]
        top_k: usize,

        /// Fenêtre des fréquences récentes (stratégie tendance)
        #[arg(long, default_value = "25")]
        window: usize,

        /// Fichier de sortie JSON pour les cumuls
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Comparer une grille avec le dernier tirage
    Check {
        /// Boules puis étoiles (EuroMillions : 5+2, Loto : 5+1)
        numbers: Vec<u8>,
    },

    /// Ajouter un tirage manuellement
    Add,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let game: Game = cli.game.into();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, game, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::History { last } => cmd_history(&conn, game, last),
        Command::Stats { window } => cmd_stats(&conn, game, window),
        Command::Backtest {
            cutoff,
            strategies,
            seed,
            top_k,
            window,
            output,
        } => cmd_backtest(&conn, game, &cutoff, strategies, seed, top_k, window, output),
        Command::Check { numbers } => cmd_check(&conn, game, &numbers),
        Command::Add => cmd_add(&conn, game),
    }
}

fn cmd_import(conn: &loterie_db::rusqlite::Connection, game: Game, file: &PathBuf) -> Result<()> {
    let result = import::import_csv(conn, game, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_history(conn: &loterie_db::rusqlite::Connection, game: Game, last: u32) -> Result<()> {
    let n = count_draws(conn, game)?;
    if n == 0 {
        println!("Base vide pour {}. Lancez d'abord : loterie import", game);
        return Ok(());
    }
    let draws = fetch_last_draws(conn, game, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &loterie_db::rusqlite::Connection, game: Game, window: u32) -> Result<()> {
    let n = count_draws(conn, game)?;
    if n == 0 {
        println!("Base vide pour {}. Lancez d'abord : loterie import", game);
        return Ok(());
    }
    let effective_window = window.min(n);
    let draws = fetch_last_draws(conn, game, effective_window)?;
    let spec = game.spec();

    let ball_freq = frequencies(&draws, Pool::Balls, &spec)?;
    let star_freq = frequencies(&draws, Pool::Stars, &spec)?;

    display_stats(
        &ball_freq,
        &star_freq,
        draws.len(),
        spec.ball_max,
        spec.star_max,
    );
    Ok(())
}

fn cmd_backtest(
    conn: &loterie_db::rusqlite::Connection,
    game: Game,
    cutoff: &str,
    strategies_arg: Option<String>,
    seed: Option<u64>,
    top_k: usize,
    ts_window: usize,
    output: Option<PathBuf>,
) -> Result<()> {
    let n = count_draws(conn, game)?;
    if n == 0 {
        bail!("Base vide pour {}. Lancez d'abord : loterie import", game);
    }

    chrono::NaiveDate::parse_from_str(cutoff, "%Y-%m-%d")
        .with_context(|| format!("Date de coupure invalide : '{}' (attendu AAAA-MM-JJ)", cutoff))?;

    let spec = game.spec();
    let params = StrategyParams { top_k };
    let strategies = all_strategies(&params);

    let selected_names: Vec<String> = match strategies_arg {
        Some(list) => {
            let names: Vec<String> = list.split(',').map(|s| s.trim().to_string()).collect();
            for name in &names {
                if !strategies.iter().any(|s| s.name() == name) {
                    bail!(
                        "Stratégie inconnue : '{}'. Disponibles : {}",
                        name,
                        strategies.iter().map(|s| s.name()).collect::<Vec<_>>().join(", ")
                    );
                }
            }
            names
        }
        None => Vec::new(),
    };

    let effective_seed = seed.unwrap_or_else(|| {
        let ds = date_seed();
        println!("(Seed du jour : {ds})");
        ds
    });

    let draws = fetch_last_draws(conn, game, n)?;
    let (train, test) = split_draws(&draws, cutoff)?;
    println!(
        "Backtest {} : {} tirages d'entraînement, {} tirages de test",
        game,
        train.len(),
        test.len()
    );

    let stats = TrainingStats::build(&spec, &train, ts_window)?;
    let prizes = default_prizes(game);

    let to_run: Vec<_> = strategies
        .iter()
        .filter(|s| selected_names.is_empty() || selected_names.iter().any(|n| n == s.name()))
        .collect();

    let pb = ProgressBar::new(to_run.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=> "),
    );

    let mut aggregates = Vec::new();
    for strategy in to_run {
        pb.set_message(strategy.name().to_string());
        aggregates.push(backtest_strategy(
            strategy.as_ref(),
            &stats,
            &test,
            &prizes,
            effective_seed,
        )?);
        pb.inc(1);
    }
    pb.finish_with_message("Backtest terminé");

    rank_aggregates(&mut aggregates);
    display_backtest_results(&aggregates, test.len());

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&aggregates)?;
        std::fs::write(&output_path, json)
            .with_context(|| format!("Impossible d'écrire {:?}", output_path))?;
        println!("\nCumuls sauvegardés dans : {}", output_path.display());
    }

    Ok(())
}

fn cmd_check(conn: &loterie_db::rusqlite::Connection, game: Game, numbers: &[u8]) -> Result<()> {
    let spec = game.spec();
    let expected = spec.ball_count + spec.star_count;
    if numbers.len() != expected {
        bail!(
            "Attendu {} nombres : {} boules + {} étoile(s). Reçu : {}",
            expected,
            spec.ball_count,
            spec.star_count,
            numbers.len()
        );
    }

    let balls: Vec<u8> = numbers[..spec.ball_count].to_vec();
    let stars: Vec<u8> = numbers[spec.ball_count..].to_vec();
    validate_draw(&spec, &balls, &stars)?;

    let n = count_draws(conn, game)?;
    if n == 0 {
        bail!("Base vide pour {}. Lancez d'abord : loterie import", game);
    }

    let draws = fetch_last_draws(conn, game, 1)?;
    let latest = &draws[0];

    let combination = Combination {
        strategy: "grille jouée".to_string(),
        balls: balls.clone(),
        stars: stars.clone(),
    };
    let result = score(&combination, latest, &default_prizes(game));

    display_check_result(latest, &balls, &stars, &result);
    Ok(())
}

fn cmd_add(conn: &loterie_db::rusqlite::Connection, game: Game) -> Result<()> {
    let spec = game.spec();
    println!("Ajout d'un tirage {} manuellement\n", game);

    let draw_id = prompt("Identifiant du tirage (ex: 26014) : ")?;
    let day = prompt("Jour (ex: MARDI) : ")?;
    let raw_date = prompt("Date (JJ/MM/AAAA) : ")?;

    let date_parts: Vec<&str> = raw_date.split('/').collect();
    if date_parts.len() != 3 {
        bail!("Format de date invalide");
    }
    let date = format!("{}-{}-{}", date_parts[2], date_parts[1], date_parts[0]);

    let balls = prompt_pool(&spec, Pool::Balls, "boules")?;
    let stars = prompt_pool(&spec, Pool::Stars, "étoiles")?;

    validate_draw(&spec, &balls, &stars)?;

    let draw = Draw {
        draw_id,
        day,
        date,
        balls,
        stars,
    };

    println!("\nTirage à insérer :");
    display_draws(&[draw.clone()]);

    let confirm = prompt("\nConfirmer l'insertion ? (o/n) : ")?;
    if confirm.trim().to_lowercase() == "o" {
        let inserted = insert_draw(conn, game, &draw)?;
        if inserted {
            println!("Tirage inséré avec succès.");
        } else {
            println!("Ce tirage existe déjà (doublon ignoré).");
        }
    } else {
        println!("Insertion annulée.");
    }

    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    Ok(input.trim().to_string())
}

fn prompt_pool(
    spec: &loterie_db::models::GameSpec,
    pool: Pool,
    label: &str,
) -> Result<Vec<u8>> {
    let count = spec.pick_count(pool);
    let max = spec.size(pool);
    loop {
        let input = prompt(&format!(
            "{} {} (séparées par des espaces, 1-{}) : ",
            count, label, max
        ))?;
        let nums: Result<Vec<u8>, _> = input.split_whitespace().map(|s| s.parse::<u8>()).collect();
        match nums {
            Ok(v) if v.len() == count => {
                if validate_numbers(spec, pool, &v).is_ok() {
                    return Ok(v);
                }
                println!("Numéros invalides (1-{}, pas de doublons). Réessayez.", max);
            }
            _ => println!("Entrez exactement {} numéros. Réessayez.", count),
        }
    }
}
