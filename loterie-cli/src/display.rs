use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use loterie_db::models::Draw;
use loterie_engine::backtest::StrategyAggregate;
use loterie_engine::freq::FrequencyTable;
use loterie_engine::score::ScoreResult;

use crate::import::ImportResult;

fn join_numbers(numbers: &[u8]) -> String {
    let mut sorted = numbers.to_vec();
    sorted.sort();
    sorted
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Date", "Jour", "Boules", "Étoiles"]);

    for draw in draws {
        table.add_row(vec![
            &draw.date,
            &draw.day,
            &join_numbers(&draw.balls),
            &join_numbers(&draw.stars),
        ]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Lignes rejetées   : {}", result.errors);
    }
}

fn display_freq_table(table_data: &FrequencyTable, hot_count: usize) {
    let hot = table_data.hot(hot_count);
    let cold = table_data.cold(hot_count);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Numéro", "Fréquence", "Tag"]);

    for symbol in table_data.ranked() {
        let (tag, color) = if hot.contains(&symbol) {
            ("HOT", Color::Green)
        } else if cold.contains(&symbol) {
            ("COLD", Color::Red)
        } else {
            ("-", Color::White)
        };
        table.add_row(vec![
            Cell::new(format!("{:2}", symbol)),
            Cell::new(table_data.count(symbol).to_string()),
            Cell::new(tag).fg(color),
        ]);
    }
    println!("{table}");
}

pub fn display_stats(
    ball_freq: &FrequencyTable,
    star_freq: &FrequencyTable,
    window: usize,
    ball_max: u8,
    star_max: u8,
) {
    println!("\nStatistiques sur les {} derniers tirages\n", window);

    println!("── Boules (1-{}) ──", ball_max);
    display_freq_table(ball_freq, 10);

    println!("\n── Étoiles (1-{}) ──", star_max);
    display_freq_table(star_freq, 3);
}

pub fn display_backtest_results(aggregates: &[StrategyAggregate], test_len: usize) {
    println!("\nClassement des stratégies sur {} tirages de test\n", test_len);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Rang",
            "Stratégie",
            "Points",
            "Boules/grille",
            "Étoiles/grille",
            "Taux de gain",
        ]);

    for (i, agg) in aggregates.iter().enumerate() {
        table.add_row(vec![
            Cell::new(format!("{}", i + 1)),
            Cell::new(&agg.strategy),
            Cell::new(agg.total_points.to_string()),
            Cell::new(format!("{:.2}", agg.mean_ball_matches())),
            Cell::new(format!("{:.2}", agg.mean_star_matches())),
            Cell::new(format!("{:.1} %", agg.win_rate() * 100.0)),
        ]);
    }

    println!("{table}");

    if let Some(best) = aggregates.first() {
        println!(
            "\nMeilleure stratégie : {} ({} points, {:.1} % de grilles gagnantes)",
            best.strategy,
            best.total_points,
            best.win_rate() * 100.0
        );
    }
    if let Some((balls, stars)) = loterie_engine::backtest::best_pairing(aggregates) {
        if aggregates.len() > 1 {
            println!("Meilleur appariement : boules {} + étoiles {}", balls, stars);
        }
    }
}

pub fn display_check_result(draw: &Draw, balls: &[u8], stars: &[u8], result: &ScoreResult) {
    println!("\nTirage du {} :", draw.date);
    println!("  Boules  : {}", join_numbers(&draw.balls));
    println!("  Étoiles : {}", join_numbers(&draw.stars));
    println!("\nVotre grille :");
    println!("  Boules  : {}", join_numbers(balls));
    println!("  Étoiles : {}", join_numbers(stars));
    println!(
        "\nCorrespondances : {} boule(s), {} étoile(s) → {} ({} points)",
        result.ball_matches, result.star_matches, result.tier, result.points
    );
}
