//! Diamond Edge CLI - Command-line interface for betting value analysis

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use dialoguer::{theme::ColorfulTheme, Input, Select};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use diamond_edge::core::{
    american_to_decimal, american_to_probability, classify_edge, compute_edge, decimal_to_american,
    expected_value, kelly_stake, probability_to_american, probability_to_american_exact,
    probability_to_decimal, KellyCalculator, PropCandidate, RankedProps, ValueRating,
};
use diamond_edge::{
    FileProvider, GameAnalysis, GameDataProvider, GameOdds, SimulationSummary, ValueAnalyzer,
};

const DEFAULT_ODDS_DIR: &str = "data/odds";
const DEFAULT_SIMULATIONS_DIR: &str = "data/simulations";

#[derive(Parser)]
#[command(name = "diamond-edge")]
#[command(author, version, about = "Baseball betting value analysis CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Directory of market odds records (<game_id>.json)
    #[arg(long, default_value = DEFAULT_ODDS_DIR)]
    odds_dir: PathBuf,

    /// Directory of simulation records (<game_id>.json)
    #[arg(long, default_value = DEFAULT_SIMULATIONS_DIR)]
    simulations_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a price between American, decimal and probability forms
    Convert {
        /// American odds (e.g. -150, 130)
        #[arg(long, allow_hyphen_values = true, conflicts_with_all = ["probability", "decimal"])]
        american: Option<i32>,

        /// Win probability in (0, 1)
        #[arg(long, conflicts_with = "decimal")]
        probability: Option<f64>,

        /// Decimal odds (> 1)
        #[arg(long)]
        decimal: Option<f64>,
    },

    /// Score the edge of a model price against a market price
    Edge {
        /// Market American odds
        #[arg(long, allow_hyphen_values = true)]
        market: i32,

        /// Model American odds
        #[arg(long, allow_hyphen_values = true)]
        model: i32,
    },

    /// Size a bet with fractional Kelly
    Kelly {
        /// Model win probability
        #[arg(short, long)]
        probability: f64,

        /// Market American odds
        #[arg(short, long, allow_hyphen_values = true)]
        odds: i32,

        /// Bankroll amount
        #[arg(long, default_value = "1000")]
        bankroll: f64,

        /// Kelly multiplier (0.25 = quarter Kelly)
        #[arg(long, default_value = "0.25")]
        multiplier: f64,
    },

    /// Analyze a game from odds and simulation files
    Analyze {
        /// Market odds JSON file
        #[arg(long)]
        odds: PathBuf,

        /// Simulation summary JSON file
        #[arg(long)]
        simulation: PathBuf,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Analyze a stored game by id
    Game {
        /// Game id (e.g. mlb-2025-03-23-lad-sf)
        id: String,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored games
    Games {
        /// Only games on this date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Rank prop candidates from a JSON file
    Props {
        /// JSON array of prop candidates
        #[arg(short, long)]
        file: PathBuf,

        /// Number of top props to show
        #[arg(long)]
        top: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.interactive {
        return run_interactive();
    }

    let Some(command) = cli.command else {
        println!("Use --help for usage information or --interactive for interactive mode.");
        return Ok(());
    };

    match command {
        Commands::Convert {
            american,
            probability,
            decimal,
        } => run_convert(american, probability, decimal)?,
        Commands::Edge { market, model } => run_edge(market, model)?,
        Commands::Kelly {
            probability,
            odds,
            bankroll,
            multiplier,
        } => run_kelly(probability, odds, bankroll, multiplier)?,
        Commands::Analyze {
            odds,
            simulation,
            json,
        } => {
            let odds: GameOdds = read_json(&odds)?;
            let simulation: SimulationSummary = read_json(&simulation)?;
            run_analysis(&odds, &simulation, json)?;
        }
        Commands::Game { id, json } => {
            let provider = FileProvider::new(&cli.odds_dir, &cli.simulations_dir);
            let odds = provider.market_odds(&id)?;
            let simulation = provider.simulation(&id)?;
            run_analysis(&odds, &simulation, json)?;
        }
        Commands::Games { date } => {
            let provider = FileProvider::new(&cli.odds_dir, &cli.simulations_dir);
            list_games(&provider, date)?;
        }
        Commands::Props { file, top } => {
            let candidates: Vec<PropCandidate> = read_json(&file)?;
            run_props(candidates, top)?;
        }
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("Reading {:?}", path);
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
}

fn run_convert(american: Option<i32>, probability: Option<f64>, decimal: Option<f64>) -> Result<()> {
    let (american, exact) = match (american, probability, decimal) {
        (Some(odds), None, None) => (odds, f64::from(odds)),
        (None, Some(p), None) => (
            probability_to_american(p)?,
            probability_to_american_exact(p)?,
        ),
        (None, None, Some(d)) => {
            let odds = decimal_to_american(d)?;
            (odds, f64::from(odds))
        }
        _ => bail!("Pass exactly one of --american, --probability or --decimal"),
    };

    let probability = american_to_probability(american)?;

    println!("{}", "Price".yellow().bold());
    println!("{}", "-".repeat(32));
    println!("{:<18} {:>12}", "American", format_american(american));
    if (exact - f64::from(american)).abs() > 1e-9 {
        println!("{:<18} {:>12.2}", "American (exact)", exact);
    }
    println!("{:<18} {:>12.3}", "Decimal", american_to_decimal(american)?);
    println!("{:<18} {:>11.2}%", "Implied prob.", probability * 100.0);
    println!("{:<18} {:>12.3}", "Fair decimal", probability_to_decimal(probability)?);

    Ok(())
}

fn run_edge(market: i32, model: i32) -> Result<()> {
    let edge = compute_edge(market, model)?;
    let rating = classify_edge(edge)?;
    let model_probability = american_to_probability(model)?;

    println!(
        "{} market {} vs model {}",
        "Edge:".green(),
        format_american(market),
        format_american(model)
    );
    println!("{}", "-".repeat(32));
    println!("{:<18} {:>12}", "Edge", format_edge(edge));
    println!("{:<18} {:>12}", "Rating", rating_label(rating));
    println!(
        "{:<18} {:>12.4}",
        "Expected value",
        expected_value(model_probability, market)?
    );
    println!(
        "{:<18} {:>11.2}%",
        "Kelly stake",
        kelly_stake(model_probability, market)? * 100.0
    );

    Ok(())
}

fn run_kelly(probability: f64, odds: i32, bankroll: f64, multiplier: f64) -> Result<()> {
    let defaults = KellyCalculator::with_defaults(bankroll);
    let calc = KellyCalculator::new(
        bankroll,
        multiplier,
        defaults.min_stake,
        defaults.max_stake_pct,
        defaults.max_total_exposure,
    );
    let sizing = calc.calculate_single(probability, odds)?;

    println!(
        "{} {:.1}% at {} (bankroll {:.2}, {}x Kelly)",
        "Sizing".green(),
        probability * 100.0,
        format_american(odds),
        bankroll,
        multiplier
    );
    println!("{}", "-".repeat(32));
    println!("{:<18} {:>11.2}%", "Implied prob.", sizing.implied_probability * 100.0);
    println!("{:<18} {:>12}", "Edge", format_edge(sizing.edge));
    println!("{:<18} {:>12.4}", "Expected value", sizing.expected_value);
    println!("{:<18} {:>11.2}%", "Full Kelly", sizing.kelly_fraction * 100.0);
    println!("{:<18} {:>11.2}%", "Recommended", sizing.recommended_fraction * 100.0);

    let stake = format!("{:.2}", sizing.stake);
    if sizing.stake > 0.0 {
        println!("{:<18} {:>12}", "Stake", stake.green().bold());
    } else {
        println!("{:<18} {:>12}", "Stake", stake.dimmed());
    }

    Ok(())
}

fn run_analysis(odds: &GameOdds, simulation: &SimulationSummary, json: bool) -> Result<()> {
    let analysis = ValueAnalyzer::default().analyze(odds, simulation)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_analysis(&analysis);
    }

    Ok(())
}

fn print_analysis(analysis: &GameAnalysis) {
    let matchup = match (&analysis.away_team, &analysis.home_team) {
        (Some(away), Some(home)) => format!("{} @ {}", away, home),
        _ => analysis.game_id.clone(),
    };
    println!("{}: {}", "Analysis".green(), matchup);
    println!();

    println!("{}", "Outcomes:".yellow().bold());
    println!(
        "{:<8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}  {}",
        "Outcome", "Market", "Model", "Mkt %", "Mdl %", "Edge", "EV", "Rating"
    );
    println!("{}", "-".repeat(78));

    for o in &analysis.outcomes {
        let label = match o.outcome {
            diamond_edge::Outcome::Over | diamond_edge::Outcome::Under => {
                format!("{} {}", o.outcome, analysis.total_runs)
            }
            _ => o.outcome.to_string(),
        };
        println!(
            "{:<8} {:>8} {:>8} {:>7.1}% {:>7.1}% {:>8} {:>8.3}  {}",
            label,
            format_american(o.market_odds),
            format_american(o.model_odds),
            o.market_probability * 100.0,
            o.model_probability * 100.0,
            format_edge(o.edge),
            o.expected_value,
            rating_label(o.rating)
        );
    }
    println!();

    match &analysis.best_value {
        Some(best) => println!(
            "{} {} ({}, {})",
            "Best value:".green().bold(),
            best.outcome,
            format_edge(best.edge),
            rating_label(best.rating)
        ),
        None => println!("{}", "No value found.".dimmed()),
    }

    if !analysis.props.is_empty() {
        println!();
        print_props(&analysis.props);
    }
}

fn run_props(candidates: Vec<PropCandidate>, top: Option<usize>) -> Result<()> {
    let ranked = RankedProps::rank(candidates)?;
    let shown = top.map_or(ranked.as_slice(), |n| ranked.top(n));

    print_props(shown);
    println!();

    println!("{}", "By bet type:".yellow().bold());
    for group in ranked.by_bet_type() {
        let players: Vec<&str> = group
            .props
            .iter()
            .map(|p| p.player_name.as_deref().unwrap_or(&p.player_id))
            .collect();
        println!("  {:<14} {}", group.bet_type, players.join(", "));
    }

    Ok(())
}

fn print_props(props: &[PropCandidate]) {
    println!("{}", "Props:".yellow().bold());
    println!(
        "{:>3} {:<20} {:<12} {:>6} {:<6} {:>6}",
        "#", "Player", "Bet", "Line", "Pick", "Conf"
    );
    println!("{}", "-".repeat(58));

    for (i, prop) in props.iter().enumerate() {
        let name = prop.player_name.as_deref().unwrap_or(&prop.player_id);
        let line = prop
            .line
            .map(|l| format!("{:.1}", l))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>3} {:<20} {:<12} {:>6} {:<6} {:>5.1}%",
            i + 1,
            truncate_name(name, 20),
            prop.bet_type,
            line,
            prop.recommendation.to_string(),
            prop.confidence * 100.0
        );
    }
}

fn list_games(provider: &dyn GameDataProvider, date: Option<NaiveDate>) -> Result<()> {
    let games = provider.list_games(date)?;

    if games.is_empty() {
        println!("{}", "No games found.".red());
        return Ok(());
    }

    println!("{} ({} games)", "Games".yellow().bold(), games.len());
    for game in &games {
        println!("  {}", game);
    }

    Ok(())
}

fn run_interactive() -> Result<()> {
    println!("{}", "Interactive mode".green().bold());
    println!();

    let theme = ColorfulTheme::default();

    loop {
        let options = ["Score an edge", "Size a bet", "Convert a price", "Quit"];

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => {
                let market: i32 = Input::with_theme(&theme)
                    .with_prompt("Market American odds")
                    .interact_text()?;
                let model: i32 = Input::with_theme(&theme)
                    .with_prompt("Model American odds")
                    .interact_text()?;

                println!();
                report(run_edge(market, model));
                println!();
            }
            1 => {
                let probability: f64 = Input::with_theme(&theme)
                    .with_prompt("Model probability")
                    .interact_text()?;
                let odds: i32 = Input::with_theme(&theme)
                    .with_prompt("Market American odds")
                    .interact_text()?;
                let bankroll: f64 = Input::with_theme(&theme)
                    .with_prompt("Bankroll")
                    .default(1000.0)
                    .interact_text()?;

                println!();
                report(run_kelly(probability, odds, bankroll, 0.25));
                println!();
            }
            2 => {
                let odds: i32 = Input::with_theme(&theme)
                    .with_prompt("American odds")
                    .interact_text()?;

                println!();
                report(run_convert(Some(odds), None, None));
                println!();
            }
            _ => {
                println!("Goodbye!");
                break;
            }
        }
    }

    Ok(())
}

/// Print a failed interactive step without leaving the loop
fn report(result: Result<()>) {
    if let Err(e) = result {
        println!("{} {:#}", "Error:".red().bold(), e);
    }
}

/// Format American odds with an explicit sign for underdogs
fn format_american(odds: i32) -> String {
    if odds > 0 {
        format!("+{}", odds)
    } else {
        odds.to_string()
    }
}

fn format_edge(edge: f64) -> String {
    format!("{:+.2}%", edge * 100.0)
}

fn rating_label(rating: ValueRating) -> ColoredString {
    match rating {
        ValueRating::StrongValue => rating.as_str().green().bold(),
        ValueRating::Value => rating.as_str().green(),
        ValueRating::Fair => rating.as_str().normal(),
        ValueRating::Below => rating.as_str().yellow(),
        ValueRating::Poor => rating.as_str().red(),
    }
}

/// Truncate name to fit display width
fn truncate_name(name: &str, max_len: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_len {
        name.to_string()
    } else {
        chars[..max_len - 1].iter().collect::<String>() + "…"
    }
}
