use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gravity_cube::ai::{Difficulty, MinimaxAgent};
use gravity_cube::arena::{match_seed, play_match, MatchMetrics};
use gravity_cube::config::{AppConfig, GameMode};
use gravity_cube::game::{GameOutcome, Player};

/// Play Gravity Cube games between computer opponents.
#[derive(Parser)]
#[command(name = "gravity-cube", about = "Run headless Gravity Cube matches between AI opponents")]
struct Cli {
    /// Rule preset; replaces the mode from the config file
    #[arg(long, value_enum)]
    mode: Option<GameMode>,

    /// Path to TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Difficulty for Red, who moves first
    #[arg(long, value_enum)]
    one: Option<Difficulty>,

    /// Difficulty for Blue
    #[arg(long, value_enum)]
    two: Option<Difficulty>,

    /// Override number of games
    #[arg(long)]
    games: Option<usize>,

    /// Base seed for reproducible series
    #[arg(long)]
    seed: Option<u64>,

    /// Per-move thinking budget in milliseconds
    #[arg(long)]
    think_ms: Option<u64>,

    /// Print one JSON record per game plus a JSON summary
    #[arg(long)]
    json: bool,

    /// Log at debug level, overriding RUST_LOG
    #[arg(short, long)]
    verbose: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.print_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let mut app_config = match &cli.config {
        Some(path) => AppConfig::load_or_default(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::default(),
    };

    // Apply CLI overrides
    if let Some(mode) = cli.mode {
        app_config.mode = mode;
        app_config.custom = None;
    }
    if let Some(games) = cli.games {
        app_config.arena.games = games;
    }
    if let Some(seed) = cli.seed {
        app_config.arena.seed = Some(seed);
    }
    if let Some(ms) = cli.think_ms {
        app_config.ai.think_budget_ms = ms;
    }
    app_config.validate().context("invalid settings")?;

    let rules = app_config.game_config();
    let budget = Duration::from_millis(app_config.ai.think_budget_ms);
    let one = cli.one.unwrap_or(app_config.ai.difficulty);
    let two = cli.two.unwrap_or(app_config.ai.difficulty);
    let base_seed = app_config.arena.seed.unwrap_or_else(rand::random);
    info!(
        mode = app_config.mode.name(),
        ?one,
        ?two,
        games = app_config.arena.games,
        base_seed,
        "starting series"
    );

    let mut metrics = MatchMetrics::with_capacity(app_config.arena.games);
    for game in 0..app_config.arena.games {
        let seed = match_seed(base_seed, game);
        let mut red = MinimaxAgent::new(one).with_seed(seed).with_budget(budget);
        let mut blue = MinimaxAgent::new(two)
            .with_seed(seed.rotate_left(32))
            .with_budget(budget);

        let record = play_match(rules, &mut red, &mut blue, app_config.arena.max_moves)
            .with_context(|| format!("playing game {}", game + 1))?;
        metrics.record_match(record.result());

        if cli.json {
            println!("{}", serde_json::to_string(&record)?);
        } else {
            let result = match record.outcome {
                GameOutcome::Winner(p) => format!("{} wins", p.name()),
                GameOutcome::Draw => "draw".to_string(),
            };
            println!(
                "game {:>3}: {result} after {} moves ({} line(s))",
                game + 1,
                record.moves.len(),
                record.lines
            );
        }
    }

    let summary = metrics.summary();
    if cli.json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!(
            "{} games | {} ({}) {:.0}% | {} ({}) {:.0}% | draws {:.0}% | avg length {:.1}",
            summary.matches,
            Player::One.name(),
            one.name(),
            summary.one_win_rate * 100.0,
            Player::Two.name(),
            two.name(),
            summary.two_win_rate * 100.0,
            summary.draw_rate * 100.0,
            summary.average_length
        );
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
