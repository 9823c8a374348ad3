//! lob-gym - Main binary
//!
//! Runs the Poisson order book on its own, or trains the Q-learning market
//! maker against it.
//!
//! ```text
//! lob-gym simulate --steps 10000 --output output.csv
//! lob-gym train --episodes 1000 --epsilon-start 1.0 --epsilon-end 0.05
//! ```
//!
//! Every setting can come from a JSON file (`--config`), the environment,
//! or the command line, in increasing order of precedence.

mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use simulation::{MetricsHook, Simulation};
use storage::{CsvStateLog, EpisodeJournal};
use tracing::info;

pub use config::GymConfig;

/// Poisson limit order book gym with a tabular Q-learning market maker
#[derive(Parser, Debug)]
#[command(name = "lob-gym")]
#[command(about = "Simulate a Poisson limit order book and train a quoting agent against it")]
#[command(version)]
struct Cli {
    /// JSON config file; CLI flags override its values
    #[arg(long, global = true, env = "LOB_CONFIG")]
    config: Option<PathBuf>,

    /// Number of price levels
    #[arg(long, global = true, env = "LOB_LEVELS")]
    levels: Option<usize>,

    /// Limit-order intensity λ
    #[arg(long, global = true, env = "LOB_LAMBDA")]
    lambda: Option<f64>,

    /// Cancellation intensity θ
    #[arg(long, global = true, env = "LOB_THETA")]
    theta: Option<f64>,

    /// Market-order intensity μ
    #[arg(long, global = true, env = "LOB_MU")]
    mu: Option<f64>,

    /// Seed for the event source (entropy when absent)
    #[arg(long, global = true, env = "LOB_SEED")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run market-only ticks and write the state log
    Simulate {
        /// Ticks to run
        #[arg(long, env = "LOB_STEPS")]
        steps: Option<u64>,

        /// State log path
        #[arg(long, env = "LOB_OUTPUT")]
        output: Option<PathBuf>,
    },
    /// Train the quoting agent
    Train {
        /// Episodes to train
        #[arg(long, env = "LOB_EPISODES")]
        episodes: Option<u64>,

        /// Decision epochs per episode
        #[arg(long, env = "LOB_TIMESTEPS")]
        timesteps: Option<usize>,

        /// Exploration probability of the first episode
        #[arg(long, env = "LOB_EPSILON_START")]
        epsilon_start: Option<f64>,

        /// Exploration probability of the last episode
        #[arg(long, env = "LOB_EPSILON_END")]
        epsilon_end: Option<f64>,

        /// Market-only ticks before each episode
        #[arg(long, env = "LOB_WARMUP")]
        warmup: Option<u64>,

        /// JSON-lines episode journal path
        #[arg(long, env = "LOB_JOURNAL")]
        journal: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => GymConfig::from_json_file(path)?,
        None => GymConfig::default(),
    };
    apply_book_overrides(&mut config, &cli);

    match cli.command {
        Commands::Simulate { steps, output } => {
            if let Some(steps) = steps {
                config.market_ticks = steps;
            }
            if let Some(output) = output {
                config.output = output;
            }
            run_simulate(config)
        }
        Commands::Train {
            episodes,
            timesteps,
            epsilon_start,
            epsilon_end,
            warmup,
            journal,
        } => {
            if let Some(episodes) = episodes {
                config.episodes = episodes;
            }
            if let Some(timesteps) = timesteps {
                config.simulation.learning.timesteps = timesteps;
            }
            if let Some(eps) = epsilon_start {
                config.epsilon_start = eps;
            }
            if let Some(eps) = epsilon_end {
                config.epsilon_end = eps;
            }
            if let Some(warmup) = warmup {
                config.warmup_ticks = warmup;
            }
            if journal.is_some() {
                config.journal = journal;
            }
            run_train(config)
        }
    }
}

fn apply_book_overrides(config: &mut GymConfig, cli: &Cli) {
    let book = &mut config.simulation.book;
    if let Some(levels) = cli.levels {
        book.levels = levels;
    }
    if let Some(lambda) = cli.lambda {
        book.lambda = lambda;
    }
    if let Some(theta) = cli.theta {
        book.theta = theta;
    }
    if let Some(mu) = cli.mu {
        book.mu = mu;
    }
    if cli.seed.is_some() {
        config.simulation.seed = cli.seed;
    }
}

/// Run the book on its own, logging every tick.
fn run_simulate(config: GymConfig) -> anyhow::Result<()> {
    let book = &config.simulation.book;
    info!(
        levels = book.levels,
        lambda = book.lambda,
        theta = book.theta,
        mu = book.mu,
        ticks = config.market_ticks,
        output = %config.output.display(),
        "starting market-only run"
    );

    let mut sim =
        Simulation::new(config.simulation.clone()).context("invalid simulation config")?;
    let metrics = Arc::new(MetricsHook::new());
    let log = Arc::new(CsvStateLog::new(&config.output));
    sim.add_hook(log.clone());
    sim.add_hook(metrics.clone());

    let start = Instant::now();
    sim.run_market_only(config.market_ticks, true);
    let elapsed = start.elapsed();

    let snapshot = metrics.snapshot();
    eprintln!();
    eprintln!("╔═══════════════════════════════════════════════════════════════════════╗");
    eprintln!("║  Market Run Complete                                                  ║");
    eprintln!("╠═══════════════════════════════════════════════════════════════════════╣");
    eprintln!(
        "║  Ticks: {:8}  │  Elapsed: {:6.2}s  │  Rate: {:8.0} ticks/s     ║",
        snapshot.total_ticks,
        elapsed.as_secs_f64(),
        snapshot.total_ticks as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    eprintln!(
        "║  Best bid: {:4}  │  Best ask: {:4}  │  Peak depth: {:10}       ║",
        sim.book().best_bid(),
        sim.book().best_ask(),
        snapshot.peak_depth
    );
    eprintln!(
        "║  Records written: {:8}                                            ║",
        log.records_written()
    );
    eprintln!("╚═══════════════════════════════════════════════════════════════════════╝");
    Ok(())
}

/// Train for `config.episodes` episodes, flushing the book between them.
fn run_train(config: GymConfig) -> anyhow::Result<()> {
    info!(
        episodes = config.episodes,
        timesteps = config.simulation.learning.timesteps,
        epsilon_start = config.epsilon_start,
        epsilon_end = config.epsilon_end,
        "starting training"
    );

    let mut sim =
        Simulation::new(config.simulation.clone()).context("invalid simulation config")?;
    let metrics = Arc::new(MetricsHook::new());
    sim.add_hook(metrics.clone());
    if let Some(path) = &config.journal {
        let journal = EpisodeJournal::create(path)
            .with_context(|| format!("creating journal {}", path.display()))?;
        sim.add_hook(Arc::new(journal));
    }

    let start = Instant::now();
    let total = config.episodes;
    for episode in 0..total {
        if config.warmup_ticks > 0 {
            sim.run_market_only(config.warmup_ticks, false);
        }
        sim.train_episode(config.epsilon_for(episode));
        sim.flush();

        // Progress every 10%
        if episode > 0 && episode % (total / 10).max(1) == 0 {
            let pct = (episode * 100) / total;
            eprintln!(
                "  {}% ({}/{} episodes)  mean profit {:.2}",
                pct,
                episode,
                total,
                metrics.snapshot().mean_profit
            );
        }
    }
    let elapsed = start.elapsed();

    let snapshot = metrics.snapshot();
    let stats = sim.agent().stats();
    eprintln!();
    eprintln!("╔═══════════════════════════════════════════════════════════════════════╗");
    eprintln!("║  Training Complete                                                    ║");
    eprintln!("╠═══════════════════════════════════════════════════════════════════════╣");
    eprintln!(
        "║  Episodes: {:8}  │  Elapsed: {:6.2}s                               ║",
        snapshot.total_episodes,
        elapsed.as_secs_f64()
    );
    eprintln!(
        "║  Mean profit: {:12.2}  │  Mean utility: {:10.4}              ║",
        snapshot.mean_profit, snapshot.mean_utility
    );
    eprintln!(
        "║  Best: {:>10}  │  Worst: {:>10}  │  Unliquidated: {:6}     ║",
        snapshot.best_profit.map_or("-".to_string(), |p| p.to_string()),
        snapshot.worst_profit.map_or("-".to_string(), |p| p.to_string()),
        snapshot.unliquidated_episodes
    );
    eprintln!(
        "║  Updates: {:8} applied  │  {:8} skipped  │  Explore: {:5.1}%    ║",
        stats.updates_applied,
        stats.updates_skipped,
        stats.exploration_rate() * 100.0
    );
    eprintln!(
        "║  Q-table: {:4} × {:4}  │  Learned entries: {:8}                 ║",
        sim.q_table().rows(),
        sim.q_table().cols(),
        sim.q_table().touched()
    );
    eprintln!("╚═══════════════════════════════════════════════════════════════════════╝");
    Ok(())
}
