//! Piano Slots batch simulator
//!
//! Usage:
//!   ps-sim                          - 10,000 spins, default config
//!   ps-sim -n 100000 --seed 42      - reproducible run
//!   ps-sim --model row-echo --json  - alternate bias scheme, JSON report
//!   ps-sim --config game.yaml       - load a JSON/YAML game config

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use ps_core::{
    GameConfig, LogObserver, OutcomeModel, RevealTiming, SessionStats, SlotMachine, SpinResponse,
};

#[derive(Parser)]
#[command(name = "ps-sim", about = "Piano Slots batch spin simulator")]
struct Cli {
    /// Number of spins to play
    #[arg(short = 'n', long, default_value_t = 10_000)]
    spins: u64,

    /// RNG seed (OS entropy when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Stake per spin; must be an allowed bet level
    #[arg(short, long)]
    bet: Option<u64>,

    /// Starting balance
    #[arg(long)]
    balance: Option<u64>,

    /// Outcome model (overrides config)
    #[arg(short, long, value_enum)]
    model: Option<ModelArg>,

    /// Reveal timing preset (overrides config)
    #[arg(short, long, value_enum)]
    timing: Option<TimingArg>,

    /// Game config file (.json, .yaml, .yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log every stage event at debug level
    #[arg(long)]
    stages: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModelArg {
    BiasedPayline,
    RowEcho,
}

impl From<ModelArg> for OutcomeModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::BiasedPayline => OutcomeModel::BiasedPayline,
            ModelArg::RowEcho => OutcomeModel::RowEcho,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TimingArg {
    Continuous,
    Ticks,
    Instant,
}

impl From<TimingArg> for RevealTiming {
    fn from(arg: TimingArg) -> Self {
        match arg {
            TimingArg::Continuous => RevealTiming::continuous(),
            TimingArg::Ticks => RevealTiming::ticks(),
            TimingArg::Instant => RevealTiming::instant(),
        }
    }
}

#[derive(Serialize)]
struct Report {
    seed: Option<u64>,
    spins_requested: u64,
    /// Set when the balance could no longer cover the stake
    stopped_early: bool,
    starting_balance: u64,
    final_balance: u64,
    hit_rate: f64,
    rtp: f64,
    stats: SessionStats,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GameConfig {
            // Headless runs skip the reveal animation unless asked otherwise
            timing: RevealTiming::instant(),
            ..GameConfig::default()
        },
    };
    if let Some(model) = cli.model {
        config.outcome_model = model.into();
    }
    if let Some(timing) = cli.timing {
        config.timing = timing.into();
    }
    if let Some(balance) = cli.balance {
        config.starting_balance = balance;
    }
    if let Some(bet) = cli.bet {
        if !config.bet.contains(bet) {
            bail!(
                "bet {} is not an allowed level ({}..={} step {})",
                bet,
                config.bet.min,
                config.bet.max,
                config.bet.step
            );
        }
        config.bet.initial = bet;
    }

    let starting_balance = config.starting_balance;
    let mut machine = match cli.seed {
        Some(seed) => SlotMachine::seeded(config, seed),
        None => SlotMachine::new(config),
    }
    .context("Invalid game config")?;
    if cli.stages {
        machine.add_observer(LogObserver);
    }

    log::info!("Simulating {} spins...", cli.spins);
    let mut stopped_early = false;
    for played in 0..cli.spins {
        match machine.spin() {
            SpinResponse::Accepted { .. } => {
                machine.finish_spin();
            }
            SpinResponse::Rejected(rejection) => {
                log::warn!("Stopped after {} spins: {}", played, rejection.reason());
                stopped_early = true;
                break;
            }
        }
    }

    let stats = machine.stats().clone();
    let report = Report {
        seed: cli.seed,
        spins_requested: cli.spins,
        stopped_early,
        starting_balance,
        final_balance: machine.state().balance,
        hit_rate: stats.hit_rate(),
        rtp: stats.rtp(),
        stats,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &Report) {
    let stats = &report.stats;
    println!("Piano Slots simulation");
    println!("──────────────────────────────");
    if let Some(seed) = report.seed {
        println!("Seed:            {}", seed);
    }
    println!("Spins played:    {} / {}", stats.total_spins, report.spins_requested);
    println!("Wins / losses:   {} / {}", stats.wins, stats.losses);
    println!("Accidental wins: {}", stats.accidental_wins);
    println!("Hit rate:        {:.2}%", report.hit_rate);
    println!("RTP:             {:.2}%", report.rtp);
    println!("Wagered / paid:  {} / {}", stats.total_bet, stats.total_win);
    println!(
        "Balance:         {} -> {}",
        report.starting_balance, report.final_balance
    );
    if report.stopped_early {
        println!("(stopped early: balance below stake)");
    }
}
