use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use trading_gym::{
    agent::{random_games, run_episode, RandomPolicy},
    constants::{env, files, logging as log_defaults, training},
    data::{load_csv, split_train_test},
    history::EpisodeHistory,
    logging::{self, LogConfig},
    EnvConfig, PriceBar, TradingEnv,
};

#[derive(Parser)]
#[command(name = "trading_gym")]
#[command(about = "Random action games against a historical market environment", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, default_value = files::LOG_PATH)]
    log_dir: PathBuf,

    /// Ignored when RUST_LOG is set
    #[arg(long, global = true, default_value = log_defaults::LEVEL)]
    log_level: String,

    #[arg(long, global = true, default_value_t = log_defaults::MAX_LOG_FILES)]
    max_log_files: usize,

    /// Only log to file
    #[arg(short, long, global = true, default_value_t = false)]
    quiet: bool,
}

#[derive(Args)]
struct EnvArgs {
    /// CSV with Date, Open, High, Low, Close, Volume columns
    #[arg(short, long)]
    data: PathBuf,

    #[arg(short, long, default_value_t = training::LOOKBACK_WINDOW_SIZE)]
    lookback: usize,

    #[arg(long, default_value_t = env::INITIAL_BALANCE)]
    initial_balance: f64,

    /// Bars held out at the end of the dataset for evaluation
    #[arg(long, default_value_t = training::TEST_BARS)]
    test_bars: usize,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(short, long, default_value_t = false)]
    render: bool,

    #[arg(long, default_value_t = false)]
    charts: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Random games over random windows of the training split
    Train {
        #[command(flatten)]
        env: EnvArgs,

        #[arg(short, long, default_value_t = training::TRAIN_EPISODES)]
        episodes: usize,

        #[arg(short, long, default_value_t = training::TRAINING_BATCH_SIZE)]
        batch_size: usize,
    },
    /// One random game over the whole test split
    Evaluate {
        #[command(flatten)]
        env: EnvArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = logging::init(&LogConfig {
        dir: cli.log_dir.clone(),
        level: cli.log_level.clone(),
        stdout: !cli.quiet,
        max_log_files: cli.max_log_files,
    })?;

    println!("{}", "Start".green());

    match &cli.command {
        Commands::Train {
            env,
            episodes,
            batch_size,
        } => train(env, *episodes, *batch_size)?,
        Commands::Evaluate { env } => evaluate(env)?,
    }

    println!("{}", "End".green());

    Ok(())
}

fn train(args: &EnvArgs, episodes: usize, batch_size: usize) -> anyhow::Result<()> {
    let (train_bars, _) = load_split(args)?;
    let mut env = TradingEnv::new(train_bars, env_config(args))
        .context("building training environment")?;

    let games = random_games(&mut env, episodes, batch_size, policy_seed(args), args.render)?;
    println!("average_net_worth: {}", games.average_net_worth());

    if args.charts {
        let dir = Path::new(files::CHARTS_PATH).join("train");
        for (episode, history) in games.episodes.iter().enumerate() {
            chart_episode(history, &dir.join(episode.to_string()));
        }
        if let Err(err) = games.meta_history.chart(&dir) {
            warn!(%err, "could not draw run charts");
        }
    }

    Ok(())
}

fn evaluate(args: &EnvArgs) -> anyhow::Result<()> {
    let (_, test_bars) = load_split(args)?;
    let mut env =
        TradingEnv::new(test_bars, env_config(args)).context("building test environment")?;

    let mut policy = RandomPolicy::new(policy_seed(args));
    let history = run_episode(&mut env, &mut policy, 0, args.render)?;

    info!(
        steps = history.steps(),
        net_worth = env.net_worth(),
        terminated = history.terminated,
        "evaluation finished"
    );
    println!("net_worth: {}", env.net_worth());

    if args.charts {
        chart_episode(&history, &Path::new(files::CHARTS_PATH).join("evaluate"));
    }

    Ok(())
}

fn load_split(args: &EnvArgs) -> anyhow::Result<(Vec<PriceBar>, Vec<PriceBar>)> {
    let bars = load_csv(&args.data)
        .with_context(|| format!("loading {}", args.data.display()))?;
    let (train_bars, test_bars) = split_train_test(&bars, args.test_bars, args.lookback);

    info!(
        bars = bars.len(),
        train = train_bars.len(),
        test = test_bars.len(),
        "loaded dataset"
    );

    Ok((train_bars, test_bars))
}

fn env_config(args: &EnvArgs) -> EnvConfig {
    EnvConfig {
        initial_balance: args.initial_balance,
        lookback_window_size: args.lookback,
        seed: args.seed,
    }
}

/// Keeps the policy's draws independent of the environment's
fn policy_seed(args: &EnvArgs) -> Option<u64> {
    args.seed.map(|seed| seed.wrapping_add(1))
}

fn chart_episode(history: &EpisodeHistory, dir: &Path) {
    if let Err(err) = history.chart(dir) {
        warn!(%err, dir = %dir.display(), "could not draw episode charts");
    }
}
