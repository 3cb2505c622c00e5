//! wumpus CLI: run the logical agent against random worlds.

use std::path::PathBuf;

use clap::Parser;
use miette::{IntoDiagnostic, Result};

use wumpus::config::RunConfig;
use wumpus::hero::Hero;
use wumpus::world::{World, run_episode};

#[derive(Parser)]
#[command(name = "wumpus", version, about = "Logical agent for the Wumpus world")]
struct Cli {
    /// TOML run configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side of the square world.
    #[arg(long)]
    size: Option<i32>,

    /// Probability of a pit in each cell.
    #[arg(long)]
    pits: Option<f64>,

    /// Seed for world generation.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of episodes to play.
    #[arg(long)]
    episodes: Option<usize>,

    /// Action limit per episode.
    #[arg(long)]
    max_steps: Option<usize>,

    /// Tell the agent the grid size instead of letting it bump into walls.
    #[arg(long)]
    known_size: bool,

    /// Draw the world after every action.
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if let Some(size) = cli.size {
        config.world.width = size;
        config.world.height = size;
    }
    if let Some(p) = cli.pits {
        config.world.pit_probability = p;
    }
    if cli.seed.is_some() {
        config.world.seed = cli.seed;
    }
    if let Some(n) = cli.episodes {
        config.episodes = n;
    }
    if let Some(n) = cli.max_steps {
        config.max_steps = n;
    }
    if cli.known_size {
        config.agent.grid_size = Some((config.world.width, config.world.height));
    }

    let mut world = World::new(&config.world)?;
    let mut hero = Hero::new(config.agent.clone());

    let mut wins = 0;
    let mut deaths = 0;
    let mut escapes = 0;
    let mut total_score = 0i64;
    let mut total_steps = 0usize;

    for episode in 0..config.episodes {
        if episode > 0 {
            world.reset();
        }
        if cli.verbose {
            println!("=== episode {} ===\n{world}", episode + 1);
        }
        let report = run_episode(&mut hero, &mut world, config.max_steps, |action, world| {
            if cli.verbose {
                println!("{action}\n{world}");
            }
        })?;

        if report.won() {
            wins += 1;
        } else if report.exited {
            escapes += 1;
        }
        if let Some(death) = report.death {
            deaths += 1;
            tracing::warn!(episode = episode + 1, ?death, "hero died");
        }
        total_score += report.score;
        total_steps += report.steps;
    }

    let n = config.episodes.max(1) as f64;
    println!("Episodes: {}", config.episodes);
    println!("Wins: {wins} ({:.1}%)", wins as f64 / n * 100.0);
    println!("Deaths: {deaths} ({:.1}%)", deaths as f64 / n * 100.0);
    println!("Escapes (no gold): {escapes}");
    println!("Average score: {:.1}", total_score as f64 / n);
    println!("Average steps: {:.1}", total_steps as f64 / n);

    std::io::Write::flush(&mut std::io::stdout()).into_diagnostic()?;
    Ok(())
}
