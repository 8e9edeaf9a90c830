//! `gorules`: run the go-rules analysis on a board diagram.
//!
//! Boards are read as ASCII layouts (`X` Black, `O` White, `.` empty) from a
//! file or stdin; every command prints JSON on stdout.
//!
//! - `gorules estimate board.txt` - Monte-Carlo ownership probabilities
//! - `gorules dead board.txt --scoring` - dead stone classification
//! - `gorules score board.txt --komi 6.5` - score after removing dead stones
//! - `gorules handicap 19 4` - standard handicap points

use std::collections::HashSet;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use go_rules::coord::to_gtp;
use go_rules::estimate::{classify_dead_stones, estimate_ownership};
use go_rules::handicap::{max_handicap, standard_points};
use go_rules::ownership::render_map;
use go_rules::score::{format_result, score_with_dead};
use go_rules::sign::sign_of;
use go_rules::{Board, EstimatorConfig, Position, Score, Vertex};

/// Ownership estimation, dead stones and scoring for Go positions
#[derive(Parser)]
#[command(name = "gorules")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probability that each vertex ends up Black's
    Estimate {
        #[command(flatten)]
        input: Input,
        #[command(flatten)]
        estimator: EstimatorArgs,
        /// Also print an ownership diagram on stderr
        #[arg(long)]
        render: bool,
    },
    /// Stones judged dead
    Dead {
        #[command(flatten)]
        input: Input,
        #[command(flatten)]
        estimator: EstimatorArgs,
    },
    /// Score the position after removing the dead stones
    Score {
        #[command(flatten)]
        input: Input,
        #[command(flatten)]
        estimator: EstimatorArgs,
        #[arg(long, default_value_t = 6.5)]
        komi: f64,
        /// Handicap stones given, counted for White under area scoring
        #[arg(long, default_value_t = 0)]
        handicap: u32,
    },
    /// Standard handicap points for a square board
    Handicap { size: u8, count: usize },
}

#[derive(Args)]
struct Input {
    /// Layout file; stdin when absent or `-`
    file: Option<PathBuf>,
}

#[derive(Args)]
struct EstimatorArgs {
    /// Number of random playouts
    #[arg(long, default_value_t = 100)]
    iterations: usize,
    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Add structurally dead stones to the classification
    #[arg(long)]
    scoring: bool,
    /// Alternations per playout (default: board area)
    #[arg(long)]
    playout_iterations: Option<usize>,
}

impl From<&EstimatorArgs> for EstimatorConfig {
    fn from(args: &EstimatorArgs) -> Self {
        EstimatorConfig {
            iterations: args.iterations,
            scoring_mode: args.scoring,
            seed: args.seed,
            playout_iterations: args.playout_iterations,
        }
    }
}

impl Input {
    fn position(&self) -> Result<Position> {
        let text = match &self.file {
            Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?,
            _ => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("reading stdin")?;
                text
            }
        };
        let position = Position::from_layout(&text).context("parsing board layout")?;
        tracing::info!(
            width = position.width(),
            height = position.height(),
            stones = position.stone_count(),
            "loaded position"
        );
        Ok(position)
    }
}

#[derive(Serialize)]
struct Points {
    points: Vec<[u8; 2]>,
    gtp: Vec<String>,
}

impl Points {
    fn new(vertices: Vec<Vertex>, height: u8) -> Self {
        Self {
            points: vertices.iter().map(|&(x, y)| [x, y]).collect(),
            gtp: vertices.iter().map(|&v| to_gtp(v, height)).collect(),
        }
    }
}

#[derive(Serialize)]
struct ScoreReport {
    dead: Points,
    #[serde(flatten)]
    score: Score,
    area_result: String,
    territory_result: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "go_rules=info,gorules=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Estimate {
            input,
            estimator,
            render,
        } => {
            let position = input.position()?;
            let map = estimate_ownership(&position, &(&estimator).into());
            if render {
                let owners: Vec<i8> = position
                    .vertices()
                    .map(|v| sign_of(map.owner(v)))
                    .collect();
                eprintln!("{}", render_map(&position, &owners));
            }
            print_json(&map)
        }
        Commands::Dead { input, estimator } => {
            let position = input.position()?;
            let dead = classify_dead_stones(&position, &(&estimator).into());
            print_json(&Points::new(sorted(dead), position.height()))
        }
        Commands::Score {
            input,
            estimator,
            komi,
            handicap,
        } => {
            let position = input.position()?;
            let dead = classify_dead_stones(&position, &(&estimator).into());
            let (_, score) = score_with_dead(&position, &dead);
            let report = ScoreReport {
                dead: Points::new(sorted(dead), position.height()),
                score,
                area_result: format_result(score.area_result(komi, handicap)),
                territory_result: format_result(score.territory_result(komi)),
            };
            tracing::info!(result = %report.area_result, "scored position");
            print_json(&report)
        }
        Commands::Handicap { size, count } => {
            let max = max_handicap(size);
            if count > max {
                bail!("a {size}x{size} board has at most {max} handicap points");
            }
            print_json(&Points::new(standard_points(size, count), size))
        }
    }
}

fn sorted(vertices: HashSet<Vertex>) -> Vec<Vertex> {
    let mut vertices: Vec<Vertex> = vertices.into_iter().collect();
    vertices.sort_unstable();
    vertices
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{json}");
    Ok(())
}
