//! Plan a path for a scenario with the neural replanner
//!
//! Uses the reference sphere world for collision checking and the steering
//! predictor in place of a trained network. The planned path is written as a
//! matrix, one configuration per row.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use neural_replanning::common::{PathPlanner, ProblemDefinition, TimeoutCondition};
use neural_replanning::config::ScenarioConfig;
use neural_replanning::path_planning::neural_replanner::{NeuralReplanner, Normalizer};
use neural_replanning::utils::{load_obstacle_encoding, quick_plot_path, save_path_matrix};
use neural_replanning::ObstacleEncoding;

#[derive(Parser)]
#[command(name = "neural_replan")]
#[command(about = "Learning-guided rigid-body path replanning", long_about = None)]
struct Cli {
    /// Scenario file (TOML); the built-in home scene is used when omitted
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Where to write the planned path
    #[arg(short, long, default_value = "planned_path.txt")]
    output: PathBuf,

    /// Override the scenario's planning time budget [s]
    #[arg(short, long)]
    timeout: Option<f64>,

    /// Save an XY plot of the result to this PNG file
    #[arg(long)]
    plot: Option<String>,

    /// Open an interactive gnuplot window with the result
    #[arg(long)]
    show: bool,

    /// Print the effective scenario as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut scenario = match &cli.scenario {
        Some(path) => ScenarioConfig::load(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => ScenarioConfig::default(),
    };
    if let Some(timeout) = cli.timeout {
        scenario.timeout_secs = timeout;
        scenario.validate()?;
    }
    if cli.print_config {
        print!("{}", toml::to_string(&scenario)?);
        return Ok(());
    }

    let obstacles = match &scenario.obstacle_encoding {
        Some(path) => load_obstacle_encoding(path)
            .with_context(|| format!("loading obstacle encoding {}", path.display()))?,
        None => ObstacleEncoding::empty(),
    };
    info!("Obstacle encoding with {} values", obstacles.len());

    let normalizer = Normalizer::new(scenario.normalization_bounds()?);
    let mut planner = NeuralReplanner::new(
        scenario.sphere_world()?,
        scenario.steering_predictor()?,
        obstacles,
        normalizer,
        scenario.planner.clone(),
    )?;

    let mut pdef = ProblemDefinition::new(scenario.start_configuration(), scenario.goal());
    let termination = TimeoutCondition::from_secs_f64(scenario.timeout_secs);
    let status = planner.solve(&mut pdef, &termination)?;

    let solution = pdef
        .solution()
        .context("planner finished without recording a solution")?;
    let counts = planner.checker().check_counts();
    println!(
        "{} solution: {} states, length {:.3}, {} attempts",
        if status.approximate { "Approximate" } else { "Exact" },
        solution.path.len(),
        solution.path.total_length(),
        solution.attempts
    );
    if let Some(difference) = solution.approximate_difference {
        println!("Remaining distance to goal: {:.3}", difference);
    }
    println!("Collision checks: {} states, {} motions", counts.states, counts.motions);

    save_path_matrix(&cli.output, &solution.path)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    println!("Path saved to: {}", cli.output.display());

    if cli.plot.is_some() || cli.show {
        let mut vis = quick_plot_path(
            &solution.path,
            &scenario.obstacles,
            solution.approximate,
            "Neural replanning",
        );
        let (lower, upper) = (scenario.bounds.lower, scenario.bounds.upper);
        vis.set_x_range(lower[0], upper[0]).set_y_range(lower[1], upper[1]);
        if let Some(png) = &cli.plot {
            vis.save_png(png, 800, 600)?;
            println!("Plot saved to: {}", png);
        }
        if cli.show {
            vis.show()?;
        }
    }

    Ok(())
}
