//! Lorenz Sensitivity: Divergence of Two Nearby Initial Conditions
//!
//! Integrates the Lorenz system from two initial states 1.1 apart and shows
//! how quickly they decorrelate.
//!
//! ## Protocol
//!
//! 1. Integrate (0, 1, 1) and (0, 2.1, 1) on 2001 points over [0, 40]
//! 2. Tabulate the separation d(t) = ‖a(t) − b(t)‖
//! 3. Fit ln d(t) over the first quarter of the run
//! 4. Report the first time d(t) exceeds the predictability threshold
//! 5. Animate both trajectories with a 100-point trailing window

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use lorenz_dynamics::{
    compare, estimate_exponential_rate, AsciiRenderer, FrameRenderer, Integrator, RenderContext,
    SimulationConfig, State, TrajectorySet, WindowedPlaybackBuffer,
};

#[derive(Parser, Debug)]
#[command(
    name = "lorenz_sensitivity",
    version,
    about = "Compare two nearby Lorenz trajectories"
)]
struct Cli {
    /// JSON run configuration; missing fields take their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// End of the time span.
    #[arg(long)]
    end: Option<f64>,
    /// Number of grid points over the time span.
    #[arg(long)]
    points: Option<usize>,
    /// Separation that ends the predictability horizon.
    #[arg(long, default_value_t = 1.0)]
    threshold: f64,
    /// Skip the terminal animation.
    #[arg(long)]
    no_animate: bool,
    /// Canvas width in columns.
    #[arg(long, default_value_t = 100)]
    width: usize,
    /// Canvas height in rows.
    #[arg(long, default_value_t = 40)]
    height: usize,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    println!("═══════════════════════════════════════════════════════════════");
    println!("  Lorenz Attractor: Sensitivity to Initial Conditions");
    println!("═══════════════════════════════════════════════════════════════\n");

    let mut config = match &cli.config {
        Some(path) => SimulationConfig::from_json_file(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(end) = cli.end {
        config.time.end = end;
    }
    if let Some(points) = cli.points {
        config.time.points = points;
    }
    if config.initial_states.is_empty() {
        config.initial_states = vec![State::new(0.0, 1.0, 1.0), State::new(0.0, 2.1, 1.0)];
    }
    if config.initial_states.len() != 2 {
        bail!(
            "expected exactly two initial states, got {}",
            config.initial_states.len()
        );
    }
    config.validate().context("invalid run configuration")?;

    let params = config.system;
    println!("System Parameters:");
    println!("  σ = {:.4}, β = {:.4}, ρ = {:.4}", params.sigma, params.beta, params.rho);
    println!(
        "  t ∈ [{:.1}, {:.1}] on {} points",
        config.time.start, config.time.end, config.time.points
    );
    println!(
        "  rtol = {:.0e}, atol = {:.0e}",
        config.tolerances.relative, config.tolerances.absolute
    );
    println!();

    let grid = Arc::new(config.time_grid()?);
    let integrator = Integrator::new(config.integrator_options())?;
    let field = config.lorenz();

    println!("Integrating...");
    let set = TrajectorySet::from_initial_states(&integrator, &field, &grid, &config.initial_states);

    for entry in set.entries() {
        match entry.trajectory() {
            Some(traj) => {
                let stats = traj.stats();
                println!(
                    "  #{} from {:?}: {} steps ({} rejected), {} evaluations",
                    entry.id,
                    entry.initial_state.to_array(),
                    stats.accepted_steps,
                    stats.rejected_steps,
                    stats.function_evals
                );
            }
            None => println!(
                "  #{} from {:?}: FAILED ({})",
                entry.id,
                entry.initial_state.to_array(),
                entry.error().map(|e| e.to_string()).unwrap_or_default()
            ),
        }
    }

    let (Some(a), Some(b)) = (set.trajectory(0), set.trajectory(1)) else {
        bail!("both trajectories must complete to compare them");
    };

    // Separation table
    let series = compare(a, b)?;
    println!("\n┌──────────┬──────────────┐");
    println!("│    t     │     d(t)     │");
    println!("├──────────┼──────────────┤");
    let stride = (series.len() / 16).max(1);
    for i in (0..series.len()).step_by(stride) {
        println!("│ {:8.2} │ {:12.6} │", grid[i], series.values()[i]);
    }
    println!("└──────────┴──────────────┘");

    // Growth rate over the first quarter
    let fit_end = (series.len() / 4).max(2).min(series.len());
    println!("\nSeparation Analysis:");
    println!("  d(0)      = {:.4}", series.values()[0]);
    println!("  max d(t)  = {:.4}", series.max());
    match estimate_exponential_rate(&series, &grid, 0..fit_end)? {
        Some(rate) => println!(
            "  λ (fit over t ≤ {:.2}) = {:.4} from {} samples",
            grid[fit_end - 1],
            rate.slope,
            rate.samples
        ),
        None => println!("  λ undefined (separation never positive)"),
    }
    match series.predictability_horizon(cli.threshold) {
        Some(h) => println!(
            "  d(t) > {:.2} first at t = {:.2} (d = {:.4})",
            cli.threshold, h.time, h.divergence
        ),
        None => println!("  d(t) stays below {:.2}", cli.threshold),
    }

    if cli.no_animate {
        return Ok(());
    }

    let buffer = WindowedPlaybackBuffer::new(&set, config.playback.window)?;
    let mut ctx = RenderContext::new(cli.width, cli.height).with_view(10.0, 0.0);
    ctx.fit_to(&set);
    let mut renderer = AsciiRenderer::new();
    let interval = Duration::from_millis(config.playback.frame_interval_ms);

    let stdout = std::io::stdout();
    for frame in buffer.frames() {
        let text = renderer.render(&ctx, &frame);
        let mut out = stdout.lock();
        write!(out, "\x1b[H\x1b[2J{}", text)?;
        writeln!(
            out,
            "o = {:?}   x = {:?}",
            a.initial_state().to_array(),
            b.initial_state().to_array()
        )?;
        out.flush()?;
        thread::sleep(interval);
    }

    Ok(())
}
