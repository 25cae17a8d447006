use clap::{Parser, Subcommand};
use seidr_app::{
    AppError, AppResult, RunOptions, RunProgressEvent, RunRequest, RunStage, run_service,
    scenario_service, sweep_service,
};
use seidr_model::{
    Compartment, LOMBARDIA, ParameterOverrides, SweepDefinition, SweepParameter, Trajectory,
};
use seidr_project::ScenarioFile;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "seidr-cli")]
#[command(about = "SEIDR CLI - compartmental epidemic model", long_about = None)]
struct Cli {
    /// Log solver timing (same as setting SEIDR_TIMING)
    #[arg(long, global = true)]
    timing: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a scenario file and print its derived rates
    Validate {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// Compute a trajectory (built-in Lombardia scenario when no file is given)
    Run {
        /// Path to the scenario YAML or JSON file
        scenario_path: Option<PathBuf>,
        /// Mean incubation period in days
        #[arg(long)]
        incubation_period: Option<f64>,
        /// Mean infectious period in days
        #[arg(long)]
        infectious_period: Option<f64>,
        /// Initial number of exposed people
        #[arg(long)]
        initial_exposed: Option<f64>,
        /// Basic reproduction number
        #[arg(long = "r0")]
        basic_reproduction_number: Option<f64>,
        /// Write the trajectory to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// Sweep one parameter and summarize each value
    Sweep {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        /// Parameter to vary (r0, incubation_period, infectious_period, initial_exposed);
        /// defaults to the scenario's sweep block
        #[arg(long)]
        parameter: Option<SweepParameter>,
        #[arg(long, requires = "parameter")]
        start: Option<f64>,
        #[arg(long, requires = "parameter")]
        end: Option<f64>,
        /// Number of sweep values
        #[arg(long, default_value_t = 5)]
        points: usize,
    },
    /// List cached runs for a scenario
    Runs {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// Show details of a cached run
    ShowRun {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Export a cached run as CSV
    Export {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if cli.timing {
        seidr_core::timing::enable_timing();
    }

    let result = match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Run {
            scenario_path,
            incubation_period,
            infectious_period,
            initial_exposed,
            basic_reproduction_number,
            output,
            no_cache,
        } => {
            let overrides = ParameterOverrides {
                incubation_period,
                infectious_period,
                initial_exposed,
                basic_reproduction_number,
            };
            cmd_run(
                scenario_path.as_deref(),
                overrides,
                output.as_deref(),
                !no_cache,
            )
        }
        Commands::Sweep {
            scenario_path,
            parameter,
            start,
            end,
            points,
        } => {
            let sweep = match parameter {
                Some(parameter) => {
                    let (Some(start), Some(end)) = (start, end) else {
                        return Err(AppError::InvalidInput(
                            "--start and --end are required with --parameter".to_string(),
                        ));
                    };
                    Some(SweepDefinition {
                        parameter,
                        start,
                        end,
                        num_points: points,
                    })
                }
                None => None,
            };
            cmd_sweep(&scenario_path, sweep.as_ref())
        }
        Commands::Runs { scenario_path } => cmd_runs(&scenario_path),
        Commands::ShowRun {
            scenario_path,
            run_id,
        } => cmd_show_run(&scenario_path, &run_id),
        Commands::Export {
            scenario_path,
            run_id,
            output,
        } => cmd_export(&scenario_path, &run_id, output.as_deref()),
    };

    seidr_core::timing::solve_timing::log_summary();
    result
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = scenario_service::load_scenario(scenario_path)?;
    let summary = scenario_service::summarize(&scenario)?;
    println!("✓ Scenario is valid");
    println!("  Name: {}", summary.name);
    if let Some(description) = &summary.description {
        println!("  Description: {}", description);
    }
    println!("  Horizon: {} days ({} points)", summary.days, summary.points);
    println!("  S0: {:.0}", summary.susceptible0);
    let r = &summary.rates;
    println!(
        "  Rates: epsilon={:.6} gamma={:.6} beta={:.6} alpha={:.6} u={:.6} L={:.3}",
        r.epsilon, r.gamma, r.beta, r.alpha, r.u, r.birth_rate
    );
    if let Some(sweep) = &scenario.sweep {
        println!("  {}", sweep);
    }
    Ok(())
}

fn cmd_run(
    scenario_path: Option<&Path>,
    overrides: ParameterOverrides,
    output: Option<&Path>,
    use_cache: bool,
) -> AppResult<()> {
    let Some(scenario_path) = scenario_path else {
        println!("Running built-in scenario: {}", LOMBARDIA.name);
        let scenario = ScenarioFile::from_scenario(&LOMBARDIA);
        let trajectory = run_service::run_uncached(&scenario, &overrides)?;
        print_trajectory_summary(&trajectory);
        return write_output(output, &trajectory);
    };

    println!("Running scenario: {}", scenario_path.display());
    let request = RunRequest {
        scenario_path,
        overrides,
        options: RunOptions {
            use_cache,
            ..RunOptions::default()
        },
    };

    let mut last_emit = Instant::now();
    let mut last_stage = RunStage::LoadingScenario;
    let response = run_service::ensure_run_with_progress(
        &request,
        Some(&mut |event| {
            let emit_now = event.stage != last_stage || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_stage = event.stage;
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Run completed: {}", response.run_id);
    }
    print_timing_summary(&response.timing);
    print_trajectory_summary(&response.trajectory);

    write_output(output, &response.trajectory)
}

fn write_output(output: Option<&Path>, trajectory: &Trajectory) -> AppResult<()> {
    if let Some(path) = output {
        seidr_results::write_csv_file(path, trajectory)?;
        println!("✓ Wrote {} rows to {}", trajectory.len(), path.display());
    }
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match event.fraction_complete {
        Some(fraction) => {
            let width = 28usize;
            let filled = ((fraction * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            print!(
                "\r[{}] {:>6.2}%  {}  elapsed={:.1}s",
                bar,
                fraction * 100.0,
                event.stage.label(),
                event.elapsed_wall_s
            );
        }
        None => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            let mut line = format!(
                "\r{} {}  elapsed={:.2}s",
                spinner[spin_idx],
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(msg) = &event.message {
                line.push_str(&format!("  {}", msg));
            }
            print!("{}", line);
        }
    }
    let _ = io::stdout().flush();
}

fn print_timing_summary(timing: &seidr_app::RunTimingSummary) {
    println!("\nTiming summary:");
    println!("  Load:    {:.3}s", timing.load_scenario_time_s);
    if timing.load_cache_time_s > 0.0 {
        println!("  Cache load: {:.3}s", timing.load_cache_time_s);
    } else {
        println!("  Solve:   {:.3}s", timing.solve_time_s);
        println!("  Save:    {:.3}s", timing.save_time_s);
    }
    println!("  Total:   {:.3}s", timing.total_time_s);
}

fn print_trajectory_summary(trajectory: &Trajectory) {
    let summary = trajectory.summary();
    println!("\nTrajectory:");
    println!(
        "  Time points: {} over {:.1} days",
        summary.points, summary.horizon_days
    );
    println!(
        "  Peak I: {:.0} on day {:.2}",
        summary.peak_infectious, summary.peak_infectious_day
    );
    if let Some(state) = trajectory.final_state() {
        println!("  Final state:");
        for c in Compartment::ALL {
            println!("    {} ({}): {:.0}", c.symbol(), c.label(), state[c.index()]);
        }
    }
    if let Some(living) = trajectory
        .len()
        .checked_sub(1)
        .and_then(|last| trajectory.living_population(last))
    {
        println!("  Living (S+E+I+R): {:.0}", living);
    }
    if !summary.all_finite {
        println!("  ⚠ trajectory contains non-finite values");
    }
}

fn cmd_sweep(scenario_path: &Path, sweep: Option<&SweepDefinition>) -> AppResult<()> {
    let scenario = scenario_service::load_scenario(scenario_path)?;
    let points = sweep_service::run_scenario_sweep(&scenario, sweep)?;

    let parameter = sweep
        .or(scenario.sweep.as_ref())
        .map(|s| s.parameter.name())
        .unwrap_or("value");
    println!(
        "{:>26}  {:>12}  {:>10}  {:>12}  {:>12}",
        parameter, "peak I", "peak day", "final D", "final R"
    );
    for point in points {
        let s = &point.summary;
        println!(
            "{:>26.4}  {:>12.0}  {:>10.2}  {:>12.0}  {:>12.0}",
            point.value, s.peak_infectious, s.peak_infectious_day, s.final_dead, s.final_recovered
        );
    }
    Ok(())
}

fn cmd_runs(scenario_path: &Path) -> AppResult<()> {
    let runs = run_service::list_runs(scenario_path)?;

    if runs.is_empty() {
        println!("No cached runs found for: {}", scenario_path.display());
    } else {
        println!("Cached runs for '{}':", scenario_path.display());
        for manifest in runs {
            let overrides = if manifest.overrides.is_empty() {
                String::new()
            } else {
                format!("  {:?}", manifest.overrides)
            };
            println!("  {} ({}){}", manifest.run_id, manifest.timestamp, overrides);
        }
    }
    Ok(())
}

fn cmd_show_run(scenario_path: &Path, run_id: &str) -> AppResult<()> {
    println!("Loading run: {}", run_id);

    let (manifest, trajectory) = run_service::load_run(scenario_path, run_id)?;

    println!("\nRun:");
    println!("  Scenario: {}", manifest.scenario_name);
    println!("  Timestamp: {}", manifest.timestamp);
    println!("  Solver version: {}", manifest.solver_version);
    if !manifest.overrides.is_empty() {
        println!("  Overrides: {:?}", manifest.overrides);
    }
    print_trajectory_summary(&trajectory);
    Ok(())
}

fn cmd_export(scenario_path: &Path, run_id: &str, output: Option<&Path>) -> AppResult<()> {
    let (_manifest, trajectory) = run_service::load_run(scenario_path, run_id)?;

    match output {
        Some(path) => {
            seidr_results::write_csv_file(path, &trajectory)?;
            eprintln!("Exported {} rows to {}", trajectory.len(), path.display());
        }
        None => seidr_results::write_csv(io::stdout().lock(), &trajectory)?,
    }
    Ok(())
}
