use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use fh_app::{AppError, AppResult, CurveRequest, project_service, run_service};
use fh_curve::{ChiRelation, GuessStrategy, TemperatureGrid};
use fh_model::{FloryHuggins, PhasePair};
use fh_results::FitHeader;
use fh_solver::SolverMethod;

#[derive(Parser)]
#[command(name = "fh-cli")]
#[command(about = "Flory-Huggins coexistence curves from binodal measurements", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// List datasets in a project
    Datasets {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Fit chi(T) and write coexistence curves for each data file
    Run {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Only run this dataset
        #[arg(long)]
        dataset: Option<String>,
    },
    /// Compute one coexistence curve from known dH and dS
    Curve {
        #[arg(long, default_value_t = 1.0)]
        n1: f64,
        #[arg(long, default_value_t = 1.0)]
        n2: f64,
        /// Density in mg/mL
        #[arg(long, default_value_t = fh_model::DEFAULT_DENSITY)]
        rho: f64,
        #[arg(long, allow_hyphen_values = true)]
        dh: f64,
        #[arg(long, allow_hyphen_values = true)]
        ds: f64,
        /// Lower temperature in °C (inclusive)
        #[arg(long, allow_hyphen_values = true)]
        t_min_c: f64,
        /// Upper temperature in °C (exclusive)
        #[arg(long, allow_hyphen_values = true)]
        t_max_c: f64,
        #[arg(long, default_value_t = 0.2)]
        step_c: f64,
        /// Initial dilute and dense volume fractions
        #[arg(long, num_args = 2, required = true, value_names = ["PHI1", "PHI2"])]
        guess: Vec<f64>,
        #[arg(long, default_value_t = 1e-5)]
        threshold: f64,
        /// Seed each solve with the previous solution
        #[arg(long)]
        continuation: bool,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Datasets { project_path } => cmd_datasets(&project_path),
        Commands::Run {
            project_path,
            dataset,
        } => cmd_run(&project_path, dataset.as_deref()),
        Commands::Curve {
            n1,
            n2,
            rho,
            dh,
            ds,
            t_min_c,
            t_max_c,
            step_c,
            guess,
            threshold,
            continuation,
            output,
        } => {
            let model = FloryHuggins::new(n1, n2, rho)?;
            let &[g1, g2] = guess.as_slice() else {
                return Err(AppError::InvalidInput(
                    "--guess needs exactly two values".to_string(),
                ));
            };
            let request = CurveRequest {
                model,
                relation: ChiRelation::new(dh, ds),
                grid: TemperatureGrid::from_celsius_range(t_min_c, t_max_c, step_c)?,
                guess: PhasePair::new(g1, g2),
                threshold,
                strategy: if continuation {
                    GuessStrategy::Continuation
                } else {
                    GuessStrategy::Fixed
                },
                method: SolverMethod::default(),
            };
            cmd_curve(&request, output.as_deref())
        }
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = project_service::load_project(project_path)?;
    project_service::validate_project(&project)?;
    println!("✓ Project is valid");
    Ok(())
}

fn cmd_datasets(project_path: &Path) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let datasets = project_service::list_datasets(&project);

    if datasets.is_empty() {
        println!("No datasets found in project");
    } else {
        println!("Datasets in project:");
        for d in datasets {
            println!(
                "  {} - {} (N1={}, N2={}, {} files, {}..{} °C)",
                d.id, d.name, d.n1, d.n2, d.file_count, d.temp_range_c[0], d.temp_range_c[1]
            );
        }
    }
    Ok(())
}

fn cmd_run(project_path: &Path, dataset: Option<&str>) -> AppResult<()> {
    let responses = run_service::run_project(project_path, dataset)?;
    for response in responses {
        println!(
            "Dataset {} -> {}",
            response.dataset_id,
            response.output_dir.display()
        );
        for file in &response.files {
            let fit = &file.fit;
            println!("  {}", file.source.display());
            println!(
                "    dH = {:.3} +/- {}, dS = {:.3} +/- {} (R² = {:.4}, {} points)",
                fit.relation.dh,
                stderr_text(fit.dh_stderr),
                fit.relation.ds,
                stderr_text(fit.ds_stderr),
                fit.r_squared,
                fit.n_points
            );
            println!(
                "    {} of {} temperatures on the curve, {:.3}s",
                file.retained, file.grid_points, file.elapsed_s
            );
            println!("    ✓ {}", file.curve_path.display());
        }
    }
    Ok(())
}

fn cmd_curve(request: &CurveRequest, output: Option<&Path>) -> AppResult<()> {
    let curve = run_service::generate_curve(request)?;
    let header = FitHeader {
        dh: request.relation.dh,
        dh_stderr: None,
        ds: request.relation.ds,
        ds_stderr: None,
    };
    let table = run_service::curve_table(&request.model, &curve, header, "command line");
    let text = table.to_text();

    match output {
        Some(path) => {
            std::fs::write(path, text)?;
            println!(
                "✓ Wrote {} points ({} skipped) to {}",
                curve.len(),
                curve.skipped.len(),
                path.display()
            );
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn stderr_text(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.3}"))
}
