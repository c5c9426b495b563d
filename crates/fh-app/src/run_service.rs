//! Fitting and coexistence-curve execution.
//!
//! A dataset run reads each experimental file, fits `chi = dH/T + dS`
//! from the measured coexisting concentrations, sweeps the fitted relation
//! over the configured temperature window and writes the outputs into the
//! dataset's result directory.

use std::path::{Path, PathBuf};
use std::time::Instant;

use fh_core::units::{deg_c, kelvin_to_celsius};
use fh_curve::{
    ChiFit, ChiRelation, CoexistenceCurve, CoexistenceCurveBuilder, GuessStrategy,
    TemperatureGrid, fit_chi_relation,
};
use fh_model::{FloryHuggins, PhasePair};
use fh_project::schema::{DatasetDef, GuessStrategyDef, SolverDef, SolverMethodDef};
use fh_results::{
    ChiPointRow, CurveRow, CurveSummary, CurveTable, ExperimentRow, FitHeader, FitSummary,
    ModelSummary, ResultStore, RunSummary,
};
use fh_solver::{CommonTangentSolver, LmConfig, NewtonConfig, RootFinder, SolverMethod};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::project_service;

/// Chi per experimental row and the fit through them.
#[derive(Debug, Clone)]
pub struct FitOutcome {
    pub fit: ChiFit,
    pub points: Vec<ChiPointRow>,
    pub weighted: bool,
}

/// Everything needed to sweep one curve.
#[derive(Debug, Clone)]
pub struct CurveRequest {
    pub model: FloryHuggins,
    pub relation: ChiRelation,
    pub grid: TemperatureGrid,
    pub guess: PhasePair,
    pub threshold: f64,
    pub strategy: GuessStrategy,
    pub method: SolverMethod,
}

/// Outputs for one experimental file.
#[derive(Debug, Clone)]
pub struct FileRunResponse {
    pub source: PathBuf,
    pub stem: String,
    pub fit: ChiFit,
    pub grid_points: usize,
    pub retained: usize,
    pub skipped: usize,
    pub curve_path: PathBuf,
    pub chi_points_path: PathBuf,
    pub summary_path: PathBuf,
    pub elapsed_s: f64,
}

#[derive(Debug, Clone)]
pub struct DatasetRunResponse {
    pub dataset_id: String,
    pub output_dir: PathBuf,
    pub files: Vec<FileRunResponse>,
}

/// Compute chi and its propagated error for each row, then fit against 1/T.
///
/// With `weighted`, rows are weighted by `1/chi_err²`.
pub fn fit_experiment(
    model: &FloryHuggins,
    rows: &[ExperimentRow],
    weighted: bool,
) -> AppResult<FitOutcome> {
    let mut temps = Vec::with_capacity(rows.len());
    let mut chis = Vec::with_capacity(rows.len());
    let mut errs = Vec::with_capacity(rows.len());

    for row in rows {
        let phi1 = model.concentration_to_volume_fraction(row.c1);
        let dphi1 = model.concentration_to_volume_fraction(row.c1_err);
        let phi2 = model.concentration_to_volume_fraction(row.c2);
        let dphi2 = model.concentration_to_volume_fraction(row.c2_err);

        temps.push(deg_c(row.temperature_c).value);
        chis.push(model.interaction_parameter(phi1, phi2)?);
        errs.push(model.interaction_parameter_error(phi1, dphi1, phi2, dphi2)?);
    }

    let weights = if weighted {
        if errs.iter().any(|&e| e <= 0.0) {
            return Err(AppError::InvalidInput(
                "weighted fit needs non-zero concentration errors on every row".to_string(),
            ));
        }
        Some(errs.iter().map(|e| 1.0 / (e * e)).collect::<Vec<f64>>())
    } else {
        None
    };

    let fit = fit_chi_relation(&temps, &chis, weights.as_deref())?;
    let points = temps
        .iter()
        .zip(&chis)
        .zip(&errs)
        .map(|((&t, &chi), &chi_err)| ChiPointRow {
            inv_temperature: 1.0 / t,
            chi,
            chi_err,
        })
        .collect();

    Ok(FitOutcome {
        fit,
        points,
        weighted,
    })
}

/// Sweep the relation over the grid with the requested solver.
pub fn generate_curve(request: &CurveRequest) -> AppResult<CoexistenceCurve> {
    let temps = request.grid.generate_points();
    let chis = request.relation.evaluate(&temps);
    let solver = CommonTangentSolver::with_finder(&request.model, request.method);
    let curve = CoexistenceCurveBuilder::new(&solver)
        .with_threshold(request.threshold)?
        .with_strategy(request.strategy)
        .build_parallel(&temps, &chis, request.guess)?;
    Ok(curve)
}

/// Table rows with concentrations derived from the model density.
pub fn curve_table(
    model: &FloryHuggins,
    curve: &CoexistenceCurve,
    fit: FitHeader,
    source: &str,
) -> CurveTable {
    let (c1s, c2s) = curve.to_concentrations(model);
    let rows = curve
        .points
        .iter()
        .zip(c1s.into_iter().zip(c2s))
        .map(|(p, (c1, c2))| CurveRow {
            temperature: p.temperature,
            chi: p.chi,
            phi1: p.phi1(),
            phi2: p.phi2(),
            c1,
            c2,
        })
        .collect();
    CurveTable {
        fit,
        source: source.to_string(),
        rows,
    }
}

pub fn fit_header(fit: &ChiFit) -> FitHeader {
    FitHeader {
        dh: fit.relation.dh,
        dh_stderr: fit.dh_stderr,
        ds: fit.relation.ds,
        ds_stderr: fit.ds_stderr,
    }
}

pub fn solver_method(def: Option<&SolverDef>) -> SolverMethod {
    let Some(def) = def else {
        return SolverMethod::default();
    };
    let (method, max_iterations, abs_tol) = match def.method {
        SolverMethodDef::LevenbergMarquardt => {
            let cfg = LmConfig::default();
            (
                SolverMethod::LevenbergMarquardt(cfg),
                cfg.max_iterations,
                cfg.abs_tol,
            )
        }
        SolverMethodDef::Newton => {
            let cfg = NewtonConfig::default();
            (SolverMethod::Newton(cfg), cfg.max_iterations, cfg.abs_tol)
        }
    };
    method.with_limits(
        def.max_iterations.unwrap_or(max_iterations),
        def.abs_tol.unwrap_or(abs_tol),
    )
}

pub fn guess_strategy(def: GuessStrategyDef) -> GuessStrategy {
    match def {
        GuessStrategyDef::Fixed => GuessStrategy::Fixed,
        GuessStrategyDef::Continuation => GuessStrategy::Continuation,
    }
}

fn strategy_name(strategy: GuessStrategy) -> &'static str {
    match strategy {
        GuessStrategy::Fixed => "fixed",
        GuessStrategy::Continuation => "continuation",
    }
}

/// Fit, sweep and persist every data file of one dataset.
pub fn run_dataset(project_path: &Path, dataset_id: &str) -> AppResult<DatasetRunResponse> {
    let project = project_service::load_project(project_path)?;
    let dataset = project_service::get_dataset(&project, dataset_id)?;
    let base = fh_project::project_dir(project_path);
    run_dataset_def(dataset, &base)
}

/// Run every dataset in the project, or only `only` when given.
pub fn run_project(project_path: &Path, only: Option<&str>) -> AppResult<Vec<DatasetRunResponse>> {
    let project = project_service::load_project(project_path)?;
    let base = fh_project::project_dir(project_path);

    let selected: Vec<&DatasetDef> = match only {
        Some(id) => vec![project_service::get_dataset(&project, id)?],
        None => project.datasets.iter().collect(),
    };
    selected
        .into_iter()
        .map(|dataset| run_dataset_def(dataset, &base))
        .collect()
}

/// Data and output paths in `dataset` are resolved against `base`.
pub fn run_dataset_def(dataset: &DatasetDef, base: &Path) -> AppResult<DatasetRunResponse> {
    let model = project_service::build_model(dataset)?;
    let [g1, g2] = dataset.initial_guess;
    let [lower_c, upper_c] = dataset.temp_range_c;
    let grid = TemperatureGrid::from_celsius_range(lower_c, upper_c, dataset.temp_step_c)?;
    let method = solver_method(dataset.solver.as_ref());
    let strategy = guess_strategy(dataset.guess_strategy);
    let critical = model.critical_point();

    let output_dir = dataset.output_dir(base);
    let store = ResultStore::new(output_dir.clone())?;

    info!(
        dataset = %dataset.id,
        model = %model,
        solver = method.name(),
        strategy = strategy_name(strategy),
        "running dataset"
    );

    let mut files = Vec::with_capacity(dataset.data.len());
    for (source, path) in dataset.data.iter().zip(dataset.data_paths(base)) {
        let started = Instant::now();
        let rows = fh_results::read_experiment(&path).map_err(|e| AppError::DataFileRead {
            path: path.clone(),
            source: e,
        })?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .ok_or_else(|| AppError::InvalidInput(format!("data path {source:?} has no file name")))?;

        let outcome = fit_experiment(&model, &rows, dataset.weighted_fit)?;
        let request = CurveRequest {
            model,
            relation: outcome.fit.relation,
            grid: grid.clone(),
            guess: PhasePair::new(g1, g2),
            threshold: dataset.threshold,
            strategy,
            method,
        };
        let curve = generate_curve(&request)?;
        if curve.is_empty() {
            warn!(dataset = %dataset.id, file = %source, "no coexistence points survived the sweep");
        }

        let table = curve_table(&model, &curve, fit_header(&outcome.fit), source);
        let curve_path = store.save_curve(&stem, &table)?;
        let chi_points_path = store.save_chi_points(&stem, &outcome.points)?;

        let grid_points = curve.len() + curve.skipped.len();
        let summary = RunSummary {
            dataset_id: dataset.id.clone(),
            source: source.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            model: ModelSummary {
                n1: model.n1(),
                n2: model.n2(),
                rho: model.rho(),
                critical_phi: critical.phi,
                critical_chi: critical.chi,
            },
            fit: FitSummary {
                dh: outcome.fit.relation.dh,
                dh_stderr: outcome.fit.dh_stderr,
                ds: outcome.fit.relation.ds,
                ds_stderr: outcome.fit.ds_stderr,
                r_squared: outcome.fit.r_squared,
                n_points: outcome.fit.n_points,
                weighted: outcome.weighted,
            },
            curve: CurveSummary {
                grid_points,
                retained: curve.len(),
                skipped: curve.skipped.len(),
                threshold: dataset.threshold,
            },
            solver: method.name().to_string(),
            guess_strategy: strategy_name(strategy).to_string(),
        };
        let summary_path = store.save_summary(&stem, &summary)?;

        let elapsed_s = started.elapsed().as_secs_f64();
        // None when no positive temperature reaches the critical chi.
        let critical_t_c = outcome
            .fit
            .relation
            .temperature_for(critical.chi)
            .ok()
            .map(kelvin_to_celsius);
        info!(
            dataset = %dataset.id,
            file = %source,
            dh = outcome.fit.relation.dh,
            ds = outcome.fit.relation.ds,
            critical_t_c = ?critical_t_c,
            retained = curve.len(),
            skipped = curve.skipped.len(),
            elapsed_s,
            "wrote coexistence curve"
        );

        files.push(FileRunResponse {
            source: path,
            stem,
            fit: outcome.fit,
            grid_points,
            retained: curve.len(),
            skipped: curve.skipped.len(),
            curve_path,
            chi_points_path,
            summary_path,
            elapsed_s,
        });
    }

    Ok(DatasetRunResponse {
        dataset_id: dataset.id.clone(),
        output_dir,
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solver_defaults_to_levenberg_marquardt() {
        assert_eq!(solver_method(None), SolverMethod::default());
    }

    #[test]
    fn solver_limits_override_defaults() {
        let def = SolverDef {
            method: SolverMethodDef::Newton,
            max_iterations: Some(12),
            abs_tol: None,
        };
        match solver_method(Some(&def)) {
            SolverMethod::Newton(cfg) => {
                assert_eq!(cfg.max_iterations, 12);
                assert_eq!(cfg.abs_tol, NewtonConfig::default().abs_tol);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn fit_uses_chi_of_each_row() {
        let model = FloryHuggins::new(1.0, 1.0, 1000.0).unwrap();
        let relation = ChiRelation::new(600.0, 0.0);
        // Symmetric binodal pairs (phi, 1 - phi) at three temperatures.
        let mut rows = Vec::new();
        for phi in [0.05, 0.1, 0.2] {
            let chi = model.interaction_parameter(phi, 1.0 - phi).unwrap();
            let t_c = kelvin_to_celsius(relation.temperature_for(chi).unwrap());
            rows.push(ExperimentRow {
                temperature_c: t_c,
                c1: phi * 1000.0,
                c1_err: 1.0,
                c2: (1.0 - phi) * 1000.0,
                c2_err: 1.0,
            });
        }

        let outcome = fit_experiment(&model, &rows, false).unwrap();
        assert!((outcome.fit.relation.dh - 600.0).abs() < 1e-6);
        assert!(outcome.fit.relation.ds.abs() < 1e-8);
        assert_eq!(outcome.points.len(), 3);
        assert!(outcome.points.iter().all(|p| p.chi_err > 0.0));

        let weighted = fit_experiment(&model, &rows, true).unwrap();
        assert!(weighted.weighted);
        assert!((weighted.fit.relation.dh - 600.0).abs() < 1e-6);
    }

    #[test]
    fn weighted_fit_rejects_zero_errors() {
        let model = FloryHuggins::new(1.0, 1.0, 1000.0).unwrap();
        let rows = [
            ExperimentRow {
                temperature_c: 10.0,
                c1: 100.0,
                c1_err: 0.0,
                c2: 900.0,
                c2_err: 0.0,
            },
            ExperimentRow {
                temperature_c: 20.0,
                c1: 150.0,
                c1_err: 0.0,
                c2: 850.0,
                c2_err: 0.0,
            },
        ];
        assert!(fit_experiment(&model, &rows, false).is_ok());
        assert!(matches!(
            fit_experiment(&model, &rows, true),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn identical_phases_are_a_model_error() {
        let model = FloryHuggins::default();
        let rows = [ExperimentRow {
            temperature_c: 10.0,
            c1: 100.0,
            c1_err: 1.0,
            c2: 100.0,
            c2_err: 1.0,
        }];
        assert!(matches!(
            fit_experiment(&model, &rows, false),
            Err(AppError::Model(_))
        ));
    }
}
