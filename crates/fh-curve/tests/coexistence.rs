//! Sweeps over the real common-tangent solver and the filtering policy.

use fh_curve::{
    ChiRelation, CoexistenceCurveBuilder, GuessStrategy, SkipReason, TemperatureGrid,
    fit_chi_relation,
};
use fh_model::{FloryHuggins, PhasePair};
use fh_solver::{CommonTangentSolver, SolverResult, TangentSolution, TangentSolve, Termination};
use proptest::prelude::*;

/// Always converges to the given pair.
struct Pinned(PhasePair);

impl TangentSolve for Pinned {
    fn solve_tangent(&self, chi: f64, _guess: PhasePair) -> SolverResult<TangentSolution> {
        Ok(TangentSolution {
            phases: self.0,
            chi,
            residual_norm: 0.0,
            iterations: 1,
            converged: true,
            termination: Termination::Converged,
        })
    }
}

/// Converges only for chi above a cutoff; echoes the guess back shifted.
struct Cutoff(f64);

impl TangentSolve for Cutoff {
    fn solve_tangent(&self, chi: f64, guess: PhasePair) -> SolverResult<TangentSolution> {
        let ok = chi > self.0;
        Ok(TangentSolution {
            phases: PhasePair::new(guess.phi1 * 0.5, guess.phi2),
            chi,
            residual_norm: if ok { 0.0 } else { 1.0 },
            iterations: 1,
            converged: ok,
            termination: if ok {
                Termination::Converged
            } else {
                Termination::Stagnated
            },
        })
    }
}

fn symmetric_sweep(t_max: f64) -> (Vec<f64>, Vec<f64>) {
    let relation = ChiRelation::new(600.0, 0.0);
    let temps: Vec<f64> = (0..)
        .map(|i| 240.0 + 2.0 * i as f64)
        .take_while(|&t| t <= t_max)
        .collect();
    let chis = relation.evaluate(&temps);
    (temps, chis)
}

#[test]
fn narrow_pair_depends_on_threshold() {
    let solver = Pinned(PhasePair::new(0.4999, 0.5001));
    let guess = PhasePair::new(0.1, 0.9);

    let coarse = CoexistenceCurveBuilder::new(&solver)
        .with_threshold(1e-3)
        .unwrap()
        .build(&[300.0], &[2.0], guess)
        .unwrap();
    assert!(coarse.is_empty());
    assert!(matches!(
        coarse.skipped[0].reason,
        SkipReason::NearCritical { .. }
    ));

    let fine = CoexistenceCurveBuilder::new(&solver)
        .with_threshold(1e-6)
        .unwrap()
        .build(&[300.0], &[2.0], guess)
        .unwrap();
    assert_eq!(fine.len(), 1);
}

#[test]
fn symmetric_sweep_converges_below_critical_temperature() {
    let model = FloryHuggins::new(1.0, 1.0, 1400.0).unwrap();
    let solver = CommonTangentSolver::new(&model);
    let (temps, chis) = symmetric_sweep(290.0);

    let curve = CoexistenceCurveBuilder::new(&solver)
        .with_threshold(1e-5)
        .unwrap()
        .build(&temps, &chis, PhasePair::new(0.01, 0.9))
        .unwrap();

    assert_eq!(curve.len(), temps.len());
    assert!(curve.skipped.is_empty());
    for p in &curve.points {
        assert!((p.phi1() + p.phi2() - 1.0).abs() < 1e-6, "{p:?}");
        assert!(p.phi1() < p.phi2());
    }
    // The gap narrows as the critical temperature (300 K) approaches.
    let gaps: Vec<f64> = curve.points.iter().map(|p| p.phases.gap()).collect();
    assert!(gaps.windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn no_coexistence_above_critical_temperature() {
    let model = FloryHuggins::new(1.0, 1.0, 1400.0).unwrap();
    let solver = CommonTangentSolver::new(&model);
    let (temps, chis) = symmetric_sweep(310.0);
    let guess = PhasePair::new(0.01, 0.9);

    let fixed = CoexistenceCurveBuilder::new(&solver)
        .with_threshold(1e-5)
        .unwrap()
        .build(&temps, &chis, guess)
        .unwrap();
    let continued = CoexistenceCurveBuilder::new(&solver)
        .with_threshold(1e-5)
        .unwrap()
        .with_strategy(GuessStrategy::Continuation)
        .build(&temps, &chis, guess)
        .unwrap();

    for curve in [&fixed, &continued] {
        assert!(curve.temperatures().iter().all(|&t| t <= 300.0));
        assert_eq!(curve.len() + curve.skipped.len(), temps.len());
    }
    assert!(continued.len() >= fixed.len());
}

#[test]
fn nothing_retained_at_or_below_critical_chi() {
    // chi_c = 2 for N1 = N2 = 1; the sweep crosses it at index 10.
    let model = FloryHuggins::new(1.0, 1.0, 1400.0).unwrap();
    let solver = CommonTangentSolver::new(&model);
    let chis: Vec<f64> = (0..=20).map(|i| 2.05 - 0.005 * i as f64).collect();
    let temps: Vec<f64> = (0..chis.len()).map(|i| 290.0 + i as f64).collect();

    for threshold in [1e-6, 1e-5] {
        let curve = CoexistenceCurveBuilder::new(&solver)
            .with_threshold(threshold)
            .unwrap()
            .build(&temps, &chis, PhasePair::new(0.01, 0.9))
            .unwrap();
        assert!(
            curve.chi_values().iter().all(|&chi| chi > 2.0),
            "threshold {threshold}: {:?}",
            curve.chi_values()
        );
        assert!(curve.skipped.iter().filter(|s| s.chi <= 2.0).count() == 11);
        assert!(!curve.is_empty());
    }
}

#[test]
fn parallel_sweep_matches_sequential() {
    let model = FloryHuggins::new(10.0, 1.0, 1400.0).unwrap();
    let solver = CommonTangentSolver::new(&model);
    let grid = TemperatureGrid::from_celsius_range(0.0, 30.0, 0.5).unwrap();
    let temps = grid.generate_points();
    let chis = ChiRelation::new(400.0, -0.2).evaluate(&temps);
    let builder = CoexistenceCurveBuilder::new(&solver).with_threshold(1e-5).unwrap();
    let guess = PhasePair::new(0.01, 0.6);

    let sequential = builder.build(&temps, &chis, guess).unwrap();
    let parallel = builder.build_parallel(&temps, &chis, guess).unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn continuation_seeds_next_solve() {
    let solver = Cutoff(1.0);
    let curve = CoexistenceCurveBuilder::new(&solver)
        .with_strategy(GuessStrategy::Continuation)
        .build(&[1.0, 2.0, 3.0], &[2.0, 0.5, 2.0], PhasePair::new(0.4, 0.9))
        .unwrap();
    // The skipped middle point does not reset the chain.
    assert_eq!(curve.phi1s(), vec![0.2, 0.1]);
    assert_eq!(curve.skipped[0].index, 1);
}

#[test]
fn fit_recovers_relation_from_binodal() {
    let model = FloryHuggins::new(1.0, 1.0, 1400.0).unwrap();
    let solver = CommonTangentSolver::new(&model);
    let (temps, chis) = symmetric_sweep(280.0);
    let curve = CoexistenceCurveBuilder::new(&solver)
        .build(&temps, &chis, PhasePair::new(0.01, 0.9))
        .unwrap();

    let recomputed: Vec<f64> = curve
        .points
        .iter()
        .map(|p| model.interaction_parameter(p.phi1(), p.phi2()).unwrap())
        .collect();
    let fit = fit_chi_relation(&curve.temperatures(), &recomputed, None).unwrap();
    assert!((fit.relation.dh - 600.0).abs() < 1e-3, "{fit:?}");
    assert!(fit.relation.ds.abs() < 1e-5, "{fit:?}");
    assert!(fit.r_squared > 0.999_999);
}

proptest! {
    #[test]
    fn output_is_an_ordered_subsequence(
        chis in prop::collection::vec(-1.0f64..3.0, 0..40),
        threshold in 0.0f64..0.5,
    ) {
        let solver = Cutoff(1.0);
        let temps: Vec<f64> = (0..chis.len()).map(|i| 250.0 + i as f64).collect();
        let curve = CoexistenceCurveBuilder::new(&solver)
            .with_threshold(threshold)
            .unwrap()
            .build(&temps, &chis, PhasePair::new(0.2, 0.7))
            .unwrap();

        let (p1, p2, t, c) = curve.clone().into_arrays();
        prop_assert!(p1.len() <= temps.len());
        prop_assert_eq!(p1.len(), p2.len());
        prop_assert_eq!(p1.len(), t.len());
        prop_assert_eq!(p1.len(), c.len());
        prop_assert!(t.windows(2).all(|w| w[0] < w[1]));
        for (ti, ci) in t.iter().zip(&c) {
            let i = (ti - 250.0) as usize;
            prop_assert_eq!(chis[i], *ci);
        }
        prop_assert_eq!(curve.len() + curve.skipped.len(), temps.len());
    }
}
