//! Common-tangent solves against known Flory-Huggins coexistence points.

use fh_model::{FloryHuggins, FreeEnergyModel, PhasePair};
use fh_solver::{
    CommonTangentSolver, LevenbergMarquardt, LmConfig, Newton, NewtonConfig, SolverMethod,
    TangentSolve,
};
use proptest::prelude::*;

#[test]
fn symmetric_model_converges_to_symmetric_pair() {
    // N1 = N2 = 1, rho = 1400, chi = 2.5, guess (0.01, 0.9)
    let fh = FloryHuggins::new(1.0, 1.0, 1400.0).unwrap();
    let solver = CommonTangentSolver::new(&fh);

    let solution = solver.solve(2.5, PhasePair::new(0.01, 0.9)).unwrap();

    println!(
        "chi=2.5 converged in {} iterations to {}",
        solution.iterations, solution.phases
    );
    assert!(solution.converged);
    assert!((solution.phi1() + solution.phi2() - 1.0).abs() < 1e-8);
    assert!((solution.phi1() - 0.144_794_108_255).abs() < 1e-8);
}

#[test]
fn converged_pair_has_common_tangent() {
    let fh = FloryHuggins::new(10.0, 1.0, 1400.0).unwrap();
    let chi = 1.2;
    let solution = CommonTangentSolver::new(&fh)
        .solve(chi, PhasePair::new(0.01, 0.6))
        .unwrap();
    assert!(solution.converged);

    let (p1, p2) = (solution.phi1(), solution.phi2());
    assert!(p1 < 0.01 && p2 > 0.7, "unexpected pair {}", solution.phases);

    let d1 = fh.free_energy_derivative(p1, chi).unwrap();
    let d2 = fh.free_energy_derivative(p2, chi).unwrap();
    let secant = (fh.free_energy(p1, chi).unwrap() - fh.free_energy(p2, chi).unwrap()) / (p1 - p2);
    assert!((d1 - d2).abs() < 1e-9);
    assert!((secant - d1).abs() < 1e-9);

    // The closed-form chi recovers the input.
    let chi_back = fh.interaction_parameter(p1, p2).unwrap();
    assert!((chi_back - chi).abs() < 1e-6);
}

#[test]
fn newton_and_levenberg_marquardt_agree() {
    let fh = FloryHuggins::new(1.0, 1.0, 1400.0).unwrap();
    let guess = PhasePair::new(0.01, 0.9);

    let lm = CommonTangentSolver::with_finder(&fh, LevenbergMarquardt::new(LmConfig::default()))
        .solve(2.2, guess)
        .unwrap();
    let newton = CommonTangentSolver::with_finder(&fh, Newton::new(NewtonConfig::default()))
        .solve(2.2, guess)
        .unwrap();

    assert!(lm.converged && newton.converged);
    assert!((lm.phi1() - newton.phi1()).abs() < 1e-8);
    assert!((lm.phi2() - newton.phi2()).abs() < 1e-8);
}

#[test]
fn near_spinodal_degenerate_guess_never_yields_a_real_gap() {
    // Guess straddling the critical composition just above chi_c = 2: the
    // result is either flagged as non-converged or collapses onto the
    // trivial pair, which a 1e-5 threshold removes.
    let fh = FloryHuggins::default();
    let guess = PhasePair::new(0.5, 0.500_000_1);

    for method in [
        SolverMethod::default(),
        SolverMethod::Newton(NewtonConfig::default()),
    ] {
        let solver = CommonTangentSolver::with_finder(&fh, method);
        let solution = solver.solve_tangent(2.05, guess).unwrap();
        assert!(
            !solution.converged || solution.gap() < 1e-5,
            "{method:?} produced {}",
            solution.phases
        );
    }
}

#[test]
fn below_critical_chi_has_no_two_phase_solution() {
    let fh = FloryHuggins::default();
    let solution = CommonTangentSolver::new(&fh)
        .solve(1.5, PhasePair::new(0.01, 0.9))
        .unwrap();
    assert!(!solution.converged || solution.gap() < 1e-5);
}

#[test]
fn tight_iteration_budget_is_reported_not_thrown() {
    let fh = FloryHuggins::default();
    let method = SolverMethod::default().with_limits(1, 1e-14);
    let solution = CommonTangentSolver::with_finder(&fh, method)
        .solve(2.5, PhasePair::new(0.01, 0.9))
        .unwrap();
    assert!(!solution.converged);
    assert!(solution.require_converged().is_err());
}

proptest! {
    #[test]
    fn symmetric_tangent_holds_across_two_phase_region(chi in 2.1f64..3.0) {
        let fh = FloryHuggins::default();
        let solution = CommonTangentSolver::new(&fh)
            .solve(chi, PhasePair::new(0.01, 0.9))
            .unwrap();
        prop_assert!(solution.converged, "chi={chi}: {}", solution.termination);

        let (p1, p2) = (solution.phi1(), solution.phi2());
        prop_assert!((p1 + p2 - 1.0).abs() < 1e-8, "chi={chi}: {}", solution.phases);

        let d1 = fh.free_energy_derivative(p1, chi).unwrap();
        let d2 = fh.free_energy_derivative(p2, chi).unwrap();
        let secant =
            (fh.free_energy(p1, chi).unwrap() - fh.free_energy(p2, chi).unwrap()) / (p1 - p2);
        prop_assert!((d1 - d2).abs() < 1e-8);
        prop_assert!((secant - d1).abs() < 1e-8);
    }
}
