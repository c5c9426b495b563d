//! Sweep of common-tangent solves over a temperature/chi sequence.

use crate::curve::{CoexistenceCurve, CoexistencePoint, SkipReason, SkippedPoint};
use crate::error::{CurveError, CurveResult};
use fh_core::numeric::in_open_unit_interval;
use fh_model::PhasePair;
use fh_solver::{SolverError, TangentSolve};
use rayon::prelude::*;
use tracing::{debug, info};

/// Default minimum phase separation for a point to be kept.
pub const DEFAULT_THRESHOLD: f64 = 1e-6;

/// Where each solve of the sweep starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuessStrategy {
    /// Every point starts from the caller's guess
    #[default]
    Fixed,
    /// Each retained point seeds the next solve
    Continuation,
}

/// Builds a [`CoexistenceCurve`] by solving the common tangent at each
/// (temperature, chi) pair in order and dropping points that fail or sit
/// too close to the critical point.
pub struct CoexistenceCurveBuilder<'s, S: TangentSolve + ?Sized> {
    solver: &'s S,
    threshold: f64,
    strategy: GuessStrategy,
}

type Outcome = Result<CoexistencePoint, SkippedPoint>;

impl<'s, S: TangentSolve + ?Sized> CoexistenceCurveBuilder<'s, S> {
    pub fn new(solver: &'s S) -> Self {
        Self {
            solver,
            threshold: DEFAULT_THRESHOLD,
            strategy: GuessStrategy::Fixed,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> CurveResult<Self> {
        if !(threshold.is_finite() && threshold >= 0.0) {
            return Err(CurveError::InvalidThreshold { value: threshold });
        }
        self.threshold = threshold;
        Ok(self)
    }

    pub fn with_strategy(mut self, strategy: GuessStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn strategy(&self) -> GuessStrategy {
        self.strategy
    }

    /// Sequential sweep.
    pub fn build(
        &self,
        temperatures: &[f64],
        chis: &[f64],
        guess: PhasePair,
    ) -> CurveResult<CoexistenceCurve> {
        check_inputs(temperatures, chis, guess)?;

        let mut current = guess;
        let mut outcomes = Vec::with_capacity(temperatures.len());
        for (index, (&t, &chi)) in temperatures.iter().zip(chis).enumerate() {
            let outcome = self.solve_point(index, t, chi, current);
            if self.strategy == GuessStrategy::Continuation {
                if let Ok(point) = &outcome {
                    current = point.phases;
                }
            }
            outcomes.push(outcome);
        }
        Ok(self.assemble(outcomes))
    }

    /// Parallel sweep over the rayon pool.
    ///
    /// Continuation chains each solve to the previous one, so that strategy
    /// runs sequentially. Either way the result equals [`Self::build`].
    pub fn build_parallel(
        &self,
        temperatures: &[f64],
        chis: &[f64],
        guess: PhasePair,
    ) -> CurveResult<CoexistenceCurve> {
        if self.strategy == GuessStrategy::Continuation {
            return self.build(temperatures, chis, guess);
        }
        check_inputs(temperatures, chis, guess)?;

        let outcomes: Vec<Outcome> = temperatures
            .par_iter()
            .zip(chis.par_iter())
            .enumerate()
            .map(|(index, (&t, &chi))| self.solve_point(index, t, chi, guess))
            .collect();
        Ok(self.assemble(outcomes))
    }

    fn solve_point(&self, index: usize, temperature: f64, chi: f64, guess: PhasePair) -> Outcome {
        let skip = |reason: SkipReason| {
            debug!(index, temperature, chi, reason = %reason, "skipping coexistence point");
            SkippedPoint {
                index,
                temperature,
                chi,
                reason,
            }
        };

        let solution = match self.solver.solve_tangent(chi, guess) {
            Ok(solution) => solution,
            Err(e) => return Err(skip(SkipReason::Solver(e.to_string()))),
        };
        if !solution.converged {
            return Err(skip(SkipReason::NotConverged {
                termination: solution.termination,
                residual: solution.residual_norm,
            }));
        }
        if !solution.is_finite() {
            return Err(skip(SkipReason::NonFinite));
        }
        // The trivial branch near chi_c converges with a residual ~ gap^3, so
        // a small residual alone does not prove a real split.
        let gap = solution.gap();
        let homogeneous = self.solver.critical_chi().is_some_and(|c| chi <= c);
        if gap < self.threshold || homogeneous {
            return Err(skip(SkipReason::NearCritical { gap }));
        }

        Ok(CoexistencePoint {
            temperature,
            chi,
            phases: solution.phases,
        })
    }

    fn assemble(&self, outcomes: Vec<Outcome>) -> CoexistenceCurve {
        let total = outcomes.len();
        let mut curve = CoexistenceCurve::default();
        for outcome in outcomes {
            match outcome {
                Ok(point) => curve.points.push(point),
                Err(skipped) => curve.skipped.push(skipped),
            }
        }
        info!(
            total,
            retained = curve.points.len(),
            skipped = curve.skipped.len(),
            threshold = self.threshold,
            strategy = ?self.strategy,
            "coexistence sweep finished"
        );
        curve
    }
}

fn check_inputs(temperatures: &[f64], chis: &[f64], guess: PhasePair) -> CurveResult<()> {
    if temperatures.len() != chis.len() {
        return Err(CurveError::LengthMismatch {
            temperatures: temperatures.len(),
            chis: chis.len(),
        });
    }
    if !in_open_unit_interval(guess.phi1) || !in_open_unit_interval(guess.phi2) {
        return Err(SolverError::InvalidGuess {
            what: format!("initial guess {guess} must lie inside (0, 1)"),
        }
        .into());
    }
    if guess.phi1 == guess.phi2 {
        return Err(SolverError::InvalidGuess {
            what: format!("initial guess {guess} must hold two distinct fractions"),
        }
        .into());
    }
    Ok(())
}
