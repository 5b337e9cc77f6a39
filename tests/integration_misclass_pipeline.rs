//! Integration tests for the misclassification-adjusted estimator.
//!
//! Purpose
//! -------
//! - Validate the end-to-end pipeline: simulated data with a known truth,
//!   naive and adjusted fits, Wald inference, and the parallel sweep that
//!   aggregates them.
//! - Check the statistical behavior that motivates the adjustment (bias
//!   reduction, interval coverage) on realistic sample sizes.
//!
//! Coverage
//! --------
//! - `regression`: identity correction, degenerate and boundary
//!   measurement settings, error taxonomy at the public entry points.
//! - `simulation` + `sweep`: repeated fits over a grid, per-cell summaries.
//!
//! Exclusions
//! ----------
//! - Low-level building blocks (transforms, option validation, Hessian
//!   policies) are covered by unit tests.
//! - The CLI binary.
use misclass_logit::{
    inference::InferenceError,
    regression::{
        EstimationError, FitOptions, FitStage, InputError, Misclassification,
        MisclassifiedLogit, Observations, fit_adjusted, fit_naive,
    },
    simulation::{SimulationDesign, simulate},
    sweep::{SweepConfig, run_sweep, summarize},
};
use ndarray::array;

const SCENARIO_BETAS: [f64; 6] = [-0.3, 1.5, 0.1, 0.2, 0.1, -0.7];

/// Purpose
/// -------
/// One-cell sweep over `betas` at fixed sensitivity/specificity.
fn one_cell(betas: &[f64], sens: f64, spec: f64, repetitions: usize, seed: u64) -> SweepConfig {
    SweepConfig {
        betas: betas.to_vec(),
        n_obs: 1000,
        sensitivities: vec![sens],
        specificities: vec![spec],
        repetitions,
        seed,
        covariates: Default::default(),
    }
}

fn simulated(betas: &[f64], n_obs: usize, misclass: Misclassification, seed: u64) -> Observations {
    let design = SimulationDesign::new(betas.to_vec(), n_obs).unwrap();
    simulate(&design, &misclass, seed).unwrap().observed
}

#[test]
// Purpose
// -------
// With sensitivity = specificity = 1 the adjusted fit reproduces the naive
// fit.
//
// Given
// -----
// - Five independent data sets of 1000 rows from the six-coefficient
//   scenario, recorded without error.
//
// Expect
// ------
// - Every adjusted coefficient equals its naive counterpart within 1e-6.
fn identity_correction_matches_naive_fit() {
    for seed in 0..5 {
        // Arrange
        let obs = simulated(&SCENARIO_BETAS, 1000, Misclassification::PERFECT, seed);

        // Act
        let naive = fit_naive(&obs, &Default::default()).unwrap();
        let adjusted =
            fit_adjusted(&obs, &Misclassification::PERFECT, &FitOptions::default()).unwrap();

        // Assert
        for (a, n) in adjusted.coefficients.iter().zip(naive.coefficients.iter()) {
            assert!((a - n).abs() < 1e-6, "seed {seed}: adjusted {a} vs naive {n}");
        }
    }
}

#[test]
// Purpose
// -------
// Correcting for misclassification reduces average bias.
//
// Given
// -----
// - The six-coefficient scenario, sens = spec = 0.9, n = 1000, 400
//   repetitions.
//
// Expect
// ------
// - Every non-intercept coefficient: |mean naive bias| > |mean adjusted
//   bias|; no adjusted fit fails.
fn adjusted_fit_has_smaller_bias_than_naive_fit() {
    // Arrange
    let config = one_cell(&SCENARIO_BETAS, 0.9, 0.9, 400, 2024);

    // Act
    let records = run_sweep(&config, &FitOptions::default()).unwrap();
    let summary = summarize(&records, &config.betas).unwrap();

    // Assert
    assert_eq!(summary.len(), SCENARIO_BETAS.len());
    for row in summary.iter().skip(1) {
        assert_eq!(row.failed, 0);
        assert!(
            row.naive_bias.abs() > row.adjusted_bias.abs(),
            "coefficient {}: naive bias {:.4}, adjusted bias {:.4}",
            row.coefficient,
            row.naive_bias,
            row.adjusted_bias
        );
    }
    // The large slope is attenuated markedly by 10% label noise.
    assert!(summary[1].naive_bias < -0.2);
    assert!(summary[1].adjusted_bias.abs() < 0.1);
}

#[test]
// Purpose
// -------
// Bias reduction holds across asymmetric error rates too.
//
// Given
// -----
// - β = (-0.5, 1.0, -0.8), a 2 × 2 grid of sens ∈ {0.8, 0.95},
//   spec ∈ {0.85, 0.95}, 150 repetitions per cell.
//
// Expect
// ------
// - For both slopes in every cell, |adjusted bias| < |naive bias|.
fn bias_reduction_holds_across_grid() {
    let config = SweepConfig {
        betas: vec![-0.5, 1.0, -0.8],
        n_obs: 1000,
        sensitivities: vec![0.8, 0.95],
        specificities: vec![0.85, 0.95],
        repetitions: 150,
        seed: 77,
        covariates: Default::default(),
    };

    let records = run_sweep(&config, &FitOptions::default()).unwrap();
    let summary = summarize(&records, &config.betas).unwrap();

    assert_eq!(records.len(), 4 * 150);
    for row in summary.iter().filter(|r| r.coefficient > 0) {
        assert!(
            row.adjusted_bias.abs() < row.naive_bias.abs(),
            "sens {} spec {} coef {}: naive {:.4}, adjusted {:.4}",
            row.sensitivity,
            row.specificity,
            row.coefficient,
            row.naive_bias,
            row.adjusted_bias
        );
    }
}

#[test]
// Purpose
// -------
// 95% Wald intervals of the adjusted fit have close to nominal coverage
// under a correctly specified model.
//
// Given
// -----
// - β = (-0.5, 1.0, -0.5), sens = 0.9, spec = 0.85, n = 1000, 200
//   repetitions.
//
// Expect
// ------
// - Coverage of each coefficient within [0.90, 1.00].
fn wald_intervals_have_nominal_coverage() {
    // Arrange
    let config = one_cell(&[-0.5, 1.0, -0.5], 0.9, 0.85, 200, 5);

    // Act
    let records = run_sweep(&config, &FitOptions::default()).unwrap();
    let summary = summarize(&records, &config.betas).unwrap();

    // Assert
    for row in &summary {
        assert_eq!(row.without_inference, 0);
        assert!(
            (0.90..=1.0).contains(&row.coverage),
            "coefficient {}: coverage {:.3}",
            row.coefficient,
            row.coverage
        );
    }
}

#[test]
// Purpose
// -------
// Chance-level measurement never yields confident estimates.
//
// Given
// -----
// - The same truth recorded with sens = spec ∈ {0.95, 0.8, 0.65, 0.5}.
//
// Expect
// ------
// - At 0.5 inference is unavailable (`SingularHessian`).
// - Slope standard errors grow as the rates approach 0.5; at 0.65 a failed
//   fit or missing inference is also acceptable.
fn inference_degrades_towards_chance_level() {
    let betas = [-0.2, 1.0];
    let slope_se = |rate: f64| -> Result<f64, EstimationError> {
        let misclass = Misclassification::new(rate, rate).unwrap();
        let obs = simulated(&betas, 2000, misclass, 31);
        let fit = fit_adjusted(&obs, &misclass, &FitOptions::default())?;
        let se = fit.inference()?.std_errors[1];
        Ok(se)
    };

    let se_95 = slope_se(0.95).unwrap();
    let se_80 = slope_se(0.8).unwrap();
    assert!(se_80 > se_95, "se(0.8) = {se_80}, se(0.95) = {se_95}");
    match slope_se(0.65) {
        Ok(se_65) => assert!(se_65 > 2.0 * se_95, "se(0.65) = {se_65}, se(0.95) = {se_95}"),
        Err(
            EstimationError::OptimizationFailure { .. } | EstimationError::SingularHessian { .. },
        ) => {}
        Err(other) => panic!("unexpected error at 0.65: {other}"),
    }

    let chance = Misclassification::new(0.5, 0.5).unwrap();
    let obs = simulated(&betas, 2000, chance, 31);
    let fit = fit_adjusted(&obs, &chance, &FitOptions::default()).unwrap();
    assert!(matches!(fit.inference(), Err(EstimationError::SingularHessian { .. })));
    assert!(matches!(fit.inference, Err(InferenceError::SingularHessian { .. })));
}

#[test]
// Purpose
// -------
// Near-certain predictions with near-perfect measurement stay finite.
//
// Given
// -----
// - Every row with σ(xβ) = 0.99 and sens = spec = 0.99.
// - A simulated data set with a 0.99 base rate, fitted end to end.
//
// Expect
// ------
// - Finite log-likelihood and gradient; the fit either succeeds with finite
//   output or reports an optimization failure.
fn boundary_probabilities_keep_likelihood_finite() {
    let misclass = Misclassification::new(0.99, 0.99).unwrap();
    let logit_99 = (0.99_f64 / 0.01).ln();
    let obs = Observations::with_intercept(
        array![[0.0], [0.0], [0.0], [0.0]],
        array![1.0, 1.0, 1.0, 0.0],
    )
    .unwrap();
    let model = MisclassifiedLogit::new(misclass);
    let beta = array![logit_99, 3.0];

    let ll = model.total(&beta, &obs).unwrap();
    let q = model.observed_probabilities(&beta, &obs).unwrap();
    assert!(ll.is_finite() && ll < 0.0);
    assert!(q.iter().all(|p| (p - (0.99 * 0.99 + 0.01 * 0.01)).abs() < 1e-12));

    let sim = simulated(&[logit_99, 0.5], 1000, misclass, 3);
    match fit_adjusted(&sim, &misclass, &FitOptions::default()) {
        Ok(fit) => {
            assert!(fit.log_likelihood.is_finite());
            assert!(fit.coefficients.iter().all(|b| b.is_finite()));
        }
        Err(EstimationError::OptimizationFailure { stage: FitStage::Adjusted, .. }) => {}
        Err(other) => panic!("unexpected error: {other}"),
    }
}

#[test]
// Purpose
// -------
// Malformed inputs are rejected before any optimization.
fn invalid_inputs_are_reported_as_such() {
    let rates = Misclassification::new(0.0, 0.9).map_err(EstimationError::from);
    let shapes = Observations::new(array![[1.0, 0.0], [1.0, 1.0]], array![1.0]);
    let outcome = Observations::with_intercept(array![[0.3], [0.1]], array![1.0, 0.5]);

    assert!(matches!(rates, Err(EstimationError::InvalidInput(InputError::InvalidRate { .. }))));
    assert_eq!(shapes, Err(InputError::LengthMismatch { rows: 2, outcomes: 1 }));
    assert!(matches!(outcome, Err(InputError::InvalidOutcome { index: 1, .. })));
}

#[test]
// Purpose
// -------
// A rank-deficient design is a `SingularDesign` error from both fits.
fn collinear_design_is_singular() {
    let x = array![[0.1, 0.2], [0.5, 1.0], [-1.0, -2.0], [2.0, 4.0], [0.3, 0.6]];
    let obs = Observations::with_intercept(x, array![0.0, 1.0, 0.0, 1.0, 1.0]).unwrap();
    let misclass = Misclassification::new(0.9, 0.9).unwrap();

    let naive = fit_naive(&obs, &Default::default()).unwrap_err();
    let adjusted = fit_adjusted(&obs, &misclass, &FitOptions::default()).unwrap_err();

    assert!(matches!(naive, EstimationError::SingularDesign { .. }));
    assert!(matches!(adjusted, EstimationError::SingularDesign { .. }));
}
