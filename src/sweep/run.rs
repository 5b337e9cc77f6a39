//! Parallel execution of a sweep.
use crate::{
    inference::WaldInference,
    regression::{
        core::options::FitOptions,
        errors::EstimationResult,
        models::{adjusted::fit_adjusted, naive::fit_naive},
    },
    simulation::{design::SimulationDesign, draw::simulate},
    sweep::config::{GridCell, SweepConfig},
};
use log::{debug, info, warn};
use ndarray::Array1;
use rayon::prelude::*;

/// Outcome of one (cell, repetition) task.
///
/// `adjusted` is set only for converged adjusted fits; `inference` only when
/// their covariance was available. `error` describes whatever is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepRecord {
    pub cell: GridCell,
    pub repetition: usize,
    pub seed: u64,
    pub naive: Option<Array1<f64>>,
    pub adjusted: Option<Array1<f64>>,
    pub inference: Option<WaldInference>,
    pub error: Option<String>,
}

impl SweepRecord {
    /// `Some(true)` when the adjusted interval for coefficient `j` contains
    /// `value`; `None` without inference.
    pub fn covers(&self, j: usize, value: f64) -> Option<bool> {
        self.inference.as_ref().map(|inf| inf.covers(j, value))
    }
}

/// Simulate and fit every grid cell `repetitions` times.
///
/// Tasks are independent and run on the rayon pool. The result is ordered
/// by cell (sensitivity-major), then repetition, and each task draws its
/// data from a seed derived from `(config.seed, cell, repetition)`, so the
/// output does not depend on the number of threads.
///
/// Fit failures are recorded per task. Only an invalid configuration is an
/// error.
///
/// # Errors
/// [`EstimationError::InvalidInput`](crate::regression::EstimationError::InvalidInput)
/// for an invalid `config`.
pub fn run_sweep(config: &SweepConfig, opts: &FitOptions) -> EstimationResult<Vec<SweepRecord>> {
    config.validate()?;
    let design = config.design();
    let tasks: Vec<(GridCell, usize)> = config
        .cells()?
        .into_iter()
        .flat_map(|cell| (0..config.repetitions).map(move |rep| (cell, rep)))
        .collect();
    info!(
        "running {} fits ({} cells × {} repetitions, n = {})",
        tasks.len(),
        tasks.len() / config.repetitions,
        config.repetitions,
        config.n_obs
    );

    tasks
        .par_iter()
        .map(|&(cell, rep)| {
            run_task(&design, cell, rep, task_seed(config.seed, cell.index, rep), opts)
        })
        .collect()
}

/// Seed of one task: SplitMix64 over the base seed, cell and repetition.
pub fn task_seed(seed: u64, cell: usize, repetition: usize) -> u64 {
    let mut z = seed;
    for part in [cell as u64, repetition as u64] {
        z = splitmix64(z ^ splitmix64(part));
    }
    z
}

// ---- Helper methods ----

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn run_task(
    design: &SimulationDesign, cell: GridCell, repetition: usize, seed: u64, opts: &FitOptions,
) -> EstimationResult<SweepRecord> {
    let data = simulate(design, &cell.misclass, seed)?;
    let mut record = SweepRecord {
        cell,
        repetition,
        seed,
        naive: None,
        adjusted: None,
        inference: None,
        error: None,
    };

    match fit_adjusted(&data.observed, &cell.misclass, opts) {
        Ok(fit) => {
            match fit.inference() {
                Ok(inf) => record.inference = Some(inf.clone()),
                Err(e) => record.error = Some(e.to_string()),
            }
            record.naive = Some(fit.naive.coefficients);
            record.adjusted = Some(fit.coefficients);
        }
        Err(e) => {
            warn!("cell {} rep {repetition}: {e}", cell.index);
            record.naive = fit_naive(&data.observed, &opts.irls).ok().map(|f| f.coefficients);
            record.error = Some(e.to_string());
        }
    }
    debug!("cell {} rep {repetition} done", cell.index);
    Ok(record)
}
