//! Per-cell aggregation of sweep records.
use crate::{regression::errors::InputError, sweep::run::SweepRecord};
use ndarray::Array1;
use serde::Serialize;
use std::collections::BTreeMap;

/// Bias and coverage of one coefficient in one grid cell.
///
/// Means are over the records where the quantity exists and are `NaN` when
/// none do.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellSummary {
    pub cell: usize,
    pub sensitivity: f64,
    pub specificity: f64,
    pub coefficient: usize,
    pub true_value: f64,
    pub naive_bias: f64,
    pub adjusted_bias: f64,
    pub mean_std_error: f64,
    /// Share of intervals containing `true_value`.
    pub coverage: f64,
    pub repetitions: usize,
    /// Adjusted fits that failed outright.
    pub failed: usize,
    /// Converged adjusted fits without inference.
    pub without_inference: usize,
}

/// One summary row per (cell, coefficient), ordered by cell then
/// coefficient.
///
/// # Errors
/// [`InputError::CoefficientLength`] when a record's coefficient, standard
/// error or interval vector does not have `true_betas.len()` entries.
pub fn summarize(
    records: &[SweepRecord], true_betas: &[f64],
) -> Result<Vec<CellSummary>, InputError> {
    for record in records {
        check_record_length(record, true_betas.len())?;
    }
    let mut by_cell: BTreeMap<usize, Vec<&SweepRecord>> = BTreeMap::new();
    for record in records {
        by_cell.entry(record.cell.index).or_default().push(record);
    }

    let mut rows = Vec::with_capacity(by_cell.len() * true_betas.len());
    for (cell, group) in by_cell {
        let misclass = group[0].cell.misclass;
        let failed = group.iter().filter(|r| r.adjusted.is_none()).count();
        let without_inference =
            group.iter().filter(|r| r.adjusted.is_some() && r.inference.is_none()).count();

        for (j, &truth) in true_betas.iter().enumerate() {
            let naive_bias =
                mean(group.iter().filter_map(|r| r.naive.as_ref().map(|b| b[j] - truth)));
            let adjusted_bias =
                mean(group.iter().filter_map(|r| r.adjusted.as_ref().map(|b| b[j] - truth)));
            let mean_std_error =
                mean(group.iter().filter_map(|r| r.inference.as_ref().map(|inf| inf.std_errors[j])));
            let coverage = mean(
                group
                    .iter()
                    .filter_map(|r| r.covers(j, truth))
                    .map(|hit| if hit { 1.0 } else { 0.0 }),
            );
            rows.push(CellSummary {
                cell,
                sensitivity: misclass.sensitivity(),
                specificity: misclass.specificity(),
                coefficient: j,
                true_value: truth,
                naive_bias,
                adjusted_bias,
                mean_std_error,
                coverage,
                repetitions: group.len(),
                failed,
                without_inference,
            });
        }
    }
    Ok(rows)
}

/// Flat view of a record for CSV output: one row per coefficient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordRow {
    pub cell: usize,
    pub sensitivity: f64,
    pub specificity: f64,
    pub repetition: usize,
    pub seed: u64,
    pub coefficient: usize,
    pub naive: Option<f64>,
    pub adjusted: Option<f64>,
    pub std_error: Option<f64>,
    pub ci_lower: Option<f64>,
    pub ci_upper: Option<f64>,
    pub error: Option<String>,
}

impl SweepRecord {
    /// Entries missing from shorter vectors come out as `None`.
    pub fn rows(&self, n_coef: usize) -> Vec<RecordRow> {
        let at = |v: Option<&Array1<f64>>, j: usize| v.and_then(|v| v.get(j).copied());
        let inf = self.inference.as_ref();
        (0..n_coef)
            .map(|j| RecordRow {
                cell: self.cell.index,
                sensitivity: self.cell.misclass.sensitivity(),
                specificity: self.cell.misclass.specificity(),
                repetition: self.repetition,
                seed: self.seed,
                coefficient: j,
                naive: at(self.naive.as_ref(), j),
                adjusted: at(self.adjusted.as_ref(), j),
                std_error: at(inf.map(|i| &i.std_errors), j),
                ci_lower: at(inf.map(|i| &i.ci_lower), j),
                ci_upper: at(inf.map(|i| &i.ci_upper), j),
                error: self.error.clone(),
            })
            .collect()
    }
}

// ---- Helper methods ----

fn check_record_length(record: &SweepRecord, expected: usize) -> Result<(), InputError> {
    let inf = record.inference.as_ref();
    let lengths = [
        record.naive.as_ref().map(|b| b.len()),
        record.adjusted.as_ref().map(|b| b.len()),
        inf.map(|i| i.std_errors.len()),
        inf.map(|i| i.ci_lower.len()),
        inf.map(|i| i.ci_upper.len()),
    ];
    match lengths.into_iter().flatten().find(|&len| len != expected) {
        Some(actual) => Err(InputError::CoefficientLength { expected, actual }),
        None => Ok(()),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 { f64::NAN } else { sum / count as f64 }
}
