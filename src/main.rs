//! `misclass-sweep`: run a misclassification simulation sweep from a TOML
//! config and report per-cell bias and coverage.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use misclass_logit::{
    inference::HessianPolicy,
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
    regression::{CovarianceKind, FitOptions},
    sweep::{CellSummary, SweepConfig, SweepRecord, run_sweep, summarize},
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "misclass-sweep")]
#[command(about = "Simulate and compare naive vs misclassification-adjusted logistic fits", long_about = None)]
#[command(version)]
struct Cli {
    /// Sweep configuration (TOML)
    #[arg(long)]
    config: PathBuf,

    /// Write the per-cell summary as CSV
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write one CSV row per task and coefficient
    #[arg(long)]
    records: Option<PathBuf>,

    /// Worker threads (default: all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// L-BFGS iteration cap for the adjusted fit
    #[arg(long)]
    max_iter: Option<usize>,

    /// Line search inside L-BFGS: `more-thuente` or `hager-zhang`
    #[arg(long, value_parser = parse_line_search)]
    line_search: Option<LineSearcher>,

    /// Sandwich standard errors instead of inverse information
    #[arg(long)]
    robust: bool,

    /// Floor small Hessian eigenvalues at this multiple of the largest
    /// instead of reporting inference as unavailable
    #[arg(long)]
    eigen_floor: Option<f64>,

    /// Log every L-BFGS iteration (needs the `obs_slog` feature)
    #[arg(long)]
    trace_optimizer: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    if let Some(reason) = trace_unavailable(&cli) {
        warn!("{reason}");
    }

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure the thread pool")?;
    }

    let config = SweepConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let opts = fit_options(&cli)?;

    let records = run_sweep(&config, &opts)?;
    let summary = summarize(&records, &config.betas)?;
    print_summary(&summary);

    if let Some(path) = &cli.output {
        write_csv(path, &summary)?;
        info!("wrote summary to {}", path.display());
    }
    if let Some(path) = &cli.records {
        let rows: Vec<_> =
            records.iter().flat_map(|r: &SweepRecord| r.rows(config.betas.len())).collect();
        write_csv(path, &rows)?;
        info!("wrote {} record rows to {}", rows.len(), path.display());
    }
    Ok(())
}

fn fit_options(cli: &Cli) -> Result<FitOptions> {
    let mut opts = FitOptions::default();
    let defaults = MLEOptions::default();
    let tols = match cli.max_iter {
        Some(max_iter) => {
            Tolerances::new(defaults.tols.tol_grad, defaults.tols.tol_cost, Some(max_iter))?
        }
        None => defaults.tols,
    };
    let line_searcher = cli.line_search.unwrap_or(defaults.line_searcher);
    opts.mle = MLEOptions::new(tols, line_searcher, defaults.lbfgs_mem)?
        .with_verbose(cli.trace_optimizer);
    if cli.robust {
        opts.covariance = CovarianceKind::Robust;
    }
    if let Some(floor) = cli.eigen_floor {
        opts.hessian_policy = HessianPolicy::clamp(floor)?;
    }
    Ok(opts)
}

fn parse_line_search(name: &str) -> Result<LineSearcher, String> {
    name.parse::<LineSearcher>().map_err(|e| e.to_string())
}

/// Iteration tracing needs the `obs_slog` observer compiled in.
fn trace_unavailable(cli: &Cli) -> Option<&'static str> {
    (cli.trace_optimizer && !cfg!(feature = "obs_slog"))
        .then_some("--trace-optimizer has no effect: built without the `obs_slog` feature")
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn print_summary(rows: &[CellSummary]) {
    println!(
        "{:>6} {:>6} {:>5} {:>8} {:>11} {:>11} {:>9} {:>8} {:>6}",
        "sens", "spec", "coef", "true", "naive_bias", "adj_bias", "mean_se", "coverage", "failed"
    );
    for r in rows {
        println!(
            "{:>6.3} {:>6.3} {:>5} {:>8.3} {:>11.4} {:>11.4} {:>9.4} {:>8.3} {:>6}",
            r.sensitivity,
            r.specificity,
            r.coefficient,
            r.true_value,
            r.naive_bias,
            r.adjusted_bias,
            r.mean_std_error,
            r.coverage,
            r.failed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Result<Cli, clap::Error> {
        let base = ["misclass-sweep", "--config", "sweep.toml"];
        Cli::try_parse_from(base.iter().chain(args).copied())
    }

    #[test]
    // Purpose
    // -------
    // `--line-search` selects the L-BFGS line search and rejects unknown
    // names at parse time.
    //
    // Given
    // -----
    // - `hager-zhang`, `MoreThuente`, `bfgs`, and no flag at all.
    //
    // Expect
    // ------
    // - The named searcher ends up in the fit options; `bfgs` is a parse
    //   error; the default stays `MoreThuente` with the default iteration cap.
    fn line_search_flag_reaches_fit_options() {
        // Act
        let hz = fit_options(&cli(&["--line-search", "hager-zhang"]).unwrap()).unwrap();
        let mt = fit_options(&cli(&["--line-search", "MoreThuente"]).unwrap()).unwrap();
        let unknown = cli(&["--line-search", "bfgs"]);
        let default = fit_options(&cli(&[]).unwrap()).unwrap();

        // Assert
        assert_eq!(hz.mle.line_searcher, LineSearcher::HagerZhang);
        assert_eq!(mt.mle.line_searcher, LineSearcher::MoreThuente);
        assert!(unknown.is_err());
        assert_eq!(default.mle, MLEOptions::default());
    }

    #[test]
    // Purpose
    // -------
    // Flags compose: iteration cap, line search and tracing together.
    fn fit_options_combine_flags() {
        let args = cli(&["--max-iter", "40", "--line-search", "hagerzhang", "--trace-optimizer"]);

        let opts = fit_options(&args.unwrap()).unwrap();

        assert_eq!(opts.mle.tols.max_iter, Some(40));
        assert_eq!(opts.mle.line_searcher, LineSearcher::HagerZhang);
        assert!(opts.mle.verbose);
    }

    #[test]
    // Purpose
    // -------
    // Asking for iteration traces in a build that cannot produce them is
    // reported.
    //
    // Given
    // -----
    // - `--trace-optimizer`, and no flag.
    //
    // Expect
    // ------
    // - A reason exactly when the `obs_slog` feature is off; never without
    //   the flag.
    fn trace_flag_without_observer_is_reported() {
        let traced = trace_unavailable(&cli(&["--trace-optimizer"]).unwrap());
        let quiet = trace_unavailable(&cli(&[]).unwrap());

        assert_eq!(traced.is_some(), !cfg!(feature = "obs_slog"));
        if let Some(reason) = traced {
            assert!(reason.contains("obs_slog"));
        }
        assert_eq!(quiet, None);
    }
}
