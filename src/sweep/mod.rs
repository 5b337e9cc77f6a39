//! sweep — repeated simulate-and-fit over a grid of measurement errors.
//!
//! Purpose
//! -------
//! Study the naive and adjusted estimators under known truth: for every
//! (sensitivity, specificity) pair in a [`SweepConfig`], simulate
//! `repetitions` data sets, fit both estimators, and aggregate bias and
//! interval coverage with [`summarize`].
//!
//! Key behaviors
//! -------------
//! - [`run_sweep`] is a pure function of its inputs. Tasks share no mutable
//!   state and run on the rayon pool.
//! - Output order and contents do not depend on scheduling or thread count.
//! - A failed fit is recorded in its [`SweepRecord`] and does not abort the
//!   sweep.

pub mod config;
pub mod errors;
pub mod run;
pub mod summary;

pub use self::config::{GridCell, SweepConfig};
pub use self::errors::{SweepError, SweepResult};
pub use self::run::{SweepRecord, run_sweep, task_seed};
pub use self::summary::{CellSummary, RecordRow, summarize};
