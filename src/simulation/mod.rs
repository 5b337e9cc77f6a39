//! simulation — synthetic data sets with a known truth.
//!
//! Covariates are drawn from a [`CovariateLaw`], the latent outcome from the
//! logistic model, and the recorded outcome by relabeling the latent one
//! with given sensitivity and specificity. Everything is driven by a seeded
//! `StdRng`, so a (design, seed) pair always yields the same data.

pub mod design;
pub mod draw;

pub use self::design::{CovariateLaw, SimulationDesign};
pub use self::draw::{SimulatedData, simulate};
