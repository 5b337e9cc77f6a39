//! Sweep configuration.
use crate::{
    regression::{core::misclass::Misclassification, errors::InputError},
    simulation::design::{CovariateLaw, SimulationDesign},
    sweep::errors::SweepResult,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Grid of measurement-error settings, repeated `repetitions` times each.
///
/// ```toml
/// betas = [-0.3, 1.5, 0.1, 0.2, 0.1, -0.7]
/// n_obs = 1000
/// sensitivities = [0.8, 0.9, 1.0]
/// specificities = [0.8, 0.9, 1.0]
/// repetitions = 100
/// seed = 2024
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    pub betas: Vec<f64>,
    pub n_obs: usize,
    pub sensitivities: Vec<f64>,
    pub specificities: Vec<f64>,
    pub repetitions: usize,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub covariates: CovariateLaw,
}

/// One (sensitivity, specificity) point of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    /// Position in sensitivity-major order.
    pub index: usize,
    pub sens_index: usize,
    pub spec_index: usize,
    pub misclass: Misclassification,
}

impl SweepConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    /// [`SweepError::TomlParse`](crate::sweep::SweepError::TomlParse) or
    /// [`SweepError::InvalidConfig`](crate::sweep::SweepError::InvalidConfig).
    pub fn from_toml_str(text: &str) -> SweepResult<Self> {
        let config: SweepConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// I/O errors, then as [`SweepConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> SweepResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// # Errors
    /// The first invalid field as an [`InputError`].
    pub fn validate(&self) -> Result<(), InputError> {
        self.design().validate()?;
        if self.sensitivities.is_empty() {
            return Err(InputError::InvalidOption {
                option: "sensitivities",
                reason: "grid must not be empty",
            });
        }
        if self.specificities.is_empty() {
            return Err(InputError::InvalidOption {
                option: "specificities",
                reason: "grid must not be empty",
            });
        }
        if self.repetitions == 0 {
            return Err(InputError::InvalidOption {
                option: "repetitions",
                reason: "must be greater than zero",
            });
        }
        self.cells().map(|_| ())
    }

    pub fn design(&self) -> SimulationDesign {
        SimulationDesign {
            betas: self.betas.clone(),
            n_obs: self.n_obs,
            covariates: self.covariates,
        }
    }

    /// Grid cells in sensitivity-major order.
    ///
    /// # Errors
    /// [`InputError::InvalidRate`] for a grid value outside `(0, 1]`.
    pub fn cells(&self) -> Result<Vec<GridCell>, InputError> {
        let n_spec = self.specificities.len();
        let mut cells = Vec::with_capacity(self.sensitivities.len() * n_spec);
        for (sens_index, &sens) in self.sensitivities.iter().enumerate() {
            for (spec_index, &spec) in self.specificities.iter().enumerate() {
                cells.push(GridCell {
                    index: sens_index * n_spec + spec_index,
                    sens_index,
                    spec_index,
                    misclass: Misclassification::new(sens, spec)?,
                });
            }
        }
        Ok(cells)
    }

    pub fn n_tasks(&self) -> usize {
        self.sensitivities.len() * self.specificities.len() * self.repetitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::errors::SweepError;
    use std::io::Write;

    const EXAMPLE: &str = r#"
        betas = [-0.3, 1.5]
        n_obs = 100
        sensitivities = [0.8, 1.0]
        specificities = [0.7, 0.9, 1.0]
        repetitions = 4
        seed = 9
    "#;

    #[test]
    // Purpose
    // -------
    // A TOML config parses, validates and enumerates its grid.
    //
    // Given
    // -----
    // - Two sensitivities × three specificities, four repetitions.
    //
    // Expect
    // ------
    // - Six cells in sensitivity-major order and 24 tasks.
    fn from_toml_str_enumerates_grid() {
        // Act
        let config = SweepConfig::from_toml_str(EXAMPLE).unwrap();
        let cells = config.cells().unwrap();

        // Assert
        assert_eq!(cells.len(), 6);
        assert_eq!(config.n_tasks(), 24);
        assert_eq!((cells[4].sens_index, cells[4].spec_index, cells[4].index), (1, 1, 4));
        assert_eq!(cells[4].misclass, Misclassification::new(1.0, 0.9).unwrap());
        assert_eq!(config.covariates, CovariateLaw::StandardNormal);
    }

    #[test]
    fn invalid_grids_are_rejected() {
        let bad_rate = EXAMPLE.replace("[0.8, 1.0]", "[0.8, 1.2]");
        let empty = EXAMPLE.replace("[0.7, 0.9, 1.0]", "[]");
        let no_reps = EXAMPLE.replace("repetitions = 4", "repetitions = 0");

        assert!(matches!(
            SweepConfig::from_toml_str(&bad_rate),
            Err(SweepError::InvalidConfig(InputError::InvalidRate { name: "sensitivity", .. }))
        ));
        assert!(matches!(
            SweepConfig::from_toml_str(&empty),
            Err(SweepError::InvalidConfig(InputError::InvalidOption { option: "specificities", .. }))
        ));
        assert!(matches!(
            SweepConfig::from_toml_str(&no_reps),
            Err(SweepError::InvalidConfig(InputError::InvalidOption { option: "repetitions", .. }))
        ));
    }

    #[test]
    fn unknown_keys_and_missing_files_are_errors() {
        let typo = format!("{EXAMPLE}\nrepetition = 3\n");

        assert!(matches!(SweepConfig::from_toml_str(&typo), Err(SweepError::TomlParse(_))));
        assert!(matches!(
            SweepConfig::load("/nonexistent/sweep.toml"),
            Err(SweepError::Io(_))
        ));
    }

    #[test]
    fn load_reads_config_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXAMPLE.as_bytes()).unwrap();

        let config = SweepConfig::load(file.path()).unwrap();

        assert_eq!(config.seed, 9);
        assert_eq!(config.betas, vec![-0.3, 1.5]);
    }
}
