//! Configuration types for the simulation.

use crate::{Error, Result, Species};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Simulation run parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of rows in the field
    pub depth: usize,
    /// Number of columns in the field
    pub width: usize,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Number of steps to run
    pub num_steps: u64,
    /// Probability that a fox is created in any given cell when populating
    pub fox_creation_probability: f64,
    /// Probability that a rabbit is created in any given cell when populating
    pub rabbit_creation_probability: f64,
    /// Steps between population log lines
    pub log_interval: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            depth: 80,
            width: 120,
            seed: 0,
            num_steps: 4000,
            fox_creation_probability: 0.02,
            rabbit_creation_probability: 0.08,
            log_interval: 100,
        }
    }
}

impl SimulationConfig {
    /// Load a configuration from a JSON file. Missing keys take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        debug!(path = %path.display(), "Loaded simulation config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 || self.width == 0 {
            return Err(Error::Validation(format!(
                "Field must have positive dimensions, got {}x{}",
                self.depth, self.width
            )));
        }

        match self.depth.checked_mul(self.width) {
            Some(cells) if cells <= MAX_FIELD_CELLS => {}
            _ => {
                return Err(Error::Validation(format!(
                    "Field of {}x{} exceeds the {} cell limit",
                    self.depth, self.width, MAX_FIELD_CELLS
                )));
            }
        }

        for (name, p) in [
            ("fox_creation_probability", self.fox_creation_probability),
            ("rabbit_creation_probability", self.rabbit_creation_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::Validation(format!(
                    "{} must be within [0, 1], got {}",
                    name, p
                )));
            }
        }

        if self.fox_creation_probability + self.rabbit_creation_probability > 1.0 {
            return Err(Error::Validation(
                "Combined creation probabilities exceed 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Per-species constants governing age and reproduction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreedingRules {
    /// Age at which breeding becomes possible
    pub breeding_age: u32,
    /// Oldest age an individual survives; one more birthday is fatal
    pub max_age: u32,
    /// Chance of a litter on any step once of breeding age
    pub breeding_probability: f64,
    /// Upper bound on births per litter
    pub max_litter_size: u32,
}

impl BreedingRules {
    pub const RABBIT: BreedingRules = BreedingRules {
        breeding_age: 5,
        max_age: 40,
        breeding_probability: 0.12,
        max_litter_size: 4,
    };

    pub const FOX: BreedingRules = BreedingRules {
        breeding_age: 15,
        max_age: 150,
        breeding_probability: 0.08,
        max_litter_size: 2,
    };

    pub fn for_species(species: Species) -> &'static BreedingRules {
        match species {
            Species::Rabbit => &Self::RABBIT,
            Species::Fox => &Self::FOX,
        }
    }

    pub fn can_breed(&self, age: u32) -> bool {
        age >= self.breeding_age
    }
}

/// Food value of a single rabbit; also the number of steps a fox can go
/// before it has to eat again.
pub const RABBIT_FOOD_VALUE: u32 = 9;

/// Largest field accepted by [`SimulationConfig::validate`], in cells.
pub const MAX_FIELD_CELLS: usize = 1 << 24;

/// Layer every species currently occupies.
pub const DEFAULT_LAYER: u8 = 1;
