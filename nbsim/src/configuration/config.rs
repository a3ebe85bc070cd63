//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`ParametersConfig`] – time step, run length and physical constants
//! - [`BodyConfig`]       – initial state for each explicit body
//! - [`RandomConfig`]     – optional seeded generator for extra bodies
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! parameters:
//!   h0: 3600.0              # time step dt
//!   steps: 744              # or `t_end: 2678400.0`
//!   G: 6.674e-11            # optional, defaults to the SI value
//!   eps2: 0.0               # optional softening epsilon^2
//!   workers: 1              # optional force-computation threads
//!
//! bodies:
//!   - x: [ 0.0, 0.0, 0.0 ]
//!     v: [ 0.0, 0.0, 0.0 ]
//!     m: 5.97e24
//!   - x: [ 3.84e8, 0.0, 0.0 ]
//!     v: [ 0.0, 1022.0, 0.0 ]
//!     m: 7.35e22
//! ```
//!
//! The scenario builder maps this into the runtime types and validates it.

use serde::Deserialize;

use crate::simulation::params::GRAVITATIONAL_CONSTANT;

fn default_g() -> f64 {
    GRAVITATIONAL_CONSTANT
}

fn default_workers() -> usize {
    1
}

/// Global numerical and physical parameters for a scenario
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub h0: f64, // time step size
    #[serde(default)]
    pub steps: Option<usize>, // number of steps; wins over t_end
    #[serde(default)]
    pub t_end: Option<f64>, // total simulated duration
    #[serde(default = "default_g")]
    pub G: f64, // gravitational constant
    #[serde(default)]
    pub eps2: f64, // softening - 0 keeps zero separation a hard error
    #[serde(default = "default_workers")]
    pub workers: usize, // threads for the force computation
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub x: Vec<f64>, // Initial position vector `x` in simulation units
    pub v: Vec<f64>, // Initial velocity vector `v` in simulation units per time unit
    pub m: f64,      // Mass of the body
}

/// Seeded random initial conditions
#[derive(Deserialize, Debug, Clone)]
pub struct RandomConfig {
    pub count: usize, // number of generated bodies
    #[serde(default = "RandomConfig::default_seed")]
    pub seed: u64,
    #[serde(default = "RandomConfig::default_mass_max")]
    pub mass_max: f64, // masses drawn from (0, mass_max)
    #[serde(default = "RandomConfig::default_velocity_max")]
    pub velocity_max: f64, // velocity components drawn from [0, velocity_max)
    #[serde(default = "RandomConfig::default_extent")]
    pub extent: f64, // positions drawn from [0, extent)^3
}

impl RandomConfig {
    fn default_seed() -> u64 {
        1547
    }
    fn default_mass_max() -> f64 {
        1.0e9
    }
    fn default_velocity_max() -> f64 {
        1.5
    }
    fn default_extent() -> f64 {
        50.0
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub parameters: ParametersConfig, // Global numerical and physical parameters
    #[serde(default)]
    pub bodies: Vec<BodyConfig>, // Explicit initial bodies, kept in order
    #[serde(default)]
    pub random: Option<RandomConfig>, // Generated bodies appended after `bodies`
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_reader(reader)
    }
}
