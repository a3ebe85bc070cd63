//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime bundle
//! containing:
//! - numerical parameters (`Parameters`)
//! - system state (`System` with bodies at t = 0)
//!
//! Everything is validated here, so a built `Scenario` always turns into a
//! `Simulation` unless the worker pool cannot be created.

use std::collections::HashSet;

use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::configuration::config::{BodyConfig, ParametersConfig, RandomConfig, ScenarioConfig};
use crate::error::SimError;
use crate::simulation::engine::Simulation;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, System, NVec3};

#[derive(Debug, Clone)]
pub struct Scenario {
    pub parameters: Parameters,
    pub system: System,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, SimError> {
        let parameters = build_parameters(&cfg.parameters)?;

        // Bodies: map `BodyConfig` -> runtime `Body` using nalgebra vectors
        let mut bodies = cfg
            .bodies
            .iter()
            .enumerate()
            .map(|(i, bc)| build_body(i, bc))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(random) = &cfg.random {
            let taken: Vec<NVec3> = bodies.iter().map(|b| b.x).collect();
            bodies.extend(random_bodies(random, &taken)?);
        }

        // Initial system state: bodies at t = 0
        let system = System::new(bodies);
        system.validate()?;

        info!(
            "scenario built: {} bodies, {} steps, dt = {}, G = {}",
            system.len(),
            parameters.steps,
            parameters.h0,
            parameters.G
        );

        Ok(Self { parameters, system })
    }

    pub fn into_simulation(self) -> Result<Simulation, SimError> {
        Simulation::new(self.system.bodies, self.parameters)
    }
}

fn build_parameters(p_cfg: &ParametersConfig) -> Result<Parameters, SimError> {
    let steps = match (p_cfg.steps, p_cfg.t_end) {
        (Some(steps), Some(t_end)) => {
            warn!("both steps ({steps}) and t_end ({t_end}) given, using steps");
            steps
        }
        (Some(steps), None) => steps,
        (None, Some(t_end)) => Parameters::steps_for_duration(t_end, p_cfg.h0)?,
        (None, None) => {
            return Err(SimError::InvalidConfiguration(
                "parameters need either `steps` or `t_end`".to_string(),
            ));
        }
    };

    let parameters = Parameters {
        h0: p_cfg.h0,
        steps,
        G: p_cfg.G,
        eps2: p_cfg.eps2,
        workers: p_cfg.workers,
    };
    parameters.validate()?;
    Ok(parameters)
}

fn build_body(i: usize, bc: &BodyConfig) -> Result<Body, SimError> {
    let x = vec3(i, "x", &bc.x)?;
    let v = vec3(i, "v", &bc.v)?;
    Body::new(x, v, bc.m).map_err(|e| match e {
        SimError::InvalidConfiguration(msg) => SimError::InvalidConfiguration(format!("body {i}: {msg}")),
        other => other,
    })
}

fn vec3(i: usize, name: &str, c: &[f64]) -> Result<NVec3, SimError> {
    match c {
        [x, y, z] => Ok(NVec3::new(*x, *y, *z)),
        _ => Err(SimError::InvalidConfiguration(format!(
            "body {i}: `{name}` needs 3 components, got {}",
            c.len()
        ))),
    }
}

/// Generate `cfg.count` bodies from `cfg.seed`
///
/// Positions are distinct from each other and from `taken`.
pub fn random_bodies(cfg: &RandomConfig, taken: &[NVec3]) -> Result<Vec<Body>, SimError> {
    if !(cfg.mass_max.is_finite() && cfg.mass_max > 0.0) {
        return Err(SimError::InvalidConfiguration(format!(
            "random.mass_max must be finite and > 0, got {}", cfg.mass_max
        )));
    }
    if !(cfg.extent.is_finite() && cfg.extent > 0.0) {
        return Err(SimError::InvalidConfiguration(format!(
            "random.extent must be finite and > 0, got {}", cfg.extent
        )));
    }
    if !(cfg.velocity_max.is_finite() && cfg.velocity_max >= 0.0) {
        return Err(SimError::InvalidConfiguration(format!(
            "random.velocity_max must be finite and >= 0, got {}", cfg.velocity_max
        )));
    }

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut occupied: HashSet<[u64; 3]> = taken.iter().map(bits).collect();
    let mut bodies = Vec::with_capacity(cfg.count);

    for _ in 0..cfg.count {
        let x = loop {
            let p = NVec3::new(
                rng.gen_range(0.0..cfg.extent),
                rng.gen_range(0.0..cfg.extent),
                rng.gen_range(0.0..cfg.extent),
            );
            if occupied.insert(bits(&p)) {
                break p;
            }
        };

        let m = rng.gen_range(0.0..cfg.mass_max).max(f64::MIN_POSITIVE);

        let v = if cfg.velocity_max > 0.0 {
            NVec3::new(
                rng.gen_range(0.0..cfg.velocity_max),
                rng.gen_range(0.0..cfg.velocity_max),
                rng.gen_range(0.0..cfg.velocity_max),
            )
        } else {
            NVec3::zeros()
        };

        bodies.push(Body { x, v, m });
    }

    Ok(bodies)
}

fn bits(p: &NVec3) -> [u64; 3] {
    [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]
}
