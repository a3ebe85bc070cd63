//! Run summary written next to the trajectory export
//!
//! Carries the run metadata (body count, steps, dt, first reported step,
//! workers, wall time), the masses, the final state and the conservation
//! drift, serialized as YAML.

use std::io::Write;

use serde::Serialize;

use crate::simulation::diagnostics::{relative_drift, total_energy, total_momentum};
use crate::simulation::params::Parameters;
use crate::simulation::states::Body;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub bodies: usize,
    pub steps: usize,
    pub dt: f64,
    pub start: usize,
    pub workers: usize,
    pub simulated_time: f64,
    pub execution_seconds: f64,
    pub masses: Vec<f64>,
    pub final_positions: Vec<[f64; 3]>,
    pub final_velocities: Vec<[f64; 3]>,
    pub momentum_drift: f64, // |P - P0|
    pub energy_drift: f64, // |E - E0| / |E0|
}

impl RunReport {
    pub fn new(
        parameters: &Parameters,
        start: usize,
        initial: &[Body],
        last: &[Body],
        steps: usize,
        execution_seconds: f64,
    ) -> Self {
        let e0 = total_energy(initial, parameters.G, parameters.eps2);
        let e1 = total_energy(last, parameters.G, parameters.eps2);
        Self {
            bodies: last.len(),
            steps,
            dt: parameters.h0,
            start,
            workers: parameters.workers,
            simulated_time: steps as f64 * parameters.h0,
            execution_seconds,
            masses: last.iter().map(|b| b.m).collect(),
            final_positions: last.iter().map(|b| [b.x.x, b.x.y, b.x.z]).collect(),
            final_velocities: last.iter().map(|b| [b.v.x, b.v.y, b.v.z]).collect(),
            momentum_drift: (total_momentum(last) - total_momentum(initial)).norm(),
            energy_drift: relative_drift(e0, e1),
        }
    }

    pub fn write_yaml<W: Write>(&self, writer: W) -> Result<(), serde_yaml::Error> {
        serde_yaml::to_writer(writer, self)
    }
}
