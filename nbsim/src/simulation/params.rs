//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - integration step size and number of steps,
//! - gravitational constant and optional softening (`G`, `eps2`),
//! - number of force-computation workers
//!
//! Parameters are passed explicitly into each `Simulation`, so several runs
//! with different constants can live in one process.

use crate::error::SimError;

/// Standard gravitational constant in SI units (m^3 kg^-1 s^-2)
pub const GRAVITATIONAL_CONSTANT: f64 = 6.674e-11;

#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub h0: f64, // step size dt
    pub steps: usize, // number of steps to run
    pub G: f64, // gravitational constant
    pub eps2: f64, // softening, 0 = none
    pub workers: usize, // force-computation workers
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            h0: 1.0,
            steps: 1,
            G: GRAVITATIONAL_CONSTANT,
            eps2: 0.0,
            workers: 1,
        }
    }
}

impl Parameters {
    #[allow(non_snake_case)]
    pub fn new(h0: f64, steps: usize, G: f64) -> Self {
        Self { h0, steps, G, ..Self::default() }
    }

    /// Number of steps needed to cover `t_end` with step `h0`
    pub fn steps_for_duration(t_end: f64, h0: f64) -> Result<usize, SimError> {
        if !(t_end.is_finite() && t_end > 0.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "t_end must be finite and > 0, got {t_end}"
            )));
        }
        check_step_size(h0)?;
        let steps = (t_end / h0).round();
        if steps < 1.0 {
            return Err(SimError::InvalidConfiguration(format!(
                "t_end {t_end} is shorter than half a step of {h0}"
            )));
        }
        if steps >= usize::MAX as f64 {
            return Err(SimError::InvalidConfiguration(format!(
                "t_end {t_end} / h0 {h0} needs more steps than can be counted"
            )));
        }
        Ok(steps as usize)
    }

    /// Reject anything that would make the run meaningless
    pub fn validate(&self) -> Result<(), SimError> {
        check_step_size(self.h0)?;
        if self.steps == 0 {
            return Err(SimError::InvalidConfiguration(
                "step count must be > 0".to_string(),
            ));
        }
        if !(self.G.is_finite() && self.G >= 0.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "G must be finite and >= 0, got {}", self.G
            )));
        }
        if !(self.eps2.is_finite() && self.eps2 >= 0.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "eps2 must be finite and >= 0, got {}", self.eps2
            )));
        }
        if self.workers == 0 {
            return Err(SimError::InvalidConfiguration(
                "workers must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Simulated time covered by the full run
    pub fn duration(&self) -> f64 {
        self.steps as f64 * self.h0
    }
}

fn check_step_size(h0: f64) -> Result<(), SimError> {
    if h0.is_finite() && h0 > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfiguration(format!(
            "time step must be finite and > 0, got {h0}"
        )))
    }
}
