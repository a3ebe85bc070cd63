//! Core state types for the N-body simulation.
//!
//! - `NVec3` is the 3D vector used for positions, velocities and accelerations
//! - `Body` is one point mass
//! - `System` holds the ordered body set and the elapsed simulated time `t`
//!
//! Bodies are identified by their index in `System::bodies`, which never
//! changes during a run.

use nalgebra::Vector3;

use crate::error::SimError;

pub type NVec3 = Vector3<f64>;

/// Euclidean distance between two points
pub fn distance(a: &NVec3, b: &NVec3) -> f64 {
    (b - a).norm()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub m: f64, // mass
}

impl Body {
    /// Build a body from raw initial conditions, rejecting non-positive or
    /// non-finite mass and non-finite position/velocity components
    pub fn new(x: NVec3, v: NVec3, m: f64) -> Result<Self, SimError> {
        let body = Self { x, v, m };
        body.validate()?;
        Ok(body)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.m.is_finite() && self.m > 0.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "body mass must be finite and > 0, got {}", self.m
            )));
        }
        if !self.x.iter().chain(self.v.iter()).all(|c| c.is_finite()) {
            return Err(SimError::InvalidConfiguration(
                "body position and velocity must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Linear momentum m * v
    pub fn momentum(&self) -> NVec3 {
        self.m * self.v
    }
}

#[derive(Debug, Clone)]
pub struct System {
    pub bodies: Vec<Body>, // body set, fixed length for a run
    pub t: f64, // time
}

impl System {
    pub fn new(bodies: Vec<Body>) -> Self {
        Self { bodies, t: 0.0 }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Validate every body; an empty set is rejected as well
    pub fn validate(&self) -> Result<(), SimError> {
        if self.bodies.is_empty() {
            return Err(SimError::InvalidConfiguration(
                "at least one body is required".to_string(),
            ));
        }
        for (i, b) in self.bodies.iter().enumerate() {
            b.validate().map_err(|e| match e {
                SimError::InvalidConfiguration(msg) => {
                    SimError::InvalidConfiguration(format!("body {i}: {msg}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}
