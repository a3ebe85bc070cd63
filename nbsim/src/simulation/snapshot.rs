//! Per-step trajectory snapshots and the recorder contract.
//!
//! A [`Snapshot`] is an owned copy of the body set after one step; it is
//! handed to a [`TrajectoryRecorder`] by value, so recorders never hold
//! references into the live state.

use crate::error::RecorderError;
use crate::simulation::states::{System, NVec3};

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub step: usize, // 1-based count of completed steps
    pub t: f64, // simulated time of this state
    pub positions: Vec<NVec3>,
    pub velocities: Vec<NVec3>,
    pub accelerations: Vec<NVec3>, // accelerations used to reach this state
}

impl Snapshot {
    pub fn capture(step: usize, t: f64, sys: &System, accels: &[NVec3]) -> Self {
        Self {
            step,
            t,
            positions: sys.bodies.iter().map(|b| b.x).collect(),
            velocities: sys.bodies.iter().map(|b| b.v).collect(),
            accelerations: accels.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Receives one snapshot per completed step, in step order, synchronously
pub trait TrajectoryRecorder {
    fn record(&mut self, snapshot: Snapshot) -> Result<(), RecorderError>;

    /// Called once after the last step of a completed run
    fn finish(&mut self) -> Result<(), RecorderError> {
        Ok(())
    }
}

impl<R: TrajectoryRecorder + ?Sized> TrajectoryRecorder for &mut R {
    fn record(&mut self, snapshot: Snapshot) -> Result<(), RecorderError> {
        (**self).record(snapshot)
    }

    fn finish(&mut self) -> Result<(), RecorderError> {
        (**self).finish()
    }
}

/// Recorder that drops every snapshot
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRecorder;

impl TrajectoryRecorder for NullRecorder {
    fn record(&mut self, _snapshot: Snapshot) -> Result<(), RecorderError> {
        Ok(())
    }
}
