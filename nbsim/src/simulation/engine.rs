//! Simulation driver
//!
//! `Simulation` owns the body set, the parameters and the force model, and
//! runs the fixed-step loop:
//!
//! 1. evaluate accelerations for the current state (read-only over bodies)
//! 2. kick/drift every body with those accelerations (write)
//! 3. capture a [`Snapshot`] and hand it to the recorder
//!
//! Phase 2 only starts once phase 1 has filled every slot, even when the
//! force model fans out over worker threads.
//!
//! Lifecycle: `Uninitialized -> Running -> Completed | Failed`. A finished
//! simulation cannot be stepped again.

use log::{debug, error, info, trace};

use crate::error::SimError;
use crate::simulation::forces::{AccelSet, NewtonianGravity};
use crate::simulation::integrator::semi_implicit_euler;
use crate::simulation::params::Parameters;
use crate::simulation::snapshot::{Snapshot, TrajectoryRecorder};
use crate::simulation::states::{Body, System, NVec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Uninitialized, // bodies loaded, no step taken
    Running,
    Completed, // requested step count reached
    Failed, // force model or recorder failed
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub steps: usize,
    pub t: f64,
    pub bodies: Vec<Body>,
}

pub struct Simulation {
    parameters: Parameters,
    system: System,
    forces: AccelSet,
    accels: Vec<NVec3>, // reused acceleration buffer
    state: RunState,
    completed: usize,
}

impl Simulation {
    /// Simulation under direct Newtonian gravity configured from `parameters`
    pub fn new(bodies: Vec<Body>, parameters: Parameters) -> Result<Self, SimError> {
        let gravity = NewtonianGravity::new(parameters.G, parameters.eps2)
            .with_workers(parameters.workers)?;
        Self::with_forces(System::new(bodies), parameters, AccelSet::new().with(gravity))
    }

    /// Simulation with a caller-supplied force model
    pub fn with_forces(system: System, parameters: Parameters, forces: AccelSet) -> Result<Self, SimError> {
        parameters.validate()?;
        system.validate()?;
        let n = system.len();
        Ok(Self {
            parameters,
            system,
            forces,
            accels: vec![NVec3::zeros(); n],
            state: RunState::Uninitialized,
            completed: 0,
        })
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn bodies(&self) -> &[Body] {
        &self.system.bodies
    }

    pub fn steps_completed(&self) -> usize {
        self.completed
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            steps: self.completed,
            t: self.system.t,
            bodies: self.system.bodies.clone(),
        }
    }

    /// Execute one step and forward its snapshot to `recorder`
    ///
    /// Returns the state after the step. On a singular pair nothing is
    /// recorded for the failing step and the simulation becomes `Failed`.
    /// If the recorder rejects the snapshot the step is not counted, though
    /// the bodies already hold its integrated state.
    pub fn step<R>(&mut self, recorder: &mut R) -> Result<RunState, SimError>
    where
        R: TrajectoryRecorder + ?Sized,
    {
        match self.state {
            RunState::Completed | RunState::Failed => {
                return Err(SimError::AlreadyFinished(self.state));
            }
            RunState::Uninitialized => {
                info!(
                    "starting run: {} bodies, {} steps of dt = {}",
                    self.system.len(),
                    self.parameters.steps,
                    self.parameters.h0
                );
                self.state = RunState::Running;
            }
            RunState::Running => {}
        }

        let step = self.completed;
        if let Err(e) = self.forces.accumulate_accels(self.system.t, &self.system, &mut self.accels) {
            return Err(self.fail(SimError::at_step(e, step)));
        }

        semi_implicit_euler(&mut self.system, &self.accels, self.parameters.h0);
        // t = n * dt instead of summing dt every step
        let t = (step + 1) as f64 * self.parameters.h0;

        let snapshot = Snapshot::capture(step + 1, t, &self.system, &self.accels);
        if let Err(source) = recorder.record(snapshot) {
            return Err(self.fail(SimError::Recorder { step, source }));
        }
        self.completed = step + 1;
        self.system.t = t;
        trace!("step {} done, t = {}", self.completed, self.system.t);

        let every = (self.parameters.steps / 10).max(1);
        if self.completed % every == 0 {
            debug!("progress: {}/{} steps", self.completed, self.parameters.steps);
        }

        if self.completed == self.parameters.steps {
            if let Err(source) = recorder.finish() {
                return Err(self.fail(SimError::Recorder { step, source }));
            }
            self.state = RunState::Completed;
            info!("run completed: {} steps, t = {}", self.completed, self.system.t);
        }

        Ok(self.state)
    }

    /// Run every remaining step
    pub fn run<R>(&mut self, recorder: &mut R) -> Result<RunSummary, SimError>
    where
        R: TrajectoryRecorder + ?Sized,
    {
        while self.step(recorder)? != RunState::Completed {}
        Ok(self.summary())
    }

    /// Run until completion or until `keep_going` returns false; it is
    /// checked between steps only
    pub fn run_while<R, F>(&mut self, recorder: &mut R, mut keep_going: F) -> Result<RunState, SimError>
    where
        R: TrajectoryRecorder + ?Sized,
        F: FnMut(&Simulation) -> bool,
    {
        while self.state != RunState::Completed && keep_going(self) {
            self.step(recorder)?;
        }
        Ok(self.state)
    }

    fn fail(&mut self, err: SimError) -> SimError {
        self.state = RunState::Failed;
        error!("run failed: {err}");
        err
    }
}
