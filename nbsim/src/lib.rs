pub mod error;
pub mod simulation;
pub mod configuration;
pub mod report;
pub mod benchmark;

pub use error::{ForceError, RecorderError, SimError};

pub use simulation::states::{distance, Body, System, NVec3};
pub use simulation::params::{Parameters, GRAVITATIONAL_CONSTANT};
pub use simulation::forces::{Acceleration, AccelSet, NewtonianGravity};
pub use simulation::integrator::semi_implicit_euler;
pub use simulation::snapshot::{NullRecorder, Snapshot, TrajectoryRecorder};
pub use simulation::engine::{RunState, RunSummary, Simulation};
pub use simulation::diagnostics::{kinetic_energy, potential_energy, relative_drift, total_energy, total_momentum};
pub use simulation::scenario::{random_bodies, Scenario};

pub use configuration::config::{BodyConfig, ParametersConfig, RandomConfig, ScenarioConfig};

pub use report::csv_recorder::{CsvRecorder, VecRecorder};
pub use report::summary::RunReport;

pub use benchmark::benchmark::{bench_gravity, bench_steps};
