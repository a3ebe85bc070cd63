//! Trajectory recorders: in-memory and CSV export

use std::io::Write;

use serde::Serialize;

use crate::error::RecorderError;
use crate::simulation::snapshot::{Snapshot, TrajectoryRecorder};

/// Keeps every snapshot in memory
#[derive(Debug, Default, Clone)]
pub struct VecRecorder {
    pub snapshots: Vec<Snapshot>,
    pub finished: bool,
}

impl VecRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrajectoryRecorder for VecRecorder {
    fn record(&mut self, snapshot: Snapshot) -> Result<(), RecorderError> {
        self.snapshots.push(snapshot);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RecorderError> {
        self.finished = true;
        Ok(())
    }
}

/// One CSV row: one body at one step
#[derive(Debug, Serialize)]
struct TrajectoryRow {
    step: usize,
    time: f64,
    body: usize,
    x: f64,
    y: f64,
    z: f64,
    vx: f64,
    vy: f64,
    vz: f64,
    ax: f64,
    ay: f64,
    az: f64,
}

/// Writes one row per body per step, skipping steps before `start`
pub struct CsvRecorder<W: Write> {
    writer: csv::Writer<W>,
    start: usize,
    rows: usize,
}

impl<W: Write> CsvRecorder<W> {
    pub fn new(inner: W, start: usize) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
            start,
            rows: 0,
        }
    }

    /// Rows written so far (header excluded)
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> Result<W, RecorderError> {
        self.writer.into_inner().map_err(|e| Box::new(e.into_error()) as RecorderError)
    }
}

impl<W: Write> TrajectoryRecorder for CsvRecorder<W> {
    fn record(&mut self, snapshot: Snapshot) -> Result<(), RecorderError> {
        if snapshot.step < self.start {
            return Ok(());
        }
        for (body, ((x, v), a)) in snapshot
            .positions
            .iter()
            .zip(&snapshot.velocities)
            .zip(&snapshot.accelerations)
            .enumerate()
        {
            self.writer.serialize(TrajectoryRow {
                step: snapshot.step,
                time: snapshot.t,
                body,
                x: x.x,
                y: x.y,
                z: x.z,
                vx: v.x,
                vy: v.y,
                vz: v.z,
                ax: a.x,
                ay: a.y,
                az: a.z,
            })?;
            self.rows += 1;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RecorderError> {
        self.writer.flush()?;
        Ok(())
    }
}
