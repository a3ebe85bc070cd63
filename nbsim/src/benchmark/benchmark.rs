use std::time::Instant;

use crate::error::SimError;
use crate::simulation::engine::Simulation;
use crate::simulation::forces::{Acceleration, NewtonianGravity};
use crate::simulation::params::Parameters;
use crate::simulation::snapshot::NullRecorder;
use crate::simulation::states::{Body, System, NVec3};

/// Helper to build a manual System of size `n`
fn make_system(n: usize) -> System {
    let bodies = (0..n)
        .map(|i| {
            let i_f = i as f64;
            // deterministic positions, no rand needed
            let x = NVec3::new(
                (i_f * 0.37).sin() * 5.0 + i_f * 1e-3,
                (i_f * 0.13).cos() * 5.0,
                (i_f * 0.07).sin() * 5.0,
            );
            Body { x, v: NVec3::zeros(), m: 1.0 }
        })
        .collect();

    System::new(bodies)
}

fn make_params(workers: usize) -> Parameters {
    Parameters {
        h0: 0.001,
        steps: 5,
        G: 0.1,
        eps2: 1e-4,
        workers,
    }
}

/// Time one force evaluation for growing N and each worker count
/// Output is CSV so it can be pasted straight into a spreadsheet
pub fn bench_gravity(workers: &[usize]) -> Result<(), SimError> {
    let ns = [200, 400, 800, 1600, 3200, 6400];

    let header: Vec<String> = workers.iter().map(|w| format!("w{w}_ms")).collect();
    println!("N,{}", header.join(","));

    for n in ns {
        let sys = make_system(n);
        let mut out = vec![NVec3::zeros(); n];
        let mut cols = Vec::with_capacity(workers.len());

        for &w in workers {
            let p = make_params(w);
            let gravity = NewtonianGravity::new(p.G, p.eps2).with_workers(w)?;

            // Warm up
            gravity.acceleration(0.0, &sys, &mut out).map_err(|e| SimError::at_step(e, 0))?;

            let t0 = Instant::now();
            gravity.acceleration(0.0, &sys, &mut out).map_err(|e| SimError::at_step(e, 0))?;
            cols.push(format!("{:.6}", t0.elapsed().as_secs_f64() * 1000.0));
        }

        println!("{},{}", n, cols.join(","));
    }

    Ok(())
}

/// Time full simulation steps (forces + integration + snapshot) per N
pub fn bench_steps(workers: usize) -> Result<(), SimError> {
    println!("N,step_ms");

    for n in [200, 400, 800, 1600, 3200] {
        let params = make_params(workers);
        let steps = params.steps;
        let mut sim = Simulation::new(make_system(n).bodies, params)?;

        let t0 = Instant::now();
        sim.run(&mut NullRecorder)?;
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{},{:.6}", n, ms);
    }

    Ok(())
}
