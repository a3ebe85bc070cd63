//! Conserved-quantity diagnostics
//!
//! Momentum and energy are conserved in exact arithmetic; these helpers
//! measure how far a run has drifted.

use crate::simulation::states::{Body, NVec3};

pub fn total_momentum(bodies: &[Body]) -> NVec3 {
    bodies.iter().map(Body::momentum).sum()
}

pub fn kinetic_energy(bodies: &[Body]) -> f64 {
    bodies.iter().map(|b| 0.5 * b.m * b.v.norm_squared()).sum()
}

/// Pairwise potential energy -G m_i m_j / sqrt(|r|^2 + eps2)
///
/// Coincident unsoftened pairs have no finite potential and are left out of
/// the sum; a `Simulation` fails before reaching such a state.
#[allow(non_snake_case)]
pub fn potential_energy(bodies: &[Body], G: f64, eps2: f64) -> f64 {
    let mut u = 0.0;
    for (i, bi) in bodies.iter().enumerate() {
        for bj in &bodies[i + 1..] {
            let d = ((bj.x - bi.x).norm_squared() + eps2).sqrt();
            if d > 0.0 {
                u -= G * bi.m * bj.m / d;
            }
        }
    }
    u
}

#[allow(non_snake_case)]
pub fn total_energy(bodies: &[Body], G: f64, eps2: f64) -> f64 {
    kinetic_energy(bodies) + potential_energy(bodies, G, eps2)
}

/// |E - E0| / |E0|, or the absolute difference when E0 is zero
pub fn relative_drift(initial: f64, current: f64) -> f64 {
    if initial == 0.0 {
        (current - initial).abs()
    } else {
        ((current - initial) / initial).abs()
    }
}
