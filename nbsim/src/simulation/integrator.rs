//! Fixed-step time integrator for the N-body system
//!
//! Semi-implicit (symplectic) Euler: the velocity is kicked with the
//! acceleration of the step's start state, then the position drifts with the
//! new velocity. One force evaluation per step, bounded long-run energy error.

use super::states::{System, NVec3};

/// Advance every body by one step of size `dt`, in place
///
/// `accels[i]` must be the acceleration of body `i` at the current state.
/// Does not touch `sys.t`; the caller owns the clock.
///
/// # Panics
/// If `accels` does not hold exactly one entry per body.
pub fn semi_implicit_euler(sys: &mut System, accels: &[NVec3], dt: f64) {
    assert_eq!(
        sys.bodies.len(),
        accels.len(),
        "integrator needs one acceleration per body"
    );

    for (b, a) in sys.bodies.iter_mut().zip(accels.iter()) {
        // Kick: v_n+1 = v_n + dt * a_n
        b.v += dt * *a;
        // Drift: x_n+1 = x_n + dt * v_n+1
        b.x += dt * b.v;
    }
}
