use nbsim::simulation::forces::{AccelSet, Acceleration, NewtonianGravity};
use nbsim::simulation::integrator::semi_implicit_euler;
use nbsim::simulation::states::{distance, Body, System, NVec3};
use nbsim::ForceError;

/// Build a simple 2-body System separated along x-axis
pub fn two_body_system(dist: f64, m1: f64, m2: f64) -> System {
    let b1 = Body {
        x: [-dist / 2.0, 0.0, 0.0].into(),
        v: [0.0, 0.0, 0.0].into(),
        m: m1,
    };
    let b2 = Body {
        x: [dist / 2.0, 0.0, 0.0].into(),
        v: [0.0, 0.0, 0.0].into(),
        m: m2,
    };
    System::new(vec![b1, b2])
}

/// Deterministic scattered bodies with distinct positions
pub fn scattered_system(n: usize) -> System {
    let bodies = (0..n)
        .map(|i| {
            let f = i as f64;
            Body {
                x: [(f * 0.37).sin() * 5.0 + f * 0.01, (f * 0.13).cos() * 5.0, (f * 0.07).sin() * 5.0].into(),
                v: [0.0, 0.0, 0.0].into(),
                m: 1.0 + 0.1 * f,
            }
        })
        .collect();
    System::new(bodies)
}

/// Build a gravity term + AccelSet
pub fn gravity_set(g: f64, eps2: f64) -> AccelSet {
    AccelSet::new().with(NewtonianGravity::new(g, eps2))
}

fn accels(set: &AccelSet, sys: &System) -> Result<Vec<NVec3>, ForceError> {
    let mut acc = vec![NVec3::zeros(); sys.bodies.len()];
    set.accumulate_accels(sys.t, sys, &mut acc)?;
    Ok(acc)
}

// ==================================================================================
// Vector tests
// ==================================================================================

#[test]
fn vector_distance_is_euclidean() {
    let a = NVec3::new(1.0, 2.0, 3.0);
    let b = NVec3::new(4.0, 6.0, 3.0);
    assert_eq!(distance(&a, &b), 5.0);
    assert_eq!(distance(&b, &a), 5.0);
    assert_eq!(a + b, NVec3::new(5.0, 8.0, 6.0));
    assert_eq!(b - a, NVec3::new(3.0, 4.0, 0.0));
    assert_eq!(2.0 * a, NVec3::new(2.0, 4.0, 6.0));
}

// ==================================================================================
// Gravity tests
// ==================================================================================

#[test]
fn gravity_newton_third_law() {
    let sys = two_body_system(1.0, 2.0, 3.0);
    let acc = accels(&gravity_set(0.1, 0.0), &sys).unwrap();

    let net = acc[0] * sys.bodies[0].m + acc[1] * sys.bodies[1].m;

    assert!(net.norm() < 1e-12, "Net momentum not zero: {:?}", net);
}

#[test]
fn gravity_points_toward_other_body() {
    let sys = two_body_system(2.0, 1.0, 1.0);
    let acc = accels(&gravity_set(0.1, 0.0), &sys).unwrap();

    let dx = sys.bodies[1].x - sys.bodies[0].x;

    assert!(acc[0].dot(&dx) > 0.0, "Acceleration is not toward second body");
    assert!(acc[1].dot(&dx) < 0.0, "Acceleration is not toward first body");
}

#[test]
fn gravity_matches_newton_magnitude() {
    // a_1 = G m_2 / d^2 = 0.1 * 3 / 1
    let sys = two_body_system(1.0, 2.0, 3.0);
    let acc = accels(&gravity_set(0.1, 0.0), &sys).unwrap();

    assert!((acc[0].x - 0.3).abs() < 1e-12, "got {}", acc[0].x);
    assert!((acc[1].x + 0.2).abs() < 1e-12, "got {}", acc[1].x);
    assert_eq!(acc[0].y, 0.0);
    assert_eq!(acc[0].z, 0.0);
}

#[test]
fn gravity_inverse_square_law() {
    let set = gravity_set(0.1, 0.0);
    let acc_r = accels(&set, &two_body_system(1.0, 1.0, 1.0)).unwrap();
    let acc_2r = accels(&set, &two_body_system(2.0, 1.0, 1.0)).unwrap();

    let ratio = acc_r[0].norm() / acc_2r[0].norm();

    assert!((ratio - 4.0).abs() < 1e-9, "Expected ~4x, got {}", ratio);
}

#[test]
fn gravity_single_body_feels_nothing() {
    let sys = System::new(vec![Body {
        x: [1.0, 2.0, 3.0].into(),
        v: [0.5, 0.0, 0.0].into(),
        m: 10.0,
    }]);
    let acc = accels(&gravity_set(1.0, 0.0), &sys).unwrap();

    assert_eq!(acc, vec![NVec3::zeros()]);
}

#[test]
fn gravity_coincident_bodies_are_singular() {
    let mut sys = scattered_system(4);
    sys.bodies[2].x = sys.bodies[0].x;

    let err = accels(&gravity_set(1.0, 0.0), &sys).unwrap_err();

    assert_eq!(err, ForceError::Singular { i: 0, j: 2 });
}

#[test]
fn gravity_reports_lowest_singular_pair() {
    let mut sys = scattered_system(6);
    sys.bodies[5].x = sys.bodies[3].x;
    sys.bodies[4].x = sys.bodies[1].x;

    for workers in [1, 2, 3, 6] {
        let set = AccelSet::new().with(NewtonianGravity::new(1.0, 0.0).with_workers(workers).unwrap());
        let err = accels(&set, &sys).unwrap_err();
        assert_eq!(err, ForceError::Singular { i: 1, j: 4 }, "workers = {workers}");
    }
}

#[test]
fn gravity_near_coincident_bodies_are_singular() {
    // |r|^-3 overflows long before |r| reaches zero
    let sys = two_body_system(1e-110, 1.0, 1.0);

    let err = accels(&gravity_set(1.0, 0.0), &sys).unwrap_err();

    assert_eq!(err, ForceError::Singular { i: 0, j: 1 });
}

#[test]
fn gravity_overflowing_pull_is_singular() {
    // |r|^-3 = 1e300 is finite, G m |r|^-3 is not
    let sys = System::new(vec![
        Body { x: [0.0, 0.0, 0.0].into(), v: [0.0, 0.0, 0.0].into(), m: 1e30 },
        Body { x: [1e-100, 0.0, 0.0].into(), v: [0.0, 0.0, 0.0].into(), m: 1e30 },
    ]);

    for workers in [1, 2] {
        let set = AccelSet::new().with(NewtonianGravity::new(6.674e-11, 0.0).with_workers(workers).unwrap());
        let err = accels(&set, &sys).unwrap_err();
        assert_eq!(err, ForceError::Singular { i: 0, j: 1 }, "workers = {workers}");
    }
}

#[test]
fn gravity_overflowing_sum_is_singular() {
    // each pull on body 0 is finite, their sum is not
    let sys = System::new(vec![
        Body { x: [0.0, 0.0, 0.0].into(), v: [0.0, 0.0, 0.0].into(), m: 1.0 },
        Body { x: [1.0, 0.0, 0.0].into(), v: [0.0, 0.0, 0.0].into(), m: 1.5e308 },
        Body { x: [2.0, 0.0, 0.0].into(), v: [0.0, 0.0, 0.0].into(), m: 1.5e308 },
    ]);

    let err = accels(&gravity_set(1.0, 0.0), &sys).unwrap_err();

    assert_eq!(err, ForceError::Singular { i: 0, j: 2 });
}

#[test]
fn gravity_softening_prevents_blowup() {
    let sys = two_body_system(0.0, 1.0, 1.0);
    let acc = accels(&gravity_set(0.1, 0.1), &sys).unwrap();

    // Exactly coincident: softened pull has no direction
    assert_eq!(acc[0], NVec3::zeros());

    let near = two_body_system(1e-9, 1.0, 1.0);
    let acc = accels(&gravity_set(0.1, 0.1), &near).unwrap();
    assert!(acc[0].norm() < 1e9, "Softening failed; acceleration too large");
    assert!(acc[0].iter().all(|c| c.is_finite()));
}

#[test]
fn gravity_parallel_matches_serial_bitwise() {
    let sys = scattered_system(37);
    let serial = accels(&gravity_set(0.5, 0.0), &sys).unwrap();

    for workers in [2, 3, 4, 8] {
        let gravity = NewtonianGravity::new(0.5, 0.0).with_workers(workers).unwrap();
        assert_eq!(gravity.workers(), workers);
        let parallel = accels(&AccelSet::new().with(gravity), &sys).unwrap();
        assert_eq!(serial, parallel, "workers = {workers}");
    }
}

#[test]
fn gravity_rejects_zero_workers() {
    assert!(NewtonianGravity::new(1.0, 0.0).with_workers(0).is_err());
}

struct UniformField(NVec3);

impl Acceleration for UniformField {
    fn acceleration(&self, _t: f64, _sys: &System, out: &mut [NVec3]) -> Result<(), ForceError> {
        for a in out.iter_mut() {
            *a += self.0;
        }
        Ok(())
    }
}

#[test]
fn accel_set_sums_terms() {
    let sys = two_body_system(1.0, 2.0, 3.0);
    let gravity_only = accels(&gravity_set(0.1, 0.0), &sys).unwrap();

    let field = NVec3::new(0.0, 0.0, -9.81);
    let set = gravity_set(0.1, 0.0).with(UniformField(field));
    assert_eq!(set.len(), 2);

    let both = accels(&set, &sys).unwrap();
    for (a, g) in both.iter().zip(&gravity_only) {
        assert!((a - (g + field)).norm() < 1e-15);
    }
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn integrator_kicks_before_drifting() {
    let mut sys = System::new(vec![Body {
        x: [0.0, 0.0, 0.0].into(),
        v: [0.0, 0.0, 0.0].into(),
        m: 1.0,
    }]);

    semi_implicit_euler(&mut sys, &[NVec3::new(1.0, 0.0, 0.0)], 0.5);

    // v = 0 + 1 * 0.5, x = 0 + 0.5 * 0.5; explicit Euler would leave x at 0
    assert_eq!(sys.bodies[0].v, NVec3::new(0.5, 0.0, 0.0));
    assert_eq!(sys.bodies[0].x, NVec3::new(0.25, 0.0, 0.0));
    assert_eq!(sys.t, 0.0, "integrator does not own the clock");
}

#[test]
fn integrator_applies_each_acceleration_to_its_body() {
    let mut sys = two_body_system(2.0, 1.0, 1.0);
    let acc = [NVec3::new(0.0, 2.0, 0.0), NVec3::new(0.0, 0.0, -4.0)];

    semi_implicit_euler(&mut sys, &acc, 0.25);

    assert_eq!(sys.bodies[0].v, NVec3::new(0.0, 0.5, 0.0));
    assert_eq!(sys.bodies[1].v, NVec3::new(0.0, 0.0, -1.0));
    assert_eq!(sys.bodies[0].x, NVec3::new(-1.0, 0.125, 0.0));
    assert_eq!(sys.bodies[1].x, NVec3::new(1.0, 0.0, -0.25));
}

#[test]
#[should_panic(expected = "one acceleration per body")]
fn integrator_rejects_misaligned_accelerations() {
    let mut sys = two_body_system(1.0, 1.0, 1.0);
    semi_implicit_euler(&mut sys, &[NVec3::zeros()], 0.1);
}
