//! Force / acceleration contributors for the n-body engine
//!
//! Defines the acceleration trait, the `AccelSet` that sums several terms,
//! and direct Newtonian gravity. Other strategies (tree codes, external
//! fields) plug in by implementing [`Acceleration`].

use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{ForceError, SimError};
use crate::simulation::states::{Body, System, NVec3};

/// Collection of acceleration terms (gravity, external fields, etc.)
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per body
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self {
            terms: Vec::new(),
        }
    }

    /// Add an acceleration term
    pub fn with(mut self, term: impl Acceleration + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Compute total accelerations at time `t` for all bodies in `sys`
    /// - `out[i]` will be set to the sum of contributions from all terms
    /// - stops at the first term that fails; `out` is then unspecified
    pub fn accumulate_accels(&self, t: f64, sys: &System, out: &mut [NVec3]) -> Result<(), ForceError> {
        assert_eq!(out.len(), sys.bodies.len(), "one acceleration slot per body");
        // Zero buffer
        for a in out.iter_mut() {
            *a = NVec3::zeros();
        }
        for term in &self.terms {
            term.acceleration(t, sys, out)?;
        }
        Ok(())
    }
}

/// Trait for acceleration sources operating on [`System`]
/// Implementations add their contribution into `out[i]` for each body and
/// must not write NaN or infinite values
pub trait Acceleration {
    fn acceleration(&self, t: f64, sys: &System, out: &mut [NVec3]) -> Result<(), ForceError>;
}

/// Newtonian gravity by direct pairwise summation, O(N^2) per evaluation
///
/// `a_i = sum_{j != i} G m_j (x_j - x_i) / (|x_j - x_i|^2 + eps2)^(3/2)`
///
/// With `eps2 == 0` two coincident bodies are a hard error. Each `a_i` is
/// summed over `j` in ascending order, so the result does not depend on how
/// many workers evaluate it.
#[allow(non_snake_case)]
pub struct NewtonianGravity {
    pub G: f64, // gravitational constant
    pub eps2: f64, // softening
    pool: Option<Arc<ThreadPool>>,
}

impl NewtonianGravity {
    #[allow(non_snake_case)]
    pub fn new(G: f64, eps2: f64) -> Self {
        Self { G, eps2, pool: None }
    }

    /// Split the evaluation over `workers` threads, each owning a disjoint
    /// contiguous range of output slots. One worker means serial evaluation.
    pub fn with_workers(mut self, workers: usize) -> Result<Self, SimError> {
        if workers == 0 {
            return Err(SimError::InvalidConfiguration("workers must be >= 1".to_string()));
        }
        self.pool = if workers > 1 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("nbsim-force-{i}"))
                .build()?;
            Some(Arc::new(pool))
        } else {
            None
        };
        Ok(self)
    }

    pub fn workers(&self) -> usize {
        self.pool.as_ref().map_or(1, |p| p.current_num_threads())
    }

    /// Net pull on body `i` from every other body
    fn pull_on(&self, i: usize, bodies: &[Body]) -> Result<NVec3, ForceError> {
        let xi = bodies[i].x;
        let mut acc = NVec3::zeros();

        for (j, bj) in bodies.iter().enumerate() {
            if j == i {
                continue;
            }
            // r points from i to j, so i is pulled along +r
            let r = bj.x - xi;
            let d2 = r.norm_squared() + self.eps2;
            let inv_r = d2.sqrt().recip();
            let inv_r3 = inv_r * inv_r * inv_r;
            let k = self.G * bj.m * inv_r3;
            let next = acc + k * r;
            // overflow anywhere in the pull is as undefined as zero separation
            if d2 == 0.0 || !k.is_finite() || !next.iter().all(|c| c.is_finite()) {
                return Err(ForceError::Singular { i: i.min(j), j: i.max(j) });
            }
            acc = next;
        }

        Ok(acc)
    }

    fn add_range(&self, start: usize, bodies: &[Body], slots: &mut [NVec3]) -> Result<(), ForceError> {
        for (k, a) in slots.iter_mut().enumerate() {
            *a += self.pull_on(start + k, bodies)?;
        }
        Ok(())
    }
}

impl Acceleration for NewtonianGravity {
    fn acceleration(&self, _t: f64, sys: &System, out: &mut [NVec3]) -> Result<(), ForceError> {
        let n = sys.bodies.len();
        if n < 2 { // nothing pulls on a lone body
            return Ok(());
        }

        let pool = match &self.pool {
            Some(pool) => pool,
            None => return self.add_range(0, &sys.bodies, out),
        };

        let chunk = n.div_ceil(pool.current_num_threads());
        let results: Vec<Result<(), ForceError>> = pool.install(|| {
            out.par_chunks_mut(chunk)
                .enumerate()
                .map(|(c, slots)| self.add_range(c * chunk, &sys.bodies, slots))
                .collect()
        });

        // Chunks come back in index order, so the first failure is the lowest pair
        results.into_iter().collect()
    }
}
