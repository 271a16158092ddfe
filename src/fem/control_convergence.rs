use crate::base::Config;
use russell_lab::Vector;

/// Controls the convergence of the nonlinear iterations
///
/// The residue is the maximum absolute mismatch between the external and
/// internal natural-value increments restricted to the unknown partition:
/// `residue = max |ΔF_ex − ΔF_int|[0..nu)`.
///
/// Outcomes tracked per iteration:
///
/// * converged -- residue below the tolerance;
/// * diverged -- residue is NaN (e.g. after a failed factorization);
/// * stagnated -- residue above 0.9 × previous for `maxfails`
///   consecutive iterations.
pub struct ControlConvergence<'a> {
    /// Holds configuration parameters
    config: &'a Config,

    /// Iteration counter of the current increment
    iteration: usize,

    /// Current residue
    residue: f64,

    /// Previous residue
    residue_prev: f64,

    /// Number of consecutive stagnated iterations
    n_stagnated: usize,

    /// Converged flag
    converged: bool,

    /// Diverged (NaN) flag
    diverged: bool,

    /// Total number of converged increments
    n_converged_total: usize,

    /// Total number of failed (retried or fatal) increments
    n_failed_total: usize,
}

impl<'a> ControlConvergence<'a> {
    /// Allocates a new instance
    pub fn new(config: &'a Config) -> Self {
        ControlConvergence {
            config,
            iteration: 0,
            residue: 0.0,
            residue_prev: 0.0,
            n_stagnated: 0,
            converged: false,
            diverged: false,
            n_converged_total: 0,
            n_failed_total: 0,
        }
    }

    /// Resets the flags at the beginning of an increment
    pub fn reset(&mut self) {
        self.iteration = 0;
        self.residue = 0.0;
        self.residue_prev = 0.0;
        self.n_stagnated = 0;
        self.converged = false;
        self.diverged = false;
    }

    /// Analyzes the residual of one iteration
    pub fn analyze(&mut self, iteration: usize, ff_ex: &Vector, ff_int: &Vector, nu: usize) {
        self.iteration = iteration;
        let mut residue = 0.0_f64;
        for eq in 0..nu {
            let mismatch = f64::abs(ff_ex[eq] - ff_int[eq]);
            if mismatch.is_nan() {
                residue = f64::NAN;
                break;
            }
            residue = f64::max(residue, mismatch);
        }
        self.residue = residue;

        if residue.is_nan() {
            self.diverged = true;
            self.converged = false;
            return;
        }
        self.converged = residue < self.config.tol;

        // stagnation: insufficient reduction of the residue
        if iteration > 0 && residue > 0.9 * self.residue_prev {
            self.n_stagnated += 1;
        } else {
            self.n_stagnated = 0;
        }
        self.residue_prev = residue;
    }

    /// Returns the current residue
    pub fn residue(&self) -> f64 {
        self.residue
    }

    /// Tells whether the iteration converged or not
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Tells whether the iteration diverged (NaN residue) or not
    pub fn diverged(&self) -> bool {
        self.diverged
    }

    /// Tells whether the iterations stagnated for too long or not
    pub fn stagnated(&self) -> bool {
        self.n_stagnated >= self.config.maxfails
    }

    /// Records a converged increment
    pub fn add_converged(&mut self) {
        self.n_converged_total += 1;
    }

    /// Records a failed increment (to be retried or fatal)
    pub fn add_failed(&mut self) {
        self.n_failed_total += 1;
    }

    /// Returns the total number of converged increments
    pub fn n_converged_total(&self) -> usize {
        self.n_converged_total
    }

    /// Returns the total number of failed increments
    pub fn n_failed_total(&self) -> usize {
        self.n_failed_total
    }

    /// Prints an increment line
    pub fn print_increment(&self, increment: usize, t: f64, dt: f64) {
        if self.config.verbose_increments {
            log::info!("increment {:>4}  t = {:>13.6e}  Δt = {:>13.6e}", increment, t, dt);
        }
    }

    /// Prints an iteration line
    pub fn print_iteration(&self) {
        if self.config.verbose_iterations {
            let flag = if self.converged {
                "converged"
            } else if self.diverged {
                "diverged"
            } else {
                ""
            };
            log::info!("  it {:>3}  residue = {:>13.6e} {}", self.iteration, self.residue, flag);
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
