use super::Idealization;
use gemlab::mesh::Mesh;

/// Holds the configuration of an analysis stage
///
/// The geometry idealization and all solver options live here; an
/// immutable reference is passed into every component of the solver.
pub struct Config {
    /// Holds the geometry idealization (2D/3D, plane-stress, thickness)
    pub ideal: Idealization,

    /// Gravity acceleration (≥ 0; enters the flow source term)
    pub gravity: f64,

    /// Initial (pseudo) time of the stage
    pub t_ini: f64,

    /// Final (pseudo) time of the stage
    pub t_fin: f64,

    /// Residual tolerance for the nonlinear iterations
    pub tol: f64,

    /// Number of increments dividing the stage time span
    pub nincs: usize,

    /// Maximum number of iterations per increment
    pub maxits: usize,

    /// Number of consecutive stagnated iterations before giving up
    pub maxfails: usize,

    /// Enables the adaptive increment sizing (grow on success, halve on failure)
    pub autoinc: bool,

    /// Number of output snapshots over the stage (0 disables periodic output)
    pub nouts: usize,

    /// Implicit-Euler weight for the conductivity terms (0 < θ ≤ 1)
    pub theta: f64,

    /// Keeps the first factorized matrix for all iterations of an increment
    /// (modified Newton) instead of reassembling the Jacobian every iteration
    pub constant_tangent: bool,

    /// Ratio defining the minimum allowed increment size: Δt_min = ratio × span
    pub dt_min_ratio: f64,

    /// Prints a line per increment
    pub verbose_increments: bool,

    /// Prints a line per iteration
    pub verbose_iterations: bool,
}

impl Config {
    /// Allocates a new instance with default values
    pub fn new(mesh: &Mesh) -> Self {
        Config {
            ideal: Idealization::new(mesh.ndim),
            gravity: 0.0,
            t_ini: 0.0,
            t_fin: 1.0,
            tol: 1e-4,
            nincs: 1,
            maxits: 10,
            maxfails: 3,
            autoinc: false,
            nouts: 0,
            theta: 1.0,
            constant_tangent: false,
            dt_min_ratio: 1e-9,
            verbose_increments: false,
            verbose_iterations: false,
        }
    }

    /// Sets the gravity acceleration
    pub fn set_gravity(&mut self, value: f64) -> &mut Self {
        self.gravity = value;
        self
    }

    /// Sets the out-of-plane thickness (2D only)
    pub fn set_thickness(&mut self, value: f64) -> &mut Self {
        self.ideal.thickness = value;
        self
    }

    /// Sets a 2D plane-stress idealization, otherwise plane-strain in 2D
    pub fn set_plane_stress(&mut self, flag: bool) -> &mut Self {
        self.ideal.plane_stress = flag;
        if !flag {
            self.ideal.thickness = 1.0;
        }
        self
    }

    /// Sets a 2D axisymmetric idealization
    pub fn set_axisymmetric(&mut self, flag: bool) -> &mut Self {
        self.ideal.axisymmetric = flag;
        self
    }

    /// Sets the stage time span
    pub fn set_time_span(&mut self, t_ini: f64, t_fin: f64) -> &mut Self {
        self.t_ini = t_ini;
        self.t_fin = t_fin;
        self
    }

    /// Sets the residual tolerance
    pub fn set_tol(&mut self, value: f64) -> &mut Self {
        self.tol = value;
        self
    }

    /// Sets the number of increments dividing the stage time span
    pub fn set_nincs(&mut self, value: usize) -> &mut Self {
        self.nincs = value;
        self
    }

    /// Sets the maximum number of iterations per increment
    pub fn set_maxits(&mut self, value: usize) -> &mut Self {
        self.maxits = value;
        self
    }

    /// Sets the number of consecutive stagnated iterations before giving up
    pub fn set_maxfails(&mut self, value: usize) -> &mut Self {
        self.maxfails = value;
        self
    }

    /// Enables/disables the adaptive increment sizing
    pub fn set_autoinc(&mut self, flag: bool) -> &mut Self {
        self.autoinc = flag;
        self
    }

    /// Sets the number of output snapshots over the stage
    pub fn set_nouts(&mut self, value: usize) -> &mut Self {
        self.nouts = value;
        self
    }

    /// Sets the implicit-Euler weight for the conductivity terms
    pub fn set_theta(&mut self, value: f64) -> &mut Self {
        self.theta = value;
        self
    }

    /// Enables/disables the constant-tangent (modified Newton) scheme
    pub fn set_constant_tangent(&mut self, flag: bool) -> &mut Self {
        self.constant_tangent = flag;
        self
    }

    /// Enables/disables printing of increment and iteration messages
    pub fn set_verbose(&mut self, increments: bool, iterations: bool) -> &mut Self {
        self.verbose_increments = increments;
        self.verbose_iterations = iterations;
        self
    }

    /// Returns the minimum allowed increment size
    pub fn dt_min(&self) -> f64 {
        self.dt_min_ratio * (self.t_fin - self.t_ini)
    }

    /// Validates the configuration; returns a message if something is wrong
    pub fn validate(&self) -> Option<String> {
        if self.ideal.axisymmetric {
            return Some(
                "the axisymmetric idealization requires a numerical reference case and is not available yet".to_string(),
            );
        }
        if self.ideal.thickness <= 0.0 {
            return Some(format!("thickness must be positive; got {}", self.ideal.thickness));
        }
        if !self.ideal.two_dim && self.ideal.plane_stress {
            return Some("plane-stress does not make sense in 3D".to_string());
        }
        if self.gravity < 0.0 {
            return Some(format!("gravity must be ≥ 0.0; got {}", self.gravity));
        }
        if self.t_fin <= self.t_ini {
            return Some(format!(
                "t_fin must be greater than t_ini; got t_ini = {}, t_fin = {}",
                self.t_ini, self.t_fin
            ));
        }
        if self.tol <= 0.0 {
            return Some(format!("tolerance must be positive; got {}", self.tol));
        }
        if self.nincs < 1 {
            return Some("the number of increments must be at least one".to_string());
        }
        if self.maxits < 1 {
            return Some("the maximum number of iterations must be at least one".to_string());
        }
        if self.maxfails < 1 {
            return Some("maxfails must be at least one".to_string());
        }
        if self.theta <= 0.0 || self.theta > 1.0 {
            return Some(format!("θ must satisfy 0 < θ ≤ 1; got {}", self.theta));
        }
        None
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
