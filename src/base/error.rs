use gemlab::mesh::CellId;
use thiserror::Error;

/// Defines the error type for the hydromechanical solver
///
/// Fatal geometry and assembly conditions carry the offending cell id or
/// matrix dimensions so that a failing analysis can be diagnosed from the
/// returned error alone.
#[derive(Debug, Error, PartialEq)]
pub enum FemError {
    /// An element is inverted or degenerate (non-positive Jacobian determinant)
    #[error("cell {cell_id}: non-positive Jacobian determinant ({det_jac:.3e})")]
    InvalidGeometry { cell_id: CellId, det_jac: f64 },

    /// A joint element produced a non-positive effective thickness
    #[error("joint cell {cell_id}: non-positive effective thickness ({thickness:.3e})")]
    InvalidJoint { cell_id: CellId, thickness: f64 },

    /// The global sparse matrix could not be built from the triplets
    #[error("global matrix assembly failed for a {nrow} x {ncol} block: {message}")]
    Assembly {
        nrow: usize,
        ncol: usize,
        message: &'static str,
    },

    /// The nonlinear iterations did not converge and no retry is possible
    #[error("no convergence at increment {increment} (t = {t:.6e})")]
    NonConvergence { increment: usize, t: f64 },

    /// The adaptive increment size fell below the time tolerance
    #[error("cannot subdivide further: Δt = {dt:.3e} is smaller than the allowed minimum")]
    TimestepTooSmall { dt: f64 },

    /// A boundary condition is inconsistent with the analysis setup
    #[error("invalid boundary condition: {0}")]
    InvalidBc(&'static str),

    /// The solver configuration failed validation
    #[error("invalid configuration: {0}")]
    Config(&'static str),

    /// An error propagated from the mesh/linear-algebra collaborators
    #[error("{0}")]
    Library(&'static str),
}

impl From<&'static str> for FemError {
    fn from(message: &'static str) -> Self {
        FemError::Library(message)
    }
}

/// Defines an alias for Result with [FemError]
pub type Result<T> = std::result::Result<T, FemError>;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
