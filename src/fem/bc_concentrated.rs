use super::FemBase;
use crate::base::{BcValue, FemError, Natural, Pbc, Result};
use gemlab::mesh::Mesh;
use russell_lab::Vector;

/// Holds one concentrated load or point source
pub struct BcConcentrated {
    /// Global equation number
    pub eq: usize,

    /// Mechanical load (total) or liquid source (rate)
    mechanical: bool,

    /// Coordinates of the point (for the space-time value functions)
    coords: Vec<f64>,

    /// Load/source value
    value: BcValue,
}

/// Implements an array of BcConcentrated
pub struct BcConcentratedArray {
    /// All values
    pub all: Vec<BcConcentrated>,
}

impl BcConcentratedArray {
    /// Allocates a new instance
    pub fn new(mesh: &Mesh, base: &FemBase, natural: &Natural) -> Result<Self> {
        let mut all = Vec::with_capacity(natural.at_points.len());
        for (point_id, pbc, value) in &natural.at_points {
            if mesh.ndim == 2 && matches!(pbc, Pbc::Fz) {
                return Err(FemError::InvalidBc("cannot apply an out-of-plane load in a 2D analysis"));
            }
            let eq = base.equations.eq(*point_id, pbc.dof())?;
            all.push(BcConcentrated {
                eq,
                mechanical: pbc.is_mechanical(),
                coords: mesh.points[*point_id].coords.clone(),
                value: *value,
            });
        }
        Ok(BcConcentratedArray { all })
    }

    /// Adds the incremental natural targets to the external vector
    ///
    /// Mechanical loads are totals: the increment is the difference of the
    /// values at t+Δt and t. Liquid sources are rates: the contribution is
    /// −Δt·q(t+Δt) (the flow equations are negated in the global system).
    pub fn add_to_increment(&self, ff_star: &mut Vector, t: f64, dt: f64) {
        for bc in &self.all {
            if bc.mechanical {
                ff_star[bc.eq] += bc.value.value(&bc.coords, t + dt) - bc.value.value(&bc.coords, t);
            } else {
                ff_star[bc.eq] -= dt * bc.value.value(&bc.coords, t + dt);
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
