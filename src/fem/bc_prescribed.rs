use super::FemBase;
use crate::base::{BcValue, Dof, Essential, FemError, Result};
use gemlab::mesh::Mesh;
use russell_lab::Vector;

/// Holds one prescribed (essential) value
pub struct BcPrescribed {
    /// Global equation number (inside the prescribed partition)
    pub eq: usize,

    /// Coordinates of the point (for the space-time value functions)
    coords: Vec<f64>,

    /// Prescribed value
    value: BcValue,
}

/// Implements an array of BcPrescribed
pub struct BcPrescribedArray {
    /// All values
    pub all: Vec<BcPrescribed>,
}

impl BcPrescribedArray {
    /// Allocates a new instance
    ///
    /// Fails if an out-of-plane DOF is prescribed in a 2D analysis or if a
    /// (point, DOF) pair has no equation number.
    pub fn new(mesh: &Mesh, base: &FemBase, essential: &Essential) -> Result<Self> {
        let mut all = Vec::with_capacity(essential.all.len());
        for ((point_id, dof), value) in &essential.all {
            if mesh.ndim == 2 && *dof == Dof::Uz {
                return Err(FemError::InvalidBc("cannot prescribe an out-of-plane DOF in a 2D analysis"));
            }
            let eq = base.equations.eq(*point_id, *dof)?;
            if !base.equations.is_prescribed(eq) {
                return Err(FemError::InvalidBc(
                    "the essential conditions do not match the equation partition",
                ));
            }
            all.push(BcPrescribed {
                eq,
                coords: mesh.points[*point_id].coords.clone(),
                value: *value,
            });
        }
        all.sort_by_key(|bc| bc.eq);
        Ok(BcPrescribedArray { all })
    }

    /// Writes the incremental essential targets: ΔU = U(t+Δt) − U(t)
    ///
    /// Only the prescribed entries of `duu_star` are written; the unknown
    /// partition keeps its zeros (each field's increment is driven through
    /// its own partition only).
    pub fn add_increments(&self, duu_star: &mut Vector, t: f64, dt: f64) {
        for bc in &self.all {
            duu_star[bc.eq] = bc.value.value(&bc.coords, t + dt) - bc.value.value(&bc.coords, t);
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::BcPrescribedArray;
    use crate::base::{Dof, Elem, Essential, FemError, ParamSolid, SampleMeshes};
    use crate::fem::FemBase;
    use russell_lab::Vector;

    #[test]
    fn new_captures_errors() {
        let mesh = SampleMeshes::column_two_qua4();
        let p1 = ParamSolid::sample_linear_elastic();
        let mut essential = Essential::new();
        essential.points(&[0], Dof::Uz, 0.0);
        // Uz is inactive for a 2D solid, caught already by the equation numbering
        assert!(FemBase::new(&mesh, [(1, Elem::Solid(p1))], &essential).is_err());
    }

    #[test]
    fn add_increments_works() {
        let mesh = SampleMeshes::column_two_qua4();
        let p1 = ParamSolid::sample_linear_elastic();
        let mut essential = Essential::new();
        essential
            .points(&[0, 1], Dof::Uy, 0.0)
            .points_fn(&[4, 5], Dof::Uy, |x, t| -0.01 * t * x[0]);
        let base = FemBase::new(&mesh, [(1, Elem::Solid(p1))], &essential).unwrap();
        let array = BcPrescribedArray::new(&mesh, &base, &essential).unwrap();
        assert_eq!(array.all.len(), 4);

        let mut duu = Vector::new(base.equations.n_equation);
        array.add_increments(&mut duu, 1.0, 0.5);

        // fixed points get zero increments; the driven points get -0.01·Δt·x
        let eq_fixed = base.equations.eq(0, Dof::Uy).unwrap();
        assert_eq!(duu[eq_fixed], 0.0);
        let eq_driven = base.equations.eq(4, Dof::Uy).unwrap(); // x = 1.0
        assert_eq!(duu[eq_driven], -0.005);
        let eq_driven_0 = base.equations.eq(5, Dof::Uy).unwrap(); // x = 0.0
        assert_eq!(duu[eq_driven_0], 0.0);

        // the unknown partition is untouched
        for eq in 0..base.equations.n_unknown {
            assert_eq!(duu[eq], 0.0);
        }
    }

    #[test]
    fn entries_are_sorted_by_equation() {
        let mesh = SampleMeshes::column_two_qua4();
        let p1 = ParamSolid::sample_linear_elastic();
        let mut essential = Essential::new();
        essential.points(&[5, 0, 3], Dof::Ux, 0.0);
        let base = FemBase::new(&mesh, [(1, Elem::Solid(p1))], &essential).unwrap();
        let array = BcPrescribedArray::new(&mesh, &base, &essential).unwrap();
        let eqs: Vec<_> = array.all.iter().map(|bc| bc.eq).collect();
        let mut sorted = eqs.clone();
        sorted.sort();
        assert_eq!(eqs, sorted);
    }

    #[test]
    fn out_of_plane_message_is_used() {
        // exercising the InvalidBc variant directly
        let err = FemError::InvalidBc("cannot prescribe an out-of-plane DOF in a 2D analysis");
        assert_eq!(
            err.to_string(),
            "invalid boundary condition: cannot prescribe an out-of-plane DOF in a 2D analysis"
        );
    }
}
