use super::{Dof, ElementDofsMap, Essential, FemError, Result, NDOF_PER_NODE_TOTAL};
use gemlab::mesh::{Mesh, PointId};
use serde::{Deserialize, Serialize};

/// All DOF keys in their fixed numbering order
const ALL_DOFS: [Dof; NDOF_PER_NODE_TOTAL] = [Dof::Ux, Dof::Uy, Dof::Uz, Dof::Pl];

/// Holds the global equation numbers with the unknown/prescribed partition
///
/// Equation numbers are assigned at configuration time such that all
/// unknown DOFs come first (`0..n_unknown`) and all prescribed DOFs come
/// last (`n_unknown..n_equation`). This partition is what the linear
/// system factorizes on: the unknown-unknown block is `n_unknown` square.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Equations {
    /// Total number of equations (total number of DOFs)
    pub n_equation: usize,

    /// Number of unknown DOFs (the partition boundary)
    pub n_unknown: usize,

    /// Equation id per (point, DOF); -1 means inactive (npoint * NDOF_PER_NODE_TOTAL)
    ids: Vec<i32>,
}

impl Equations {
    /// Allocates a new instance by numbering all active DOFs
    ///
    /// The essential boundary conditions are needed here because the
    /// partition (unknown first, prescribed last) is fixed by them.
    pub fn new(mesh: &Mesh, emap: &ElementDofsMap, essential: &Essential) -> Result<Self> {
        let npoint = mesh.points.len();
        let mut active = vec![false; npoint * NDOF_PER_NODE_TOTAL];
        for cell in &mesh.cells {
            let info = emap.get(cell)?;
            for m in 0..cell.points.len() {
                for (dof, _) in &info.dofs[m] {
                    active[cell.points[m] * NDOF_PER_NODE_TOTAL + (*dof as usize)] = true;
                }
            }
        }

        let mut prescribed = vec![false; npoint * NDOF_PER_NODE_TOTAL];
        for (point_id, dof) in essential.all.keys() {
            if *point_id >= npoint {
                return Err(FemError::Library("cannot find equation number because PointId is out-of-bounds"));
            }
            let index = point_id * NDOF_PER_NODE_TOTAL + (*dof as usize);
            if !active[index] {
                return Err(FemError::Library(
                    "cannot find equation number corresponding to (PointId,DOF)",
                ));
            }
            prescribed[index] = true;
        }

        // number the unknown DOFs first, then the prescribed ones
        let mut ids = vec![-1_i32; npoint * NDOF_PER_NODE_TOTAL];
        let mut count = 0;
        for point_id in 0..npoint {
            for dof in &ALL_DOFS {
                let index = point_id * NDOF_PER_NODE_TOTAL + (*dof as usize);
                if active[index] && !prescribed[index] {
                    ids[index] = count;
                    count += 1;
                }
            }
        }
        let n_unknown = count as usize;
        for point_id in 0..npoint {
            for dof in &ALL_DOFS {
                let index = point_id * NDOF_PER_NODE_TOTAL + (*dof as usize);
                if active[index] && prescribed[index] {
                    ids[index] = count;
                    count += 1;
                }
            }
        }

        Ok(Equations {
            n_equation: count as usize,
            n_unknown,
            ids,
        })
    }

    /// Returns the equation number corresponding to a (point, DOF) pair
    pub fn eq(&self, point_id: PointId, dof: Dof) -> Result<usize> {
        let npoint = self.ids.len() / NDOF_PER_NODE_TOTAL;
        if point_id >= npoint {
            return Err(FemError::Library("cannot find equation number because PointId is out-of-bounds"));
        }
        let id = self.ids[point_id * NDOF_PER_NODE_TOTAL + (dof as usize)];
        if id < 0 {
            return Err(FemError::Library(
                "cannot find equation number corresponding to (PointId,DOF)",
            ));
        }
        Ok(id as usize)
    }

    /// Tells whether an equation belongs to the prescribed partition or not
    pub fn is_prescribed(&self, eq: usize) -> bool {
        eq >= self.n_unknown
    }

    /// Returns the total number of DOFs
    pub fn ndof(&self) -> usize {
        self.n_equation
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Equations;
    use crate::base::{Attributes, Dof, Elem, ElementDofsMap, Essential, FemError, ParamPorous, ParamSolid};
    use gemlab::mesh::Samples;

    #[test]
    fn new_handles_errors() {
        let mesh = Samples::one_tri3();
        let p1 = ParamSolid::sample_linear_elastic();
        let amap = Attributes::from([(1, Elem::Solid(p1))]);
        let emap = ElementDofsMap::new(&mesh, &amap).unwrap();

        let mut essential = Essential::new();
        essential.points(&[123], Dof::Ux, 0.0);
        assert_eq!(
            Equations::new(&mesh, &emap, &essential).err(),
            Some(FemError::Library("cannot find equation number because PointId is out-of-bounds"))
        );

        let mut essential = Essential::new();
        essential.points(&[0], Dof::Pl, 0.0); // Pl is not active for Solid
        assert_eq!(
            Equations::new(&mesh, &emap, &essential).err(),
            Some(FemError::Library("cannot find equation number corresponding to (PointId,DOF)"))
        );
    }

    #[test]
    fn partition_works() {
        let mesh = Samples::one_tri3();
        let p1 = ParamSolid::sample_linear_elastic();
        let amap = Attributes::from([(1, Elem::Solid(p1))]);
        let emap = ElementDofsMap::new(&mesh, &amap).unwrap();

        let mut essential = Essential::new();
        essential.points(&[0], Dof::Ux, 0.0).points(&[0], Dof::Uy, 0.0);
        let eqs = Equations::new(&mesh, &emap, &essential).unwrap();
        assert_eq!(eqs.n_equation, 6);
        assert_eq!(eqs.n_unknown, 4);

        // unknown DOFs take 0..4 in (point, dof) order
        assert_eq!(eqs.eq(1, Dof::Ux).unwrap(), 0);
        assert_eq!(eqs.eq(1, Dof::Uy).unwrap(), 1);
        assert_eq!(eqs.eq(2, Dof::Ux).unwrap(), 2);
        assert_eq!(eqs.eq(2, Dof::Uy).unwrap(), 3);

        // prescribed DOFs take 4..6
        assert_eq!(eqs.eq(0, Dof::Ux).unwrap(), 4);
        assert_eq!(eqs.eq(0, Dof::Uy).unwrap(), 5);
        assert!(eqs.is_prescribed(4));
        assert!(eqs.is_prescribed(5));
        assert!(!eqs.is_prescribed(0));

        assert_eq!(
            eqs.eq(0, Dof::Pl).err(),
            Some(FemError::Library("cannot find equation number corresponding to (PointId,DOF)"))
        );
    }

    #[test]
    fn porous_partition_works() {
        let mesh = Samples::one_qua4();
        let p1 = ParamPorous::sample_linear_elastic_constant();
        let amap = Attributes::from([(1, Elem::Porous(p1))]);
        let emap = ElementDofsMap::new(&mesh, &amap).unwrap();

        let mut essential = Essential::new();
        essential
            .points(&[0, 1], Dof::Ux, 0.0)
            .points(&[0, 1], Dof::Uy, 0.0)
            .points(&[2, 3], Dof::Pl, 0.0);
        let eqs = Equations::new(&mesh, &emap, &essential).unwrap();
        assert_eq!(eqs.n_equation, 12);
        assert_eq!(eqs.n_unknown, 6);

        // all prescribed equations come after the boundary
        for point_id in [0, 1] {
            assert!(eqs.eq(point_id, Dof::Ux).unwrap() >= 6);
            assert!(eqs.eq(point_id, Dof::Uy).unwrap() >= 6);
        }
        for point_id in [2, 3] {
            assert!(eqs.eq(point_id, Dof::Pl).unwrap() >= 6);
            assert!(eqs.eq(point_id, Dof::Ux).unwrap() < 6);
        }
    }
}
