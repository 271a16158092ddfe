use super::{ParamJoint, ParamPorous, ParamSeepage, ParamSolid};
use serde::{Deserialize, Serialize};

/// Defines degrees-of-freedom (DOF) types
///
/// Note: The fixed numbering scheme assists in sorting the DOFs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Dof {
    /// Displacement along the first dimension
    Ux = 0,

    /// Displacement along the second dimension
    Uy = 1,

    /// Displacement along the third dimension
    Uz = 2,

    /// Liquid pressure
    Pl = 3,
}

/// Defines the total number of available DOF types
pub const NDOF_PER_NODE_TOTAL: usize = 4;

/// Defines the element type keyed by cell attribute
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub enum Elem {
    /// Mechanical (deformation only) element
    Solid(ParamSolid),

    /// Liquid flow (seepage) element
    Seepage(ParamSeepage),

    /// Coupled deformation/liquid-flow element
    Porous(ParamPorous),

    /// Zero-thickness interface element
    Joint(ParamJoint),
}

/// Defines natural boundary conditions (NBC)
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub enum Nbc {
    /// Normal distributed load
    Qn,

    /// Distributed load parallel to x
    Qx,

    /// Distributed load parallel to y
    Qy,

    /// Distributed load parallel to z
    Qz,

    /// Liquid flux
    Ql,
}

impl Nbc {
    /// Returns the boundary cell DOF keys and local equation numbers
    ///
    /// **Notes:** The outer array has length = nnode.
    /// The inner arrays have lengths = ndof at the node.
    #[rustfmt::skip]
    pub fn dof_equation_pairs(&self, ndim: usize, nnode: usize) -> Vec<Vec<(Dof, usize)>> {
        let mut dofs = vec![Vec::new(); nnode];
        let mut count = 0;
        let mut solid = || {
            for m in 0..nnode {
                dofs[m].push((Dof::Ux, count)); count += 1;
                dofs[m].push((Dof::Uy, count)); count += 1;
                if ndim == 3 {
                    dofs[m].push((Dof::Uz, count)); count += 1;
                }
            }
        };
        match self {
            Nbc::Qn => solid(),
            Nbc::Qx => solid(),
            Nbc::Qy => solid(),
            Nbc::Qz => solid(),
            Nbc::Ql => {
                for m in 0..nnode {
                    dofs[m].push((Dof::Pl, count)); count += 1;
                }
            }
        }
        dofs
    }

    /// Indicates whether this NBC drives mechanical DOFs or the liquid flux
    pub fn is_mechanical(&self) -> bool {
        match self {
            Nbc::Ql => false,
            _ => true,
        }
    }
}

/// Defines point boundary conditions (e.g., point loads)
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub enum Pbc {
    /// Concentrated load parallel to x
    Fx,

    /// Concentrated load parallel to y
    Fy,

    /// Concentrated load parallel to z
    Fz,

    /// Concentrated liquid source
    Ql,
}

impl Pbc {
    /// Returns the DOF corresponding to the concentrated load
    pub fn dof(&self) -> Dof {
        match self {
            Pbc::Fx => Dof::Ux,
            Pbc::Fy => Dof::Uy,
            Pbc::Fz => Dof::Uz,
            Pbc::Ql => Dof::Pl,
        }
    }

    /// Indicates whether this PBC is a force (total) or a flow rate
    pub fn is_mechanical(&self) -> bool {
        match self {
            Pbc::Ql => false,
            _ => true,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
