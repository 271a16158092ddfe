//! Makes the most commonly used structures available

pub use crate::base::{Config, Dof, Elem, Essential, FemError, Natural, Nbc, Pbc, Result};
pub use crate::base::{ParamConductivity, ParamJoint, ParamPorous, ParamSeepage, ParamSolid, ParamStressStrain};
pub use crate::base::SampleMeshes;
pub use crate::fem::{FemBase, FemState, FileIo, SolverImplicit};
