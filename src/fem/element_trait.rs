use super::FemState;
use crate::base::{FemError, Result};
use russell_lab::{Matrix, Vector};
use std::collections::HashMap;

/// Declares which operations an element supports
///
/// The capability set is fixed at construction time; the assembler queries
/// it instead of probing for methods at runtime. An element whose flag is
/// off never has the corresponding method called.
#[derive(Clone, Copy, Debug, Default)]
pub struct Caps {
    /// Produces a mechanical stiffness matrix (mech × mech)
    pub stiffness: bool,

    /// Produces a coupling matrix linking mechanical and flow DOFs (mech × flow)
    pub coupling: bool,

    /// Produces a conductivity matrix (flow × flow)
    pub conductivity: bool,

    /// Produces a storage (compressibility) matrix (flow × flow)
    pub storage: bool,

    /// Produces a right-hand-side source vector (flow)
    pub rhs: bool,
}

/// Defines the contract of element integrators
///
/// Matrix operators are always evaluated on the committed Gauss-point
/// state; `update` reads the cumulative trial increment (`state.duu`) and
/// writes only the trial slots. The commit/rollback protocol belongs to
/// the increment controller.
pub trait ElementTrait: Send {
    /// Returns the capability set declared at construction
    fn caps(&self) -> Caps;

    /// Returns the local-to-global equation map (all local equations)
    fn local_to_global(&self) -> &[usize];

    /// Returns the global equation numbers of the mechanical DOFs
    fn mech_eqs(&self) -> &[usize];

    /// Returns the global equation numbers of the flow DOFs
    fn flow_eqs(&self) -> &[usize];

    /// Returns whether the local stiffness matrix is symmetric or not
    fn symmetric_stiffness(&self) -> bool {
        true
    }

    /// Performs the one-time initialization pass (e.g. joint thickness)
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    /// Calculates the stiffness matrix K (mech × mech)
    fn stiffness(&mut self, _kke: &mut Matrix, _state: &FemState) -> Result<()> {
        Err(FemError::Library("element does not implement the stiffness operation"))
    }

    /// Calculates the coupling matrix Q (mech × flow)
    fn coupling_matrix(&mut self, _qq: &mut Matrix, _state: &FemState) -> Result<()> {
        Err(FemError::Library("element does not implement the coupling operation"))
    }

    /// Calculates the conductivity matrix H (flow × flow)
    fn conductivity_matrix(&mut self, _hh: &mut Matrix, _state: &FemState) -> Result<()> {
        Err(FemError::Library("element does not implement the conductivity operation"))
    }

    /// Calculates the storage matrix S (flow × flow)
    fn storage_matrix(&mut self, _ss: &mut Matrix, _state: &FemState) -> Result<()> {
        Err(FemError::Library("element does not implement the storage operation"))
    }

    /// Calculates the right-hand-side source vector b (flow)
    fn rhs_vector(&mut self, _bb: &mut Vector, _state: &FemState) -> Result<()> {
        Err(FemError::Library("element does not implement the rhs operation"))
    }

    /// Recomputes the local internal force/flux increment from the
    /// cumulative trial increment `state.duu`, updating the trial
    /// Gauss-point states through the material models
    ///
    /// `fe_int` has the length of `local_to_global`.
    fn update(&mut self, fe_int: &mut Vector, state: &FemState) -> Result<()>;

    /// Restores every trial Gauss-point state from its committed snapshot
    fn rollback(&mut self);

    /// Makes every trial Gauss-point state permanent
    fn commit(&mut self);

    /// Collects named scalar outputs averaged over the Gauss points
    fn scalar_outputs(&self, out: &mut HashMap<String, f64>);
}
