//! Implements the finite element solver: element integrators, boundary
//! condition integrators, the partitioned linear system, and the implicit
//! nonlinear increment controller

mod auxiliary;
mod bc_concentrated;
mod bc_distributed;
mod bc_prescribed;
mod control_convergence;
mod control_time;
mod element_joint;
mod element_porous;
mod element_seepage;
mod element_solid;
mod element_trait;
mod elements;
mod fem_base;
mod fem_state;
mod file_io;
mod linear_system;
mod solver_implicit;
pub(crate) use auxiliary::*;
pub use bc_concentrated::*;
pub use bc_distributed::*;
pub use bc_prescribed::*;
pub use control_convergence::*;
pub use control_time::*;
pub use element_joint::*;
pub use element_porous::*;
pub use element_seepage::*;
pub use element_solid::*;
pub use element_trait::*;
pub use elements::*;
pub use fem_base::*;
pub use fem_state::*;
pub use file_io::*;
pub use linear_system::*;
pub use solver_implicit::*;
