//! Implements the base structures for the finite element solver: errors,
//! degrees of freedom, equation numbering, boundary conditions, parameters,
//! and the partitioned assembly helpers

mod assembly;
mod attributes;
mod config;
mod enums;
mod equations;
mod error;
mod essential;
mod idealization;
mod natural;
mod parameters;
mod sample_meshes;
pub use assembly::*;
pub use attributes::*;
pub use config::*;
pub use enums::*;
pub use equations::*;
pub use error::*;
pub use essential::*;
pub use idealization::*;
pub use natural::*;
pub use parameters::*;
pub use sample_meshes::*;
