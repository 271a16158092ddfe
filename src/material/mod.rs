//! Implements material models and the Gauss-point state with the
//! committed/trial double buffer

mod linear_elastic;
mod local_state;
mod model_conductivity;
mod nonlin_elastic;
mod stress_strain;
pub use linear_elastic::*;
pub use local_state::*;
pub use model_conductivity::*;
pub use nonlin_elastic::*;
pub use stress_strain::*;
