use super::{LinearElastic, LocalState, NonlinElastic};
use crate::base::{Idealization, ParamStressStrain, Result};
use russell_tensor::{Tensor2, Tensor4};
use std::collections::HashMap;

/// Specifies the essential functions for stress-strain models
///
/// This is the contract a material model must satisfy to plug into the
/// solver: a consistent tangent operator, a stress update driven by a
/// strain increment, and named scalar outputs for reporting. The model
/// mutates only the state it is handed (the trial slot); backup and
/// rollback are owned by the increment controller.
pub trait StressStrainTrait: Send {
    /// Indicates that the stiffness matrix is symmetric
    fn symmetric_stiffness(&self) -> bool;

    /// Returns the number of internal values
    fn n_internal_values(&self) -> usize;

    /// Initializes the internal values for the initial stress state
    fn initialize_internal_values(&self, state: &mut LocalState) -> Result<()>;

    /// Computes the consistent tangent stiffness
    fn stiffness(&mut self, dd: &mut Tensor4, state: &LocalState) -> Result<()>;

    /// Updates the stress tensor given the strain increment tensor
    fn update_stress(&mut self, state: &mut LocalState, delta_strain: &Tensor2) -> Result<()>;

    /// Collects named scalar outputs for reporting
    fn scalar_outputs(&self, state: &LocalState, out: &mut HashMap<String, f64>);
}

/// Holds the actual stress-strain model implementation
pub struct ModelStressStrain {
    /// Holds the actual model implementation
    pub actual: Box<dyn StressStrainTrait>,
}

impl ModelStressStrain {
    /// Allocates a new instance
    pub fn new(ideal: &Idealization, param: &ParamStressStrain) -> Result<Self> {
        let actual: Box<dyn StressStrainTrait> = match *param {
            ParamStressStrain::LinearElastic { young, poisson } => Box::new(LinearElastic::new(ideal, young, poisson)),
            ParamStressStrain::NonlinElastic { young, poisson, beta } => {
                Box::new(NonlinElastic::new(ideal, young, poisson, beta))
            }
        };
        Ok(ModelStressStrain { actual })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ModelStressStrain;
    use crate::base::{Idealization, ParamSolid};

    #[test]
    fn new_works() {
        let ideal = Idealization::new(2);

        let param = ParamSolid::sample_linear_elastic();
        let model = ModelStressStrain::new(&ideal, &param.stress_strain).unwrap();
        assert!(model.actual.symmetric_stiffness());
        assert_eq!(model.actual.n_internal_values(), 0);

        let param = ParamSolid::sample_nonlin_elastic();
        let model = ModelStressStrain::new(&ideal, &param.stress_strain).unwrap();
        assert_eq!(model.actual.n_internal_values(), 1);
    }
}
