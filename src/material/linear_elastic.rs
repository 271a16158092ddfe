use super::{LocalState, StressStrainTrait};
use crate::base::{Idealization, Result};
use russell_tensor::{t4_ddot_t2_update, LinElasticity, Tensor2, Tensor4};
use std::collections::HashMap;

/// Implements a linear elastic model
pub struct LinearElastic {
    pub model: LinElasticity,
}

impl LinearElastic {
    /// Allocates a new instance
    pub fn new(ideal: &Idealization, young: f64, poisson: f64) -> Self {
        LinearElastic {
            model: LinElasticity::new(young, poisson, ideal.two_dim, ideal.plane_stress),
        }
    }
}

impl StressStrainTrait for LinearElastic {
    /// Indicates that the stiffness matrix is symmetric and constant
    fn symmetric_stiffness(&self) -> bool {
        true
    }

    /// Returns the number of internal values
    fn n_internal_values(&self) -> usize {
        0
    }

    /// Initializes the internal values for the initial stress state
    fn initialize_internal_values(&self, _state: &mut LocalState) -> Result<()> {
        Ok(())
    }

    /// Computes the consistent tangent stiffness
    fn stiffness(&mut self, dd: &mut Tensor4, _state: &LocalState) -> Result<()> {
        dd.set_tensor(1.0, self.model.get_modulus());
        Ok(())
    }

    /// Updates the stress tensor given the strain increment tensor
    fn update_stress(&mut self, state: &mut LocalState, delta_strain: &Tensor2) -> Result<()> {
        let dd = self.model.get_modulus();
        t4_ddot_t2_update(&mut state.stress, 1.0, dd, delta_strain, 1.0); // σ += D : Δε
        Ok(())
    }

    /// Collects named scalar outputs for reporting
    fn scalar_outputs(&self, state: &LocalState, out: &mut HashMap<String, f64>) {
        out.insert("sig_xx".to_string(), state.stress.get(0, 0));
        out.insert("sig_yy".to_string(), state.stress.get(1, 1));
        out.insert("sig_zz".to_string(), state.stress.get(2, 2));
        out.insert("sig_xy".to_string(), state.stress.get(0, 1));
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::LinearElastic;
    use crate::base::Idealization;
    use crate::material::{LocalState, StressStrainTrait};
    use russell_lab::approx_eq;
    use russell_tensor::{Mandel, Tensor2, Tensor4};
    use std::collections::HashMap;

    #[test]
    fn update_stress_works_uniaxial_strain() {
        // plane-strain, uniaxial strain: σyy = D11 εyy, σxx = σzz = D01 εyy
        let ideal = Idealization::new(2);
        let (young, poisson) = (1000.0, 0.25);
        let mut model = LinearElastic::new(&ideal, young, poisson);

        let mut state = LocalState::new(Mandel::Symmetric2D, 0);
        let mut deps = Tensor2::new(Mandel::Symmetric2D);
        let eps_v = -0.001;
        deps.sym_set(1, 1, eps_v);
        model.update_stress(&mut state, &deps).unwrap();

        let fac = young / ((1.0 + poisson) * (1.0 - 2.0 * poisson));
        let d11 = fac * (1.0 - poisson);
        let d01 = fac * poisson;
        approx_eq(state.stress.get(1, 1), d11 * eps_v, 1e-12);
        approx_eq(state.stress.get(0, 0), d01 * eps_v, 1e-12);
        approx_eq(state.stress.get(2, 2), d01 * eps_v, 1e-12);

        // second update accumulates
        model.update_stress(&mut state, &deps).unwrap();
        approx_eq(state.stress.get(1, 1), 2.0 * d11 * eps_v, 1e-12);
    }

    #[test]
    fn stiffness_and_outputs_work() {
        let ideal = Idealization::new(2);
        let mut model = LinearElastic::new(&ideal, 500.0, 0.2);
        let state = LocalState::new(Mandel::Symmetric2D, 0);
        let mut dd = Tensor4::new(Mandel::Symmetric2D);
        model.stiffness(&mut dd, &state).unwrap();
        approx_eq(dd.get(0, 0, 0, 0), 500.0 * 0.8 / (1.2 * 0.6), 1e-12);

        let mut out = HashMap::new();
        model.scalar_outputs(&state, &mut out);
        assert_eq!(out.get("sig_xx"), Some(&0.0));
        assert_eq!(out.len(), 4);
    }
}
