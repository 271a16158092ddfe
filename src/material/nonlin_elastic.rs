use super::{LocalState, StressStrainTrait};
use crate::base::{Idealization, Result};
use russell_lab::{vec_norm, Norm};
use russell_tensor::{t4_ddot_t2_update, LinElasticity, Tensor2, Tensor4};
use std::collections::HashMap;

/// Implements a hyperbolic stiffness-degrading elastic model
///
/// The secant stiffness decays with the accumulated strain path length z
/// (Hardin-Drnevich style degradation):
///
/// ```text
/// σ += (D : Δε) / (1 + β z_new)    with  z_new = z + ‖Δε‖
/// ```
///
/// The tangent operator is evaluated at the state handed in, i.e. with the
/// path length of the last converged increment. The path length z is the
/// single internal value; it makes the response history-dependent, which
/// exercises the commit/rollback protocol of the increment controller.
pub struct NonlinElastic {
    model: LinElasticity,
    beta: f64,
}

impl NonlinElastic {
    /// Allocates a new instance
    pub fn new(ideal: &Idealization, young: f64, poisson: f64, beta: f64) -> Self {
        NonlinElastic {
            model: LinElasticity::new(young, poisson, ideal.two_dim, ideal.plane_stress),
            beta,
        }
    }
}

impl StressStrainTrait for NonlinElastic {
    /// Indicates that the stiffness matrix is symmetric
    fn symmetric_stiffness(&self) -> bool {
        true
    }

    /// Returns the number of internal values (the strain path length z)
    fn n_internal_values(&self) -> usize {
        1
    }

    /// Initializes the internal values for the initial stress state
    fn initialize_internal_values(&self, state: &mut LocalState) -> Result<()> {
        state.internal_values[0] = 0.0;
        Ok(())
    }

    /// Computes the tangent stiffness degraded by the current path length
    fn stiffness(&mut self, dd: &mut Tensor4, state: &LocalState) -> Result<()> {
        let z = state.internal_values[0];
        dd.set_tensor(1.0 / (1.0 + self.beta * z), self.model.get_modulus());
        Ok(())
    }

    /// Updates the stress tensor given the strain increment tensor
    fn update_stress(&mut self, state: &mut LocalState, delta_strain: &Tensor2) -> Result<()> {
        let z_new = state.internal_values[0] + vec_norm(delta_strain.vector(), Norm::Euc);
        let dd = self.model.get_modulus();
        let factor = 1.0 / (1.0 + self.beta * z_new);
        t4_ddot_t2_update(&mut state.stress, factor, dd, delta_strain, 1.0); // σ += f D : Δε
        state.internal_values[0] = z_new;
        Ok(())
    }

    /// Collects named scalar outputs for reporting
    fn scalar_outputs(&self, state: &LocalState, out: &mut HashMap<String, f64>) {
        out.insert("sig_xx".to_string(), state.stress.get(0, 0));
        out.insert("sig_yy".to_string(), state.stress.get(1, 1));
        out.insert("sig_zz".to_string(), state.stress.get(2, 2));
        out.insert("sig_xy".to_string(), state.stress.get(0, 1));
        out.insert("z".to_string(), state.internal_values[0]);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::NonlinElastic;
    use crate::base::Idealization;
    use crate::material::{LocalState, StressStrainTrait};
    use russell_lab::approx_eq;
    use russell_tensor::{Mandel, Tensor2, Tensor4};

    #[test]
    fn beta_zero_recovers_linear_elasticity() {
        let ideal = Idealization::new(2);
        let (young, poisson) = (1000.0, 0.0);
        let mut model = NonlinElastic::new(&ideal, young, poisson, 0.0);
        let mut state = LocalState::new(Mandel::Symmetric2D, 1);
        let mut deps = Tensor2::new(Mandel::Symmetric2D);
        deps.sym_set(0, 0, 0.001);
        model.update_stress(&mut state, &deps).unwrap();
        approx_eq(state.stress.get(0, 0), 1.0, 1e-12);
    }

    #[test]
    fn degradation_accumulates_path_length() {
        let ideal = Idealization::new(2);
        let (young, poisson, beta) = (1000.0, 0.0, 100.0);
        let mut model = NonlinElastic::new(&ideal, young, poisson, beta);
        let mut state = LocalState::new(Mandel::Symmetric2D, 1);

        let eps = 0.01;
        let mut deps = Tensor2::new(Mandel::Symmetric2D);
        deps.sym_set(0, 0, eps);
        model.update_stress(&mut state, &deps).unwrap();
        assert_eq!(state.internal_values[0], eps);
        approx_eq(state.stress.get(0, 0), young * eps / (1.0 + beta * eps), 1e-12);

        // the second update sees a longer path and a softer response
        let sig_1 = state.stress.get(0, 0);
        model.update_stress(&mut state, &deps).unwrap();
        let dsig_2 = state.stress.get(0, 0) - sig_1;
        assert!(dsig_2 < sig_1);
        approx_eq(state.internal_values[0], 2.0 * eps, 1e-14);
    }

    #[test]
    fn tangent_degrades_with_z() {
        let ideal = Idealization::new(2);
        let mut model = NonlinElastic::new(&ideal, 1000.0, 0.0, 100.0);
        let mut state = LocalState::new(Mandel::Symmetric2D, 1);
        let mut dd = Tensor4::new(Mandel::Symmetric2D);

        model.stiffness(&mut dd, &state).unwrap();
        let d0 = dd.get(0, 0, 0, 0);

        state.internal_values[0] = 0.01;
        model.stiffness(&mut dd, &state).unwrap();
        approx_eq(dd.get(0, 0, 0, 0), d0 / 2.0, 1e-12);
    }
}
