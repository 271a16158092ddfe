use super::{check_det_jac, fill_strain_displacement, Caps, ElementTrait, FemBase, FemState};
use crate::base::{Config, ParamSolid, Result};
use crate::material::{IpState, LocalState, ModelStressStrain};
use gemlab::integ::Gauss;
use gemlab::mesh::{Cell, CellId, Mesh};
use gemlab::shapes::Scratchpad;
use russell_lab::{Matrix, Vector};
use russell_tensor::{Tensor2, Tensor4};
use std::collections::HashMap;

/// Implements the mechanical (deformation only) element
///
/// The stiffness is the weighted sum over Gauss points of `Bᵀ·D·B·|J|·w`
/// with B in the Mandel basis. The update pushes the local strain
/// increments through the material model and accumulates `Bᵀ·Δσ·|J|·w`.
pub struct ElementSolid<'a> {
    /// Global configuration
    config: &'a Config,

    /// The id of this cell (for diagnostics)
    cell_id: CellId,

    /// Material model
    model: ModelStressStrain,

    /// Scratchpad to perform numerical integration
    pad: Scratchpad,

    /// Integration (Gauss) points
    gauss: Gauss,

    /// Committed/trial state of each integration point
    ips: Vec<IpState<LocalState>>,

    /// Local-to-global equation map (all DOFs are mechanical)
    l2g: Vec<usize>,

    /// Strain-displacement matrix (scratch)
    bb: Matrix,

    /// Tangent operator (scratch)
    dd: Tensor4,

    /// Local increment of the primary unknowns (scratch)
    du_loc: Vector,

    /// Strain increment at one integration point (scratch)
    deps: Tensor2,
}

impl<'a> ElementSolid<'a> {
    /// Allocates a new instance
    pub fn new(mesh: &Mesh, base: &FemBase, config: &'a Config, cell: &Cell, param: ParamSolid) -> Result<Self> {
        let pad = mesh.get_pad(cell.id);
        let gauss = Gauss::new_or_sized(cell.kind, param.ngauss)?;
        let mandel = config.ideal.mandel();
        let model = ModelStressStrain::new(&config.ideal, &param.stress_strain)?;
        let n_int_val = param.n_int_val();
        let mut ips = Vec::with_capacity(gauss.npoint());
        for _ in 0..gauss.npoint() {
            let mut state = LocalState::new(mandel, n_int_val);
            model.actual.initialize_internal_values(&mut state)?;
            ips.push(IpState::new(state));
        }
        let l2g = base.local_to_global(cell)?;
        let neq = l2g.len();
        let dim_b = mandel.dim();
        Ok(ElementSolid {
            config,
            cell_id: cell.id,
            model,
            pad,
            gauss,
            ips,
            l2g,
            bb: Matrix::new(dim_b, neq),
            dd: Tensor4::new(mandel),
            du_loc: Vector::new(neq),
            deps: Tensor2::new(mandel),
        })
    }

    /// Returns the integration factor (det(J) · w · thickness)
    fn integ_factor(&self, det_jac: f64, p: usize) -> f64 {
        let thickness = if self.config.ideal.two_dim {
            self.config.ideal.thickness
        } else {
            1.0
        };
        det_jac * self.gauss.weight(p) * thickness
    }
}

impl<'a> ElementTrait for ElementSolid<'a> {
    fn caps(&self) -> Caps {
        Caps {
            stiffness: true,
            ..Default::default()
        }
    }

    fn local_to_global(&self) -> &[usize] {
        &self.l2g
    }

    fn mech_eqs(&self) -> &[usize] {
        &self.l2g
    }

    fn flow_eqs(&self) -> &[usize] {
        &[]
    }

    fn symmetric_stiffness(&self) -> bool {
        self.model.actual.symmetric_stiffness()
    }

    fn stiffness(&mut self, kke: &mut Matrix, _state: &FemState) -> Result<()> {
        let neq = self.l2g.len();
        let dim_b = self.deps.vector().dim();
        kke.fill(0.0);
        for p in 0..self.gauss.npoint() {
            let iota = self.gauss.coords(p);
            let det_jac = check_det_jac(self.cell_id, self.pad.calc_gradient(iota)?)?;
            self.model.actual.stiffness(&mut self.dd, &self.ips[p].committed)?;
            fill_strain_displacement(&mut self.bb, &self.pad, self.config.ideal.two_dim);
            let c = self.integ_factor(det_jac, p);
            let ddm = self.dd.matrix();
            for i in 0..neq {
                for j in 0..neq {
                    let mut sum = 0.0;
                    for a in 0..dim_b {
                        for b in 0..dim_b {
                            sum += self.bb.get(a, i) * ddm.get(a, b) * self.bb.get(b, j);
                        }
                    }
                    kke.set(i, j, kke.get(i, j) + c * sum);
                }
            }
        }
        Ok(())
    }

    fn update(&mut self, fe_int: &mut Vector, state: &FemState) -> Result<()> {
        let neq = self.l2g.len();
        let dim_b = self.deps.vector().dim();
        fe_int.fill(0.0);
        for k in 0..neq {
            self.du_loc[k] = state.duu[self.l2g[k]];
        }
        for p in 0..self.gauss.npoint() {
            let iota = self.gauss.coords(p);
            let det_jac = check_det_jac(self.cell_id, self.pad.calc_gradient(iota)?)?;
            fill_strain_displacement(&mut self.bb, &self.pad, self.config.ideal.two_dim);

            // Δε = B · Δu
            {
                let deps = self.deps.vector_mut();
                for a in 0..dim_b {
                    deps[a] = 0.0;
                    for k in 0..neq {
                        deps[a] += self.bb.get(a, k) * self.du_loc[k];
                    }
                }
            }

            // trial stress update (the committed slot is never touched here)
            let c = self.integ_factor(det_jac, p);
            let ip = &mut self.ips[p];
            self.model.actual.update_stress(&mut ip.trial, &self.deps)?;

            // fe += Bᵀ · Δσ · |J| · w
            let sig_trial = ip.trial.stress.vector();
            let sig_committed = ip.committed.stress.vector();
            for k in 0..neq {
                let mut sum = 0.0;
                for a in 0..dim_b {
                    sum += self.bb.get(a, k) * (sig_trial[a] - sig_committed[a]);
                }
                fe_int[k] += c * sum;
            }
        }
        Ok(())
    }

    fn rollback(&mut self) {
        self.ips.iter_mut().for_each(|ip| ip.rollback());
    }

    fn commit(&mut self) {
        self.ips.iter_mut().for_each(|ip| ip.commit());
    }

    fn scalar_outputs(&self, out: &mut HashMap<String, f64>) {
        let nip = self.ips.len() as f64;
        for ip in &self.ips {
            let mut one = HashMap::new();
            self.model.actual.scalar_outputs(&ip.committed, &mut one);
            for (key, value) in one {
                *out.entry(key).or_insert(0.0) += value / nip;
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ElementSolid;
    use crate::base::{Config, Elem, Essential, ParamSolid, SampleMeshes};
    use crate::fem::{ElementTrait, FemBase, FemState};
    use russell_lab::{mat_approx_eq, Matrix, Vector};

    #[test]
    fn stiffness_is_symmetric() {
        let mesh = SampleMeshes::column_two_qua4();
        let p1 = ParamSolid::sample_linear_elastic();
        let essential = Essential::new();
        let base = FemBase::new(&mesh, [(1, Elem::Solid(p1))], &essential).unwrap();
        let config = Config::new(&mesh);
        let state = FemState::new(&base, &config).unwrap();
        let mut elem = ElementSolid::new(&mesh, &base, &config, &mesh.cells[0], p1).unwrap();
        assert!(elem.symmetric_stiffness());

        let neq = elem.local_to_global().len();
        let mut kke = Matrix::new(neq, neq);
        elem.stiffness(&mut kke, &state).unwrap();

        let mut kke_t = Matrix::new(neq, neq);
        for i in 0..neq {
            for j in 0..neq {
                kke_t.set(i, j, kke.get(j, i));
            }
        }
        mat_approx_eq(&kke, &kke_t, 1e-10);
        assert!(kke.get(0, 0) > 0.0);
    }

    #[test]
    fn update_is_consistent_with_stiffness() {
        // for a linear elastic element, fe = Ke · Δu exactly
        let mesh = SampleMeshes::column_two_qua4();
        let p1 = ParamSolid::sample_linear_elastic();
        let essential = Essential::new();
        let base = FemBase::new(&mesh, [(1, Elem::Solid(p1))], &essential).unwrap();
        let config = Config::new(&mesh);
        let mut state = FemState::new(&base, &config).unwrap();
        let mut elem = ElementSolid::new(&mesh, &base, &config, &mesh.cells[0], p1).unwrap();

        let neq = elem.local_to_global().len();
        let mut kke = Matrix::new(neq, neq);
        elem.stiffness(&mut kke, &state).unwrap();

        // a linear displacement increment on the element DOFs
        let l2g = elem.local_to_global().to_vec();
        for (k, eq) in l2g.iter().enumerate() {
            state.duu[*eq] = 1e-4 * (k as f64 + 1.0);
        }

        let mut fe = Vector::new(neq);
        elem.update(&mut fe, &state).unwrap();

        for i in 0..neq {
            let mut expected = 0.0;
            for j in 0..neq {
                expected += kke.get(i, j) * state.duu[l2g[j]];
            }
            assert!((fe[i] - expected).abs() < 1e-10);
        }
    }

    #[test]
    fn update_after_rollback_is_idempotent() {
        let mesh = SampleMeshes::column_two_qua4();
        let p1 = ParamSolid::sample_nonlin_elastic();
        let essential = Essential::new();
        let base = FemBase::new(&mesh, [(1, Elem::Solid(p1))], &essential).unwrap();
        let config = Config::new(&mesh);
        let mut state = FemState::new(&base, &config).unwrap();
        let mut elem = ElementSolid::new(&mesh, &base, &config, &mesh.cells[0], p1).unwrap();

        let neq = elem.local_to_global().len();
        let l2g = elem.local_to_global().to_vec();
        for (k, eq) in l2g.iter().enumerate() {
            state.duu[*eq] = 1e-3 * (k as f64);
        }

        let mut fe_1 = Vector::new(neq);
        elem.rollback();
        elem.update(&mut fe_1, &state).unwrap();

        let mut fe_2 = Vector::new(neq);
        elem.rollback();
        elem.update(&mut fe_2, &state).unwrap();

        // bit-identical internal forces after rollback
        assert_eq!(fe_1.as_data(), fe_2.as_data());
    }
}
