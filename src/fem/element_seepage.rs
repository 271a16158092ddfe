use super::{check_det_jac, Caps, ElementTrait, FemBase, FemState};
use crate::base::{Config, ParamSeepage, Result};
use crate::material::{IpState, LocalStateLiq, ModelConductivity};
use gemlab::integ::Gauss;
use gemlab::mesh::{Cell, CellId, Mesh};
use gemlab::shapes::Scratchpad;
use russell_lab::{Matrix, Vector};
use russell_tensor::Tensor2;
use std::collections::HashMap;

/// Implements the liquid flow (seepage) element
///
/// Produces the conductivity matrix `H = Σ Gᵀ·k·G·|J|·w`, the storage
/// matrix `S = Σ Nᵀ·Ss·N·|J|·w`, and the gravity-driven source vector.
/// The update computes the incremental mass-balance flux with the flow
/// equations negated, matching the global system convention.
pub struct ElementSeepage<'a> {
    /// Global configuration
    config: &'a Config,

    /// The id of this cell (for diagnostics)
    cell_id: CellId,

    /// Element parameters
    param: ParamSeepage,

    /// Conductivity model
    cond: ModelConductivity,

    /// Scratchpad to perform numerical integration
    pad: Scratchpad,

    /// Integration (Gauss) points
    gauss: Gauss,

    /// Committed/trial state of each integration point
    ips: Vec<IpState<LocalStateLiq>>,

    /// Local-to-global equation map (all DOFs are liquid pressures)
    l2g: Vec<usize>,

    /// Conductivity tensor (scratch)
    kk_ten: Tensor2,

    /// Local increment of the liquid pressures (scratch)
    dpl_loc: Vector,
}

impl<'a> ElementSeepage<'a> {
    /// Allocates a new instance
    pub fn new(mesh: &Mesh, base: &FemBase, config: &'a Config, cell: &Cell, param: ParamSeepage) -> Result<Self> {
        let pad = mesh.get_pad(cell.id);
        let gauss = Gauss::new_or_sized(cell.kind, param.ngauss)?;
        let cond = ModelConductivity::new(&config.ideal, &param.conductivity)?;
        let ips = (0..gauss.npoint())
            .map(|_| IpState::new(LocalStateLiq::new(param.porosity)))
            .collect();
        let l2g = base.local_to_global(cell)?;
        let neq = l2g.len();
        Ok(ElementSeepage {
            config,
            cell_id: cell.id,
            param,
            cond,
            pad,
            gauss,
            ips,
            l2g,
            kk_ten: Tensor2::new(config.ideal.mandel()),
            dpl_loc: Vector::new(neq),
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

impl<'a> ElementTrait for ElementSeepage<'a> {
    fn caps(&self) -> Caps {
        Caps {
            conductivity: true,
            storage: true,
            rhs: true,
            ..Default::default()
        }
    }

    fn local_to_global(&self) -> &[usize] {
        &self.l2g
    }

    fn mech_eqs(&self) -> &[usize] {
        &[]
    }

    fn flow_eqs(&self) -> &[usize] {
        &self.l2g
    }

    fn conductivity_matrix(&mut self, hh: &mut Matrix, _state: &FemState) -> Result<()> {
        let ndim = self.config.ideal.ndim();
        let nnode = self.l2g.len();
        hh.fill(0.0);
        for p in 0..self.gauss.npoint() {
            let iota = self.gauss.coords(p);
            let det_jac = check_det_jac(self.cell_id, self.pad.calc_gradient(iota)?)?;
            self.cond.calc_k(&mut self.kk_ten, self.ips[p].committed.pl)?;
            let c = self.integ_factor(det_jac, p);
            let g = &self.pad.gradient;
            for m in 0..nnode {
                for n in 0..nnode {
                    let mut sum = 0.0;
                    for i in 0..ndim {
                        for j in 0..ndim {
                            sum += g.get(m, i) * self.kk_ten.get(i, j) * g.get(n, j);
                        }
                    }
                    hh.set(m, n, hh.get(m, n) + c * sum);
                }
            }
        }
        Ok(())
    }

    fn storage_matrix(&mut self, ss: &mut Matrix, _state: &FemState) -> Result<()> {
        let nnode = self.l2g.len();
        ss.fill(0.0);
        if self.param.storativity == 0.0 {
            return Ok(());
        }
        for p in 0..self.gauss.npoint() {
            let iota = self.gauss.coords(p);
            let det_jac = check_det_jac(self.cell_id, self.pad.calc_jacobian(iota)?)?;
            self.pad.calc_interp(iota);
            let c = self.integ_factor(det_jac, p) * self.param.storativity;
            let nn = &self.pad.interp;
            for m in 0..nnode {
                for n in 0..nnode {
                    ss.set(m, n, ss.get(m, n) + c * nn[m] * nn[n]);
                }
            }
        }
        Ok(())
    }

    fn rhs_vector(&mut self, bb: &mut Vector, _state: &FemState) -> Result<()> {
        let ndim = self.config.ideal.ndim();
        let nnode = self.l2g.len();
        bb.fill(0.0);
        if self.config.gravity == 0.0 {
            return Ok(());
        }
        // gravity term of the mass balance: b = Gᵀ · k · ρl·g·êz
        let rho_g = self.param.density_liquid * self.config.gravity;
        for p in 0..self.gauss.npoint() {
            let iota = self.gauss.coords(p);
            let det_jac = check_det_jac(self.cell_id, self.pad.calc_gradient(iota)?)?;
            self.cond.calc_k(&mut self.kk_ten, self.ips[p].committed.pl)?;
            let c = self.integ_factor(det_jac, p);
            let g = &self.pad.gradient;
            for m in 0..nnode {
                let mut sum = 0.0;
                for i in 0..ndim {
                    sum += g.get(m, i) * self.kk_ten.get(i, ndim - 1) * rho_g;
                }
                bb[m] += c * sum;
            }
        }
        Ok(())
    }

    fn update(&mut self, fe_int: &mut Vector, state: &FemState) -> Result<()> {
        let ndim = self.config.ideal.ndim();
        let nnode = self.l2g.len();
        let theta = self.config.theta;
        let dt = state.dt;
        fe_int.fill(0.0);
        for m in 0..nnode {
            self.dpl_loc[m] = state.duu[self.l2g[m]];
        }
        for p in 0..self.gauss.npoint() {
            let iota = self.gauss.coords(p);
            let det_jac = check_det_jac(self.cell_id, self.pad.calc_gradient(iota)?)?;
            self.pad.calc_interp(iota);
            self.cond.calc_k(&mut self.kk_ten, self.ips[p].committed.pl)?;
            let c = self.integ_factor(det_jac, p);
            let g = &self.pad.gradient;
            let nn = &self.pad.interp;

            // Δp and ∇Δp at the integration point
            let mut dpl = 0.0;
            let mut grad_dpl = [0.0; 3];
            for m in 0..nnode {
                dpl += nn[m] * self.dpl_loc[m];
                for i in 0..ndim {
                    grad_dpl[i] += g.get(m, i) * self.dpl_loc[m];
                }
            }

            // trial liquid state
            let ip = &mut self.ips[p];
            ip.trial.pl = ip.committed.pl + dpl;

            // negated mass balance: fe -= S Δp + θ Δt (Gᵀ k ∇Δp)
            for m in 0..nnode {
                let mut conduction = 0.0;
                for i in 0..ndim {
                    for j in 0..ndim {
                        conduction += g.get(m, i) * self.kk_ten.get(i, j) * grad_dpl[j];
                    }
                }
                fe_int[m] -= c * (self.param.storativity * nn[m] * dpl + theta * dt * conduction);
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
        let mut pl = 0.0;
        let mut saturation = 0.0;
        for ip in &self.ips {
            pl += ip.committed.pl / nip;
            saturation += ip.committed.saturation / nip;
        }
        out.insert("pl".to_string(), pl);
        out.insert("saturation".to_string(), saturation);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ElementSeepage;
    use crate::base::{Config, Elem, Essential, ParamSeepage, SampleMeshes};
    use crate::fem::{ElementTrait, FemBase, FemState};
    use russell_lab::{approx_eq, Matrix, Vector};

    #[test]
    fn conductivity_matrix_works_unit_square() {
        // H for a unit square with isotropic k equals the standard
        // 4x4 Laplacian matrix scaled by k
        let mesh = SampleMeshes::column_two_qua4();
        let p1 = ParamSeepage::sample_constant();
        let essential = Essential::new();
        let base = FemBase::new(&mesh, [(1, Elem::Seepage(p1))], &essential).unwrap();
        let config = Config::new(&mesh);
        let state = FemState::new(&base, &config).unwrap();
        let mut elem = ElementSeepage::new(&mesh, &base, &config, &mesh.cells[0], p1).unwrap();

        let mut hh = Matrix::new(4, 4);
        elem.conductivity_matrix(&mut hh, &state).unwrap();

        let k = 0.1;
        // the classic Qua4 Laplacian: diag = 2k/3, adjacent = -k/6, opposite = -k/3
        approx_eq(hh.get(0, 0), 2.0 * k / 3.0, 1e-14);
        approx_eq(hh.get(0, 1), -k / 6.0, 1e-14);
        approx_eq(hh.get(0, 2), -k / 3.0, 1e-14);
        approx_eq(hh.get(0, 3), -k / 6.0, 1e-14);

        // symmetry and zero row sums
        for m in 0..4 {
            let mut row = 0.0;
            for n in 0..4 {
                row += hh.get(m, n);
                approx_eq(hh.get(m, n), hh.get(n, m), 1e-14);
            }
            approx_eq(row, 0.0, 1e-14);
        }
    }

    #[test]
    fn storage_matrix_works_unit_square() {
        let mesh = SampleMeshes::column_two_qua4();
        let p1 = ParamSeepage::sample_constant();
        let essential = Essential::new();
        let base = FemBase::new(&mesh, [(1, Elem::Seepage(p1))], &essential).unwrap();
        let config = Config::new(&mesh);
        let state = FemState::new(&base, &config).unwrap();
        let mut elem = ElementSeepage::new(&mesh, &base, &config, &mesh.cells[0], p1).unwrap();

        let mut ss = Matrix::new(4, 4);
        elem.storage_matrix(&mut ss, &state).unwrap();

        // consistent mass matrix of the unit square: Ss/36 * [4 2 1 2; ...]
        let m0 = p1.storativity / 36.0;
        approx_eq(ss.get(0, 0), 4.0 * m0, 1e-14);
        approx_eq(ss.get(0, 1), 2.0 * m0, 1e-14);
        approx_eq(ss.get(0, 2), 1.0 * m0, 1e-14);
        approx_eq(ss.get(0, 3), 2.0 * m0, 1e-14);
    }

    #[test]
    fn update_matches_matrices_for_linear_response() {
        // fe = -(S + θ Δt H) Δp for the constant-conductivity element
        let mesh = SampleMeshes::column_two_qua4();
        let p1 = ParamSeepage::sample_constant();
        let essential = Essential::new();
        let base = FemBase::new(&mesh, [(1, Elem::Seepage(p1))], &essential).unwrap();
        let config = Config::new(&mesh);
        let mut state = FemState::new(&base, &config).unwrap();
        state.dt = 0.25;
        let mut elem = ElementSeepage::new(&mesh, &base, &config, &mesh.cells[0], p1).unwrap();

        let mut hh = Matrix::new(4, 4);
        let mut ss = Matrix::new(4, 4);
        elem.conductivity_matrix(&mut hh, &state).unwrap();
        elem.storage_matrix(&mut ss, &state).unwrap();

        let l2g = elem.local_to_global().to_vec();
        for (m, eq) in l2g.iter().enumerate() {
            state.duu[*eq] = 1.0 + (m as f64);
        }

        let mut fe = Vector::new(4);
        elem.update(&mut fe, &state).unwrap();

        for m in 0..4 {
            let mut expected = 0.0;
            for n in 0..4 {
                expected -= (ss.get(m, n) + config.theta * state.dt * hh.get(m, n)) * state.duu[l2g[n]];
            }
            approx_eq(fe[m], expected, 1e-13);
        }
    }
}
