use super::{check_det_jac, fill_strain_displacement, Caps, ElementTrait, FemBase, FemState};
use crate::base::{Config, ParamPorous, Result};
use crate::material::{IpState, LocalStatePorous, ModelConductivity, ModelStressStrain};
use gemlab::integ::Gauss;
use gemlab::mesh::{Cell, CellId, Mesh};
use gemlab::shapes::Scratchpad;
use russell_lab::{Matrix, Vector};
use russell_tensor::{Tensor2, Tensor4};
use std::collections::HashMap;

/// Implements the coupled deformation/liquid-flow (porous) element
///
/// Combines the mechanical stiffness, the coupling matrix
/// `Q = Σ Bᵀ·α·m·Nₚ·|J|·w` (m is the Mandel identity vector), the
/// conductivity and storage matrices, and the gravity source. The local
/// equations keep the mechanical block first and the flow block last.
pub struct ElementPorous<'a> {
    /// Global configuration
    config: &'a Config,

    /// The id of this cell (for diagnostics)
    cell_id: CellId,

    /// Element parameters
    param: ParamPorous,

    /// Stress-strain model
    model: ModelStressStrain,

    /// Conductivity model
    cond: ModelConductivity,

    /// Scratchpad to perform numerical integration
    pad: Scratchpad,

    /// Integration (Gauss) points
    gauss: Gauss,

    /// Committed/trial state of each integration point
    ips: Vec<IpState<LocalStatePorous>>,

    /// Local-to-global equation map (mechanical block then flow block)
    l2g: Vec<usize>,

    /// Number of mechanical local equations (ndim · nnode)
    n_mech: usize,

    /// Strain-displacement matrix (scratch)
    bb: Matrix,

    /// Tangent operator (scratch)
    dd: Tensor4,

    /// Conductivity tensor (scratch)
    kk_ten: Tensor2,

    /// Local increment of the primary unknowns (scratch)
    du_loc: Vector,

    /// Strain increment at one integration point (scratch)
    deps: Tensor2,
}

impl<'a> ElementPorous<'a> {
    /// Allocates a new instance
    pub fn new(mesh: &Mesh, base: &FemBase, config: &'a Config, cell: &Cell, param: ParamPorous) -> Result<Self> {
        let pad = mesh.get_pad(cell.id);
        let gauss = Gauss::new_or_sized(cell.kind, param.ngauss)?;
        let mandel = config.ideal.mandel();
        let model = ModelStressStrain::new(&config.ideal, &param.stress_strain)?;
        let cond = ModelConductivity::new(&config.ideal, &param.conductivity)?;
        let n_int_val = param.n_int_val();
        let mut ips = Vec::with_capacity(gauss.npoint());
        for _ in 0..gauss.npoint() {
            let mut state = LocalStatePorous::new(mandel, n_int_val, param.porosity);
            model.actual.initialize_internal_values(&mut state.solid)?;
            ips.push(IpState::new(state));
        }
        let l2g = base.local_to_global(cell)?;
        let neq = l2g.len();
        let nnode = cell.points.len();
        let n_mech = config.ideal.ndim() * nnode;
        let dim_b = mandel.dim();
        Ok(ElementPorous {
            config,
            cell_id: cell.id,
            param,
            model,
            cond,
            pad,
            gauss,
            ips,
            l2g,
            n_mech,
            bb: Matrix::new(dim_b, n_mech),
            dd: Tensor4::new(mandel),
            kk_ten: Tensor2::new(mandel),
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

impl<'a> ElementTrait for ElementPorous<'a> {
    fn caps(&self) -> Caps {
        Caps {
            stiffness: true,
            coupling: true,
            conductivity: true,
            storage: true,
            rhs: true,
        }
    }

    fn local_to_global(&self) -> &[usize] {
        &self.l2g
    }

    fn mech_eqs(&self) -> &[usize] {
        &self.l2g[..self.n_mech]
    }

    fn flow_eqs(&self) -> &[usize] {
        &self.l2g[self.n_mech..]
    }

    fn symmetric_stiffness(&self) -> bool {
        self.model.actual.symmetric_stiffness()
    }

    fn stiffness(&mut self, kke: &mut Matrix, _state: &FemState) -> Result<()> {
        let n_mech = self.n_mech;
        let dim_b = self.deps.vector().dim();
        kke.fill(0.0);
        for p in 0..self.gauss.npoint() {
            let iota = self.gauss.coords(p);
            let det_jac = check_det_jac(self.cell_id, self.pad.calc_gradient(iota)?)?;
            self.model.actual.stiffness(&mut self.dd, &self.ips[p].committed.solid)?;
            fill_strain_displacement(&mut self.bb, &self.pad, self.config.ideal.two_dim);
            let c = self.integ_factor(det_jac, p);
            let ddm = self.dd.matrix();
            for i in 0..n_mech {
                for j in 0..n_mech {
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

    fn coupling_matrix(&mut self, qq: &mut Matrix, _state: &FemState) -> Result<()> {
        let n_mech = self.n_mech;
        let nnode = self.l2g.len() - n_mech;
        let alpha = self.param.alpha;
        qq.fill(0.0);
        for p in 0..self.gauss.npoint() {
            let iota = self.gauss.coords(p);
            let det_jac = check_det_jac(self.cell_id, self.pad.calc_gradient(iota)?)?;
            self.pad.calc_interp(iota);
            fill_strain_displacement(&mut self.bb, &self.pad, self.config.ideal.two_dim);
            let c = self.integ_factor(det_jac, p);
            let nn = &self.pad.interp;
            // (Bᵀ m)ₖ picks the volumetric rows of B (Mandel identity)
            for k in 0..n_mech {
                let btm = self.bb.get(0, k) + self.bb.get(1, k) + self.bb.get(2, k);
                for n in 0..nnode {
                    qq.set(k, n, qq.get(k, n) + c * alpha * btm * nn[n]);
                }
            }
        }
        Ok(())
    }

    fn conductivity_matrix(&mut self, hh: &mut Matrix, _state: &FemState) -> Result<()> {
        let ndim = self.config.ideal.ndim();
        let nnode = self.l2g.len() - self.n_mech;
        hh.fill(0.0);
        for p in 0..self.gauss.npoint() {
            let iota = self.gauss.coords(p);
            let det_jac = check_det_jac(self.cell_id, self.pad.calc_gradient(iota)?)?;
            self.cond.calc_k(&mut self.kk_ten, self.ips[p].committed.liq.pl)?;
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
        let nnode = self.l2g.len() - self.n_mech;
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
        let nnode = self.l2g.len() - self.n_mech;
        bb.fill(0.0);
        if self.config.gravity == 0.0 {
            return Ok(());
        }
        let rho_g = self.param.density_liquid * self.config.gravity;
        for p in 0..self.gauss.npoint() {
            let iota = self.gauss.coords(p);
            let det_jac = check_det_jac(self.cell_id, self.pad.calc_gradient(iota)?)?;
            self.cond.calc_k(&mut self.kk_ten, self.ips[p].committed.liq.pl)?;
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
        let n_mech = self.n_mech;
        let nnode = self.l2g.len() - n_mech;
        let dim_b = self.deps.vector().dim();
        let alpha = self.param.alpha;
        let theta = self.config.theta;
        let dt = state.dt;
        fe_int.fill(0.0);
        for k in 0..self.l2g.len() {
            self.du_loc[k] = state.duu[self.l2g[k]];
        }
        for p in 0..self.gauss.npoint() {
            let iota = self.gauss.coords(p);
            let det_jac = check_det_jac(self.cell_id, self.pad.calc_gradient(iota)?)?;
            self.pad.calc_interp(iota);
            fill_strain_displacement(&mut self.bb, &self.pad, self.config.ideal.two_dim);
            self.cond.calc_k(&mut self.kk_ten, self.ips[p].committed.liq.pl)?;
            let c = self.integ_factor(det_jac, p);

            // Δε = B Δu, Δp and ∇Δp at the integration point
            {
                let deps = self.deps.vector_mut();
                for a in 0..dim_b {
                    deps[a] = 0.0;
                    for k in 0..n_mech {
                        deps[a] += self.bb.get(a, k) * self.du_loc[k];
                    }
                }
            }
            let mut dpl = 0.0;
            let mut grad_dpl = [0.0; 3];
            {
                let nn = &self.pad.interp;
                let g = &self.pad.gradient;
                for m in 0..nnode {
                    dpl += nn[m] * self.du_loc[n_mech + m];
                    for i in 0..ndim {
                        grad_dpl[i] += g.get(m, i) * self.du_loc[n_mech + m];
                    }
                }
            }
            let deps_v = self.deps.vector()[0] + self.deps.vector()[1] + self.deps.vector()[2];

            // trial state update (effective stress through the material model)
            let ip = &mut self.ips[p];
            self.model.actual.update_stress(&mut ip.trial.solid, &self.deps)?;
            ip.trial.liq.pl = ip.committed.liq.pl + dpl;

            // mechanical rows: Bᵀ (Δσ' − α Δp m)
            let sig_trial = ip.trial.solid.stress.vector();
            let sig_committed = ip.committed.solid.stress.vector();
            for k in 0..n_mech {
                let mut sum = 0.0;
                for a in 0..dim_b {
                    let m_a = if a < 3 { 1.0 } else { 0.0 };
                    sum += self.bb.get(a, k) * (sig_trial[a] - sig_committed[a] - alpha * dpl * m_a);
                }
                fe_int[k] += c * sum;
            }

            // flow rows (negated mass balance): -(α N Δεᵥ + Ss N Δp + θ Δt Gᵀ k ∇Δp)
            let nn = &self.pad.interp;
            let g = &self.pad.gradient;
            for m in 0..nnode {
                let mut conduction = 0.0;
                for i in 0..ndim {
                    for j in 0..ndim {
                        conduction += g.get(m, i) * self.kk_ten.get(i, j) * grad_dpl[j];
                    }
                }
                fe_int[n_mech + m] -= c
                    * (alpha * nn[m] * deps_v
                        + self.param.storativity * nn[m] * dpl
                        + theta * dt * conduction);
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
        for ip in &self.ips {
            let mut one = HashMap::new();
            self.model.actual.scalar_outputs(&ip.committed.solid, &mut one);
            for (key, value) in one {
                *out.entry(key).or_insert(0.0) += value / nip;
            }
            pl += ip.committed.liq.pl / nip;
        }
        out.insert("pl".to_string(), pl);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
