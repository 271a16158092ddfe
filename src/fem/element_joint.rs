use super::{cell_volume, Caps, ElementTrait, FemBase, FemState};
use crate::base::{Config, FemError, ParamJoint, Result};
use crate::material::{IpState, LocalStateJoint};
use gemlab::integ::Gauss;
use gemlab::mesh::{Cell, CellId, Mesh};
use gemlab::shapes::{GeoKind, Scratchpad};
use russell_lab::{Matrix, Vector};
use std::collections::HashMap;

/// Implements the zero-thickness interface (joint) element (2D)
///
/// The joint cell is a degenerate Qua4 whose first two nodes form the
/// bottom face and whose last two nodes (reversed) form the top face, so
/// that node m pairs with node (nnode-1-m). The mechanics penalize the
/// relative displacement between the faces in the local (tangent, normal)
/// frame; the flow part exchanges liquid across the interface with the
/// conductance kt/h.
///
/// The effective thickness `h = (V1+V2)/(2A)` is derived once from the
/// volumes of the two attached bulk cells and the interface area, and is
/// cached per integration point.
pub struct ElementJoint<'a> {
    /// Global configuration
    config: &'a Config,

    /// The id of this cell (for diagnostics)
    cell_id: CellId,

    /// Element parameters
    param: ParamJoint,

    /// Scratchpad of the interface line (bottom face)
    face_pad: Scratchpad,

    /// Integration (Gauss) points over the interface line
    gauss: Gauss,

    /// Committed/trial state of each integration point
    ips: Vec<IpState<LocalStateJoint>>,

    /// Local-to-global equation map (mechanical block then flow block)
    l2g: Vec<usize>,

    /// Number of joint nodes (both faces)
    nnode: usize,

    /// Number of nodes per face
    half: usize,

    /// The two attached bulk cells: (id, pad, gauss) for the volume integrals
    neighbors: Vec<(CellId, Scratchpad, Gauss)>,

    /// Outward data at one integration point (scratch)
    nvec: Vector,
}

impl<'a> ElementJoint<'a> {
    /// Allocates a new instance
    ///
    /// The two bulk cells coupled by the joint are located here by their
    /// shared face nodes; the thickness itself is derived later by the
    /// one-time `initialize` pass.
    pub fn new(mesh: &Mesh, base: &FemBase, config: &'a Config, cell: &Cell, param: ParamJoint) -> Result<Self> {
        if !config.ideal.two_dim {
            return Err(FemError::Library("joint elements are only available in 2D"));
        }
        if cell.kind != GeoKind::Qua4 {
            return Err(FemError::Library("joint elements require degenerate Qua4 cells"));
        }
        let nnode = cell.points.len();
        let half = nnode / 2;

        // interface line from the bottom face nodes
        let bottom: Vec<_> = cell.points[..half].to_vec();
        let top: Vec<_> = cell.points[half..].iter().rev().copied().collect();
        let mut face_pad = Scratchpad::new(2, GeoKind::Lin2)?;
        mesh.set_pad(&mut face_pad, &bottom);
        let gauss = Gauss::new(GeoKind::Lin2);

        // locate the attached bulk cells by their shared face nodes
        let mut neighbors = Vec::new();
        for face in [&bottom, &top] {
            let found = mesh.cells.iter().find(|other| {
                other.id != cell.id && face.iter().all(|point_id| other.points.contains(point_id))
            });
            match found {
                Some(other) => neighbors.push((
                    other.id,
                    mesh.get_pad(other.id),
                    Gauss::new(other.kind),
                )),
                None => {
                    return Err(FemError::Library("cannot find the bulk cells attached to the joint"));
                }
            }
        }

        let ips = (0..gauss.npoint())
            .map(|_| IpState::new(LocalStateJoint::new(2)))
            .collect();
        let l2g = base.local_to_global(cell)?;
        Ok(ElementJoint {
            config,
            cell_id: cell.id,
            param,
            face_pad,
            gauss,
            ips,
            l2g,
            nnode,
            half,
            neighbors,
            nvec: Vector::new(2),
        })
    }

    /// Computes the interface area (length × thickness in 2D)
    fn interface_area(&mut self) -> Result<f64> {
        let mut area = 0.0;
        for p in 0..self.gauss.npoint() {
            let iota = self.gauss.coords(p);
            let det_surf = self.face_pad.calc_jacobian(iota)?;
            area += det_surf * self.gauss.weight(p) * self.config.ideal.thickness;
        }
        Ok(area)
    }

    /// Computes the surface Jacobian, the interpolation functions, and the
    /// unit (tangent, normal) frame at one integration point
    fn local_frame(&mut self, p: usize) -> Result<(f64, [f64; 2], [f64; 2])> {
        let iota = self.gauss.coords(p);
        let det_surf = self.face_pad.calc_jacobian(iota)?;
        if det_surf <= 0.0 {
            return Err(FemError::InvalidGeometry {
                cell_id: self.cell_id,
                det_jac: det_surf,
            });
        }
        self.face_pad.calc_interp(iota);
        self.face_pad.calc_normal_vector(&mut self.nvec, iota)?;
        let norm = f64::sqrt(self.nvec[0] * self.nvec[0] + self.nvec[1] * self.nvec[1]);
        let un = [self.nvec[0] / norm, self.nvec[1] / norm];
        let ut = [un[1], -un[0]];
        Ok((det_surf, un, ut))
    }
}

/// Computes the effective joint thickness h = (V1+V2)/(2A)
pub(crate) fn effective_thickness(cell_id: CellId, v1: f64, v2: f64, area: f64) -> Result<f64> {
    let thickness = (v1 + v2) / (2.0 * area);
    if !thickness.is_finite() || thickness <= 0.0 {
        return Err(FemError::InvalidJoint { cell_id, thickness });
    }
    Ok(thickness)
}

impl<'a> ElementTrait for ElementJoint<'a> {
    fn caps(&self) -> Caps {
        Caps {
            stiffness: true,
            conductivity: true,
            ..Default::default()
        }
    }

    fn local_to_global(&self) -> &[usize] {
        &self.l2g
    }

    fn mech_eqs(&self) -> &[usize] {
        &self.l2g[..2 * self.nnode]
    }

    fn flow_eqs(&self) -> &[usize] {
        &self.l2g[2 * self.nnode..]
    }

    /// Derives the effective thickness from the attached bulk cells and
    /// caches it in every integration point (both state slots)
    fn initialize(&mut self) -> Result<()> {
        let thickness = self.config.ideal.thickness;
        let mut volumes = [0.0; 2];
        for (index, (id, pad, gauss)) in self.neighbors.iter_mut().enumerate() {
            volumes[index] = cell_volume(*id, pad, gauss, thickness)?;
        }
        let area = self.interface_area()?;
        let h = effective_thickness(self.cell_id, volumes[0], volumes[1], area)?;
        for ip in &mut self.ips {
            ip.committed.thickness = h;
            ip.trial.thickness = h;
        }
        Ok(())
    }

    fn stiffness(&mut self, kke: &mut Matrix, _state: &FemState) -> Result<()> {
        let n_mech = 2 * self.nnode;
        kke.fill(0.0);
        for p in 0..self.gauss.npoint() {
            let (det_surf, un, ut) = self.local_frame(p)?;
            let c = det_surf * self.gauss.weight(p) * self.config.ideal.thickness;
            let nn = &self.face_pad.interp;

            // relative-displacement operator: rows (tangent, normal)
            let mut bj = Matrix::new(2, n_mech);
            for f in 0..self.half {
                let bot = f;
                let top = self.nnode - 1 - f;
                for i in 0..2 {
                    bj.set(0, 2 * bot + i, -nn[f] * ut[i]);
                    bj.set(0, 2 * top + i, nn[f] * ut[i]);
                    bj.set(1, 2 * bot + i, -nn[f] * un[i]);
                    bj.set(1, 2 * top + i, nn[f] * un[i]);
                }
            }
            let dd = [self.param.ks, self.param.kn];
            for i in 0..n_mech {
                for j in 0..n_mech {
                    let mut sum = 0.0;
                    for a in 0..2 {
                        sum += bj.get(a, i) * dd[a] * bj.get(a, j);
                    }
                    kke.set(i, j, kke.get(i, j) + c * sum);
                }
            }
        }
        Ok(())
    }

    fn conductivity_matrix(&mut self, hh: &mut Matrix, _state: &FemState) -> Result<()> {
        let nnode = self.nnode;
        hh.fill(0.0);
        for p in 0..self.gauss.npoint() {
            let (det_surf, _, _) = self.local_frame(p)?;
            let h = self.ips[p].committed.thickness;
            if h <= 0.0 {
                return Err(FemError::InvalidJoint {
                    cell_id: self.cell_id,
                    thickness: h,
                });
            }
            let c = det_surf * self.gauss.weight(p) * self.config.ideal.thickness * self.param.kt / h;
            let nn = &self.face_pad.interp;
            for f in 0..self.half {
                for g in 0..self.half {
                    let m = c * nn[f] * nn[g];
                    let (bot_f, top_f) = (f, nnode - 1 - f);
                    let (bot_g, top_g) = (g, nnode - 1 - g);
                    hh.set(bot_f, bot_g, hh.get(bot_f, bot_g) + m);
                    hh.set(top_f, top_g, hh.get(top_f, top_g) + m);
                    hh.set(bot_f, top_g, hh.get(bot_f, top_g) - m);
                    hh.set(top_f, bot_g, hh.get(top_f, bot_g) - m);
                }
            }
        }
        Ok(())
    }

    fn update(&mut self, fe_int: &mut Vector, state: &FemState) -> Result<()> {
        let n_mech = 2 * self.nnode;
        let theta = self.config.theta;
        let dt = state.dt;
        fe_int.fill(0.0);
        for p in 0..self.gauss.npoint() {
            let (det_surf, un, ut) = self.local_frame(p)?;
            let c = det_surf * self.gauss.weight(p) * self.config.ideal.thickness;
            let nn = &self.face_pad.interp;

            // relative displacement increment in the local frame
            let mut dw = [0.0; 2];
            let mut dp_jump = 0.0;
            for f in 0..self.half {
                let bot = f;
                let top = self.nnode - 1 - f;
                for i in 0..2 {
                    let rel = state.duu[self.l2g[2 * top + i]] - state.duu[self.l2g[2 * bot + i]];
                    dw[0] += nn[f] * ut[i] * rel;
                    dw[1] += nn[f] * un[i] * rel;
                }
                dp_jump += nn[f] * (state.duu[self.l2g[n_mech + top]] - state.duu[self.l2g[n_mech + bot]]);
            }

            // trial traction
            let dtr = [self.param.ks * dw[0], self.param.kn * dw[1]];
            let ip = &mut self.ips[p];
            ip.trial.traction[0] = ip.committed.traction[0] + dtr[0];
            ip.trial.traction[1] = ip.committed.traction[1] + dtr[1];
            let h = ip.committed.thickness;

            // mechanical rows: Bᵀ Δt
            for f in 0..self.half {
                let bot = f;
                let top = self.nnode - 1 - f;
                for i in 0..2 {
                    let row = nn[f] * (ut[i] * dtr[0] + un[i] * dtr[1]);
                    fe_int[2 * bot + i] -= c * row;
                    fe_int[2 * top + i] += c * row;
                }
            }

            // flow rows (negated exchange): -θ Δt (kt/h) Nᵀ (±jump)
            let exchange = theta * dt * c * self.param.kt / h;
            for f in 0..self.half {
                let bot = f;
                let top = self.nnode - 1 - f;
                fe_int[n_mech + bot] -= exchange * nn[f] * (-dp_jump);
                fe_int[n_mech + top] -= exchange * nn[f] * dp_jump;
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
        let mut ts = 0.0;
        let mut tn = 0.0;
        let mut h = 0.0;
        for ip in &self.ips {
            ts += ip.committed.traction[0] / nip;
            tn += ip.committed.traction[1] / nip;
            h += ip.committed.thickness / nip;
        }
        out.insert("traction_s".to_string(), ts);
        out.insert("traction_n".to_string(), tn);
        out.insert("h".to_string(), h);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
