use super::FemBase;
use crate::base::{BcValue, Config, FemError, Natural, Nbc, Result};
use gemlab::integ::Gauss;
use gemlab::mesh::Mesh;
use gemlab::shapes::{GeoKind, Scratchpad};
use russell_lab::Vector;

/// Assists in the integration of distributed BCs over the boundary of an element
///
/// This data structure corresponds to a single natural (Neumann) boundary
/// condition. The user value is evaluated at the physical coordinates of
/// each Gauss point of the facet; `Qn` projects it along the outward
/// normal (obtained from the facet Scratchpad: the 90°-rotated tangent in
/// 2D or the cross product of the tangent vectors in 3D).
pub struct BcDistributed<'a> {
    /// Global configuration
    config: &'a Config,

    /// Scratchpad to perform numerical integration on the facet
    pad: Scratchpad,

    /// Integration (Gauss) points
    gauss: Gauss,

    /// Local-to-global mapping (n_local_eq)
    local_to_global: Vec<usize>,

    /// Natural boundary condition kind
    nbc: Nbc,

    /// Specified BC value (constant or function of (x, t))
    value: BcValue,

    /// Physical coordinates at one integration point (scratch)
    x: Vector,

    /// Outward normal at one integration point (scratch)
    nvec: Vector,
}

/// Implements an array of BcDistributed
pub struct BcDistributedArray<'a> {
    /// All values
    pub all: Vec<BcDistributed<'a>>,
}

impl<'a> BcDistributed<'a> {
    /// Allocates a new instance
    ///
    /// Note: `Qn` is not allowed for 3D edges and `Qz` is not allowed in 2D
    pub fn new(
        mesh: &Mesh,
        base: &FemBase,
        config: &'a Config,
        kind: GeoKind,
        points: &[usize],
        nbc: Nbc,
        value: BcValue,
    ) -> Result<Self> {
        let ndim = mesh.ndim;
        if ndim == 3 && kind.ndim() == 1 {
            if matches!(nbc, Nbc::Qn) {
                return Err(FemError::InvalidBc("Qn natural boundary condition is not available for 3D edge"));
            }
        }
        if ndim == 2 && matches!(nbc, Nbc::Qz) {
            return Err(FemError::InvalidBc("cannot apply an out-of-plane load in a 2D analysis"));
        }

        // pad and integration points
        let mut pad = Scratchpad::new(ndim, kind)?;
        mesh.set_pad(&mut pad, points);
        let gauss = Gauss::new(kind);

        // local_to_global
        let nnode = points.len();
        let dofs = nbc.dof_equation_pairs(ndim, nnode);
        let n_local_eq = 1 + dofs.last().unwrap().last().unwrap().1;
        let mut local_to_global = vec![0; n_local_eq];
        for m in 0..nnode {
            for (dof, local) in &dofs[m] {
                local_to_global[*local] = base.equations.eq(points[m], *dof)?;
            }
        }

        Ok(BcDistributed {
            config,
            pad,
            gauss,
            local_to_global,
            nbc,
            value,
            x: Vector::new(ndim),
            nvec: Vector::new(ndim),
        })
    }

    /// Adds the incremental natural targets of this facet to the external vector
    ///
    /// Mechanical tractions are totals: the increment is the difference of
    /// the values at t+Δt and t. Liquid fluxes are rates: the contribution
    /// is −Δt·q(x, t+Δt) (the flow equations are negated in the global
    /// system).
    pub fn add_to_increment(&mut self, ff_star: &mut Vector, t: f64, dt: f64) -> Result<()> {
        let ndim = self.x.dim();
        let nnode = self.pad.xxt.dims().1;
        let thickness = if ndim == 2 { self.config.ideal.thickness } else { 1.0 };
        for p in 0..self.gauss.npoint() {
            let iota = self.gauss.coords(p);
            self.pad.calc_interp(iota);
            self.pad.calc_coords(&mut self.x, iota)?;
            let weight = self.gauss.weight(p) * thickness;
            match self.nbc {
                Nbc::Qn => {
                    // direction from the facet normal; magnitude from the
                    // surface Jacobian
                    let det_surf = self.pad.calc_jacobian(iota)?;
                    self.pad.calc_normal_vector(&mut self.nvec, iota)?;
                    let mut norm = 0.0;
                    for i in 0..ndim {
                        norm += self.nvec[i] * self.nvec[i];
                    }
                    let norm = f64::sqrt(norm);
                    let dq = self.value.value(self.x.as_data(), t + dt) - self.value.value(self.x.as_data(), t);
                    for m in 0..nnode {
                        for i in 0..ndim {
                            ff_star[self.local_to_global[m * ndim + i]] +=
                                self.pad.interp[m] * dq * (self.nvec[i] / norm) * det_surf * weight;
                        }
                    }
                }
                Nbc::Qx | Nbc::Qy | Nbc::Qz => {
                    let det_surf = self.pad.calc_jacobian(iota)?;
                    let dq = self.value.value(self.x.as_data(), t + dt) - self.value.value(self.x.as_data(), t);
                    let dir = match self.nbc {
                        Nbc::Qx => 0,
                        Nbc::Qy => 1,
                        _ => 2,
                    };
                    for m in 0..nnode {
                        ff_star[self.local_to_global[m * ndim + dir]] +=
                            self.pad.interp[m] * dq * det_surf * weight;
                    }
                }
                Nbc::Ql => {
                    let det_surf = self.pad.calc_jacobian(iota)?;
                    let q = self.value.value(self.x.as_data(), t + dt);
                    for m in 0..nnode {
                        ff_star[self.local_to_global[m]] -= dt * q * self.pad.interp[m] * det_surf * weight;
                    }
                }
            }
        }
        Ok(())
    }
}

impl<'a> BcDistributedArray<'a> {
    /// Allocates new instance
    pub fn new(mesh: &Mesh, base: &FemBase, config: &'a Config, natural: &'a Natural) -> Result<Self> {
        let mut all = Vec::with_capacity(natural.on_edges.len() + natural.on_faces.len());
        for (edge, nbc, value) in &natural.on_edges {
            all.push(BcDistributed::new(mesh, base, config, edge.kind, &edge.points, *nbc, *value)?);
        }
        for (face, nbc, value) in &natural.on_faces {
            all.push(BcDistributed::new(mesh, base, config, face.kind, &face.points, *nbc, *value)?);
        }
        Ok(BcDistributedArray { all })
    }

    /// Adds all incremental natural targets to the external vector
    pub fn add_to_increment(&mut self, ff_star: &mut Vector, t: f64, dt: f64) -> Result<()> {
        self.all.iter_mut().try_for_each(|bc| bc.add_to_increment(ff_star, t, dt))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{BcDistributed, BcDistributedArray};
    use crate::base::{BcValue, Config, Dof, Elem, Essential, FemError, Natural, Nbc};
    use crate::base::{ParamPorous, ParamSolid, SampleMeshes};
    use crate::fem::FemBase;
    use gemlab::mesh::Edge;
    use gemlab::shapes::GeoKind;
    use russell_lab::{approx_eq, Vector};

    #[test]
    fn new_captures_errors() {
        let mesh = SampleMeshes::column_two_qua4();
        let p1 = ParamSolid::sample_linear_elastic();
        let essential = Essential::new();
        let base = FemBase::new(&mesh, [(1, Elem::Solid(p1))], &essential).unwrap();
        let config = Config::new(&mesh);

        assert_eq!(
            BcDistributed::new(
                &mesh,
                &base,
                &config,
                GeoKind::Lin2,
                &[4, 5],
                Nbc::Qz,
                BcValue::Constant(-10.0)
            )
            .err(),
            Some(FemError::InvalidBc("cannot apply an out-of-plane load in a 2D analysis"))
        );
    }

    #[test]
    fn qn_works_on_top_edge() {
        // top edge of the column: outward normal (0, +1), length 1
        let mesh = SampleMeshes::column_two_qua4();
        let p1 = ParamSolid::sample_linear_elastic();
        let essential = Essential::new();
        let base = FemBase::new(&mesh, [(1, Elem::Solid(p1))], &essential).unwrap();
        let config = Config::new(&mesh);

        const Q: f64 = 25.0;
        let mut bry = BcDistributed::new(
            &mesh,
            &base,
            &config,
            GeoKind::Lin2,
            &[5, 4],
            Nbc::Qn,
            BcValue::Constant(-Q),
        )
        .unwrap();

        let neq = base.equations.n_equation;
        let mut ff = Vector::new(neq);
        bry.add_to_increment(&mut ff, 0.0, 1.0).unwrap();

        // vertical force Q/2 on each node of the horizontal edge (the sign
        // follows the edge orientation); zero horizontal parts
        let eq_uy_5 = base.equations.eq(5, Dof::Uy).unwrap();
        let eq_uy_4 = base.equations.eq(4, Dof::Uy).unwrap();
        let eq_ux_5 = base.equations.eq(5, Dof::Ux).unwrap();
        approx_eq(ff[eq_uy_5].abs(), Q / 2.0, 1e-14);
        approx_eq(ff[eq_uy_4], ff[eq_uy_5], 1e-14);
        approx_eq(ff[eq_ux_5], 0.0, 1e-14);
    }

    #[test]
    fn qy_and_space_time_function_work() {
        let mesh = SampleMeshes::column_two_qua4();
        let p1 = ParamSolid::sample_linear_elastic();
        let essential = Essential::new();
        let base = FemBase::new(&mesh, [(1, Elem::Solid(p1))], &essential).unwrap();
        let config = Config::new(&mesh);

        // traction growing linearly in time: Δq = -10 over Δt = 1
        let mut bry = BcDistributed::new(
            &mesh,
            &base,
            &config,
            GeoKind::Lin2,
            &[5, 4],
            Nbc::Qy,
            BcValue::Function(|_, t| -10.0 * t),
        )
        .unwrap();

        let neq = base.equations.n_equation;
        let mut ff = Vector::new(neq);
        bry.add_to_increment(&mut ff, 1.0, 1.0).unwrap();

        let eq_uy_5 = base.equations.eq(5, Dof::Uy).unwrap();
        approx_eq(ff[eq_uy_5], -5.0, 1e-14);
    }

    #[test]
    fn liquid_flux_is_a_rate() {
        let mesh = SampleMeshes::column_two_qua4();
        let p1 = ParamPorous::sample_linear_elastic_constant();
        let essential = Essential::new();
        let base = FemBase::new(&mesh, [(1, Elem::Porous(p1))], &essential).unwrap();
        let config = Config::new(&mesh);

        let edge = Edge {
            kind: GeoKind::Lin2,
            points: vec![5, 4],
        };
        let mut natural = Natural::new();
        natural.edges(&[&edge], Nbc::Ql, 2.0);
        let mut arr = BcDistributedArray::new(&mesh, &base, &config, &natural).unwrap();

        let neq = base.equations.n_equation;
        let mut ff = Vector::new(neq);
        arr.add_to_increment(&mut ff, 0.0, 0.25).unwrap();

        // −Δt·q·L/2 per node
        let eq_pl_5 = base.equations.eq(5, Dof::Pl).unwrap();
        approx_eq(ff[eq_pl_5], -0.25, 1e-14);
    }
}
