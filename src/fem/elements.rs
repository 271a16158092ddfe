use super::{ElementJoint, ElementPorous, ElementSeepage, ElementSolid, ElementTrait, FemBase, FemState};
use crate::base::{assemble_matrix, assemble_matrix_transposed, assemble_vector, Config, Elem, Partition, Result};
use gemlab::mesh::{Cell, Mesh};
use russell_lab::{Matrix, Vector};
use std::collections::HashMap;

/// Defines a generic finite element, wrapping an "actual" implementation
///
/// The wrapper owns the scratch buffers of the operations the element
/// declared in its capability set; an element without a capability never
/// allocates the corresponding buffer.
pub struct GenericElement<'a> {
    /// Connects to the "actual" implementation
    pub actual: Box<dyn ElementTrait + 'a>,

    /// Stiffness matrix buffer (mech × mech)
    kke: Option<Matrix>,

    /// Coupling matrix buffer (mech × flow)
    qq: Option<Matrix>,

    /// Conductivity matrix buffer (flow × flow)
    hh: Option<Matrix>,

    /// Storage matrix buffer (flow × flow)
    ss: Option<Matrix>,

    /// Source vector buffer (flow)
    bb: Option<Vector>,

    /// Internal force/flux increment buffer (all local equations)
    fe: Vector,

    /// H·p_prev workspace (flow)
    hp: Vector,
}

/// Holds a collection of (generic) finite elements
pub struct Elements<'a> {
    /// Holds configuration parameters
    pub config: &'a Config,

    /// All elements
    pub all: Vec<GenericElement<'a>>,
}

impl<'a> GenericElement<'a> {
    /// Allocates a new instance
    pub fn new(mesh: &Mesh, base: &'a FemBase, config: &'a Config, cell: &'a Cell) -> Result<Self> {
        let element = base.amap.get(cell)?;
        let actual: Box<dyn ElementTrait> = match element {
            Elem::Solid(p) => Box::new(ElementSolid::new(mesh, base, config, cell, *p)?),
            Elem::Seepage(p) => Box::new(ElementSeepage::new(mesh, base, config, cell, *p)?),
            Elem::Porous(p) => Box::new(ElementPorous::new(mesh, base, config, cell, *p)?),
            Elem::Joint(p) => Box::new(ElementJoint::new(mesh, base, config, cell, *p)?),
        };
        let caps = actual.caps();
        let n_mech = actual.mech_eqs().len();
        let n_flow = actual.flow_eqs().len();
        let neq = actual.local_to_global().len();
        Ok(GenericElement {
            kke: if caps.stiffness { Some(Matrix::new(n_mech, n_mech)) } else { None },
            qq: if caps.coupling { Some(Matrix::new(n_mech, n_flow)) } else { None },
            hh: if caps.conductivity { Some(Matrix::new(n_flow, n_flow)) } else { None },
            ss: if caps.storage { Some(Matrix::new(n_flow, n_flow)) } else { None },
            bb: if caps.rhs { Some(Vector::new(n_flow)) } else { None },
            fe: Vector::new(neq),
            hp: Vector::new(n_flow),
            actual,
        })
    }

    /// Assembles this element's operators into the partitioned system
    ///
    /// This implements the per-element share of the global assembler:
    /// * stiffness scattered on (mech, mech);
    /// * the coupling block and its transpose scattered with a negative
    ///   sign on (mech, flow) and (flow, mech);
    /// * storage scattered negated on (flow, flow);
    /// * conductivity scattered scaled by −θ·Δt, simultaneously adding
    ///   the `Δt·H·p_prev` term to the external increment vector;
    /// * the source vector scaled by Δt into the external increment.
    ///
    /// Passing `dt_flow = 0` suppresses all flow-source contributions
    /// (the residual-correction path of later iterations).
    pub fn assemble(
        &mut self,
        part: &mut Partition,
        ff_ex: &mut Vector,
        state: &FemState,
        dt_flow: f64,
        theta: f64,
    ) -> Result<()> {
        let caps = self.actual.caps();
        if caps.stiffness {
            let kke = self.kke.as_mut().unwrap();
            self.actual.stiffness(kke, state)?;
            let mech = self.actual.mech_eqs();
            assemble_matrix(part, kke, mech, mech, 1.0)?;
        }
        if caps.coupling {
            let qq = self.qq.as_mut().unwrap();
            self.actual.coupling_matrix(qq, state)?;
            let (mech, flow) = (self.actual.mech_eqs(), self.actual.flow_eqs());
            assemble_matrix(part, qq, mech, flow, -1.0)?;
            assemble_matrix_transposed(part, qq, mech, flow, -1.0)?;
        }
        if caps.storage {
            let ss = self.ss.as_mut().unwrap();
            self.actual.storage_matrix(ss, state)?;
            let flow = self.actual.flow_eqs();
            assemble_matrix(part, ss, flow, flow, -1.0)?;
        }
        if caps.conductivity {
            let hh = self.hh.as_mut().unwrap();
            self.actual.conductivity_matrix(hh, state)?;
            let flow = self.actual.flow_eqs();
            assemble_matrix(part, hh, flow, flow, -theta * dt_flow)?;
            if dt_flow > 0.0 {
                // external increment receives Δt·H·p_prev
                let n_flow = flow.len();
                for m in 0..n_flow {
                    self.hp[m] = 0.0;
                    for n in 0..n_flow {
                        self.hp[m] += hh.get(m, n) * state.uu[flow[n]];
                    }
                }
                for m in 0..n_flow {
                    ff_ex[flow[m]] += dt_flow * self.hp[m];
                }
            }
        }
        if caps.rhs {
            let bb = self.bb.as_mut().unwrap();
            self.actual.rhs_vector(bb, state)?;
            if dt_flow > 0.0 {
                let flow = self.actual.flow_eqs();
                for m in 0..flow.len() {
                    ff_ex[flow[m]] += dt_flow * bb[m];
                }
            }
        }
        Ok(())
    }
}

impl<'a> Elements<'a> {
    /// Allocates a new instance
    pub fn new(mesh: &'a Mesh, base: &'a FemBase, config: &'a Config) -> Result<Self> {
        let res: Result<Vec<_>> = mesh
            .cells
            .iter()
            .map(|cell| GenericElement::new(mesh, base, config, cell))
            .collect();
        Ok(Elements { config, all: res? })
    }

    /// Performs the one-time initialization pass (e.g. joint thicknesses)
    pub fn initialize_all(&mut self) -> Result<()> {
        self.all.iter_mut().try_for_each(|e| e.actual.initialize())
    }

    /// Returns whether all local stiffness matrices are symmetric or not
    pub fn all_symmetric(&self) -> bool {
        self.all.iter().all(|e| e.actual.symmetric_stiffness())
    }

    /// Assembles the global partitioned system (matrix blocks and the
    /// flow contributions to the external increment vector)
    pub fn assemble(
        &mut self,
        part: &mut Partition,
        ff_ex: &mut Vector,
        state: &FemState,
        dt_flow: f64,
    ) -> Result<()> {
        let theta = self.config.theta;
        self.all
            .iter_mut()
            .try_for_each(|e| e.assemble(part, ff_ex, state, dt_flow, theta))
    }

    /// Recomputes all internal force/flux increments from the cumulative
    /// trial increment, accumulating them into the global vector
    ///
    /// Entries on prescribed equations accumulate too; they are the
    /// internal share of the reactions.
    pub fn update_all(&mut self, ff_int: &mut Vector, state: &FemState) -> Result<()> {
        ff_int.fill(0.0);
        for e in &mut self.all {
            e.actual.update(&mut e.fe, state)?;
            assemble_vector(ff_int, &e.fe, e.actual.local_to_global());
        }
        Ok(())
    }

    /// Restores every integration point's trial state from its committed snapshot
    pub fn rollback_all(&mut self) {
        self.all.iter_mut().for_each(|e| e.actual.rollback());
    }

    /// Makes every integration point's trial state permanent
    pub fn commit_all(&mut self) {
        self.all.iter_mut().for_each(|e| e.actual.commit());
    }

    /// Collects the named scalar outputs of every cell
    pub fn scalar_outputs(&self) -> Vec<HashMap<String, f64>> {
        self.all
            .iter()
            .map(|e| {
                let mut out = HashMap::new();
                e.actual.scalar_outputs(&mut out);
                out
            })
            .collect()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
