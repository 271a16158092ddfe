use super::{Dof, Elem, FemError, Result};
use gemlab::mesh::{Cell, CellAttribute, Mesh};
use gemlab::shapes::GeoKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Holds the element parameters keyed by cell attribute
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Attributes {
    all: HashMap<CellAttribute, Elem>,
}

impl Attributes {
    /// Allocates a new instance from an array of (attribute, element) pairs
    pub fn from<const N: usize>(arr: [(CellAttribute, Elem); N]) -> Self {
        Attributes {
            all: HashMap::from(arr),
        }
    }

    /// Returns the element parameters corresponding to a cell
    pub fn get(&self, cell: &Cell) -> Result<&Elem> {
        self.all
            .get(&cell.attribute)
            .ok_or(FemError::Library("cannot find CellAttribute in Attributes map"))
    }
}

/// Holds the local DOF layout of one element type
///
/// The local equation numbers are split into two blocks: all mechanical
/// DOFs come first (node-major), followed by all liquid-pressure DOFs.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ElementDofs {
    /// Total number of local equations
    pub n_equation: usize,

    /// Maps node and DOF key to the local equation number (nnode)
    pub dofs: Vec<Vec<(Dof, usize)>>,

    /// Local equation numbers of the mechanical block
    pub mech: Vec<usize>,

    /// Local equation numbers of the liquid-pressure block
    pub flow: Vec<usize>,
}

impl ElementDofs {
    /// Allocates a new instance for an element type and cell geometry
    pub fn new(ndim: usize, element: &Elem, kind: GeoKind) -> Result<Self> {
        let nnode = kind.nnode();
        let (with_mech, with_flow) = match element {
            Elem::Solid(..) => (true, false),
            Elem::Seepage(..) => (false, true),
            Elem::Porous(..) => (true, true),
            Elem::Joint(..) => (true, true),
        };
        let mut dofs = vec![Vec::new(); nnode];
        let mut mech = Vec::new();
        let mut flow = Vec::new();
        let mut count = 0;
        if with_mech {
            for m in 0..nnode {
                dofs[m].push((Dof::Ux, count));
                mech.push(count);
                count += 1;
                dofs[m].push((Dof::Uy, count));
                mech.push(count);
                count += 1;
                if ndim == 3 {
                    dofs[m].push((Dof::Uz, count));
                    mech.push(count);
                    count += 1;
                }
            }
        }
        if with_flow {
            for m in 0..nnode {
                dofs[m].push((Dof::Pl, count));
                flow.push(count);
                count += 1;
            }
        }
        Ok(ElementDofs {
            n_equation: count,
            dofs,
            mech,
            flow,
        })
    }
}

/// Maps (CellAttribute, GeoKind) to the local DOF layout
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ElementDofsMap {
    all: HashMap<(CellAttribute, GeoKind), ElementDofs>,
}

impl ElementDofsMap {
    /// Allocates a new instance
    pub fn new(mesh: &Mesh, amap: &Attributes) -> Result<Self> {
        let mut all = HashMap::new();
        for cell in &mesh.cells {
            let element = amap.get(cell)?;
            all.insert(
                (cell.attribute, cell.kind),
                ElementDofs::new(mesh.ndim, element, cell.kind)?,
            );
        }
        Ok(ElementDofsMap { all })
    }

    /// Returns the local DOF layout of a cell
    pub fn get(&self, cell: &Cell) -> Result<&ElementDofs> {
        self.all
            .get(&(cell.attribute, cell.kind))
            .ok_or(FemError::Library("cannot find (CellAttribute, GeoKind) in ElementDofsMap"))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{Attributes, ElementDofs, ElementDofsMap};
    use crate::base::{Dof, Elem, FemError, ParamPorous, ParamSeepage, ParamSolid};
    use gemlab::mesh::Samples;
    use gemlab::shapes::GeoKind;

    #[test]
    fn attributes_work() {
        let mesh = Samples::one_tri3();
        let p1 = ParamSolid::sample_linear_elastic();
        let amap = Attributes::from([(1, Elem::Solid(p1))]);
        assert_eq!(amap.get(&mesh.cells[0]).unwrap(), &Elem::Solid(p1));

        let amap = Attributes::from([(2, Elem::Solid(p1))]);
        assert_eq!(
            amap.get(&mesh.cells[0]).err(),
            Some(FemError::Library("cannot find CellAttribute in Attributes map"))
        );
    }

    #[test]
    fn element_dofs_solid_works() {
        let p1 = ParamSolid::sample_linear_elastic();
        let ed = ElementDofs::new(2, &Elem::Solid(p1), GeoKind::Tri3).unwrap();
        assert_eq!(ed.n_equation, 6);
        assert_eq!(ed.dofs[0], [(Dof::Ux, 0), (Dof::Uy, 1)]);
        assert_eq!(ed.dofs[2], [(Dof::Ux, 4), (Dof::Uy, 5)]);
        assert_eq!(ed.mech, [0, 1, 2, 3, 4, 5]);
        assert!(ed.flow.is_empty());

        let ed = ElementDofs::new(3, &Elem::Solid(p1), GeoKind::Hex8).unwrap();
        assert_eq!(ed.n_equation, 24);
        assert_eq!(ed.dofs[0], [(Dof::Ux, 0), (Dof::Uy, 1), (Dof::Uz, 2)]);
    }

    #[test]
    fn element_dofs_seepage_and_porous_work() {
        let ps = ParamSeepage::sample_constant();
        let ed = ElementDofs::new(2, &Elem::Seepage(ps), GeoKind::Tri3).unwrap();
        assert_eq!(ed.n_equation, 3);
        assert_eq!(ed.dofs[1], [(Dof::Pl, 1)]);
        assert!(ed.mech.is_empty());
        assert_eq!(ed.flow, [0, 1, 2]);

        let pp = ParamPorous::sample_linear_elastic_constant();
        let ed = ElementDofs::new(2, &Elem::Porous(pp), GeoKind::Qua4).unwrap();
        assert_eq!(ed.n_equation, 12);
        // mechanical block first, then the liquid-pressure block
        assert_eq!(ed.mech, [0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(ed.flow, [8, 9, 10, 11]);
        assert_eq!(ed.dofs[3], [(Dof::Ux, 6), (Dof::Uy, 7), (Dof::Pl, 11)]);
    }

    #[test]
    fn element_dofs_map_works() {
        let mesh = Samples::one_tri3();
        let p1 = ParamSolid::sample_linear_elastic();
        let amap = Attributes::from([(1, Elem::Solid(p1))]);
        let emap = ElementDofsMap::new(&mesh, &amap).unwrap();
        assert_eq!(emap.get(&mesh.cells[0]).unwrap().n_equation, 6);

        let mut wrong = mesh.cells[0].clone();
        wrong.kind = GeoKind::Qua4;
        assert_eq!(
            emap.get(&wrong).err(),
            Some(FemError::Library("cannot find (CellAttribute, GeoKind) in ElementDofsMap"))
        );
    }
}
