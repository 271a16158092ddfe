use crate::base::{Attributes, Elem, ElementDofsMap, Equations, Essential, Result};
use gemlab::mesh::{Cell, CellAttribute, Mesh};

/// Holds the element attributes, local DOF layouts, and equation numbers
///
/// The essential boundary conditions participate in the construction
/// because the equation numbers are partitioned at configuration time:
/// unknown DOFs first, prescribed DOFs last.
pub struct FemBase {
    /// Holds all attributes
    pub amap: Attributes,

    /// Holds the element information such as local DOFs layouts
    pub emap: ElementDofsMap,

    /// Holds the partitioned equation numbers
    pub equations: Equations,
}

impl FemBase {
    /// Allocates a new instance
    pub fn new<const N: usize>(mesh: &Mesh, arr: [(CellAttribute, Elem); N], essential: &Essential) -> Result<Self> {
        let amap = Attributes::from(arr);
        let emap = ElementDofsMap::new(mesh, &amap)?;
        let equations = Equations::new(mesh, &emap, essential)?;
        Ok(FemBase { amap, emap, equations })
    }

    /// Returns the number of local equations of a cell
    pub fn n_local_eq(&self, cell: &Cell) -> Result<usize> {
        let info = self.emap.get(cell)?;
        Ok(info.n_equation)
    }

    /// Computes the local-to-global map of a cell
    pub fn local_to_global(&self, cell: &Cell) -> Result<Vec<usize>> {
        let info = self.emap.get(cell)?;
        let mut l2g = vec![0; info.n_equation];
        for m in 0..cell.points.len() {
            for (dof, local) in &info.dofs[m] {
                l2g[*local] = self.equations.eq(cell.points[m], *dof)?;
            }
        }
        Ok(l2g)
    }

    /// Returns an upper bound of the number of nonzero values of the global matrix
    ///
    /// Counts every local matrix entry plus the transpose of the coupling
    /// block, which is scattered separately.
    pub fn nnz_sup(&self, mesh: &Mesh) -> usize {
        let mut nnz = self.equations.n_equation;
        for cell in &mesh.cells {
            if let Ok(info) = self.emap.get(cell) {
                nnz += info.n_equation * info.n_equation + info.mech.len() * info.flow.len();
            }
        }
        nnz
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::FemBase;
    use crate::base::{Dof, Elem, Essential, ParamPorous, ParamSolid};
    use gemlab::mesh::Samples;

    #[test]
    fn new_works() {
        let mesh = Samples::one_tri3();
        let p1 = ParamSolid::sample_linear_elastic();
        let mut essential = Essential::new();
        essential.points(&[0], Dof::Ux, 0.0);
        let base = FemBase::new(&mesh, [(1, Elem::Solid(p1))], &essential).unwrap();
        assert_eq!(base.equations.n_equation, 6);
        assert_eq!(base.equations.n_unknown, 5);
        assert_eq!(base.n_local_eq(&mesh.cells[0]).unwrap(), 6);
        assert_eq!(base.nnz_sup(&mesh), 6 + 36);
    }

    #[test]
    fn local_to_global_works() {
        let mesh = Samples::one_qua4();
        let p1 = ParamPorous::sample_linear_elastic_constant();
        let essential = Essential::new();
        let base = FemBase::new(&mesh, [(1, Elem::Porous(p1))], &essential).unwrap();
        let l2g = base.local_to_global(&mesh.cells[0]).unwrap();
        assert_eq!(l2g.len(), 12);
        // with no essential conditions, the numbering is (point, dof) order:
        // point 0: Ux=0 Uy=1 Pl=2; point 1: Ux=3 Uy=4 Pl=5; ...
        // mechanical block first, then the flow block
        assert_eq!(l2g, &[0, 1, 3, 4, 6, 7, 9, 10, 2, 5, 8, 11]);
    }
}
