use crate::base::{FemError, Result};
use gemlab::integ::Gauss;
use gemlab::mesh::CellId;
use gemlab::shapes::Scratchpad;
use russell_lab::Matrix;
use russell_tensor::SQRT_2;

/// Checks the Jacobian determinant, mapping a non-positive value to the
/// fatal geometry error with the offending cell id
#[inline]
pub(crate) fn check_det_jac(cell_id: CellId, det_jac: f64) -> Result<f64> {
    if det_jac <= 0.0 {
        return Err(FemError::InvalidGeometry { cell_id, det_jac });
    }
    Ok(det_jac)
}

/// Fills the strain-displacement matrix B (Mandel basis)
///
/// The gradients must have been computed already (`pad.calc_gradient`).
/// Rows follow the Mandel component order; the off-diagonal rows carry the
/// 1/√2 factor so that `Bᵀ σ` and `Bᵀ D B` work directly with Mandel
/// vectors and matrices.
///
/// * 2D: `bb` is (4, 2·nnode); the εzz row stays zero (plane idealizations)
/// * 3D: `bb` is (6, 3·nnode)
pub(crate) fn fill_strain_displacement(bb: &mut Matrix, pad: &Scratchpad, two_dim: bool) {
    let g = &pad.gradient;
    let (nnode, ndim) = g.dims();
    bb.fill(0.0);
    if two_dim {
        assert_eq!(ndim, 2);
        for m in 0..nnode {
            let (gx, gy) = (g.get(m, 0), g.get(m, 1));
            bb.set(0, 2 * m, gx);
            bb.set(1, 2 * m + 1, gy);
            bb.set(3, 2 * m, gy / SQRT_2);
            bb.set(3, 2 * m + 1, gx / SQRT_2);
        }
    } else {
        assert_eq!(ndim, 3);
        for m in 0..nnode {
            let (gx, gy, gz) = (g.get(m, 0), g.get(m, 1), g.get(m, 2));
            bb.set(0, 3 * m, gx);
            bb.set(1, 3 * m + 1, gy);
            bb.set(2, 3 * m + 2, gz);
            bb.set(3, 3 * m, gy / SQRT_2);
            bb.set(3, 3 * m + 1, gx / SQRT_2);
            bb.set(4, 3 * m + 1, gz / SQRT_2);
            bb.set(4, 3 * m + 2, gy / SQRT_2);
            bb.set(5, 3 * m, gz / SQRT_2);
            bb.set(5, 3 * m + 2, gx / SQRT_2);
        }
    }
}

/// Computes the volume (3D) or area × thickness (2D) of a cell by
/// numerical integration
pub(crate) fn cell_volume(cell_id: CellId, pad: &mut Scratchpad, gauss: &Gauss, thickness: f64) -> Result<f64> {
    let mut volume = 0.0;
    for p in 0..gauss.npoint() {
        let iota = gauss.coords(p);
        let det_jac = check_det_jac(cell_id, pad.calc_jacobian(iota)?)?;
        volume += det_jac * gauss.weight(p) * thickness;
    }
    Ok(volume)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
