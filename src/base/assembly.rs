use super::{FemError, Result};
use russell_lab::{Matrix, Vector};
use russell_sparse::{CooMatrix, SparseMatrix, Sym};

/// Holds the global system matrix split into the four partition blocks
///
/// With the equation numbers partitioned as unknown `[0..nu)` and
/// prescribed `[nu..ndof)`, the global matrix reads:
///
/// ```text
/// [K11 K12]  K11: (nu, nu)   -- factorized
/// [K21 K22]  K22: (np, np)   -- used for the reaction recovery
/// ```
///
/// Duplicate (row, col) entries accumulate additively (standard finite
/// element assembly semantics).
pub struct Partition {
    /// Partition boundary (number of unknown equations)
    pub nu: usize,

    /// Number of prescribed equations
    pub np: usize,

    /// Unknown-unknown block (factorized by the linear solver)
    pub kk11: SparseMatrix,

    /// Unknown-prescribed block
    pub kk12: CooMatrix,

    /// Prescribed-unknown block
    pub kk21: CooMatrix,

    /// Prescribed-prescribed block
    pub kk22: CooMatrix,
}

impl Partition {
    /// Allocates a new instance
    ///
    /// `nnz_sup` is an upper bound of the number of nonzero values of the
    /// full matrix; each block is given this capacity.
    pub fn new(nu: usize, ndof: usize, nnz_sup: usize) -> Result<Self> {
        if nu > ndof {
            return Err(FemError::Library("nu must not exceed the total number of DOFs"));
        }
        let np = ndof - nu;
        // COO dimensions must be at least one; empty blocks are never written to
        let (mu, mp) = (usize::max(nu, 1), usize::max(np, 1));
        let max_nnz = usize::max(nnz_sup, 1);
        Ok(Partition {
            nu,
            np,
            kk11: SparseMatrix::new_coo(mu, mu, max_nnz, Sym::No)?,
            kk12: CooMatrix::new(mu, mp, max_nnz, Sym::No)?,
            kk21: CooMatrix::new(mp, mu, max_nnz, Sym::No)?,
            kk22: CooMatrix::new(mp, mp, max_nnz, Sym::No)?,
        })
    }

    /// Clears all blocks (restarts the triplet lists)
    pub fn reset(&mut self) -> Result<()> {
        self.kk11.reset()?;
        self.kk12.reset();
        self.kk21.reset();
        self.kk22.reset();
        Ok(())
    }

    /// Puts a value into the block corresponding to the global (i, j) pair
    pub fn put(&mut self, i: usize, j: usize, value: f64) -> Result<()> {
        let nu = self.nu;
        let ndof = self.nu + self.np;
        if i >= ndof || j >= ndof {
            return Err(FemError::Assembly {
                nrow: ndof,
                ncol: ndof,
                message: "equation number is out of range",
            });
        }
        let status = if i < nu && j < nu {
            self.kk11.get_coo_mut().and_then(|coo| coo.put(i, j, value))
        } else if i < nu {
            self.kk12.put(i, j - nu, value)
        } else if j < nu {
            self.kk21.put(i - nu, j, value)
        } else {
            self.kk22.put(i - nu, j - nu, value)
        };
        status.map_err(|message| FemError::Assembly {
            nrow: ndof,
            ncol: ndof,
            message,
        })
    }
}

/// Assembles a local vector into the global vector
///
/// `l2g` maps each local index to its global equation number. No partition
/// filtering happens here; entries on prescribed equations accumulate too
/// (they become reactions).
#[inline]
pub fn assemble_vector(ff_global: &mut Vector, f_local: &Vector, l2g: &[usize]) {
    for l in 0..f_local.dim() {
        ff_global[l2g[l]] += f_local[l];
    }
}

/// Assembles a scaled local matrix into the partitioned global matrix
///
/// `rows` and `cols` hold the global equation numbers of the local rows
/// and columns, so rectangular blocks (e.g. coupling matrices) can be
/// scattered with distinct maps.
pub fn assemble_matrix(
    part: &mut Partition,
    kk_local: &Matrix,
    rows: &[usize],
    cols: &[usize],
    scale: f64,
) -> Result<()> {
    for l in 0..rows.len() {
        for ll in 0..cols.len() {
            let value = scale * kk_local.get(l, ll);
            if value != 0.0 {
                part.put(rows[l], cols[ll], value)?;
            }
        }
    }
    Ok(())
}

/// Assembles the transpose of a scaled local matrix into the global matrix
///
/// `rows`/`cols` refer to the original (non-transposed) local matrix; the
/// entries land at the mirrored (col, row) positions. Used to scatter the
/// coupling block together with its transpose.
pub fn assemble_matrix_transposed(
    part: &mut Partition,
    kk_local: &Matrix,
    rows: &[usize],
    cols: &[usize],
    scale: f64,
) -> Result<()> {
    for l in 0..rows.len() {
        for ll in 0..cols.len() {
            let value = scale * kk_local.get(l, ll);
            if value != 0.0 {
                part.put(cols[ll], rows[l], value)?;
            }
        }
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
