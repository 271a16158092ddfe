use super::FemBase;
use crate::base::{Partition, Result};
use gemlab::mesh::Mesh;
use russell_lab::{vec_add, vec_copy, Vector};
use russell_sparse::{Genie, LinSolver};

/// Solves the partitioned global linear system
///
/// With the equations numbered unknown-first, the system reads
///
/// ```text
/// [K11 K12] [ΔU1 (unknown)]   [ΔF1 (known)  ]
/// [K21 K22] [ΔU2 (known)  ] = [ΔF2 (unknown)]
/// ```
///
/// and the solution is `ΔU1 = K11⁻¹ (ΔF1 − K12 ΔU2)` followed by the
/// reaction recovery `ΔF2 = K21 ΔU1 + K22 ΔU2`.
///
/// A factorization failure is not fatal: it is logged and the unknown
/// vector is filled with NaN so that the calling iteration is judged
/// non-convergent instead of crashing the analysis.
pub struct LinearSystem<'a> {
    /// Number of unknown equations (partition boundary)
    pub nu: usize,

    /// Total number of equations
    pub ndof: usize,

    /// The four matrix blocks
    pub part: Partition,

    /// Linear solver for the unknown-unknown block
    solver: LinSolver<'a>,

    /// Indicates that valid factors are available
    factorized: bool,

    // work vectors
    u1: Vector,
    u2: Vector,
    f1: Vector,
    f2: Vector,
    rhs: Vector,
    tmp_nu: Vector,
    tmp_np: Vector,
}

impl<'a> LinearSystem<'a> {
    /// Allocates a new instance
    pub fn new(mesh: &Mesh, base: &FemBase) -> Result<Self> {
        let nu = base.equations.n_unknown;
        let ndof = base.equations.n_equation;
        let np = ndof - nu;
        let nnz_sup = base.nnz_sup(mesh);
        Ok(LinearSystem {
            nu,
            ndof,
            part: Partition::new(nu, ndof, nnz_sup)?,
            solver: LinSolver::new(Genie::Umfpack)?,
            factorized: false,
            u1: Vector::new(nu),
            u2: Vector::new(np),
            f1: Vector::new(nu),
            f2: Vector::new(np),
            rhs: Vector::new(nu),
            tmp_nu: Vector::new(nu),
            tmp_np: Vector::new(np),
        })
    }

    /// Clears the matrix blocks for a new assembly
    pub fn reset(&mut self) -> Result<()> {
        self.factorized = false;
        self.part.reset()
    }

    /// Solves the partitioned system
    ///
    /// # Input
    ///
    /// * `duu` -- the prescribed entries `[nu..ndof)` hold ΔU2 on input;
    ///   the unknown entries `[0..nu)` are filled with ΔU1 on output
    /// * `dff` -- the unknown entries `[0..nu)` hold ΔF1 on input; the
    ///   prescribed entries `[nu..ndof)` are filled with the reactions
    /// * `reuse_factors` -- reuses the factors of a previous call
    ///   (constant-tangent scheme); the blocks must not have been reset
    pub fn solve_step(&mut self, duu: &mut Vector, dff: &mut Vector, reuse_factors: bool) -> Result<()> {
        let (nu, ndof) = (self.nu, self.ndof);
        let np = ndof - nu;
        if nu == ndof && ndof > 0 {
            log::warn!("no essential boundary conditions were prescribed; the model is likely under-constrained");
        }

        // split the input
        for i in 0..nu {
            self.f1[i] = dff[i];
        }
        for j in 0..np {
            self.u2[j] = duu[nu + j];
        }

        // helper to mark the step invalid (judged non-convergent by the caller)
        macro_rules! invalidate {
            ($msg:expr) => {{
                log::warn!("linear solve failed: {}", $msg);
                self.factorized = false;
                for i in 0..nu {
                    duu[i] = f64::NAN;
                }
                for j in 0..np {
                    dff[nu + j] = f64::NAN;
                }
                return Ok(());
            }};
        }

        if nu > 0 {
            // rhs = ΔF1 − K12 ΔU2
            if np > 0 {
                self.part.kk12.mat_vec_mul(&mut self.tmp_nu, 1.0, &self.u2)?;
                vec_add(&mut self.rhs, 1.0, &self.f1, -1.0, &self.tmp_nu)?;
            } else {
                vec_copy(&mut self.rhs, &self.f1)?;
            }

            // factorize and back-substitute
            if !reuse_factors || !self.factorized {
                match self.solver.actual.factorize(&mut self.part.kk11, None) {
                    Ok(_) => self.factorized = true,
                    Err(message) => invalidate!(message),
                }
            }
            match self.solver.actual.solve(&mut self.u1, &self.part.kk11, &self.rhs, false) {
                Ok(_) => (),
                Err(message) => invalidate!(message),
            }
            for i in 0..nu {
                duu[i] = self.u1[i];
            }
        }

        // recover the reactions: ΔF2 = K21 ΔU1 + K22 ΔU2
        if np > 0 {
            if nu > 0 {
                self.part.kk21.mat_vec_mul(&mut self.tmp_np, 1.0, &self.u1)?;
            } else {
                self.tmp_np.fill(0.0);
            }
            self.part.kk22.mat_vec_mul(&mut self.f2, 1.0, &self.u2)?;
            for j in 0..np {
                dff[nu + j] = self.f2[j] + self.tmp_np[j];
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use crate::base::Partition;
    use crate::base::{Elem, Essential, ParamSolid, SampleMeshes};
    use crate::fem::{FemBase, LinearSystem};
    use russell_lab::{approx_eq, Vector};
    use russell_sparse::{Genie, LinSolver};

    /// Builds a LinearSystem directly from a hand-made partition (two
    /// unknowns, one prescribed) representing a two-spring chain
    fn toy_system() -> LinearSystem<'static> {
        let mut part = Partition::new(2, 3, 9).unwrap();
        // K = [ 1 -1  0]
        //     [-1  2 -1]
        //     [ 0 -1  1]
        part.put(0, 0, 1.0).unwrap();
        part.put(0, 1, -1.0).unwrap();
        part.put(1, 0, -1.0).unwrap();
        part.put(1, 1, 2.0).unwrap();
        part.put(1, 2, -1.0).unwrap();
        part.put(2, 1, -1.0).unwrap();
        part.put(2, 2, 1.0).unwrap();
        LinearSystem {
            nu: 2,
            ndof: 3,
            part,
            solver: LinSolver::new(Genie::Umfpack).unwrap(),
            factorized: false,
            u1: Vector::new(2),
            u2: Vector::new(1),
            f1: Vector::new(2),
            f2: Vector::new(1),
            rhs: Vector::new(2),
            tmp_nu: Vector::new(2),
            tmp_np: Vector::new(1),
        }
    }

    #[test]
    fn solve_step_reproduces_analytic_solution() {
        let mut lin = toy_system();
        let mut duu = Vector::new(3); // ΔU2 = 0 (fixed end)
        let mut dff = Vector::from(&[1.0, 0.0, 0.0]); // unit load at the free end
        lin.solve_step(&mut duu, &mut dff, false).unwrap();

        // u0 = 2, u1 = 1 for unit springs
        approx_eq(duu[0], 2.0, 1e-13);
        approx_eq(duu[1], 1.0, 1e-13);
        // the reaction balances the applied load: Σ F = 0
        approx_eq(dff[2], -1.0, 1e-13);
        approx_eq(dff[0] + dff[1] + dff[2], 0.0, 1e-13);
    }

    #[test]
    fn prescribed_motion_drives_the_unknowns() {
        let mut lin = toy_system();
        let mut duu = Vector::from(&[0.0, 0.0, 0.5]); // move the fixed end
        let mut dff = Vector::new(3);
        lin.solve_step(&mut duu, &mut dff, false).unwrap();

        // rigid-body translation: everything moves by 0.5, no forces
        approx_eq(duu[0], 0.5, 1e-13);
        approx_eq(duu[1], 0.5, 1e-13);
        approx_eq(dff[2], 0.0, 1e-13);
    }

    #[test]
    fn singular_block_is_not_fatal() {
        let mut part = Partition::new(2, 3, 9).unwrap();
        // K11 singular (zero matrix); K22 regular
        part.put(2, 2, 1.0).unwrap();
        let mut lin = LinearSystem {
            nu: 2,
            ndof: 3,
            part,
            solver: LinSolver::new(Genie::Umfpack).unwrap(),
            factorized: false,
            u1: Vector::new(2),
            u2: Vector::new(1),
            f1: Vector::new(2),
            f2: Vector::new(1),
            rhs: Vector::new(2),
            tmp_nu: Vector::new(2),
            tmp_np: Vector::new(1),
        };
        let mut duu = Vector::new(3);
        let mut dff = Vector::from(&[1.0, 0.0, 0.0]);
        lin.solve_step(&mut duu, &mut dff, false).unwrap();
        assert!(duu[0].is_nan());
        assert!(duu[1].is_nan());
        assert!(dff[2].is_nan());
    }

    #[test]
    fn new_works_with_fem_base() {
        let mesh = SampleMeshes::column_two_qua4();
        let p1 = ParamSolid::sample_linear_elastic();
        let mut essential = Essential::new();
        essential
            .points(&[0, 1], crate::base::Dof::Ux, 0.0)
            .points(&[0, 1], crate::base::Dof::Uy, 0.0);
        let base = FemBase::new(&mesh, [(1, Elem::Solid(p1))], &essential).unwrap();
        let lin = LinearSystem::new(&mesh, &base).unwrap();
        assert_eq!(lin.nu, 8);
        assert_eq!(lin.ndof, 12);
    }
}
