use super::{BcConcentratedArray, BcDistributedArray, BcPrescribedArray};
use super::{ControlConvergence, ControlTime, Elements, FemBase, FemState, FileIo, LinearSystem};
use crate::base::{Config, Essential, FemError, Natural, Result};
use gemlab::mesh::Mesh;
use russell_lab::Vector;

/// Implements the implicit nonlinear increment controller
///
/// Each analysis stage is divided into increments; within an increment
/// the solver iterates:
///
/// 1. assemble the partitioned system (full Δt on the first iteration,
///    zero time increment for the conductivity/source terms afterwards);
/// 2. solve for a trial correction of the unknowns;
/// 3. roll back every integration point to its committed snapshot;
/// 4. recompute the internal force/flux increments from the cumulative
///    trial increment;
/// 5. judge the residue on the unknown partition.
///
/// On convergence the increment commits (totals, Gauss states, time). On
/// failure the increment size halves (adaptive stepping) or the stage
/// fails.
pub struct SolverImplicit<'a> {
    /// Holds configuration parameters
    config: &'a Config,

    /// Holds a collection of elements
    pub elements: Elements<'a>,

    /// Holds a collection of prescribed (essential) values
    pub bc_prescribed: BcPrescribedArray,

    /// Holds a collection of concentrated loads and point sources
    pub bc_concentrated: BcConcentratedArray,

    /// Holds a collection of distributed loads and fluxes
    pub bc_distributed: BcDistributedArray<'a>,

    /// Holds the partitioned linear system
    pub linear_system: LinearSystem<'a>,

    /// Total number of iterations of the last solved stage
    pub n_iterations_total: usize,

    /// Total number of failed (retried) increments of the last solved stage
    pub n_retries: usize,

    // work vectors
    duu_star: Vector,
    ff_star: Vector,
    ff_int: Vector,
    duu_i: Vector,
    dff: Vector,
}

impl<'a> SolverImplicit<'a> {
    /// Allocates a new instance
    pub fn new(
        mesh: &'a Mesh,
        base: &'a FemBase,
        config: &'a Config,
        essential: &Essential,
        natural: &'a Natural,
    ) -> Result<Self> {
        if let Some(message) = config.validate() {
            log::error!("{}", message);
            return Err(FemError::Config("cannot allocate the solver because config.validate() failed"));
        }
        let bc_prescribed = BcPrescribedArray::new(mesh, base, essential)?;
        let bc_concentrated = BcConcentratedArray::new(mesh, base, natural)?;
        let bc_distributed = BcDistributedArray::new(mesh, base, config, natural)?;
        let elements = Elements::new(mesh, base, config)?;
        let linear_system = LinearSystem::new(mesh, base)?;
        let ndof = base.equations.n_equation;
        Ok(SolverImplicit {
            config,
            elements,
            bc_prescribed,
            bc_concentrated,
            bc_distributed,
            linear_system,
            n_iterations_total: 0,
            n_retries: 0,
            duu_star: Vector::new(ndof),
            ff_star: Vector::new(ndof),
            ff_int: Vector::new(ndof),
            duu_i: Vector::new(ndof),
            dff: Vector::new(ndof),
        })
    }

    /// Solves one analysis stage, mutating the state
    ///
    /// No error unwinds silently: every fatal condition carries the
    /// offending increment, element, or boundary condition.
    pub fn solve(&mut self, state: &mut FemState, file_io: &mut FileIo) -> Result<()> {
        let nu = self.linear_system.nu;
        let ndof = self.linear_system.ndof;

        // one-time initialization pass (e.g. joint thicknesses)
        self.elements.initialize_all()?;

        let mut control_time = ControlTime::new(self.config)?;
        let mut conv = ControlConvergence::new(self.config);
        control_time.initialize(state)?;
        self.n_iterations_total = 0;
        self.n_retries = 0;

        // first snapshot
        file_io.write_state(state, &self.elements)?;

        let mut increment = 0;
        while !control_time.finished(state.t) {
            increment += 1;
            control_time.cap_by_remaining(state);
            let t = state.t;
            let dt = state.dt;
            conv.reset();
            conv.print_increment(increment, t, dt);

            // incremental targets from the BC functions at t and t+Δt:
            // the essential target is zero on the unknown partition (only
            // prescribed entries are written) and the natural target is
            // zeroed on the prescribed partition
            self.duu_star.fill(0.0);
            self.ff_star.fill(0.0);
            self.bc_prescribed.add_increments(&mut self.duu_star, t, dt);
            self.bc_concentrated.add_to_increment(&mut self.ff_star, t, dt);
            self.bc_distributed.add_to_increment(&mut self.ff_star, t, dt)?;
            for eq in nu..ndof {
                self.ff_star[eq] = 0.0;
            }

            // iteration loop
            state.duu.fill(0.0);
            self.ff_int.fill(0.0);
            let mut converged = false;
            for it in 0..self.config.maxits {
                self.n_iterations_total += 1;
                // (a) reassemble with the full increment on the first
                // iteration; later iterations use a zero time increment
                // for the conductivity/source terms (no double counting)
                let dt_flow = if it == 0 { dt } else { 0.0 };
                let reuse_factors = self.config.constant_tangent && it > 0;
                if !reuse_factors {
                    self.linear_system.reset()?;
                    self.elements
                        .assemble(&mut self.linear_system.part, &mut self.ff_star, state, dt_flow)?;
                }

                // (b) partitioned solve for the trial correction; the
                // prescribed increments drive the system on the first
                // iteration only
                for eq in 0..nu {
                    self.dff[eq] = self.ff_star[eq] - self.ff_int[eq];
                }
                for eq in nu..ndof {
                    self.dff[eq] = 0.0;
                }
                self.duu_i.fill(0.0);
                if it == 0 {
                    for eq in nu..ndof {
                        self.duu_i[eq] = self.duu_star[eq];
                    }
                }
                self.linear_system.solve_step(&mut self.duu_i, &mut self.dff, reuse_factors)?;

                // accumulate the cumulative trial increment
                for eq in 0..ndof {
                    state.duu[eq] += self.duu_i[eq];
                }

                // (c) rollback: trial states from the previous iteration
                // must never leak into this iteration's update
                self.elements.rollback_all();

                // (d) recompute the internal force/flux increments
                self.elements.update_all(&mut self.ff_int, state)?;

                // (e)-(f) convergence judgement on the unknown partition
                conv.analyze(it, &self.ff_star, &self.ff_int, nu);
                conv.print_iteration();
                if conv.converged() {
                    converged = true;
                    break;
                }
                if conv.diverged() || conv.stagnated() {
                    break;
                }
            }

            if converged {
                // commit: add the increments to the totals, make the
                // Gauss states permanent, and advance the time
                for eq in 0..ndof {
                    state.uu[eq] += state.duu[eq];
                    state.ff[eq] += self.ff_int[eq];
                }
                self.elements.commit_all();
                state.t += dt;
                conv.add_converged();
                // the final snapshot is always written after the loop
                if !control_time.finished(state.t) && control_time.output_due(state.t) {
                    file_io.write_state(state, &self.elements)?;
                }
                control_time.grow(state);
            } else {
                conv.add_failed();
                self.n_retries += 1;
                if !self.config.autoinc {
                    return Err(FemError::NonConvergence { increment, t });
                }
                control_time.halve(state)?;
            }
        }

        state.stage += 1;
        log::info!(
            "stage {} done: {} converged increments, {} failed attempts",
            state.stage,
            conv.n_converged_total(),
            conv.n_failed_total()
        );

        // final snapshot and summary
        file_io.write_state(state, &self.elements)?;
        file_io.write_self()
    }

    /// Solves one analysis stage, returning a success flag
    ///
    /// This is the driver-facing entry point: the error (if any) is
    /// logged and converted into `false`.
    pub fn run(&mut self, state: &mut FemState, file_io: &mut FileIo) -> bool {
        match self.solve(state, file_io) {
            Ok(()) => true,
            Err(error) => {
                log::error!("analysis failed: {}", error);
                false
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
