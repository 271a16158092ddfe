//! Hmsim - coupled hydromechanical finite element solver
//!
//! This crate implements an incremental-iterative (Newton-Raphson family)
//! finite element engine for coupled solid-deformation / liquid-flow
//! analyses. The main components are:
//!
//! * [base] -- configuration, degrees of freedom, equation numbering with
//!   the unknown/prescribed partition, boundary condition sets, and the
//!   partitioned assembly helpers
//! * [material] -- the material model contract (stress-strain and
//!   conductivity) and the Gauss-point state with committed/trial buffers
//! * [fem] -- element integrators, boundary condition integrators, the
//!   partitioned linear system, and the implicit incremental solver
//!
//! The mesh, shape functions, and quadrature tables are provided by
//! [gemlab]; dense and sparse linear algebra by `russell_lab`,
//! `russell_sparse`, and `russell_tensor`.

/// Defines the error type and auxiliary structures
pub mod base;

/// Implements the finite element solver
pub mod fem;

/// Implements material models
pub mod material;

/// Re-exports the most commonly used structures
pub mod prelude;
