use super::FemBase;
use crate::base::{Config, Result};
use russell_lab::Vector;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Holds the primary state of a simulation
///
/// The vectors are indexed by the global (partitioned) equation numbers.
/// `uu` holds the primary totals (displacements and liquid pressures) and
/// `ff` the conjugate natural totals (forces and accumulated discharges,
/// including the reactions at prescribed DOFs). `duu` is the cumulative
/// trial increment of the current increment; it is only made permanent by
/// the controller's commit step.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FemState {
    /// Time
    pub t: f64,

    /// Time increment
    pub dt: f64,

    /// Number of completed analysis stages
    pub stage: usize,

    /// Primary unknowns U (n_equation)
    pub uu: Vector,

    /// Cumulated trial increment ΔU of the current increment (n_equation)
    pub duu: Vector,

    /// Natural (conjugate) totals F: forces and discharges (n_equation)
    pub ff: Vector,
}

impl FemState {
    /// Allocates a new instance
    pub fn new(base: &FemBase, config: &Config) -> Result<FemState> {
        let n_equation = base.equations.n_equation;
        if n_equation == 0 {
            return Err(crate::base::FemError::Library("there are no equations (empty mesh?)"));
        }
        Ok(FemState {
            t: config.t_ini,
            dt: 0.0,
            stage: 0,
            uu: Vector::new(n_equation),
            duu: Vector::new(n_equation),
            ff: Vector::new(n_equation),
        })
    }

    /// Reads a JSON file containing the state data
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let input = File::open(path).map_err(|_| "cannot open state file")?;
        let buffered = BufReader::new(input);
        let state = serde_json::from_reader(buffered).map_err(|_| "cannot parse state file")?;
        Ok(state)
    }

    /// Writes a JSON file with the state data
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<()>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create state file")?;
        serde_json::to_writer(&mut file, &self).map_err(|_| "cannot write state file")?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
