use super::{Elements, FemState};
use crate::base::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Defines the default output directory
pub const DEFAULT_OUT_DIR: &str = "/tmp/hmsim/results";

/// Holds one output snapshot: DOF values and Gauss-point scalar outputs
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Snapshot {
    /// Time of the snapshot
    pub t: f64,

    /// Primary totals (displacements and liquid pressures)
    pub uu: Vec<f64>,

    /// Natural totals (forces, discharges, reactions)
    pub ff: Vec<f64>,

    /// Named scalar outputs per cell (averaged over the Gauss points)
    pub cells: Vec<HashMap<String, f64>>,
}

/// Assists in generating output files
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FileIo {
    /// Holds a flag to enable/disable the file generation
    enabled: bool,

    /// Defines the output directory
    output_dir: String,

    /// Defines the filename stem
    filename_stem: String,

    /// Holds the count of files written
    output_count: usize,

    /// Holds the indices of the output files
    pub indices: Vec<usize>,

    /// Holds the simulation times corresponding to each output file
    pub times: Vec<f64>,
}

impl FileIo {
    /// Allocates a new instance with deactivated generation of files
    pub fn new() -> Self {
        FileIo {
            enabled: false,
            output_dir: String::new(),
            filename_stem: String::new(),
            output_count: 0,
            indices: Vec::new(),
            times: Vec::new(),
        }
    }

    /// Allocates a new instance writing into the output directory
    ///
    /// # Input
    ///
    /// * `filename_stem` -- the last part of the filename without extension
    /// * `output_directory` -- None means [DEFAULT_OUT_DIR]
    pub fn new_enabled(filename_stem: &str, output_directory: Option<&str>) -> Result<Self> {
        let out_dir = match output_directory {
            Some(d) => d,
            None => DEFAULT_OUT_DIR,
        };
        fs::create_dir_all(out_dir).map_err(|_| "cannot create output directory")?;
        Ok(FileIo {
            enabled: true,
            output_dir: out_dir.to_string(),
            filename_stem: filename_stem.to_string(),
            output_count: 0,
            indices: Vec::new(),
            times: Vec::new(),
        })
    }

    /// Generates the filename path for the summary file
    pub fn path_summary(&self) -> String {
        if self.enabled {
            format!("{}/{}-summary.json", self.output_dir, self.filename_stem)
        } else {
            "".to_string()
        }
    }

    /// Generates the filename path for the snapshot files
    pub fn path_snapshot(&self, index: usize) -> String {
        if self.enabled {
            format!("{}/{}-{:0>20}.json", self.output_dir, self.filename_stem, index)
        } else {
            "".to_string()
        }
    }

    /// Reads a JSON file containing this struct
    pub fn read_json<P>(full_path: &P) -> Result<Self>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let file = File::open(path).map_err(|_| "cannot open summary file")?;
        let buffered = BufReader::new(file);
        let summary = serde_json::from_reader(buffered).map_err(|_| "cannot parse summary file")?;
        Ok(summary)
    }

    /// Writes a JSON file with this struct
    pub fn write_json<P>(&self, full_path: &P) -> Result<()>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create summary file")?;
        serde_json::to_writer(&mut file, &self).map_err(|_| "cannot write summary file")?;
        Ok(())
    }

    /// Writes a snapshot with the current state and Gauss scalar outputs
    ///
    /// Output happens only after a commit, outside the iteration loop.
    pub(crate) fn write_state(&mut self, state: &FemState, elements: &Elements) -> Result<()> {
        if self.enabled {
            let snapshot = Snapshot {
                t: state.t,
                uu: state.uu.as_data().clone(),
                ff: state.ff.as_data().clone(),
                cells: elements.scalar_outputs(),
            };
            let path = self.path_snapshot(self.output_count);
            let mut file = File::create(&path).map_err(|_| "cannot create snapshot file")?;
            serde_json::to_writer(&mut file, &snapshot).map_err(|_| "cannot write snapshot file")?;
            self.indices.push(self.output_count);
            self.times.push(state.t);
            self.output_count += 1;
        }
        Ok(())
    }

    /// Writes the summary file
    pub(crate) fn write_self(&self) -> Result<()> {
        if self.enabled {
            let path = self.path_summary();
            self.write_json(&path)?;
        }
        Ok(())
    }
}

/// Reads a snapshot file
pub fn read_snapshot<P>(full_path: &P) -> Result<Snapshot>
where
    P: AsRef<OsStr> + ?Sized,
{
    let path = Path::new(full_path).to_path_buf();
    let file = File::open(path).map_err(|_| "cannot open snapshot file")?;
    let buffered = BufReader::new(file);
    let snapshot = serde_json::from_reader(buffered).map_err(|_| "cannot parse snapshot file")?;
    Ok(snapshot)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{read_snapshot, FileIo};
    use crate::base::{Config, Elem, Essential, ParamSolid, SampleMeshes};
    use crate::fem::{Elements, FemBase, FemState};

    #[test]
    fn disabled_file_io_is_a_no_op() {
        let mesh = SampleMeshes::column_two_qua4();
        let p1 = ParamSolid::sample_linear_elastic();
        let essential = Essential::new();
        let base = FemBase::new(&mesh, [(1, Elem::Solid(p1))], &essential).unwrap();
        let config = Config::new(&mesh);
        let state = FemState::new(&base, &config).unwrap();
        let elements = Elements::new(&mesh, &base, &config).unwrap();

        let mut file_io = FileIo::new();
        file_io.write_state(&state, &elements).unwrap();
        file_io.write_self().unwrap();
        assert_eq!(file_io.indices.len(), 0);
        assert_eq!(file_io.path_summary(), "");
    }

    #[test]
    fn snapshots_round_trip() {
        let mesh = SampleMeshes::column_two_qua4();
        let p1 = ParamSolid::sample_linear_elastic();
        let essential = Essential::new();
        let base = FemBase::new(&mesh, [(1, Elem::Solid(p1))], &essential).unwrap();
        let config = Config::new(&mesh);
        let mut state = FemState::new(&base, &config).unwrap();
        let elements = Elements::new(&mesh, &base, &config).unwrap();

        let out_dir = "/tmp/hmsim/test_file_io";
        let mut file_io = FileIo::new_enabled("column", Some(out_dir)).unwrap();

        state.t = 0.5;
        state.uu[0] = -0.125;
        file_io.write_state(&state, &elements).unwrap();
        file_io.write_self().unwrap();

        let summary = FileIo::read_json(&file_io.path_summary()).unwrap();
        assert_eq!(summary.indices, &[0]);
        assert_eq!(summary.times, &[0.5]);

        let snapshot = read_snapshot(&file_io.path_snapshot(0)).unwrap();
        assert_eq!(snapshot.t, 0.5);
        assert_eq!(snapshot.uu[0], -0.125);
        assert_eq!(snapshot.cells.len(), 2);
        assert!(snapshot.cells[0].contains_key("sig_yy"));
    }
}
