use hmsim::base::FemError;
use hmsim::fem::{read_snapshot, FileIo};
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(name = "hmsim_report", about = "Prints a summary of saved analysis results")]
struct Options {
    out_dir: String,

    fn_stem: String,
}

fn main() -> Result<(), FemError> {
    // parse options
    let options = Options::from_args();

    // load the summary
    let path_summary = format!("{}/{}-summary.json", options.out_dir, options.fn_stem);
    let file_io = FileIo::read_json(&path_summary)?;

    // print a table with one line per snapshot
    println!("{:>8} {:>13} {:>13} {:>13} {:>13}", "index", "t", "min(U)", "max(U)", "max|F|");
    for (position, index) in file_io.indices.iter().enumerate() {
        let path = format!("{}/{}-{:0>20}.json", options.out_dir, options.fn_stem, index);
        let snapshot = read_snapshot(&path)?;
        let (mut u_min, mut u_max, mut f_max) = (f64::INFINITY, f64::NEG_INFINITY, 0.0_f64);
        for u in &snapshot.uu {
            u_min = u_min.min(*u);
            u_max = u_max.max(*u);
        }
        for f in &snapshot.ff {
            f_max = f_max.max(f.abs());
        }
        println!(
            "{:>8} {:>13.6e} {:>13.6e} {:>13.6e} {:>13.6e}",
            index, file_io.times[position], u_min, u_max, f_max
        );
    }
    Ok(())
}
