use std::error::Error;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Args;
use pflow_core::RunConfig;
use pflow_sim::{load_config, Header, Session};

#[derive(Args, Debug)]
pub struct SolveArgs {
    /// DIMACS max-flow description.
    pub input: PathBuf,
    /// YAML run configuration; flags below switch options on top of it.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Process the lowest labelled strong root first.
    #[arg(long)]
    pub lowest_label: bool,
    /// Drain buckets in activation order.
    #[arg(long)]
    pub fifo: bool,
    /// Print the minimum cut instead of per-arc flows.
    #[arg(long)]
    pub cut: bool,
    /// Emit the JSON result document.
    #[arg(long)]
    pub json: bool,
    /// Header line; defaults to the first comment of the input.
    #[arg(long)]
    pub header: Option<String>,
    /// Print operation counters and phase timings to stderr.
    #[arg(long)]
    pub stats: bool,
}

pub fn run(args: &SolveArgs) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => RunConfig::default(),
    };
    config.lowest_label |= args.lowest_label;
    config.fifo_buckets |= args.fifo;
    config.display_cut |= args.cut;

    let header = match &args.header {
        Some(text) => Header::Text(text.clone()),
        None => Header::FirstComment,
    };

    let mut session = Session::new(config);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if args.json {
        writeln!(out, "{}", session.run_json_file(&args.input, header)?)?;
    } else {
        for line in session.run_file(&args.input, header)? {
            writeln!(out, "{line}")?;
        }
    }
    out.flush()?;

    if args.stats {
        eprintln!("{}", session.stats_json()?);
        eprintln!("{}", session.timer_json()?);
    }
    Ok(())
}
