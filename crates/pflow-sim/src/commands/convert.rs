use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use log::info;
use pflow_graph::{canonical_hash, network_to_bytes, network_to_json, read_dimacs_file};

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// DIMACS max-flow description.
    pub input: PathBuf,
    /// Output path; `.bin` selects bincode, anything else JSON.
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &ConvertArgs) -> Result<(), Box<dyn Error>> {
    let problem = read_dimacs_file(&args.input)?;
    let network = &problem.network;
    let bytes = match args.out.extension().and_then(|ext| ext.to_str()) {
        Some("bin") => network_to_bytes(network)?,
        _ => network_to_json(network)?.into_bytes(),
    };
    if let Some(parent) = args.out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&args.out, bytes)?;
    info!(
        "wrote {} ({} nodes, {} arcs, hash {})",
        args.out.display(),
        network.num_nodes(),
        network.num_arcs(),
        canonical_hash(network)
    );
    Ok(())
}
