use std::error::Error;

use clap::Args;
use pflow_graph::NETWORK_SCHEMA;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Emit JSON including the network schema version.
    #[arg(long)]
    pub long: bool,
}

#[derive(Debug, Serialize)]
struct VersionInfo {
    version: String,
    network_schema: String,
}

pub fn run(args: &VersionArgs) -> Result<(), Box<dyn Error>> {
    if !args.long {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    let info = VersionInfo {
        version: env!("CARGO_PKG_VERSION").into(),
        network_schema: NETWORK_SCHEMA.to_string(),
    };
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}
