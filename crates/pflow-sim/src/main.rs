use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    convert::{self, ConvertArgs},
    solve::{self, SolveArgs},
    version::{self, VersionArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "pflow-sim", about = "Pseudoflow max-flow / min-cut solver")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve a DIMACS max-flow description.
    Solve(SolveArgs),
    /// Convert a DIMACS description into a serialized network.
    Convert(ConvertArgs),
    /// Print the package version.
    Version(VersionArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    match cli.command {
        Command::Solve(args) => solve::run(&args),
        Command::Convert(args) => convert::run(&args),
        Command::Version(args) => version::run(&args),
    }
}
