#![deny(missing_docs)]
#![doc = "Session orchestration and reporting for the pseudoflow solver."]

/// JSON and text rendering of a run.
pub mod report;
/// DIMACS-in, result-out runs with per-run counters.
pub mod session;

pub use report::RunReport;
pub use session::{Header, Session};

use std::path::Path;

use pflow_core::{ErrorInfo, FlowError, RunConfig};

/// Loads a [`RunConfig`] from a YAML file; missing keys keep their defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<RunConfig, FlowError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .map_err(|err| FlowError::from(err).with_context("path", path.display()))?;
    serde_yaml::from_str(&contents).map_err(|err| {
        FlowError::Serde(
            ErrorInfo::new("config-yaml", err.to_string()).with_context("path", path.display()),
        )
    })
}
