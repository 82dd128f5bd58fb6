use std::path::Path;

use log::{debug, info};
use serde::Serialize;

use pflow_core::{ErrorInfo, FlowError, RunConfig};
use pflow_engine::{solve, Phase, RunContext};
use pflow_graph::{parse_dimacs, read_dimacs_file, DimacsProblem};

use crate::report::RunReport;

/// Header line printed before a result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Header {
    /// No header line.
    #[default]
    Omit,
    /// Fixed text, printed as `c <text>`.
    Text(String),
    /// The first comment line of the input, if it has one.
    FirstComment,
}

impl Header {
    fn resolve(&self, problem: &DimacsProblem) -> Option<String> {
        match self {
            Header::Omit => None,
            Header::Text(text) => Some(text.clone()),
            Header::FirstComment => problem.first_comment.clone(),
        }
    }
}

impl From<&str> for Header {
    fn from(text: &str) -> Self {
        Header::Text(text.to_string())
    }
}

impl From<Option<String>> for Header {
    fn from(text: Option<String>) -> Self {
        text.map_or(Header::Omit, Header::Text)
    }
}

/// Runs DIMACS descriptions under a fixed [`RunConfig`] and keeps the
/// counters and timers of the most recent run.
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: RunConfig,
    last_run: Option<RunContext>,
}

impl Session {
    /// Creates a session; no run has happened yet.
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            last_run: None,
        }
    }

    /// Configuration applied to every run.
    pub fn config(&self) -> RunConfig {
        self.config
    }

    /// Counters and timers of the most recent successful run.
    pub fn last_run(&self) -> Option<&RunContext> {
        self.last_run.as_ref()
    }

    /// Solves the description stored at `path` and renders the text result.
    pub fn run_file(
        &mut self,
        path: impl AsRef<Path>,
        header: impl Into<Header>,
    ) -> Result<Vec<String>, FlowError> {
        Ok(self.report_file(path, header)?.to_lines())
    }

    /// Solves an in-memory description and renders the text result.
    pub fn run_str(
        &mut self,
        text: &str,
        header: impl Into<Header>,
    ) -> Result<Vec<String>, FlowError> {
        Ok(self.report_str(text, header)?.to_lines())
    }

    /// Like [`run_file`](Self::run_file), returning the JSON result document.
    pub fn run_json_file(
        &mut self,
        path: impl AsRef<Path>,
        header: impl Into<Header>,
    ) -> Result<String, FlowError> {
        to_json(&self.report_file(path, header)?)
    }

    /// Like [`run_str`](Self::run_str), returning the JSON result document.
    pub fn run_json_str(
        &mut self,
        text: &str,
        header: impl Into<Header>,
    ) -> Result<String, FlowError> {
        to_json(&self.report_str(text, header)?)
    }

    /// Solves the description stored at `path`.
    pub fn report_file(
        &mut self,
        path: impl AsRef<Path>,
        header: impl Into<Header>,
    ) -> Result<RunReport, FlowError> {
        let path = path.as_ref();
        info!("solving {}", path.display());
        let mut ctx = RunContext::default();
        let problem = ctx.timed(Phase::ReadData, |_| read_dimacs_file(path))?;
        self.finish(problem, header.into(), ctx)
    }

    /// Solves an in-memory description.
    pub fn report_str(
        &mut self,
        text: &str,
        header: impl Into<Header>,
    ) -> Result<RunReport, FlowError> {
        let mut ctx = RunContext::default();
        let problem = ctx.timed(Phase::ReadData, |_| parse_dimacs(text))?;
        self.finish(problem, header.into(), ctx)
    }

    /// Counters of the last run as a JSON object; all zero before the first run.
    pub fn stats_json(&self) -> Result<String, FlowError> {
        let stats = self.last_run.as_ref().map(|ctx| ctx.stats).unwrap_or_default();
        to_json(&stats)
    }

    /// Seconds per phase of the last run as a JSON object.
    pub fn timer_json(&self) -> Result<String, FlowError> {
        let times = self.last_run.as_ref().map(|ctx| ctx.times).unwrap_or_default();
        to_json(&times)
    }

    fn finish(
        &mut self,
        problem: DimacsProblem,
        header: Header,
        mut ctx: RunContext,
    ) -> Result<RunReport, FlowError> {
        let solution = solve(&problem.network, self.config, &mut ctx)?;
        let report = RunReport::new(
            header.resolve(&problem),
            self.config,
            &problem.network,
            &solution,
        );
        debug!(
            "max flow {} in {:.6}s ({} pushes, {} relabels, {} gaps)",
            report.max_flow,
            ctx.times.total(),
            ctx.stats.pushes,
            ctx.stats.relabels,
            ctx.stats.gaps
        );
        self.last_run = Some(ctx);
        Ok(report)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, FlowError> {
    serde_json::to_string_pretty(value)
        .map_err(|err| FlowError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}
