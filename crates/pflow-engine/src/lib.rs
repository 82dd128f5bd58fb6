#![deny(missing_docs)]

//! Pseudoflow maximum-flow / minimum-cut solver.
//!
//! The engine keeps a forest of trees over the residual network. Strong
//! roots (tree roots holding positive excess) are drawn from a label-indexed
//! bucket scheduler, push along admissible arcs (merging into the tree on the
//! other side and letting the excess travel to that tree's root) and are
//! relabelled when no admissible arc is left. A first phase stops at a
//! maximum preflow, which already fixes the minimum cut; a recovery phase
//! then returns stranded excess to the source so the reported arc flows are
//! feasible.
//!
//! ```
//! use pflow_core::RunConfig;
//! use pflow_engine::{solve, RunContext};
//! use pflow_graph::parse_dimacs;
//!
//! let problem = parse_dimacs("p max 3 2\nn 1 s\nn 3 t\na 1 2 4\na 2 3 3\n").unwrap();
//! let mut ctx = RunContext::default();
//! let solution = solve(&problem.network, RunConfig::default(), &mut ctx).unwrap();
//! assert_eq!(solution.max_flow_value(), 3);
//! assert_eq!(solution.min_cut().capacity, 3);
//! ```

/// Label-indexed buckets of strong roots.
pub mod buckets;
/// Push/relabel core and the two solver phases.
pub mod engine;
/// Minimum cut and per-arc flow extraction.
pub mod extract;
mod forest;
mod residual;
/// Run-scoped operation counters and phase timers.
pub mod stats;

use pflow_core::{FlowError, RunConfig};
use pflow_graph::FlowNetwork;

pub use buckets::BucketScheduler;
pub use engine::PseudoflowEngine;
pub use extract::{ArcFlow, CutArc, MinCut, Solution};
pub use stats::{Phase, PhaseTimes, RunContext, RunStats};

/// Solves `network` under `config`, recording counters and timings in `ctx`.
///
/// Fails only when the network has no source or sink; every other input
/// problem is rejected while the network is built.
pub fn solve(
    network: &FlowNetwork,
    config: RunConfig,
    ctx: &mut RunContext,
) -> Result<Solution, FlowError> {
    let engine = ctx.timed(Phase::Initialize, |_| PseudoflowEngine::new(network, config))?;
    Ok(engine.run(ctx))
}
