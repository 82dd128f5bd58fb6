use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Operation counters of a single run.
///
/// Counters are observability only; nothing in the solver reads them back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Residual arcs inspected while looking for an admissible arc.
    pub arc_scans: u64,
    /// Strong roots attached beneath another tree after a push.
    pub mergers: u64,
    /// Pushes along admissible or tree arcs during phase one.
    pub pushes: u64,
    /// Label increments during phase one.
    pub relabels: u64,
    /// Gap events (a label bucket emptied below `N`).
    pub gaps: u64,
    /// Nodes lifted to `N` by gap events.
    pub gap_nodes: u64,
    /// Tree arcs cut because they saturated while excess travelled upward.
    pub splits: u64,
    /// Pushes during flow recovery.
    pub recovery_pushes: u64,
    /// Label increments during flow recovery.
    pub recovery_relabels: u64,
}

/// Stage of a run whose wall time is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Reading and validating the network description.
    ReadData,
    /// Building residual state and saturating the source arcs.
    Initialize,
    /// Phase one: maximum preflow and minimum cut.
    MinCut,
    /// Flow recovery: returning stranded excess to the source.
    MaxFlow,
}

/// Seconds spent in each [`Phase`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseTimes {
    /// Reading and validating input.
    pub read_data: f64,
    /// Residual setup.
    pub initialize: f64,
    /// Phase one.
    pub min_cut: f64,
    /// Flow recovery.
    pub max_flow: f64,
}

impl PhaseTimes {
    /// Adds `elapsed` to the slot of `phase`.
    pub fn record(&mut self, phase: Phase, elapsed: Duration) {
        let seconds = elapsed.as_secs_f64();
        match phase {
            Phase::ReadData => self.read_data += seconds,
            Phase::Initialize => self.initialize += seconds,
            Phase::MinCut => self.min_cut += seconds,
            Phase::MaxFlow => self.max_flow += seconds,
        }
    }

    /// Seconds recorded for `phase`.
    pub fn seconds(&self, phase: Phase) -> f64 {
        match phase {
            Phase::ReadData => self.read_data,
            Phase::Initialize => self.initialize,
            Phase::MinCut => self.min_cut,
            Phase::MaxFlow => self.max_flow,
        }
    }

    /// Sum over all phases.
    pub fn total(&self) -> f64 {
        self.read_data + self.initialize + self.min_cut + self.max_flow
    }
}

/// Run-scoped counters and timers, owned by the caller and passed to the solver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunContext {
    /// Operation counters.
    pub stats: RunStats,
    /// Wall time per phase.
    pub times: PhaseTimes,
}

impl RunContext {
    /// Runs `f`, charging its wall time to `phase`.
    pub fn timed<T>(&mut self, phase: Phase, f: impl FnOnce(&mut Self) -> T) -> T {
        let started = Instant::now();
        let out = f(self);
        self.times.record(phase, started.elapsed());
        out
    }

    /// Clears counters and timers for a fresh run.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_accumulates_per_phase() {
        let mut times = PhaseTimes::default();
        times.record(Phase::MinCut, Duration::from_millis(250));
        times.record(Phase::MinCut, Duration::from_millis(250));
        times.record(Phase::ReadData, Duration::from_secs(1));
        assert!((times.seconds(Phase::MinCut) - 0.5).abs() < 1e-9);
        assert!((times.total() - 1.5).abs() < 1e-9);
        assert_eq!(times.seconds(Phase::MaxFlow), 0.0);
    }

    #[test]
    fn timed_passes_context_through() {
        let mut ctx = RunContext::default();
        let value = ctx.timed(Phase::Initialize, |ctx| {
            ctx.stats.pushes += 2;
            7
        });
        assert_eq!(value, 7);
        assert_eq!(ctx.stats.pushes, 2);
        assert!(ctx.times.initialize >= 0.0);
        ctx.reset();
        assert_eq!(ctx.stats, RunStats::default());
    }
}
