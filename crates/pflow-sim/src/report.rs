use serde::{Deserialize, Serialize};

use pflow_core::{Capacity, RunConfig};
use pflow_engine::{ArcFlow, MinCut, Solution};
use pflow_graph::{canonical_hash, FlowNetwork};

/// Outcome of one session run, serializable as the JSON result document.
///
/// Exactly one of `flows` and `cut` is present, chosen by
/// [`RunConfig::display_cut`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Header echoed before the result, without the `c ` prefix.
    #[serde(default)]
    pub header: Option<String>,
    /// Configuration the run used.
    pub config: RunConfig,
    /// Number of nodes of the solved network.
    pub num_nodes: usize,
    /// Number of arcs of the solved network.
    pub num_arcs: usize,
    /// Canonical SHA-256 of the network.
    pub network_hash: String,
    /// Maximum flow value.
    pub max_flow: Capacity,
    /// Per-arc flows in input order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flows: Option<Vec<ArcFlow>>,
    /// Minimum cut.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cut: Option<MinCut>,
}

impl RunReport {
    /// Collects the parts of `solution` selected by `config`.
    pub fn new(
        header: Option<String>,
        config: RunConfig,
        network: &FlowNetwork,
        solution: &Solution,
    ) -> Self {
        let (flows, cut) = if config.display_cut {
            (None, Some(solution.min_cut()))
        } else {
            (Some(solution.flow_decomposition()), None)
        };
        Self {
            header,
            config,
            num_nodes: network.num_nodes(),
            num_arcs: network.num_arcs(),
            network_hash: canonical_hash(network),
            max_flow: solution.max_flow_value(),
            flows,
            cut,
        }
    }

    /// Renders the report in the DIMACS-style text layout.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(header) = &self.header {
            lines.push(format!("c {header}"));
        }
        if let Some(flows) = &self.flows {
            lines.extend(
                flows
                    .iter()
                    .map(|arc| format!("a {} {} {}", arc.from, arc.to, arc.flow)),
            );
        }
        if let Some(cut) = &self.cut {
            lines.push("c Nodes in source set of min s-t cut:".to_string());
            lines.extend(cut.source_side.iter().map(|node| format!("n {node}")));
            lines.push("c Arcs crossing the min s-t cut:".to_string());
            lines.extend(
                cut.crossing_arcs
                    .iter()
                    .map(|arc| format!("a {} {} {}", arc.from, arc.to, arc.capacity)),
            );
        }
        lines
    }
}
