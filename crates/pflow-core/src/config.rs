//! Run configuration selecting the scheduling policies and the output shape.

use serde::{Deserialize, Serialize};

/// Options controlling a single solver run.
///
/// The two scheduling flags never change the optimum, only the number of
/// pushes and relabels performed on the way there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunConfig {
    /// Process the lowest labelled strong root first (highest otherwise).
    #[serde(default)]
    pub lowest_label: bool,
    /// Process roots within a bucket in activation order (most recent first otherwise).
    #[serde(default)]
    pub fifo_buckets: bool,
    /// Report the minimum cut instead of per-arc flows.
    #[serde(default)]
    pub display_cut: bool,
}

impl RunConfig {
    /// Returns the root selection order implied by the configuration.
    pub fn label_order(&self) -> LabelOrder {
        if self.lowest_label {
            LabelOrder::Lowest
        } else {
            LabelOrder::Highest
        }
    }

    /// Returns the intra-bucket order implied by the configuration.
    pub fn bucket_order(&self) -> BucketOrder {
        if self.fifo_buckets {
            BucketOrder::Fifo
        } else {
            BucketOrder::Lifo
        }
    }

    /// Returns all four scheduling combinations with the given output mode.
    pub fn policy_grid(display_cut: bool) -> [RunConfig; 4] {
        let mut grid = [RunConfig::default(); 4];
        for (idx, config) in grid.iter_mut().enumerate() {
            config.lowest_label = idx & 1 == 1;
            config.fifo_buckets = idx & 2 == 2;
            config.display_cut = display_cut;
        }
        grid
    }
}

/// Which bucket the scheduler drains first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelOrder {
    /// Lowest non-empty bucket first.
    Lowest,
    /// Highest non-empty bucket first.
    Highest,
}

/// Order in which roots leave a single bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BucketOrder {
    /// First activated, first processed.
    Fifo,
    /// Most recently activated, first processed.
    Lifo,
}
