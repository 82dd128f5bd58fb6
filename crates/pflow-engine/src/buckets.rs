use std::collections::VecDeque;

use pflow_core::{BucketOrder, LabelOrder};

/// Strong-root buckets indexed by label, plus per-label node counts.
///
/// Every bucket is a deque of `(node, stamp)` entries. Activating a node
/// bumps its stamp, so deactivation is O(1): the stale entry is skipped when
/// [`next_root`](Self::next_root) reaches it. Only buckets below the current
/// window are ever drained; the window is the termination signal of a phase.
/// `highest` only tracks labels inside the window, so roots parked above it
/// do not slow down the scan.
#[derive(Debug, Clone)]
pub struct BucketScheduler {
    buckets: Vec<VecDeque<(usize, u32)>>,
    label_count: Vec<usize>,
    scheduled_at: Vec<Option<usize>>,
    stamp: Vec<u32>,
    label_order: LabelOrder,
    bucket_order: BucketOrder,
    window: usize,
    lowest: usize,
    highest: usize,
    active: usize,
}

impl BucketScheduler {
    /// Creates an empty scheduler for `num_nodes` nodes with labels up to `max_label`.
    pub fn new(
        num_nodes: usize,
        max_label: usize,
        label_order: LabelOrder,
        bucket_order: BucketOrder,
    ) -> Self {
        Self {
            buckets: vec![VecDeque::new(); max_label + 1],
            label_count: vec![0; max_label + 1],
            scheduled_at: vec![None; num_nodes],
            stamp: vec![0; num_nodes],
            label_order,
            bucket_order,
            window: max_label + 1,
            lowest: max_label + 1,
            highest: 0,
            active: 0,
        }
    }

    /// Restricts [`next_root`](Self::next_root) to buckets with label `< window`.
    pub fn set_window(&mut self, window: usize) {
        self.ensure_label(window.saturating_sub(1));
        if window > self.window {
            self.highest = window - 1;
        } else {
            self.highest = self.highest.min(window.saturating_sub(1));
        }
        self.window = window;
    }

    /// Upper bound (exclusive) on the labels currently drained.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Counts a node as holding `label` without scheduling it.
    pub fn register(&mut self, label: usize) {
        self.ensure_label(label);
        self.label_count[label] += 1;
    }

    /// Number of nodes currently holding `label`.
    pub fn label_count(&self, label: usize) -> usize {
        self.label_count.get(label).copied().unwrap_or(0)
    }

    /// Schedules `node` as a strong root at `label`.
    pub fn activate(&mut self, node: usize, label: usize) {
        if let Some(current) = self.scheduled_at[node] {
            if current == label {
                return;
            }
            self.deactivate(node);
        }
        self.ensure_label(label);
        self.stamp[node] = self.stamp[node].wrapping_add(1);
        self.scheduled_at[node] = Some(label);
        self.buckets[label].push_back((node, self.stamp[node]));
        self.lowest = self.lowest.min(label);
        if label < self.window {
            self.highest = self.highest.max(label);
        }
        self.active += 1;
    }

    /// Removes `node` from scheduling; a no-op for idle nodes.
    pub fn deactivate(&mut self, node: usize) {
        if self.scheduled_at[node].take().is_some() {
            self.stamp[node] = self.stamp[node].wrapping_add(1);
            self.active -= 1;
        }
    }

    /// Moves `node`'s label from `old` to `new`, carrying its bucket entry along
    /// when it is scheduled.
    pub fn relabel_to(&mut self, node: usize, old: usize, new: usize) {
        self.ensure_label(new);
        debug_assert!(self.label_count[old] > 0, "label {old} has no nodes");
        self.label_count[old] -= 1;
        self.label_count[new] += 1;
        if self.scheduled_at[node].is_some() {
            self.activate(node, new);
        }
    }

    /// Whether `node` is currently scheduled.
    pub fn is_active(&self, node: usize) -> bool {
        self.scheduled_at[node].is_some()
    }

    /// Number of scheduled strong roots, including any above the window.
    pub fn len(&self) -> usize {
        self.active
    }

    /// Whether no strong root is scheduled at all.
    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// Pops the next strong root to process, or `None` once every bucket
    /// below the window is empty. The returned node is no longer scheduled.
    pub fn next_root(&mut self) -> Option<usize> {
        match self.label_order {
            LabelOrder::Lowest => self.pop_lowest(),
            LabelOrder::Highest => self.pop_highest(),
        }
    }

    fn pop_lowest(&mut self) -> Option<usize> {
        let mut label = self.lowest;
        while label < self.window {
            if let Some(node) = self.pop_valid(label) {
                self.lowest = label;
                return Some(node);
            }
            label += 1;
        }
        self.lowest = self.lowest.max(self.window);
        None
    }

    fn pop_highest(&mut self) -> Option<usize> {
        if self.window == 0 {
            return None;
        }
        let top = self.highest.min(self.window - 1);
        for label in (0..=top).rev() {
            if let Some(node) = self.pop_valid(label) {
                self.highest = label;
                return Some(node);
            }
        }
        self.highest = 0;
        None
    }

    fn pop_valid(&mut self, label: usize) -> Option<usize> {
        loop {
            let bucket = &mut self.buckets[label];
            let (node, stamp) = match self.bucket_order {
                BucketOrder::Fifo => bucket.pop_front()?,
                BucketOrder::Lifo => bucket.pop_back()?,
            };
            if self.scheduled_at[node] == Some(label) && self.stamp[node] == stamp {
                self.scheduled_at[node] = None;
                self.active -= 1;
                return Some(node);
            }
        }
    }

    fn ensure_label(&mut self, label: usize) {
        if label >= self.buckets.len() {
            self.buckets.resize_with(label + 1, VecDeque::new);
            self.label_count.resize(label + 1, 0);
        }
    }
}
