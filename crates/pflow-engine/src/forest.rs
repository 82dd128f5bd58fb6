/// Parent/child links of the pseudoflow forest, stored by node index.
///
/// A node's link names its parent and the residual arc leading to it. Child
/// sets are vectors with a back-index per child so that a single child can be
/// cut out in O(1) and a whole set can be drained on relabel.
#[derive(Debug, Clone)]
pub(crate) struct Forest {
    link: Vec<Option<TreeLink>>,
    children: Vec<Vec<usize>>,
    slot: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TreeLink {
    pub(crate) parent: usize,
    pub(crate) arc: usize,
}

impl Forest {
    pub(crate) fn new(num_nodes: usize) -> Self {
        Self {
            link: vec![None; num_nodes],
            children: vec![Vec::new(); num_nodes],
            slot: vec![0; num_nodes],
        }
    }

    pub(crate) fn link(&self, node: usize) -> Option<TreeLink> {
        self.link[node]
    }

    pub(crate) fn is_root(&self, node: usize) -> bool {
        self.link[node].is_none()
    }

    pub(crate) fn children(&self, node: usize) -> &[usize] {
        &self.children[node]
    }

    /// Hangs the root `child` (and its subtree) beneath `parent` via `arc`.
    pub(crate) fn attach(&mut self, child: usize, parent: usize, arc: usize) {
        debug_assert!(self.is_root(child), "attach of non-root {child}");
        debug_assert_ne!(child, parent);
        self.slot[child] = self.children[parent].len();
        self.children[parent].push(child);
        self.link[child] = Some(TreeLink { parent, arc });
    }

    /// Cuts `child` from its parent; returns the former link.
    pub(crate) fn detach(&mut self, child: usize) -> Option<TreeLink> {
        let link = self.link[child].take()?;
        let siblings = &mut self.children[link.parent];
        let position = self.slot[child];
        siblings.swap_remove(position);
        if let Some(&moved) = siblings.get(position) {
            self.slot[moved] = position;
        }
        Some(link)
    }

    /// Detaches every child of `node`, appending them to `out`.
    pub(crate) fn detach_children(&mut self, node: usize, out: &mut Vec<usize>) {
        for child in self.children[node].drain(..) {
            self.link[child] = None;
            out.push(child);
        }
    }

    /// Walks parent links from `node` and returns the root of its tree.
    pub(crate) fn root_of(&self, mut node: usize) -> usize {
        let mut steps = 0usize;
        while let Some(link) = self.link[node] {
            node = link.parent;
            steps += 1;
            debug_assert!(steps <= self.link.len(), "cycle in parent links");
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detach_keeps_sibling_slots_consistent() {
        let mut forest = Forest::new(5);
        forest.attach(1, 0, 10);
        forest.attach(2, 0, 11);
        forest.attach(3, 0, 12);
        assert_eq!(forest.children(0), &[1, 2, 3]);

        let link = forest.detach(1).unwrap();
        assert_eq!(link, TreeLink { parent: 0, arc: 10 });
        assert_eq!(forest.children(0), &[3, 2]);

        forest.detach(3);
        assert_eq!(forest.children(0), &[2]);
        assert!(forest.is_root(3));
        assert_eq!(forest.detach(3), None);
    }

    #[test]
    fn detach_children_empties_child_set() {
        let mut forest = Forest::new(4);
        forest.attach(1, 0, 0);
        forest.attach(2, 1, 1);
        forest.attach(3, 1, 2);
        assert_eq!(forest.root_of(3), 0);

        let mut released = Vec::new();
        forest.detach_children(1, &mut released);
        assert_eq!(released, vec![2, 3]);
        assert!(forest.children(1).is_empty());
        assert!(forest.is_root(2));
        assert_eq!(forest.root_of(1), 0);
        assert_eq!(forest.root_of(3), 3);
    }
}
