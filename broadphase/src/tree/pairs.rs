use super::*;

#[derive(Clone, Copy, Debug)]
enum PairTask {
    /// Pairs with both leaves under this node.
    Within(NodeId),
    /// Pairs with one leaf under each node.
    Across(NodeId, NodeId),
}

/// Every unordered pair of live proxies whose stored boxes overlap, each exactly once.
///
/// Every pair of leaves has a single lowest common ancestor; the pair is only reachable from
/// the `Across` task spawned for that ancestor's two children.
pub struct Pairs<'a, B: ProxyId, F: ProxyId> {
    tree: &'a LazyAabbTree<B, F>,
    stack: SmallVec<[PairTask; 64]>,
}

impl<'a, B: ProxyId, F: ProxyId> Pairs<'a, B, F> {
    pub(crate) fn new(tree: &'a LazyAabbTree<B, F>) -> Self {
        let mut stack = SmallVec::new();
        if let Some(root) = tree.root {
            stack.push(PairTask::Within(root));
        }
        Self { tree, stack }
    }
}

impl<'a, B: ProxyId, F: ProxyId> Pairs<'a, B, F> {
    /// Runs one task, queueing its subtasks. Returns a pair when the task is two live leaves.
    fn step(&mut self, task: PairTask) -> Option<(ProxyKey<B, F>, ProxyKey<B, F>)> {
        let tree = self.tree;
        match task {
            PairTask::Within(id) => {
                if let Some([a, b]) = tree.node(id).children() {
                    self.stack.push(PairTask::Within(b));
                    self.stack.push(PairTask::Within(a));
                    self.stack.push(PairTask::Across(a, b));
                }
            }
            PairTask::Across(a, b) => {
                let (node_a, node_b) = (tree.node(a), tree.node(b));
                if !node_a.aabb.overlaps(&node_b.aabb) {
                    return None;
                }
                match (&node_a.kind, &node_b.kind) {
                    (NodeKind::Proxy(pa), NodeKind::Proxy(pb)) => {
                        if pa.is_live() && pb.is_live() {
                            return Some((pa.key, pb.key));
                        }
                    }
                    (NodeKind::Proxy(pa), NodeKind::Branch([b0, b1])) => {
                        if pa.is_live() {
                            self.stack.push(PairTask::Across(a, *b1));
                            self.stack.push(PairTask::Across(a, *b0));
                        }
                    }
                    (NodeKind::Branch([a0, a1]), NodeKind::Proxy(pb)) => {
                        if pb.is_live() {
                            self.stack.push(PairTask::Across(*a1, b));
                            self.stack.push(PairTask::Across(*a0, b));
                        }
                    }
                    (NodeKind::Branch([a0, a1]), NodeKind::Branch([b0, b1])) => {
                        // Split the larger box; keeps the descent close to balanced.
                        if node_a.aabb.perimeter() >= node_b.aabb.perimeter() {
                            self.stack.push(PairTask::Across(*a1, b));
                            self.stack.push(PairTask::Across(*a0, b));
                        } else {
                            self.stack.push(PairTask::Across(a, *b1));
                            self.stack.push(PairTask::Across(a, *b0));
                        }
                    }
                    _ => debug_assert!(false, "free node reachable from root"),
                }
            }
        }
        None
    }
}

impl<'a, B: ProxyId, F: ProxyId> Iterator for Pairs<'a, B, F> {
    type Item = (ProxyKey<B, F>, ProxyKey<B, F>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(task) = self.stack.pop() {
            if let Some(pair) = self.step(task) {
                return Some(pair);
            }
        }
        None
    }
}

impl<B: ProxyId, F: ProxyId> LazyAabbTree<B, F> {
    /// Candidate pairs for the narrow phase.
    pub fn pairs(&self) -> Pairs<'_, B, F> {
        Pairs::new(self)
    }

    pub fn for_each_pair<G>(&self, mut f: G)
    where
        G: FnMut(ProxyKey<B, F>, ProxyKey<B, F>),
    {
        for (a, b) in self.pairs() {
            f(a, b);
        }
    }
}
