use super::*;

impl<B: ProxyId, F: ProxyId> LazyAabbTree<B, F> {
    #[inline(always)]
    pub(crate) fn node(&self, id: NodeId) -> &Node<B, F> {
        &self.nodes[id.index()]
    }

    #[inline(always)]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<B, F> {
        &mut self.nodes[id.index()]
    }

    pub(crate) fn alloc_node(&mut self, node: Node<B, F>) -> NodeId {
        if let Some(id) = self.free_nodes.pop() {
            debug_assert!(self.node(id).is_free());
            self.nodes[id.index()] = node;
            return id;
        }
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub(crate) fn free_node(&mut self, id: NodeId) {
        let node = self.node_mut(id);
        node.set_on_tree(false);
        node.kind = NodeKind::Free;
        node.height = 0;
        self.free_nodes.push(id);
    }

    /// Points whatever referenced `old` (its parent, or the root slot) at `new`.
    pub(crate) fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: NodeId) {
        match parent {
            None => self.root = Some(new),
            Some(parent) => {
                if let NodeKind::Branch(children) = &mut self.node_mut(parent).kind {
                    if children[0] == old {
                        children[0] = new;
                    } else {
                        debug_assert_eq!(children[1], old);
                        children[1] = new;
                    }
                }
            }
        }
    }

    /// Recomputes box and height of `start` and every ancestor.
    pub(crate) fn refit_upwards(&mut self, start: Option<NodeId>) {
        let mut current = start;
        while let Some(id) = current {
            if let Some([a, b]) = self.node(id).children() {
                let (node_a, node_b) = (self.node(a), self.node(b));
                let aabb = node_a.aabb.union(&node_b.aabb);
                let height = 1 + node_a.height.max(node_b.height);
                let node = self.node_mut(id);
                node.aabb = aabb;
                node.height = height;
            }
            current = self.node(id).parent;
        }
    }

    /// Number of allocated (non-free) nodes, tombstones included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free_nodes.len()
    }
}
