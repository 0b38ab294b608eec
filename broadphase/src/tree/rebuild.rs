use super::*;
use std::time::Instant;

impl<B: ProxyId, F: ProxyId> LazyAabbTree<B, F> {
    /// Purges every tombstone and rebuilds a balanced tree over the live proxies.
    ///
    /// Live leaves keep their slots, so the identity index stays valid; every branch is
    /// discarded and rebuilt top-down by median splits along the widest centroid axis.
    pub fn rebuild(&mut self) {
        let start = Instant::now();
        let mut live: Vec<NodeId> = Vec::with_capacity(self.index.len());
        let mut purged = 0usize;

        for index in 0..self.nodes.len() {
            let id = NodeId::new(index);
            let (is_free, is_live) = {
                let node = self.node(id);
                (node.is_free(), node.as_proxy().map_or(false, |proxy| proxy.is_live()))
            };
            if is_free {
                continue;
            }
            if is_live {
                self.node_mut(id).parent = None;
                live.push(id);
                continue;
            }
            if self.node(id).as_proxy().is_some() {
                purged += 1;
            }
            self.free_node(id);
        }

        self.root = if live.is_empty() {
            None
        } else {
            Some(self.build_subtree(&mut live))
        };
        self.pending_removals = 0;
        self.trim_free_tail();

        tracing::debug!(
            live = live.len(),
            purged,
            height = self.height(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "rebuilt broadphase tree"
        );

        #[cfg(debug_assertions)]
        self.validate();
    }

    fn build_subtree(&mut self, leaves: &mut [NodeId]) -> NodeId {
        if leaves.len() == 1 {
            return leaves[0];
        }

        let mut centroid_bounds = Aabb::from_point(self.node(leaves[0]).aabb.center());
        for &leaf in leaves.iter().skip(1) {
            let centroid = Aabb::from_point(self.node(leaf).aabb.center());
            centroid_bounds = centroid_bounds.union(&centroid);
        }
        let axis = if centroid_bounds.width() >= centroid_bounds.height() {
            0
        } else {
            1
        };

        let mid = leaves.len() / 2;
        {
            let nodes = &self.nodes;
            leaves.select_nth_unstable_by(mid, |a, b| {
                let ca = nodes[a.index()].aabb.center()[axis];
                let cb = nodes[b.index()].aabb.center()[axis];
                ca.total_cmp(&cb)
            });
        }

        let (left, right) = leaves.split_at_mut(mid);
        let a = self.build_subtree(left);
        let b = self.build_subtree(right);

        let (node_a, node_b) = (self.node(a), self.node(b));
        let aabb = node_a.aabb.union(&node_b.aabb);
        let height = 1 + node_a.height.max(node_b.height);
        let branch = self.alloc_node(Node::branch([a, b], aabb, height));
        self.node_mut(a).parent = Some(branch);
        self.node_mut(b).parent = Some(branch);
        branch
    }

    // Drops free slots at the end of the arena so it shrinks after mass removals.
    fn trim_free_tail(&mut self) {
        while self.nodes.last().map_or(false, |node| node.is_free()) {
            self.nodes.pop();
        }
        let len = self.nodes.len();
        self.free_nodes.retain(|id| id.index() < len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u32) -> ProxyKey<u32, u32> {
        ProxyKey::new(n, 0)
    }

    #[test]
    fn rebuild_of_empty_tree_is_noop() {
        let mut tree = LazyAabbTree::<u32, u32>::new();
        tree.rebuild();
        assert_eq!(tree.root, None);
        assert_eq!(tree.node_count(), 0);
    }

    #[test]
    fn rebuild_keeps_index_pointing_at_live_leaves() {
        let mut tree = LazyAabbTree::<u32, u32>::new();
        for i in 0..16 {
            let x = i as f32 * 2.0;
            tree.insert_aabb(key(i), Aabb::from_min_max(x, 0.0, x + 1.0, 1.0)).unwrap();
        }
        for i in (0..16).step_by(2) {
            tree.remove_key(&key(i)).unwrap();
        }
        tree.rebuild();

        assert_eq!(tree.len(), 8);
        assert_eq!(tree.node_count(), 15);
        assert_eq!(tree.height(), 3);
        for (k, &leaf) in tree.index.iter() {
            assert_eq!(tree.node(leaf).as_proxy().map(|p| p.key), Some(*k));
        }
    }

    #[test]
    fn rebuild_trims_arena() {
        let mut tree = LazyAabbTree::<u32, u32>::new();
        for i in 0..32 {
            let x = i as f32;
            tree.insert_aabb(key(i), Aabb::from_min_max(x, 0.0, x + 0.5, 0.5)).unwrap();
        }
        for i in 0..32 {
            tree.remove_key(&key(i)).unwrap();
        }
        tree.rebuild();
        assert!(tree.nodes.is_empty());
        assert!(tree.free_nodes.is_empty());
    }
}
