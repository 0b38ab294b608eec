use super::*;
use fxhash::FxHasher;
use std::hash::{Hash, Hasher};

impl<B: ProxyId, F: ProxyId> LazyAabbTree<B, F> {
    /// Height of the root; a lone leaf has height 0 and an empty tree reports 0 as well.
    pub fn height(&self) -> u32 {
        self.root.map_or(0, |root| self.node(root).height)
    }

    /// Fingerprint of links, states and stored boxes. Equal fingerprints before and after an
    /// operation mean it did not restructure the tree.
    pub fn structure_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.node_count().hash(&mut hasher);
        self.pending_removals.hash(&mut hasher);

        let mut stack = NodeStack::new();
        stack.extend(self.root);
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            id.index().hash(&mut hasher);
            node.parent.map(NodeId::index).hash(&mut hasher);
            hash_aabb(&node.aabb, &mut hasher);
            match &node.kind {
                NodeKind::Proxy(proxy) => {
                    0u8.hash(&mut hasher);
                    proxy.key.hash(&mut hasher);
                    proxy.state.hash(&mut hasher);
                }
                NodeKind::Branch([a, b]) => {
                    1u8.hash(&mut hasher);
                    stack.push(*b);
                    stack.push(*a);
                }
                NodeKind::Free => 2u8.hash(&mut hasher),
            }
        }
        hasher.finish()
    }

    /// Panics if any structural invariant is broken: branch boxes are the exact union of their
    /// children, links are symmetric, every allocated node is reachable, and the index maps each
    /// key to its attached leaf.
    pub fn validate(&self) {
        let mut reachable = 0usize;
        let mut live = 0usize;
        let mut tombstones = 0usize;

        if let Some(root) = self.root {
            assert_eq!(self.node(root).parent, None, "root {:?} has a parent", root);
        }

        let mut stack = NodeStack::new();
        stack.extend(self.root);
        while let Some(id) = stack.pop() {
            reachable += 1;
            let node = self.node(id);
            match &node.kind {
                NodeKind::Free => panic!("free node {:?} reachable from root", id),
                NodeKind::Proxy(proxy) => {
                    assert_eq!(node.height, 0, "leaf {:?} has non-zero height", id);
                    match proxy.state {
                        ProxyState::Attached => {
                            live += 1;
                            assert_eq!(
                                self.index.get(&proxy.key),
                                Some(&id),
                                "index does not point at live leaf {:?}",
                                id
                            );
                            assert!(
                                node.aabb.contains(&proxy.geometric),
                                "stored box of {:?} does not cover its geometry",
                                proxy.key
                            );
                        }
                        ProxyState::PendingRemoval => {
                            tombstones += 1;
                            assert_ne!(
                                self.index.get(&proxy.key),
                                Some(&id),
                                "index points at tombstone {:?}",
                                id
                            );
                        }
                        ProxyState::Detached => panic!("detached leaf {:?} linked into tree", id),
                    }
                }
                NodeKind::Branch([a, b]) => {
                    let (node_a, node_b) = (self.node(*a), self.node(*b));
                    assert_eq!(node_a.parent, Some(id), "child {:?} lost its parent link", a);
                    assert_eq!(node_b.parent, Some(id), "child {:?} lost its parent link", b);
                    assert_eq!(
                        node.aabb,
                        node_a.aabb.union(&node_b.aabb),
                        "branch {:?} box is not the union of its children",
                        id
                    );
                    assert_eq!(node.height, 1 + node_a.height.max(node_b.height));
                    stack.push(*a);
                    stack.push(*b);
                }
            }
        }

        assert_eq!(reachable, self.node_count(), "allocated nodes unreachable from root");
        assert_eq!(live, self.index.len(), "index holds keys without a live leaf");
        assert_eq!(tombstones, self.pending_removals, "tombstone count drifted");
    }
}

fn hash_aabb<H: Hasher>(aabb: &Aabb, hasher: &mut H) {
    for value in [aabb.min.x, aabb.min.y, aabb.max.x, aabb.max.y] {
        value.to_bits().hash(hasher);
    }
}
