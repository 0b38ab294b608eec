use super::*;

impl<B: ProxyId, F: ProxyId> LazyAabbTree<B, F> {
    /// Allocates a proxy leaf for `key` and links it into the tree.
    pub(crate) fn insert_proxy(
        &mut self,
        key: ProxyKey<B, F>,
        geometric: Aabb,
        fat: Aabb,
    ) -> NodeId {
        let leaf = self.alloc_node(Node::proxy(key, geometric, fat));
        self.insert_leaf(leaf);
        leaf
    }

    pub(crate) fn insert_leaf(&mut self, leaf: NodeId) {
        let root = match self.root {
            Some(root) => root,
            None => {
                self.root = Some(leaf);
                self.node_mut(leaf).set_on_tree(true);
                return;
            }
        };

        let leaf_aabb = self.node(leaf).aabb;
        let sibling = self.find_best_sibling(root, &leaf_aabb);

        let (old_parent, sibling_aabb, sibling_height) = {
            let node = self.node(sibling);
            (node.parent, node.aabb, node.height)
        };
        let mut branch = Node::branch(
            [sibling, leaf],
            sibling_aabb.union(&leaf_aabb),
            sibling_height + 1,
        );
        branch.parent = old_parent;
        let branch = self.alloc_node(branch);

        self.replace_child(old_parent, sibling, branch);
        self.node_mut(sibling).parent = Some(branch);
        let leaf_node = self.node_mut(leaf);
        leaf_node.set_on_tree(true);
        leaf_node.parent = Some(branch);

        self.refit_upwards(old_parent);
    }

    /// Surface-area-heuristic descent: at each branch either pair the new box with the branch
    /// itself or move into the child whose enlargement is cheaper.
    fn find_best_sibling(&self, root: NodeId, leaf_aabb: &Aabb) -> NodeId {
        let mut index = root;
        while let Some([child_a, child_b]) = self.node(index).children() {
            let node = self.node(index);
            let perimeter = node.aabb.perimeter();
            let combined_perimeter = node.aabb.union(leaf_aabb).perimeter();

            // Cost of creating a new parent for this node and the new leaf
            let cost = 2.0 * combined_perimeter;
            // Minimum cost of pushing the leaf further down the tree
            let inheritance_cost = 2.0 * (combined_perimeter - perimeter);

            let cost_a = self.descent_cost(child_a, leaf_aabb) + inheritance_cost;
            let cost_b = self.descent_cost(child_b, leaf_aabb) + inheritance_cost;

            if cost < cost_a && cost < cost_b {
                break;
            }
            index = if cost_a <= cost_b { child_a } else { child_b };
        }
        index
    }

    fn descent_cost(&self, child: NodeId, leaf_aabb: &Aabb) -> f32 {
        let node = self.node(child);
        let merged = node.aabb.union(leaf_aabb).perimeter();
        if node.children().is_some() {
            merged - node.aabb.perimeter()
        } else {
            merged
        }
    }
}
