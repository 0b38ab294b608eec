use super::*;

/// Live proxies whose stored box overlaps a query box, in depth-first order.
///
/// Created by [`LazyAabbTree::query_overlap`] and [`LazyAabbTree::query_point`].
pub struct QueryOverlap<'a, B: ProxyId, F: ProxyId> {
    tree: &'a LazyAabbTree<B, F>,
    aabb: Aabb,
    stack: NodeStack,
}

impl<'a, B: ProxyId, F: ProxyId> QueryOverlap<'a, B, F> {
    pub(crate) fn new(tree: &'a LazyAabbTree<B, F>, aabb: Aabb) -> Self {
        let mut stack = NodeStack::new();
        stack.extend(tree.root);
        Self { tree, aabb, stack }
    }
}

impl<'a, B: ProxyId, F: ProxyId> Iterator for QueryOverlap<'a, B, F> {
    type Item = ProxyKey<B, F>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let node = self.tree.node(id);
            if !node.aabb.overlaps(&self.aabb) {
                continue;
            }
            match &node.kind {
                NodeKind::Proxy(proxy) => {
                    if proxy.is_live() {
                        return Some(proxy.key);
                    }
                }
                NodeKind::Branch([a, b]) => {
                    self.stack.push(*b);
                    self.stack.push(*a);
                }
                NodeKind::Free => debug_assert!(false, "free node reachable from root"),
            }
        }
        None
    }
}

impl<B: ProxyId, F: ProxyId> LazyAabbTree<B, F> {
    pub fn query_overlap(&self, aabb: &Aabb) -> QueryOverlap<'_, B, F> {
        QueryOverlap::new(self, *aabb)
    }

    pub fn query_overlap_with<G>(&self, aabb: &Aabb, mut f: G)
    where
        G: FnMut(ProxyKey<B, F>),
    {
        for key in self.query_overlap(aabb) {
            f(key);
        }
    }

    /// Live proxies whose stored box contains `point`.
    pub fn query_point(&self, point: Vector2<f32>) -> QueryOverlap<'_, B, F> {
        QueryOverlap::new(self, Aabb::from_point(point))
    }
}
