use super::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit<B, F> {
    pub key: ProxyKey<B, F>,
    /// Distance along the ray at which it enters the proxy's stored box.
    pub distance: f32,
}

/// Live proxies whose stored box is crossed by a ray, in traversal order.
pub struct Raycast<'a, B: ProxyId, F: ProxyId> {
    tree: &'a LazyAabbTree<B, F>,
    ray: Ray,
    max_distance: f32,
    stack: NodeStack,
}

impl<'a, B: ProxyId, F: ProxyId> Raycast<'a, B, F> {
    pub(crate) fn new(tree: &'a LazyAabbTree<B, F>, ray: Ray, max_distance: f32) -> Self {
        let mut stack = NodeStack::new();
        if !ray.is_degenerate() {
            stack.extend(tree.root);
        }
        Self {
            tree,
            ray,
            max_distance,
            stack,
        }
    }
}

impl<'a, B: ProxyId, F: ProxyId> Iterator for Raycast<'a, B, F> {
    type Item = RayHit<B, F>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let node = self.tree.node(id);
            let distance = match node.aabb.ray_entry(&self.ray, self.max_distance) {
                Some(distance) => distance,
                None => continue,
            };
            match &node.kind {
                NodeKind::Proxy(proxy) => {
                    if proxy.is_live() {
                        return Some(RayHit {
                            key: proxy.key,
                            distance,
                        });
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
    /// Proxies crossed by `ray` within `max_distance` (non-positive means unbounded).
    pub fn raycast(&self, ray: &Ray, max_distance: f32) -> Raycast<'_, B, F> {
        Raycast::new(self, *ray, max_distance)
    }

    /// Same hits as [`LazyAabbTree::raycast`], nearest first.
    pub fn raycast_sorted(&self, ray: &Ray, max_distance: f32) -> Vec<RayHit<B, F>> {
        let mut hits: Vec<_> = self.raycast(ray, max_distance).collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
