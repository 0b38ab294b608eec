use super::types::{compute_aabb, key_of};
use super::*;

impl<B: ProxyId, F: ProxyId> LazyAabbTree<B, F> {
    /// Starts tracking `fixture` of `collidable`.
    ///
    /// Inserting a pair that is already tracked replaces its proxy.
    pub fn insert<C, X>(&mut self, collidable: &C, fixture: &X) -> BroadphaseResult<()>
    where
        C: Collidable<Id = B>,
        X: Fixture<Id = F>,
    {
        let aabb = compute_aabb(collidable, fixture)?;
        self.insert_aabb(key_of(collidable, fixture), aabb)
    }

    pub fn insert_aabb(&mut self, key: ProxyKey<B, F>, aabb: Aabb) -> BroadphaseResult<()> {
        validate_aabb(&aabb)?;
        if let Some(previous) = self.index.remove(&key) {
            self.retire(previous);
        }
        let fat = self.fatten(&aabb, Vector2::zeros());
        let leaf = self.insert_proxy(key, aabb, fat);
        self.index.insert(key, leaf);
        self.rebuild_if_needed();
        Ok(())
    }

    /// Refreshes the proxy from the collidable's current pose.
    ///
    /// Returns `Ok(true)` when the proxy was re-inserted, either because the box escaped its
    /// fattened bounds or because those bounds had grown oversized. `Ok(false)` means the tree
    /// was left untouched.
    pub fn update<C, X>(&mut self, collidable: &C, fixture: &X) -> BroadphaseResult<bool>
    where
        C: Collidable<Id = B>,
        X: Fixture<Id = F>,
    {
        let key = key_of(collidable, fixture);
        if !self.index.contains_key(&key) {
            return Err(BroadphaseError::NotFound);
        }
        let aabb = compute_aabb(collidable, fixture)?;
        self.update_aabb(key, aabb)
    }

    pub fn update_aabb(&mut self, key: ProxyKey<B, F>, aabb: Aabb) -> BroadphaseResult<bool> {
        let leaf = *self.index.get(&key).ok_or(BroadphaseError::NotFound)?;
        validate_aabb(&aabb)?;

        let node = self.node_mut(leaf);
        let fat = node.aabb;
        let proxy = match node.as_proxy_mut() {
            Some(proxy) => proxy,
            None => {
                debug_assert!(false, "index points at a non-proxy node");
                return Err(BroadphaseError::NotFound);
            }
        };
        let displacement = aabb.center() - proxy.geometric.center();
        proxy.geometric = aabb;
        if fat.contains(&aabb) {
            if !self.is_oversized(&fat, &aabb, displacement) {
                return Ok(false);
            }
            tracing::trace!(?key, ?displacement, "shrinking oversized proxy box");
        } else {
            tracing::trace!(?key, ?displacement, "proxy escaped its fattened box");
        }

        self.retire(leaf);
        let fat = self.fatten(&aabb, displacement);
        let leaf = self.insert_proxy(key, aabb, fat);
        self.index.insert(key, leaf);
        self.rebuild_if_needed();
        Ok(true)
    }

    /// Stops tracking `fixture` of `collidable`. The leaf stays in the tree as a tombstone until
    /// the next rebuild.
    pub fn remove<C, X>(&mut self, collidable: &C, fixture: &X) -> BroadphaseResult<()>
    where
        C: Collidable<Id = B>,
        X: Fixture<Id = F>,
    {
        self.remove_key(&key_of(collidable, fixture))
    }

    pub fn remove_key(&mut self, key: &ProxyKey<B, F>) -> BroadphaseResult<()> {
        let leaf = self.index.remove(key).ok_or(BroadphaseError::NotFound)?;
        self.retire(leaf);
        self.rebuild_if_needed();
        Ok(())
    }

    /// Flags a leaf for removal without touching the tree structure.
    fn retire(&mut self, leaf: NodeId) {
        let marked = self
            .node_mut(leaf)
            .as_proxy_mut()
            .map_or(false, |proxy| proxy.mark_removed());
        if marked {
            self.pending_removals += 1;
        }
    }

    fn margin(&self, aabb: &Aabb) -> f32 {
        self.config.fat_margin + self.config.fat_size_ratio * aabb.max_extent()
    }

    pub(crate) fn fatten(&self, aabb: &Aabb, displacement: Vector2<f32>) -> Aabb {
        let config = &self.config;
        let margin = self.margin(aabb);
        let fat = if margin > 0.0 { aabb.expanded(margin) } else { *aabb };
        if config.displacement_multiplier > 0.0 {
            fat.swept(displacement * config.displacement_multiplier)
        } else {
            fat
        }
    }

    /// True when `stored` reaches well past what a fresh fattening of `aabb` would give, e.g.
    /// after a long step is followed by rest. The limit is swept both ways so steady motion
    /// keeps its predicted box.
    pub(crate) fn is_oversized(
        &self,
        stored: &Aabb,
        aabb: &Aabb,
        displacement: Vector2<f32>,
    ) -> bool {
        let slack = self.config.oversize_factor * self.margin(aabb);
        let limit = self
            .fatten(aabb, displacement)
            .expanded(slack)
            .swept(-displacement * self.config.displacement_multiplier);
        !limit.contains(stored)
    }

    pub(crate) fn needs_rebuild(&self) -> bool {
        if self.pending_removals == 0 || self.pending_removals < self.config.rebuild_min_removals {
            return false;
        }
        let threshold = self.config.rebuild_ratio * self.index.len() as f32;
        self.pending_removals as f32 > threshold
    }

    fn rebuild_if_needed(&mut self) {
        if self.config.auto_rebuild && self.needs_rebuild() {
            tracing::trace!(
                pending_removals = self.pending_removals,
                live = self.index.len(),
                "removal debt crossed threshold"
            );
            self.rebuild();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u32) -> ProxyKey<u32, u32> {
        ProxyKey::new(n, 0)
    }

    #[test]
    fn fatten_applies_margin_and_travel() {
        let tree = LazyAabbTree::<u32, u32>::new_with_config(Config {
            fat_margin: 0.5,
            fat_size_ratio: 0.25,
            displacement_multiplier: 2.0,
            ..Config::default()
        })
        .unwrap();
        let aabb = Aabb::from_min_max(0.0, 0.0, 4.0, 2.0);
        // margin = 0.5 + 0.25 * 4
        let fat = tree.fatten(&aabb, Vector2::new(1.0, -0.5));
        assert_eq!(fat, Aabb::from_min_max(-1.5, -2.5, 7.5, 3.5));
    }

    #[test]
    fn tight_config_stores_exact_boxes() {
        let mut tree = LazyAabbTree::<u32, u32>::new_with_config(Config::tight()).unwrap();
        let aabb = Aabb::from_min_max(1.0, 2.0, 3.0, 4.0);
        tree.insert_aabb(key(1), aabb).unwrap();
        assert_eq!(tree.aabb_of(&key(1)), Some(aabb));
    }

    #[test]
    fn escaping_update_leaves_tombstone() {
        let mut tree = LazyAabbTree::<u32, u32>::new();
        tree.insert_aabb(key(1), Aabb::from_min_max(0.0, 0.0, 1.0, 1.0)).unwrap();
        tree.insert_aabb(key(2), Aabb::from_min_max(5.0, 5.0, 6.0, 6.0)).unwrap();
        let before = tree.node_count();

        let moved = tree
            .update_aabb(key(1), Aabb::from_min_max(10.0, 0.0, 11.0, 1.0))
            .unwrap();
        assert!(moved);
        assert_eq!(tree.pending_removals(), 1);
        // One fresh leaf plus the branch joining it to the tree.
        assert_eq!(tree.node_count(), before + 2);
        tree.validate();
    }

    #[test]
    fn long_step_then_rest_shrinks_box() {
        let mut tree = LazyAabbTree::<u32, u32>::new();
        tree.insert_aabb(key(1), Aabb::from_min_max(0.0, 0.0, 1.0, 1.0)).unwrap();
        let parked = Aabb::from_min_max(1000.0, 0.0, 1001.0, 1.0);

        assert_eq!(tree.update_aabb(key(1), parked), Ok(true));
        let swept = tree.aabb_of(&key(1)).unwrap();
        assert!(swept.max.x > 2000.0);

        assert_eq!(tree.update_aabb(key(1), parked), Ok(true));
        assert_eq!(tree.aabb_of(&key(1)), Some(parked.expanded(0.1)));
        assert_eq!(tree.update_aabb(key(1), parked), Ok(false));
        tree.validate();
    }

    #[test]
    fn steady_motion_is_not_oversized() {
        let tree = LazyAabbTree::<u32, u32>::new();
        let step = Vector2::new(1.0, 0.0);
        let previous = Aabb::from_min_max(0.0, 0.0, 1.0, 1.0);
        let stored = tree.fatten(&previous, step);
        let current = previous.translated(step);
        assert!(stored.contains(&current));
        assert!(!tree.is_oversized(&stored, &current, step));
    }

    #[test]
    fn rebuild_threshold_respects_floor() {
        let mut tree = LazyAabbTree::<u32, u32>::new_with_config(Config {
            rebuild_min_removals: 4,
            rebuild_ratio: 0.0,
            auto_rebuild: false,
            ..Config::default()
        })
        .unwrap();
        for i in 0..8 {
            let x = i as f32 * 3.0;
            tree.insert_aabb(key(i), Aabb::from_min_max(x, 0.0, x + 1.0, 1.0)).unwrap();
        }
        for i in 0..3 {
            tree.remove_key(&key(i)).unwrap();
        }
        assert!(!tree.needs_rebuild());
        tree.remove_key(&key(3)).unwrap();
        assert!(tree.needs_rebuild());
    }
}
