use super::types::key_of;
use super::*;

impl<B: ProxyId, F: ProxyId> LazyAabbTree<B, F> {
    pub fn new() -> Self {
        Self::with_valid_config(Config::default())
    }

    pub fn new_with_config(config: Config) -> BroadphaseResult<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: Config) -> Self {
        Self {
            nodes: Vec::with_capacity(config.pool_size),
            free_nodes: Vec::new(),
            root: None,
            index: FxHashMap::default(),
            pending_removals: 0,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of tracked (live) proxies.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Tombstones waiting for the next rebuild.
    pub fn pending_removals(&self) -> usize {
        self.pending_removals
    }

    pub fn contains<C, X>(&self, collidable: &C, fixture: &X) -> bool
    where
        C: Collidable<Id = B>,
        X: Fixture<Id = F>,
    {
        self.contains_key(&key_of(collidable, fixture))
    }

    pub fn contains_key(&self, key: &ProxyKey<B, F>) -> bool {
        self.index.contains_key(key)
    }

    /// Stored (fattened) box of a tracked pair.
    pub fn aabb<C, X>(&self, collidable: &C, fixture: &X) -> Option<Aabb>
    where
        C: Collidable<Id = B>,
        X: Fixture<Id = F>,
    {
        self.aabb_of(&key_of(collidable, fixture))
    }

    pub fn aabb_of(&self, key: &ProxyKey<B, F>) -> Option<Aabb> {
        self.index.get(key).map(|&leaf| self.node(leaf).aabb)
    }

    /// Live keys in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = ProxyKey<B, F>> + '_ {
        self.index.keys().copied()
    }

    pub fn clear(&mut self) {
        tracing::debug!(
            live = self.index.len(),
            nodes = self.node_count(),
            "clearing broadphase tree"
        );
        self.nodes.clear();
        self.free_nodes.clear();
        self.index.clear();
        self.root = None;
        self.pending_removals = 0;
    }

    /// Moves every stored box by `offset`, e.g. when the world origin is re-centered.
    /// Structure is untouched.
    pub fn shift(&mut self, offset: Vector2<f32>) {
        for node in self.nodes.iter_mut().filter(|node| !node.is_free()) {
            node.aabb = node.aabb.translated(offset);
            if let Some(proxy) = node.as_proxy_mut() {
                proxy.geometric = proxy.geometric.translated(offset);
            }
        }
    }
}

impl<B: ProxyId, F: ProxyId> Default for LazyAabbTree<B, F> {
    fn default() -> Self {
        Self::new()
    }
}
