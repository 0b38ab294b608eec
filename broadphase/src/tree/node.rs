use common::aabb::Aabb;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
    /// Panics past `u32::MAX` slots; the arena never grows that far.
    #[inline(always)]
    pub(crate) fn new(index: usize) -> Self {
        NodeId(u32::try_from(index).expect("node arena exceeds u32::MAX slots"))
    }

    #[inline(always)]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identity of a proxy: one fixture of one collidable.
///
/// Two proxies are the same proxy when their keys are equal, whatever their boxes are.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProxyKey<B, F> {
    pub collidable: B,
    pub fixture: F,
}

impl<B, F> ProxyKey<B, F> {
    pub fn new(collidable: B, fixture: F) -> Self {
        Self {
            collidable,
            fixture,
        }
    }
}

/// Lifecycle of a proxy.
///
/// `Detached -> Attached` when linked into the tree, `Attached -> PendingRemoval` when removed or
/// superseded by a re-insertion, `PendingRemoval -> Detached` when a rebuild purges it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProxyState {
    Detached,
    Attached,
    PendingRemoval,
}

#[derive(Clone, Debug)]
pub(crate) struct Proxy<B, F> {
    pub(crate) key: ProxyKey<B, F>,
    pub(crate) state: ProxyState,
    /// Last unfattened box reported for this key.
    pub(crate) geometric: Aabb,
}

impl<B, F> Proxy<B, F> {
    pub(crate) fn new(key: ProxyKey<B, F>, geometric: Aabb) -> Self {
        Self {
            key,
            state: ProxyState::Detached,
            geometric,
        }
    }

    #[inline(always)]
    pub(crate) fn is_live(&self) -> bool {
        self.state == ProxyState::Attached
    }

    /// Returns true only for the call that performed the transition.
    pub(crate) fn mark_removed(&mut self) -> bool {
        match self.state {
            ProxyState::Attached => {
                self.state = ProxyState::PendingRemoval;
                true
            }
            ProxyState::PendingRemoval | ProxyState::Detached => false,
        }
    }
}

impl<B: PartialEq, F: PartialEq> PartialEq for Proxy<B, F> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

#[derive(Clone, Debug)]
pub(crate) enum NodeKind<B, F> {
    Proxy(Proxy<B, F>),
    Branch([NodeId; 2]),
    Free,
}

#[derive(Clone, Debug)]
pub(crate) struct Node<B, F> {
    /// Fattened box for proxies, union of the children for branches.
    pub(crate) aabb: Aabb,
    pub(crate) parent: Option<NodeId>,
    pub(crate) height: u32,
    pub(crate) kind: NodeKind<B, F>,
}

impl<B, F> Node<B, F> {
    pub(crate) fn proxy(key: ProxyKey<B, F>, geometric: Aabb, fat: Aabb) -> Self {
        Self {
            aabb: fat,
            parent: None,
            height: 0,
            kind: NodeKind::Proxy(Proxy::new(key, geometric)),
        }
    }

    pub(crate) fn branch(children: [NodeId; 2], aabb: Aabb, height: u32) -> Self {
        Self {
            aabb,
            parent: None,
            height,
            kind: NodeKind::Branch(children),
        }
    }

    #[inline(always)]
    pub(crate) fn children(&self) -> Option<[NodeId; 2]> {
        match self.kind {
            NodeKind::Branch(children) => Some(children),
            _ => None,
        }
    }

    #[inline(always)]
    pub(crate) fn as_proxy(&self) -> Option<&Proxy<B, F>> {
        match &self.kind {
            NodeKind::Proxy(proxy) => Some(proxy),
            _ => None,
        }
    }

    #[inline(always)]
    pub(crate) fn as_proxy_mut(&mut self) -> Option<&mut Proxy<B, F>> {
        match &mut self.kind {
            NodeKind::Proxy(proxy) => Some(proxy),
            _ => None,
        }
    }

    pub(crate) fn is_free(&self) -> bool {
        matches!(self.kind, NodeKind::Free)
    }

    /// Links or unlinks a proxy. Unlinking clears the parent link so nothing can follow it
    /// back into structure that a rebuild has discarded.
    pub(crate) fn set_on_tree(&mut self, on_tree: bool) {
        if !on_tree {
            self.parent = None;
        }
        if let NodeKind::Proxy(proxy) = &mut self.kind {
            proxy.state = if on_tree {
                ProxyState::Attached
            } else {
                ProxyState::Detached
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Aabb {
        Aabb::from_min_max(0.0, 0.0, 1.0, 1.0)
    }

    #[test]
    fn mark_removed_is_idempotent() {
        let mut proxy = Proxy::new(ProxyKey::new(1u32, 0u32), unit());
        assert!(!proxy.mark_removed(), "detached proxies cannot be marked");
        proxy.state = ProxyState::Attached;
        assert!(proxy.mark_removed());
        assert!(!proxy.mark_removed());
        assert_eq!(proxy.state, ProxyState::PendingRemoval);
        assert!(!proxy.is_live());
    }

    #[test]
    fn proxies_compare_by_key_only() {
        let a = Proxy::new(ProxyKey::new(1u32, 2u32), unit());
        let b = Proxy::new(ProxyKey::new(1u32, 2u32), unit().expanded(5.0));
        let c = Proxy::new(ProxyKey::new(1u32, 3u32), unit());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn node_id_round_trips_index() {
        assert_eq!(NodeId::new(u32::MAX as usize).index(), u32::MAX as usize);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    #[should_panic(expected = "node arena exceeds")]
    fn node_id_rejects_oversized_index() {
        NodeId::new(u32::MAX as usize + 1);
    }

    #[test]
    fn set_on_tree_false_clears_links() {
        let mut node = Node::proxy(ProxyKey::new(0u32, 0u32), unit(), unit());
        node.set_on_tree(true);
        node.parent = Some(NodeId::new(3));
        assert_eq!(node.as_proxy().map(|p| p.state), Some(ProxyState::Attached));

        node.set_on_tree(false);
        assert_eq!(node.parent, None);
        assert_eq!(node.as_proxy().map(|p| p.state), Some(ProxyState::Detached));
    }
}
