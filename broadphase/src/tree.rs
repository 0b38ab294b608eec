//! Lazy AABB tree broadphase.
//!
//! Leaves ("proxies") hold a fattened box per collidable/fixture pair. Motion that stays inside
//! the fattened box costs nothing; motion that escapes it turns the old leaf into a tombstone and
//! links a fresh one. A box left far larger than needed, e.g. after a long step followed by rest,
//! is shrunk the same way. Tombstones are skipped by every query and purged in bulk by
//! [`LazyAabbTree::rebuild`], which also rebalances the tree.

mod api;
mod config;
mod diagnostics;
mod insert;
mod maintenance;
mod node;
mod pairs;
mod query;
mod raycast;
mod rebuild;
mod storage;
mod types;

pub use config::Config;
pub use node::{ProxyKey, ProxyState};
pub use pairs::Pairs;
pub use query::QueryOverlap;
pub use raycast::{RayHit, Raycast};
pub use types::{Collidable, Fixture, ProxyId};

use crate::error::{validate_aabb, BroadphaseError, BroadphaseResult};
use common::aabb::{Aabb, Ray};
use fxhash::FxHashMap;
use nalgebra::Vector2;
use node::{Node, NodeId, NodeKind};
use smallvec::SmallVec;

pub(crate) type NodeStack = SmallVec<[NodeId; 64]>;

pub struct LazyAabbTree<B: ProxyId, F: ProxyId> {
    nodes: Vec<Node<B, F>>,
    free_nodes: Vec<NodeId>,
    root: Option<NodeId>,
    index: FxHashMap<ProxyKey<B, F>, NodeId>,
    pending_removals: usize,
    config: Config,
}
