pub mod error;
pub mod tree;

pub use common::aabb::{Aabb, Ray};
pub use common::shapes::Transform;
pub use error::{BroadphaseError, BroadphaseResult};
pub use tree::{
    Collidable, Config, Fixture, LazyAabbTree, Pairs, ProxyId, ProxyKey, ProxyState,
    QueryOverlap, RayHit, Raycast,
};
