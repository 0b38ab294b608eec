use super::ProxyKey;
use crate::error::{BroadphaseError, BroadphaseResult};
use common::aabb::Aabb;
use common::shapes::Transform;
use std::fmt::Debug;
use std::hash::Hash;

/// Handle type usable as half of a [`ProxyKey`].
pub trait ProxyId: Copy + Eq + Hash + Debug {}

impl<T: Copy + Eq + Hash + Debug> ProxyId for T {}

/// A body tracked by the broadphase. Only its identity and current pose are read.
pub trait Collidable {
    type Id: ProxyId;

    fn id(&self) -> Self::Id;
    fn transform(&self) -> Transform;
}

/// One shape attached to a [`Collidable`].
pub trait Fixture {
    type Id: ProxyId;

    fn id(&self) -> Self::Id;
    fn create_aabb(&self, transform: &Transform) -> Aabb;
}

#[inline(always)]
pub(crate) fn key_of<C: Collidable, X: Fixture>(
    collidable: &C,
    fixture: &X,
) -> ProxyKey<C::Id, X::Id> {
    ProxyKey::new(collidable.id(), fixture.id())
}

/// Geometric (unfattened) box of `fixture` at the collidable's current pose.
pub(crate) fn compute_aabb<C: Collidable, X: Fixture>(
    collidable: &C,
    fixture: &X,
) -> BroadphaseResult<Aabb> {
    let aabb = fixture.create_aabb(&collidable.transform());
    if !aabb.is_valid() {
        tracing::warn!(
            collidable = ?collidable.id(),
            fixture = ?fixture.id(),
            ?aabb,
            "fixture produced an invalid aabb"
        );
        return Err(BroadphaseError::invalid_aabb(&aabb));
    }
    Ok(aabb)
}
