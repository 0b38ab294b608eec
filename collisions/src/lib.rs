//! Broadphase bindings for `parry2d` shapes.

use broadphase::{
    Aabb, BroadphaseError, BroadphaseResult, Collidable, Fixture, LazyAabbTree, ProxyKey,
    Transform,
};
use nalgebra::Isometry2;
use parry2d::shape::SharedShape;

pub type BodyId = u32;
pub type FixtureId = u16;
pub type BodyTree = LazyAabbTree<BodyId, FixtureId>;
pub type BodyKey = ProxyKey<BodyId, FixtureId>;

#[derive(Clone)]
pub struct ShapeFixture {
    pub id: FixtureId,
    pub shape: SharedShape,
}

impl ShapeFixture {
    pub fn new(id: FixtureId, shape: SharedShape) -> Self {
        Self { id, shape }
    }
}

impl Fixture for ShapeFixture {
    type Id = FixtureId;

    fn id(&self) -> FixtureId {
        self.id
    }

    fn create_aabb(&self, transform: &Transform) -> Aabb {
        let aabb = self.shape.compute_aabb(transform);
        Aabb::new(aabb.mins.coords, aabb.maxs.coords)
    }
}

/// A rigid body with any number of fixtures, each tracked as its own proxy.
#[derive(Clone)]
pub struct Body {
    pub id: BodyId,
    pub position: Isometry2<f32>,
    pub fixtures: Vec<ShapeFixture>,
}

impl Body {
    pub fn new(id: BodyId, position: Isometry2<f32>) -> Self {
        Self {
            id,
            position,
            fixtures: Vec::new(),
        }
    }

    pub fn with_fixture(mut self, fixture: ShapeFixture) -> Self {
        self.fixtures.push(fixture);
        self
    }

    /// Inserts every fixture. A fixture that fails does not stop the others; the first
    /// error is returned.
    pub fn insert_into(&self, tree: &mut BodyTree) -> BroadphaseResult<()> {
        let mut first_error = None;
        for fixture in &self.fixtures {
            if let Err(err) = tree.insert(self, fixture) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Pushes the current position to the tree. Returns how many fixtures were re-inserted.
    ///
    /// Fails with `NotFound` before touching the tree if any fixture is untracked. Otherwise
    /// every fixture is updated and the first error, if any, is returned.
    pub fn update_in(&self, tree: &mut BodyTree) -> BroadphaseResult<usize> {
        self.ensure_tracked(tree)?;
        let mut escaped = 0;
        let mut first_error = None;
        for fixture in &self.fixtures {
            match tree.update(self, fixture) {
                Ok(true) => escaped += 1,
                Ok(false) => {}
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        first_error.map_or(Ok(escaped), Err)
    }

    /// Removes every fixture, or none of them if any is untracked.
    pub fn remove_from(&self, tree: &mut BodyTree) -> BroadphaseResult<()> {
        self.ensure_tracked(tree)?;
        for fixture in &self.fixtures {
            tree.remove(self, fixture)?;
        }
        Ok(())
    }

    fn ensure_tracked(&self, tree: &BodyTree) -> BroadphaseResult<()> {
        if self.fixtures.iter().all(|fixture| tree.contains(self, fixture)) {
            Ok(())
        } else {
            Err(BroadphaseError::NotFound)
        }
    }
}

impl Collidable for Body {
    type Id = BodyId;

    fn id(&self) -> BodyId {
        self.id
    }

    fn transform(&self) -> Transform {
        self.position
    }
}

/// Broadphase pairs between different bodies, each ordered by key and sorted.
///
/// Fixtures of the same body never collide with each other.
pub fn candidate_pairs(tree: &BodyTree) -> Vec<(BodyKey, BodyKey)> {
    let mut pairs: Vec<_> = tree
        .pairs()
        .filter(|(a, b)| a.collidable != b.collidable)
        .map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
        .collect();
    pairs.sort_unstable();
    pairs
}
