use nalgebra::Vector2;
use rand::Rng;

/// Axis-aligned bounding box stored as a min/max corner pair.
///
/// Every method assumes `min <= max` on both axes; use [`Aabb::is_valid`] on boxes
/// coming from outside before trusting them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vector2<f32>,
    pub max: Vector2<f32>,
}

impl Aabb {
    pub fn new(min: Vector2<f32>, max: Vector2<f32>) -> Self {
        Self { min, max }
    }

    pub fn from_min_max(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min: Vector2::new(min_x, min_y),
            max: Vector2::new(max_x, max_y),
        }
    }

    pub fn from_center_half_extents(center: Vector2<f32>, half_extents: Vector2<f32>) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn from_point(point: Vector2<f32>) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// True when every coordinate is finite and `min <= max` on both axes.
    pub fn is_valid(&self) -> bool {
        self.min.x.is_finite()
            && self.min.y.is_finite()
            && self.max.x.is_finite()
            && self.max.y.is_finite()
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vector2<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vector2<f32> {
        (self.max - self.min) * 0.5
    }

    pub fn max_extent(&self) -> f32 {
        f32::max(self.width(), self.height())
    }

    /// Perimeter of the box, the 2D surface-area heuristic cost.
    pub fn perimeter(&self) -> f32 {
        2.0 * (self.width() + self.height())
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    // Touching boxes overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    // Check that `other` is fully contained in `self`
    pub fn contains(&self, other: &Aabb) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
    }

    pub fn contains_point(&self, point: Vector2<f32>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Grows the box by `margin` on every side.
    pub fn expanded(&self, margin: f32) -> Aabb {
        let margin = Vector2::new(margin, margin);
        Aabb {
            min: self.min - margin,
            max: self.max + margin,
        }
    }

    /// Stretches the box along `displacement`, leaving the trailing sides in place.
    pub fn swept(&self, displacement: Vector2<f32>) -> Aabb {
        let zero = Vector2::zeros();
        Aabb {
            min: self.min + displacement.inf(&zero),
            max: self.max + displacement.sup(&zero),
        }
    }

    pub fn translated(&self, offset: Vector2<f32>) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Slab test. Returns the distance along `ray` at which it enters the box, `0.0` when the
    /// origin is already inside. A non-positive or non-finite `max_distance` means unbounded.
    pub fn ray_entry(&self, ray: &Ray, max_distance: f32) -> Option<f32> {
        let mut t_min = 0.0f32;
        let mut t_max = if max_distance > 0.0 && max_distance.is_finite() {
            max_distance
        } else {
            f32::INFINITY
        };

        for axis in 0..2 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if direction == 0.0 {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let mut t0 = (lo - origin) * inv;
            let mut t1 = (hi - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }

    pub fn random_point_inside<R: Rng>(&self, margin: f32, rng: &mut R) -> Vector2<f32> {
        Vector2::new(
            safe_rand_f32(rng, self.min.x + margin, self.max.x - margin),
            safe_rand_f32(rng, self.min.y + margin, self.max.y - margin),
        )
    }
}

fn safe_rand_f32<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Half-line starting at `origin`. The direction is normalized on construction so ray
/// distances are world distances; a zero direction stays zero and hits nothing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vector2<f32>,
    pub direction: Vector2<f32>,
}

impl Ray {
    pub fn new(origin: Vector2<f32>, direction: Vector2<f32>) -> Self {
        let length = direction.norm();
        let direction = if length > 0.0 && length.is_finite() {
            direction / length
        } else {
            Vector2::zeros()
        };
        Self { origin, direction }
    }

    pub fn is_degenerate(&self) -> bool {
        self.direction == Vector2::zeros()
    }

    pub fn point_at(&self, distance: f32) -> Vector2<f32> {
        self.origin + self.direction * distance
    }
}
