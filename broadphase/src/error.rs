use common::aabb::Aabb;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BroadphaseError {
    /// The collidable/fixture pair is not tracked (never inserted, or already removed).
    NotFound,
    InvalidAabb {
        min_x: f32,
        min_y: f32,
        max_x: f32,
        max_y: f32,
    },
    InvalidConfig { field: &'static str, value: f32 },
}

pub type BroadphaseResult<T> = Result<T, BroadphaseError>;

impl BroadphaseError {
    pub(crate) fn invalid_aabb(aabb: &Aabb) -> Self {
        BroadphaseError::InvalidAabb {
            min_x: aabb.min.x,
            min_y: aabb.min.y,
            max_x: aabb.max.x,
            max_y: aabb.max.y,
        }
    }
}

impl fmt::Display for BroadphaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BroadphaseError::NotFound => {
                write!(f, "collidable/fixture pair is not tracked by the broadphase")
            }
            BroadphaseError::InvalidAabb {
                min_x,
                min_y,
                max_x,
                max_y,
            } => {
                write!(
                    f,
                    "aabb must be finite with min <= max \
                     (min_x: {}, min_y: {}, max_x: {}, max_y: {})",
                    min_x, min_y, max_x, max_y
                )
            }
            BroadphaseError::InvalidConfig { field, value } => {
                write!(
                    f,
                    "config field `{}` must be finite and non-negative (value: {})",
                    field, value
                )
            }
        }
    }
}

impl std::error::Error for BroadphaseError {}

pub(crate) fn validate_aabb(aabb: &Aabb) -> BroadphaseResult<()> {
    if aabb.is_valid() {
        Ok(())
    } else {
        Err(BroadphaseError::invalid_aabb(aabb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_offending_extent() {
        let err = BroadphaseError::invalid_aabb(&Aabb::from_min_max(2.0, 0.0, 1.0, 1.0));
        let text = err.to_string();
        assert!(text.contains("min_x: 2"));
        assert!(text.contains("max_x: 1"));
    }

    #[test]
    fn validate_rejects_nan() {
        assert!(validate_aabb(&Aabb::from_min_max(0.0, 0.0, 1.0, 1.0)).is_ok());
        assert!(matches!(
            validate_aabb(&Aabb::from_min_max(f32::NAN, 0.0, 1.0, 1.0)),
            Err(BroadphaseError::InvalidAabb { .. })
        ));
    }
}
