pub mod aabb;
pub mod shapes;

pub use aabb::{Aabb, Ray};
pub use shapes::{Circle, Rectangle, Shape, ShapeEnum, Transform};
