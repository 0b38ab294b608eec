use crate::aabb::Aabb;
use nalgebra::{Isometry2, Vector2};
use std::fmt::Debug;

/// Rigid pose of a body: rotation followed by translation.
pub type Transform = Isometry2<f32>;

pub trait Shape: Debug {
    /// Bounding box of the shape placed at `transform`.
    fn create_aabb(&self, transform: &Transform) -> Aabb;
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Circle {
    pub radius: f32,
}

impl Circle {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Default for Circle {
    fn default() -> Self {
        Self { radius: 0.0 }
    }
}

impl Shape for Circle {
    fn create_aabb(&self, transform: &Transform) -> Aabb {
        let center = transform.translation.vector;
        Aabb::from_center_half_extents(center, Vector2::new(self.radius, self.radius))
    }
}

/// Rectangle centered on its local origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rectangle {
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn half_extents(&self) -> Vector2<f32> {
        Vector2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Rectangle {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }
}

impl Shape for Rectangle {
    fn create_aabb(&self, transform: &Transform) -> Aabb {
        let half = self.half_extents();
        let cos = transform.rotation.cos_angle().abs();
        let sin = transform.rotation.sin_angle().abs();
        // Extents of the rotated box projected back onto the world axes.
        let rotated = Vector2::new(cos * half.x + sin * half.y, sin * half.x + cos * half.y);
        Aabb::from_center_half_extents(transform.translation.vector, rotated)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ShapeEnum {
    Circle(Circle),
    Rectangle(Rectangle),
}

impl Shape for ShapeEnum {
    fn create_aabb(&self, transform: &Transform) -> Aabb {
        match self {
            ShapeEnum::Circle(circle) => circle.create_aabb(transform),
            ShapeEnum::Rectangle(rectangle) => rectangle.create_aabb(transform),
        }
    }
}
