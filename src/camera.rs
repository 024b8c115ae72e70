//! Camera state for pan and continuous rotation around the room.
//!
//! Screen space is the canvas in CSS pixels. Scene space is what the
//! isometric projection produces: the grid centre sits at the origin, and
//! the camera pan shifts it relative to the viewport centre. Rotation is not
//! a screen transform; it is fed into [`crate::iso::IsoProjection`] so that
//! the grid itself rotates and tiles stay diamond-shaped.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::ops::{Add, Sub};

/// A point in either screen or scene space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Dot product, treating both points as vectors.
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x.mul_add(other.x, self.y * other.y)
    }

    /// Scale both components by `k`.
    #[must_use]
    pub fn scale(self, k: f64) -> Self {
        Self { x: self.x * k, y: self.y * k }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Linear interpolation from `self` toward `other` at parameter `t`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        self + (other - self).scale(t)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

/// Camera state: pan offset in CSS pixels and rotation angle in radians.
///
/// `angle` is unbounded; it wraps visually every 2π because it only ever
/// reaches the projection through `sin`/`cos`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub angle: f64,
}

impl Camera {
    /// Convert a screen-space point (CSS pixels) to scene coordinates.
    #[must_use]
    pub fn screen_to_scene(&self, screen: Point, viewport_w: f64, viewport_h: f64) -> Point {
        Point {
            x: screen.x - viewport_w * 0.5 - self.pan_x,
            y: screen.y - viewport_h * 0.5 - self.pan_y,
        }
    }

    /// Convert a scene-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn scene_to_screen(&self, scene: Point, viewport_w: f64, viewport_h: f64) -> Point {
        Point {
            x: scene.x + viewport_w * 0.5 + self.pan_x,
            y: scene.y + viewport_h * 0.5 + self.pan_y,
        }
    }

    /// Shift the pan offset by a raw pointer delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Rotate the camera by a horizontal pointer delta scaled by `sensitivity`.
    pub fn rotate_by(&mut self, dx: f64, sensitivity: f64) {
        self.angle += dx * sensitivity;
    }
}
