//! Isometric projection between the logical grid and scene space.
//!
//! The grid is an `N×N` plane centred on the scene origin. A projection is
//! rebuilt from the current grid size, tile extents and camera angle whenever
//! they change; it holds no other state, so the back corner and wall edges
//! are always derived from the angle it was built with.

#[cfg(test)]
#[path = "iso_test.rs"]
mod iso_test;

use crate::camera::Point;
use crate::catalog::WallSurface;
use crate::consts::WALL_SHEAR_DEG;

/// Pure grid ⇄ scene transform for one grid size, tile size and camera angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoProjection {
    /// Grid edge length in cells.
    pub grid_size: u32,
    /// Half the tile diamond width in CSS pixels.
    pub half_w: f64,
    /// Half the tile diamond height in CSS pixels.
    pub half_h: f64,
    /// Camera rotation in radians.
    pub angle: f64,
}

/// A located point on one of the back walls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallAnchor {
    /// The point on the floor line under the anchor.
    pub base: Point,
    /// The anchor itself, raised by `z` above the floor line.
    pub point: Point,
    /// Shear applied to decorations hung on this wall, in degrees.
    pub shear_deg: f64,
}

/// One back-wall floor edge, running from the back corner to its neighbour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallEdge {
    pub surface: WallSurface,
    pub start: Point,
    pub end: Point,
}

impl IsoProjection {
    #[must_use]
    pub fn new(grid_size: u32, tile_width: f64, tile_height: f64, angle: f64) -> Self {
        Self { grid_size, half_w: tile_width / 2.0, half_h: tile_height / 2.0, angle }
    }

    fn n(&self) -> f64 {
        f64::from(self.grid_size)
    }

    /// Project a grid coordinate into scene space.
    #[must_use]
    pub fn to_iso(&self, x: f64, y: f64) -> Point {
        let half = self.n() / 2.0;
        let cx = x - half;
        let cy = y - half;
        let (sin, cos) = self.angle.sin_cos();
        let rx = cx * cos - cy * sin;
        let ry = cx * sin + cy * cos;
        Point { x: (rx - ry) * self.half_w, y: (rx + ry) * self.half_h }
    }

    /// Inverse of [`Self::to_iso`]: scene space back to continuous grid coordinates.
    #[must_use]
    pub fn from_iso(&self, scene: Point) -> Point {
        let a = scene.x / self.half_w;
        let b = scene.y / self.half_h;
        let rx = (a + b) / 2.0;
        let ry = (b - a) / 2.0;
        let (sin, cos) = self.angle.sin_cos();
        let cx = rx * cos + ry * sin;
        let cy = -rx * sin + ry * cos;
        let half = self.n() / 2.0;
        Point { x: cx + half, y: cy + half }
    }

    /// The four grid corners in scene space: `(0,0)`, `(N,0)`, `(N,N)`, `(0,N)`.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        let n = self.n();
        [self.to_iso(0.0, 0.0), self.to_iso(n, 0.0), self.to_iso(n, n), self.to_iso(0.0, n)]
    }

    /// Index into [`Self::corners`] of the corner with the smallest scene Y.
    #[must_use]
    pub fn back_corner(&self) -> usize {
        let corners = self.corners();
        let mut best = 0;
        for (i, c) in corners.iter().enumerate().skip(1) {
            if c.y < corners[best].y {
                best = i;
            }
        }
        best
    }

    /// The floor edge of one back wall, oriented away from the back corner.
    #[must_use]
    pub fn wall_edge(&self, surface: WallSurface) -> WallEdge {
        let corners = self.corners();
        let back = self.back_corner();
        let neighbour = match surface {
            WallSurface::Left => (back + 3) % 4,
            WallSurface::Right => (back + 1) % 4,
        };
        WallEdge { surface, start: corners[back], end: corners[neighbour] }
    }

    /// Locate lane `lane` at height `z` on a back wall.
    #[must_use]
    pub fn to_iso_wall(&self, lane: u32, z: f64, surface: WallSurface) -> WallAnchor {
        let edge = self.wall_edge(surface);
        let t = (f64::from(lane) + 0.5) / self.n();
        let base = edge.start.lerp(edge.end, t);
        let shear_deg = match surface {
            WallSurface::Left => -WALL_SHEAR_DEG,
            WallSurface::Right => WALL_SHEAR_DEG,
        };
        WallAnchor { base, point: Point { x: base.x, y: base.y - z }, shear_deg }
    }

    /// Scene-space centre of the axis-aligned rectangle at `(x, y)` of size `w×d`.
    #[must_use]
    pub fn footprint_center(&self, x: f64, y: f64, w: f64, d: f64) -> Point {
        self.to_iso(x + w / 2.0, y + d / 2.0)
    }
}
