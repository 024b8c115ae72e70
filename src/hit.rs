//! Hit-testing: floor cells, back-wall cells, and placed items under a point.
//!
//! Everything here is a pure function of a scene-space point and an
//! [`IsoProjection`]. Wall geometry is recomputed on every call from the
//! projection's angle, so nothing can go stale when the camera rotates.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::catalog::{WallPlacement, WallSurface};
use crate::config::RoomConfig;
use crate::iso::{IsoProjection, WallEdge};

/// A floor cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub x: u32,
    pub y: u32,
}

/// A discrete slot on a back wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallCell {
    pub lane: u32,
    /// Height of the row centre above the floor line, in scene pixels.
    pub z: f64,
    pub surface: WallSurface,
}

/// What the pointer is currently over. Floor and wall are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Hover {
    #[default]
    None,
    Floor(GridCell),
    Wall(WallCell),
}

/// Wall band parameters in scene pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallBand {
    pub height_px: f64,
    pub rows: u32,
    pub floor_margin_px: f64,
}

impl WallBand {
    #[must_use]
    pub fn from_config(config: &RoomConfig) -> Self {
        Self {
            height_px: config.wall_height_px(),
            rows: config.wall_rows.max(1),
            floor_margin_px: config.wall_floor_margin_px,
        }
    }

    fn row_px(&self) -> f64 {
        self.height_px / f64::from(self.rows)
    }

    /// Row index for a height above the floor line, clamped into the band.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn row_of(&self, z: f64) -> u32 {
        let row = (z / self.row_px()).floor().max(0.0) as u32;
        row.min(self.rows - 1)
    }

    /// Height of the centre of `row`.
    #[must_use]
    pub fn row_center(&self, row: u32) -> f64 {
        (f64::from(row) + 0.5) * self.row_px()
    }
}

/// The floor cell under `scene`, if it lies inside the grid.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn floor_cell(proj: &IsoProjection, scene: Point) -> Option<GridCell> {
    let g = proj.from_iso(scene);
    let n = f64::from(proj.grid_size);
    if !(g.x >= 0.0 && g.y >= 0.0 && g.x < n && g.y < n) {
        return None;
    }
    Some(GridCell { x: g.x.floor() as u32, y: g.y.floor() as u32 })
}

/// The wall slot under `scene`, checking the left wall before the right.
#[must_use]
pub fn wall_cell(proj: &IsoProjection, scene: Point, band: &WallBand) -> Option<WallCell> {
    [WallSurface::Left, WallSurface::Right]
        .into_iter()
        .find_map(|surface| hit_wall_edge(proj.wall_edge(surface), proj.grid_size, scene, band))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn hit_wall_edge(edge: WallEdge, grid_size: u32, p: Point, band: &WallBand) -> Option<WallCell> {
    if grid_size == 0 {
        return None;
    }
    let dir = edge.end - edge.start;
    let len_sq = dir.dot(dir);
    if !(len_sq > f64::EPSILON) || dir.x.abs() < f64::EPSILON {
        return None;
    }

    // Drop the pointer vertically onto the edge line; walls stand upright.
    let s = (p.x - edge.start.x) / dir.x;
    let foot = edge.start + dir.scale(s);
    let t = (foot - edge.start).dot(dir) / len_sq;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }

    let height = foot.y - p.y;
    if !(height >= band.floor_margin_px && height <= band.height_px) {
        return None;
    }

    let n = f64::from(grid_size);
    let lane = ((t * n).floor() as u32).min(grid_size - 1);
    let row = band.row_of(height);
    Some(WallCell { lane, z: band.row_center(row), surface: edge.surface })
}

/// Resolve the hover target. Walls are only considered while dragging, and
/// only when the point is not over the floor.
#[must_use]
pub fn resolve_hover(proj: &IsoProjection, scene: Point, band: &WallBand, dragging: bool) -> Hover {
    if let Some(cell) = floor_cell(proj, scene) {
        return Hover::Floor(cell);
    }
    if dragging {
        if let Some(cell) = wall_cell(proj, scene, band) {
            return Hover::Wall(cell);
        }
    }
    Hover::None
}

/// The wall placement occupying the wall slot under `scene`, if any.
#[must_use]
pub fn wall_placement_at<'a>(
    proj: &IsoProjection,
    scene: Point,
    band: &WallBand,
    wall_placements: &'a [WallPlacement],
) -> Option<&'a WallPlacement> {
    let cell = wall_cell(proj, scene, band)?;
    let row = band.row_of(cell.z);
    wall_placements
        .iter()
        .rev()
        .find(|wp| wp.surface == cell.surface && wp.lane == cell.lane && band.row_of(wp.z) == row)
}
