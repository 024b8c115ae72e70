//! Floor placement validation: bounds and footprint collision.
//!
//! The same check runs for the live drag preview and again immediately before
//! a commit is emitted, so it takes the placement being moved as an explicit
//! `exclude_id` rather than reading it from engine state.

#[cfg(test)]
#[path = "placement_test.rs"]
mod placement_test;

use crate::catalog::{Catalog, Placement, PlacementId, Rotation, Size};

/// An axis-aligned footprint on the grid after rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub depth: u32,
}

impl Footprint {
    /// Footprint of an item of `size` at `(x, y)` turned by `rotation`.
    #[must_use]
    pub fn new(x: u32, y: u32, size: Size, rotation: Rotation) -> Self {
        let (width, depth) = size.rotated(rotation);
        Self { x, y, width, depth }
    }

    /// Footprint of a committed placement, or `None` if its item is not in the catalog.
    #[must_use]
    pub fn of_placement(placement: &Placement, catalog: &Catalog) -> Option<Self> {
        let item = catalog.get(&placement.furniture_id)?;
        Some(Self::new(placement.x, placement.y, item.size, placement.rotation))
    }

    fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.depth)
    }

    /// Whether the footprint lies entirely inside an `n×n` grid.
    #[must_use]
    pub fn in_bounds(&self, grid_size: u32) -> bool {
        self.right() <= u64::from(grid_size) && self.bottom() <= u64::from(grid_size)
    }

    /// Standard AABB overlap; touching edges do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        u64::from(self.x) < other.right()
            && self.right() > u64::from(other.x)
            && u64::from(self.y) < other.bottom()
            && self.bottom() > u64::from(other.y)
    }

    /// Whether grid cell `(cx, cy)` is covered.
    #[must_use]
    pub fn contains(&self, cx: u32, cy: u32) -> bool {
        cx >= self.x && u64::from(cx) < self.right() && cy >= self.y && u64::from(cy) < self.bottom()
    }
}

/// Everything a validity check reads, borrowed from one props snapshot.
#[derive(Debug, Clone, Copy)]
pub struct PlacementCheck<'a> {
    pub grid_size: u32,
    pub placements: &'a [Placement],
    pub catalog: &'a Catalog,
}

impl<'a> PlacementCheck<'a> {
    #[must_use]
    pub fn new(grid_size: u32, placements: &'a [Placement], catalog: &'a Catalog) -> Self {
        Self { grid_size, placements, catalog }
    }

    /// Whether an item of `size` may be placed at `(x, y)` with `rotation`.
    ///
    /// Placements whose item is missing from the catalog occupy nothing.
    #[must_use]
    pub fn is_valid(&self, x: u32, y: u32, size: Size, rotation: Rotation, exclude_id: Option<PlacementId>) -> bool {
        let candidate = Footprint::new(x, y, size, rotation);
        if !candidate.in_bounds(self.grid_size) {
            return false;
        }
        self.placements
            .iter()
            .filter(|p| Some(p.id) != exclude_id)
            .filter_map(|p| Footprint::of_placement(p, self.catalog))
            .all(|other| !candidate.overlaps(&other))
    }

    /// The topmost placement covering cell `(cx, cy)`, if any.
    #[must_use]
    pub fn placement_at(&self, cx: u32, cy: u32) -> Option<&'a Placement> {
        self.placements.iter().rev().find(|p| {
            Footprint::of_placement(p, self.catalog).is_some_and(|f| f.contains(cx, cy))
        })
    }
}
