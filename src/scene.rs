//! Scene building: turns room state into a depth-sorted draw list.
//!
//! The list has two buckets. The floor bucket (room planes and tiles) is
//! always drawn before the object bucket (furniture, wall decorations, the
//! ghost and the avatar), and each bucket is sorted by its own depth key.
//! Floor geometry shares screen-Y ranges with raised objects, so sorting one
//! list by Y alone would let distant tiles paint over near furniture.
//!
//! Building never fails. Entries whose catalog item is missing are dropped
//! with a warning and the rest of the scene is kept.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::borrow::Cow;
use std::collections::HashSet;

use tracing::warn;

use crate::camera::Point;
use crate::catalog::{
    Catalog, FurnitureItem, MemoryPoint, MemoryTarget, Placement, PlacementId, RoomTextures, Rotation, WallPlacement,
    WallSurface,
};
use crate::config::RoomConfig;
use crate::consts::WALL_DEPTH_BASE;
use crate::hit::{GridCell, Hover};
use crate::input::{DragState, Mode, UiState};
use crate::iso::{IsoProjection, WallAnchor};
use crate::placement::PlacementCheck;
use crate::primitive::{VisualState, cell_quad, wall_quad};

/// Which bucket an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Floor,
    Objects,
}

/// A floor item to draw: a committed placement or the drag ghost.
#[derive(Debug, Clone)]
pub struct FloorItem<'a> {
    /// `None` for the ghost.
    pub placement_id: Option<PlacementId>,
    /// The catalog item with any variant applied.
    pub item: Cow<'a, FurnitureItem>,
    pub x: u32,
    pub y: u32,
    pub rotation: Rotation,
    pub state: VisualState,
    /// Draw an annotation badge above the item.
    pub badge: bool,
}

/// A wall decoration to draw: a committed wall placement or the drag ghost.
#[derive(Debug, Clone)]
pub struct WallItem<'a> {
    pub placement_id: Option<PlacementId>,
    pub item: Cow<'a, FurnitureItem>,
    pub lane: u32,
    pub surface: WallSurface,
    /// Height of the anchor above the floor line.
    pub z: f64,
    pub anchor: WallAnchor,
    pub state: VisualState,
    pub badge: bool,
}

/// What one entry draws.
#[derive(Debug, Clone)]
pub enum DrawKind<'a> {
    /// The floor diamond and both back walls.
    Room {
        floor: [Point; 4],
        left_wall: [Point; 4],
        right_wall: [Point; 4],
        textures: &'a RoomTextures,
    },
    /// One floor cell with its overlays.
    Tile {
        cell: GridCell,
        quad: [Point; 4],
        hovered: bool,
        marked: bool,
    },
    Furniture(FloorItem<'a>),
    WallItem(WallItem<'a>),
    /// The avatar token standing at `feet`.
    Avatar { feet: Point, image: Option<&'a str> },
}

/// A draw-list entry.
#[derive(Debug, Clone)]
pub struct DrawItem<'a> {
    pub layer: Layer,
    pub depth: f64,
    pub kind: DrawKind<'a>,
}

/// Everything one frame reads, borrowed from the engine.
#[derive(Debug, Clone, Copy)]
pub struct SceneInput<'a> {
    pub proj: IsoProjection,
    pub config: &'a RoomConfig,
    pub catalog: &'a Catalog,
    pub placements: &'a [Placement],
    pub wall_placements: &'a [WallPlacement],
    pub textures: &'a RoomTextures,
    pub ui: &'a UiState,
    pub drag: Option<&'a DragState>,
    pub memory_points: &'a [MemoryPoint],
    pub due: &'a HashSet<PlacementId>,
    pub avatar: Option<&'a str>,
}

/// A built frame: projection parameters plus the ordered draw list.
#[derive(Debug, Clone)]
pub struct Scene<'a> {
    pub proj: IsoProjection,
    /// Multiplier from default-tile pixels to scene pixels.
    pub pixel_scale: f64,
    pub wall_height_px: f64,
    /// Height of one wall row in scene pixels.
    pub wall_row_px: f64,
    pub items: Vec<DrawItem<'a>>,
}

impl<'a> Scene<'a> {
    /// Build and sort the draw list for one frame.
    #[must_use]
    pub fn build(input: &SceneInput<'a>) -> Self {
        let proj = input.proj;
        let wall_height_px = input.config.wall_height_px();
        let mut floor = Vec::new();
        let mut objects = Vec::new();

        let left = proj.wall_edge(WallSurface::Left);
        let right = proj.wall_edge(WallSurface::Right);
        floor.push(DrawItem {
            layer: Layer::Floor,
            depth: f64::NEG_INFINITY,
            kind: DrawKind::Room {
                floor: proj.corners(),
                left_wall: wall_quad(left.start, left.end, wall_height_px),
                right_wall: wall_quad(right.start, right.end, wall_height_px),
                textures: input.textures,
            },
        });

        let hover = input.drag.map_or(input.ui.hover, |d| d.hover);
        let n = proj.grid_size;
        for y in 0..n {
            for x in 0..n {
                let cell = GridCell { x, y };
                let depth = proj.to_iso(f64::from(x) + 0.5, f64::from(y) + 0.5).y;
                floor.push(DrawItem {
                    layer: Layer::Floor,
                    depth,
                    kind: DrawKind::Tile {
                        cell,
                        quad: cell_quad(&proj, x, y),
                        hovered: hover == Hover::Floor(cell),
                        marked: has_marker(input.memory_points, MemoryTarget::Tile { x, y }),
                    },
                });
            }
        }

        let moving_id = input.drag.and_then(|d| d.moving_placement_id);
        for p in input.placements {
            if Some(p.id) == moving_id {
                continue;
            }
            let Some(base) = input.catalog.get(&p.furniture_id) else {
                warn!(id = %p.id, furniture_id = %p.furniture_id, "scene: unknown furniture; skipping placement");
                continue;
            };
            let item = base.with_variant(p.variant_id.as_deref());
            let (w, d) = item.size.rotated(p.rotation);
            let depth = proj.footprint_center(f64::from(p.x), f64::from(p.y), f64::from(w), f64::from(d)).y;
            objects.push(DrawItem {
                layer: Layer::Objects,
                depth,
                kind: DrawKind::Furniture(FloorItem {
                    placement_id: Some(p.id),
                    item,
                    x: p.x,
                    y: p.y,
                    rotation: p.rotation,
                    state: placed_state(input, p.id),
                    badge: has_marker(input.memory_points, MemoryTarget::Furniture { id: p.id }),
                }),
            });
        }

        for wp in input.wall_placements {
            let Some(base) = input.catalog.get(&wp.furniture_id) else {
                warn!(id = %wp.id, furniture_id = %wp.furniture_id, "scene: unknown furniture; skipping wall placement");
                continue;
            };
            if wp.lane >= n {
                warn!(id = %wp.id, lane = wp.lane, grid_size = n, "scene: wall lane outside grid; skipping");
                continue;
            }
            let anchor = proj.to_iso_wall(wp.lane, wp.z, wp.surface);
            objects.push(DrawItem {
                layer: Layer::Objects,
                depth: wall_depth(&anchor, wp.z),
                kind: DrawKind::WallItem(WallItem {
                    placement_id: Some(wp.id),
                    item: base.with_variant(wp.variant_id.as_deref()),
                    lane: wp.lane,
                    surface: wp.surface,
                    z: wp.z,
                    anchor,
                    state: placed_state(input, wp.id),
                    badge: has_marker(input.memory_points, MemoryTarget::WallFurniture { id: wp.id }),
                }),
            });
        }

        if let Some(ghost) = input.drag.and_then(|drag| ghost_entry(input, drag)) {
            objects.push(ghost);
        }

        let mid = f64::from(n) / 2.0;
        let feet = proj.to_iso(mid, mid);
        objects.push(DrawItem { layer: Layer::Objects, depth: feet.y, kind: DrawKind::Avatar { feet, image: input.avatar } });

        floor.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        objects.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        floor.extend(objects);

        Self {
            proj,
            pixel_scale: input.config.pixel_scale(),
            wall_height_px,
            wall_row_px: input.config.wall_row_px(),
            items: floor,
        }
    }

    /// Number of entries in the draw list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The ghost entry, if a drag preview is showing.
    #[must_use]
    pub fn ghost(&self) -> Option<&DrawItem<'a>> {
        self.items.iter().find(|entry| match &entry.kind {
            DrawKind::Furniture(f) => matches!(f.state, VisualState::Ghost { .. }),
            DrawKind::WallItem(w) => matches!(w.state, VisualState::Ghost { .. }),
            _ => false,
        })
    }
}

/// Depth key for a wall-mounted item: behind every floor object, then by floor line and height.
fn wall_depth(anchor: &WallAnchor, z: f64) -> f64 {
    WALL_DEPTH_BASE + anchor.base.y + z
}

fn has_marker(points: &[MemoryPoint], target: MemoryTarget) -> bool {
    points.iter().any(|m| m.target == target)
}

fn placed_state(input: &SceneInput<'_>, id: PlacementId) -> VisualState {
    if input.ui.selected_id == Some(id) {
        VisualState::Selected
    } else if input.ui.mode == Mode::Study && input.due.contains(&id) {
        VisualState::Due
    } else {
        VisualState::Normal
    }
}

fn ghost_entry<'a>(input: &SceneInput<'a>, drag: &'a DragState) -> Option<DrawItem<'a>> {
    let proj = input.proj;
    match drag.hover {
        Hover::None => None,
        Hover::Floor(cell) => {
            let check = PlacementCheck::new(proj.grid_size, input.placements, input.catalog);
            let valid = check.is_valid(cell.x, cell.y, drag.item.size, drag.rotation, drag.moving_placement_id);
            let (w, d) = drag.item.size.rotated(drag.rotation);
            let depth = proj.footprint_center(f64::from(cell.x), f64::from(cell.y), f64::from(w), f64::from(d)).y;
            Some(DrawItem {
                layer: Layer::Objects,
                depth,
                kind: DrawKind::Furniture(FloorItem {
                    placement_id: None,
                    item: Cow::Borrowed(&drag.item),
                    x: cell.x,
                    y: cell.y,
                    rotation: drag.rotation,
                    state: VisualState::Ghost { valid },
                    badge: false,
                }),
            })
        }
        Hover::Wall(cell) => {
            let anchor = proj.to_iso_wall(cell.lane, cell.z, cell.surface);
            Some(DrawItem {
                layer: Layer::Objects,
                depth: wall_depth(&anchor, cell.z),
                kind: DrawKind::WallItem(WallItem {
                    placement_id: None,
                    item: Cow::Borrowed(&drag.item),
                    lane: cell.lane,
                    surface: cell.surface,
                    z: cell.z,
                    anchor,
                    state: VisualState::Ghost { valid: true },
                    badge: false,
                }),
            })
        }
    }
}
