use std::collections::HashSet;

use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::camera::{Camera, Point};
use crate::catalog::{
    Catalog, FurnitureItem, ItemId, MemoryPoint, MemoryTarget, Placement, PlacementId, RoomTextures, Rotation,
    VariantId, WallPlacement, WallSurface,
};
use crate::config::RoomConfig;
use crate::hit::{self, Hover, WallBand};
use crate::input::{Button, ClickTarget, DragState, InputState, Mode, UiState};
use crate::iso::IsoProjection;
use crate::placement::PlacementCheck;
use crate::render::{self, ImageRegistry};
use crate::scene::{Scene, SceneInput};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Place the drag item on the floor.
    CommitPlacement { furniture_id: ItemId, x: u32, y: u32, rotation: Rotation },
    /// Hang the drag item on a wall.
    CommitWallPlacement { furniture_id: ItemId, lane: u32, z: f64, surface: WallSurface },
    /// A placed item was clicked (normal mode) or picked (remove mode).
    FurnitureClick(PlacementId),
    /// A primary press landed on a placed floor item in normal mode.
    FurnitureMouseDown(Placement),
    TileClick { x: u32, y: u32 },
    MemoryClick(MemoryTarget),
    StudyClick(PlacementId),
    VariantChange { placement_id: PlacementId, variant_id: Option<VariantId> },
    RenderNeeded,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub config: RoomConfig,
    pub catalog: Catalog,
    pub placements: Vec<Placement>,
    pub wall_placements: Vec<WallPlacement>,
    pub textures: RoomTextures,
    pub memory_points: Vec<MemoryPoint>,
    /// Placements with an annotation due for review.
    pub due: HashSet<PlacementId>,
    pub avatar: Option<String>,
    /// 1-based house level; clamped when the grid size is looked up.
    pub level: i64,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    pub drag: Option<DragState>,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
    /// A secondary press arrived since the last context-menu event.
    secondary_pressed: bool,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(RoomConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: RoomConfig) -> Self {
        Self {
            config,
            catalog: Catalog::new(),
            placements: Vec::new(),
            wall_placements: Vec::new(),
            textures: RoomTextures::default(),
            memory_points: Vec::new(),
            due: HashSet::new(),
            avatar: None,
            level: 1,
            camera: Camera::default(),
            ui: UiState::default(),
            input: InputState::default(),
            drag: None,
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
            secondary_pressed: false,
        }
    }

    // --- Data inputs ---

    pub fn set_config(&mut self, config: RoomConfig) {
        self.config = config;
        self.clear_hover();
    }

    /// Switch house level. Hover cells from the old grid are dropped.
    pub fn set_level(&mut self, level: i64) {
        if level != self.level {
            debug!(level, grid_size = self.config.grid_size(level), "room: level changed");
        }
        self.level = level;
        self.clear_hover();
    }

    /// Replace the catalog.
    pub fn load_catalog(&mut self, items: Vec<FurnitureItem>) {
        self.catalog.load_snapshot(items);
    }

    /// Replace the floor placements. A selection that no longer exists is dropped.
    pub fn set_placements(&mut self, placements: Vec<Placement>) {
        self.placements = placements;
        self.drop_stale_selection();
    }

    /// Replace the wall placements. A selection that no longer exists is dropped.
    pub fn set_wall_placements(&mut self, wall_placements: Vec<WallPlacement>) {
        self.wall_placements = wall_placements;
        self.drop_stale_selection();
    }

    pub fn set_textures(&mut self, textures: RoomTextures) {
        self.textures = textures;
    }

    pub fn set_memory_points(&mut self, points: Vec<MemoryPoint>) {
        self.memory_points = points;
    }

    pub fn set_due(&mut self, due: impl IntoIterator<Item = PlacementId>) {
        self.due = due.into_iter().collect();
    }

    pub fn set_avatar(&mut self, image: Option<String>) {
        self.avatar = image;
    }

    /// Set the click mode. Leaving remove mode clears its selection.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode != self.ui.mode {
            debug!(?mode, "room: mode changed");
        }
        self.ui.mode = mode;
        if mode != Mode::Remove {
            self.ui.selected_id = None;
        }
    }

    /// Put an item in hand. `moving_placement_id` marks an existing placement being moved.
    ///
    /// Any gesture in progress is abandoned so the next release places the item.
    pub fn set_drag_item(&mut self, item: FurnitureItem, moving_placement_id: Option<PlacementId>) {
        debug!(item = %item.id, moving = ?moving_placement_id, "drag: item set");
        self.input = InputState::Idle;
        self.ui.hover = Hover::None;
        self.drag = Some(DragState::new(item, moving_placement_id));
    }

    /// Drop the item in hand without committing.
    pub fn clear_drag_item(&mut self) {
        if self.drag.take().is_some() {
            debug!("drag: item cleared");
        }
    }

    /// Update viewport dimensions and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = dpr;
    }

    // --- Variants ---

    /// Ask the host to switch a placement's colour variant; `None` restores the base item.
    ///
    /// Unknown placements and variants the item does not offer are refused.
    pub fn choose_variant(&mut self, placement_id: PlacementId, variant_id: Option<&str>) -> Vec<Action> {
        let furniture_id = self
            .placements
            .iter()
            .find(|p| p.id == placement_id)
            .map(|p| p.furniture_id)
            .or_else(|| self.wall_placements.iter().find(|wp| wp.id == placement_id).map(|wp| wp.furniture_id));
        let Some(furniture_id) = furniture_id else {
            warn!(%placement_id, "variant: unknown placement");
            return Vec::new();
        };
        if let Some(variant_id) = variant_id {
            let offered = self.catalog.get(&furniture_id).is_some_and(|item| item.variant(variant_id).is_some());
            if !offered {
                warn!(%placement_id, %furniture_id, variant_id, "variant: not offered by item");
                return Vec::new();
            }
        }
        vec![Action::VariantChange { placement_id, variant_id: variant_id.map(str::to_owned) }]
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen: Point, button: Button) -> Vec<Action> {
        match button {
            Button::Secondary => {
                self.secondary_pressed = true;
                self.rotate_gesture(screen)
            }
            Button::Primary => {
                self.secondary_pressed = false;
                // Placement happens on release.
                if self.drag.is_some() {
                    return Vec::new();
                }
                if self.ui.mode == Mode::Normal {
                    if let Some(placement) = self.placement_under(screen).cloned() {
                        self.input = InputState::PressingItem { id: placement.id, origin_screen: screen };
                        return vec![Action::FurnitureMouseDown(placement)];
                    }
                }
                self.input = InputState::Panning { last_screen: screen, origin_screen: screen, moved: false };
                Vec::new()
            }
            Button::Middle => Vec::new(),
        }
    }

    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        if let Some(delta) = self.input.pan_to(screen, self.config.click_slop_px) {
            self.camera.pan_by(delta.x, delta.y);
            return vec![Action::RenderNeeded];
        }
        if let Some(dx) = self.input.rotate_to(screen) {
            self.camera.rotate_by(dx, self.config.rotate_sensitivity);
            return vec![Action::RenderNeeded];
        }
        if let InputState::PressingItem { origin_screen, .. } = self.input {
            if screen.distance(origin_screen) > self.config.click_slop_px {
                self.input = InputState::Idle;
            }
        }
        self.update_hover(screen)
    }

    pub fn on_pointer_up(&mut self, screen: Point, button: Button) -> Vec<Action> {
        match self.input.finish() {
            InputState::Panning { moved: false, .. } => self.click(screen),
            InputState::Panning { .. } | InputState::RotatingCamera { .. } => Vec::new(),
            InputState::PressingItem { id, .. } => {
                let same = self.drag.is_none() && self.placement_under(screen).is_some_and(|p| p.id == id);
                if same { vec![Action::FurnitureClick(id)] } else { Vec::new() }
            }
            InputState::Idle if button == Button::Primary => self.try_commit(screen),
            InputState::Idle => Vec::new(),
        }
    }

    /// The pointer left the canvas: end any gesture without a click and drop hover.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        let ended = self.input.finish();
        let had_hover = self.hover() != Hover::None;
        self.clear_hover();
        if ended.is_camera_gesture() || had_hover { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// The native context menu fired. The host always suppresses the menu.
    ///
    /// After a secondary press the rotation already happened in
    /// [`Self::on_pointer_down`]. Otherwise (a touch long-press) the event
    /// itself rotates the item in hand or starts a camera rotation.
    pub fn on_context_menu(&mut self, screen: Point) -> Vec<Action> {
        if std::mem::take(&mut self.secondary_pressed) {
            return Vec::new();
        }
        self.rotate_gesture(screen)
    }

    // --- Queries ---

    /// Current grid edge length.
    #[must_use]
    pub fn grid_size(&self) -> u32 {
        self.config.grid_size(self.level)
    }

    /// Projection for the current grid, tile size and camera angle.
    #[must_use]
    pub fn projection(&self) -> IsoProjection {
        IsoProjection::new(self.grid_size(), self.config.tile_width, self.config.tile_height, self.camera.angle)
    }

    /// Build the draw list for the current state.
    #[must_use]
    pub fn scene(&self) -> Scene<'_> {
        Scene::build(&SceneInput {
            proj: self.projection(),
            config: &self.config,
            catalog: &self.catalog,
            placements: &self.placements,
            wall_placements: &self.wall_placements,
            textures: &self.textures,
            ui: &self.ui,
            drag: self.drag.as_ref(),
            memory_points: &self.memory_points,
            due: &self.due,
            avatar: self.avatar.as_deref(),
        })
    }

    /// The hover target: the drag item's while dragging, otherwise the plain tile hover.
    #[must_use]
    pub fn hover(&self) -> Hover {
        self.drag.as_ref().map_or(self.ui.hover, |d| d.hover)
    }

    #[must_use]
    pub fn selection(&self) -> Option<PlacementId> {
        self.ui.selected_id
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    // --- Internals ---

    /// Rotate the item in hand, or start rotating the camera when there is none.
    fn rotate_gesture(&mut self, screen: Point) -> Vec<Action> {
        if let Some(drag) = &mut self.drag {
            drag.rotate();
            debug!(rotation = drag.rotation.quarter_turns(), "drag: item rotated");
            return vec![Action::RenderNeeded];
        }
        self.input = InputState::RotatingCamera { last_screen: screen };
        Vec::new()
    }

    fn to_scene(&self, screen: Point) -> Point {
        self.camera.screen_to_scene(screen, self.viewport_width, self.viewport_height)
    }

    fn hover_at(&self, screen: Point) -> Hover {
        let band = WallBand::from_config(&self.config);
        hit::resolve_hover(&self.projection(), self.to_scene(screen), &band, self.drag.is_some())
    }

    fn update_hover(&mut self, screen: Point) -> Vec<Action> {
        let hover = self.hover_at(screen);
        let slot = match &mut self.drag {
            Some(drag) => &mut drag.hover,
            None => &mut self.ui.hover,
        };
        if *slot == hover {
            return Vec::new();
        }
        *slot = hover;
        vec![Action::RenderNeeded]
    }

    fn clear_hover(&mut self) {
        self.ui.hover = Hover::None;
        if let Some(drag) = &mut self.drag {
            drag.hover = Hover::None;
        }
    }

    fn drop_stale_selection(&mut self) {
        let Some(id) = self.ui.selected_id else {
            return;
        };
        let exists = self.placements.iter().any(|p| p.id == id) || self.wall_placements.iter().any(|wp| wp.id == id);
        if !exists {
            self.ui.selected_id = None;
        }
    }

    fn placement_under(&self, screen: Point) -> Option<&Placement> {
        let cell = hit::floor_cell(&self.projection(), self.to_scene(screen))?;
        PlacementCheck::new(self.grid_size(), &self.placements, &self.catalog).placement_at(cell.x, cell.y)
    }

    fn click_target(&self, screen: Point) -> ClickTarget {
        let proj = self.projection();
        let scene = self.to_scene(screen);
        if let Some(cell) = hit::floor_cell(&proj, scene) {
            let check = PlacementCheck::new(proj.grid_size, &self.placements, &self.catalog);
            return match check.placement_at(cell.x, cell.y) {
                Some(p) => ClickTarget::Placement(p.id),
                None => ClickTarget::Tile(cell),
            };
        }
        let band = WallBand::from_config(&self.config);
        match hit::wall_placement_at(&proj, scene, &band, &self.wall_placements) {
            Some(wp) => ClickTarget::WallPlacement(wp.id),
            None => ClickTarget::Nothing,
        }
    }

    /// Dispatch a primary click according to the current mode.
    fn click(&mut self, screen: Point) -> Vec<Action> {
        let target = self.click_target(screen);
        match self.ui.mode {
            Mode::Normal => match target {
                ClickTarget::Placement(id) | ClickTarget::WallPlacement(id) => vec![Action::FurnitureClick(id)],
                ClickTarget::Tile(cell) => vec![Action::TileClick { x: cell.x, y: cell.y }],
                ClickTarget::Nothing => Vec::new(),
            },
            Mode::Remove => match target {
                ClickTarget::Placement(id) | ClickTarget::WallPlacement(id) => {
                    self.ui.selected_id = Some(id);
                    vec![Action::FurnitureClick(id), Action::RenderNeeded]
                }
                ClickTarget::Tile(_) | ClickTarget::Nothing => {
                    if self.ui.selected_id.take().is_some() { vec![Action::RenderNeeded] } else { Vec::new() }
                }
            },
            Mode::Memory => {
                let target = match target {
                    ClickTarget::Placement(id) => MemoryTarget::Furniture { id },
                    ClickTarget::WallPlacement(id) => MemoryTarget::WallFurniture { id },
                    ClickTarget::Tile(cell) => MemoryTarget::Tile { x: cell.x, y: cell.y },
                    ClickTarget::Nothing => return Vec::new(),
                };
                vec![Action::MemoryClick(target)]
            }
            Mode::Study => match target {
                ClickTarget::Placement(id) | ClickTarget::WallPlacement(id) if self.due.contains(&id) => {
                    vec![Action::StudyClick(id)]
                }
                _ => Vec::new(),
            },
        }
    }

    /// Commit the item in hand at `screen`, re-validating against the current placements.
    fn try_commit(&self, screen: Point) -> Vec<Action> {
        let Some(drag) = &self.drag else {
            return Vec::new();
        };
        match self.hover_at(screen) {
            Hover::Floor(cell) => {
                let check = PlacementCheck::new(self.grid_size(), &self.placements, &self.catalog);
                if !check.is_valid(cell.x, cell.y, drag.item.size, drag.rotation, drag.moving_placement_id) {
                    debug!(x = cell.x, y = cell.y, "drag: placement rejected");
                    return Vec::new();
                }
                debug!(item = %drag.item.id, x = cell.x, y = cell.y, "drag: commit floor placement");
                vec![Action::CommitPlacement { furniture_id: drag.item.id, x: cell.x, y: cell.y, rotation: drag.rotation }]
            }
            Hover::Wall(cell) => {
                debug!(item = %drag.item.id, lane = cell.lane, z = cell.z, "drag: commit wall placement");
                vec![Action::CommitWallPlacement {
                    furniture_id: drag.item.id,
                    lane: cell.lane,
                    z: cell.z,
                    surface: cell.surface,
                }]
            }
            Hover::None => Vec::new(),
        }
    }
}

/// The full room engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    images: ImageRegistry,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, config: RoomConfig) -> Self {
        Self { canvas, images: ImageRegistry::default(), core: EngineCore::with_config(config) }
    }

    /// Make an image available to the renderer under `url`.
    pub fn register_image(&mut self, url: impl Into<String>, image: HtmlImageElement) {
        self.images.insert(url.into(), image);
    }

    // --- Delegated data inputs ---

    pub fn set_level(&mut self, level: i64) {
        self.core.set_level(level);
    }

    pub fn load_catalog(&mut self, items: Vec<FurnitureItem>) {
        self.core.load_catalog(items);
    }

    pub fn set_placements(&mut self, placements: Vec<Placement>) {
        self.core.set_placements(placements);
    }

    pub fn set_wall_placements(&mut self, wall_placements: Vec<WallPlacement>) {
        self.core.set_wall_placements(wall_placements);
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.core.set_mode(mode);
    }

    pub fn set_drag_item(&mut self, item: FurnitureItem, moving_placement_id: Option<PlacementId>) {
        self.core.set_drag_item(item, moving_placement_id);
    }

    pub fn clear_drag_item(&mut self) {
        self.core.clear_drag_item();
    }

    pub fn choose_variant(&mut self, placement_id: PlacementId, variant_id: Option<&str>) -> Vec<Action> {
        self.core.choose_variant(placement_id, variant_id)
    }

    // --- Viewport ---

    /// Update viewport dimensions and resize the canvas backing store.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        self.canvas.set_width((width_css * dpr).round().max(0.0) as u32);
        self.canvas.set_height((height_css * dpr).round().max(0.0) as u32);
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_down(screen, button)
    }

    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        self.core.on_pointer_move(screen)
    }

    pub fn on_pointer_up(&mut self, screen: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_up(screen, button)
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.core.on_pointer_leave()
    }

    pub fn on_context_menu(&mut self, screen: Point) -> Vec<Action> {
        self.core.on_context_menu(screen)
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or any `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let scene = self.core.scene();
        render::draw(
            &ctx,
            &scene,
            &self.core.camera,
            &self.images,
            self.core.viewport_width,
            self.core.viewport_height,
            self.core.dpr,
        )
    }
}
