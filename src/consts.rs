//! Shared numeric constants for the room engine.

// ── Grid ────────────────────────────────────────────────────────

/// Grid edge length per house level. Level 1 is the first entry.
pub const HOUSE_LEVEL_GRID_SIZES: [u32; 6] = [6, 8, 10, 12, 14, 16];

/// Default tile width in CSS pixels (the full diamond width).
pub const DEFAULT_TILE_WIDTH: f64 = 64.0;

/// Default tile height in CSS pixels (the full diamond height).
pub const DEFAULT_TILE_HEIGHT: f64 = 32.0;

// ── Walls ───────────────────────────────────────────────────────

/// Default wall height in CSS pixels at the default tile size.
pub const DEFAULT_WALL_HEIGHT: f64 = 120.0;

/// Number of discrete height rows on a wall.
pub const WALL_ROWS: u32 = 3;

/// Minimum height above the floor line before a point counts as "on the wall".
pub const WALL_FLOOR_MARGIN_PX: f64 = 4.0;

/// Wall decoration shear in degrees; the sign follows the wall surface.
pub const WALL_SHEAR_DEG: f64 = 30.0;

/// Depth base for wall-mounted items so they sort behind every floor object.
pub const WALL_DEPTH_BASE: f64 = -100_000.0;

// ── Camera ──────────────────────────────────────────────────────

/// Radians of camera rotation per CSS pixel of horizontal drag.
pub const ROTATE_SENSITIVITY: f64 = 0.01;

/// Pointer travel below which a primary press-release counts as a click.
pub const CLICK_SLOP_PX: f64 = 4.0;

// ── Shading ─────────────────────────────────────────────────────

/// Brightness multiplier for the right face of a box primitive.
pub const SHADE_RIGHT: f64 = 0.6;

/// Brightness multiplier for the front face of a box primitive.
pub const SHADE_FRONT: f64 = 0.8;

/// Brightness multiplier for the top face of a box primitive.
pub const SHADE_TOP: f64 = 1.0;

/// Ghost fill when the candidate placement is valid.
pub const GHOST_VALID_COLOR: &str = "#4ade80";

/// Ghost fill when the candidate placement is rejected.
pub const GHOST_INVALID_COLOR: &str = "#f87171";

/// Fill used for a placement selected in remove mode.
pub const SELECTED_COLOR: &str = "#ef4444";

/// Opacity applied to ghost previews.
pub const GHOST_ALPHA: f64 = 0.6;

/// Canvas filter applied to an invalid sprite ghost.
pub const SPRITE_INVALID_FILTER: &str = "grayscale(1) sepia(1) hue-rotate(-50deg) saturate(6)";

/// Canvas filter applied to a valid sprite ghost.
pub const SPRITE_VALID_FILTER: &str = "sepia(1) hue-rotate(70deg) saturate(3)";

/// Canvas filter applied to a selected sprite.
pub const SPRITE_SELECTED_FILTER: &str = "drop-shadow(0 0 6px #ef4444)";

/// Canvas filter applied to a sprite that is due for review.
pub const SPRITE_DUE_FILTER: &str = "drop-shadow(0 0 6px #facc15)";

// ── Overlays ────────────────────────────────────────────────────

/// Floor fill used until the host supplies a texture.
pub const DEFAULT_FLOOR_COLOR: &str = "#d6c3a5";

/// Wall fill used until the host supplies a texture.
pub const DEFAULT_WALL_COLOR: &str = "#e7e0d4";

/// Thin grid line drawn around every tile.
pub const TILE_STROKE_COLOR: &str = "rgba(0, 0, 0, 0.08)";

/// Dashed outline around the hovered tile.
pub const HOVER_STROKE_COLOR: &str = "rgba(255, 255, 255, 0.9)";

/// Dash segment length for the hovered tile outline.
pub const HOVER_DASH_PX: f64 = 4.0;

/// Fill of an annotated tile.
pub const MARKER_FILL_COLOR: &str = "rgba(250, 204, 21, 0.35)";

/// Fill of the badge drawn above annotated items.
pub const BADGE_COLOR: &str = "#facc15";

/// Badge radius in tile half-heights.
pub const BADGE_RADIUS_TILES: f64 = 0.3;

// ── Avatar ──────────────────────────────────────────────────────

/// Avatar token height in tile heights.
pub const AVATAR_HEIGHT_TILES: f64 = 2.5;

/// Avatar fallback fill when no image is available.
pub const AVATAR_FALLBACK_COLOR: &str = "#60a5fa";
