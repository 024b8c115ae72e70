//! Geometry for drawing furniture: rotated shaded boxes and sprite layout.
//!
//! This module computes polygons, colours and transforms; it never touches a
//! canvas. [`crate::render`] turns its output into `Canvas2D` calls, which
//! keeps everything here testable without a browser.
//!
//! Box composites are lit by a fixed lookup of three brightness multipliers
//! (right face darkest, front face darker, top face brightest). There is no
//! lighting model and the multipliers do not change with camera angle.

#[cfg(test)]
#[path = "primitive_test.rs"]
mod primitive_test;

use crate::camera::Point;
use crate::catalog::{BoxPrimitive, Rotation, Size, SpriteArt, WallSurface};
use crate::consts::{
    GHOST_ALPHA, GHOST_INVALID_COLOR, GHOST_VALID_COLOR, SELECTED_COLOR, SHADE_FRONT, SHADE_RIGHT, SHADE_TOP,
    SPRITE_DUE_FILTER, SPRITE_INVALID_FILTER, SPRITE_SELECTED_FILTER, SPRITE_VALID_FILTER,
};
use crate::iso::{IsoProjection, WallAnchor};

/// How an entry should be drawn relative to its art.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualState {
    #[default]
    Normal,
    /// Drag preview; `valid` selects the colour coding.
    Ghost { valid: bool },
    /// Picked in remove mode.
    Selected,
    /// Has an annotation due for review in study mode.
    Due,
}

impl VisualState {
    /// Solid colour replacing every primitive's fill, if the state calls for one.
    #[must_use]
    pub fn fill_override(self) -> Option<&'static str> {
        match self {
            Self::Ghost { valid: true } => Some(GHOST_VALID_COLOR),
            Self::Ghost { valid: false } => Some(GHOST_INVALID_COLOR),
            Self::Selected => Some(SELECTED_COLOR),
            Self::Normal | Self::Due => None,
        }
    }

    /// Global alpha for this state.
    #[must_use]
    pub fn alpha(self) -> f64 {
        match self {
            Self::Ghost { .. } => GHOST_ALPHA,
            _ => 1.0,
        }
    }

    /// Canvas filter for sprite art; the art's own filter applies in the normal state.
    #[must_use]
    pub fn sprite_filter(self, art_filter: Option<&str>) -> Option<&str> {
        match self {
            Self::Ghost { valid: true } => Some(SPRITE_VALID_FILTER),
            Self::Ghost { valid: false } => Some(SPRITE_INVALID_FILTER),
            Self::Selected => Some(SPRITE_SELECTED_FILTER),
            Self::Due => Some(SPRITE_DUE_FILTER),
            Self::Normal => art_filter,
        }
    }
}

/// Which side of a box a face belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Right,
    Front,
    Top,
}

impl Face {
    /// Fixed brightness multiplier for this face.
    #[must_use]
    pub fn brightness(self) -> f64 {
        match self {
            Self::Right => SHADE_RIGHT,
            Self::Front => SHADE_FRONT,
            Self::Top => SHADE_TOP,
        }
    }
}

/// A filled quadrilateral ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadedFace {
    pub face: Face,
    pub points: [Point; 4],
    pub color: String,
}

/// Where a box composite sits: grid origin, base size, rotation and pixel scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxPlacement {
    pub x: f64,
    pub y: f64,
    pub size: Size,
    pub rotation: Rotation,
    /// Multiplier from default-tile pixels to scene pixels.
    pub scale: f64,
}

/// A primitive's `(x, y, w, d)` after turning the item by `rotation` inside its footprint.
#[must_use]
pub fn rotate_box(prim: &BoxPrimitive, size: Size, rotation: Rotation) -> (f64, f64, f64, f64) {
    let w_base = f64::from(size.width);
    let d_base = f64::from(size.depth);
    let (x, y, w, d) = (prim.x, prim.y, prim.w, prim.d);
    match rotation.quarter_turns() {
        1 => (d_base - y - d, x, d, w),
        2 => (w_base - x - w, d_base - y - d, w, d),
        3 => (y, w_base - x - w, d, w),
        _ => (x, y, w, d),
    }
}

/// The three visible faces of one primitive, in draw order: right, front, top.
#[must_use]
pub fn box_faces(proj: &IsoProjection, at: BoxPlacement, prim: &BoxPrimitive, fill: Option<&str>) -> [ShadedFace; 3] {
    let (rx, ry, rw, rd) = rotate_box(prim, at.size, at.rotation);
    let x0 = at.x + rx;
    let y0 = at.y + ry;
    let x1 = x0 + rw;
    let y1 = y0 + rd;
    let bottom = prim.z * at.scale;
    let top = (prim.z + prim.h) * at.scale;

    let lift = |x: f64, y: f64, dz: f64| {
        let p = proj.to_iso(x, y);
        Point { x: p.x, y: p.y - dz }
    };
    let base_color = fill.unwrap_or(prim.color.as_str());
    let make = |face: Face, points: [Point; 4]| ShadedFace { face, points, color: shade(base_color, face.brightness()) };

    [
        make(Face::Right, [lift(x1, y0, bottom), lift(x1, y1, bottom), lift(x1, y1, top), lift(x1, y0, top)]),
        make(Face::Front, [lift(x0, y1, bottom), lift(x1, y1, bottom), lift(x1, y1, top), lift(x0, y1, top)]),
        make(Face::Top, [lift(x0, y0, top), lift(x1, y0, top), lift(x1, y1, top), lift(x0, y1, top)]),
    ]
}

/// All faces of a composite, primitive by primitive.
#[must_use]
pub fn composite_faces(
    proj: &IsoProjection,
    at: BoxPlacement,
    boxes: &[BoxPrimitive],
    state: VisualState,
) -> Vec<ShadedFace> {
    let fill = state.fill_override();
    boxes.iter().flat_map(|prim| box_faces(proj, at, prim, fill)).collect()
}

/// Multiply a `#rgb` / `#rrggbb` colour by `factor`. Other colour syntaxes pass through.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn shade(color: &str, factor: f64) -> String {
    let Some((r, g, b)) = parse_hex(color) else {
        return color.to_owned();
    };
    let scale = |c: u8| (f64::from(c) * factor).round().clamp(0.0, 255.0) as u8;
    format!("rgb({}, {}, {})", scale(r), scale(g), scale(b))
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| ());
    let parsed = match hex.len() {
        6 => (channel(&hex[0..2]), channel(&hex[2..4]), channel(&hex[4..6])),
        3 => {
            let double = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);
            (double(0), double(1), double(2))
        }
        _ => return None,
    };
    match parsed {
        (Ok(r), Ok(g), Ok(b)) => Some((r, g, b)),
        _ => None,
    }
}

/// Vertical alignment of a sprite against its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteAlign {
    /// Anchor is the bottom centre of the image (floor items).
    Bottom,
    /// Anchor is the centre of the image (wall decorations).
    Center,
}

/// Transform for drawing one sprite image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteLayout {
    pub anchor: Point,
    /// Drawn width in scene pixels before `scale_x`; height follows the image aspect.
    pub width: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Horizontal skew in radians.
    pub skew_x: f64,
    /// Vertical skew in radians.
    pub skew_y: f64,
    pub align: SpriteAlign,
}

/// Layout for a floor sprite over a `eff_w × eff_d` footprint at `(x, y)`.
///
/// The image bottom sits on the projected footprint centre; art that needs
/// to stand lower lifts itself with `offset_y`.
#[must_use]
pub fn floor_sprite_layout(
    proj: &IsoProjection,
    x: f64,
    y: f64,
    (eff_w, eff_d): (u32, u32),
    art: &SpriteArt,
    pixel_scale: f64,
) -> SpriteLayout {
    let cells = f64::from(eff_w.max(eff_d));
    let center = proj.footprint_center(x, y, f64::from(eff_w), f64::from(eff_d));
    SpriteLayout {
        anchor: Point {
            x: center.x + art.offset_x * pixel_scale,
            y: center.y + art.offset_y * pixel_scale,
        },
        width: cells * proj.half_w * 2.0 * art.scale,
        scale_x: art.scale_x,
        scale_y: art.scale_y,
        skew_x: art.skew_x.to_radians(),
        skew_y: art.skew_y.to_radians(),
        align: SpriteAlign::Bottom,
    }
}

/// Layout for a wall sprite hung at `anchor`, sheared to the wall plane.
#[must_use]
pub fn wall_sprite_layout(proj: &IsoProjection, anchor: &WallAnchor, art: &SpriteArt, pixel_scale: f64) -> SpriteLayout {
    SpriteLayout {
        anchor: Point {
            x: anchor.point.x + art.offset_x * pixel_scale,
            y: anchor.point.y + art.offset_y * pixel_scale,
        },
        width: proj.half_w * art.scale,
        scale_x: art.scale_x,
        scale_y: art.scale_y,
        skew_x: art.skew_x.to_radians(),
        skew_y: (anchor.shear_deg + art.skew_y).to_radians(),
        align: SpriteAlign::Center,
    }
}

/// Diamond of floor cell `(x, y)`.
#[must_use]
pub fn cell_quad(proj: &IsoProjection, x: u32, y: u32) -> [Point; 4] {
    let (x, y) = (f64::from(x), f64::from(y));
    [proj.to_iso(x, y), proj.to_iso(x + 1.0, y), proj.to_iso(x + 1.0, y + 1.0), proj.to_iso(x, y + 1.0)]
}

/// A wall plane standing `height` pixels tall on the edge `start → end`.
#[must_use]
pub fn wall_quad(start: Point, end: Point, height: f64) -> [Point; 4] {
    [start, end, Point { x: end.x, y: end.y - height }, Point { x: start.x, y: start.y - height }]
}

/// A flat panel one lane wide and `height` tall, centred `z` above the floor line of `surface`.
#[must_use]
pub fn wall_panel(proj: &IsoProjection, lane: u32, surface: WallSurface, z: f64, height: f64) -> [Point; 4] {
    let edge = proj.wall_edge(surface);
    let n = f64::from(proj.grid_size.max(1));
    let a = edge.start.lerp(edge.end, f64::from(lane) / n);
    let b = edge.start.lerp(edge.end, (f64::from(lane) + 1.0) / n);
    let bottom = z - height / 2.0;
    let top = z + height / 2.0;
    [
        Point { x: a.x, y: a.y - bottom },
        Point { x: b.x, y: b.y - bottom },
        Point { x: b.x, y: b.y - top },
        Point { x: a.x, y: a.y - top },
    ]
}
