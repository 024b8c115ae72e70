//! Rendering: draws a built [`Scene`] to a 2D context.
//!
//! This module is the only drawing code; [`crate::engine::Engine`] merely
//! fetches the [`web_sys::CanvasRenderingContext2d`] and hands it over.
//! All geometry comes precomputed from [`crate::scene`] and [`crate::primitive`];
//! this module only turns it into `Canvas2D` calls and never mutates state.
//!
//! Images are looked up by URL in an [`ImageRegistry`]. An image that was
//! never registered, or has not finished loading, draws nothing for its entry.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::collections::HashMap;
use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::camera::{Camera, Point};
use crate::catalog::{FurnitureKind, Rotation, Texture};
use crate::consts::{
    AVATAR_FALLBACK_COLOR, AVATAR_HEIGHT_TILES, BADGE_COLOR, BADGE_RADIUS_TILES, HOVER_DASH_PX, HOVER_STROKE_COLOR,
    MARKER_FILL_COLOR, TILE_STROKE_COLOR,
};
use crate::primitive::{
    BoxPlacement, SpriteAlign, SpriteLayout, composite_faces, floor_sprite_layout, shade, wall_panel,
    wall_sprite_layout,
};
use crate::scene::{DrawKind, FloorItem, Scene, WallItem};

/// Darkening applied over the left wall so the two planes read apart.
const LEFT_WALL_SHADE: &str = "rgba(0, 0, 0, 0.12)";

/// Darkening applied over the right wall.
const RIGHT_WALL_SHADE: &str = "rgba(0, 0, 0, 0.04)";

/// Images available to the renderer, keyed by URL.
#[derive(Debug, Default)]
pub struct ImageRegistry {
    images: HashMap<String, HtmlImageElement>,
}

impl ImageRegistry {
    pub fn insert(&mut self, url: String, image: HtmlImageElement) {
        self.images.insert(url, image);
    }

    /// The image for `url` if it is registered and fully decoded.
    #[must_use]
    pub fn loaded(&self, url: &str) -> Option<&HtmlImageElement> {
        self.images.get(url).filter(|img| img.complete() && img.natural_width() > 0)
    }
}

/// Draw the full scene.
///
/// `viewport_w` and `viewport_h` are in CSS pixels. `dpr` is the device pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    scene: &Scene<'_>,
    camera: &Camera,
    images: &ImageRegistry,
    viewport_w: f64,
    viewport_h: f64,
    dpr: f64,
) -> Result<(), JsValue> {
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport_w, viewport_h);
    ctx.translate(viewport_w * 0.5 + camera.pan_x, viewport_h * 0.5 + camera.pan_y)?;

    for entry in &scene.items {
        match &entry.kind {
            DrawKind::Room { floor, left_wall, right_wall, textures } => {
                fill_textured(ctx, left_wall, &textures.wall, images)?;
                fill_quad(ctx, left_wall, LEFT_WALL_SHADE);
                fill_textured(ctx, right_wall, &textures.wall, images)?;
                fill_quad(ctx, right_wall, RIGHT_WALL_SHADE);
                fill_textured(ctx, floor, &textures.floor, images)?;
            }
            DrawKind::Tile { quad, hovered, marked, .. } => draw_tile(ctx, quad, *hovered, *marked)?,
            DrawKind::Furniture(item) => draw_floor_item(ctx, scene, item, images)?,
            DrawKind::WallItem(item) => draw_wall_item(ctx, scene, item, images)?,
            DrawKind::Avatar { feet, image } => {
                draw_avatar(ctx, scene, *feet, image.and_then(|url| images.loaded(url)))?;
            }
        }
    }
    Ok(())
}

// =============================================================
// Room
// =============================================================

fn fill_textured(
    ctx: &CanvasRenderingContext2d,
    quad: &[Point; 4],
    texture: &Texture,
    images: &ImageRegistry,
) -> Result<(), JsValue> {
    fill_quad(ctx, quad, &texture.color);
    let Some(img) = texture.image.as_deref().and_then(|url| images.loaded(url)) else {
        return Ok(());
    };
    if let Some(pattern) = ctx.create_pattern_with_html_image_element(img, "repeat")? {
        ctx.save();
        trace_quad(ctx, quad);
        ctx.set_fill_style_canvas_pattern(&pattern);
        ctx.fill();
        ctx.restore();
    }
    Ok(())
}

fn draw_tile(ctx: &CanvasRenderingContext2d, quad: &[Point; 4], hovered: bool, marked: bool) -> Result<(), JsValue> {
    if marked {
        fill_quad(ctx, quad, MARKER_FILL_COLOR);
    }
    trace_quad(ctx, quad);
    ctx.set_stroke_style_str(TILE_STROKE_COLOR);
    ctx.set_line_width(1.0);
    ctx.stroke();

    if hovered {
        ctx.save();
        ctx.set_stroke_style_str(HOVER_STROKE_COLOR);
        ctx.set_line_width(2.0);
        let dash_array = js_sys::Array::new();
        dash_array.push(&HOVER_DASH_PX.into());
        dash_array.push(&HOVER_DASH_PX.into());
        ctx.set_line_dash(&dash_array)?;
        trace_quad(ctx, quad);
        ctx.stroke();
        ctx.set_line_dash(&js_sys::Array::new())?;
        ctx.restore();
    }
    Ok(())
}

// =============================================================
// Furniture
// =============================================================

fn draw_floor_item(
    ctx: &CanvasRenderingContext2d,
    scene: &Scene<'_>,
    item: &FloorItem<'_>,
    images: &ImageRegistry,
) -> Result<(), JsValue> {
    let proj = &scene.proj;
    let (x, y) = (f64::from(item.x), f64::from(item.y));
    match &item.item.kind {
        FurnitureKind::Boxes { boxes } => {
            let at = BoxPlacement { x, y, size: item.item.size, rotation: item.rotation, scale: scene.pixel_scale };
            ctx.save();
            ctx.set_global_alpha(item.state.alpha());
            for face in composite_faces(proj, at, boxes, item.state) {
                fill_quad(ctx, &face.points, &face.color);
            }
            ctx.restore();
        }
        FurnitureKind::Sprite(art) => {
            let Some(img) = art.image_for(item.rotation).and_then(|url| images.loaded(url)) else {
                return Ok(());
            };
            let footprint = item.item.size.rotated(item.rotation);
            let layout = floor_sprite_layout(proj, x, y, footprint, art, scene.pixel_scale);
            draw_sprite(ctx, img, &layout, item.state.sprite_filter(art.filter.as_deref()), item.state.alpha())?;
        }
    }

    if item.badge {
        let (w, d) = item.item.size.rotated(item.rotation);
        let center = proj.footprint_center(x, y, f64::from(w), f64::from(d));
        draw_badge(ctx, Point::new(center.x, center.y - proj.half_h * 4.0), proj.half_h)?;
    }
    Ok(())
}

fn draw_wall_item(
    ctx: &CanvasRenderingContext2d,
    scene: &Scene<'_>,
    item: &WallItem<'_>,
    images: &ImageRegistry,
) -> Result<(), JsValue> {
    let proj = &scene.proj;
    match &item.item.kind {
        FurnitureKind::Sprite(art) => {
            let Some(img) = art.image_for(Rotation::default()).and_then(|url| images.loaded(url)) else {
                return Ok(());
            };
            let layout = wall_sprite_layout(proj, &item.anchor, art, scene.pixel_scale);
            draw_sprite(ctx, img, &layout, item.state.sprite_filter(art.filter.as_deref()), item.state.alpha())?;
        }
        // Box art has no wall projection; it hangs as a flat panel in its first colour.
        FurnitureKind::Boxes { boxes } => {
            let Some(color) = item.state.fill_override().or_else(|| boxes.first().map(|b| b.color.as_str())) else {
                return Ok(());
            };
            let panel = wall_panel(proj, item.lane, item.surface, item.z, scene.wall_row_px * 0.8);
            ctx.save();
            ctx.set_global_alpha(item.state.alpha());
            fill_quad(ctx, &panel, &shade(color, 0.9));
            ctx.restore();
        }
    }

    if item.badge {
        let p = item.anchor.point;
        draw_badge(ctx, Point::new(p.x, p.y - scene.wall_row_px * 0.5), proj.half_h)?;
    }
    Ok(())
}

fn draw_sprite(
    ctx: &CanvasRenderingContext2d,
    img: &HtmlImageElement,
    layout: &SpriteLayout,
    filter: Option<&str>,
    alpha: f64,
) -> Result<(), JsValue> {
    let natural_w = f64::from(img.natural_width());
    let natural_h = f64::from(img.natural_height());
    if natural_w <= 0.0 {
        return Ok(());
    }
    let w = layout.width;
    let h = w * natural_h / natural_w;
    let top = match layout.align {
        SpriteAlign::Bottom => -h,
        SpriteAlign::Center => -h / 2.0,
    };

    ctx.save();
    ctx.set_global_alpha(alpha);
    ctx.set_filter(filter.unwrap_or("none"));
    ctx.translate(layout.anchor.x, layout.anchor.y)?;
    ctx.transform(layout.scale_x, layout.skew_y.tan(), layout.skew_x.tan(), layout.scale_y, 0.0, 0.0)?;
    ctx.draw_image_with_html_image_element_and_dw_and_dh(img, -w / 2.0, top, w, h)?;
    ctx.restore();
    Ok(())
}

fn draw_badge(ctx: &CanvasRenderingContext2d, at: Point, half_h: f64) -> Result<(), JsValue> {
    let radius = half_h * 2.0 * BADGE_RADIUS_TILES;
    ctx.begin_path();
    ctx.arc(at.x, at.y, radius, 0.0, TAU)?;
    ctx.set_fill_style_str(BADGE_COLOR);
    ctx.fill();
    ctx.set_stroke_style_str("#ffffff");
    ctx.set_line_width(1.5);
    ctx.stroke();
    Ok(())
}

// =============================================================
// Avatar
// =============================================================

fn draw_avatar(
    ctx: &CanvasRenderingContext2d,
    scene: &Scene<'_>,
    feet: Point,
    image: Option<&HtmlImageElement>,
) -> Result<(), JsValue> {
    let height = scene.proj.half_h * 2.0 * AVATAR_HEIGHT_TILES;
    if let Some(img) = image {
        let natural_w = f64::from(img.natural_width());
        let natural_h = f64::from(img.natural_height());
        if natural_h > 0.0 {
            let width = height * natural_w / natural_h;
            ctx.draw_image_with_html_image_element_and_dw_and_dh(img, feet.x - width / 2.0, feet.y - height, width, height)?;
            return Ok(());
        }
    }

    let radius = height / 4.0;
    ctx.begin_path();
    ctx.ellipse(feet.x, feet.y, radius, radius / 2.0, 0.0, 0.0, TAU)?;
    ctx.set_fill_style_str("rgba(0, 0, 0, 0.2)");
    ctx.fill();
    ctx.begin_path();
    ctx.arc(feet.x, feet.y - height + radius, radius, 0.0, TAU)?;
    ctx.set_fill_style_str(AVATAR_FALLBACK_COLOR);
    ctx.fill();
    Ok(())
}

// =============================================================
// Helpers
// =============================================================

fn trace_quad(ctx: &CanvasRenderingContext2d, quad: &[Point; 4]) {
    ctx.begin_path();
    ctx.move_to(quad[0].x, quad[0].y);
    for p in &quad[1..] {
        ctx.line_to(p.x, p.y);
    }
    ctx.close_path();
}

fn fill_quad(ctx: &CanvasRenderingContext2d, quad: &[Point; 4], color: &str) {
    trace_quad(ctx, quad);
    ctx.set_fill_style_str(color);
    ctx.fill();
}
