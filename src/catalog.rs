//! Room data model: catalog items, floor and wall placements, and the catalog store.
//!
//! The host owns every placement and hands the engine read-only snapshots.
//! The catalog is loaded once (usually from JSON) and looked up by id while
//! building each scene. Variant overrides never touch the stored item; they
//! produce a patched copy through [`FurnitureItem::with_variant`].

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_FLOOR_COLOR, DEFAULT_WALL_COLOR};

/// Identifier of a catalog item.
pub type ItemId = Uuid;

/// Identifier of a floor or wall placement.
pub type PlacementId = Uuid;

/// Identifier of a colour variant, unique within its item.
pub type VariantId = String;

/// Error returned when loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The payload was not a valid catalog JSON array.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    /// Two items in the payload share an id.
    #[error("duplicate catalog item id: {0}")]
    DuplicateId(ItemId),
}

/// A quarter-turn orientation, always normalised into `0..4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Rotation(u8);

impl Rotation {
    /// Build a rotation from any number of quarter turns.
    #[must_use]
    pub fn new(quarter_turns: u8) -> Self {
        Self(quarter_turns % 4)
    }

    /// Quarter turns in `0..4`.
    #[must_use]
    pub fn quarter_turns(self) -> u8 {
        self.0
    }

    /// The next quarter turn clockwise.
    #[must_use]
    pub fn next(self) -> Self {
        Self::new(self.0 + 1)
    }

    /// Whether width and depth are swapped in this orientation.
    #[must_use]
    pub fn is_odd(self) -> bool {
        self.0 % 2 == 1
    }

    /// Index into a four-entry directional table.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl From<u8> for Rotation {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<Rotation> for u8 {
    fn from(value: Rotation) -> Self {
        value.0
    }
}

/// Item footprint in grid cells at rotation 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub depth: u32,
}

impl Size {
    #[must_use]
    pub fn new(width: u32, depth: u32) -> Self {
        Self { width, depth }
    }

    /// Effective `(width, depth)` after applying `rotation`.
    #[must_use]
    pub fn rotated(self, rotation: Rotation) -> (u32, u32) {
        if rotation.is_odd() {
            (self.depth, self.width)
        } else {
            (self.width, self.depth)
        }
    }
}

/// Which back wall a decoration hangs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallSurface {
    #[serde(rename = "left-wall")]
    Left,
    #[serde(rename = "right-wall")]
    Right,
}

/// One shaded box in a box-composite item, in item-local cell units.
///
/// `x`, `y`, `w`, `d` are measured in grid cells; `z` and `h` are in pixels
/// at the default tile size and are scaled with the tile width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPrimitive {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    pub w: f64,
    pub d: f64,
    pub h: f64,
    pub color: String,
}

fn one() -> f64 {
    1.0
}

/// Directional sprite art with per-item placement tweaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteArt {
    /// Up to four image references, one per quarter turn.
    pub images: Vec<Option<String>>,
    /// Overall size multiplier on top of the footprint width.
    #[serde(default = "one")]
    pub scale: f64,
    #[serde(default = "one")]
    pub scale_x: f64,
    #[serde(default = "one")]
    pub scale_y: f64,
    /// Horizontal skew in degrees.
    #[serde(default)]
    pub skew_x: f64,
    /// Vertical skew in degrees.
    #[serde(default)]
    pub skew_y: f64,
    #[serde(default)]
    pub offset_x: f64,
    #[serde(default)]
    pub offset_y: f64,
    /// CSS filter applied when drawing, if any.
    #[serde(default)]
    pub filter: Option<String>,
}

impl SpriteArt {
    /// Image for `rotation`, or `None` when that direction has no art.
    #[must_use]
    pub fn image_for(&self, rotation: Rotation) -> Option<&str> {
        self.images.get(rotation.index()).and_then(Option::as_deref)
    }
}

/// How an item is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FurnitureKind {
    /// Procedural composite of shaded boxes.
    Boxes { boxes: Vec<BoxPrimitive> },
    /// Flat directional images.
    Sprite(SpriteArt),
}

/// A colour variant that overrides sprite images or primitive colours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorVariant {
    pub id: VariantId,
    #[serde(default)]
    pub name: String,
    /// Replacement directional images for sprite items.
    #[serde(default)]
    pub images: Option<Vec<Option<String>>>,
    /// Replacement colours for box primitives, matched by index.
    #[serde(default)]
    pub colors: Option<Vec<String>>,
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureItem {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    pub size: Size,
    #[serde(flatten)]
    pub kind: FurnitureKind,
    #[serde(default)]
    pub variants: Vec<ColorVariant>,
}

impl FurnitureItem {
    /// Look up a variant by id.
    #[must_use]
    pub fn variant(&self, variant_id: &str) -> Option<&ColorVariant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }

    /// This item with `variant_id` applied, leaving `self` untouched.
    ///
    /// Unknown or absent variants resolve to the base item.
    #[must_use]
    pub fn with_variant(&self, variant_id: Option<&str>) -> Cow<'_, FurnitureItem> {
        let Some(variant) = variant_id.and_then(|id| self.variant(id)) else {
            return Cow::Borrowed(self);
        };
        let mut item = self.clone();
        match &mut item.kind {
            FurnitureKind::Sprite(art) => {
                if let Some(images) = &variant.images {
                    art.images.clone_from(images);
                }
            }
            FurnitureKind::Boxes { boxes } => {
                if let Some(colors) = &variant.colors {
                    for (prim, color) in boxes.iter_mut().zip(colors) {
                        prim.color.clone_from(color);
                    }
                }
            }
        }
        Cow::Owned(item)
    }
}

/// A committed floor placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub id: PlacementId,
    pub furniture_id: ItemId,
    /// Top-left cell before rotation.
    pub x: u32,
    pub y: u32,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default)]
    pub variant_id: Option<VariantId>,
}

/// A committed wall decoration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallPlacement {
    pub id: PlacementId,
    pub furniture_id: ItemId,
    /// Lane index along the wall.
    pub lane: u32,
    /// Height above the floor line in pixels.
    pub z: f64,
    pub surface: WallSurface,
    #[serde(default)]
    pub variant_id: Option<VariantId>,
}

/// What an annotation is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MemoryTarget {
    /// A floor placement.
    Furniture { id: PlacementId },
    /// A wall placement.
    WallFurniture { id: PlacementId },
    /// A bare floor tile.
    Tile { x: u32, y: u32 },
}

/// An annotation marker supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryPoint {
    pub target: MemoryTarget,
    #[serde(default)]
    pub label: String,
}

/// A surface fill: a flat colour, optionally covered by a repeating image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Texture {
    pub color: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl Texture {
    #[must_use]
    pub fn solid(color: &str) -> Self {
        Self { color: color.to_owned(), image: None }
    }
}

/// The active floor and wall textures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTextures {
    pub floor: Texture,
    pub wall: Texture,
}

impl Default for RoomTextures {
    fn default() -> Self {
        Self { floor: Texture::solid(DEFAULT_FLOOR_COLOR), wall: Texture::solid(DEFAULT_WALL_COLOR) }
    }
}

/// In-memory catalog of furniture items.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: HashMap<ItemId, FurnitureItem>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from a JSON array of items.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON and
    /// [`CatalogError::DuplicateId`] when two items share an id.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let items: Vec<FurnitureItem> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for item in items {
            if catalog.items.contains_key(&item.id) {
                return Err(CatalogError::DuplicateId(item.id));
            }
            catalog.insert(item);
        }
        Ok(catalog)
    }

    /// Insert or replace an item.
    pub fn insert(&mut self, item: FurnitureItem) {
        self.items.insert(item.id, item);
    }

    /// Replace the whole catalog.
    pub fn load_snapshot(&mut self, items: Vec<FurnitureItem>) {
        self.items.clear();
        for item in items {
            self.items.insert(item.id, item);
        }
    }

    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&FurnitureItem> {
        self.items.get(id)
    }

    /// Number of items in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
