#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

// =============================================================
// Helpers
// =============================================================

fn sprite_item() -> FurnitureItem {
    FurnitureItem {
        id: Uuid::new_v4(),
        name: "Lamp".into(),
        size: Size::new(1, 1),
        kind: FurnitureKind::Sprite(SpriteArt {
            images: vec![Some("lamp_0.png".into()), Some("lamp_1.png".into()), None, None],
            scale: 1.0,
            scale_x: 1.0,
            scale_y: 1.0,
            skew_x: 0.0,
            skew_y: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            filter: None,
        }),
        variants: vec![ColorVariant {
            id: "blue".into(),
            name: "Blue".into(),
            images: Some(vec![Some("lamp_blue_0.png".into())]),
            colors: None,
        }],
    }
}

fn box_item() -> FurnitureItem {
    FurnitureItem {
        id: Uuid::new_v4(),
        name: "Table".into(),
        size: Size::new(2, 1),
        kind: FurnitureKind::Boxes {
            boxes: vec![
                BoxPrimitive { x: 0.0, y: 0.0, z: 20.0, w: 2.0, d: 1.0, h: 4.0, color: "#8b5a2b".into() },
                BoxPrimitive { x: 0.1, y: 0.1, z: 0.0, w: 0.2, d: 0.2, h: 20.0, color: "#5c3a1e".into() },
            ],
        },
        variants: vec![ColorVariant {
            id: "white".into(),
            name: "White".into(),
            images: None,
            colors: Some(vec!["#ffffff".into()]),
        }],
    }
}

// =============================================================
// Rotation
// =============================================================

#[test]
fn rotation_normalises_into_quarter_turns() {
    assert_eq!(Rotation::new(0).quarter_turns(), 0);
    assert_eq!(Rotation::new(5).quarter_turns(), 1);
    assert_eq!(Rotation::new(7).quarter_turns(), 3);
}

#[test]
fn rotation_next_wraps_after_four_steps() {
    let start = Rotation::new(2);
    let mut r = start;
    for _ in 0..4 {
        r = r.next();
    }
    assert_eq!(r, start);
}

#[test]
fn rotation_parity() {
    assert!(!Rotation::new(0).is_odd());
    assert!(Rotation::new(1).is_odd());
    assert!(!Rotation::new(2).is_odd());
    assert!(Rotation::new(3).is_odd());
}

#[test]
fn rotation_deserialises_from_integer() {
    let r: Rotation = serde_json::from_value(json!(6)).unwrap();
    assert_eq!(r, Rotation::new(2));
    assert_eq!(serde_json::to_value(Rotation::new(3)).unwrap(), json!(3));
}

// =============================================================
// Size
// =============================================================

#[test]
fn size_rotated_swaps_on_odd_turns() {
    let size = Size::new(2, 1);
    assert_eq!(size.rotated(Rotation::new(0)), (2, 1));
    assert_eq!(size.rotated(Rotation::new(1)), (1, 2));
    assert_eq!(size.rotated(Rotation::new(2)), (2, 1));
    assert_eq!(size.rotated(Rotation::new(3)), (1, 2));
}

#[test]
fn size_four_quarter_turns_restore_footprint() {
    let size = Size::new(3, 2);
    let mut r = Rotation::default();
    for _ in 0..4 {
        r = r.next();
    }
    assert_eq!(size.rotated(r), (3, 2));
}

// =============================================================
// Sprite art and variants
// =============================================================

#[test]
fn sprite_image_for_missing_direction_is_none() {
    let item = sprite_item();
    let FurnitureKind::Sprite(art) = &item.kind else {
        panic!("expected sprite");
    };
    assert_eq!(art.image_for(Rotation::new(0)), Some("lamp_0.png"));
    assert_eq!(art.image_for(Rotation::new(2)), None);
}

#[test]
fn with_variant_none_borrows_base() {
    let item = sprite_item();
    assert!(matches!(item.with_variant(None), Cow::Borrowed(_)));
}

#[test]
fn with_variant_unknown_borrows_base() {
    let item = sprite_item();
    assert!(matches!(item.with_variant(Some("nope")), Cow::Borrowed(_)));
}

#[test]
fn with_variant_replaces_sprite_images_without_mutating_base() {
    let item = sprite_item();
    let resolved = item.with_variant(Some("blue"));
    let FurnitureKind::Sprite(art) = &resolved.kind else {
        panic!("expected sprite");
    };
    assert_eq!(art.image_for(Rotation::new(0)), Some("lamp_blue_0.png"));

    let FurnitureKind::Sprite(base) = &item.kind else {
        panic!("expected sprite");
    };
    assert_eq!(base.image_for(Rotation::new(0)), Some("lamp_0.png"));
}

#[test]
fn with_variant_replaces_box_colours_by_index() {
    let item = box_item();
    let resolved = item.with_variant(Some("white"));
    let FurnitureKind::Boxes { boxes } = &resolved.kind else {
        panic!("expected boxes");
    };
    assert_eq!(boxes[0].color, "#ffffff");
    assert_eq!(boxes[1].color, "#5c3a1e");
}

// =============================================================
// Serialization
// =============================================================

#[test]
fn furniture_item_parses_box_kind() {
    let id = Uuid::new_v4();
    let item: FurnitureItem = serde_json::from_value(json!({
        "id": id,
        "name": "Crate",
        "size": { "width": 1, "depth": 1 },
        "kind": "boxes",
        "boxes": [{ "x": 0, "y": 0, "w": 1, "d": 1, "h": 24, "color": "#aa8844" }]
    }))
    .unwrap();
    assert_eq!(item.id, id);
    let FurnitureKind::Boxes { boxes } = item.kind else {
        panic!("expected boxes");
    };
    assert_eq!(boxes.len(), 1);
    assert_eq!(boxes[0].z, 0.0);
}

#[test]
fn furniture_item_parses_sprite_kind_with_defaults() {
    let item: FurnitureItem = serde_json::from_value(json!({
        "id": Uuid::new_v4(),
        "size": { "width": 2, "depth": 2 },
        "kind": "sprite",
        "images": ["a.png", null, "c.png"]
    }))
    .unwrap();
    let FurnitureKind::Sprite(art) = item.kind else {
        panic!("expected sprite");
    };
    assert_eq!(art.scale, 1.0);
    assert_eq!(art.scale_x, 1.0);
    assert_eq!(art.skew_x, 0.0);
    assert_eq!(art.image_for(Rotation::new(1)), None);
    assert_eq!(art.image_for(Rotation::new(3)), None);
    assert!(item.variants.is_empty());
}

#[test]
fn wall_surface_uses_kebab_names() {
    assert_eq!(serde_json::to_value(WallSurface::Left).unwrap(), json!("left-wall"));
    let s: WallSurface = serde_json::from_value(json!("right-wall")).unwrap();
    assert_eq!(s, WallSurface::Right);
}

#[test]
fn placement_defaults_rotation_and_variant() {
    let p: Placement = serde_json::from_value(json!({
        "id": Uuid::new_v4(),
        "furniture_id": Uuid::new_v4(),
        "x": 2,
        "y": 5
    }))
    .unwrap();
    assert_eq!(p.rotation, Rotation::new(0));
    assert!(p.variant_id.is_none());
}

// =============================================================
// Catalog
// =============================================================

#[test]
fn catalog_new_is_empty() {
    let catalog = Catalog::new();
    assert!(catalog.is_empty());
    assert_eq!(catalog.len(), 0);
}

#[test]
fn catalog_insert_and_get() {
    let mut catalog = Catalog::new();
    let item = box_item();
    let id = item.id;
    catalog.insert(item);
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.get(&id).map(|i| i.name.as_str()), Some("Table"));
    assert!(catalog.get(&Uuid::new_v4()).is_none());
}

#[test]
fn catalog_load_snapshot_replaces_items() {
    let mut catalog = Catalog::new();
    catalog.insert(box_item());
    catalog.load_snapshot(vec![sprite_item(), sprite_item()]);
    assert_eq!(catalog.len(), 2);
}

#[test]
fn catalog_from_json_round_trips_items() {
    let items = vec![box_item(), sprite_item()];
    let json = serde_json::to_string(&items).unwrap();
    let catalog = Catalog::from_json(&json).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get(&items[0].id), Some(&items[0]));
}

#[test]
fn catalog_from_json_rejects_duplicates() {
    let item = box_item();
    let json = serde_json::to_string(&vec![item.clone(), item.clone()]).unwrap();
    let err = Catalog::from_json(&json).unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateId(id) if id == item.id));
}

#[test]
fn catalog_from_json_rejects_malformed_payload() {
    let err = Catalog::from_json("{ not json").unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)));
    assert!(err.to_string().starts_with("failed to parse catalog"));
}

// =============================================================
// Memory points
// =============================================================

#[test]
fn memory_target_is_tagged_by_type() {
    let id = Uuid::new_v4();
    let v = serde_json::to_value(MemoryTarget::WallFurniture { id }).unwrap();
    assert_eq!(v, json!({ "type": "wall_furniture", "id": id }));
    let t: MemoryTarget = serde_json::from_value(json!({ "type": "tile", "x": 2, "y": 3 })).unwrap();
    assert_eq!(t, MemoryTarget::Tile { x: 2, y: 3 });
}

#[test]
fn memory_point_label_defaults_empty() {
    let p: MemoryPoint = serde_json::from_value(json!({ "target": { "type": "tile", "x": 0, "y": 0 } })).unwrap();
    assert!(p.label.is_empty());
}
