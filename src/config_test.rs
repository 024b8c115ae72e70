#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn default_matches_constants() {
    let cfg = RoomConfig::default();
    assert_eq!(cfg.house_levels, vec![6, 8, 10, 12, 14, 16]);
    assert_eq!(cfg.tile_width, 64.0);
    assert_eq!(cfg.tile_height, 32.0);
    assert_eq!(cfg.wall_rows, 3);
    assert_eq!(cfg.wall_height, 120.0);
}

#[test]
fn from_json_empty_object_uses_defaults() {
    let cfg = RoomConfig::from_json("{}").unwrap();
    assert_eq!(cfg, RoomConfig::default());
}

#[test]
fn from_json_overrides_fields() {
    let cfg = RoomConfig::from_json(r#"{ "tile_width": 128, "tile_height": 64, "house_levels": [4, 9] }"#).unwrap();
    assert_eq!(cfg.tile_width, 128.0);
    assert_eq!(cfg.tile_height, 64.0);
    assert_eq!(cfg.house_levels, vec![4, 9]);
    assert_eq!(cfg.wall_height, 120.0);
}

#[test]
fn from_json_rejects_malformed() {
    let err = RoomConfig::from_json("[").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn from_json_rejects_zero_tile_width() {
    let err = RoomConfig::from_json(r#"{ "tile_width": 0 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::NotPositive { field: "tile_width", .. }));
}

#[test]
fn from_json_rejects_zero_wall_rows() {
    let err = RoomConfig::from_json(r#"{ "wall_rows": 0 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::NotPositive { field: "wall_rows", .. }));
}

#[test]
fn from_json_rejects_empty_levels() {
    let err = RoomConfig::from_json(r#"{ "house_levels": [] }"#).unwrap_err();
    assert!(matches!(err, ConfigError::NoLevels));
}

#[test]
fn grid_size_looks_up_one_based_level() {
    let cfg = RoomConfig::default();
    assert_eq!(cfg.grid_size(1), 6);
    assert_eq!(cfg.grid_size(2), 8);
    assert_eq!(cfg.grid_size(6), 16);
}

#[test]
fn grid_size_clamps_out_of_range_levels() {
    let cfg = RoomConfig::default();
    assert_eq!(cfg.grid_size(0), 6);
    assert_eq!(cfg.grid_size(-40), 6);
    assert_eq!(cfg.grid_size(99), 16);
    assert_eq!(cfg.grid_size(i64::MAX), 16);
}

#[test]
fn wall_rows_divide_scaled_height() {
    let cfg = RoomConfig { tile_width: 128.0, ..RoomConfig::default() };
    assert_eq!(cfg.pixel_scale(), 2.0);
    assert_eq!(cfg.wall_height_px(), 240.0);
    assert_eq!(cfg.wall_row_px(), 80.0);
}
