//! Room configuration supplied by the host as JSON.
//!
//! Every field has a default, so `{}` is a valid configuration. Numeric
//! fields that feed a division are checked in [`RoomConfig::validate`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    CLICK_SLOP_PX, DEFAULT_TILE_HEIGHT, DEFAULT_TILE_WIDTH, DEFAULT_WALL_HEIGHT, HOUSE_LEVEL_GRID_SIZES,
    ROTATE_SENSITIVITY, WALL_FLOOR_MARGIN_PX, WALL_ROWS,
};

/// Error returned when loading a room configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse room config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field that must be strictly positive was zero, negative or not finite.
    #[error("room config field `{field}` must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("room config needs at least one house level")]
    NoLevels,
}

/// Tunable geometry and interaction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Grid edge length for each house level, level 1 first.
    pub house_levels: Vec<u32>,
    pub tile_width: f64,
    pub tile_height: f64,
    /// Wall height in pixels at the default tile width.
    pub wall_height: f64,
    pub wall_rows: u32,
    pub wall_floor_margin_px: f64,
    pub rotate_sensitivity: f64,
    pub click_slop_px: f64,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            house_levels: HOUSE_LEVEL_GRID_SIZES.to_vec(),
            tile_width: DEFAULT_TILE_WIDTH,
            tile_height: DEFAULT_TILE_HEIGHT,
            wall_height: DEFAULT_WALL_HEIGHT,
            wall_rows: WALL_ROWS,
            wall_floor_margin_px: WALL_FLOOR_MARGIN_PX,
            rotate_sensitivity: ROTATE_SENSITIVITY,
            click_slop_px: CLICK_SLOP_PX,
        }
    }
}

impl RoomConfig {
    /// Parse and validate a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, or a validation
    /// error from [`Self::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the fields that the projection and wall maths divide by.
    ///
    /// # Errors
    ///
    /// Returns the first field that is not strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.house_levels.is_empty() || self.house_levels.contains(&0) {
            return Err(ConfigError::NoLevels);
        }
        for (field, value) in [
            ("tile_width", self.tile_width),
            ("tile_height", self.tile_height),
            ("wall_height", self.wall_height),
            ("wall_rows", f64::from(self.wall_rows)),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        Ok(())
    }

    /// Grid size for a house level, clamping the level into the table.
    #[must_use]
    pub fn grid_size(&self, level: i64) -> u32 {
        let max_level = i64::try_from(self.house_levels.len()).unwrap_or(i64::MAX);
        if max_level == 0 {
            return HOUSE_LEVEL_GRID_SIZES[0];
        }
        let idx = usize::try_from(level.clamp(1, max_level) - 1).unwrap_or(0);
        self.house_levels.get(idx).copied().unwrap_or(HOUSE_LEVEL_GRID_SIZES[0])
    }

    /// Factor from default-tile pixel units to the configured tile size.
    #[must_use]
    pub fn pixel_scale(&self) -> f64 {
        self.tile_width / DEFAULT_TILE_WIDTH
    }

    /// Wall height in scene pixels.
    #[must_use]
    pub fn wall_height_px(&self) -> f64 {
        self.wall_height * self.pixel_scale()
    }

    /// Height of one wall row in scene pixels.
    #[must_use]
    pub fn wall_row_px(&self) -> f64 {
        self.wall_height_px() / f64::from(self.wall_rows.max(1))
    }
}
