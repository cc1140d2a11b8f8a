// The changes suggested by this lint usually make the code more cluttered and less clear:
#![allow(clippy::needless_range_loop)]

pub mod tile;
pub mod util;

use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strum_macros::{Display, EnumString, VariantNames};

pub use tile::{TileCell, TileId, EMPTY_TILE};

pub type ObjectId = u8; // Standard object number (0x01..=0xFE); 0x00 selects an extended object
pub type ExtendedId = u8; // Extended object number (0x00..=0xFF)
pub type TilesetIdx = u16; // Value of the header's tileset selector field
pub type ScreenIdx = u8; // Index into the 128-entry screen arrays: (y & 0xF0) | (x >> 4)

pub const GRID_WIDTH: usize = 256;
pub const GRID_HEIGHT: usize = 128;
pub const SCREEN_SIZE: usize = 16;
pub const SCREEN_COUNT: usize = 128;
pub const MAX_ACTIVE_SCREENS: usize = 0x3F; // Exceeding this freezes the game on load

pub const HEADER_FIELDS: usize = 16;
pub const HEADER_TILESET_FIELD: usize = 1;
pub const MAX_TILESET: TilesetIdx = 0x11;

pub const EXTENDED_OBJECT_ID: ObjectId = 0x00;
pub const MAX_STANDARD_ID: ObjectId = 0xFE;
// Legacy objects whose length lives in extension bytes instead of width/height
// bytes. One byte by default; two bytes when the sublevel uses the wide
// extension format.
pub const LEGACY_EXT_WIDTH_IDS: [ObjectId; 2] = [0xC0, 0xC1];

pub fn screen_index(x: u8, y: u8) -> ScreenIdx {
    (y & 0xF0) | (x >> 4)
}

/// Top-left cell of a screen.
pub fn screen_origin(screen: ScreenIdx) -> (u8, u8) {
    ((screen & 0x0F) << 4, screen & 0xF0)
}

/// User-facing length for a stored length byte.
///
/// Non-negative stored values grow by one and negative values shrink by one,
/// so no stored value ever displays as zero.
pub fn adjusted_length(stored: Option<i8>) -> i32 {
    match stored {
        None => 1,
        Some(v) if v >= 0 => v as i32 + 1,
        Some(v) => v as i32 - 1,
    }
}

/// Inverse of [`adjusted_length`] for a present length byte.
pub fn stored_length(adjusted: i32) -> Result<i8> {
    ensure!(adjusted != 0, "adjusted length cannot be zero");
    let stored = if adjusted > 0 {
        adjusted - 1
    } else {
        adjusted + 1
    };
    i8::try_from(stored).with_context(|| format!("adjusted length {adjusted} out of range"))
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Object {
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext_id: Option<u32>,
    pub x: u8,
    pub y: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i8>,
}

impl Object {
    pub fn standard(id: ObjectId, x: u8, y: u8, width: Option<i8>, height: Option<i8>) -> Self {
        Object {
            id,
            ext_id: None,
            x,
            y,
            width,
            height,
        }
    }

    pub fn extended(ext_id: ExtendedId, x: u8, y: u8) -> Self {
        Object {
            id: EXTENDED_OBJECT_ID,
            ext_id: Some(ext_id as u32),
            x,
            y,
            width: None,
            height: None,
        }
    }

    pub fn is_extended(&self) -> bool {
        self.id == EXTENDED_OBJECT_ID
    }

    pub fn is_legacy_ext_width(&self) -> bool {
        LEGACY_EXT_WIDTH_IDS.contains(&self.id)
    }

    /// Extended object number, if this is an extended object.
    pub fn extended_id(&self) -> Option<ExtendedId> {
        match self.ext_id {
            Some(ext_id) if self.is_extended() => Some((ext_id & 0xFF) as ExtendedId),
            _ => None,
        }
    }

    pub fn adjusted_width(&self) -> i32 {
        adjusted_length(self.width)
    }

    pub fn adjusted_height(&self) -> i32 {
        adjusted_length(self.height)
    }

    /// Signed step count for a coordinate range covering the object's width
    /// (the stored byte itself; 0 when absent).
    pub fn width_span(&self) -> i32 {
        self.width.map_or(0, |w| w as i32)
    }

    pub fn height_span(&self) -> i32 {
        self.height.map_or(0, |h| h as i32)
    }

    /// Stored length of a legacy extension-width object.
    pub fn legacy_width_span(&self, wide_extension: bool) -> Option<i32> {
        if !self.is_legacy_ext_width() {
            return None;
        }
        let raw = self.ext_id?;
        if wide_extension {
            Some((raw & 0xFFFF) as u16 as i16 as i32)
        } else {
            Some((raw & 0xFF) as u8 as i8 as i32)
        }
    }
}

#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OverflowPolicy {
    /// Y wraps at 128 rows; overflow cannot happen.
    Loop,
    /// An out-of-range write aborts the object and paints its error fallback.
    #[default]
    Exception,
    /// Out-of-range writes are dropped.
    Crop,
    /// Out-of-range writes are dropped and the object is marked on the border.
    ErrorTile,
}

impl OverflowPolicy {
    pub fn y_wrap_bits(self) -> u8 {
        match self {
            OverflowPolicy::Loop => 7,
            _ => 8,
        }
    }
}

#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlgorithmVariant {
    /// Reproduce the game, including tiles drawn outside the object's nominal box.
    #[default]
    Accuracy,
    /// Keep every tile inside the nominal box so the editor sidebar never
    /// shows stray tiles.
    SidebarSafe,
}

#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FormatVersion {
    /// Saved by older tools; a few routines keep their old corner-case output.
    Legacy,
    #[default]
    Current,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Sublevel {
    #[serde(default)]
    pub header: [u16; HEADER_FIELDS],
    pub objects: Vec<Object>,
    #[serde(default)]
    pub overflow: OverflowPolicy,
    #[serde(default)]
    pub variant: AlgorithmVariant,
    #[serde(default)]
    pub format: FormatVersion,
    #[serde(default)]
    pub wide_extension: bool,
}

impl Sublevel {
    pub fn new(tileset: TilesetIdx, objects: Vec<Object>) -> Self {
        let mut header = [0; HEADER_FIELDS];
        header[HEADER_TILESET_FIELD] = tileset;
        Sublevel {
            header,
            objects,
            overflow: OverflowPolicy::default(),
            variant: AlgorithmVariant::default(),
            format: FormatVersion::default(),
            wide_extension: false,
        }
    }

    pub fn tileset(&self) -> TilesetIdx {
        self.header[HEADER_TILESET_FIELD]
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json_str = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read sublevel at {}", path.display()))?;
        let sublevel: Sublevel = serde_json::from_str(&json_str)
            .with_context(|| format!("Unable to parse sublevel at {}", path.display()))?;
        sublevel
            .validate()
            .with_context(|| format!("Invalid sublevel at {}", path.display()))?;
        Ok(sublevel)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json_str = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json_str)
            .with_context(|| format!("Unable to write sublevel to {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        let tileset = self.tileset();
        ensure!(tileset <= MAX_TILESET, "tileset selector {tileset:#x} out of range");
        let ext_limit = if self.wide_extension { 0xFFFF } else { 0xFF };
        for (i, obj) in self.objects.iter().enumerate() {
            if obj.is_extended() {
                let Some(ext_id) = obj.ext_id else {
                    bail!("object {i}: extended object without extended id");
                };
                ensure!(ext_id <= 0xFF, "object {i}: extended id {ext_id:#x} out of range");
                ensure!(
                    obj.width.is_none() && obj.height.is_none(),
                    "object {i}: extended objects have no width/height"
                );
            } else if obj.is_legacy_ext_width() {
                let Some(ext_id) = obj.ext_id else {
                    bail!("object {i}: object {:#04x} needs its extension bytes", obj.id);
                };
                ensure!(
                    ext_id <= ext_limit,
                    "object {i}: extension value {ext_id:#x} too large"
                );
                ensure!(
                    obj.width.is_none() && obj.height.is_none(),
                    "object {i}: object {:#04x} takes its size from extension bytes",
                    obj.id
                );
            } else {
                ensure!(obj.id <= MAX_STANDARD_ID, "object {i}: id {:#04x} out of range", obj.id);
                ensure!(
                    obj.ext_id.is_none(),
                    "object {i}: object {:#04x} has no extension bytes",
                    obj.id
                );
            }
            ensure!(
                (obj.y as usize) < GRID_HEIGHT,
                "object {i}: y {:#04x} outside the level",
                obj.y
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjusted_length() {
        assert_eq!(adjusted_length(None), 1);
        assert_eq!(adjusted_length(Some(0)), 1);
        assert_eq!(adjusted_length(Some(1)), 2);
        assert_eq!(adjusted_length(Some(-1)), -2);
        assert_eq!(adjusted_length(Some(-128)), -129);
        assert_eq!(adjusted_length(Some(127)), 128);
        assert_eq!(stored_length(2).unwrap(), 1);
        assert_eq!(stored_length(-2).unwrap(), -1);
        assert!(stored_length(0).is_err());
        assert!(stored_length(200).is_err());
    }

    #[test]
    fn test_screen_index() {
        assert_eq!(screen_index(0x10, 0x20), 0x21);
        assert_eq!(screen_index(0x05, 0x13), 0x10);
        assert_eq!(screen_index(0xFF, 0x7F), 0x7F);
        assert_eq!(screen_origin(0x35), (0x50, 0x30));
    }

    #[test]
    fn test_legacy_width() {
        let mut obj = Object::standard(0xC0, 0, 0, None, None);
        obj.ext_id = Some(0xFE);
        assert_eq!(obj.legacy_width_span(false), Some(-2));
        assert_eq!(obj.legacy_width_span(true), Some(0xFE));
        obj.ext_id = Some(0xFFF0);
        assert_eq!(obj.legacy_width_span(true), Some(-16));
        assert_eq!(Object::standard(0x01, 0, 0, None, None).legacy_width_span(true), None);
    }

    #[test]
    fn test_validate() {
        let mut sublevel = Sublevel::new(0, vec![Object::extended(0xFB, 5, 0x13)]);
        assert!(sublevel.validate().is_ok());

        sublevel.objects.push(Object {
            id: 0,
            ext_id: None,
            x: 0,
            y: 0,
            width: None,
            height: None,
        });
        assert!(sublevel.validate().is_err());

        let mut sublevel = Sublevel::new(0x12, vec![]);
        assert!(sublevel.validate().is_err());
        sublevel.header[HEADER_TILESET_FIELD] = 0x11;
        assert!(sublevel.validate().is_ok());

        let legacy = Object::standard(0xC1, 0, 0, Some(3), None);
        let sublevel = Sublevel::new(0, vec![legacy]);
        assert!(sublevel.validate().is_err());
    }

    #[test]
    fn test_sublevel_json() {
        let json = r#"{
            "header": [0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            "overflow": "error_tile",
            "objects": [
                {"id": 1, "x": 16, "y": 32, "width": 1, "height": 1},
                {"id": 0, "ext_id": 251, "x": 5, "y": 19}
            ]
        }"#;
        let sublevel: Sublevel = serde_json::from_str(json).unwrap();
        assert_eq!(sublevel.tileset(), 3);
        assert_eq!(sublevel.overflow, OverflowPolicy::ErrorTile);
        assert_eq!(sublevel.variant, AlgorithmVariant::Accuracy);
        assert_eq!(sublevel.objects[1].extended_id(), Some(0xFB));
        assert_eq!(sublevel.objects[0].adjusted_width(), 2);
        assert!(sublevel.validate().is_ok());
        assert_eq!("sidebar_safe".parse::<AlgorithmVariant>().unwrap(), AlgorithmVariant::SidebarSafe);
    }
}
