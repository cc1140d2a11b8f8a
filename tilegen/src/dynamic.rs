//! Per-tileset mapping between thematic tile groups and concrete tile IDs.
//!
//! Standard objects that draw terrain never name a concrete tile: they ask for
//! "the land surface" and the table answers for the sublevel's tileset. The
//! reverse direction lets routines ask what an already-placed tile *is* when
//! deciding how to blend with it.

use anyhow::{ensure, Result};
use hashbrown::HashMap;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use tilegen_game::{TileId, TilesetIdx, MAX_TILESET};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
#[repr(u8)]
pub enum DynKey {
    Surface,
    Interior,
    EdgeLeft,
    EdgeRight,
    CornerLeft,
    CornerRight,
    InnerCornerLeft,
    InnerCornerRight,
    Ceiling,
    CeilingLeft,
    CeilingRight,
    SteepUp,
    SteepUpFill,
    SteepDown,
    SteepDownFill,
    GentleUpLow,
    GentleUpHigh,
    GentleUpFill,
    GentleDownHigh,
    GentleDownLow,
    GentleDownFill,
    Wall,
    WallCap,
    WallBase,
    SurfaceDecor,
    Underside,
}

impl DynKey {
    /// Solid ground of any shape.
    pub fn is_land(self) -> bool {
        !matches!(
            self,
            DynKey::Wall | DynKey::WallCap | DynKey::WallBase | DynKey::SurfaceDecor
        )
    }

    /// Ground whose top side is open.
    pub fn is_walkable_top(self) -> bool {
        matches!(
            self,
            DynKey::Surface
                | DynKey::CornerLeft
                | DynKey::CornerRight
                | DynKey::SteepUp
                | DynKey::SteepDown
                | DynKey::GentleUpLow
                | DynKey::GentleUpHigh
                | DynKey::GentleDownHigh
                | DynKey::GentleDownLow
        )
    }

    pub fn is_wall(self) -> bool {
        matches!(self, DynKey::Wall | DynKey::WallCap | DynKey::WallBase)
    }
}

const VARIANT_COUNT: usize = 16;

// First concrete tile of each variant's dynamic page.
const VARIANT_BASE: [u16; VARIANT_COUNT] = [
    0x1400, // 0x00 grassland
    0x1440, // 0x01 forest
    0x1480, // 0x02 cave
    0x14C0, // 0x03 snow
    0x1500, // 0x04 jungle
    0x1540, // 0x05 castle
    0x1580, // 0x06 flower field
    0x15C0, // 0x07 sky
    0x1600, // 0x08 lava cave
    0x1640, // 0x09 sewer
    0x1680, // 0x0A ruins
    0x16C0, // 0x0B crystal cave
    0x1700, // 0x0C desert
    0x1740, // 0x0D fort
    0x1780, // 0x0E swamp
    0x17C0, // 0x0F night
];

// Shared stonework used by the castle and fort variants.
const STONE_WALL: u16 = 0x1800;
const STONE_WALL_CAP: u16 = 0x1801;
const STONE_WALL_BASE: u16 = 0x1802;

// Variants that draw a group with a tile from outside their own page, or with
// a tile of another group on their own page.
const OVERRIDES: &[(u8, DynKey, u16)] = &[
    // Sky platforms have no distinct underside: ceilings show the interior.
    (0x07, DynKey::Ceiling, 0x15C1),
    (0x07, DynKey::CeilingLeft, 0x15C1),
    (0x07, DynKey::CeilingRight, 0x15C1),
    (0x07, DynKey::Underside, 0x15C1),
    (0x05, DynKey::Wall, STONE_WALL),
    (0x05, DynKey::WallCap, STONE_WALL_CAP),
    (0x05, DynKey::WallBase, STONE_WALL_BASE),
    (0x0D, DynKey::Wall, STONE_WALL),
    (0x0D, DynKey::WallCap, STONE_WALL_CAP),
    (0x0D, DynKey::WallBase, STONE_WALL_BASE),
    // Castle floors are flat stone: gentle slopes reuse the steep pieces.
    (0x05, DynKey::GentleUpLow, 0x154B),
    (0x05, DynKey::GentleUpHigh, 0x154B),
    (0x05, DynKey::GentleDownHigh, 0x154D),
    (0x05, DynKey::GentleDownLow, 0x154D),
    // Snow banks have no grass decoration.
    (0x03, DynKey::SurfaceDecor, 0x14C0),
];

pub struct DynamicTileTable {
    tileset: TilesetIdx,
    forward: HashMap<DynKey, TileId>,
    reverse: HashMap<TileId, DynKey>,
}

impl DynamicTileTable {
    pub fn new(tileset: TilesetIdx) -> Result<Self> {
        ensure!(tileset <= MAX_TILESET, "tileset {tileset:#x} has no dynamic tile table");
        // Selectors 0x10 and 0x11 reuse the layouts of 0x00 and 0x01.
        let variant = (tileset as usize % VARIANT_COUNT) as u8;
        let base = VARIANT_BASE[variant as usize] as TileId;

        let mut forward: HashMap<DynKey, TileId> = HashMap::new();
        for key in DynKey::iter() {
            forward.insert(key, base + key as TileId);
        }
        for &(v, key, tile) in OVERRIDES {
            if v == variant {
                forward.insert(key, tile as TileId);
            }
        }

        // Keys that share a tile reverse to the first key in declaration order.
        let mut reverse: HashMap<TileId, DynKey> = HashMap::new();
        for key in DynKey::iter() {
            reverse.entry(forward[&key]).or_insert(key);
        }

        Ok(DynamicTileTable {
            tileset,
            forward,
            reverse,
        })
    }

    pub fn tileset(&self) -> TilesetIdx {
        self.tileset
    }

    pub fn forward(&self, key: DynKey) -> TileId {
        self.forward[&key]
    }

    pub fn reverse(&self, tile: TileId) -> Option<DynKey> {
        self.reverse.get(&tile).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_plain_variant() {
        let table = DynamicTileTable::new(0).unwrap();
        assert_eq!(table.forward(DynKey::Surface), 0x1400);
        assert_eq!(table.forward(DynKey::Interior), 0x1401);
        for key in DynKey::iter() {
            assert_eq!(table.reverse(table.forward(key)), Some(key));
        }
    }

    #[test]
    fn test_reverse_misses_are_none() {
        let table = DynamicTileTable::new(2).unwrap();
        assert_eq!(table.reverse(0), None);
        assert_eq!(table.reverse(0x1400), None); // another variant's surface
        assert_eq!(table.reverse(0xFFFF_FFFF), None);
    }

    #[test]
    fn test_shared_tiles_reverse_to_first_key() {
        let table = DynamicTileTable::new(7).unwrap();
        assert_eq!(table.forward(DynKey::Ceiling), table.forward(DynKey::Interior));
        assert_eq!(table.reverse(table.forward(DynKey::Underside)), Some(DynKey::Interior));

        let castle = DynamicTileTable::new(5).unwrap();
        let fort = DynamicTileTable::new(0x0D).unwrap();
        assert_eq!(castle.forward(DynKey::Wall), fort.forward(DynKey::Wall));
        assert_eq!(castle.reverse(STONE_WALL as TileId), Some(DynKey::Wall));
    }

    #[test]
    fn test_folded_selectors() {
        let a = DynamicTileTable::new(0x11).unwrap();
        let b = DynamicTileTable::new(0x01).unwrap();
        assert_eq!(a.forward(DynKey::Surface), b.forward(DynKey::Surface));
        assert_eq!(a.tileset(), 0x11);
        assert!(DynamicTileTable::new(0x12).is_err());
    }
}
