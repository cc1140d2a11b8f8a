//! The tile-write primitive.
//!
//! Every tile an object routine places goes through [`Painter::write_cell`],
//! which applies the overflow policy, follows screen links, allocates
//! screens and records the object's footprint.

use rand::{rngs::StdRng, seq::SliceRandom};
use thiserror::Error;
use tilegen_game::{
    screen_index, AlgorithmVariant, FormatVersion, Object, OverflowPolicy, ScreenIdx, TileCell,
    TileId, EMPTY_TILE, GRID_HEIGHT,
};

use crate::dynamic::{DynKey, DynamicTileTable};
use crate::grid::{screen_cells, ObjectFootprint, TileGrid};
use crate::range::{coord_range, wrap_offset, CoordRange};
use crate::screen::{ScreenMemory, ScreenStatus};

/// Tile value as routines pass it around. Negative values reserve a cell
/// without drawing anything.
pub type Tile = i32;
pub const RESERVE: Tile = -1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("write at ({x:#04x}, {y:#x}) is outside the level")]
    Overflow { x: u8, y: u16 },
    #[error("invalid geometry: {0}")]
    Geometry(String),
    #[error("object placed no tiles")]
    NoPrimaryTiles,
}

pub type PlacementResult = Result<(), PlacementError>;

/// Everything one render pass mutates, plus the pass-wide settings.
pub struct Canvas {
    pub grid: TileGrid,
    pub screens: ScreenMemory,
    pub dynamic: DynamicTileTable,
    pub policy: OverflowPolicy,
    pub variant: AlgorithmVariant,
    pub format: FormatVersion,
    pub wide_extension: bool,
    rng: StdRng,
}

impl Canvas {
    pub fn new(
        dynamic: DynamicTileTable,
        policy: OverflowPolicy,
        variant: AlgorithmVariant,
        format: FormatVersion,
        wide_extension: bool,
        rng: StdRng,
    ) -> Self {
        Canvas {
            grid: TileGrid::new(),
            screens: ScreenMemory::new(),
            dynamic,
            policy,
            variant,
            format,
            wide_extension,
            rng,
        }
    }

    pub fn y_wrap_bits(&self) -> u8 {
        self.policy.y_wrap_bits()
    }
}

/// Write context for a single object.
pub struct Painter<'a> {
    canvas: &'a mut Canvas,
    object: &'a Object,
    footprint: ObjectFootprint,
    overflowed: bool,
    undo: Vec<(u8, u8, TileCell)>,
    screens_before: ScreenMemory,
}

impl<'a> Painter<'a> {
    pub fn new(canvas: &'a mut Canvas, object: &'a Object) -> Self {
        let screens_before = canvas.screens.clone();
        Painter {
            canvas,
            object,
            footprint: ObjectFootprint::default(),
            overflowed: false,
            undo: Vec::new(),
            screens_before,
        }
    }

    pub fn object(&self) -> &Object {
        self.object
    }

    pub fn x(&self) -> u8 {
        self.object.x
    }

    pub fn y(&self) -> u16 {
        self.object.y as u16
    }

    /// Signed step count across the object's width (0 when absent).
    pub fn width_span(&self) -> i32 {
        match self.object.legacy_width_span(self.canvas.wide_extension) {
            Some(span) => span,
            None => self.object.width_span(),
        }
    }

    pub fn height_span(&self) -> i32 {
        self.object.height_span()
    }

    pub fn height_cells(&self) -> usize {
        self.height_span().unsigned_abs() as usize + 1
    }

    pub fn footprint(&self) -> &ObjectFootprint {
        &self.footprint
    }

    pub fn accuracy(&self) -> bool {
        self.canvas.variant == AlgorithmVariant::Accuracy
    }

    pub fn legacy_format(&self) -> bool {
        self.canvas.format == FormatVersion::Legacy
    }

    pub fn x_range(&self, start: u8, span: i32) -> impl Iterator<Item = u8> {
        coord_range(start as u16, span, 8).map(|x| x as u8)
    }

    pub fn y_range(&self, start: u16, span: i32) -> CoordRange {
        coord_range(start, span, self.canvas.y_wrap_bits())
    }

    pub fn dx(&self, x: u8, delta: i32) -> u8 {
        wrap_offset(x as u16, delta, 8) as u8
    }

    pub fn dy(&self, y: u16, delta: i32) -> u16 {
        wrap_offset(y, delta, self.canvas.y_wrap_bits())
    }

    pub fn in_bounds(&self, y: u16) -> bool {
        (y as usize) < GRID_HEIGHT
    }

    /// Internal identity of the tile at a cell; `EMPTY_TILE` outside the level.
    pub fn get_tile(&self, x: u8, y: u16) -> TileId {
        self.get_cell(x, y).internal()
    }

    pub fn get_cell(&self, x: u8, y: u16) -> TileCell {
        if !self.in_bounds(y) {
            return TileCell::default();
        }
        self.canvas.grid.get(x, y as u8)
    }

    pub fn is_empty(&self, x: u8, y: u16) -> bool {
        self.get_tile(x, y) == EMPTY_TILE
    }

    /// Thematic group of the tile at a cell, if it belongs to one.
    pub fn get_dynamic_tile(&self, x: u8, y: u16) -> Option<DynKey> {
        self.canvas.dynamic.reverse(self.get_tile(x, y))
    }

    pub fn dynamic(&self, key: DynKey) -> Tile {
        self.canvas.dynamic.forward(key) as Tile
    }

    pub fn is_land(&self, x: u8, y: u16) -> bool {
        self.get_dynamic_tile(x, y).is_some_and(DynKey::is_land)
    }

    pub fn set_tile(&mut self, tile: Tile, x: u8, y: u16) -> PlacementResult {
        self.set_tile_ex(tile, x, y, true, true)
    }

    pub fn set_tile_ex(
        &mut self,
        tile: Tile,
        x: u8,
        y: u16,
        priority: bool,
        highlight: bool,
    ) -> PlacementResult {
        let cell = u32::try_from(tile).ok().map(TileCell::Plain);
        self.write_cell(cell, x, y, priority, highlight)
    }

    /// The single funnel for grid mutation. `None` reserves the cell.
    pub fn write_cell(
        &mut self,
        cell: Option<TileCell>,
        x: u8,
        y: u16,
        priority: bool,
        highlight: bool,
    ) -> PlacementResult {
        let mut y = y;
        if !self.in_bounds(y) {
            if !priority {
                return Ok(());
            }
            match self.canvas.policy {
                OverflowPolicy::Exception => return Err(PlacementError::Overflow { x, y }),
                OverflowPolicy::Crop => return Ok(()),
                OverflowPolicy::ErrorTile => {
                    self.overflowed = true;
                    return Ok(());
                }
                // 7-bit ranges never leave the level, but offsets computed by
                // hand might.
                OverflowPolicy::Loop => y &= 0x7F,
            }
        }

        let (mut x, mut y) = (x, y as u8);
        let screen = screen_index(x, y);
        let dest_screen = self.canvas.screens.resolve(screen);
        if dest_screen != screen {
            x = ((dest_screen & 0x0F) << 4) | (x & 0x0F);
            y = (dest_screen & 0xF0) | (y & 0x0F);
        }

        if priority {
            self.canvas.screens.allocate(dest_screen);
        }

        self.footprint.record(x, y, highlight);

        if let Some(cell) = cell {
            let previous = self.canvas.grid.get(x, y);
            self.undo.push((x, y, previous));
            self.canvas.grid.set(x, y, cell);
        }
        Ok(())
    }

    pub fn links_back_to(&self, link: ScreenIdx, current: ScreenIdx) -> bool {
        self.canvas.screens.forms_cycle(link, current)
    }

    pub fn link_screen(&mut self, link: ScreenIdx, current: ScreenIdx) {
        self.canvas.screens.link(link, current);
    }

    pub fn disable_screen(&mut self, screen: ScreenIdx, status: ScreenStatus) {
        self.canvas.screens.disable(screen, status);
    }

    /// Replace the "all tiles" set with whole screens.
    pub fn claim_screens(&mut self, screens: &[ScreenIdx]) {
        self.footprint.all.clear();
        for &screen in screens {
            self.footprint.all.extend(screen_cells(screen));
        }
    }

    pub fn choose(&mut self, pool: &[Tile]) -> Tile {
        pool.choose(&mut self.canvas.rng).copied().unwrap_or(RESERVE)
    }

    pub fn choose_weighted(&mut self, pool: &[(Tile, u32)]) -> Result<Tile, PlacementError> {
        pool.choose_weighted(&mut self.canvas.rng, |&(_, weight)| weight)
            .map(|&(tile, _)| tile)
            .map_err(|e| PlacementError::Geometry(format!("bad tile weights: {e}")))
    }

    /// Paint a diagnostic cell over every nominal cell that lies inside the
    /// level. Never fails.
    pub fn paint_diagnostic(&mut self, cell: TileCell) {
        let cells: Vec<(u8, u16)> = if self.object.is_extended() {
            vec![(self.x(), self.y())]
        } else {
            let ys: Vec<u16> = self.y_range(self.y(), self.height_span()).collect();
            self.x_range(self.x(), self.width_span())
                .flat_map(|x| ys.iter().map(move |&y| (x, y)))
                .collect()
        };
        for (x, y) in cells {
            if self.in_bounds(y) {
                // In-bounds writes cannot fail.
                let _ = self.write_cell(Some(cell), x, y, true, true);
            }
        }
    }

    /// Keep what was written. Returns the footprint and whether any write was
    /// dropped under the error-tile policy.
    pub fn finish(self) -> (ObjectFootprint, bool) {
        (self.footprint, self.overflowed)
    }

    /// Undo every write and screen change made through this painter.
    pub fn rollback(self) {
        for &(x, y, previous) in self.undo.iter().rev() {
            self.canvas.grid.set(x, y, previous);
        }
        self.canvas.screens = self.screens_before;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn canvas(policy: OverflowPolicy) -> Canvas {
        Canvas::new(
            DynamicTileTable::new(0).unwrap(),
            policy,
            AlgorithmVariant::Accuracy,
            FormatVersion::Current,
            false,
            StdRng::seed_from_u64(0),
        )
    }

    #[test]
    fn test_write_allocates_and_records() {
        let mut canvas = canvas(OverflowPolicy::Exception);
        let obj = Object::standard(0x20, 0x10, 0x20, None, None);
        let mut p = Painter::new(&mut canvas, &obj);
        p.set_tile(0x0123, 0x10, 0x20).unwrap();
        p.set_tile_ex(0x0124, 0x11, 0x20, true, false).unwrap();
        let (footprint, overflowed) = p.finish();
        assert!(!overflowed);
        assert_eq!(footprint.primary.len(), 1);
        assert_eq!(footprint.all.len(), 2);
        assert_eq!(canvas.grid.get(0x10, 0x20), TileCell::Plain(0x0123));
        assert_eq!(canvas.screens.status(0x21), ScreenStatus::Allocated);
    }

    #[test]
    fn test_reserve_writes_nothing() {
        let mut canvas = canvas(OverflowPolicy::Exception);
        let obj = Object::extended(0xFB, 0, 0);
        let mut p = Painter::new(&mut canvas, &obj);
        p.set_tile(RESERVE, 0x40, 0x50).unwrap();
        let (footprint, _) = p.finish();
        assert!(footprint.primary.contains(&(0x40, 0x50)));
        assert!(canvas.grid.get(0x40, 0x50).is_empty());
        assert_eq!(canvas.screens.status(0x54), ScreenStatus::Allocated);
    }

    #[test]
    fn test_non_priority_write_does_not_allocate() {
        let mut canvas = canvas(OverflowPolicy::Exception);
        let obj = Object::standard(0x20, 0, 0, None, None);
        let mut p = Painter::new(&mut canvas, &obj);
        p.set_tile_ex(0x0100, 0x00, 0x00, false, true).unwrap();
        p.set_tile_ex(0x0100, 0x00, 0x90, false, true).unwrap();
        p.finish();
        assert_eq!(canvas.screens.status(0x00), ScreenStatus::Unallocated);
        assert_eq!(canvas.grid.get(0, 0), TileCell::Plain(0x0100));
    }

    #[test]
    fn test_overflow_policies() {
        let obj = Object::standard(0x20, 0, 0x7F, None, None);

        let mut c = canvas(OverflowPolicy::Exception);
        let mut p = Painter::new(&mut c, &obj);
        assert_eq!(
            p.set_tile(1, 0, 0x80),
            Err(PlacementError::Overflow { x: 0, y: 0x80 })
        );

        let mut c = canvas(OverflowPolicy::Crop);
        let mut p = Painter::new(&mut c, &obj);
        assert!(p.set_tile(1, 0, 0x80).is_ok());
        let (footprint, overflowed) = p.finish();
        assert!(footprint.all.is_empty());
        assert!(!overflowed);

        let mut c = canvas(OverflowPolicy::ErrorTile);
        let mut p = Painter::new(&mut c, &obj);
        assert!(p.set_tile(1, 0, 0x80).is_ok());
        assert!(p.finish().1);

        let mut c = canvas(OverflowPolicy::Loop);
        let p = Painter::new(&mut c, &obj);
        assert_eq!(p.dy(0x7F, 1), 0);
        let ys: Vec<u16> = p.y_range(0x7F, 1).collect();
        assert_eq!(ys, vec![0x7F, 0x00]);
    }

    #[test]
    fn test_writes_follow_links() {
        let mut canvas = canvas(OverflowPolicy::Exception);
        canvas.screens.link(0x35, 0x10);
        let obj = Object::standard(0x20, 0x52, 0x34, None, None);
        let mut p = Painter::new(&mut canvas, &obj);
        p.set_tile(0x0777, 0x52, 0x34).unwrap();
        let (footprint, _) = p.finish();
        assert_eq!(canvas.grid.get(0x02, 0x14), TileCell::Plain(0x0777));
        assert!(canvas.grid.get(0x52, 0x34).is_empty());
        assert!(footprint.primary.contains(&(0x02, 0x14)));
        assert_eq!(canvas.screens.status(0x10), ScreenStatus::Allocated);
        assert_eq!(canvas.screens.status(0x35), ScreenStatus::Linked);
    }

    #[test]
    fn test_rollback() {
        let mut canvas = canvas(OverflowPolicy::Exception);
        canvas.grid.set(1, 1, TileCell::Plain(0x0042));
        let obj = Object::standard(0x20, 1, 1, None, None);
        let mut p = Painter::new(&mut canvas, &obj);
        p.set_tile(0x0100, 1, 1).unwrap();
        p.set_tile(0x0101, 1, 1).unwrap();
        p.set_tile(0x0102, 0x20, 0x20).unwrap();
        p.rollback();
        assert_eq!(canvas.grid.get(1, 1), TileCell::Plain(0x0042));
        assert!(canvas.grid.get(0x20, 0x20).is_empty());
        assert_eq!(canvas.screens.active_count(), 0);
    }

    #[test]
    fn test_reads_outside_level_are_empty() {
        let mut canvas = canvas(OverflowPolicy::Exception);
        let obj = Object::standard(0x20, 0, 0, None, None);
        let p = Painter::new(&mut canvas, &obj);
        assert_eq!(p.get_tile(0, 0x90), EMPTY_TILE);
        assert_eq!(p.get_dynamic_tile(0, 0x90), None);
        assert!(!p.is_land(0, 0));
    }
}
