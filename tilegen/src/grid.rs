use hashbrown::HashSet;
use tilegen_game::{
    screen_origin, ScreenIdx, TileCell, GRID_HEIGHT, GRID_WIDTH, SCREEN_SIZE,
};

pub type Coord = (u8, u8); // (x, y) of a grid cell

/// The layer-1 cell array: 256 columns by 128 rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    cells: Vec<TileCell>,
}

impl Default for TileGrid {
    fn default() -> Self {
        TileGrid {
            cells: vec![TileCell::default(); GRID_WIDTH * GRID_HEIGHT],
        }
    }
}

impl TileGrid {
    pub fn new() -> Self {
        Self::default()
    }

    fn offset(x: u8, y: u8) -> usize {
        debug_assert!((y as usize) < GRID_HEIGHT);
        (y as usize % GRID_HEIGHT) * GRID_WIDTH + x as usize
    }

    pub fn get(&self, x: u8, y: u8) -> TileCell {
        self.cells[Self::offset(x, y)]
    }

    pub fn set(&mut self, x: u8, y: u8, cell: TileCell) {
        self.cells[Self::offset(x, y)] = cell;
    }

    pub fn row(&self, y: u8) -> &[TileCell] {
        let start = Self::offset(0, y);
        &self.cells[start..start + GRID_WIDTH]
    }

    pub fn is_row_empty(&self, y: u8) -> bool {
        self.row(y).iter().all(|c| c.is_empty())
    }

    /// Copy one screen's 16x16 block over another's, cell by cell.
    pub fn copy_screen(&mut self, from: ScreenIdx, to: ScreenIdx) {
        let (fx, fy) = screen_origin(from);
        let (tx, ty) = screen_origin(to);
        for dy in 0..SCREEN_SIZE as u8 {
            for dx in 0..SCREEN_SIZE as u8 {
                let cell = self.get(fx + dx, fy + dy);
                self.set(tx + dx, ty + dy, cell);
            }
        }
    }

    /// True when every cell of the two screens draws the same tile.
    pub fn screens_match(&self, a: ScreenIdx, b: ScreenIdx) -> bool {
        screen_cells(a)
            .zip(screen_cells(b))
            .all(|((ax, ay), (bx, by))| self.get(ax, ay).same_display(self.get(bx, by)))
    }
}

/// Every cell of a screen, row-major.
pub fn screen_cells(screen: ScreenIdx) -> impl Iterator<Item = Coord> {
    let (x0, y0) = screen_origin(screen);
    (0..SCREEN_SIZE as u8)
        .flat_map(move |dy| (0..SCREEN_SIZE as u8).map(move |dx| (x0 + dx, y0 + dy)))
}

/// Cells touched by one object during the render pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectFootprint {
    /// Cells that select the object in the editor.
    pub primary: HashSet<Coord>,
    /// Every cell the object wrote or reserved.
    pub all: HashSet<Coord>,
    pub last: Option<Coord>,
}

impl ObjectFootprint {
    pub fn record(&mut self, x: u8, y: u8, highlight: bool) {
        self.all.insert((x, y));
        if highlight {
            self.primary.insert((x, y));
            self.last = Some((x, y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_screen() {
        let mut grid = TileGrid::new();
        grid.set(0x00, 0x10, TileCell::Plain(0x1400));
        grid.set(0x0F, 0x1F, TileCell::Plain(0x1401));
        grid.copy_screen(0x10, 0x35);
        assert_eq!(grid.get(0x50, 0x30), TileCell::Plain(0x1400));
        assert_eq!(grid.get(0x5F, 0x3F), TileCell::Plain(0x1401));
        assert!(grid.screens_match(0x10, 0x35));
        assert!(!grid.screens_match(0x10, 0x36));
    }

    #[test]
    fn test_screen_cells() {
        let cells: Vec<Coord> = screen_cells(0x21).collect();
        assert_eq!(cells.len(), 256);
        assert_eq!(cells[0], (0x10, 0x20));
        assert_eq!(cells[17], (0x11, 0x21));
        assert_eq!(cells[255], (0x1F, 0x2F));
    }

    #[test]
    fn test_footprint() {
        let mut footprint = ObjectFootprint::default();
        footprint.record(1, 2, false);
        footprint.record(3, 4, true);
        assert_eq!(footprint.all.len(), 2);
        assert_eq!(footprint.primary.len(), 1);
        assert_eq!(footprint.last, Some((3, 4)));
    }
}
