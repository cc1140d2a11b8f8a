//! Row, column and rectangle helpers built on the tile-write primitive.

use crate::painter::{Painter, PlacementError, PlacementResult, Tile};

/// Where a cell sits within a rectangle.
///
/// Rectangles one cell tall or wide classify as lines and a single cell
/// as a point, so routines can give degenerate shapes their own tiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RectPosition {
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
    RowStart,
    RowMiddle,
    RowEnd,
    ColumnStart,
    ColumnMiddle,
    ColumnEnd,
    Single,
}

impl RectPosition {
    /// Index into a flat tile table for this position's shape class:
    /// 0..9 row-major for blocks, 0..3 for lines, 0 for a single cell.
    pub fn index(self) -> usize {
        match self {
            RectPosition::TopLeft => 0,
            RectPosition::Top => 1,
            RectPosition::TopRight => 2,
            RectPosition::Left => 3,
            RectPosition::Center => 4,
            RectPosition::Right => 5,
            RectPosition::BottomLeft => 6,
            RectPosition::Bottom => 7,
            RectPosition::BottomRight => 8,
            RectPosition::RowStart | RectPosition::ColumnStart => 0,
            RectPosition::RowMiddle | RectPosition::ColumnMiddle => 1,
            RectPosition::RowEnd | RectPosition::ColumnEnd => 2,
            RectPosition::Single => 0,
        }
    }
}

/// Classify cell (`col`, `row`) of a `cols` x `rows` rectangle. Indices count
/// in drawing order, so a negative-width object's first column is its left
/// edge.
pub fn classify(col: usize, row: usize, cols: usize, rows: usize) -> RectPosition {
    fn line(i: usize, n: usize) -> usize {
        if i == 0 {
            0
        } else if i + 1 == n {
            2
        } else {
            1
        }
    }
    match (cols, rows) {
        (1, 1) => RectPosition::Single,
        (_, 1) => [
            RectPosition::RowStart,
            RectPosition::RowMiddle,
            RectPosition::RowEnd,
        ][line(col, cols)],
        (1, _) => [
            RectPosition::ColumnStart,
            RectPosition::ColumnMiddle,
            RectPosition::ColumnEnd,
        ][line(row, rows)],
        _ => [
            RectPosition::TopLeft,
            RectPosition::Top,
            RectPosition::TopRight,
            RectPosition::Left,
            RectPosition::Center,
            RectPosition::Right,
            RectPosition::BottomLeft,
            RectPosition::Bottom,
            RectPosition::BottomRight,
        ][line(row, rows) * 3 + line(col, cols)],
    }
}

/// Tiles for a 9-way bordered block plus its degenerate shapes.
#[derive(Copy, Clone, Debug)]
pub struct BorderedBlock {
    pub block: [Tile; 9],
    pub row: [Tile; 3],
    pub column: [Tile; 3],
    pub single: Tile,
}

impl BorderedBlock {
    pub fn tile(&self, position: RectPosition) -> Tile {
        match position {
            RectPosition::Single => self.single,
            RectPosition::RowStart | RectPosition::RowMiddle | RectPosition::RowEnd => {
                self.row[position.index()]
            }
            RectPosition::ColumnStart | RectPosition::ColumnMiddle | RectPosition::ColumnEnd => {
                self.column[position.index()]
            }
            _ => self.block[position.index()],
        }
    }
}

/// A row or column with distinct ends and a cycling middle.
#[derive(Copy, Clone, Debug)]
pub struct BorderedLine {
    pub first: Tile,
    pub middle: &'static [Tile],
    pub last: Tile,
    pub single: Tile,
}

impl BorderedLine {
    pub fn tile(&self, i: usize, n: usize) -> Tile {
        if n == 1 {
            self.single
        } else if i == 0 {
            self.first
        } else if i + 1 == n {
            self.last
        } else if self.middle.is_empty() {
            self.first
        } else {
            self.middle[(i - 1) % self.middle.len()]
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FillOrder {
    RowMajor,
    ColumnMajor,
}

/// One cell of a rectangle fill, as handed to a tile generator.
#[derive(Copy, Clone, Debug)]
pub struct RectCell {
    pub col: usize,
    pub row: usize,
    pub cols: usize,
    pub rows: usize,
    pub x: u8,
    pub y: u16,
    pub position: RectPosition,
    /// Visit number within the fill.
    pub seq: usize,
}

pub enum TileSource<'g> {
    Constant(Tile),
    /// Cycles in visit order.
    Cycle(&'g [Tile]),
}

impl<'a> Painter<'a> {
    pub fn fill_row(&mut self, tile: Tile, x: u8, y: u16, span: i32) -> PlacementResult {
        for x in self.x_range(x, span) {
            self.set_tile(tile, x, y)?;
        }
        Ok(())
    }

    pub fn fill_column(&mut self, tile: Tile, x: u8, y: u16, span: i32) -> PlacementResult {
        for y in self.y_range(y, span) {
            self.set_tile(tile, x, y)?;
        }
        Ok(())
    }

    pub fn bordered_row(&mut self, line: &BorderedLine, x: u8, y: u16, span: i32) -> PlacementResult {
        let n = span.unsigned_abs() as usize + 1;
        for (i, x) in self.x_range(x, span).enumerate() {
            self.set_tile(line.tile(i, n), x, y)?;
        }
        Ok(())
    }

    pub fn bordered_column(
        &mut self,
        line: &BorderedLine,
        x: u8,
        y: u16,
        span: i32,
    ) -> PlacementResult {
        let n = span.unsigned_abs() as usize + 1;
        for (i, y) in self.y_range(y, span).enumerate() {
            self.set_tile(line.tile(i, n), x, y)?;
        }
        Ok(())
    }

    pub fn fill_rect(
        &mut self,
        x: u8,
        y: u16,
        w_span: i32,
        h_span: i32,
        order: FillOrder,
        source: TileSource<'_>,
    ) -> PlacementResult {
        match source {
            TileSource::Constant(tile) => {
                self.fill_rect_with(x, y, w_span, h_span, order, |_, _| Ok(tile))
            }
            TileSource::Cycle(tiles) => {
                if tiles.is_empty() {
                    return Err(PlacementError::Geometry("empty tile cycle".to_string()));
                }
                self.fill_rect_with(x, y, w_span, h_span, order, |_, cell| {
                    Ok(tiles[cell.seq % tiles.len()])
                })
            }
        }
    }

    /// Fill a rectangle, asking `generate` for each cell's tile just before
    /// it is written. The generator sees everything written so far, which is
    /// how routines blend with their neighbours.
    pub fn fill_rect_with<F>(
        &mut self,
        x: u8,
        y: u16,
        w_span: i32,
        h_span: i32,
        order: FillOrder,
        mut generate: F,
    ) -> PlacementResult
    where
        F: FnMut(&mut Self, RectCell) -> Result<Tile, PlacementError>,
    {
        let cols = w_span.unsigned_abs() as usize + 1;
        let rows = h_span.unsigned_abs() as usize + 1;
        let xs: Vec<u8> = self.x_range(x, w_span).collect();
        let ys: Vec<u16> = self.y_range(y, h_span).collect();

        let visit: Vec<(usize, usize)> = match order {
            FillOrder::RowMajor => (0..rows)
                .flat_map(|row| (0..cols).map(move |col| (col, row)))
                .collect(),
            FillOrder::ColumnMajor => (0..cols)
                .flat_map(|col| (0..rows).map(move |row| (col, row)))
                .collect(),
        };

        for (seq, (col, row)) in visit.into_iter().enumerate() {
            let cell = RectCell {
                col,
                row,
                cols,
                rows,
                x: xs[col],
                y: ys[row],
                position: classify(col, row, cols, rows),
                seq,
            };
            let tile = generate(self, cell)?;
            self.set_tile(tile, cell.x, cell.y)?;
        }
        Ok(())
    }

    /// Fill with a 9-way classified tile set, row-major.
    pub fn bordered_rect(
        &mut self,
        block: &BorderedBlock,
        x: u8,
        y: u16,
        w_span: i32,
        h_span: i32,
    ) -> PlacementResult {
        self.fill_rect_with(x, y, w_span, h_span, FillOrder::RowMajor, |_, cell| {
            Ok(block.tile(cell.position))
        })
    }
}
