//! Per-ID placement routines.
//!
//! Routines are grouped by the shape they draw: flat tile fills, bordered
//! blocks and lines, slopes, terrain that blends with its neighbours,
//! structures, random decoration, and extended objects. Each module
//! registers its IDs with the dispatch table.

mod blocks;
mod bordered;
mod decoration;
mod extended;
mod slopes;
mod structures;
mod terrain;

use tilegen_game::ObjectId;

use crate::dispatch::DispatchTable;
use crate::shapes::RectCell;

pub use decoration::Pool;
pub use extended::random_pool;

pub(crate) fn register_all(table: &mut DispatchTable) {
    terrain::register(table);
    slopes::register(table);
    blocks::register(table);
    bordered::register(table);
    structures::register(table);
    decoration::register(table);
    extended::register(table);
}

/// Candidate pool of a decoration object that draws every cell at random.
pub fn decoration_pool(id: ObjectId) -> Option<Pool> {
    decoration::DECORATION_POOLS
        .iter()
        .find(|(pool_id, _)| *pool_id == id)
        .map(|&(_, pool)| pool)
}

/// Which sides of an object's box a cell lies on, as seen in the level
/// rather than in drawing order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Sides {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Sides {
    pub fn of(cell: &RectCell, w_span: i32, h_span: i32) -> Self {
        let first_col = cell.col == 0;
        let last_col = cell.col + 1 == cell.cols;
        let first_row = cell.row == 0;
        let last_row = cell.row + 1 == cell.rows;
        let (left, right) = if w_span < 0 {
            (last_col, first_col)
        } else {
            (first_col, last_col)
        };
        let (top, bottom) = if h_span < 0 {
            (last_row, first_row)
        } else {
            (first_row, last_row)
        };
        Sides {
            left,
            right,
            top,
            bottom,
        }
    }
}

/// Step that moves one cell in the object's drawing direction.
pub(crate) fn step(span: i32) -> i32 {
    if span < 0 {
        -1
    } else {
        1
    }
}
