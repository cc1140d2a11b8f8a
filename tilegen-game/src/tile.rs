use serde::{Deserialize, Serialize};

use crate::{Object, ObjectId};

pub type TileId = u32;

pub const EMPTY_TILE: TileId = 0x0000;

// Display identities at and above this value never come from level data; they
// mark diagnostics painted by the engine itself.
pub const DIAGNOSTIC_BASE: TileId = 0x1_0000;
pub const UNSUPPORTED_STANDARD_BASE: TileId = 0x1_0000; // + object id
pub const UNSUPPORTED_EXTENDED_BASE: TileId = 0x1_0100; // + extended id
pub const FAILED_STANDARD_BASE: TileId = 0x1_0200; // + object id
pub const FAILED_EXTENDED_BASE: TileId = 0x1_0300; // + extended id
pub const OVERFLOW_MARKER: TileId = 0x1_0400;

/// One cell of the layer-1 grid.
///
/// A `Tagged` cell keeps the identity that adjacency checks of later objects
/// see (`internal`) apart from the identity used for drawing (`display`).
/// Diagnostics rely on this: an error marker can be shown on top of a tile
/// while neighbouring objects still merge with the tile underneath.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileCell {
    Plain(TileId),
    Tagged { internal: TileId, display: TileId },
}

impl Default for TileCell {
    fn default() -> Self {
        TileCell::Plain(EMPTY_TILE)
    }
}

impl TileCell {
    pub fn internal(self) -> TileId {
        match self {
            TileCell::Plain(id) => id,
            TileCell::Tagged { internal, .. } => internal,
        }
    }

    pub fn display(self) -> TileId {
        match self {
            TileCell::Plain(id) => id,
            TileCell::Tagged { display, .. } => display,
        }
    }

    pub fn is_tagged(self) -> bool {
        matches!(self, TileCell::Tagged { .. })
    }

    pub fn is_empty(self) -> bool {
        self == TileCell::Plain(EMPTY_TILE)
    }

    /// Compare two cells the way the screen-link mirror and the editor see
    /// them: by what is drawn, ignoring the internal identity.
    pub fn same_display(self, other: TileCell) -> bool {
        self.display() == other.display()
    }

    /// Keep the internal identity but draw something else.
    pub fn retag(self, display: TileId) -> TileCell {
        TileCell::Tagged {
            internal: self.internal(),
            display,
        }
    }
}

impl From<TileId> for TileCell {
    fn from(id: TileId) -> Self {
        TileCell::Plain(id)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    UnsupportedStandard(ObjectId),
    UnsupportedExtended(u8),
    FailedStandard(ObjectId),
    FailedExtended(u8),
    Overflow,
}

impl Diagnostic {
    pub fn from_display(display: TileId) -> Option<Diagnostic> {
        if display < DIAGNOSTIC_BASE {
            return None;
        }
        let low = (display & 0xFF) as u8;
        match display & !0xFF {
            UNSUPPORTED_STANDARD_BASE => Some(Diagnostic::UnsupportedStandard(low)),
            UNSUPPORTED_EXTENDED_BASE => Some(Diagnostic::UnsupportedExtended(low)),
            FAILED_STANDARD_BASE => Some(Diagnostic::FailedStandard(low)),
            FAILED_EXTENDED_BASE => Some(Diagnostic::FailedExtended(low)),
            OVERFLOW_MARKER => Some(Diagnostic::Overflow),
            _ => None,
        }
    }
}

// Diagnostic cells read as empty to later objects: a broken object must not
// make its neighbours merge with tiles it never managed to place.
fn diagnostic_cell(display: TileId) -> TileCell {
    TileCell::Tagged {
        internal: EMPTY_TILE,
        display,
    }
}

/// Tile painted by the dispatch table for an ID that has no placement routine.
pub fn unsupported_object_tile(object: &Object) -> TileCell {
    match object.ext_id {
        Some(ext_id) if object.is_extended() => {
            diagnostic_cell(UNSUPPORTED_EXTENDED_BASE + (ext_id & 0xFF))
        }
        _ => diagnostic_cell(UNSUPPORTED_STANDARD_BASE + object.id as TileId),
    }
}

/// Tile painted in place of an object whose routine failed.
pub fn failed_object_tile(object: &Object) -> TileCell {
    match object.ext_id {
        Some(ext_id) if object.is_extended() => diagnostic_cell(FAILED_EXTENDED_BASE + (ext_id & 0xFF)),
        _ => diagnostic_cell(FAILED_STANDARD_BASE + object.id as TileId),
    }
}
