//! Objects that fill their box with one tile or a short repeating run of
//! tiles.

use tilegen_game::ObjectId;

use crate::dispatch::DispatchTable;
use crate::painter::Tile;
use crate::shapes::{FillOrder, TileSource};

struct BlockFill {
    id: ObjectId,
    order: FillOrder,
    tiles: &'static [Tile],
}

const fn rows(id: ObjectId, tiles: &'static [Tile]) -> BlockFill {
    BlockFill {
        id,
        order: FillOrder::RowMajor,
        tiles,
    }
}

const fn columns(id: ObjectId, tiles: &'static [Tile]) -> BlockFill {
    BlockFill {
        id,
        order: FillOrder::ColumnMajor,
        tiles,
    }
}

const BLOCK_FILLS: &[BlockFill] = &[
    rows(0x20, &[0x0100]), // used block
    rows(0x21, &[0x0101]), // brick
    rows(0x22, &[0x0102]), // cement
    rows(0x23, &[0x0103]), // wooden crate
    rows(0x24, &[0x0104]), // stone block
    rows(0x25, &[0x0105]), // ice block
    rows(0x26, &[0x0106]), // coin
    rows(0x27, &[0x0107]), // blue coin
    rows(0x28, &[0x0108]), // spikes
    rows(0x29, &[0x0109]), // ceiling spikes
    rows(0x2A, &[0x010A]), // lava surface
    rows(0x2B, &[0x010B]), // lava
    rows(0x2C, &[0x010C]), // water surface
    rows(0x2D, &[0x010D]), // water
    rows(0x2E, &[0x010E]), // mud
    rows(0x2F, &[0x010F]), // sand
    rows(0x30, &[0x0110, 0x0111]), // checkered floor
    rows(0x31, &[0x0112, 0x0113]), // girder mesh
    rows(0x32, &[0x0114, 0x0115, 0x0116]), // conveyor, rightwards
    rows(0x33, &[0x0116, 0x0115, 0x0114]), // conveyor, leftwards
    rows(0x34, &[0x0117, 0x0118]), // castle floor
    rows(0x35, &[0x0119, 0x011A, 0x011B, 0x011C]), // ice bricks
    columns(0x36, &[0x0120, 0x0121]), // rope
    columns(0x37, &[0x0122, 0x0123]), // bamboo
    columns(0x38, &[0x0124, 0x0125, 0x0126]), // chain link
    columns(0x39, &[0x0127, 0x0128]), // tree trunk
    columns(0x3A, &[0x0129, 0x012A]), // pole
    columns(0x3B, &[0x012B, 0x012C, 0x012D]), // climbing net
    rows(0x40, &[0x0140]), // background brick
    rows(0x41, &[0x0141]), // background stone
    rows(0x42, &[0x0142]), // background wood
    rows(0x43, &[0x0143]), // dark background
    rows(0x44, &[0x0144]), // flip panel
    rows(0x45, &[0x0145]), // on/off block
    rows(0x46, &[0x0146]), // cloud platform
    rows(0x47, &[0x0147]), // mesh platform
    rows(0x48, &[0x0148, 0x0149]), // window
    rows(0x49, &[0x014A, 0x014B]), // curtain
    rows(0x4A, &[0x014C, 0x014D, 0x014E]), // bookshelf
    rows(0x4B, &[0x014F, 0x0150]), // tatami
    columns(0x4C, &[0x0151, 0x0152]), // waterfall streak
    columns(0x4D, &[0x0153, 0x0154]), // light beam
    columns(0x4E, &[0x0155, 0x0156, 0x0157]), // drip
    columns(0x4F, &[0x0158, 0x0159]), // pillar shadow
    columns(0x9C, &[0x0160, 0x0161]), // background chain
    columns(0x9D, &[0x0162, 0x0163]), // background rope
    columns(0x9E, &[0x0164, 0x0165, 0x0166]), // pipe stack
    columns(0x9F, &[0x0167, 0x0168]), // hanging moss
    rows(0xC2, &[0x0300]), // poison water
    rows(0xC3, &[0x0301]), // poison water surface
    rows(0xC4, &[0x0302]), // quicksand
    rows(0xC5, &[0x0303]), // quicksand surface
    rows(0xC6, &[0x0304]), // invisible solid
    rows(0xC7, &[0x0305]), // invisible coin
    rows(0xC8, &[0x0306]), // slippery cement
    rows(0xC9, &[0x0307]), // black void
    rows(0xCA, &[0x0308, 0x0309]), // warning stripes
    rows(0xCB, &[0x030A, 0x030B]), // grate
    rows(0xCC, &[0x030C, 0x030D, 0x030E, 0x030F]), // lights
    columns(0xCD, &[0x0310, 0x0311]), // cable
    columns(0xCE, &[0x0312, 0x0313]), // pipe rungs
    columns(0xCF, &[0x0314, 0x0315, 0x0316]), // icicle run
    rows(0xF0, &[0x0320]), // hidden block
    rows(0xF1, &[0x0321]), // note block
    rows(0xF2, &[0x0322]), // donut block
    rows(0xF3, &[0x0323]), // glass
    rows(0xF4, &[0x0324]), // gold block
    rows(0xF5, &[0x0325]), // cloud block
    rows(0xF6, &[0x0326]), // sand block
    rows(0xF7, &[0x0327]), // crumbling rock
    rows(0xF8, &[0x0328, 0x0329]), // tiled roof
    rows(0xF9, &[0x032A, 0x032B]), // hay bales
    rows(0xFA, &[0x032C, 0x032D, 0x032E]), // conveyor, fast
    rows(0xFB, &[0x0330, 0x0331, 0x0332, 0x0333]), // stained glass
    columns(0xFC, &[0x0334, 0x0335]), // bead curtain
    columns(0xFD, &[0x0336, 0x0337, 0x0338]), // lava drip
    columns(0xFE, &[0x0339, 0x033A]), // support beam
];

pub(super) fn register(table: &mut DispatchTable) {
    for fill in BLOCK_FILLS {
        let (order, tiles) = (fill.order, fill.tiles);
        table.register_standard(fill.id, move |p| {
            let source = match tiles {
                [tile] => TileSource::Constant(*tile),
                _ => TileSource::Cycle(tiles),
            };
            p.fill_rect(p.x(), p.y(), p.width_span(), p.height_span(), order, source)
        });
    }
}
