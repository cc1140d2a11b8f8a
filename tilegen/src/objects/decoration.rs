//! Randomised decoration. Each cell is drawn from a fixed pool of candidate
//! tiles, uniformly or with fixed weights; which candidate lands where
//! depends on the pass's random source.

use tilegen_game::ObjectId;

use crate::dispatch::DispatchTable;
use crate::dynamic::DynKey;
use crate::objects::Sides;
use crate::painter::{Painter, PlacementResult, Tile};
use crate::shapes::FillOrder;

/// Candidate tiles with their relative weights.
pub type Pool = &'static [(Tile, u32)];

/// Objects that draw every one of their cells from a single pool.
pub(crate) const DECORATION_POOLS: [(ObjectId, Pool); 40] = [
    (0xA0, &[(0x0900, 6), (0x0901, 3), (0x0902, 1)]), // grass tufts
    (0xA1, &[(0x0904, 1), (0x0905, 1), (0x0906, 1)]), // pebbles
    (0xA2, &[(0x0908, 8), (0x0909, 1)]), // star field
    (0xA3, &[(0x0101, 3), (0x090C, 1)]), // cracked bricks
    (0xA4, &[(0x0910, 4), (0x0911, 2), (0x0912, 1), (0x0913, 1)]), // cave wall
    (0xA5, &[(0x010F, 5), (0x0914, 1)]), // dunes
    (0xA6, &[(0x0918, 3), (0x0919, 1)]), // snow drift
    (0xA7, &[(0x091C, 1), (0x091D, 1), (0x091E, 1), (0x091F, 1)]), // leaves
    (0xA8, &[(0x010B, 9), (0x0920, 1)]), // bubbling lava
    (0xA9, &[(0x010D, 9), (0x0924, 1)]), // glinting water
    (0xAA, &[(0x0104, 3), (0x0928, 1)]), // mossy stone
    (0xAB, &[(0x092C, 2), (0x092D, 2), (0x092E, 1)]), // crystals
    (0xAC, &[(0x0106, 1), (0x0100, 1)]), // coin scatter
    (0xAD, &[(0x0930, 3), (0x0931, 2), (0x0932, 1)]), // rubble
    (0xAE, &[(0x0934, 1), (0x0935, 1)]), // reeds
    (0xAF, &[(0x0938, 12), (0x0939, 2), (0x093A, 1)]), // night sky
    (0xB0, &[(0x0940, 1), (0x0941, 1), (0x0942, 1)]), // flowers
    (0xB1, &[(0x0944, 2), (0x0945, 1)]), // tulips
    (0xB2, &[(0x0948, 1), (0x0949, 1), (0x094A, 1), (0x094B, 1)]), // wildflowers
    (0xB3, &[(0x094C, 3), (0x094D, 1)]), // mushrooms
    (0xBC, &[(0x0980, 1), (0x0981, 1)]), // small clouds
    (0xBD, &[(0x0984, 2), (0x0985, 1), (0x0986, 1)]), // large clouds
    (0xBE, &[(0x0988, 1), (0x0989, 1)]), // fog
    (0xBF, &[(0x098C, 4), (0x098D, 1)]), // storm clouds
    (0xE0, &[(0x09A0, 3), (0x09A1, 1)]), // cobblestones
    (0xE1, &[(0x09A4, 1), (0x09A5, 1), (0x09A6, 1)]), // roof tiles
    (0xE2, &[(0x0103, 4), (0x09A8, 1)]), // stacked crates
    (0xE3, &[(0x09AC, 5), (0x09AD, 2), (0x09AE, 1)]), // seabed
    (0xE4, &[(0x09B0, 1), (0x09B1, 1)]), // coral
    (0xE5, &[(0x0105, 6), (0x09B4, 1)]), // frosted ice
    (0xE6, &[(0x09B8, 2), (0x09B9, 1), (0x09BA, 1)]), // embers
    (0xE7, &[(0x09BC, 1), (0x09BD, 1), (0x09BE, 1), (0x09BF, 1)]), // autumn leaves
    (0xE8, &[(0x010E, 4), (0x09C0, 1)]), // puddled mud
    (0xE9, &[(0x09C4, 3), (0x09C5, 1)]), // bones
    (0xEA, &[(0x09C8, 8), (0x09C9, 1), (0x09CA, 1)]), // cave glow
    (0xEB, &[(0x09CC, 1), (0x09CD, 1)]), // vines
    (0xEC, &[(0x0102, 5), (0x09D0, 1)]), // weathered cement
    (0xED, &[(0x09D4, 2), (0x09D5, 2), (0x09D6, 1)]), // gems
    (0xEE, &[(0x09D8, 1), (0x09D9, 1)]), // sparkles
    (0xEF, &[(0x09DC, 10), (0x09DD, 1)]), // dusk sky
];

struct Tree {
    id: ObjectId,
    trunk: Tile,
    canopy: Pool,
}

const TREES: [Tree; 4] = [
    Tree {
        id: 0xB4,
        trunk: 0x0950,
        canopy: &[(0x0951, 2), (0x0952, 1)],
    },
    Tree {
        id: 0xB5,
        trunk: 0x0954,
        canopy: &[(0x0955, 1), (0x0956, 1)],
    },
    Tree {
        id: 0xB6,
        trunk: 0x0958,
        canopy: &[(0x0959, 3), (0x095A, 1)],
    },
    Tree {
        id: 0xB7,
        trunk: 0x095C,
        canopy: &[(0x095D, 1)],
    },
];

struct Bush {
    id: ObjectId,
    left: Tile,
    right: Tile,
    middle: Pool,
}

const BUSHES: [Bush; 4] = [
    Bush {
        id: 0xB8,
        left: 0x0960,
        right: 0x0961,
        middle: &[(0x0962, 2), (0x0963, 1)],
    },
    Bush {
        id: 0xB9,
        left: 0x0964,
        right: 0x0965,
        middle: &[(0x0966, 1), (0x0967, 1)],
    },
    Bush {
        id: 0xBA,
        left: 0x0968,
        right: 0x0969,
        middle: &[(0x096A, 1), (0x096B, 1), (0x096C, 1)],
    },
    Bush {
        id: 0xBB,
        left: 0x096D,
        right: 0x096E,
        middle: &[(0x096F, 1)],
    },
];

pub(super) fn register(table: &mut DispatchTable) {
    for (id, pool) in DECORATION_POOLS {
        match id {
            0xB0..=0xB3 => table.register_standard(id, move |p| flower_bed(p, pool)),
            0xBC..=0xBF => table.register_standard(id, move |p| clouds(p, pool)),
            _ => table.register_standard(id, move |p| random_fill(p, pool)),
        }
    }
    for tree in &TREES {
        let (trunk, canopy) = (tree.trunk, tree.canopy);
        table.register_standard(tree.id, move |p| draw_tree(p, trunk, canopy));
    }
    for bush in &BUSHES {
        let (left, right, middle) = (bush.left, bush.right, bush.middle);
        table.register_standard(bush.id, move |p| draw_bush(p, left, right, middle));
    }
}

fn random_fill(p: &mut Painter<'_>, pool: Pool) -> PlacementResult {
    p.fill_rect_with(
        p.x(),
        p.y(),
        p.width_span(),
        p.height_span(),
        FillOrder::RowMajor,
        |p, _| p.choose_weighted(pool),
    )
}

/// One flower per column, on walkable ground only.
fn flower_bed(p: &mut Painter<'_>, pool: Pool) -> PlacementResult {
    let y = p.y();
    let below = p.dy(y, 1);
    let xs: Vec<u8> = p.x_range(p.x(), p.width_span()).collect();
    for x in xs {
        let on_ground = p
            .get_dynamic_tile(x, below)
            .is_some_and(DynKey::is_walkable_top);
        if on_ground {
            let tile = p.choose_weighted(pool)?;
            p.set_tile(tile, x, y)?;
        }
    }
    Ok(())
}

/// Clouds sit behind whatever is already there.
fn clouds(p: &mut Painter<'_>, pool: Pool) -> PlacementResult {
    let xs: Vec<u8> = p.x_range(p.x(), p.width_span()).collect();
    let ys: Vec<u16> = p.y_range(p.y(), p.height_span()).collect();
    for &y in &ys {
        for &x in &xs {
            if p.is_empty(x, y) {
                let tile = p.choose_weighted(pool)?;
                p.set_tile(tile, x, y)?;
            }
        }
    }
    Ok(())
}

/// A canopy on top of a trunk as long as the object's height. The canopy
/// spreads one cell to each side except in the sidebar-safe variant.
fn draw_tree(p: &mut Painter<'_>, trunk: Tile, canopy: Pool) -> PlacementResult {
    let (x, y) = (p.x(), p.y());
    if p.accuracy() {
        let tile = p.choose_weighted(canopy)?;
        p.set_tile_ex(tile, p.dx(x, -1), y, true, false)?;
    }
    let tile = p.choose_weighted(canopy)?;
    p.set_tile(tile, x, y)?;
    if p.accuracy() {
        let tile = p.choose_weighted(canopy)?;
        p.set_tile_ex(tile, p.dx(x, 1), y, true, false)?;
    }
    let ys: Vec<u16> = p.y_range(y, p.height_span()).skip(1).collect();
    for y in ys {
        p.set_tile(trunk, x, y)?;
    }
    Ok(())
}

fn draw_bush(p: &mut Painter<'_>, left: Tile, right: Tile, middle: Pool) -> PlacementResult {
    let w = p.width_span();
    p.fill_rect_with(p.x(), p.y(), w, 0, FillOrder::RowMajor, |p, cell| {
        let sides = Sides::of(&cell, w, 0);
        match (sides.left, sides.right) {
            (true, false) => Ok(left),
            (false, true) => Ok(right),
            _ => p.choose_weighted(middle),
        }
    })
}
