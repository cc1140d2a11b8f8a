//! Pipes, fences, ladders, vines and other built pieces that join up with
//! whatever is already next to them.

use crate::dispatch::DispatchTable;
use crate::dynamic::DynKey;
use crate::objects::Sides;
use crate::painter::{Painter, PlacementResult, Tile};
use crate::shapes::{BorderedLine, FillOrder};

const PIPE_CAP: [Tile; 2] = [0x0800, 0x0801];
const PIPE_BODY: [Tile; 2] = [0x0802, 0x0803];
const PIPE_FOOT: [Tile; 2] = [0x0804, 0x0805];

const HPIPE_CAP: [Tile; 2] = [0x0810, 0x0811];
const HPIPE_BODY: [Tile; 2] = [0x0812, 0x0813];
const HPIPE_END: [Tile; 2] = [0x0814, 0x0815];

const FENCE_POST: Tile = 0x0820;
const FENCE_RAIL: Tile = 0x0821;
const FENCE_END_LEFT: Tile = 0x0822;
const FENCE_END_RIGHT: Tile = 0x0823;

const LADDER: Tile = 0x0830;
const LADDER_TOP: Tile = 0x0831;

const VINE: Tile = 0x0840;
const VINE_END: Tile = 0x0841;

const BRIDGE_ANCHOR_LEFT: Tile = 0x0850;
const BRIDGE_ANCHOR_RIGHT: Tile = 0x0851;
const BRIDGE_POST: Tile = 0x0852;
const BRIDGE_PLANKS: [Tile; 2] = [0x0853, 0x0854];

const MOSS: Tile = 0x0860;

const WATERFALL_LIP: Tile = 0x0870;
const WATERFALL: Tile = 0x0871;
const WATERFALL_SPLASH: Tile = 0x0872;

const BATTLEMENT: [Tile; 2] = [0x0880, 0x0881];
const BATTLEMENT_ON_WALL: [Tile; 2] = [0x0882, 0x0883];

const CHAIN: [Tile; 2] = [0x0890, 0x0891];
const CHAIN_HOOK: Tile = 0x0892;

const BEAM_BRACKET_LEFT: Tile = 0x08A0;
const BEAM_BRACKET_RIGHT: Tile = 0x08A1;
const BEAM_END: Tile = 0x08A2;
const BEAM: Tile = 0x08A3;

const POST_JOINT: Tile = 0x08B0;
const POST_CAP: Tile = 0x08B1;
const POST: Tile = 0x08B2;
const POST_FOOT: Tile = 0x08B3;
const POST_BOTTOM: Tile = 0x08B4;

const LONG_LOG: BorderedLine = BorderedLine {
    first: 0x08C0,
    middle: &[0x08C1, 0x08C2],
    last: 0x08C3,
    single: 0x08C4,
};

const GIRDER: Tile = 0x08D0;
const GIRDER_SUPPORT: Tile = 0x08D1;

pub(super) fn register(table: &mut DispatchTable) {
    table.register_standard(0x90, vertical_pipe);
    table.register_standard(0x91, horizontal_pipe);
    table.register_standard(0x92, fence);
    table.register_standard(0x93, ladder);
    table.register_standard(0x94, vine);
    table.register_standard(0x95, rope_bridge);
    table.register_standard(0x96, moss);
    table.register_standard(0x97, waterfall);
    table.register_standard(0x98, battlement);
    table.register_standard(0x99, chain);
    table.register_standard(0x9A, beam);
    table.register_standard(0x9B, post);
    table.register_standard(0xC0, long_log);
    table.register_standard(0xC1, girder);
}

fn tile_in(p: &Painter<'_>, x: u8, y: u16, tiles: &[Tile]) -> bool {
    tiles.contains(&(p.get_tile(x, y) as Tile))
}

/// Two columns wide. The cap is dropped where the pipe continues one above,
/// and a foot is added where nothing lies below.
fn vertical_pipe(p: &mut Painter<'_>) -> PlacementResult {
    let (x0, y0) = (p.x(), p.y());
    let x1 = p.dx(x0, 1);
    let ys: Vec<u16> = p.y_range(y0, p.height_span()).collect();
    let last = ys.len() - 1;
    for (i, &y) in ys.iter().enumerate() {
        let joined_above = i == 0
            && tile_in(p, x0, p.dy(y, -1), &[PIPE_CAP[0], PIPE_BODY[0], PIPE_FOOT[0]]);
        let row = if i == 0 && !joined_above {
            PIPE_CAP
        } else if i == last && i > 0 && p.is_empty(x0, p.dy(y, 1)) {
            PIPE_FOOT
        } else {
            PIPE_BODY
        };
        p.set_tile(row[0], x0, y)?;
        p.set_tile(row[1], x1, y)?;
    }
    Ok(())
}

/// Two rows tall, running across the width.
fn horizontal_pipe(p: &mut Painter<'_>) -> PlacementResult {
    let (x0, y0) = (p.x(), p.y());
    let y1 = p.dy(y0, 1);
    let w = p.width_span();
    let xs: Vec<u8> = p.x_range(x0, w).collect();
    let last = xs.len() - 1;
    let behind = p.dx(x0, -super::step(w));
    let joined = tile_in(p, behind, y0, &[HPIPE_BODY[0], HPIPE_END[0]]);
    for (i, &x) in xs.iter().enumerate() {
        let column = if i == 0 && !joined {
            HPIPE_CAP
        } else if i == last && i > 0 && p.is_empty(p.dx(x, super::step(w)), y0) {
            HPIPE_END
        } else {
            HPIPE_BODY
        };
        p.set_tile(column[0], x, y0)?;
        p.set_tile(column[1], x, y1)?;
    }
    Ok(())
}

fn fence(p: &mut Painter<'_>) -> PlacementResult {
    let (w, h) = (p.width_span(), 0);
    let fence_tiles = [FENCE_POST, FENCE_RAIL, FENCE_END_LEFT, FENCE_END_RIGHT];
    p.fill_rect_with(p.x(), p.y(), w, h, FillOrder::RowMajor, |p, cell| {
        let sides = Sides::of(&cell, w, h);
        let (x, y) = (cell.x, cell.y);
        if sides.left && !tile_in(p, p.dx(x, -1), y, &fence_tiles) {
            Ok(FENCE_END_LEFT)
        } else if sides.right && !tile_in(p, p.dx(x, 1), y, &fence_tiles) {
            Ok(FENCE_END_RIGHT)
        } else if cell.col % 2 == 0 {
            Ok(FENCE_POST)
        } else {
            Ok(FENCE_RAIL)
        }
    })
}

fn ladder(p: &mut Painter<'_>) -> PlacementResult {
    let (w, h) = (p.width_span(), p.height_span());
    p.fill_rect_with(p.x(), p.y(), w, h, FillOrder::ColumnMajor, |p, cell| {
        let top = Sides::of(&cell, w, h).top;
        if top && !tile_in(p, cell.x, p.dy(cell.y, -1), &[LADDER, LADDER_TOP]) {
            Ok(LADDER_TOP)
        } else {
            Ok(LADDER)
        }
    })
}

/// Hangs down from its origin and stops at the first solid ground.
fn vine(p: &mut Painter<'_>) -> PlacementResult {
    let x = p.x();
    let ys: Vec<u16> = p
        .y_range(p.y(), p.height_span())
        .take_while(|&y| !p.is_land(x, y))
        .collect();
    let last = ys.len().saturating_sub(1);
    for (i, &y) in ys.iter().enumerate() {
        let tile = if i == last { VINE_END } else { VINE };
        p.set_tile(tile, x, y)?;
    }
    Ok(())
}

fn rope_bridge(p: &mut Painter<'_>) -> PlacementResult {
    let w = p.width_span();
    p.fill_rect_with(p.x(), p.y(), w, 0, FillOrder::RowMajor, |p, cell| {
        let sides = Sides::of(&cell, w, 0);
        let (x, y) = (cell.x, cell.y);
        if sides.left {
            if p.is_land(p.dx(x, -1), y) {
                Ok(BRIDGE_ANCHOR_LEFT)
            } else {
                Ok(BRIDGE_POST)
            }
        } else if sides.right {
            if p.is_land(p.dx(x, 1), y) {
                Ok(BRIDGE_ANCHOR_RIGHT)
            } else {
                Ok(BRIDGE_POST)
            }
        } else {
            Ok(BRIDGE_PLANKS[cell.col % 2])
        }
    })
}

/// Covers the walkable tops inside its box and nothing else, so it can
/// end up drawing no tiles at all.
fn moss(p: &mut Painter<'_>) -> PlacementResult {
    let xs: Vec<u8> = p.x_range(p.x(), p.width_span()).collect();
    let ys: Vec<u16> = p.y_range(p.y(), p.height_span()).collect();
    for &y in &ys {
        for &x in &xs {
            if p.get_dynamic_tile(x, y).is_some_and(DynKey::is_walkable_top) {
                p.set_tile(MOSS, x, y)?;
            }
        }
    }
    Ok(())
}

fn waterfall(p: &mut Painter<'_>) -> PlacementResult {
    let (w, h) = (p.width_span(), p.height_span());
    p.fill_rect_with(p.x(), p.y(), w, h, FillOrder::ColumnMajor, |p, cell| {
        let sides = Sides::of(&cell, w, h);
        if sides.top {
            Ok(WATERFALL_LIP)
        } else if sides.bottom && p.is_land(cell.x, p.dy(cell.y, 1)) {
            Ok(WATERFALL_SPLASH)
        } else {
            Ok(WATERFALL)
        }
    })
}

fn battlement(p: &mut Painter<'_>) -> PlacementResult {
    let w = p.width_span();
    p.fill_rect_with(p.x(), p.y(), w, 0, FillOrder::RowMajor, |p, cell| {
        let below = p.get_dynamic_tile(cell.x, p.dy(cell.y, 1));
        if below.is_some_and(DynKey::is_wall) {
            Ok(BATTLEMENT_ON_WALL[cell.col % 2])
        } else {
            Ok(BATTLEMENT[cell.col % 2])
        }
    })
}

fn chain(p: &mut Painter<'_>) -> PlacementResult {
    let (x, h) = (p.x(), p.height_span());
    let ys: Vec<u16> = p.y_range(p.y(), h).collect();
    for (i, &y) in ys.iter().enumerate() {
        let hooked = i == 0 && p.is_land(x, p.dy(y, -1));
        let tile = if hooked { CHAIN_HOOK } else { CHAIN[i % 2] };
        p.set_tile(tile, x, y)?;
    }
    Ok(())
}

fn beam(p: &mut Painter<'_>) -> PlacementResult {
    let w = p.width_span();
    p.fill_rect_with(p.x(), p.y(), w, 0, FillOrder::RowMajor, |p, cell| {
        let sides = Sides::of(&cell, w, 0);
        let (x, y) = (cell.x, cell.y);
        let wall_at = |x: u8| p.get_dynamic_tile(x, y).is_some_and(DynKey::is_wall);
        if sides.left && wall_at(p.dx(x, -1)) {
            Ok(BEAM_BRACKET_LEFT)
        } else if sides.right && wall_at(p.dx(x, 1)) {
            Ok(BEAM_BRACKET_RIGHT)
        } else if sides.left || sides.right {
            Ok(BEAM_END)
        } else {
            Ok(BEAM)
        }
    })
}

fn post(p: &mut Painter<'_>) -> PlacementResult {
    let h = p.height_span();
    p.fill_rect_with(p.x(), p.y(), 0, h, FillOrder::ColumnMajor, |p, cell| {
        let sides = Sides::of(&cell, 0, h);
        let (x, y) = (cell.x, cell.y);
        if sides.top {
            if p.is_land(x, p.dy(y, -1)) {
                Ok(POST_JOINT)
            } else {
                Ok(POST_CAP)
            }
        } else if sides.bottom {
            if p.is_land(x, p.dy(y, 1)) {
                Ok(POST_FOOT)
            } else {
                Ok(POST_BOTTOM)
            }
        } else {
            Ok(POST)
        }
    })
}

/// Width comes from the extension bytes rather than a width byte.
fn long_log(p: &mut Painter<'_>) -> PlacementResult {
    p.bordered_row(&LONG_LOG, p.x(), p.y(), p.width_span())
}

fn girder(p: &mut Painter<'_>) -> PlacementResult {
    let y = p.y();
    let xs: Vec<u8> = p.x_range(p.x(), p.width_span()).collect();
    for x in xs {
        let supported = p
            .get_dynamic_tile(x, p.dy(y, 1))
            .is_some_and(DynKey::is_walkable_top);
        p.set_tile(if supported { GIRDER_SUPPORT } else { GIRDER }, x, y)?;
    }
    Ok(())
}
