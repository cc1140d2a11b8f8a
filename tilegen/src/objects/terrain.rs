//! Ground, ceilings and walls that blend with terrain already on the grid.
//!
//! Everything here draws through the dynamic tile table and reads the grid
//! before each write, so the order of the visits below is significant: a
//! cell can see what earlier cells of the same object wrote.

use crate::dispatch::DispatchTable;
use crate::dynamic::DynKey;
use crate::objects::{step, Sides};
use crate::painter::{Painter, PlacementError, PlacementResult, Tile};
use crate::shapes::FillOrder;

pub(super) fn register(table: &mut DispatchTable) {
    table.register_standard(0x01, flat_land);
    table.register_standard(0x02, |p| bordered_land(p, true));
    table.register_standard(0x03, ledge);
    table.register_standard(0x04, ceiling_slab);
    table.register_standard(0x05, |p| bordered_land(p, false));
    table.register_standard(0x06, |p| cliff(p, Facing::Left));
    table.register_standard(0x07, |p| cliff(p, Facing::Right));
    table.register_standard(0x08, interior_fill);
    table.register_standard(0x09, mound);
    table.register_standard(0x0A, grass_overhang);
    table.register_standard(0x0B, underside);
    table.register_standard(0x0C, |p| inner_corner(p, Facing::Left));
    table.register_standard(0x0D, |p| inner_corner(p, Facing::Right));
    table.register_standard(0x0E, |p| wall(p, false));
    table.register_standard(0x0F, |p| wall(p, true));
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Facing {
    Left,
    Right,
}

/// Surface where the ground is open above, interior where it continues.
pub(crate) fn top_tile(p: &Painter<'_>, x: u8, y: u16) -> Tile {
    let above = p.dy(y, -1);
    if p.is_land(x, above) || p.get_dynamic_tile(x, y) == Some(DynKey::Interior) {
        p.dynamic(DynKey::Interior)
    } else {
        p.dynamic(DynKey::Surface)
    }
}

fn open_left(p: &Painter<'_>, x: u8, y: u16) -> bool {
    !p.is_land(p.dx(x, -1), y)
}

fn open_right(p: &Painter<'_>, x: u8, y: u16) -> bool {
    !p.is_land(p.dx(x, 1), y)
}

fn flat_land(p: &mut Painter<'_>) -> PlacementResult {
    let (w, h) = (p.width_span(), p.height_span());
    p.fill_rect_with(p.x(), p.y(), w, h, FillOrder::RowMajor, |p, cell| {
        if Sides::of(&cell, w, h).top {
            Ok(top_tile(p, cell.x, cell.y))
        } else {
            Ok(p.dynamic(DynKey::Interior))
        }
    })
}

/// Land with edges and corners; the edges disappear where the object butts
/// against existing land.
fn bordered_land(p: &mut Painter<'_>, with_ceiling: bool) -> PlacementResult {
    let (w, h) = (p.width_span(), p.height_span());
    p.fill_rect_with(p.x(), p.y(), w, h, FillOrder::RowMajor, |p, cell| {
        let sides = Sides::of(&cell, w, h);
        let (x, y) = (cell.x, cell.y);
        let left = sides.left && open_left(p, x, y);
        let right = sides.right && open_right(p, x, y);
        let key = if with_ceiling && sides.bottom && cell.rows > 1 {
            match (left, right) {
                (true, _) => DynKey::CeilingLeft,
                (_, true) => DynKey::CeilingRight,
                _ => DynKey::Ceiling,
            }
        } else if sides.top && !p.is_land(x, p.dy(y, -1)) {
            match (left, right) {
                (true, _) => DynKey::CornerLeft,
                (_, true) => DynKey::CornerRight,
                _ => return Ok(top_tile(p, x, y)),
            }
        } else {
            match (left, right) {
                (true, _) => DynKey::EdgeLeft,
                (_, true) => DynKey::EdgeRight,
                _ => DynKey::Interior,
            }
        };
        Ok(p.dynamic(key))
    })
}

fn ledge(p: &mut Painter<'_>) -> PlacementResult {
    let (w, h) = (p.width_span(), p.height_span());
    p.fill_rect_with(p.x(), p.y(), w, h, FillOrder::RowMajor, |p, cell| {
        let sides = Sides::of(&cell, w, h);
        let (x, y) = (cell.x, cell.y);
        let left = sides.left && open_left(p, x, y);
        let right = sides.right && open_right(p, x, y);
        let key = match (sides.top, left, right) {
            (true, true, _) => DynKey::CornerLeft,
            (true, _, true) => DynKey::CornerRight,
            (true, false, false) => return Ok(top_tile(p, x, y)),
            (false, true, _) => DynKey::CeilingLeft,
            (false, _, true) => DynKey::CeilingRight,
            (false, false, false) => DynKey::Ceiling,
        };
        Ok(p.dynamic(key))
    })
}

fn ceiling_slab(p: &mut Painter<'_>) -> PlacementResult {
    let (w, h) = (p.width_span(), p.height_span());
    p.fill_rect_with(p.x(), p.y(), w, h, FillOrder::RowMajor, |p, cell| {
        let sides = Sides::of(&cell, w, h);
        if !sides.bottom {
            return Ok(p.dynamic(DynKey::Interior));
        }
        let (x, y) = (cell.x, cell.y);
        // Land below means the slab rests on something and has no underside.
        if p.is_land(x, p.dy(y, 1)) {
            return Ok(p.dynamic(DynKey::Interior));
        }
        let key = if sides.left && open_left(p, x, y) {
            DynKey::CeilingLeft
        } else if sides.right && open_right(p, x, y) {
            DynKey::CeilingRight
        } else {
            DynKey::Ceiling
        };
        Ok(p.dynamic(key))
    })
}

fn cliff(p: &mut Painter<'_>, facing: Facing) -> PlacementResult {
    let x = p.x();
    let ys: Vec<u16> = p.y_range(p.y(), p.height_span()).collect();
    let outside = match facing {
        Facing::Left => p.dx(x, -1),
        Facing::Right => p.dx(x, 1),
    };
    for (i, &y) in ys.iter().enumerate() {
        let buried = p.is_land(outside, y);
        let tile = match (i, buried, facing) {
            (0, true, _) => top_tile(p, x, y),
            (0, false, _) if p.is_land(x, p.dy(y, -1)) => match facing {
                Facing::Left => p.dynamic(DynKey::EdgeLeft),
                Facing::Right => p.dynamic(DynKey::EdgeRight),
            },
            (0, false, Facing::Left) => p.dynamic(DynKey::CornerLeft),
            (0, false, Facing::Right) => p.dynamic(DynKey::CornerRight),
            (_, true, _) => p.dynamic(DynKey::Interior),
            (_, false, Facing::Left) => p.dynamic(DynKey::EdgeLeft),
            (_, false, Facing::Right) => p.dynamic(DynKey::EdgeRight),
        };
        p.set_tile(tile, x, y)?;
    }
    Ok(())
}

/// Solid interior that leaves existing walkable tops on its first row alone.
fn interior_fill(p: &mut Painter<'_>) -> PlacementResult {
    let (w, h) = (p.width_span(), p.height_span());
    p.fill_rect_with(p.x(), p.y(), w, h, FillOrder::RowMajor, |p, cell| {
        let existing = p.get_dynamic_tile(cell.x, cell.y);
        if Sides::of(&cell, w, h).top && existing.is_some_and(DynKey::is_walkable_top) {
            Ok(p.get_tile(cell.x, cell.y) as Tile)
        } else {
            Ok(p.dynamic(DynKey::Interior))
        }
    })
}

/// A hill whose rows narrow by one cell per side towards the top. Rows too
/// narrow to draw are skipped.
fn mound(p: &mut Painter<'_>) -> PlacementResult {
    let w = p.width_span();
    if p.height_span() < 0 {
        return Err(PlacementError::Geometry(
            "mound height must not be negative".to_string(),
        ));
    }
    let xs: Vec<u8> = p.x_range(p.x(), w).collect();
    let ys: Vec<u16> = p.y_range(p.y(), p.height_span()).collect();
    let cols = xs.len();
    let rows = ys.len();
    let (up, up_fill, down, down_fill) = if w < 0 {
        (
            DynKey::SteepDown,
            DynKey::SteepDownFill,
            DynKey::SteepUp,
            DynKey::SteepUpFill,
        )
    } else {
        (
            DynKey::SteepUp,
            DynKey::SteepUpFill,
            DynKey::SteepDown,
            DynKey::SteepDownFill,
        )
    };

    let drawn = |r: usize| 2 * (rows - 1 - r) < cols;
    for (r, &y) in ys.iter().enumerate() {
        if !drawn(r) {
            continue;
        }
        let inset = rows - 1 - r;
        let (start, end) = (inset, cols - 1 - inset);
        let covered = |c: usize| r > 0 && drawn(r - 1) && c > start && c < end;
        for (c, &x) in xs.iter().enumerate().take(end + 1).skip(start) {
            let key = if start == end {
                DynKey::Surface
            } else if c == start {
                up
            } else if c == end {
                down
            } else if !covered(c) {
                DynKey::Surface
            } else if c == start + 1 {
                up_fill
            } else if c + 1 == end {
                down_fill
            } else {
                DynKey::Interior
            };
            let tile = if key == DynKey::Surface {
                top_tile(p, x, y)
            } else {
                p.dynamic(key)
            };
            p.set_tile(tile, x, y)?;
        }
    }
    Ok(())
}

/// Grass tufts over a body of land. The tufts hang one cell past each end
/// unless the sidebar-safe variant is active.
fn grass_overhang(p: &mut Painter<'_>) -> PlacementResult {
    let w = p.width_span();
    let y = p.y();
    let xs: Vec<u8> = p.x_range(p.x(), w).collect();
    let decor = p.dynamic(DynKey::SurfaceDecor);

    let overhang = p.accuracy();
    if overhang {
        let before = p.dx(xs[0], -step(w));
        p.set_tile_ex(decor, before, y, false, false)?;
    }
    for &x in &xs {
        p.set_tile(decor, x, y)?;
    }
    if overhang {
        let after = p.dx(xs[xs.len() - 1], step(w));
        p.set_tile_ex(decor, after, y, false, false)?;
    }

    let ys: Vec<u16> = p.y_range(y, p.height_span()).skip(1).collect();
    for y in ys {
        for &x in &xs {
            let tile = top_tile(p, x, y);
            p.set_tile(tile, x, y)?;
        }
    }
    Ok(())
}

fn underside(p: &mut Painter<'_>) -> PlacementResult {
    let (w, h) = (p.width_span(), p.height_span());
    p.fill_rect_with(p.x(), p.y(), w, h, FillOrder::RowMajor, |p, cell| {
        let exposed = Sides::of(&cell, w, h).bottom && !p.is_land(cell.x, p.dy(cell.y, 1));
        if exposed {
            Ok(p.dynamic(DynKey::Underside))
        } else {
            Ok(p.dynamic(DynKey::Interior))
        }
    })
}

/// Corner where a floor meets a rising wall, followed by the floor itself.
fn inner_corner(p: &mut Painter<'_>, facing: Facing) -> PlacementResult {
    let (w, h) = (p.width_span(), p.height_span());
    p.fill_rect_with(p.x(), p.y(), w, h, FillOrder::RowMajor, |p, cell| {
        let sides = Sides::of(&cell, w, h);
        if !sides.top {
            return Ok(p.dynamic(DynKey::Interior));
        }
        match facing {
            Facing::Left if sides.left => Ok(p.dynamic(DynKey::InnerCornerLeft)),
            Facing::Right if sides.right => Ok(p.dynamic(DynKey::InnerCornerRight)),
            _ => Ok(top_tile(p, cell.x, cell.y)),
        }
    })
}

/// Wall columns. The top caps unless it continues a wall above; the bottom
/// gets a base where it stands on land. `footed` walls always end in a base
/// unless they continue into a wall below.
fn wall(p: &mut Painter<'_>, footed: bool) -> PlacementResult {
    let (w, h) = (p.width_span(), p.height_span());
    p.fill_rect_with(p.x(), p.y(), w, h, FillOrder::ColumnMajor, |p, cell| {
        let sides = Sides::of(&cell, w, h);
        let (x, y) = (cell.x, cell.y);
        let key = if sides.top {
            let above = p.get_dynamic_tile(x, p.dy(y, -1));
            if above.is_some_and(DynKey::is_wall) {
                DynKey::Wall
            } else {
                DynKey::WallCap
            }
        } else if sides.bottom {
            let below = p.get_dynamic_tile(x, p.dy(y, 1));
            match below {
                Some(key) if key.is_wall() => DynKey::Wall,
                Some(key) if key.is_land() => DynKey::WallBase,
                _ if footed => DynKey::WallBase,
                _ => DynKey::Wall,
            }
        } else {
            DynKey::Wall
        };
        Ok(p.dynamic(key))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::DynamicTileTable;
    use crate::painter::Canvas;
    use rand::{rngs::StdRng, SeedableRng};
    use tilegen_game::{AlgorithmVariant, FormatVersion, Object, OverflowPolicy, TileCell};

    fn canvas(variant: AlgorithmVariant) -> Canvas {
        Canvas::new(
            DynamicTileTable::new(0).unwrap(),
            OverflowPolicy::Crop,
            variant,
            FormatVersion::Current,
            false,
            StdRng::seed_from_u64(0),
        )
    }

    fn run(canvas: &mut Canvas, obj: &Object, f: fn(&mut Painter<'_>) -> PlacementResult) {
        let mut p = Painter::new(canvas, obj);
        f(&mut p).unwrap();
        p.finish();
    }

    #[test]
    fn test_flat_land_stacks() {
        let mut canvas = canvas(AlgorithmVariant::Accuracy);
        run(
            &mut canvas,
            &Object::standard(0x01, 0x10, 0x20, Some(1), None),
            flat_land,
        );
        run(
            &mut canvas,
            &Object::standard(0x01, 0x10, 0x21, Some(1), None),
            flat_land,
        );
        assert_eq!(canvas.grid.get(0x10, 0x20), TileCell::Plain(0x1400));
        // The second object starts under existing land, so it is interior.
        assert_eq!(canvas.grid.get(0x10, 0x21), TileCell::Plain(0x1401));
    }

    #[test]
    fn test_bordered_land_merges_with_neighbour() {
        let mut canvas = canvas(AlgorithmVariant::Accuracy);
        let table = DynamicTileTable::new(0).unwrap();
        let key_at = |canvas: &Canvas, x: u8, y: u8| table.reverse(canvas.grid.get(x, y).internal());

        run(
            &mut canvas,
            &Object::standard(0x02, 0x10, 0x20, Some(2), Some(2)),
            |p| bordered_land(p, true),
        );
        assert_eq!(key_at(&canvas, 0x10, 0x20), Some(DynKey::CornerLeft));
        assert_eq!(key_at(&canvas, 0x11, 0x20), Some(DynKey::Surface));
        assert_eq!(key_at(&canvas, 0x12, 0x20), Some(DynKey::CornerRight));
        assert_eq!(key_at(&canvas, 0x10, 0x21), Some(DynKey::EdgeLeft));
        assert_eq!(key_at(&canvas, 0x11, 0x21), Some(DynKey::Interior));
        assert_eq!(key_at(&canvas, 0x12, 0x22), Some(DynKey::CeilingRight));

        // A second block directly to the right loses its left edge.
        run(
            &mut canvas,
            &Object::standard(0x02, 0x13, 0x20, Some(1), Some(2)),
            |p| bordered_land(p, true),
        );
        assert_eq!(key_at(&canvas, 0x13, 0x20), Some(DynKey::Surface));
        assert_eq!(key_at(&canvas, 0x13, 0x21), Some(DynKey::Interior));
        assert_eq!(key_at(&canvas, 0x14, 0x20), Some(DynKey::CornerRight));
    }

    #[test]
    fn test_wall_caps_and_bases() {
        let mut canvas = canvas(AlgorithmVariant::Accuracy);
        let table = DynamicTileTable::new(0).unwrap();
        run(
            &mut canvas,
            &Object::standard(0x01, 0x00, 0x14, Some(4), None),
            flat_land,
        );
        run(
            &mut canvas,
            &Object::standard(0x0E, 0x02, 0x10, None, Some(3)),
            |p| wall(p, false),
        );
        let key = |y: u8| table.reverse(canvas.grid.get(0x02, y).internal());
        assert_eq!(key(0x10), Some(DynKey::WallCap));
        assert_eq!(key(0x11), Some(DynKey::Wall));
        assert_eq!(key(0x13), Some(DynKey::WallBase));

        // A wall stacked on top runs into the one below instead of taking a base.
        run(
            &mut canvas,
            &Object::standard(0x0F, 0x02, 0x0E, None, Some(1)),
            |p| wall(p, true),
        );
        let key = |y: u8| table.reverse(canvas.grid.get(0x02, y).internal());
        assert_eq!(key(0x0E), Some(DynKey::WallCap));
        assert_eq!(key(0x0F), Some(DynKey::Wall));
    }

    #[test]
    fn test_mound_shape() {
        let mut canvas = canvas(AlgorithmVariant::Accuracy);
        let table = DynamicTileTable::new(0).unwrap();
        run(
            &mut canvas,
            &Object::standard(0x09, 0x20, 0x10, Some(3), Some(1)),
            mound,
        );
        let key = |x: u8, y: u8| table.reverse(canvas.grid.get(x, y).internal());
        // Top row: columns 1..=2 of 4.
        assert_eq!(key(0x20, 0x10), None);
        assert_eq!(key(0x21, 0x10), Some(DynKey::SteepUp));
        assert_eq!(key(0x22, 0x10), Some(DynKey::SteepDown));
        assert_eq!(key(0x23, 0x10), None);
        // Bottom row spans the full width.
        assert_eq!(key(0x20, 0x11), Some(DynKey::SteepUp));
        assert_eq!(key(0x21, 0x11), Some(DynKey::SteepUpFill));
        assert_eq!(key(0x22, 0x11), Some(DynKey::SteepDownFill));
        assert_eq!(key(0x23, 0x11), Some(DynKey::SteepDown));
    }

    #[test]
    fn test_grass_overhang_variants() {
        let obj = Object::standard(0x0A, 0x30, 0x10, Some(1), Some(1));

        let mut accurate = canvas(AlgorithmVariant::Accuracy);
        run(&mut accurate, &obj, grass_overhang);
        assert!(!accurate.grid.get(0x2F, 0x10).is_empty());
        assert!(!accurate.grid.get(0x32, 0x10).is_empty());

        let mut safe = canvas(AlgorithmVariant::SidebarSafe);
        run(&mut safe, &obj, grass_overhang);
        assert!(safe.grid.get(0x2F, 0x10).is_empty());
        assert!(safe.grid.get(0x32, 0x10).is_empty());
        assert_eq!(safe.grid.get(0x30, 0x11), TileCell::Plain(0x1400));
    }
}
