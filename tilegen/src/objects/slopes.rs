//! Slopes, wedges and stairs.
//!
//! A slope is drawn column by column across its width. Each column starts
//! lower (or higher) than the last by the pitch, and the object's height is
//! the depth of the deepest column. A falling slope stops as soon as a
//! column has nothing left to draw; a rising one skips the leading columns
//! that would start below the box.

use crate::dispatch::DispatchTable;
use crate::dynamic::DynKey;
use crate::painter::{Painter, PlacementError, PlacementResult, Tile};

use super::terrain::top_tile;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Pitch {
    Steep,
    Gentle,
    Double,
}

impl Pitch {
    /// Drop after `run` columns.
    fn rise(self, run: usize) -> usize {
        match self {
            Pitch::Steep => run,
            Pitch::Gentle => run / 2,
            Pitch::Double => run * 2,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Face {
    Floor,
    Ceiling,
    Stairs,
}

#[derive(Copy, Clone, Debug)]
struct Slope {
    pitch: Pitch,
    direction: Direction,
    face: Face,
}

const SLOPES: [(u8, Slope); 14] = {
    use Direction::*;
    use Face::*;
    use Pitch::*;
    const fn s(pitch: Pitch, direction: Direction, face: Face) -> Slope {
        Slope {
            pitch,
            direction,
            face,
        }
    }
    [
        (0x10, s(Steep, Up, Floor)),
        (0x11, s(Steep, Down, Floor)),
        (0x12, s(Gentle, Up, Floor)),
        (0x13, s(Gentle, Down, Floor)),
        (0x14, s(Double, Up, Floor)),
        (0x15, s(Double, Down, Floor)),
        (0x16, s(Steep, Up, Ceiling)),
        (0x17, s(Steep, Down, Ceiling)),
        (0x18, s(Gentle, Up, Ceiling)),
        (0x19, s(Gentle, Down, Ceiling)),
        (0x1A, s(Double, Up, Ceiling)),
        (0x1B, s(Double, Down, Ceiling)),
        (0x1C, s(Gentle, Up, Stairs)),
        (0x1D, s(Gentle, Down, Stairs)),
    ]
};

pub(super) fn register(table: &mut DispatchTable) {
    for (id, slope) in SLOPES {
        table.register_standard(id, move |p| draw_slope(p, slope));
    }
}

fn draw_slope(p: &mut Painter<'_>, slope: Slope) -> PlacementResult {
    if p.height_span() < 0 {
        return Err(PlacementError::Geometry(
            "slope depth must not be negative".to_string(),
        ));
    }
    let xs: Vec<u8> = p.x_range(p.x(), p.width_span()).collect();
    let cols = xs.len();
    let rows = p.height_cells() as i32;
    // Drawing leftwards mirrors which way the slope faces on screen.
    let mirrored = p.width_span() < 0;

    for (i, &x) in xs.iter().enumerate() {
        let run = match slope.direction {
            Direction::Down => i,
            Direction::Up => cols - 1 - i,
        };
        let drop = slope.pitch.rise(run) as i32;
        let remaining = rows - drop;
        if remaining < 1 {
            match slope.direction {
                Direction::Up => continue,
                Direction::Down => {
                    // Older saves expect the falling gentle slope to draw one
                    // more cap below its box before stopping.
                    if remaining == 0
                        && p.legacy_format()
                        && slope.pitch == Pitch::Gentle
                        && slope.face == Face::Floor
                    {
                        let y = p.dy(p.y(), drop);
                        let key = cap_key(slope, run, mirrored);
                        p.set_tile(p.dynamic(key), x, y)?;
                    }
                    break;
                }
            }
        }
        match slope.face {
            Face::Floor | Face::Stairs => floor_column(p, slope, x, run, drop, remaining, mirrored)?,
            Face::Ceiling => ceiling_column(p, slope, x, remaining, mirrored)?,
        }
    }
    Ok(())
}

fn mirror(key: DynKey) -> DynKey {
    match key {
        DynKey::SteepUp => DynKey::SteepDown,
        DynKey::SteepDown => DynKey::SteepUp,
        DynKey::SteepUpFill => DynKey::SteepDownFill,
        DynKey::SteepDownFill => DynKey::SteepUpFill,
        DynKey::GentleUpLow => DynKey::GentleDownLow,
        DynKey::GentleDownLow => DynKey::GentleUpLow,
        DynKey::GentleUpHigh => DynKey::GentleDownHigh,
        DynKey::GentleDownHigh => DynKey::GentleUpHigh,
        DynKey::GentleUpFill => DynKey::GentleDownFill,
        DynKey::GentleDownFill => DynKey::GentleUpFill,
        DynKey::CornerLeft => DynKey::CornerRight,
        DynKey::CornerRight => DynKey::CornerLeft,
        DynKey::CeilingLeft => DynKey::CeilingRight,
        DynKey::CeilingRight => DynKey::CeilingLeft,
        key => key,
    }
}

/// Top tile of a floor column.
fn cap_key(slope: Slope, run: usize, mirrored: bool) -> DynKey {
    let key = match (slope.pitch, slope.direction) {
        (Pitch::Steep | Pitch::Double, Direction::Up) => DynKey::SteepUp,
        (Pitch::Steep | Pitch::Double, Direction::Down) => DynKey::SteepDown,
        (Pitch::Gentle, Direction::Up) if run % 2 == 1 => DynKey::GentleUpLow,
        (Pitch::Gentle, Direction::Up) => DynKey::GentleUpHigh,
        (Pitch::Gentle, Direction::Down) if run % 2 == 0 => DynKey::GentleDownHigh,
        (Pitch::Gentle, Direction::Down) => DynKey::GentleDownLow,
    };
    if mirrored {
        mirror(key)
    } else {
        key
    }
}

fn fill_key(slope: Slope, mirrored: bool) -> DynKey {
    let key = match (slope.pitch, slope.direction) {
        (Pitch::Gentle, Direction::Up) => DynKey::GentleUpFill,
        (Pitch::Gentle, Direction::Down) => DynKey::GentleDownFill,
        (_, Direction::Up) => DynKey::SteepUpFill,
        (_, Direction::Down) => DynKey::SteepDownFill,
    };
    if mirrored {
        mirror(key)
    } else {
        key
    }
}

/// Stair treads show an edge on the side where the next step drops away.
fn stair_key(slope: Slope, run: usize, mirrored: bool) -> DynKey {
    let key = match slope.direction {
        Direction::Up if run % 2 == 0 => DynKey::CornerLeft,
        Direction::Down if run % 2 == 0 => DynKey::CornerRight,
        _ => DynKey::Surface,
    };
    if mirrored {
        mirror(key)
    } else {
        key
    }
}

fn floor_column(
    p: &mut Painter<'_>,
    slope: Slope,
    x: u8,
    run: usize,
    drop: i32,
    remaining: i32,
    mirrored: bool,
) -> PlacementResult {
    let top = p.dy(p.y(), drop);
    for (k, y) in p.y_range(top, remaining - 1).enumerate().collect::<Vec<_>>() {
        // Slopes buried in existing ground draw as ground.
        let buried = p.get_dynamic_tile(x, y) == Some(DynKey::Interior);
        let tile: Tile = match (k, slope.face) {
            _ if buried => p.dynamic(DynKey::Interior),
            (0, Face::Stairs) => match stair_key(slope, run, mirrored) {
                DynKey::Surface => top_tile(p, x, y),
                key => p.dynamic(key),
            },
            (0, _) => p.dynamic(cap_key(slope, run, mirrored)),
            (1, Face::Floor) => p.dynamic(fill_key(slope, mirrored)),
            _ => p.dynamic(DynKey::Interior),
        };
        p.set_tile(tile, x, y)?;
    }
    Ok(())
}

fn ceiling_column(
    p: &mut Painter<'_>,
    slope: Slope,
    x: u8,
    remaining: i32,
    mirrored: bool,
) -> PlacementResult {
    let underside = match (slope.direction, mirrored) {
        (Direction::Up, false) | (Direction::Down, true) => DynKey::CeilingLeft,
        (Direction::Down, false) | (Direction::Up, true) => DynKey::CeilingRight,
    };
    let last = (remaining - 1) as usize;
    for (k, y) in p.y_range(p.y(), remaining - 1).enumerate().collect::<Vec<_>>() {
        let exposed = k == last && !p.is_land(x, p.dy(y, 1));
        let tile = if exposed {
            p.dynamic(underside)
        } else {
            p.dynamic(DynKey::Interior)
        };
        p.set_tile(tile, x, y)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::DynamicTileTable;
    use crate::painter::Canvas;
    use rand::{rngs::StdRng, SeedableRng};
    use tilegen_game::{AlgorithmVariant, FormatVersion, Object, OverflowPolicy};

    fn canvas(format: FormatVersion) -> Canvas {
        Canvas::new(
            DynamicTileTable::new(0).unwrap(),
            OverflowPolicy::Exception,
            AlgorithmVariant::Accuracy,
            format,
            false,
            StdRng::seed_from_u64(0),
        )
    }

    fn slope_for(id: u8) -> Slope {
        SLOPES.iter().find(|(i, _)| *i == id).unwrap().1
    }

    #[test]
    fn test_falling_slope_stops_early() {
        let mut canvas = canvas(FormatVersion::Current);
        let obj = Object::standard(0x11, 0x20, 0x10, Some(4), Some(1));
        let mut p = Painter::new(&mut canvas, &obj);
        draw_slope(&mut p, slope_for(0x11)).unwrap();
        let (footprint, _) = p.finish();
        assert_eq!(footprint.primary.len(), 3);
        let table = DynamicTileTable::new(0).unwrap();
        let key = |x: u8, y: u8| table.reverse(canvas.grid.get(x, y).internal());
        assert_eq!(key(0x20, 0x10), Some(DynKey::SteepDown));
        assert_eq!(key(0x20, 0x11), Some(DynKey::SteepDownFill));
        assert_eq!(key(0x21, 0x11), Some(DynKey::SteepDown));
        for x in 0x22..=0x24 {
            for y in 0x10..=0x13 {
                assert!(canvas.grid.get(x, y).is_empty());
            }
        }
    }

    #[test]
    fn test_rising_slope_skips_leading_columns() {
        let mut canvas = canvas(FormatVersion::Current);
        let obj = Object::standard(0x10, 0x20, 0x10, Some(2), None);
        let mut p = Painter::new(&mut canvas, &obj);
        draw_slope(&mut p, slope_for(0x10)).unwrap();
        let (footprint, _) = p.finish();
        assert_eq!(footprint.primary.len(), 1);
        assert!(footprint.primary.contains(&(0x22, 0x10)));
    }

    #[test]
    fn test_gentle_slope_legacy_cap() {
        let obj = Object::standard(0x13, 0x20, 0x10, Some(3), None);

        let mut current = canvas(FormatVersion::Current);
        let mut p = Painter::new(&mut current, &obj);
        draw_slope(&mut p, slope_for(0x13)).unwrap();
        p.finish();
        assert!(current.grid.get(0x22, 0x11).is_empty());

        let mut legacy = canvas(FormatVersion::Legacy);
        let mut p = Painter::new(&mut legacy, &obj);
        draw_slope(&mut p, slope_for(0x13)).unwrap();
        p.finish();
        let table = DynamicTileTable::new(0).unwrap();
        assert_eq!(
            table.reverse(legacy.grid.get(0x22, 0x11).internal()),
            Some(DynKey::GentleDownHigh)
        );
        assert!(legacy.grid.get(0x23, 0x11).is_empty());
    }

    #[test]
    fn test_negative_depth_is_rejected() {
        let mut canvas = canvas(FormatVersion::Current);
        let obj = Object::standard(0x11, 0x20, 0x10, Some(2), Some(-2));
        let mut p = Painter::new(&mut canvas, &obj);
        assert!(matches!(
            draw_slope(&mut p, slope_for(0x11)),
            Err(PlacementError::Geometry(_))
        ));
    }

    #[test]
    fn test_mirrored_slope_faces_the_other_way() {
        let mut canvas = canvas(FormatVersion::Current);
        let obj = Object::standard(0x11, 0x20, 0x10, Some(-2), Some(2));
        let mut p = Painter::new(&mut canvas, &obj);
        draw_slope(&mut p, slope_for(0x11)).unwrap();
        p.finish();
        let table = DynamicTileTable::new(0).unwrap();
        // Falling leftwards from x = 0x20 is a rising slope on screen.
        assert_eq!(
            table.reverse(canvas.grid.get(0x20, 0x10).internal()),
            Some(DynKey::SteepUp)
        );
        assert_eq!(
            table.reverse(canvas.grid.get(0x1F, 0x11).internal()),
            Some(DynKey::SteepUp)
        );
    }
}
