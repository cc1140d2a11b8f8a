//! Extended objects: single tiles, small fixed prefabs, random singles,
//! tileset-aware singles, and the screen-control objects.

use tilegen_game::{screen_index, ExtendedId};

use crate::dispatch::DispatchTable;
use crate::dynamic::DynKey;
use crate::painter::{Painter, PlacementError, PlacementResult, Tile, RESERVE};
use crate::screen::ScreenStatus;

use super::terrain::top_tile;

const SINGLE_TILES: Tile = 0x0A00;
const PREFAB_TILES: Tile = 0x0B00;
const RANDOM_TILES: Tile = 0x1200;

pub const SCREEN_LINK: ExtendedId = 0xFB;
pub const SCREEN_BLOCK: ExtendedId = 0xFC;
pub const SCREEN_DISABLE: ExtendedId = 0xFD;

/// Prefab layouts. Each character is a tile offset within the prefab's page,
/// or `.` for a cell the prefab leaves alone.
const PREFAB_LAYOUTS: [&[&str]; 16] = [
    &["01", "23"],
    &["012", "345"],
    &["0", "1", "2"],
    &["01", "23", "45"],
    &[".0.", "123"],
    &["0.", "12"],
    &[".0", "12"],
    &["0123"],
    &["0", "1", "2", "3"],
    &["012", "3.4", "567"],
    &["01.", ".23"],
    &[".01", "23."],
    &["0..", "12.", "345"],
    &["..0", ".12", "345"],
    &["0123", "4567"],
    &["01", "..", "23"],
];

const DYNAMIC_SINGLES: [DynKey; 16] = [
    DynKey::Surface,
    DynKey::Interior,
    DynKey::EdgeLeft,
    DynKey::EdgeRight,
    DynKey::CornerLeft,
    DynKey::CornerRight,
    DynKey::InnerCornerLeft,
    DynKey::InnerCornerRight,
    DynKey::Ceiling,
    DynKey::CeilingLeft,
    DynKey::CeilingRight,
    DynKey::SteepUp,
    DynKey::SteepDown,
    DynKey::GentleUpLow,
    DynKey::GentleDownHigh,
    DynKey::Wall,
];

/// Fill and trim pieces, placed by 0xD0..=0xD9.
const DYNAMIC_PIECES: [DynKey; 10] = [
    DynKey::SteepUpFill,
    DynKey::SteepDownFill,
    DynKey::GentleUpHigh,
    DynKey::GentleUpFill,
    DynKey::GentleDownLow,
    DynKey::GentleDownFill,
    DynKey::WallCap,
    DynKey::WallBase,
    DynKey::SurfaceDecor,
    DynKey::Underside,
];

pub(super) fn register(table: &mut DispatchTable) {
    for ext in (0x00..=0x3F).chain(0xA0..=0xBF) {
        let tile = SINGLE_TILES + ext as Tile;
        table.register_extended(ext, move |p| p.set_tile(tile, p.x(), p.y()));
    }
    for ext in (0x40..=0x7F).chain(0xDA..=0xFA) {
        table.register_extended(ext, move |p| prefab(p, ext));
    }
    for ext in (0x80..=0x8F).chain(0xC0..=0xCF) {
        table.register_extended(ext, move |p| random_single(p, ext));
    }
    let dynamic_ids = (0x90..=0x9F)
        .zip(DYNAMIC_SINGLES)
        .chain((0xD0..=0xD9).zip(DYNAMIC_PIECES));
    for (ext, key) in dynamic_ids {
        table.register_extended(ext, move |p| dynamic_single(p, key));
    }
    table.register_extended(SCREEN_LINK, link_screens);
    table.register_extended(SCREEN_BLOCK, |p| disable_screen(p, ScreenStatus::Blocked));
    table.register_extended(SCREEN_DISABLE, |p| disable_screen(p, ScreenStatus::Disabled));
}

/// Page number of a prefab object. The second bank continues the page
/// numbering of the first.
fn prefab_index(ext: ExtendedId) -> Option<usize> {
    match ext {
        0x40..=0x7F => Some((ext - 0x40) as usize),
        0xDA..=0xFA => Some((ext - 0xDA) as usize + 0x40),
        _ => None,
    }
}

fn prefab(p: &mut Painter<'_>, ext: ExtendedId) -> PlacementResult {
    let index = prefab_index(ext)
        .ok_or_else(|| PlacementError::Geometry(format!("no prefab for {ext:#04x}")))?;
    let page = PREFAB_TILES + index as Tile * 0x10;
    let (x0, y0) = (p.x(), p.y());
    for (row, line) in PREFAB_LAYOUTS[index % PREFAB_LAYOUTS.len()].iter().enumerate() {
        let y = p.dy(y0, row as i32);
        for (col, c) in line.chars().enumerate() {
            let Some(offset) = c.to_digit(16) else {
                continue;
            };
            p.set_tile(page + offset as Tile, p.dx(x0, col as i32), y)?;
        }
    }
    Ok(())
}

/// Candidate tiles of a random single-tile extended object.
pub fn random_pool(ext: ExtendedId) -> Option<[Tile; 4]> {
    let index = match ext {
        0x80..=0x8F => ext - 0x80,
        0xC0..=0xCF => ext - 0xC0 + 0x10,
        _ => return None,
    };
    let base = RANDOM_TILES + index as Tile * 4;
    Some([base, base + 1, base + 2, base + 3])
}

fn random_single(p: &mut Painter<'_>, ext: ExtendedId) -> PlacementResult {
    let pool = random_pool(ext)
        .ok_or_else(|| PlacementError::Geometry(format!("no tile pool for {ext:#04x}")))?;
    let tile = p.choose(&pool);
    p.set_tile(tile, p.x(), p.y())
}

fn dynamic_single(p: &mut Painter<'_>, key: DynKey) -> PlacementResult {
    let (x, y) = (p.x(), p.y());
    let tile = if key == DynKey::Surface {
        top_tile(p, x, y)
    } else {
        p.dynamic(key)
    };
    p.set_tile(tile, x, y)
}

/// Screen of the object's own cell. Screen-control objects must sit inside
/// the level.
fn own_screen(p: &Painter<'_>) -> Result<u8, PlacementError> {
    let (x, y) = (p.x(), p.y());
    if !p.in_bounds(y) {
        return Err(PlacementError::Overflow { x, y });
    }
    Ok(screen_index(x, y as u8))
}

/// Make the screen named by the object's coordinate nibbles mirror the
/// screen the object sits in.
fn link_screens(p: &mut Painter<'_>) -> PlacementResult {
    let current = own_screen(p)?;
    let link = ((p.y() as u8 & 0x0F) << 4) | (p.x() & 0x0F);
    if link >= 0x80 {
        return Err(PlacementError::Geometry(format!(
            "link screen {link:#04x} is outside the level"
        )));
    }
    if p.links_back_to(link, current) {
        return Err(PlacementError::Geometry(format!(
            "screen {link:#04x} would end up mirroring itself"
        )));
    }
    p.set_tile(RESERVE, p.x(), p.y())?;
    p.link_screen(link, current);
    p.claim_screens(&[current, link]);
    Ok(())
}

fn disable_screen(p: &mut Painter<'_>, status: ScreenStatus) -> PlacementResult {
    let screen = own_screen(p)?;
    p.set_tile_ex(RESERVE, p.x(), p.y(), false, true)?;
    p.disable_screen(screen, status);
    p.claim_screens(&[screen]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::dispatch_table;
    use crate::dynamic::DynamicTileTable;
    use crate::painter::Canvas;
    use rand::{rngs::StdRng, SeedableRng};
    use tilegen_game::{AlgorithmVariant, FormatVersion, Object, OverflowPolicy, TileCell};

    fn canvas(seed: u64) -> Canvas {
        Canvas::new(
            DynamicTileTable::new(0).unwrap(),
            OverflowPolicy::Exception,
            AlgorithmVariant::Accuracy,
            FormatVersion::Current,
            false,
            StdRng::seed_from_u64(seed),
        )
    }

    #[test]
    fn test_link_claims_both_screens() {
        let mut canvas = canvas(0);
        let obj = Object::extended(SCREEN_LINK, 0x05, 0x13);
        let mut p = Painter::new(&mut canvas, &obj);
        link_screens(&mut p).unwrap();
        let (footprint, _) = p.finish();
        assert_eq!(footprint.all.len(), 512);
        assert!(footprint.all.contains(&(0x00, 0x10)));
        assert!(footprint.all.contains(&(0x5F, 0x3F)));
        assert!(footprint.primary.contains(&(0x05, 0x13)));
        assert_eq!(canvas.screens.link_target(0x35), Some(0x10));
        assert_eq!(canvas.screens.status(0x35), ScreenStatus::Linked);
        assert_eq!(canvas.screens.status(0x10), ScreenStatus::Allocated);
        assert!(canvas.grid.get(0x05, 0x13).is_empty());
    }

    #[test]
    fn test_link_rejects_bad_screens() {
        let mut canvas = canvas(0);
        // Nibbles name screen 0x93, past the last screen.
        let obj = Object::extended(SCREEN_LINK, 0x03, 0x09);
        let mut p = Painter::new(&mut canvas, &obj);
        assert!(matches!(link_screens(&mut p), Err(PlacementError::Geometry(_))));

        // Screen 0x00 would mirror itself.
        let obj = Object::extended(SCREEN_LINK, 0x00, 0x00);
        let mut p = Painter::new(&mut canvas, &obj);
        assert!(matches!(link_screens(&mut p), Err(PlacementError::Geometry(_))));

        // 0x35 mirrors 0x20, so 0x20 cannot mirror 0x35.
        canvas.screens.link(0x35, 0x20);
        let obj = Object::extended(SCREEN_LINK, 0x50, 0x32);
        let mut p = Painter::new(&mut canvas, &obj);
        assert!(matches!(link_screens(&mut p), Err(PlacementError::Geometry(_))));
    }

    #[test]
    fn test_disable_screen() {
        let mut canvas = canvas(0);
        let obj = Object::extended(SCREEN_DISABLE, 0x24, 0x31);
        let mut p = Painter::new(&mut canvas, &obj);
        disable_screen(&mut p, ScreenStatus::Disabled).unwrap();
        let (footprint, _) = p.finish();
        assert_eq!(footprint.primary.len(), 1);
        assert_eq!(footprint.all.len(), 256);
        assert_eq!(canvas.screens.status(0x32), ScreenStatus::Disabled);
    }

    #[test]
    fn test_prefab_skips_holes() {
        let mut canvas = canvas(0);
        // Layout 4: ".0." over "123".
        let obj = Object::extended(0x44, 0x10, 0x10);
        let mut p = Painter::new(&mut canvas, &obj);
        prefab(&mut p, 0x44).unwrap();
        let (footprint, _) = p.finish();
        assert_eq!(footprint.primary.len(), 4);
        assert!(canvas.grid.get(0x10, 0x10).is_empty());
        assert_eq!(canvas.grid.get(0x11, 0x10), TileCell::Plain(0x0B40));
        assert_eq!(canvas.grid.get(0x12, 0x11), TileCell::Plain(0x0B43));
    }

    #[test]
    fn test_random_single_in_pool() {
        let pool = random_pool(0x83).unwrap();
        for seed in 0..16 {
            let mut canvas = canvas(seed);
            let obj = Object::extended(0x83, 0x20, 0x20);
            let mut p = Painter::new(&mut canvas, &obj);
            random_single(&mut p, 0x83).unwrap();
            p.finish();
            let tile = canvas.grid.get(0x20, 0x20).internal() as Tile;
            assert!(pool.contains(&tile));
        }
        assert_eq!(random_pool(0x90), None);
        assert_eq!(random_pool(0xC0).map(|pool| pool[0]), Some(0x1240));
    }

    #[test]
    fn test_second_prefab_bank() {
        let mut canvas = canvas(0);
        // Page 0x44 reuses layout 4.
        let obj = Object::extended(0xDE, 0x10, 0x10);
        let mut p = Painter::new(&mut canvas, &obj);
        prefab(&mut p, 0xDE).unwrap();
        p.finish();
        assert!(canvas.grid.get(0x10, 0x10).is_empty());
        assert_eq!(canvas.grid.get(0x11, 0x10), TileCell::Plain(0x0F40));
        assert_eq!(canvas.grid.get(0x12, 0x11), TileCell::Plain(0x0F43));
        assert_eq!(prefab_index(0xFA), Some(0x60));
        assert_eq!(prefab_index(0xFB), None);
    }

    #[test]
    fn test_dynamic_pieces_follow_tileset() {
        let mut canvas = canvas(0);
        let obj = Object::extended(0xD9, 0x30, 0x30);
        let mut p = Painter::new(&mut canvas, &obj);
        dispatch_table().routine(&obj)(&mut p).unwrap();
        p.finish();
        let underside = canvas.dynamic.forward(DynKey::Underside);
        assert_eq!(canvas.grid.get(0x30, 0x30), TileCell::Plain(underside));
    }
}
