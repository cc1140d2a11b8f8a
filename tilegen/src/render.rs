use anyhow::{Context, Result};
use log::{debug, info, warn};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use tilegen_game::{
    tile::{failed_object_tile, OVERFLOW_MARKER},
    util::sorted_hashset_vec,
    AlgorithmVariant, FormatVersion, Object, OverflowPolicy, ScreenIdx, Sublevel, GRID_HEIGHT,
    MAX_ACTIVE_SCREENS,
};

use crate::dispatch::{dispatch_table, DispatchTable};
use crate::dynamic::DynamicTileTable;
use crate::grid::{Coord, ObjectFootprint, TileGrid};
use crate::painter::{Canvas, Painter, PlacementError};
use crate::screen::ScreenMemory;

/// Pass-wide options that do not come from the sublevel itself.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct RenderSettings {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub overflow: Option<OverflowPolicy>,
    #[serde(default)]
    pub variant: Option<AlgorithmVariant>,
    #[serde(default)]
    pub format: Option<FormatVersion>,
}

/// What one object left behind.
#[derive(Serialize, Clone, Debug, Default)]
pub struct ObjectRender {
    #[serde(serialize_with = "serialize_coords")]
    pub primary: hashbrown::HashSet<Coord>,
    #[serde(serialize_with = "serialize_coords")]
    pub all: hashbrown::HashSet<Coord>,
    pub last: Option<Coord>,
    pub error: Option<String>,
}

fn serialize_coords<S>(coords: &hashbrown::HashSet<Coord>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(sorted_hashset_vec(coords))
}

impl ObjectRender {
    fn new(footprint: ObjectFootprint, error: Option<String>) -> Self {
        ObjectRender {
            primary: footprint.primary,
            all: footprint.all,
            last: footprint.last,
            error,
        }
    }
}

pub struct RenderOutput {
    pub grid: TileGrid,
    pub screens: ScreenMemory,
    pub objects: Vec<ObjectRender>,
}

impl RenderOutput {
    pub fn active_screen_count(&self) -> usize {
        self.screens.active_count()
    }

    pub fn exceeds_screen_limit(&self) -> bool {
        self.screens.exceeds_limit()
    }

    pub fn failures(&self) -> impl Iterator<Item = (usize, &str)> {
        self.objects
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.error.as_deref().map(|e| (i, e)))
    }

    /// Index of the topmost (last drawn) object selectable at a cell.
    pub fn object_at(&self, x: u8, y: u8) -> Option<usize> {
        self.objects
            .iter()
            .rposition(|o| o.primary.contains(&(x, y)))
    }
}

pub fn render_sublevel(sublevel: &Sublevel, settings: &RenderSettings) -> Result<RenderOutput> {
    let tileset = sublevel.tileset();
    let dynamic = DynamicTileTable::new(tileset)
        .with_context(|| format!("Unable to build tile table for tileset {tileset:#x}"))?;
    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut canvas = Canvas::new(
        dynamic,
        settings.overflow.unwrap_or(sublevel.overflow),
        settings.variant.unwrap_or(sublevel.variant),
        settings.format.unwrap_or(sublevel.format),
        sublevel.wide_extension,
        rng,
    );

    let table = dispatch_table();
    let objects: Vec<ObjectRender> = sublevel
        .objects
        .iter()
        .enumerate()
        .map(|(i, obj)| render_object(&mut canvas, table, i, obj))
        .collect();

    resolve_screen_links(&mut canvas);

    let output = RenderOutput {
        grid: canvas.grid,
        screens: canvas.screens,
        objects,
    };
    info!(
        "Rendered {} objects on tileset {tileset:#x}: {} failed, {} active screens",
        output.objects.len(),
        output.failures().count(),
        output.active_screen_count()
    );
    if output.exceeds_screen_limit() {
        warn!(
            "{} active screens exceeds the limit of {MAX_ACTIVE_SCREENS}; the game will freeze loading this sublevel",
            output.active_screen_count()
        );
    }
    Ok(output)
}

fn render_object(canvas: &mut Canvas, table: &DispatchTable, idx: usize, obj: &Object) -> ObjectRender {
    let routine = table.routine(obj);
    let mut painter = Painter::new(canvas, obj);
    let result = routine(&mut painter).and_then(|()| {
        if painter.footprint().primary.is_empty() {
            Err(PlacementError::NoPrimaryTiles)
        } else {
            Ok(())
        }
    });

    match result {
        Ok(()) => {
            let (footprint, overflowed) = painter.finish();
            if overflowed {
                mark_overflow(&mut canvas.grid, &footprint);
            }
            ObjectRender::new(footprint, None)
        }
        Err(err) => {
            painter.rollback();
            debug!(
                "object {idx} (id {:#04x}, ext {:?}) at ({:#04x}, {:#04x}) failed: {err}",
                obj.id, obj.ext_id, obj.x, obj.y
            );
            let mut fallback = Painter::new(canvas, obj);
            fallback.paint_diagnostic(failed_object_tile(obj));
            let (footprint, _) = fallback.finish();
            ObjectRender::new(footprint, Some(err.to_string()))
        }
    }
}

/// Retag an object that lost writes to the level edge so the loss shows.
fn mark_overflow(grid: &mut TileGrid, footprint: &ObjectFootprint) {
    let border = [0u8, (GRID_HEIGHT - 1) as u8];
    let mut marked = false;
    for &(x, y) in &footprint.primary {
        if border.contains(&y) {
            let cell = grid.get(x, y);
            grid.set(x, y, cell.retag(OVERFLOW_MARKER));
            marked = true;
        }
    }
    if !marked {
        if let Some((x, y)) = footprint.last {
            let cell = grid.get(x, y);
            grid.set(x, y, cell.retag(OVERFLOW_MARKER));
        }
    }
}

fn resolve_screen_links(canvas: &mut Canvas) {
    let links: Vec<(ScreenIdx, ScreenIdx)> = canvas.screens.links().collect();
    for (link, current) in links {
        let source = canvas.screens.resolve(current);
        debug!("Copying screen {source:#04x} onto linked screen {link:#04x} (via {current:#04x})");
        canvas.grid.copy_screen(source, link);
    }
}
