//! Debug views of a finished grid: a one-pixel-per-cell PNG and a hex dump.

use std::io::Cursor;

use anyhow::Result;
use image::{Rgba, RgbaImage};
use tilegen_game::{tile::Diagnostic, TileCell, GRID_HEIGHT, GRID_WIDTH};

use crate::grid::TileGrid;

fn cell_color(cell: TileCell) -> Rgba<u8> {
    if cell.is_empty() {
        return Rgba([0, 0, 0, 0]);
    }
    let display = cell.display();
    match Diagnostic::from_display(display) {
        Some(Diagnostic::UnsupportedStandard(id) | Diagnostic::UnsupportedExtended(id)) => {
            Rgba([255, 0, id, 255])
        }
        Some(Diagnostic::FailedStandard(id) | Diagnostic::FailedExtended(id)) => {
            Rgba([160, 0, id, 255])
        }
        Some(Diagnostic::Overflow) => Rgba([255, 255, 0, 255]),
        None => {
            // Spread neighbouring tile numbers across the colour space; keep
            // red low so ordinary tiles never look like diagnostics.
            let h = display.wrapping_mul(0x9E37_79B9);
            Rgba([(h >> 24) as u8 & 0x7F, (h >> 16) as u8, (h >> 8) as u8, 255])
        }
    }
}

pub fn render_preview(grid: &TileGrid) -> RgbaImage {
    let mut img = RgbaImage::new(GRID_WIDTH as u32, GRID_HEIGHT as u32);
    for y in 0..GRID_HEIGHT {
        for (x, &cell) in grid.row(y as u8).iter().enumerate() {
            img.put_pixel(x as u32, y as u32, cell_color(cell));
        }
    }
    img
}

pub fn preview_png(grid: &TileGrid) -> Result<Vec<u8>> {
    let img = render_preview(grid);
    let mut out: Vec<u8> = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), image::ImageOutputFormat::Png)?;
    Ok(out)
}

/// One line per non-empty row: the row number, then each cell's display
/// identity in hex. Tagged cells are marked with `*`.
pub fn hex_dump(grid: &TileGrid) -> String {
    let mut out = String::new();
    for y in 0..GRID_HEIGHT as u8 {
        if grid.is_row_empty(y) {
            continue;
        }
        out.push_str(&format!("{y:02X}:"));
        for &cell in grid.row(y) {
            let mark = if cell.is_tagged() { "*" } else { " " };
            out.push_str(&format!(" {:05X}{mark}", cell.display()));
        }
        out.push('\n');
    }
    out
}
