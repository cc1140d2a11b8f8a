//! Blocks, rows and columns with distinct edge tiles.

use tilegen_game::ObjectId;

use crate::dispatch::DispatchTable;
use crate::painter::Tile;
use crate::shapes::{BorderedBlock, BorderedLine};

/// Bordered block banks: first ID, last ID, first tile page.
const BLOCK_BANKS: [(ObjectId, ObjectId, Tile); 2] = [(0x50, 0x6F, 0x0400), (0xD0, 0xDF, 0x0700)];

/// Tile page layout shared by every bordered block: nine block tiles,
/// three row tiles, three column tiles, then the single-cell tile.
const fn block_page(base: Tile) -> BorderedBlock {
    BorderedBlock {
        block: [
            base,
            base + 1,
            base + 2,
            base + 3,
            base + 4,
            base + 5,
            base + 6,
            base + 7,
            base + 8,
        ],
        row: [base + 9, base + 10, base + 11],
        column: [base + 12, base + 13, base + 14],
        single: base + 15,
    }
}

fn bordered_block(id: ObjectId) -> Option<BorderedBlock> {
    BLOCK_BANKS
        .iter()
        .find(|(first, last, _)| (*first..=*last).contains(&id))
        .map(|&(first, _, tiles)| block_page(tiles + (id - first) as Tile * 0x10))
}

const fn line(first: Tile, middle: &'static [Tile], last: Tile, single: Tile) -> BorderedLine {
    BorderedLine {
        first,
        middle,
        last,
        single,
    }
}

const ROWS: [(ObjectId, BorderedLine); 16] = [
    (0x70, line(0x0600, &[0x0601], 0x0602, 0x0603)), // wooden bridge
    (0x71, line(0x0604, &[0x0605], 0x0606, 0x0607)), // stone bridge
    (0x72, line(0x0608, &[0x0609, 0x060A], 0x060B, 0x060C)), // log
    (0x73, line(0x060D, &[0x060E], 0x060F, 0x0610)), // mushroom cap
    (0x74, line(0x0611, &[0x0612], 0x0613, 0x0614)), // semisolid platform
    (0x75, line(0x0615, &[0x0616, 0x0617], 0x0618, 0x0619)), // railing
    (0x76, line(0x061A, &[0x061B], 0x061C, 0x061D)), // cloud ledge
    (0x77, line(0x061E, &[0x061F], 0x0620, 0x0621)), // shelf
    (0x78, line(0x0622, &[0x0623], 0x0624, 0x0625)), // girder
    (0x79, line(0x0626, &[0x0627, 0x0628, 0x0629], 0x062A, 0x062B)), // spiked beam
    (0x7A, line(0x062C, &[0x062D], 0x062E, 0x062F)), // ice ledge
    (0x7B, line(0x0630, &[0x0631], 0x0632, 0x0633)), // awning
    (0x7C, line(0x0634, &[0x0635], 0x0636, 0x0637)), // horizontal pipe body
    (0x7D, line(0x0638, &[0x0639], 0x063A, 0x063B)), // lava rim
    (0x7E, line(0x063C, &[0x063D, 0x063E], 0x063F, 0x0640)), // fence rail
    (0x7F, line(0x0641, &[], 0x0642, 0x0643)), // two-piece slab
];

const COLUMNS: [(ObjectId, BorderedLine); 16] = [
    (0x80, line(0x0680, &[0x0681], 0x0682, 0x0683)), // vertical pipe body
    (0x81, line(0x0684, &[0x0685], 0x0686, 0x0687)), // stone column
    (0x82, line(0x0688, &[0x0689, 0x068A], 0x068B, 0x068C)), // palm trunk
    (0x83, line(0x068D, &[0x068E], 0x068F, 0x0690)), // ladder
    (0x84, line(0x0691, &[0x0692], 0x0693, 0x0694)), // chain
    (0x85, line(0x0695, &[0x0696], 0x0697, 0x0698)), // goal post
    (0x86, line(0x0699, &[0x069A, 0x069B], 0x069C, 0x069D)), // vine
    (0x87, line(0x069E, &[0x069F], 0x06A0, 0x06A1)), // totem
    (0x88, line(0x06A2, &[0x06A3], 0x06A4, 0x06A5)), // wooden post
    (0x89, line(0x06A6, &[0x06A7], 0x06A8, 0x06A9)), // ice column
    (0x8A, line(0x06AA, &[0x06AB, 0x06AC, 0x06AD], 0x06AE, 0x06AF)), // cactus
    (0x8B, line(0x06B0, &[0x06B1], 0x06B2, 0x06B3)), // banner
    (0x8C, line(0x06B4, &[0x06B5], 0x06B6, 0x06B7)), // pole
    (0x8D, line(0x06B8, &[0x06B9], 0x06BA, 0x06BB)), // lava fall
    (0x8E, line(0x06BC, &[0x06BD, 0x06BE], 0x06BF, 0x06C0)), // crystal
    (0x8F, line(0x06C1, &[], 0x06C2, 0x06C3)), // two-piece post
];

pub(super) fn register(table: &mut DispatchTable) {
    let block_ids = BLOCK_BANKS
        .iter()
        .flat_map(|&(first, last, _)| first..=last);
    for id in block_ids {
        let Some(block) = bordered_block(id) else {
            continue;
        };
        table.register_standard(id, move |p| {
            p.bordered_rect(&block, p.x(), p.y(), p.width_span(), p.height_span())
        });
    }

    // Rows repeat down the object's height; columns repeat across its width.
    for (id, row) in ROWS {
        table.register_standard(id, move |p| {
            let ys: Vec<u16> = p.y_range(p.y(), p.height_span()).collect();
            for y in ys {
                p.bordered_row(&row, p.x(), y, p.width_span())?;
            }
            Ok(())
        });
    }
    for (id, column) in COLUMNS {
        table.register_standard(id, move |p| {
            let xs: Vec<u8> = p.x_range(p.x(), p.width_span()).collect();
            for x in xs {
                p.bordered_column(&column, x, p.y(), p.height_span())?;
            }
            Ok(())
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::dispatch_table;
    use crate::dynamic::DynamicTileTable;
    use crate::painter::{Canvas, Painter};
    use rand::{rngs::StdRng, SeedableRng};
    use tilegen_game::{AlgorithmVariant, FormatVersion, Object, OverflowPolicy, TileCell};

    fn render(obj: &Object) -> (Canvas, usize) {
        let mut canvas = Canvas::new(
            DynamicTileTable::new(0).unwrap(),
            OverflowPolicy::Exception,
            AlgorithmVariant::Accuracy,
            FormatVersion::Current,
            false,
            StdRng::seed_from_u64(0),
        );
        let mut p = Painter::new(&mut canvas, obj);
        dispatch_table().routine(obj)(&mut p).unwrap();
        let (footprint, _) = p.finish();
        (canvas, footprint.primary.len())
    }

    #[test]
    fn test_degenerate_blocks() {
        let block = bordered_block(0x50).unwrap();

        let (canvas, n) = render(&Object::standard(0x50, 0x08, 0x08, None, None));
        assert_eq!(n, 1);
        assert_eq!(canvas.grid.get(0x08, 0x08), TileCell::Plain(block.single as u32));

        let (canvas, n) = render(&Object::standard(0x50, 0x08, 0x08, Some(2), None));
        assert_eq!(n, 3);
        let row: Vec<TileCell> = (0x08..=0x0A).map(|x| canvas.grid.get(x, 0x08)).collect();
        let expected: Vec<TileCell> = block.row.iter().map(|&t| TileCell::Plain(t as u32)).collect();
        assert_eq!(row, expected);

        let (canvas, n) = render(&Object::standard(0x50, 0x08, 0x08, Some(1), Some(1)));
        assert_eq!(n, 4);
        assert_eq!(canvas.grid.get(0x08, 0x08), TileCell::Plain(block.block[0] as u32));
        assert_eq!(canvas.grid.get(0x09, 0x09), TileCell::Plain(block.block[8] as u32));
    }

    #[test]
    fn test_second_block_bank() {
        assert_eq!(bordered_block(0x6F).map(|b| b.single), Some(0x05FF));
        assert_eq!(bordered_block(0xD0).map(|b| b.block[0]), Some(0x0700));
        assert!(bordered_block(0xE0).is_none());

        let (canvas, n) = render(&Object::standard(0xD3, 0x20, 0x20, Some(2), Some(2)));
        assert_eq!(n, 9);
        assert_eq!(canvas.grid.get(0x20, 0x20), TileCell::Plain(0x0730));
        assert_eq!(canvas.grid.get(0x21, 0x21), TileCell::Plain(0x0734));
        assert_eq!(canvas.grid.get(0x22, 0x22), TileCell::Plain(0x0738));
    }

    #[test]
    fn test_rows_repeat_down_height() {
        let (canvas, n) = render(&Object::standard(0x70, 0x10, 0x10, Some(2), Some(1)));
        assert_eq!(n, 6);
        for y in [0x10, 0x11] {
            assert_eq!(canvas.grid.get(0x10, y), TileCell::Plain(0x0600));
            assert_eq!(canvas.grid.get(0x11, y), TileCell::Plain(0x0601));
            assert_eq!(canvas.grid.get(0x12, y), TileCell::Plain(0x0602));
        }
    }

    #[test]
    fn test_column_without_middle() {
        let (canvas, _) = render(&Object::standard(0x8F, 0x10, 0x10, None, Some(2)));
        assert_eq!(canvas.grid.get(0x10, 0x10), TileCell::Plain(0x06C1));
        assert_eq!(canvas.grid.get(0x10, 0x11), TileCell::Plain(0x06C1));
        assert_eq!(canvas.grid.get(0x10, 0x12), TileCell::Plain(0x06C2));
    }
}
