//! Object ID → placement routine.
//!
//! Two 256-entry tables, one for standard object numbers and one for
//! extended object numbers. Every slot holds a routine; IDs without a
//! dedicated routine get a fallback that paints a diagnostic tile over the
//! object's nominal footprint, so unknown objects stay visible.

use std::sync::OnceLock;

use tilegen_game::{tile::unsupported_object_tile, ExtendedId, Object, ObjectId};

use crate::objects;
use crate::painter::{Painter, PlacementResult};

pub type Routine = Box<dyn Fn(&mut Painter<'_>) -> PlacementResult + Send + Sync>;

pub struct DispatchTable {
    standard: Vec<Routine>,
    extended: Vec<Routine>,
    standard_known: [bool; 256],
    extended_known: [bool; 256],
}

fn unsupported(p: &mut Painter<'_>) -> PlacementResult {
    let cell = unsupported_object_tile(p.object());
    if p.object().is_extended() {
        return p.write_cell(Some(cell), p.x(), p.y(), true, true);
    }
    let xs: Vec<u8> = p.x_range(p.x(), p.width_span()).collect();
    for y in p.y_range(p.y(), p.height_span()) {
        for &x in &xs {
            p.write_cell(Some(cell), x, y, true, true)?;
        }
    }
    Ok(())
}

impl DispatchTable {
    pub fn build() -> Self {
        let mut table = DispatchTable {
            standard: (0..256).map(|_| Box::new(unsupported) as Routine).collect(),
            extended: (0..256).map(|_| Box::new(unsupported) as Routine).collect(),
            standard_known: [false; 256],
            extended_known: [false; 256],
        };
        objects::register_all(&mut table);
        table
    }

    pub fn register_standard<F>(&mut self, id: ObjectId, routine: F)
    where
        F: Fn(&mut Painter<'_>) -> PlacementResult + Send + Sync + 'static,
    {
        assert!(id != 0, "object 0x00 selects the extended table");
        assert!(
            !self.standard_known[id as usize],
            "standard object {id:#04x} registered twice"
        );
        self.standard[id as usize] = Box::new(routine);
        self.standard_known[id as usize] = true;
    }

    pub fn register_extended<F>(&mut self, ext_id: ExtendedId, routine: F)
    where
        F: Fn(&mut Painter<'_>) -> PlacementResult + Send + Sync + 'static,
    {
        assert!(
            !self.extended_known[ext_id as usize],
            "extended object {ext_id:#04x} registered twice"
        );
        self.extended[ext_id as usize] = Box::new(routine);
        self.extended_known[ext_id as usize] = true;
    }

    pub fn routine(&self, object: &Object) -> &Routine {
        match object.extended_id() {
            Some(ext_id) => &self.extended[ext_id as usize],
            None => &self.standard[object.id as usize],
        }
    }

    /// True when the object has a dedicated routine rather than the fallback.
    pub fn is_supported(&self, object: &Object) -> bool {
        match object.extended_id() {
            Some(ext_id) => self.extended_known[ext_id as usize],
            None => self.standard_known[object.id as usize],
        }
    }

    pub fn supported_counts(&self) -> (usize, usize) {
        (
            self.standard_known.iter().filter(|&&k| k).count(),
            self.extended_known.iter().filter(|&&k| k).count(),
        )
    }
}

pub fn dispatch_table() -> &'static DispatchTable {
    static TABLE: OnceLock<DispatchTable> = OnceLock::new();
    TABLE.get_or_init(DispatchTable::build)
}
