/// Wraparound-aware coordinate sequence.
///
/// Yields `start` first, then `|length|` further values stepping by one in
/// the direction of `length`'s sign, modulo `2^wrap_bits`.
#[derive(Clone, Debug)]
pub struct CoordRange {
    next: u16,
    remaining: u32,
    descending: bool,
    mask: u16,
}

pub fn coord_range(start: u16, length: i32, wrap_bits: u8) -> CoordRange {
    let mask = ((1u32 << wrap_bits.clamp(1, 16)) - 1) as u16;
    CoordRange {
        next: start & mask,
        remaining: length.unsigned_abs() + 1,
        descending: length < 0,
        mask,
    }
}

impl Iterator for CoordRange {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        if self.remaining == 0 {
            return None;
        }
        let value = self.next;
        self.next = if self.descending {
            value.wrapping_sub(1) & self.mask
        } else {
            value.wrapping_add(1) & self.mask
        };
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl ExactSizeIterator for CoordRange {}

/// Offset a coordinate by `delta` within a `2^wrap_bits` space.
pub fn wrap_offset(value: u16, delta: i32, wrap_bits: u8) -> u16 {
    let mask = (1i32 << wrap_bits.clamp(1, 16)) - 1;
    ((value as i32 + delta) & mask) as u16
}
