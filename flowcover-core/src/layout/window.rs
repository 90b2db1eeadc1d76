//! Which indices are drawn for a given focus offset

use std::ops::Range;

/// Indices within `radius + 1` of `offset`, intersected with `0..count`.
///
/// The extra tile on each side lets a tile fade in at the window edge
/// instead of popping. Degenerate input (no tiles, non-finite offset)
/// yields an empty range rather than an error.
pub fn visible_range(offset: f32, count: usize, radius: usize) -> Range<usize> {
    if count == 0 || !offset.is_finite() {
        return 0..0;
    }
    let reach = radius as f32 + 1.0;
    let last = (count - 1) as f32;
    let lo = (offset - reach).ceil().max(0.0);
    let hi = (offset + reach).floor().min(last);
    if hi < lo {
        return 0..0;
    }
    lo as usize..hi as usize + 1
}
