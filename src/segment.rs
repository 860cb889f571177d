//! Conversions between decimal digits and 7-segment patterns.

use crate::constants::NUMBERS;

/// A byte read back from the display that is not one of the ten digit patterns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownPattern(pub u8);

/// Returns the segment pattern that draws `digit`.
///
/// # Panics
///
/// Panics if `digit` is greater than 9.
pub const fn digit_to_segments(digit: u8) -> u8 {
    NUMBERS[digit as usize]
}

/// Maps a segment pattern back to the digit it draws.
pub fn segments_to_digit(pattern: u8) -> Result<u8, UnknownPattern> {
    NUMBERS
        .iter()
        .position(|&segments| segments == pattern)
        .map(|digit| digit as u8)
        .ok_or(UnknownPattern(pattern))
}

/// Number of decimal digits in `value`. Zero has no digits.
pub const fn digit_count(mut value: u32) -> u32 {
    let mut count = 0;
    while value != 0 {
        value /= 10;
        count += 1;
    }
    count
}

/// Digit of `value` at `position`, counted from the ones place.
///
/// Returns `None` when `value` is zero or has fewer than `position + 1` digits.
pub fn digit_at(value: u32, position: u32) -> Option<u8> {
    if position >= digit_count(value) {
        return None;
    }
    Some(((value / 10u32.pow(position)) % 10) as u8)
}
