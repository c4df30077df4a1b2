// Decoding of bit-packed on-chain fields.

use super::model::{Element, Opponent, StatSlot};

const OPPONENT_POWER_MASK: u32 = 0x00FF_FFFF;
const OPPONENT_TRAIT_SHIFT: u32 = 24;

/// Extract the three stat slot types from a weapon's `properties` word.
///
/// Bits 5..12 hold a base-5 number whose digits, least significant first,
/// are the slot types.
pub fn decode_weapon_properties(properties: u16) -> [StatSlot; 3] {
    let pattern = (properties >> 5) & 0x7f;
    let digit = |value: u16| StatSlot::from_digit((value % 5) as u8);
    [
        digit(pattern),
        digit(pattern / 5),
        digit(pattern / 5 / 5),
    ]
}

/// Weapon element lives in bits 3..5 of `properties`.
pub fn decode_weapon_trait(properties: u16) -> Element {
    Element::from_bits(u32::from((properties >> 3) & 0x3))
}

/// Targets come back as one word each: power in the low 24 bits, trait above.
pub fn decode_opponent(word: u32) -> Opponent {
    Opponent {
        power: word & OPPONENT_POWER_MASK,
        element: Element::from_bits(word >> OPPONENT_TRAIT_SHIFT),
    }
}
