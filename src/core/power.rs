// Power formulas used by the fight odds estimate.

use super::model::{Element, StatSlot, WeaponAttributes, WeaponRecord};
use super::stats::{decode_weapon_properties, decode_weapon_trait};

const TRAIT_BONUS_STEP: f64 = 0.075;
const MATCHING_STAT_MULTIPLIER: f64 = 0.002675;
const OTHER_STAT_MULTIPLIER: f64 = 0.0025;
const POWER_STAT_MULTIPLIER: f64 = 0.002575;

/// Base power of a character; the multiplier steps up every 10 levels.
pub fn character_power(level: u32) -> f64 {
    let level = f64::from(level);
    (1000.0 + 10.0 * level) * ((level / 10.0).floor() + 1.0)
}

pub fn trait_bonus(character: Element, weapon: Element, enemy: Element) -> f64 {
    let mut bonus = 1.0;
    if character == weapon {
        bonus += TRAIT_BONUS_STEP;
    }
    bonus += TRAIT_BONUS_STEP * f64::from(character.effectiveness_against(enemy));
    bonus
}

pub fn weapon_stat_value(slot: StatSlot, raw: u16, character: Element) -> f64 {
    let multiplier = match slot {
        StatSlot::Power => POWER_STAT_MULTIPLIER,
        StatSlot::Element(element) if element == character => MATCHING_STAT_MULTIPLIER,
        StatSlot::Element(_) => OTHER_STAT_MULTIPLIER,
    };
    f64::from(raw) * multiplier
}

pub fn total_weapon_stats(record: &WeaponRecord, character: Element) -> f64 {
    decode_weapon_properties(record.properties)
        .iter()
        .zip(record.stats)
        .map(|(slot, raw)| weapon_stat_value(*slot, raw, character))
        .sum()
}

/// Resolve a raw weapon record against the character that wields it.
pub fn weapon_attributes(record: &WeaponRecord, character: Element) -> WeaponAttributes {
    WeaponAttributes {
        element: decode_weapon_trait(record.properties),
        bonus_power: record.bonus_power,
        total_stats: total_weapon_stats(record, character),
    }
}

pub fn aligned_attack_power(character_power: f64, weapon: &WeaponAttributes) -> f64 {
    ((weapon.total_stats + 1.0) * character_power) + f64::from(weapon.bonus_power)
}
