use alloy_primitives::Address;
use chrono::{DateTime, Utc};

/// On-chain NFT id of a character or weapon.
pub type TokenId = u64;

/// Elemental affinity. The discriminants are the on-chain trait values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Fire = 0,
    Earth = 1,
    Lightning = 2,
    Water = 3,
}

impl Element {
    pub const COUNT: u8 = 4;

    /// Only the two low bits are significant.
    pub fn from_bits(bits: u32) -> Self {
        match bits & 0b11 {
            0 => Self::Fire,
            1 => Self::Earth,
            2 => Self::Lightning,
            _ => Self::Water,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// +1 when `self` beats `other`, -1 when `other` beats `self`, 0 otherwise.
    /// Each element beats its cyclic successor.
    pub fn effectiveness_against(self, other: Element) -> i8 {
        if (self.index() + 1) % Self::COUNT == other.index() {
            1
        } else if (other.index() + 1) % Self::COUNT == self.index() {
            -1
        } else {
            0
        }
    }

    pub fn all() -> &'static [Element] {
        &[Self::Fire, Self::Earth, Self::Lightning, Self::Water]
    }
}

/// Type of one of the three weapon stat slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatSlot {
    Element(Element),
    /// Non-elemental slot, encoded as 4.
    Power,
}

impl StatSlot {
    pub const POWER_DIGIT: u8 = 4;

    pub fn from_digit(digit: u8) -> Self {
        if digit >= Self::POWER_DIGIT {
            Self::Power
        } else {
            Self::Element(Element::from_bits(u32::from(digit)))
        }
    }

    pub fn digit(self) -> u8 {
        match self {
            Self::Element(element) => element.index(),
            Self::Power => Self::POWER_DIGIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterAttributes {
    pub level: u32,
    pub element: Element,
}

/// Raw weapon record as stored on chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeaponRecord {
    pub properties: u16,
    pub stats: [u16; 3],
    pub bonus_power: u32,
}

/// Weapon figures relative to the character wielding it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponAttributes {
    pub element: Element,
    pub bonus_power: u32,
    pub total_stats: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opponent {
    /// 24-bit power value.
    pub power: u32,
    pub element: Element,
}

/// Opponent with its computed odds and its 1-based position in the target list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedOpponent {
    pub ordinal: usize,
    pub opponent: Opponent,
    pub win_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedCharacter {
    pub id: TokenId,
    /// 1-based position within the owning account.
    pub ordinal: usize,
    pub next_check: DateTime<Utc>,
}

impl TrackedCharacter {
    /// New characters are due immediately.
    pub fn new(id: TokenId, ordinal: usize) -> Self {
        Self {
            id,
            ordinal,
            next_check: DateTime::<Utc>::from(std::time::UNIX_EPOCH),
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_check <= now
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedAccount {
    pub address: Address,
    pub name: String,
    /// Weapon used for fight odds; `None` disables odds gating.
    pub weapon_id: Option<TokenId>,
    pub characters: Vec<TrackedCharacter>,
}

/// A character that should be mentioned in this cycle's notification.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationCandidate {
    pub ordinal: usize,
    pub stamina: u8,
    /// Set when the threshold is still ahead; `None` means already reached.
    pub threshold_reached_at: Option<DateTime<Utc>>,
    pub opponent: Option<RankedOpponent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effectiveness_is_cyclic() {
        assert_eq!(Element::Fire.effectiveness_against(Element::Earth), 1);
        assert_eq!(Element::Water.effectiveness_against(Element::Fire), 1);
        assert_eq!(Element::Fire.effectiveness_against(Element::Water), -1);
        assert_eq!(Element::Fire.effectiveness_against(Element::Lightning), 0);
        for element in Element::all() {
            assert_eq!(element.effectiveness_against(*element), 0);
        }
    }

    #[test]
    fn test_stat_slot_digits() {
        assert_eq!(StatSlot::from_digit(0), StatSlot::Element(Element::Fire));
        assert_eq!(StatSlot::from_digit(3), StatSlot::Element(Element::Water));
        assert_eq!(StatSlot::from_digit(4), StatSlot::Power);
        assert_eq!(StatSlot::Power.digit(), 4);
    }

    #[test]
    fn test_new_character_is_due() {
        let character = TrackedCharacter::new(7, 1);
        assert!(character.is_due(Utc::now()));
    }
}
