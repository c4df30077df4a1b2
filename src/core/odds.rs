// Fight odds estimate.
//
// Both sides roll uniformly between 90% and 110% of their power and the
// character wins ties. Every integer roll pair is counted.

use super::model::{Element, Opponent, RankedOpponent};
use super::power::trait_bonus;

const ROLL_LOW: f64 = 0.9;
const ROLL_HIGH: f64 = 1.1;

/// Inclusive integer roll interval for a power value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollRange {
    pub min: i64,
    pub max: i64,
}

impl RollRange {
    pub fn from_power(power: f64) -> Self {
        Self {
            min: (power * ROLL_LOW).floor() as i64,
            max: (power * ROLL_HIGH).floor() as i64,
        }
    }

    pub fn len(&self) -> u64 {
        if self.max < self.min {
            0
        } else {
            (self.max - self.min + 1) as u64
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of rolls in this range that are `<= roll`.
    fn count_at_most(&self, roll: i64) -> u64 {
        if roll < self.min {
            0
        } else {
            ((roll.min(self.max) - self.min + 1) as u64).min(self.len())
        }
    }
}

/// Wins and losses over the full product of both roll ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RollTally {
    pub wins: u64,
    pub losses: u64,
}

impl RollTally {
    pub fn count(own: RollRange, enemy: RollRange) -> Self {
        let enemy_len = enemy.len();
        let mut tally = Self::default();
        // For each own roll, every enemy roll at or below it is a win.
        for roll in own.min..=own.max {
            let wins = enemy.count_at_most(roll);
            tally.wins += wins;
            tally.losses += enemy_len - wins;
        }
        tally
    }

    /// Percentage truncated to two decimals.
    pub fn win_percentage(&self) -> f64 {
        let total = self.wins + self.losses;
        if total == 0 {
            return 0.0;
        }
        let percentage = (self.wins as f64 / total as f64) * 100.0;
        (percentage * 100.0).floor() / 100.0
    }
}

pub fn fight_win_percentage(
    aligned_power: f64,
    character: Element,
    weapon: Element,
    opponent: &Opponent,
) -> f64 {
    let bonus = trait_bonus(character, weapon, opponent.element);
    let own = RollRange::from_power(aligned_power * bonus);
    let enemy = RollRange::from_power(f64::from(opponent.power));
    RollTally::count(own, enemy).win_percentage()
}

/// Pick the opponent with the best odds. Ties keep the earliest opponent.
pub fn best_opponent(
    aligned_power: f64,
    character: Element,
    weapon: Element,
    opponents: &[Opponent],
) -> Option<RankedOpponent> {
    let mut best: Option<RankedOpponent> = None;
    for (i, opponent) in opponents.iter().enumerate() {
        let ranked = RankedOpponent {
            ordinal: i + 1,
            opponent: *opponent,
            win_percentage: fight_win_percentage(aligned_power, character, weapon, opponent),
        };
        match best {
            Some(current) if ranked.win_percentage <= current.win_percentage => {}
            _ => best = Some(ranked),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::WeaponRecord;
    use crate::core::power::{aligned_attack_power, character_power, weapon_attributes};

    fn naive_tally(own: RollRange, enemy: RollRange) -> RollTally {
        let mut tally = RollTally::default();
        for a in own.min..=own.max {
            for b in enemy.min..=enemy.max {
                if a >= b {
                    tally.wins += 1;
                } else {
                    tally.losses += 1;
                }
            }
        }
        tally
    }

    #[test]
    fn test_roll_range_bounds() {
        let range = RollRange::from_power(1000.0);
        assert_eq!(range, RollRange { min: 900, max: 1100 });
        assert_eq!(range.len(), 201);
        assert_eq!(RollRange::from_power(0.0).len(), 1);
    }

    #[test]
    fn test_tally_matches_pairwise_enumeration() {
        let powers = [0.0, 3.0, 17.5, 95.0, 100.0, 101.0, 250.0, 333.3];
        for own in powers {
            for enemy in powers {
                let own = RollRange::from_power(own);
                let enemy = RollRange::from_power(enemy);
                assert_eq!(RollTally::count(own, enemy), naive_tally(own, enemy));
            }
        }
    }

    #[test]
    fn test_collapsed_ranges_are_deterministic() {
        // 2.3 rolls only 2, power 0 rolls only 0
        let own = RollRange::from_power(2.3);
        let enemy = RollRange::from_power(0.0);
        assert_eq!(own.len(), 1);
        assert_eq!(enemy.len(), 1);
        assert_eq!(RollTally::count(own, enemy).win_percentage(), 100.0);
        assert_eq!(RollTally::count(enemy, own).win_percentage(), 0.0);
    }

    #[test]
    fn test_non_overlapping_ranges() {
        let weak = Opponent { power: 10, element: Element::Lightning };
        let strong = Opponent { power: 100_000, element: Element::Lightning };
        assert_eq!(fight_win_percentage(5000.0, Element::Fire, Element::Earth, &weak), 100.0);
        assert_eq!(fight_win_percentage(5000.0, Element::Fire, Element::Earth, &strong), 0.0);
    }

    #[test]
    fn test_equal_power_favours_character() {
        let opponent = Opponent { power: 1000, element: Element::Lightning };
        let percentage = fight_win_percentage(1000.0, Element::Fire, Element::Earth, &opponent);
        // 20301 of 40401 pairs, 50.2487..% truncated
        assert_eq!(percentage, 50.24);
    }

    #[test]
    fn test_best_opponent_prefers_strictly_higher() {
        let opponents = [
            Opponent { power: 1200, element: Element::Lightning },
            Opponent { power: 1000, element: Element::Lightning },
            Opponent { power: 1100, element: Element::Lightning },
            Opponent { power: 5000, element: Element::Lightning },
        ];
        let best = best_opponent(1000.0, Element::Fire, Element::Earth, &opponents).unwrap();
        assert_eq!(best.ordinal, 2);
        assert_eq!(best.opponent.power, 1000);
    }

    #[test]
    fn test_best_opponent_empty() {
        assert!(best_opponent(1000.0, Element::Fire, Element::Fire, &[]).is_none());
    }

    #[test]
    fn test_level_30_fire_character_end_to_end() {
        // slots [Fire, Earth, Power] = digits 0 + 1*5 + 4*25
        let record = WeaponRecord {
            properties: (105 << 5) | (u16::from(Element::Fire.index()) << 3),
            stats: [100, 100, 100],
            bonus_power: 0,
        };
        let weapon = weapon_attributes(&record, Element::Fire);
        assert_eq!(weapon.element, Element::Fire);
        let aligned = aligned_attack_power(character_power(30), &weapon);
        assert!((aligned - 1.775 * 5200.0).abs() < 1e-6);

        let opponents = [
            Opponent { power: 1000, element: Element::Earth },
            Opponent { power: 5000, element: Element::Water },
            Opponent { power: 100, element: Element::Lightning },
            Opponent { power: 20000, element: Element::Fire },
        ];
        let best = best_opponent(aligned, Element::Fire, weapon.element, &opponents).unwrap();
        // first three are certain wins; the tie goes to the first
        assert_eq!(best.ordinal, 1);
        assert_eq!(best.win_percentage, 100.0);
        assert_eq!(
            fight_win_percentage(aligned, Element::Fire, weapon.element, &opponents[3]),
            0.0
        );
    }
}
