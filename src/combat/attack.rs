//! Attack resolution
//!
//! To-hit and damage rules for the two weapon kinds a unit can use.
//! A natural 20 always hits and doubles damage, a natural 1 always
//! misses, otherwise the roll plus the weapon's to-hit bonus is compared
//! against the target's armor class.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use super::dice::{is_critical, is_fumble, DieRoller};

/// Raised when free-form text names an attack kind that does not exist
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown attack type: {0}")]
pub struct UnknownAttackType(pub String);

/// Weapon kinds available to a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    /// Melee swing, higher to-hit and damage
    Sword,
    /// Ranged shot, lower to-hit and damage
    Bow,
}

impl AttackKind {
    /// The fixed to-hit and damage numbers for this weapon kind
    pub fn profile(&self) -> AttackProfile {
        match self {
            AttackKind::Sword => AttackProfile {
                to_hit: 15,
                damage: DamageDice::new(1, 6, 11),
            },
            AttackKind::Bow => AttackProfile {
                to_hit: 13,
                damage: DamageDice::new(1, 6, 5),
            },
        }
    }
}

impl FromStr for AttackKind {
    type Err = UnknownAttackType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sword" | "melee" => Ok(AttackKind::Sword),
            "bow" | "ranged" => Ok(AttackKind::Bow),
            other => Err(UnknownAttackType(other.to_string())),
        }
    }
}

impl std::fmt::Display for AttackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AttackKind::Sword => "sword",
            AttackKind::Bow => "bow",
        };
        write!(f, "{}", s)
    }
}

/// To-hit bonus and damage dice for a weapon kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackProfile {
    /// Added to the d20 roll when checking against armor class
    pub to_hit: i32,
    /// Rolled for damage on a hit
    pub damage: DamageDice,
}

/// A damage roll specification like "1d6+11"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageDice {
    /// Number of dice to roll
    pub count: u32,
    /// Number of sides per die
    pub sides: u32,
    /// Modifier added to the dice total
    pub modifier: i32,
}

impl DamageDice {
    /// Create a new damage specification
    pub const fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self { count, sides, modifier }
    }

    /// Roll the dice and return the total
    pub fn roll(&self, roller: &mut dyn DieRoller) -> i32 {
        let mut total: i32 = 0;
        for _ in 0..self.count {
            total += roller.roll(self.sides) as i32;
        }
        total + self.modifier
    }
}

impl std::fmt::Display for DamageDice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.modifier > 0 {
            write!(f, "{}d{}+{}", self.count, self.sides, self.modifier)
        } else if self.modifier < 0 {
            write!(f, "{}d{}{}", self.count, self.sides, self.modifier)
        } else {
            write!(f, "{}d{}", self.count, self.sides)
        }
    }
}

/// Result of a single attack roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    /// Whether the attack hit
    pub hit: bool,
    /// Damage dealt outward on a hit (already doubled on a critical)
    pub damage: i32,
    /// Natural 20
    pub critical_hit: bool,
    /// Natural 1
    pub critical_miss: bool,
    /// The raw d20 roll
    pub roll: u32,
}

impl AttackOutcome {
    /// Resolve an attack from a d20 roll and pre-rolled base damage
    ///
    /// `base_damage` includes the weapon dice and any damage buff; a
    /// critical hit doubles it here.
    pub fn resolve(roll: u32, to_hit: i32, armor_class: i32, base_damage: i32) -> Self {
        let critical_hit = is_critical(roll);
        let critical_miss = is_fumble(roll);

        // Critical always hits, fumble always misses
        let hit = critical_hit || (!critical_miss && roll as i32 + to_hit >= armor_class);
        let damage = if critical_hit { base_damage * 2 } else { base_damage };

        Self {
            hit,
            damage,
            critical_hit,
            critical_miss,
            roll,
        }
    }
}
