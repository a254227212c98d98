//! Saving throws
//!
//! Ability checks against a difficulty class. A natural 20 always
//! succeeds, a natural 1 always fails, otherwise the roll plus the
//! ability's fixed bonus is compared against the DC.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use super::dice::{is_critical, is_fumble};

/// Raised when free-form text names an ability that does not exist
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown ability: {0}")]
pub struct UnknownAbility(pub String);

/// The six abilities a saving throw can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    /// Fixed saving-throw bonus for this ability
    pub fn bonus(&self) -> i32 {
        match self {
            Ability::Strength => 2,
            Ability::Dexterity => 2,
            Ability::Constitution => 2,
            Ability::Intelligence => 2,
            Ability::Wisdom => -1,
            Ability::Charisma => -3,
        }
    }

    /// Get all abilities
    pub fn all() -> &'static [Ability] {
        &[
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }
}

impl FromStr for Ability {
    type Err = UnknownAbility;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strength" | "str" => Ok(Ability::Strength),
            "dexterity" | "dex" => Ok(Ability::Dexterity),
            "constitution" | "con" => Ok(Ability::Constitution),
            "intelligence" | "int" => Ok(Ability::Intelligence),
            "wisdom" | "wis" => Ok(Ability::Wisdom),
            "charisma" | "cha" => Ok(Ability::Charisma),
            other => Err(UnknownAbility(other.to_string())),
        }
    }
}

impl std::fmt::Display for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Ability::Strength => "strength",
            Ability::Dexterity => "dexterity",
            Ability::Constitution => "constitution",
            Ability::Intelligence => "intelligence",
            Ability::Wisdom => "wisdom",
            Ability::Charisma => "charisma",
        };
        write!(f, "{}", s)
    }
}

/// Result of a single saving throw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Whether the save succeeded
    pub success: bool,
    /// The raw d20 roll
    pub roll: u32,
    /// Natural 20
    pub critical_success: bool,
    /// Natural 1
    pub critical_failure: bool,
}

impl SaveOutcome {
    /// Resolve a saving throw from a d20 roll
    pub fn resolve(roll: u32, bonus: i32, dc: i32) -> Self {
        let critical_success = is_critical(roll);
        let critical_failure = is_fumble(roll);

        // Natural 1 fails before the arithmetic is consulted
        let success = if critical_failure {
            false
        } else {
            critical_success || roll as i32 + bonus >= dc
        };

        Self {
            success,
            roll,
            critical_success,
            critical_failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bonus_table() {
        assert_eq!(Ability::Strength.bonus(), 2);
        assert_eq!(Ability::Dexterity.bonus(), 2);
        assert_eq!(Ability::Constitution.bonus(), 2);
        assert_eq!(Ability::Intelligence.bonus(), 2);
        assert_eq!(Ability::Wisdom.bonus(), -1);
        assert_eq!(Ability::Charisma.bonus(), -3);
    }

    #[test]
    fn test_parse_ability() {
        assert_eq!("dexterity".parse::<Ability>(), Ok(Ability::Dexterity));
        assert_eq!("DEX".parse::<Ability>(), Ok(Ability::Dexterity));
        assert_eq!("wis".parse::<Ability>(), Ok(Ability::Wisdom));
        assert_eq!(
            "luck".parse::<Ability>(),
            Err(UnknownAbility("luck".to_string()))
        );
    }

    #[test]
    fn test_natural_twenty_always_succeeds() {
        // 20 - 3 = 17 < 30, but a natural 20 succeeds anyway
        let outcome = SaveOutcome::resolve(20, Ability::Charisma.bonus(), 30);
        assert!(outcome.success);
        assert!(outcome.critical_success);
        assert!(!outcome.critical_failure);
    }

    #[test]
    fn test_natural_one_always_fails() {
        // 1 + 2 = 3 >= 2, but a natural 1 fails anyway
        let outcome = SaveOutcome::resolve(1, Ability::Dexterity.bonus(), 2);
        assert!(!outcome.success);
        assert!(outcome.critical_failure);
        assert!(!outcome.critical_success);
    }

    #[test]
    fn test_threshold_comparison() {
        // 13 + 2 = 15 >= 15
        assert!(SaveOutcome::resolve(13, 2, 15).success);
        // 12 + 2 = 14 < 15
        assert!(!SaveOutcome::resolve(12, 2, 15).success);
        // 16 - 1 = 15 >= 15
        assert!(SaveOutcome::resolve(16, -1, 15).success);
    }
}
