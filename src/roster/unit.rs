//! A single combatant
//!
//! Tracks hit points, a temporary damage buff with a remaining-attacks
//! countdown, lifetime success/fail counters, and the most recent check
//! for display. The two check operations are atomic with respect to the
//! unit's own state; health changes are applied by the owning roster.

use serde::{Deserialize, Serialize};

use crate::combat::{Ability, AttackKind, AttackOutcome, DieRoller, SaveOutcome};

use super::ids::UnitId;

/// Human-readable label of a unit's most recent check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LastAction {
    CriticalHit,
    Hit,
    Miss,
    CriticalMiss,
    CriticalSuccess,
    CriticalFailure,
    SaveSuccess,
    SaveFailure,
}

impl std::fmt::Display for LastAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LastAction::CriticalHit => "Critical Hit!",
            LastAction::Hit => "Hit!",
            LastAction::Miss => "Miss",
            LastAction::CriticalMiss => "Critical Miss",
            LastAction::CriticalSuccess => "Critical Success!",
            LastAction::CriticalFailure => "Critical Failure",
            LastAction::SaveSuccess => "Successful Saving Throw",
            LastAction::SaveFailure => "Failed Saving Throw",
        };
        write!(f, "{}", s)
    }
}

/// One combatant in a roster
///
/// Fields are public for display; callers must change health only
/// through the roster operations so the lifetime counters stay honest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique identifier within the owning allocator's lifetime
    pub id: UnitId,
    /// Maximum hit points
    pub max_health: i32,
    /// Current hit points
    pub current_health: i32,
    /// Base attack bonus (stored for display, not used by the checks)
    pub attack_bonus: i32,
    /// Dexterity bonus (stored for display, not used by the checks)
    pub dex_bonus: i32,
    /// Additive bonus to outgoing damage while the buff lasts
    pub damage_buff: i32,
    /// Attacks remaining before the buff expires
    pub buff_duration: u32,
    /// Raw d20 result of the most recent check
    pub last_roll: Option<u32>,
    /// Outcome label of the most recent check
    pub last_action: Option<LastAction>,
    /// Lifetime successful checks
    pub num_successes: u32,
    /// Lifetime failed checks
    pub num_fails: u32,
    /// Lifetime damage dealt outward
    pub damage_done: i32,
}

impl Unit {
    /// Create a unit at full health with zeroed counters
    pub fn new(id: UnitId, max_health: i32, attack_bonus: i32, dex_bonus: i32) -> Self {
        Self {
            id,
            max_health,
            current_health: max_health,
            attack_bonus,
            dex_bonus,
            damage_buff: 0,
            buff_duration: 0,
            last_roll: None,
            last_action: None,
            num_successes: 0,
            num_fails: 0,
            damage_done: 0,
        }
    }

    /// Roll an attack of the given kind against a target armor class
    ///
    /// Damage is the weapon's dice plus the current buff, doubled on a
    /// natural 20. The buff countdown ticks once per call, hit or miss,
    /// and the buff amount resets when it reaches zero. No health
    /// changes here; the outcome's damage is dealt outward.
    pub fn attack_roll(
        &mut self,
        roller: &mut dyn DieRoller,
        armor_class: i32,
        kind: AttackKind,
    ) -> AttackOutcome {
        let profile = kind.profile();
        let base_damage = profile.damage.roll(roller) + self.damage_buff;
        let roll = roller.d20();
        let outcome = AttackOutcome::resolve(roll, profile.to_hit, armor_class, base_damage);
        self.tick_buff();
        outcome
    }

    /// Roll a saving throw against a difficulty class
    pub fn saving_throw(&self, roller: &mut dyn DieRoller, dc: i32, ability: Ability) -> SaveOutcome {
        let roll = roller.d20();
        SaveOutcome::resolve(roll, ability.bonus(), dc)
    }

    /// Take damage, clamped at zero health
    pub fn take_damage(&mut self, amount: i32) {
        self.current_health = (self.current_health - amount).max(0);
    }

    /// Whether the unit is at or below zero health
    pub fn is_down(&self) -> bool {
        self.current_health <= 0
    }

    /// Successes over total attempts, `None` before the first check
    pub fn success_rate(&self) -> Option<f64> {
        let attempts = self.num_successes + self.num_fails;
        if attempts == 0 {
            None
        } else {
            Some(f64::from(self.num_successes) / f64::from(attempts))
        }
    }

    /// One-line health summary for display
    pub fn display_line(&self) -> String {
        format!(
            "Unit {}: Health = {}/{}",
            self.id, self.current_health, self.max_health
        )
    }

    // Countdown runs on every attack; at zero the bonus is gone.
    fn tick_buff(&mut self) {
        self.buff_duration = self.buff_duration.saturating_sub(1);
        if self.buff_duration == 0 {
            self.damage_buff = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::SequenceRoller;

    fn unit() -> Unit {
        Unit::new(1, 47, 13, 2)
    }

    #[test]
    fn test_new_unit_defaults() {
        let u = unit();
        assert_eq!(u.current_health, 47);
        assert_eq!(u.damage_buff, 0);
        assert_eq!(u.buff_duration, 0);
        assert_eq!(u.last_roll, None);
        assert_eq!(u.last_action, None);
        assert_eq!(u.num_successes, 0);
        assert_eq!(u.num_fails, 0);
        assert_eq!(u.damage_done, 0);
    }

    #[test]
    fn test_attack_damage_includes_buff() {
        let mut u = unit();
        u.damage_buff = 3;
        u.buff_duration = 2;

        // Damage die 4, then d20 of 10: sword is 11 + 4 + 3 = 18 damage
        let mut roller = SequenceRoller::new([4, 10]);
        let outcome = u.attack_roll(&mut roller, 20, AttackKind::Sword);
        assert!(outcome.hit); // 10 + 15 >= 20
        assert_eq!(outcome.damage, 18);
    }

    #[test]
    fn test_critical_doubles_after_buff() {
        let mut u = unit();
        u.damage_buff = 3;
        u.buff_duration = 2;

        // Damage die 4, natural 20: (11 + 4 + 3) * 2 = 36
        let mut roller = SequenceRoller::new([4, 20]);
        let outcome = u.attack_roll(&mut roller, 30, AttackKind::Sword);
        assert!(outcome.critical_hit);
        assert_eq!(outcome.damage, 36);
    }

    #[test]
    fn test_buff_expires_after_duration() {
        let mut u = unit();
        u.damage_buff = 5;
        u.buff_duration = 2;

        let mut roller = SequenceRoller::new([3, 1, 3, 10, 3, 10]);

        // First attack (a fumble): countdown still ticks
        u.attack_roll(&mut roller, 15, AttackKind::Bow);
        assert_eq!(u.buff_duration, 1);
        assert_eq!(u.damage_buff, 5);

        // Second attack: countdown hits zero, bonus resets
        u.attack_roll(&mut roller, 15, AttackKind::Bow);
        assert_eq!(u.buff_duration, 0);
        assert_eq!(u.damage_buff, 0);

        // Third attack: bow is 5 + 3 with no buff left
        let outcome = u.attack_roll(&mut roller, 15, AttackKind::Bow);
        assert_eq!(outcome.damage, 8);
    }

    #[test]
    fn test_saving_throw_uses_ability_bonus() {
        let u = unit();

        // 13 + 2 (dexterity) = 15 >= 15
        let mut roller = SequenceRoller::new([13]);
        assert!(u.saving_throw(&mut roller, 15, Ability::Dexterity).success);

        // 13 - 1 (wisdom) = 12 < 15
        let mut roller = SequenceRoller::new([13]);
        assert!(!u.saving_throw(&mut roller, 15, Ability::Wisdom).success);
    }

    #[test]
    fn test_take_damage_clamps_at_zero() {
        let mut u = unit();
        u.take_damage(50);
        assert_eq!(u.current_health, 0);
        assert!(u.is_down());
    }

    #[test]
    fn test_success_rate() {
        let mut u = unit();
        assert_eq!(u.success_rate(), None);

        u.num_successes = 3;
        u.num_fails = 1;
        assert_eq!(u.success_rate(), Some(0.75));
    }

    #[test]
    fn test_display_line() {
        let mut u = unit();
        u.current_health = 12;
        assert_eq!(u.display_line(), "Unit 1: Health = 12/47");
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(LastAction::CriticalHit.to_string(), "Critical Hit!");
        assert_eq!(LastAction::Hit.to_string(), "Hit!");
        assert_eq!(LastAction::Miss.to_string(), "Miss");
        assert_eq!(LastAction::CriticalMiss.to_string(), "Critical Miss");
        assert_eq!(LastAction::CriticalSuccess.to_string(), "Critical Success!");
        assert_eq!(LastAction::CriticalFailure.to_string(), "Critical Failure");
        assert_eq!(LastAction::SaveSuccess.to_string(), "Successful Saving Throw");
        assert_eq!(LastAction::SaveFailure.to_string(), "Failed Saving Throw");
    }
}
