//! Roster operations
//!
//! An ordered collection of units with batch operations over id
//! selections: group attacks, group saving throws, direct health
//! updates, buff management, and add/remove. Units that reach zero
//! health through a saving throw are pruned; missing ids are skipped
//! with a notice, never fatal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::combat::{Ability, AttackKind, DieRoller, ThreadRoller};

use super::ids::{shared_allocator, IdError, IdSource, UnitId};
use super::unit::{LastAction, Unit};

fn default_roller() -> Box<dyn DieRoller> {
    Box::new(ThreadRoller)
}

/// Per-unit line of a batch report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollEntry {
    /// Unit that rolled
    pub id: UnitId,
    /// Raw d20 result
    pub roll: u32,
    /// Outcome label, as recorded on the unit
    pub action: LastAction,
    /// Damage dealt outward (attacks) or taken (saving throws)
    pub damage: i32,
}

/// Summary of a group attack
#[derive(Debug, Clone, Default)]
pub struct GroupAttackReport {
    /// Per-unit outcomes in request order
    pub entries: Vec<RollEntry>,
    /// Units that hit, critically or otherwise
    pub hits: Vec<UnitId>,
    /// Total damage dealt outward by all hitting units
    pub total_damage: i32,
    /// Requested ids with no matching unit
    pub not_found: Vec<UnitId>,
}

/// Summary of a group saving throw
#[derive(Debug, Clone, Default)]
pub struct GroupSaveReport {
    /// Per-unit outcomes in request order
    pub entries: Vec<RollEntry>,
    /// Units that saved, critically or otherwise
    pub successes: Vec<UnitId>,
    /// Units that dropped to zero health and were removed
    pub collapsed: Vec<UnitId>,
    /// Requested ids with no matching unit
    pub not_found: Vec<UnitId>,
}

/// Summary of a direct health update
#[derive(Debug, Clone, Default)]
pub struct HealthReport {
    /// Units that dropped to or below zero health and were removed
    pub collapsed: Vec<UnitId>,
    /// Requested ids with no matching unit
    pub not_found: Vec<UnitId>,
}

/// Summary of an explicit removal
#[derive(Debug, Clone, Default)]
pub struct RemovalReport {
    /// Units actually removed
    pub removed: Vec<UnitId>,
    /// Requested ids with no matching unit
    pub not_found: Vec<UnitId>,
}

/// An ordered collection of units sharing default stats
///
/// Owns its units exclusively; ids are drawn from a shared allocator so
/// several rosters can coexist without collisions.
#[derive(Debug, Serialize, Deserialize)]
pub struct Roster {
    units: Vec<Unit>,
    max_health: i32,
    attack_bonus: i32,
    dex_bonus: i32,
    #[serde(skip, default = "shared_allocator")]
    ids: IdSource,
    #[serde(skip, default = "default_roller")]
    roller: Box<dyn DieRoller>,
}

impl Roster {
    /// Create an empty roster with the given defaults for new units
    pub fn new(max_health: i32, attack_bonus: i32, dex_bonus: i32, ids: IdSource) -> Self {
        Self {
            units: Vec::new(),
            max_health,
            attack_bonus,
            dex_bonus,
            ids,
            roller: default_roller(),
        }
    }

    /// Replace the die roller (deterministic rolls for tests/replays)
    pub fn with_roller(mut self, roller: Box<dyn DieRoller>) -> Self {
        self.roller = roller;
        self
    }

    /// Ordered view of the live units
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Look up a unit by id
    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Number of live units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the roster has no units
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Append `count` new units built from the roster defaults
    ///
    /// Fails if the shared allocator was never initialized. Zero is a
    /// no-op. Returns the ids of the new units in order.
    pub fn add_units(&mut self, count: usize) -> Result<Vec<UnitId>, IdError> {
        let mut added = Vec::with_capacity(count);
        {
            let mut ids = self.ids.lock();
            for _ in 0..count {
                let id = ids.allocate()?;
                self.units
                    .push(Unit::new(id, self.max_health, self.attack_bonus, self.dex_bonus));
                added.push(id);
            }
        }
        if !added.is_empty() {
            info!(count = added.len(), total = self.units.len(), "units added");
        }
        Ok(added)
    }

    /// Attack with the selected units against a target armor class
    ///
    /// Each resolved unit rolls once; hits accumulate into the report's
    /// total. Attackers never take damage here and are never removed;
    /// the aggregate damage is dealt outward to an unmodeled target.
    pub fn group_attack(
        &mut self,
        ids: &[UnitId],
        armor_class: i32,
        kind: AttackKind,
    ) -> GroupAttackReport {
        let mut report = GroupAttackReport::default();

        for &id in ids {
            let Some(unit) = self.units.iter_mut().find(|u| u.id == id) else {
                warn!(id, "no unit with this id");
                report.not_found.push(id);
                continue;
            };

            let outcome = unit.attack_roll(self.roller.as_mut(), armor_class, kind);
            unit.last_roll = Some(outcome.roll);

            let action = if outcome.critical_hit {
                LastAction::CriticalHit
            } else if outcome.critical_miss {
                LastAction::CriticalMiss
            } else if outcome.hit {
                LastAction::Hit
            } else {
                LastAction::Miss
            };
            unit.last_action = Some(action);

            let damage = if outcome.hit {
                unit.num_successes += 1;
                unit.damage_done += outcome.damage;
                report.hits.push(id);
                report.total_damage += outcome.damage;
                outcome.damage
            } else {
                unit.num_fails += 1;
                0
            };

            debug!(id, roll = outcome.roll, %action, damage, "attack resolved");
            report.entries.push(RollEntry {
                id,
                roll: outcome.roll,
                action,
                damage,
            });
        }

        report
    }

    /// Roll a saving throw for the selected units against incoming damage
    ///
    /// Damage taken: none on a critical success, half (rounded down) on
    /// an ordinary success, full on any failure. Units at zero health
    /// afterwards are removed from the roster.
    pub fn group_saving_throw(
        &mut self,
        ids: &[UnitId],
        dc: i32,
        potential_damage: i32,
        ability: Ability,
    ) -> GroupSaveReport {
        let mut report = GroupSaveReport::default();

        for &id in ids {
            let Some(unit) = self.units.iter_mut().find(|u| u.id == id) else {
                warn!(id, "no unit with this id");
                report.not_found.push(id);
                continue;
            };

            let outcome = unit.saving_throw(self.roller.as_mut(), dc, ability);
            unit.last_roll = Some(outcome.roll);

            let (action, damage) = if outcome.critical_success {
                (LastAction::CriticalSuccess, 0)
            } else if outcome.critical_failure {
                (LastAction::CriticalFailure, potential_damage)
            } else if outcome.success {
                (LastAction::SaveSuccess, potential_damage / 2)
            } else {
                (LastAction::SaveFailure, potential_damage)
            };
            unit.last_action = Some(action);

            if outcome.success {
                unit.num_successes += 1;
                report.successes.push(id);
            } else {
                unit.num_fails += 1;
            }

            unit.take_damage(damage);
            debug!(id, roll = outcome.roll, %action, damage, "saving throw resolved");

            if unit.current_health == 0 {
                info!(id, "unit collapsed");
                report.collapsed.push(id);
            }

            report.entries.push(RollEntry {
                id,
                roll: outcome.roll,
                action,
                damage,
            });
        }

        self.units.retain(|u| u.current_health > 0);
        report
    }

    /// Apply direct health deltas (negative heals), then prune
    ///
    /// Deltas are applied without a floor, so the removal test sees raw
    /// health; removal happens only after every delta has been applied.
    /// Heals are capped at a unit's maximum health.
    pub fn update_health(&mut self, updates: &BTreeMap<UnitId, i32>) -> HealthReport {
        let mut report = HealthReport::default();

        for (&id, &delta) in updates {
            let Some(unit) = self.units.iter_mut().find(|u| u.id == id) else {
                warn!(id, "no unit with this id");
                report.not_found.push(id);
                continue;
            };

            unit.current_health -= delta;
            if unit.is_down() {
                report.collapsed.push(id);
            } else if unit.current_health > unit.max_health {
                unit.current_health = unit.max_health;
            }
        }

        for &id in &report.collapsed {
            info!(id, "unit collapsed");
        }
        self.units.retain(|u| !u.is_down());
        report
    }

    /// Remove the selected units if present
    pub fn remove_units(&mut self, ids: &[UnitId]) -> RemovalReport {
        let mut report = RemovalReport::default();

        for &id in ids {
            if let Some(pos) = self.units.iter().position(|u| u.id == id) {
                self.units.remove(pos);
                report.removed.push(id);
            } else {
                warn!(id, "no unit with this id");
                report.not_found.push(id);
            }
        }

        if !report.removed.is_empty() {
            info!(removed = report.removed.len(), total = self.units.len(), "units removed");
        }
        report
    }

    /// Give every current unit a damage buff for the next `duration` attacks
    ///
    /// Overwrites any existing buff amount and countdown.
    pub fn add_damage_buff(&mut self, amount: i32, duration: u32) {
        for unit in &mut self.units {
            unit.damage_buff = amount;
            unit.buff_duration = duration;
        }
        info!(amount, duration, "damage buff applied to roster");
    }

    /// Immediately zero every unit's buff amount (countdowns untouched)
    pub fn reset_buff(&mut self) {
        for unit in &mut self.units {
            unit.damage_buff = 0;
        }
    }

    /// Highest id currently in the roster
    pub fn highest_id(&self) -> Option<UnitId> {
        self.units.iter().map(|u| u.id).max()
    }

    /// Point the roster at a (possibly shared) allocator
    pub(crate) fn bind_allocator(&mut self, ids: IdSource) {
        self.ids = ids;
    }
}
