//! thrall - horde combat aid for tabletop games
//!
//! A combat resolution engine for a party of disposable units: d20
//! attack rolls and saving throws with critical rules, temporary damage
//! buffs, batch operations over free-text id selections, and JSON
//! persistence of named rosters.

pub mod combat;
pub mod roster;
pub mod store;

use roster::{IdSource, Roster};

/// Default stats for units added through a freshly built roster
#[derive(Debug, Clone, Copy)]
pub struct RosterDefaults {
    pub max_health: i32,
    pub attack_bonus: i32,
    pub dex_bonus: i32,
}

impl RosterDefaults {
    /// Build an empty roster with these defaults, drawing ids from `ids`
    pub fn build(&self, ids: IdSource) -> Roster {
        Roster::new(self.max_health, self.attack_bonus, self.dex_bonus, ids)
    }
}

impl Default for RosterDefaults {
    fn default() -> Self {
        Self {
            max_health: 47,
            attack_bonus: 13,
            dex_bonus: 2,
        }
    }
}
