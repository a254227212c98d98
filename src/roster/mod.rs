//! Roster module
//!
//! The unit model and the ordered collection that owns it:
//! - Identifier allocation and free-text id selections
//! - Per-unit checks, buffs, and lifetime counters
//! - Batch operations with aggregate reports

mod ids;
mod roster;
mod unit;

pub use ids::{
    parse_id_selection, shared_allocator, IdAllocator, IdError, IdSource, SelectionError, UnitId,
};
pub use roster::{
    GroupAttackReport, GroupSaveReport, HealthReport, RemovalReport, RollEntry, Roster,
};
pub use unit::{LastAction, Unit};
