//! Roster persistence
//!
//! Serializes a mapping of named rosters to an opaque byte blob (JSON)
//! and restores it with round-trip fidelity. Loading binds every roster
//! to the given shared allocator and moves its counter past the highest
//! stored id, so freshly raised units never collide with restored ones.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::roster::{IdSource, Roster};

/// Persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("roster data error: {0}")]
    Data(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A named collection of rosters, as persisted together
pub type RosterSet = BTreeMap<String, Roster>;

/// Serialize the rosters to an opaque byte blob
pub fn save_rosters(rosters: &RosterSet) -> Result<Vec<u8>, StoreError> {
    Ok(serde_json::to_vec_pretty(rosters)?)
}

/// Restore rosters from a blob produced by [`save_rosters`]
///
/// Every restored roster draws ids from `ids`, which is advanced past
/// the highest stored id (an allocator already beyond it is untouched).
pub fn load_rosters(bytes: &[u8], ids: IdSource) -> Result<RosterSet, StoreError> {
    let mut rosters: RosterSet = serde_json::from_slice(bytes)?;

    let mut highest = None;
    for roster in rosters.values_mut() {
        roster.bind_allocator(ids.clone());
        highest = highest.max(roster.highest_id());
    }
    if let Some(id) = highest {
        ids.lock().advance_past(id);
    }

    info!(rosters = rosters.len(), "rosters restored");
    Ok(rosters)
}

/// Write the rosters to a file
pub fn save_to_path(path: &Path, rosters: &RosterSet) -> Result<(), StoreError> {
    fs::write(path, save_rosters(rosters)?)?;
    info!(path = %path.display(), "rosters saved");
    Ok(())
}

/// Read rosters from a file written by [`save_to_path`]
pub fn load_from_path(path: &Path, ids: IdSource) -> Result<RosterSet, StoreError> {
    let bytes = fs::read(path)?;
    load_rosters(&bytes, ids)
}
