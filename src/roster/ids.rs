//! Unit identifiers
//!
//! Monotonic id allocation and free-text id-selection parsing.
//! The allocator must be explicitly initialized before the first unit is
//! created; several rosters may share one allocator through [`IdSource`].

use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;

/// Unique identifier of a unit
pub type UnitId = u32;

/// Identifier allocation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("starting id has not been set")]
    Uninitialized,
}

/// Monotonic identifier allocator
///
/// Starts uninitialized; [`initialize`](IdAllocator::initialize) must be
/// called before [`allocate`](IdAllocator::allocate) hands out the first id.
/// Re-initializing is the explicit reset path and allows id reuse.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: Option<UnitId>,
}

impl IdAllocator {
    /// Create an uninitialized allocator
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the next id to hand out
    pub fn initialize(&mut self, start: UnitId) {
        self.next = Some(start);
    }

    /// Whether a starting id has been set
    pub fn is_initialized(&self) -> bool {
        self.next.is_some()
    }

    /// The id the next allocation would return, if initialized
    pub fn peek(&self) -> Option<UnitId> {
        self.next
    }

    /// Allocate the next id
    pub fn allocate(&mut self) -> Result<UnitId, IdError> {
        let id = self.next.ok_or(IdError::Uninitialized)?;
        self.next = Some(id + 1);
        Ok(id)
    }

    /// Move the counter past `id` if it is not already beyond it
    ///
    /// Used when restoring persisted rosters so freshly allocated ids
    /// never collide with stored ones.
    pub fn advance_past(&mut self, id: UnitId) {
        match self.next {
            Some(next) if next > id => {}
            _ => self.next = Some(id + 1),
        }
    }
}

/// Shared handle to an allocator, usable across rosters
pub type IdSource = Arc<Mutex<IdAllocator>>;

/// Create a fresh, uninitialized shared allocator
pub fn shared_allocator() -> IdSource {
    Arc::new(Mutex::new(IdAllocator::new()))
}

/// Id-selection parse errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("empty id selection")]
    Empty,

    #[error("invalid id in selection: {0}")]
    InvalidId(String),

    #[error("invalid id range in selection: {0}")]
    InvalidRange(String),
}

/// Parse a free-form id selection like `"1-3, 5"`
///
/// Accepts comma-separated ids and hyphenated inclusive ranges, with
/// whitespace tolerated around each part. A descending range contributes
/// no ids. Returns the flattened sequence in written order.
pub fn parse_id_selection(text: &str) -> Result<Vec<UnitId>, SelectionError> {
    if text.trim().is_empty() {
        return Err(SelectionError::Empty);
    }

    let mut ids = Vec::new();
    for part in text.split(',') {
        let part = part.trim();
        if let Some((start, end)) = part.split_once('-') {
            let start: UnitId = start
                .trim()
                .parse()
                .map_err(|_| SelectionError::InvalidRange(part.to_string()))?;
            let end: UnitId = end
                .trim()
                .parse()
                .map_err(|_| SelectionError::InvalidRange(part.to_string()))?;
            ids.extend(start..=end);
        } else {
            let id: UnitId = part
                .parse()
                .map_err(|_| SelectionError::InvalidId(part.to_string()))?;
            ids.push(id);
        }
    }
    Ok(ids)
}
