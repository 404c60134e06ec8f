//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::{Builder, Uuid};

/// Unique identifier for an organism.
///
/// This is the handle a field cell stores; the organism itself is owned by
/// the live population. Ids are built from bytes drawn off the
/// simulation's seeded generator, so a seed reproduces them too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganismId(pub Uuid);

impl OrganismId {
    pub fn from_random_bytes(bytes: [u8; 16]) -> Self {
        Self(Builder::from_random_bytes(bytes).into_uuid())
    }
}

impl From<u128> for OrganismId {
    fn from(v: u128) -> Self {
        Self(Uuid::from_u128(v))
    }
}

impl fmt::Display for OrganismId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static FIELD_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifies one field instance.
///
/// Organisms keep this as a non-owning back-reference to the field they
/// occupy. Two fields never share an id, even with identical dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(u64);

impl FieldId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(FIELD_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field-{}", self.0)
    }
}

/// Row/column coordinate in a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub row: usize,
    pub col: usize,
}

impl Location {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Offset by a signed delta, or `None` if the result would go negative.
    pub fn offset(&self, d_row: isize, d_col: isize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Concrete kind of an organism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    Rabbit,
    Fox,
}

impl Species {
    pub fn all() -> [Species; 2] {
        [Species::Rabbit, Species::Fox]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Species::Rabbit => "rabbit",
            Species::Fox => "fox",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
