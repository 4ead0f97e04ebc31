//! Immutable snapshot of the loaded dataset.
//!
//! A [`DataStore`] is built once from the `/api/data` payload and shared
//! read-only with the derivation engine for the rest of the session.
//! Cloning is cheap (reference counted).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::model::DataPoint;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Read-only, ordered collection of [`DataPoint`]s.
#[derive(Debug, Clone)]
pub struct DataStore {
    points: Arc<[DataPoint]>,
    generation: u64,
}

impl DataStore {
    /// Snapshot a sequence of records, preserving their order.
    #[must_use]
    pub fn new(points: Vec<DataPoint>) -> Self {
        Self {
            points: points.into(),
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// An empty store (the state after a failed load).
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// All records in load order.
    #[must_use]
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    /// The first loaded record.
    #[must_use]
    pub fn first(&self) -> Option<&DataPoint> {
        self.points.first()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no records were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Identity of this snapshot; distinct stores never share a generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<DataPoint>> for DataStore {
    fn from(points: Vec<DataPoint>) -> Self {
        Self::new(points)
    }
}
