//! Vector index for nearest-neighbor lookups.

use std::collections::HashSet;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::similarity::DistanceMetric;

/// An entry in a vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry<M> {
    /// Unique identifier.
    pub id: String,

    /// The embedding vector.
    pub vector: Embedding,

    /// Read-optimized copy of the source record's metadata.
    pub metadata: M,
}

impl<M> IndexEntry<M> {
    /// Create a new index entry.
    pub fn new(id: impl Into<String>, vector: Embedding, metadata: M) -> Self {
        Self {
            id: id.into(),
            vector,
            metadata,
        }
    }
}

/// A query hit borrowed from the index.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor<'a, M> {
    /// The stored entry.
    pub entry: &'a IndexEntry<M>,

    /// Distance from the query vector, lower is closer.
    pub distance: f32,
}

/// Storage plus k-nearest-neighbor search over fixed-dimension vectors.
///
/// Implementations must order results by ascending distance and keep
/// insertion order between equal distances.
pub trait VectorIndex<M>: Send + Sync {
    /// Fixed dimension every stored and queried vector must have.
    fn dimension(&self) -> usize;

    /// Metric used for both indexing and querying.
    fn metric(&self) -> DistanceMetric;

    /// Number of stored entries.
    fn len(&self) -> usize;

    /// Whether the index holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the whole contents of the index.
    ///
    /// The batch is validated before anything is replaced, so a failed
    /// rebuild leaves the previous contents in place.
    fn rebuild(&mut self, entries: Vec<IndexEntry<M>>) -> Result<()>;

    /// Return up to `k` entries closest to `vector`.
    fn query(&self, vector: &[f32], k: usize) -> Result<Vec<Neighbor<'_, M>>>;
}

/// Exact nearest-neighbor index that scans every entry.
///
/// Suitable for corpora of tens to low thousands of documents.
#[derive(Debug, Clone)]
pub struct FlatIndex<M> {
    /// Stored entries in insertion order.
    entries: Vec<IndexEntry<M>>,

    /// Expected dimension of embeddings.
    dimension: usize,

    metric: DistanceMetric,
}

impl<M> FlatIndex<M> {
    /// Create an empty index using the default metric.
    pub fn new(dimension: usize) -> Self {
        Self::with_metric(dimension, DistanceMetric::default())
    }

    /// Create an empty index using `metric`.
    pub fn with_metric(dimension: usize, metric: DistanceMetric) -> Self {
        Self {
            entries: Vec::new(),
            dimension,
            metric,
        }
    }

    /// Get an entry by ID.
    pub fn get(&self, id: &str) -> Option<&IndexEntry<M>> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Get all IDs in insertion order.
    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }

    fn validate(&self, entries: &[IndexEntry<M>]) -> Result<()> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in entries {
            if entry.id.trim().is_empty() {
                return Err(EmbeddingError::rebuild("entry with empty id"));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(EmbeddingError::rebuild(format!(
                    "duplicate id `{}`",
                    entry.id
                )));
            }
            if entry.vector.len() != self.dimension {
                return Err(EmbeddingError::rebuild(format!(
                    "entry `{}` has dimension {}, index expects {}",
                    entry.id,
                    entry.vector.len(),
                    self.dimension
                )));
            }
            if entry.vector.iter().any(|x| !x.is_finite()) {
                return Err(EmbeddingError::rebuild(format!(
                    "entry `{}` contains non-finite values",
                    entry.id
                )));
            }
        }
        Ok(())
    }
}

impl<M: Send + Sync> VectorIndex<M> for FlatIndex<M> {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn metric(&self) -> DistanceMetric {
        self.metric
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn rebuild(&mut self, entries: Vec<IndexEntry<M>>) -> Result<()> {
        self.validate(&entries)?;

        let previous = self.entries.len();
        self.entries = entries;
        info!(
            "Rebuilt vector index: {} entries (previously {previous}), dimension {}, metric {}",
            self.entries.len(),
            self.dimension,
            self.metric
        );
        Ok(())
    }

    fn query(&self, vector: &[f32], k: usize) -> Result<Vec<Neighbor<'_, M>>> {
        if vector.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }

        let mut neighbors = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let distance = self.metric.distance(vector, &entry.vector)?;
            neighbors.push(Neighbor { entry, distance });
        }

        // Stable sort, so equal distances keep insertion order.
        neighbors.sort_by_key(|n| OrderedFloat(n.distance));
        neighbors.truncate(k);

        debug!(
            "Vector query returned {} of {} entries (k = {k})",
            neighbors.len(),
            self.entries.len()
        );
        Ok(neighbors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(id: &str, vector: Vec<f32>) -> IndexEntry<()> {
        IndexEntry::new(id, vector, ())
    }

    fn ids<'a>(neighbors: &[Neighbor<'a, ()>]) -> Vec<&'a str> {
        neighbors.iter().map(|n| n.entry.id.as_str()).collect()
    }

    #[test]
    fn test_query_orders_by_ascending_distance() {
        let mut index = FlatIndex::new(3);
        index
            .rebuild(vec![
                entry("a", vec![1.0, 0.0, 0.0]),
                entry("b", vec![0.0, 1.0, 0.0]),
                entry("c", vec![0.7, 0.7, 0.0]),
            ])
            .unwrap();

        let results = index.query(&[1.0, 0.0, 0.0], 2).unwrap();
        assert_eq!(ids(&results), vec!["a", "c"]);
        assert!(results[0].distance <= results[1].distance);
    }

    #[test]
    fn test_k_larger_than_index_returns_everything_once() {
        let mut index = FlatIndex::with_metric(2, DistanceMetric::Cosine);
        index
            .rebuild(vec![
                entry("x", vec![0.0, 1.0]),
                entry("y", vec![1.0, 1.0]),
                entry("z", vec![1.0, 0.0]),
            ])
            .unwrap();

        let results = index.query(&[1.0, 0.0], 10).unwrap();
        assert_eq!(ids(&results), vec!["z", "y", "x"]);
        assert!(
            results
                .windows(2)
                .all(|pair| pair[0].distance <= pair[1].distance)
        );
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut index = FlatIndex::new(2);
        index
            .rebuild(vec![
                entry("first", vec![0.0, 1.0]),
                entry("second", vec![0.0, -1.0]),
                entry("third", vec![1.0, 0.0]),
            ])
            .unwrap();

        // Every entry is at squared distance 2 from [-1, 0] except "third".
        let results = index.query(&[-1.0, 0.0], 3).unwrap();
        assert_eq!(ids(&results), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_empty_index_returns_nothing() {
        let index: FlatIndex<()> = FlatIndex::new(3);
        assert!(index.query(&[1.0, 0.0, 0.0], 5).unwrap().is_empty());
    }

    #[test]
    fn test_query_dimension_mismatch() {
        let index: FlatIndex<()> = FlatIndex::new(3);
        let err = index.query(&[1.0, 0.0], 1).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_rebuild_replaces_previous_contents() {
        let mut index = FlatIndex::new(2);
        index
            .rebuild(vec![entry("old", vec![1.0, 0.0])])
            .unwrap();
        index
            .rebuild(vec![entry("new-1", vec![1.0, 0.0]), entry("new-2", vec![0.0, 1.0])])
            .unwrap();

        assert_eq!(index.ids(), vec!["new-1", "new-2"]);
        assert!(index.get("old").is_none());
    }

    #[test]
    fn test_rebuild_rejects_duplicates_and_keeps_old_contents() {
        let mut index = FlatIndex::new(2);
        index.rebuild(vec![entry("keep", vec![1.0, 0.0])]).unwrap();

        let err = index
            .rebuild(vec![entry("dup", vec![1.0, 0.0]), entry("dup", vec![0.0, 1.0])])
            .unwrap_err();
        assert!(matches!(err, EmbeddingError::IndexRebuild { .. }));
        assert_eq!(index.ids(), vec!["keep"]);
    }

    #[test]
    fn test_rebuild_rejects_wrong_dimension() {
        let mut index = FlatIndex::new(3);
        let err = index
            .rebuild(vec![entry("short", vec![1.0, 0.0])])
            .unwrap_err();
        assert!(matches!(err, EmbeddingError::IndexRebuild { .. }));
        assert!(index.is_empty());
    }

    #[test]
    fn test_rebuild_rejects_non_finite_values() {
        let mut index = FlatIndex::new(2);
        let err = index
            .rebuild(vec![entry("nan", vec![f32::NAN, 0.0])])
            .unwrap_err();
        assert!(matches!(err, EmbeddingError::IndexRebuild { .. }));
    }
}
