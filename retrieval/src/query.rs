//! Queries and ranked retrieval results.

use std::ops::Deref;
use std::sync::Arc;

use crate::corpus::{Document, Level};

/// A learner's request: what they want to learn and at which level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    pub level: Level,
}

impl Query {
    pub fn new(text: impl Into<String>, level: Level) -> Self {
        Self {
            text: text.into(),
            level,
        }
    }
}

/// A retrieved document and its distance from the query.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedDocument {
    pub document: Arc<Document>,

    /// Lower is closer.
    pub distance: f32,
}

/// Retrieved documents ordered by ascending distance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedResult {
    items: Vec<RankedDocument>,
}

impl RankedResult {
    /// Wrap items that are already in ascending-distance order.
    pub fn new(items: Vec<RankedDocument>) -> Self {
        debug_assert!(
            items.windows(2).all(|w| w[0].distance <= w[1].distance),
            "ranked results must be sorted by ascending distance"
        );
        Self { items }
    }

    /// Ids in rank order.
    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|r| r.document.id.as_str()).collect()
    }

    pub fn into_inner(self) -> Vec<RankedDocument> {
        self.items
    }
}

impl Deref for RankedResult {
    type Target = [RankedDocument];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl IntoIterator for RankedResult {
    type Item = RankedDocument;
    type IntoIter = std::vec::IntoIter<RankedDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a RankedResult {
    type Item = &'a RankedDocument;
    type IntoIter = std::slice::Iter<'a, RankedDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
