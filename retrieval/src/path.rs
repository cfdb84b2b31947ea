//! Level-aware learning paths.
//!
//! [`PathFilter`] keeps the ranked documents a learner's level admits (see
//! [`Level::admits`]) without reordering them. [`PathOutcome`] tells the two
//! empty cases apart: nothing was retrieved at all, or documents were
//! retrieved but none suit the learner's level.

use std::ops::Deref;

use crate::corpus::Level;
use crate::query::RankedDocument;

/// Ordered, level-filtered documents recommended to a learner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LearningPath {
    steps: Vec<RankedDocument>,
}

impl LearningPath {
    /// Ids in path order.
    pub fn ids(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.document.id.as_str()).collect()
    }

    pub fn into_inner(self) -> Vec<RankedDocument> {
        self.steps
    }
}

impl Deref for LearningPath {
    type Target = [RankedDocument];

    fn deref(&self) -> &Self::Target {
        &self.steps
    }
}

impl<'a> IntoIterator for &'a LearningPath {
    type Item = &'a RankedDocument;
    type IntoIter = std::slice::Iter<'a, RankedDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Stateless level-inclusion policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathFilter;

impl PathFilter {
    /// Keep the documents `level` admits, preserving their order.
    ///
    /// Accepts a [`RankedResult`](crate::RankedResult) or an existing
    /// [`LearningPath`], so filtering a path again is a no-op.
    pub fn filter(ranked: &[RankedDocument], level: Level) -> LearningPath {
        LearningPath {
            steps: ranked
                .iter()
                .filter(|r| level.admits(r.document.level))
                .cloned()
                .collect(),
        }
    }
}

/// What the presentation layer should show for a query.
#[derive(Debug, Clone, PartialEq)]
pub enum PathOutcome {
    /// At least one document suits the learner.
    Path(LearningPath),

    /// Retrieval returned nothing.
    NoRelevantContent,

    /// Retrieval found `matched` documents but the level filter removed all
    /// of them.
    LevelMismatch { matched: usize },
}

impl PathOutcome {
    pub fn from_ranked(ranked: &[RankedDocument], level: Level) -> Self {
        if ranked.is_empty() {
            return Self::NoRelevantContent;
        }

        let path = PathFilter::filter(ranked, level);
        if path.is_empty() {
            Self::LevelMismatch {
                matched: ranked.len(),
            }
        } else {
            Self::Path(path)
        }
    }

    /// The path, when there is one.
    pub fn path(&self) -> Option<&LearningPath> {
        match self {
            Self::Path(path) => Some(path),
            Self::NoRelevantContent | Self::LevelMismatch { .. } => None,
        }
    }
}
