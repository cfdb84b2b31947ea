//! The educational corpus and its data model.
//!
//! Documents are compiled in as raw seed records and validated as a whole
//! when the store is loaded. One bad record rejects the entire corpus.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, RetrievalError};

/// Skill level of a document or a learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    /// All levels, lowest first.
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    /// Position in the total order Beginner < Intermediate < Advanced.
    pub fn rank(self) -> u8 {
        match self {
            Level::Beginner => 0,
            Level::Intermediate => 1,
            Level::Advanced => 2,
        }
    }

    /// Whether a learner at this level is shown documents at `document`.
    ///
    /// Advanced learners see every level. Below that, a learner sees
    /// documents up to and including their own rank.
    pub fn admits(self, document: Level) -> bool {
        match self {
            Level::Advanced => true,
            Level::Beginner | Level::Intermediate => document.rank() <= self.rank(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            other => Err(format!(
                "unknown level `{other}` (expected beginner, intermediate or advanced)"
            )),
        }
    }
}

/// A validated, immutable educational snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub topic: String,
    pub level: Level,
    pub content: String,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        topic: impl Into<String>,
        level: Level,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            topic: topic.into(),
            level,
            content: content.into(),
        }
    }

    /// Metadata copied into the vector index alongside the embedding.
    pub fn metadata(&self) -> DocumentMetadata {
        DocumentMetadata {
            topic: self.topic.clone(),
            level: self.level,
        }
    }
}

/// The subset of a document stored next to its vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub topic: String,
    pub level: Level,
}

/// An unvalidated seed record, as authored.
#[derive(Debug, Clone, Copy)]
pub struct SeedDocument {
    pub id: &'static str,
    pub topic: &'static str,
    pub level: &'static str,
    pub content: &'static str,
}

/// The built-in Python course.
pub const PYTHON_COURSE: &[SeedDocument] = &[
    SeedDocument {
        id: "py001",
        topic: "Python Basics",
        level: "Beginner",
        content: "Python is an interpreted, high-level and general-purpose programming language. Its design philosophy emphasizes code readability with its notable use of significant whitespace.",
    },
    SeedDocument {
        id: "py002",
        topic: "Python Variables",
        level: "Beginner",
        content: "A variable in Python is a symbolic name that is a reference or pointer to an object. Once an object is assigned to a variable, you can refer to the object by that name. Variables do not need to be declared with any particular type.",
    },
    SeedDocument {
        id: "py003",
        topic: "Python Data Types",
        level: "Beginner",
        content: "Variables can store data of different types. Common data types in Python include Integers (int), Floating-Point Numbers (float), Strings (str), and Booleans (bool). The type of a variable is determined at runtime.",
    },
    SeedDocument {
        id: "py004",
        topic: "Using Variables in Operations",
        level: "Beginner",
        content: "You can perform mathematical operations with variables that store numbers, like addition and subtraction. You can also concatenate strings using the plus operator. For example: x = 10, y = 20, z = x + y.",
    },
    SeedDocument {
        id: "py005",
        topic: "Python Lists",
        level: "Intermediate",
        content: "A list is a data structure in Python that is a mutable, or changeable, ordered sequence of elements. Each element or value that is inside of a list is called an item. Lists are defined with square brackets [].",
    },
    SeedDocument {
        id: "py006",
        topic: "Python Functions",
        level: "Intermediate",
        content: "A function is a reusable block of code which only runs when it is called. You can pass data, known as parameters or arguments, into a function. A function can return data as a result using the 'return' keyword.",
    },
    SeedDocument {
        id: "py007",
        topic: "Function Parameters",
        level: "Intermediate",
        content: "Parameters are variables listed inside the parentheses in the function definition. Arguments are the values that are sent to the function when it is called. These values are assigned to the parameter variables.",
    },
    SeedDocument {
        id: "py008",
        topic: "Python Classes",
        level: "Advanced",
        content: "Python is an object-oriented programming language. Almost everything in Python is an object, with its properties and methods. A Class is like an object constructor, or a 'blueprint' for creating objects.",
    },
];

/// Owner of the loaded documents.
#[derive(Debug, Clone, Default)]
pub struct CorpusStore {
    documents: Vec<Arc<Document>>,
    by_id: HashMap<String, usize>,
}

impl CorpusStore {
    /// Load and validate the built-in course.
    pub fn load() -> Result<Self> {
        Self::from_seeds(PYTHON_COURSE)
    }

    /// Validate raw seed records into a store.
    pub fn from_seeds(seeds: &[SeedDocument]) -> Result<Self> {
        let documents = seeds
            .iter()
            .map(|seed| {
                let level = seed
                    .level
                    .parse::<Level>()
                    .map_err(|reason| RetrievalError::corpus(seed.id, reason))?;
                Ok(Document::new(seed.id, seed.topic, level, seed.content))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_documents(documents)
    }

    /// Validate typed documents into a store.
    pub fn from_documents(documents: Vec<Document>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(documents.len());
        for (position, document) in documents.iter().enumerate() {
            if document.id.trim().is_empty() {
                return Err(RetrievalError::corpus(
                    format!("#{position}"),
                    "id is empty",
                ));
            }
            if document.topic.trim().is_empty() {
                return Err(RetrievalError::corpus(&document.id, "topic is empty"));
            }
            if document.content.trim().is_empty() {
                return Err(RetrievalError::corpus(&document.id, "content is empty"));
            }
            if by_id.insert(document.id.clone(), position).is_some() {
                return Err(RetrievalError::corpus(&document.id, "duplicate id"));
            }
        }

        info!("Loaded corpus with {} documents", documents.len());
        Ok(Self {
            documents: documents.into_iter().map(Arc::new).collect(),
            by_id,
        })
    }

    /// Look up a document by id.
    pub fn get(&self, id: &str) -> Option<&Arc<Document>> {
        self.by_id.get(id).map(|&position| &self.documents[position])
    }

    /// All documents in load order.
    pub fn documents(&self) -> &[Arc<Document>] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn seed(id: &'static str, level: &'static str) -> SeedDocument {
        SeedDocument {
            id,
            topic: "Topic",
            level,
            content: "Some content.",
        }
    }

    #[test]
    fn test_builtin_course_loads() {
        let corpus = CorpusStore::load().unwrap();
        assert_eq!(corpus.len(), 8);

        let functions = corpus.get("py006").unwrap();
        assert_eq!(functions.topic, "Python Functions");
        assert_eq!(functions.level, Level::Intermediate);
        assert_eq!(corpus.get("py008").unwrap().level, Level::Advanced);
        assert!(corpus.get("py999").is_none());
    }

    #[test]
    fn test_levels_in_builtin_course() {
        let corpus = CorpusStore::load().unwrap();
        let count = |level| {
            corpus
                .documents()
                .iter()
                .filter(|d| d.level == level)
                .count()
        };
        assert_eq!(count(Level::Beginner), 4);
        assert_eq!(count(Level::Intermediate), 3);
        assert_eq!(count(Level::Advanced), 1);
    }

    #[test]
    fn test_unknown_level_rejects_whole_corpus() {
        let err = CorpusStore::from_seeds(&[seed("ok", "Beginner"), seed("bad", "Expert")])
            .unwrap_err();
        match err {
            RetrievalError::CorpusValidation { id, .. } => assert_eq!(id, "bad"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_fields_are_rejected() {
        let no_id = Document::new(" ", "Topic", Level::Beginner, "content");
        assert!(CorpusStore::from_documents(vec![no_id]).is_err());

        let no_topic = Document::new("a", "", Level::Beginner, "content");
        assert!(CorpusStore::from_documents(vec![no_topic]).is_err());

        let no_content = Document::new("a", "Topic", Level::Beginner, "\n");
        assert!(CorpusStore::from_documents(vec![no_content]).is_err());
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let err = CorpusStore::from_seeds(&[seed("same", "Beginner"), seed("same", "Advanced")])
            .unwrap_err();
        assert!(matches!(err, RetrievalError::CorpusValidation { .. }));
    }

    #[test]
    fn test_level_parsing_and_display() {
        assert_eq!("ADVANCED".parse::<Level>().unwrap(), Level::Advanced);
        assert_eq!(" intermediate ".parse::<Level>().unwrap(), Level::Intermediate);
        assert!("expert".parse::<Level>().is_err());
        for level in Level::ALL {
            assert_eq!(level.to_string().parse::<Level>().unwrap(), level);
        }
    }

    #[test]
    fn test_admission_table() {
        use Level::*;
        assert!(Beginner.admits(Beginner));
        assert!(!Beginner.admits(Intermediate));
        assert!(!Beginner.admits(Advanced));

        assert!(Intermediate.admits(Beginner));
        assert!(Intermediate.admits(Intermediate));
        assert!(!Intermediate.admits(Advanced));

        for level in Level::ALL {
            assert!(Advanced.admits(level));
        }
    }
}
