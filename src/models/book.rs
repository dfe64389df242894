use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Genre shelf a book belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Thriller,
    #[serde(rename = "Self-Help")]
    SelfHelp,
    Romance,
}

impl Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Genre::Thriller => write!(f, "Thriller"),
            Genre::SelfHelp => write!(f, "Self-Help"),
            Genre::Romance => write!(f, "Romance"),
        }
    }
}

/// A catalog entry. `name` identifies the book across the whole catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    pub name: String,
    pub author: String,
    pub genre: Genre,
    pub description: String,
    /// Cover image reference
    pub pic: String,
}

impl Book {
    pub fn new(name: &str, author: &str, genre: Genre, description: &str, pic: &str) -> Self {
        Self {
            name: name.to_string(),
            author: author.to_string(),
            genre,
            description: description.to_string(),
            pic: pic.to_string(),
        }
    }

    /// Whether `other` is a different book on the same genre shelf
    pub fn shares_genre_with(&self, other: &Book) -> bool {
        self.genre == other.genre && self.name != other.name
    }

    /// Whether `other` is a different book by the same author
    pub fn shares_author_with(&self, other: &Book) -> bool {
        self.author == other.author && self.name != other.name
    }
}
