use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{Book, Genre};
use crate::error::{AppError, AppResult};

/// Books of one genre, in display order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Shelf {
    pub genre: Genre,
    pub books: Vec<Book>,
}

/// The fixed, read-only book catalog
///
/// Shelves keep their load order and books keep their order within a shelf.
/// Book names are expected to be unique across shelves; lookups return the
/// first match.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Catalog {
    shelves: Vec<Shelf>,
}

impl Catalog {
    pub fn new(shelves: Vec<Shelf>) -> Self {
        Self { shelves }
    }

    /// Loads shelves from a JSON file shaped like `[{"genre": .., "books": [..]}]`
    ///
    /// A file without a single book is rejected.
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Internal(format!("Failed to read catalog {}: {}", path.display(), e))
        })?;
        let catalog = Self::new(serde_json::from_str(&raw)?);
        if catalog.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "Catalog {} has no books",
                path.display()
            )));
        }

        tracing::info!(
            path = %path.display(),
            shelves = catalog.shelves.len(),
            books = catalog.len(),
            "Loaded catalog from file"
        );

        Ok(catalog)
    }

    /// The twelve books the widget ships with
    pub fn builtin() -> Self {
        let thriller = vec![
            Book::new(
                "The Silent Patient",
                "Alex Michaelides",
                Genre::Thriller,
                "A gripping psychological thriller.",
                "t_b1.jpeg",
            ),
            Book::new(
                "The Teacher",
                "Freida McFadden",
                Genre::Thriller,
                "A suspenseful thriller full of twists.",
                "t_b2.jpeg",
            ),
            Book::new(
                "The Boyfriend",
                "Freida McFadden",
                Genre::Thriller,
                "A tense and gripping read.",
                "t_b3.jpeg",
            ),
            Book::new(
                "Verity",
                "Colleen Hoover",
                Genre::Thriller,
                "A bestselling romantic thriller.",
                "t_b4.jpeg",
            ),
        ];

        let self_help = vec![
            Book::new(
                "Ikigai",
                "Héctor García & Francesc Miralles",
                Genre::SelfHelp,
                "Discover your purpose in life.",
                "sh_b1.jpeg",
            ),
            Book::new(
                "The Psychology of Money",
                "Morgan Housel",
                Genre::SelfHelp,
                "Insights into financial behavior.",
                "sh_b2.jpeg",
            ),
            Book::new(
                "Atomic Habits",
                "James Clear",
                Genre::SelfHelp,
                "Small habits that change your life.",
                "sh_b3.jpg",
            ),
            Book::new(
                "The Art of Letting Go",
                "Nick Trenton",
                Genre::SelfHelp,
                "If you are always on edge and unable to relax, this book is for you.",
                "sh_b4.jpg",
            ),
        ];

        let romance = vec![
            Book::new(
                "Can First Love Be Forever?",
                "Manisha Vashist",
                Genre::Romance,
                "A heartwarming story of young love.",
                "rl_b1.jpg",
            ),
            Book::new(
                "I Too Had a Love Story",
                "Ravinder Singh",
                Genre::Romance,
                "A moving true love story.",
                "rl_b2.jpeg",
            ),
            Book::new(
                "Too Good to Be True",
                "Prajakta Koli",
                Genre::Romance,
                "A contemporary Indian romance novel about Avani, a romance novel \
                 enthusiast, who meets Aman, a seemingly perfect man.",
                "rl_b3.jpg",
            ),
            Book::new(
                "Icebreaker",
                "Hannah Grace",
                Genre::Romance,
                "A college romance novel between a skater and a hockey player.",
                "rl_b4.jpg",
            ),
        ];

        Self::new(vec![
            Shelf {
                genre: Genre::Thriller,
                books: thriller,
            },
            Shelf {
                genre: Genre::SelfHelp,
                books: self_help,
            },
            Shelf {
                genre: Genre::Romance,
                books: romance,
            },
        ])
    }

    pub fn shelves(&self) -> &[Shelf] {
        &self.shelves
    }

    /// All books, shelf by shelf
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.shelves.iter().flat_map(|shelf| shelf.books.iter())
    }

    /// Finds a book by its name
    pub fn find(&self, name: &str) -> Option<&Book> {
        self.books().find(|book| book.name == name)
    }

    pub fn len(&self) -> usize {
        self.shelves.iter().map(|shelf| shelf.books.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
