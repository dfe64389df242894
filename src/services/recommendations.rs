use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::{
    db::PreferenceStore,
    error::{AppError, AppResult},
    models::{Book, Catalog, UserId},
};

/// Books drawn from the liked book's genre shelf
const GENRE_PICKS: usize = 2;
/// Books drawn from the liked book's author
const AUTHOR_PICKS: usize = 2;

/// Generates recommendations from a user's liked books
///
/// For every liked name, in stored order, picks up to two random books from
/// the same genre and up to two random books by the same author. The picks
/// are concatenated and deduplicated by name, keeping the first occurrence.
/// Liked names missing from the catalog are skipped.
///
/// Output varies between calls for the same likes; pass a seeded `rng` for a
/// repeatable result.
pub fn recommend<R: Rng + ?Sized>(likes: &[String], catalog: &Catalog, rng: &mut R) -> Vec<Book> {
    if likes.is_empty() {
        return Vec::new();
    }

    let mut picks: Vec<&Book> = Vec::new();

    for liked_name in likes {
        let Some(liked) = catalog.find(liked_name) else {
            tracing::debug!(book = %liked_name, "Liked book not in catalog, skipping");
            continue;
        };

        picks.extend(sample(catalog, rng, GENRE_PICKS, |b| liked.shares_genre_with(b)));
        picks.extend(sample(catalog, rng, AUTHOR_PICKS, |b| liked.shares_author_with(b)));
    }

    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(picks.len());
    for book in picks {
        if seen.insert(book.name.as_str()) {
            unique.push(book.clone());
        }
    }
    unique
}

/// Shuffles the matching catalog books and keeps the first `count`
fn sample<'a, R, F>(catalog: &'a Catalog, rng: &mut R, count: usize, matches: F) -> Vec<&'a Book>
where
    R: Rng + ?Sized,
    F: Fn(&Book) -> bool,
{
    let mut candidates: Vec<&Book> = catalog.books().filter(|b| matches(*b)).collect();
    candidates.shuffle(rng);
    candidates.truncate(count);
    candidates
}

/// Recommendation engine bound to the catalog and a shared random source
pub struct Recommender {
    catalog: Arc<Catalog>,
    rng: Mutex<StdRng>,
}

impl Recommender {
    /// Uses an OS-seeded generator, or a fixed one when `seed` is given
    pub fn new(catalog: Arc<Catalog>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            catalog,
            rng: Mutex::new(rng),
        }
    }

    /// Recommendations for an explicit list of liked names
    pub fn for_likes(&self, likes: &[String]) -> AppResult<Vec<Book>> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| AppError::Internal(format!("Recommendation RNG poisoned: {}", e)))?;
        Ok(recommend(likes, &self.catalog, &mut *rng))
    }

    /// Loads the user's likes from the store and recommends from them
    ///
    /// A user with no record yet gets no recommendations.
    pub async fn for_user(
        &self,
        store: &dyn PreferenceStore,
        user: &UserId,
    ) -> AppResult<Vec<Book>> {
        let likes = store
            .get(user)
            .await?
            .map(|record| record.likes)
            .unwrap_or_default();

        let books = self.for_likes(&likes)?;

        tracing::info!(
            user = %user,
            liked = likes.len(),
            recommended = books.len(),
            "Computed recommendations"
        );

        Ok(books)
    }
}
