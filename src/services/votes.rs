use serde::Serialize;
use std::sync::Arc;

use crate::{
    db::PreferenceStore,
    error::AppResult,
    models::{Book, PreferenceRecord, Session, UserId, VoteTally, VoteType},
    services::recommendations::Recommender,
};

/// What the client should do with its recommendation panel
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PanelDirective {
    Show,
    Hide,
    Unchanged,
}

/// Result of applying one like or dislike
#[derive(Debug, Clone, Serialize)]
pub struct VoteOutcome {
    pub book: String,
    pub vote: VoteType,
    /// False when the vote repeated the session's current vote
    pub changed: bool,
    pub tally: VoteTally,
    /// Whether the preference store accepted the new lists
    pub persisted: bool,
    /// The lists as written, when they were written
    pub preferences: Option<PreferenceRecord>,
    pub panel: PanelDirective,
    pub recommendations: Vec<Book>,
    /// Recoverable failure the client may want to show
    pub warning: Option<String>,
}

impl VoteOutcome {
    fn new(book: &Book, vote: VoteType, changed: bool, tally: VoteTally) -> Self {
        Self {
            book: book.name.clone(),
            vote,
            changed,
            tally,
            persisted: false,
            preferences: None,
            panel: PanelDirective::Unchanged,
            recommendations: Vec::new(),
            warning: None,
        }
    }
}

/// Applies likes and dislikes to a session's tallies and the user's record
///
/// Only a liked book that was persisted refreshes recommendations. A dislike
/// always hides the panel, even when nothing could be written.
pub struct VoteReconciler {
    store: Arc<dyn PreferenceStore>,
    recommender: Arc<Recommender>,
}

impl VoteReconciler {
    pub fn new(store: Arc<dyn PreferenceStore>, recommender: Arc<Recommender>) -> Self {
        Self { store, recommender }
    }

    /// Applies `vote` to `book` for the session's user
    ///
    /// The tally always moves, even without a signed-in user or a reachable
    /// store. Repeating the current vote changes nothing.
    pub async fn apply_vote(
        &self,
        session: &mut Session,
        book: &Book,
        vote: VoteType,
    ) -> VoteOutcome {
        let tally = session.tallies.entry(&book.name);
        let changed = tally.cast(vote);
        let mut outcome = VoteOutcome::new(book, vote, changed, *tally);

        if !changed {
            tracing::debug!(book = %book.name, vote = %vote, "Repeated vote ignored");
            return outcome;
        }

        if vote == VoteType::Dislike {
            outcome.panel = PanelDirective::Hide;
        }

        let Some(user) = session.user().cloned() else {
            tracing::debug!(
                book = %book.name,
                vote = %vote,
                "No user signed in, vote not persisted"
            );
            return outcome;
        };

        let record = match self.persist(&user, &book.name, vote).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(
                    user = %user,
                    book = %book.name,
                    vote = %vote,
                    error = %e,
                    "Failed to persist vote"
                );
                outcome.warning = Some(e.to_string());
                return outcome;
            }
        };

        tracing::info!(
            user = %user,
            book = %book.name,
            vote = %vote,
            likes = record.likes.len(),
            dislikes = record.dislikes.len(),
            "Vote persisted"
        );

        if vote == VoteType::Like {
            match self.recommender.for_likes(&record.likes) {
                Ok(books) if books.is_empty() => outcome.panel = PanelDirective::Hide,
                Ok(books) => {
                    outcome.panel = PanelDirective::Show;
                    outcome.recommendations = books;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Recommendation failed after like");
                    outcome.warning = Some(e.to_string());
                }
            }
        }

        outcome.persisted = true;
        outcome.preferences = Some(record);
        outcome
    }

    /// Reads the current lists, moves `book` into the voted list and writes
    /// both lists back
    ///
    /// Read and write are separate store calls, so a concurrent vote for the
    /// same user from another session can be overwritten.
    async fn persist(
        &self,
        user: &UserId,
        book: &str,
        vote: VoteType,
    ) -> AppResult<PreferenceRecord> {
        let mut record = self.store.get(user).await?.unwrap_or_default();
        record.record_vote(book, vote);
        self.store.update(user, &record.as_update()).await?;
        Ok(record)
    }
}
