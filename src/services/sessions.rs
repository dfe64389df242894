use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    db::PreferenceStore,
    error::{AppError, AppResult},
    models::{Book, Catalog, PreferenceRecord, Session, UserId, VoteTally},
};

/// Result of signing a session in
#[derive(Debug, Clone, Serialize)]
pub struct SignedIn {
    pub user: UserId,
    pub preferences: PreferenceRecord,
    pub signed_in_at: DateTime<Utc>,
    /// Set when the store could not be reached; the session is signed in anyway
    pub warning: Option<String>,
}

/// Signs the session in as `name` and makes sure the user has a record
///
/// A first-time user gets an empty record. Store failures do not block the
/// sign-in; they come back as a warning with empty preferences.
pub async fn sign_in(
    store: &dyn PreferenceStore,
    session: &mut Session,
    name: &str,
) -> AppResult<SignedIn> {
    let user = UserId::parse(name)?;
    let signed_in_at = session.sign_in(user.clone());

    match ensure_record(store, &user).await {
        Ok(preferences) => {
            tracing::info!(user = %user, session = %session.id, "User signed in");
            Ok(SignedIn {
                user,
                preferences,
                signed_in_at,
                warning: None,
            })
        }
        Err(e) if e.is_store_failure() => {
            tracing::warn!(
                user = %user,
                error = %e,
                "Signed in without reaching the preference store"
            );
            Ok(SignedIn {
                user,
                preferences: PreferenceRecord::new(),
                signed_in_at,
                warning: Some(e.to_string()),
            })
        }
        Err(e) => Err(e),
    }
}

async fn ensure_record(
    store: &dyn PreferenceStore,
    user: &UserId,
) -> AppResult<PreferenceRecord> {
    if let Some(existing) = store.get(user).await? {
        return Ok(existing);
    }

    let record = PreferenceRecord::new();
    store.set(user, &record).await?;
    tracing::info!(user = %user, "Created empty preference record");
    Ok(record)
}

/// Signs the session out. Its tallies are kept.
pub fn sign_out(session: &mut Session) {
    if let (Some(user), Some(since)) = (session.user(), session.signed_in_at()) {
        let minutes = (Utc::now() - since).num_minutes();
        tracing::info!(
            user = %user,
            session = %session.id,
            signed_in_minutes = minutes,
            "User signed out"
        );
    }
    session.sign_out();
}

/// Opens a book's detail view, starting its tally on first open
pub fn open_book(
    catalog: &Catalog,
    session: &mut Session,
    name: &str,
) -> AppResult<(Book, VoteTally)> {
    let book = catalog
        .find(name)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Book '{}' is not in the catalog", name)))?;
    let tally = *session.tallies.entry(&book.name);
    Ok((book, tally))
}

/// The signed-in user's stored record, empty if the store has none yet
pub async fn preferences(
    store: &dyn PreferenceStore,
    session: &Session,
) -> AppResult<PreferenceRecord> {
    let user = session.require_user()?;
    Ok(store.get(user).await?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{InMemoryPreferenceStore, MockPreferenceStore};
    use crate::models::VoteType;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_first_sign_in_creates_empty_record() {
        let store = InMemoryPreferenceStore::new();
        let mut session = Session::new();

        let signed_in = assert_ok!(sign_in(&store, &mut session, " Ada ").await);

        assert_eq!(signed_in.user.as_str(), "Ada");
        assert_eq!(signed_in.preferences, PreferenceRecord::new());
        assert_eq!(session.user().unwrap().as_str(), "Ada");
        assert_eq!(session.signed_in_at(), Some(signed_in.signed_in_at));
        let stored = store.get(&signed_in.user).await.unwrap();
        assert_eq!(stored, Some(PreferenceRecord::new()));
    }

    #[tokio::test]
    async fn test_sign_in_keeps_existing_record() {
        let mut store = MockPreferenceStore::new();
        store.expect_get().returning(|_| {
            Ok(Some(PreferenceRecord {
                likes: vec!["Verity".to_string()],
                dislikes: vec![],
            }))
        });
        store.expect_set().never();
        let mut session = Session::new();

        let signed_in = assert_ok!(sign_in(&store, &mut session, "Ada").await);
        assert_eq!(signed_in.preferences.likes, vec!["Verity"]);
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let store = InMemoryPreferenceStore::new();
        let mut session = Session::new();

        let err = assert_err!(sign_in(&store, &mut session, "   ").await);
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(session.user().is_none());
    }

    #[tokio::test]
    async fn test_sign_in_survives_store_outage() {
        let mut store = MockPreferenceStore::new();
        store
            .expect_get()
            .returning(|_| Err(AppError::StoreUnavailable("down".to_string())));
        let mut session = Session::new();

        let signed_in = assert_ok!(sign_in(&store, &mut session, "Ada").await);
        assert!(signed_in.warning.is_some());
        assert!(session.user().is_some());
    }

    #[test]
    fn test_open_book_initializes_tally() {
        let catalog = Catalog::builtin();
        let mut session = Session::new();

        let (book, tally) = open_book(&catalog, &mut session, "Atomic Habits").unwrap();
        assert_eq!(book.author, "James Clear");
        assert_eq!(tally, VoteTally::default());
        assert!(session.tallies.get("Atomic Habits").is_some());
    }

    #[test]
    fn test_open_book_returns_existing_tally() {
        let catalog = Catalog::builtin();
        let mut session = Session::new();
        session.tallies.entry("Verity").cast(VoteType::Like);

        let (_, tally) = open_book(&catalog, &mut session, "Verity").unwrap();
        assert_eq!(tally.likes, 1);
        assert_eq!(tally.user_vote, Some(VoteType::Like));
    }

    #[test]
    fn test_open_unknown_book() {
        let mut session = Session::new();
        let result = open_book(&Catalog::builtin(), &mut session, "Dune");
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(session.tallies.is_empty());
    }

    #[tokio::test]
    async fn test_preferences_require_sign_in() {
        let store = InMemoryPreferenceStore::new();
        let mut session = Session::new();
        assert!(matches!(
            preferences(&store, &session).await,
            Err(AppError::NotSignedIn)
        ));

        sign_in(&store, &mut session, "Ada").await.unwrap();
        sign_out(&mut session);
        assert!(matches!(
            preferences(&store, &session).await,
            Err(AppError::NotSignedIn)
        ));
    }
}
