use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Display;
use uuid::Uuid;

use super::TallyBoard;
use crate::error::{AppError, AppResult};

/// Identity of a signed-in user: the trimmed name they typed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UserId(String);

impl UserId {
    /// Validates a sign-in name. Blank names are rejected.
    pub fn parse(name: &str) -> AppResult<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidInput("Please enter your name".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One client's browsing session
///
/// Carries the signed-in user explicitly so nothing has to look up a global
/// "current user". The tally board lives as long as the session, across
/// sign-outs.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    user: Option<UserId>,
    signed_in_at: Option<DateTime<Utc>>,
    pub tallies: TallyBoard,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates an anonymous session
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            user: None,
            signed_in_at: None,
            tallies: TallyBoard::new(),
        }
    }

    /// Signs `user` in and returns the sign-in time
    pub fn sign_in(&mut self, user: UserId) -> DateTime<Utc> {
        let now = Utc::now();
        self.user = Some(user);
        self.signed_in_at = Some(now);
        now
    }

    pub fn sign_out(&mut self) {
        self.user = None;
        self.signed_in_at = None;
    }

    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    /// The signed-in user, or `NotSignedIn`
    pub fn require_user(&self) -> AppResult<&UserId> {
        self.user.as_ref().ok_or(AppError::NotSignedIn)
    }

    pub fn signed_in_at(&self) -> Option<DateTime<Utc>> {
        self.signed_in_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VoteType;

    #[test]
    fn test_user_id_is_trimmed() {
        let user = UserId::parse("  Ada ").unwrap();
        assert_eq!(user.as_str(), "Ada");
        assert_eq!(format!("{}", user), "Ada");
    }

    #[test]
    fn test_blank_user_id_rejected() {
        for name in ["", "   ", "\t\n"] {
            match UserId::parse(name) {
                Err(AppError::InvalidInput(msg)) => assert_eq!(msg, "Please enter your name"),
                other => panic!("expected InvalidInput, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_new_session_is_anonymous() {
        let session = Session::new();
        assert!(session.user().is_none());
        assert!(session.signed_in_at().is_none());
        assert!(matches!(session.require_user(), Err(AppError::NotSignedIn)));
    }

    #[test]
    fn test_user_id_serializes_as_plain_name() {
        let user = UserId::parse("Ada").unwrap();
        assert_eq!(serde_json::to_value(&user).unwrap(), serde_json::json!("Ada"));
    }

    #[test]
    fn test_sign_out_keeps_tallies() {
        let mut session = Session::new();
        let at = session.sign_in(UserId::parse("Ada").unwrap());
        assert_eq!(session.signed_in_at(), Some(at));
        session.tallies.entry("Verity").cast(VoteType::Like);

        session.sign_out();

        assert!(session.user().is_none());
        assert!(session.signed_in_at().is_none());
        assert_eq!(session.tallies.get("Verity").unwrap().likes, 1);
    }
}
